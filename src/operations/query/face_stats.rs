use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::Plane;
use crate::math::polygon_3d::{centroid, polygon_area_3d};
use crate::math::{Matrix3, Point3, Vector3};

/// Least-squares plane fit of one face.
#[derive(Debug, Clone, Copy)]
pub struct FaceFit {
    /// Unit normal of the best-fit plane, oriented like the declared plane.
    pub normal: Vector3,
    /// Centroid of the face vertices; the fit plane passes through it.
    pub centroid: Point3,
    /// Area of the polygon projected along the fit normal.
    pub area: f64,
    /// Largest |distance| of a vertex from the declared plane.
    pub max_plane_deviation: f64,
    /// Largest |distance| of a vertex from the fit plane.
    pub max_fit_deviation: f64,
}

/// Fits a plane to a face's vertices and measures how far they stray from
/// it and from the face's declared plane.
pub struct FaceStats<'a> {
    points: &'a [Point3],
    plane: Plane,
}

impl<'a> FaceStats<'a> {
    /// Creates a new `FaceStats` query.
    #[must_use]
    pub fn new(points: &'a [Point3], plane: Plane) -> Self {
        Self { points, plane }
    }

    /// Executes the fit.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than three points, or if the SVD does not
    /// converge.
    pub fn execute(&self) -> Result<FaceFit> {
        if self.points.len() < 3 {
            return Err(GeometryError::Degenerate(format!(
                "plane fit needs 3 points, got {}",
                self.points.len()
            ))
            .into());
        }
        let center = centroid(self.points);

        let mut scatter = Matrix3::zeros();
        for p in self.points {
            let d = p - center;
            scatter += d * d.transpose();
        }

        let svd = scatter.svd(false, true);
        let v_t = svd
            .v_t
            .ok_or_else(|| OperationError::Failed("plane fit SVD did not converge".into()))?;
        let smallest = svd.singular_values.imin();
        let mut normal: Vector3 = v_t.row(smallest).transpose();
        if normal.dot(self.plane.normal()) < 0.0 {
            normal = -normal;
        }

        let max_plane_deviation = self
            .points
            .iter()
            .map(|p| self.plane.signed_distance(p).abs())
            .fold(0.0, f64::max);
        let max_fit_deviation = self
            .points
            .iter()
            .map(|p| normal.dot(&(p - center)).abs())
            .fold(0.0, f64::max);

        Ok(FaceFit {
            normal,
            centroid: center,
            area: polygon_area_3d(self.points, &normal),
            max_plane_deviation,
            max_fit_deviation,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::MakeTetrahedron;
    use approx::assert_relative_eq;

    #[test]
    fn mesh_face_fits_its_plane() {
        let mesh = MakeTetrahedron::new(Point3::new(0.5, 0.0, -1.0), 2.0)
            .execute()
            .unwrap();
        for f in 0..mesh.face_count() {
            let points = mesh.face_points(f).unwrap();
            let fit = FaceStats::new(&points, mesh.face_plane(f).unwrap())
                .execute()
                .unwrap();
            assert_relative_eq!(fit.normal, mesh.normals()[f], epsilon = 1e-9);
            assert!(fit.max_plane_deviation < 1e-12);
            assert!(fit.max_fit_deviation < 1e-12);
            // Equilateral triangle with edge 2
            assert_relative_eq!(fit.area, 3.0_f64.sqrt(), epsilon = 1e-9);
        }
    }

    #[test]
    fn warped_quad_deviates_from_both_planes() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.1),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.1),
        ];
        let plane = Plane::from_point_normal(&Point3::origin(), Vector3::z()).unwrap();
        let fit = FaceStats::new(&points, plane).execute().unwrap();

        assert_relative_eq!(fit.normal, Vector3::z(), epsilon = 1e-9);
        assert_relative_eq!(fit.max_plane_deviation, 0.1, epsilon = 1e-12);
        assert_relative_eq!(fit.max_fit_deviation, 0.05, epsilon = 1e-9);
        assert_relative_eq!(fit.centroid, Point3::new(0.5, 0.5, 0.05), epsilon = 1e-12);
        assert_relative_eq!(fit.area, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn too_few_points() {
        let plane = Plane::from_point_normal(&Point3::origin(), Vector3::z()).unwrap();
        let points = [Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        assert!(FaceStats::new(&points, plane).execute().is_err());
    }
}
