use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::mesh::Mesh;

use super::wind_outward;

/// Creates a regular octahedron mesh, vertices on the coordinate axes.
///
/// Every vertex joins four faces.
pub struct MakeOctahedron {
    center: Point3,
    radius: f64,
}

impl MakeOctahedron {
    /// Creates a new `MakeOctahedron` operation; `radius` is the distance
    /// from the center to each vertex.
    #[must_use]
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Executes the operation, creating the octahedron mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive.
    pub fn execute(&self) -> Result<Mesh> {
        if self.radius < TOLERANCE {
            return Err(
                OperationError::InvalidInput("octahedron radius must be positive".into()).into(),
            );
        }
        let r = self.radius;
        // +x, -x, +y, -y, +z, -z
        let positions: Vec<Point3> = [
            Vector3::x(),
            -Vector3::x(),
            Vector3::y(),
            -Vector3::y(),
            Vector3::z(),
            -Vector3::z(),
        ]
        .iter()
        .map(|axis| self.center + axis * r)
        .collect();

        let mut faces = Vec::with_capacity(8);
        for x in [0, 1] {
            for y in [2, 3] {
                for z in [4, 5] {
                    faces.push(wind_outward(&positions, vec![x, y, z], &self.center));
                }
            }
        }
        Mesh::from_polygons(positions, faces)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn octant_normals_point_outward() {
        let mesh = MakeOctahedron::new(Point3::origin(), 1.0).execute().unwrap();
        assert_eq!(mesh.face_count(), 8);
        let third = 1.0 / 3.0_f64.sqrt();
        for f in 0..8 {
            let n = mesh.normal(f).unwrap();
            assert_relative_eq!(n.x.abs(), third, epsilon = 1e-12);
            let c = mesh.face_centroid(f).unwrap();
            assert!(n.dot(&c.coords) > 0.0);
        }
    }
}
