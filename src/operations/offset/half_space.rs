use tracing::debug;

use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::Plane;
use crate::math::intersect_3d::three_plane_intersect;
use crate::math::{Point3, Vector3};

use super::OffsetParams;

/// Enumerates the vertices of the bounded intersection of half-spaces
/// `{ x : normal_i · x + constant_i <= 0 }`.
///
/// Every triple of planes with independent normals is solved for its common
/// point; points violating any half-space are discarded and points closer
/// than the merge tolerance are collapsed. The work is done in coordinates
/// centred on the interior point, which must lie strictly inside every
/// half-space.
pub struct HalfSpaceIntersection {
    planes: Vec<Plane>,
    interior: Point3,
    params: OffsetParams,
}

impl HalfSpaceIntersection {
    /// Creates a new `HalfSpaceIntersection` operation.
    #[must_use]
    pub fn new(planes: Vec<Plane>, interior: Point3) -> Self {
        Self {
            planes,
            interior,
            params: OffsetParams::default(),
        }
    }

    /// Sets custom numerical tolerances.
    #[must_use]
    pub fn with_params(mut self, params: OffsetParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the enumeration, returning the polyhedron's vertices.
    ///
    /// The order of the returned points follows the lexicographic order of
    /// the plane triples that produced them, so it is deterministic.
    ///
    /// # Errors
    ///
    /// Returns an error if the interior point is not strictly inside every
    /// half-space, or if fewer than four vertices are found (the system is
    /// unbounded or degenerate).
    pub fn execute(&self) -> Result<Vec<Point3>> {
        let local = self.centred_planes()?;
        let n = local.len();

        let mut vertices: Vec<Vector3> = Vec::new();
        let mut solved = 0usize;
        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    let Some(x) = three_plane_intersect(
                        &local[i],
                        &local[j],
                        &local[k],
                        self.params.singular_tolerance,
                    ) else {
                        continue;
                    };
                    solved += 1;
                    if !self.is_feasible(&local, &x) {
                        continue;
                    }
                    let is_new = vertices
                        .iter()
                        .all(|v| (v - x.coords).norm() > self.params.merge_tolerance);
                    if is_new {
                        vertices.push(x.coords);
                    }
                }
            }
        }

        debug!(
            planes = n,
            solved,
            vertices = vertices.len(),
            "half-space vertices enumerated"
        );

        if vertices.len() < 4 {
            return Err(OperationError::Failed(format!(
                "half-space intersection of {n} planes has {} vertices; it is unbounded or flat",
                vertices.len()
            ))
            .into());
        }
        Ok(vertices.into_iter().map(|v| self.interior + v).collect())
    }

    /// Re-expresses each plane relative to the interior point and checks
    /// that the interior point is strictly inside.
    fn centred_planes(&self) -> Result<Vec<Plane>> {
        self.planes
            .iter()
            .enumerate()
            .map(|(face, plane)| {
                let distance = plane.signed_distance(&self.interior);
                if distance >= -self.params.feasibility_tolerance {
                    return Err(GeometryError::InfeasibleInterior { face, distance }.into());
                }
                Plane::new(*plane.normal(), distance)
            })
            .collect()
    }

    fn is_feasible(&self, planes: &[Plane], x: &Point3) -> bool {
        planes
            .iter()
            .all(|p| p.signed_distance(x) <= self.params.feasibility_tolerance)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::FacetError;
    use crate::operations::creation::{MakeBox, MakeOctahedron};

    fn contains(points: &[Point3], target: &Point3) -> bool {
        points.iter().any(|p| (p - target).norm() < 1e-9)
    }

    #[test]
    fn cube_planes_give_cube_corners() {
        let mesh = MakeBox::new(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5))
            .execute()
            .unwrap();
        let planes = mesh.face_planes().unwrap();
        let vertices = HalfSpaceIntersection::new(planes, Point3::origin())
            .execute()
            .unwrap();

        assert_eq!(vertices.len(), 8);
        for corner in mesh.positions() {
            assert!(contains(&vertices, corner));
        }
    }

    #[test]
    fn octahedron_vertices_are_merged() {
        // Each octahedron vertex is produced by C(4, 3) = 4 plane triples.
        let mesh = MakeOctahedron::new(Point3::new(1.0, 2.0, 3.0), 1.5)
            .execute()
            .unwrap();
        let planes = mesh.face_planes().unwrap();
        let vertices = HalfSpaceIntersection::new(planes, mesh.interior_point())
            .execute()
            .unwrap();

        assert_eq!(vertices.len(), 6);
        for corner in mesh.positions() {
            assert!(contains(&vertices, corner));
        }
    }

    #[test]
    fn redundant_plane_is_harmless() {
        let mesh = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .execute()
            .unwrap();
        let mut planes = mesh.face_planes().unwrap();
        // Cuts nothing: x + y + z <= 10
        planes.push(Plane::new(Vector3::new(1.0, 1.0, 1.0), -10.0).unwrap());

        let vertices = HalfSpaceIntersection::new(planes, mesh.interior_point())
            .execute()
            .unwrap();
        assert_eq!(vertices.len(), 8);
    }

    #[test]
    fn exterior_seed_is_rejected() {
        let mesh = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .execute()
            .unwrap();
        let planes = mesh.face_planes().unwrap();
        let err = HalfSpaceIntersection::new(planes, Point3::new(2.0, 0.5, 0.5))
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            FacetError::Geometry(GeometryError::InfeasibleInterior { face: 3, .. })
        ));
    }

    #[test]
    fn unbounded_system_is_rejected() {
        let planes = vec![
            Plane::new(Vector3::x(), -1.0).unwrap(),
            Plane::new(Vector3::y(), -1.0).unwrap(),
            Plane::new(Vector3::z(), -1.0).unwrap(),
        ];
        let result = HalfSpaceIntersection::new(planes, Point3::origin()).execute();
        assert!(result.is_err());
    }
}
