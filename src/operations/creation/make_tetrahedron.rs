use std::f64::consts::SQRT_2;

use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::mesh::Mesh;

use super::wind_outward;

/// Creates a regular tetrahedron mesh.
///
/// Vertices sit on alternate corners of a cube centred on `center`; face
/// `i` is the face opposite vertex `i`.
pub struct MakeTetrahedron {
    center: Point3,
    edge: f64,
}

impl MakeTetrahedron {
    /// Creates a new `MakeTetrahedron` operation with the given edge length.
    #[must_use]
    pub fn new(center: Point3, edge: f64) -> Self {
        Self { center, edge }
    }

    /// Executes the operation, creating the tetrahedron mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge length is not positive.
    pub fn execute(&self) -> Result<Mesh> {
        if self.edge < TOLERANCE {
            return Err(
                OperationError::InvalidInput("tetrahedron edge must be positive".into()).into(),
            );
        }
        let s = self.edge / (2.0 * SQRT_2);
        let corners = [
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(-1.0, 1.0, -1.0),
            Vector3::new(-1.0, -1.0, 1.0),
        ];
        let positions: Vec<Point3> = corners.iter().map(|c| self.center + c * s).collect();

        let faces = (0..4)
            .map(|skip| {
                let face: Vec<usize> = (0..4).filter(|&v| v != skip).collect();
                wind_outward(&positions, face, &self.center)
            })
            .collect();
        Mesh::from_polygons(positions, faces)
    }
}
