use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::mesh::Mesh;

/// Creates an axis-aligned box mesh from two corner points.
///
/// Vertices are numbered bottom ring first (`z = min.z`), counter-clockwise
/// from `min`; faces are `-z, +z, -y, +x, +y, -x`.
pub struct MakeBox {
    min_corner: Point3,
    max_corner: Point3,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation.
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Executes the operation, creating the box mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the box is flat along any axis or the corners
    /// are swapped.
    pub fn execute(&self) -> Result<Mesh> {
        let (lo, hi) = (&self.min_corner, &self.max_corner);
        if hi.x - lo.x < TOLERANCE || hi.y - lo.y < TOLERANCE || hi.z - lo.z < TOLERANCE {
            return Err(OperationError::InvalidInput(
                "box max corner must exceed min corner on every axis".into(),
            )
            .into());
        }

        let positions = vec![
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
        ];
        let faces = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![3, 0, 4, 7],
        ];
        let normals = vec![
            -Vector3::z(),
            Vector3::z(),
            -Vector3::y(),
            Vector3::x(),
            Vector3::y(),
            -Vector3::x(),
        ];
        Mesh::new(positions, faces, normals)
    }
}
