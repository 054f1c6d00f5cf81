use std::f64::consts::TAU;

use crate::error::{OperationError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::mesh::Mesh;

/// Creates a right prism over a regular polygon, axis along `+z`.
///
/// The base lies in `z = 0`, the top in `z = height`. Faces are the base,
/// the top, then one quad per side.
pub struct MakePrism {
    sides: usize,
    radius: f64,
    height: f64,
}

impl MakePrism {
    /// Creates a new `MakePrism` operation; `radius` is the circumradius of
    /// the base polygon.
    #[must_use]
    pub fn new(sides: usize, radius: f64, height: f64) -> Self {
        Self {
            sides,
            radius,
            height,
        }
    }

    /// Executes the operation, creating the prism mesh.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than three sides or a non-positive radius
    /// or height.
    pub fn execute(&self) -> Result<Mesh> {
        let n = self.sides;
        if n < 3 {
            return Err(
                OperationError::InvalidInput("prism needs at least 3 sides".into()).into(),
            );
        }
        if self.radius < TOLERANCE || self.height < TOLERANCE {
            return Err(OperationError::InvalidInput(
                "prism radius and height must be positive".into(),
            )
            .into());
        }

        #[allow(clippy::cast_precision_loss)]
        let step = TAU / n as f64;
        let ring = |z: f64| {
            (0..n).map(move |i| {
                #[allow(clippy::cast_precision_loss)]
                let angle = step * i as f64;
                Point3::new(self.radius * angle.cos(), self.radius * angle.sin(), z)
            })
        };
        let positions: Vec<Point3> = ring(0.0).chain(ring(self.height)).collect();

        let mut faces = Vec::with_capacity(n + 2);
        faces.push((0..n).rev().collect());
        faces.push((n..2 * n).collect());
        for i in 0..n {
            let j = (i + 1) % n;
            faces.push(vec![i, j, n + j, n + i]);
        }
        Mesh::from_polygons(positions, faces)
    }
}
