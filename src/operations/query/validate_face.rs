use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::mesh::Mesh;

/// Checks that a face polygon is planar and wound counter-clockwise about
/// its normal.
///
/// Planarity is the spread of `normal · v` over the vertices. Winding holds
/// when every fan triangle `(v0, vi, vi+1)` faces the same way as the
/// normal, which for a convex polygon also rules out self-intersection.
pub struct ValidateFace {
    face: usize,
    points: Vec<Point3>,
    normal: Vector3,
    planarity_tolerance: f64,
}

impl ValidateFace {
    /// Creates a new `ValidateFace` check for face `face`.
    #[must_use]
    pub fn new(face: usize, points: Vec<Point3>, normal: Vector3) -> Self {
        Self {
            face,
            points,
            normal,
            planarity_tolerance: 0.01,
        }
    }

    /// Creates the check for face `face` of a mesh, against its stored normal.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn from_mesh(mesh: &Mesh, face: usize) -> Result<Self> {
        let points = mesh.face_points(face)?;
        Ok(Self::new(face, points, mesh.normals()[face]))
    }

    /// Sets the maximum allowed planarity spread.
    #[must_use]
    pub fn with_tolerance(mut self, planarity_tolerance: f64) -> Self {
        self.planarity_tolerance = planarity_tolerance;
        self
    }

    /// Executes the check.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonPlanarFace`] or [`GeometryError::BadWinding`]
    /// on failure, and [`GeometryError::Degenerate`] for fewer than three
    /// vertices.
    pub fn execute(&self) -> Result<()> {
        if self.points.len() < 3 {
            return Err(GeometryError::Degenerate(format!(
                "face {} has {} vertices",
                self.face,
                self.points.len()
            ))
            .into());
        }

        let heights = self.points.iter().map(|p| self.normal.dot(&p.coords));
        let (lo, hi) = heights.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), h| {
            (lo.min(h), hi.max(h))
        });
        let spread = hi - lo;
        if spread > self.planarity_tolerance {
            return Err(GeometryError::NonPlanarFace {
                face: self.face,
                spread,
            }
            .into());
        }

        let v0 = self.points[0];
        let turns_back = self.points[1..].windows(2).any(|pair| {
            let cross = (pair[0] - v0).cross(&(pair[1] - v0));
            cross.dot(&self.normal) < -TOLERANCE
        });
        if turns_back {
            return Err(GeometryError::BadWinding { face: self.face }.into());
        }
        Ok(())
    }
}
