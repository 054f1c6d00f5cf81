use crate::error::{GeometryError, Result};
use crate::math::polygon_3d::centroid;
use crate::math::Point3;

/// Computes the volume of a closed polyhedron given as face polygons.
///
/// Each polygon is fan-triangulated and the signed tetrahedra spanned with a
/// common apex are summed. Faces must be wound counter-clockwise seen from
/// outside; empty polygons (skipped faces) are ignored.
pub struct Volume<'a> {
    polygons: &'a [Vec<Point3>],
}

impl<'a> Volume<'a> {
    /// Creates a new `Volume` query.
    #[must_use]
    pub fn new(polygons: &'a [Vec<Point3>]) -> Self {
        Self { polygons }
    }

    /// Executes the query, returning the volume (absolute value).
    ///
    /// # Errors
    ///
    /// Returns an error if no polygon has at least three vertices.
    pub fn execute(&self) -> Result<f64> {
        let faces: Vec<&Vec<Point3>> = self.polygons.iter().filter(|p| p.len() >= 3).collect();
        if faces.is_empty() {
            return Err(GeometryError::Degenerate("volume of no faces".into()).into());
        }

        // Apex near the solid keeps the tetrahedra small.
        let all: Vec<Point3> = faces.iter().flat_map(|p| p.iter().copied()).collect();
        let apex = centroid(&all);

        let mut signed_volume = 0.0;
        for polygon in faces {
            let v0 = polygon[0] - apex;
            for pair in polygon[1..].windows(2) {
                let v1 = pair[0] - apex;
                let v2 = pair[1] - apex;
                signed_volume += v0.dot(&v1.cross(&v2));
            }
        }
        Ok(signed_volume.abs() / 6.0)
    }
}
