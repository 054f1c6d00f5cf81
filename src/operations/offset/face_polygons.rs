use tracing::{debug, warn};

use crate::geometry::Plane;
use crate::math::intersect_3d::{classify_point_plane, PointPlaneClassification};
use crate::math::polygon_2d::convex_hull_2d;
use crate::math::{Point2, Point3, TOLERANCE};

use super::OffsetParams;

/// Per-face polygons recovered from an unstructured vertex set.
#[derive(Debug, Clone, Default)]
pub struct ReconstructedFaces {
    /// One loop of vertex indices per plane, counter-clockwise about the
    /// plane normal. Empty for skipped faces.
    pub polygons: Vec<Vec<usize>>,
    /// Planes that ended up with fewer than three distinct vertices.
    pub skipped: Vec<usize>,
}

/// Rebuilds the face polygons of a convex polyhedron from its planes and
/// vertex positions.
///
/// For each plane, the vertices within `plane_tolerance` of it are
/// projected into the plane's `(u, v)` frame and ordered by their 2D
/// convex hull.
pub struct FacePolygons<'a> {
    planes: &'a [Plane],
    vertices: &'a [Point3],
    params: OffsetParams,
}

impl<'a> FacePolygons<'a> {
    /// Creates a new `FacePolygons` operation.
    #[must_use]
    pub fn new(planes: &'a [Plane], vertices: &'a [Point3]) -> Self {
        Self {
            planes,
            vertices,
            params: OffsetParams::default(),
        }
    }

    /// Sets custom numerical tolerances.
    #[must_use]
    pub fn with_params(mut self, params: OffsetParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the reconstruction.
    ///
    /// Faces left with fewer than three vertices are not an error: they
    /// are reported in [`ReconstructedFaces::skipped`] and get an empty loop.
    #[must_use]
    pub fn execute(&self) -> ReconstructedFaces {
        let mut result = ReconstructedFaces {
            polygons: Vec::with_capacity(self.planes.len()),
            skipped: Vec::new(),
        };

        for (face, plane) in self.planes.iter().enumerate() {
            let polygon = self.face_polygon(plane);
            if polygon.len() < 3 {
                warn!(face, vertices = polygon.len(), "degenerate offset face skipped");
                result.skipped.push(face);
                result.polygons.push(Vec::new());
            } else {
                result.polygons.push(polygon);
            }
        }

        debug!(
            faces = self.planes.len(),
            skipped = result.skipped.len(),
            "face polygons reconstructed"
        );
        result
    }

    fn face_polygon(&self, plane: &Plane) -> Vec<usize> {
        let on_plane: Vec<usize> = self
            .vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| {
                classify_point_plane(v, plane, self.params.plane_tolerance)
                    == PointPlaneClassification::On
            })
            .map(|(i, _)| i)
            .collect();

        let projected: Vec<Point2> = on_plane
            .iter()
            .map(|&i| plane.project(&self.vertices[i]))
            .collect();

        convex_hull_2d(&projected, TOLERANCE)
            .into_iter()
            .map(|k| on_plane[k])
            .collect()
    }
}
