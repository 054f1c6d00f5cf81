mod engine;
mod face_polygons;
mod half_space;

pub use engine::{OffsetEngine, OffsetReport};
pub use face_polygons::{FacePolygons, ReconstructedFaces};
pub use half_space::HalfSpaceIntersection;

/// Numerical parameters of the offset reconstruction.
#[derive(Debug, Clone, Copy)]
pub struct OffsetParams {
    /// Maximum |signed distance| for a vertex to count as lying on a plane.
    pub plane_tolerance: f64,
    /// Distance under which two enumerated vertices are merged.
    pub merge_tolerance: f64,
    /// Slack allowed when testing a candidate vertex against every half-space.
    pub feasibility_tolerance: f64,
    /// Minimum |det| of a plane triple's normal matrix.
    pub singular_tolerance: f64,
}

impl Default for OffsetParams {
    fn default() -> Self {
        Self {
            plane_tolerance: 1e-6,
            merge_tolerance: 1e-7,
            feasibility_tolerance: 1e-9,
            singular_tolerance: 1e-10,
        }
    }
}
