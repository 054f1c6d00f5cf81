mod bounding_box;
mod face_stats;
mod validate_face;
mod volume;

pub use bounding_box::{Aabb, BoundingBox};
pub use face_stats::{FaceFit, FaceStats};
pub use validate_face::ValidateFace;
pub use volume::Volume;
