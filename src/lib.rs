pub mod error;
pub mod geometry;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod session;
pub mod topology;

pub use error::{FacetError, Result};
pub use mesh::Mesh;
pub use operations::offset::{OffsetEngine, OffsetParams, OffsetReport};
pub use session::{ObjectId, Session};
pub use topology::Topology;
