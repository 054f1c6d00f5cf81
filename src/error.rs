use thiserror::Error;

/// Top-level error type for the facet offset kernel.
#[derive(Debug, Error)]
pub enum FacetError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("face {face} is not planar: vertex distances spread over {spread}")]
    NonPlanarFace { face: usize, spread: f64 },

    #[error("face {face} is not wound counter-clockwise about its normal")]
    BadWinding { face: usize },

    #[error("interior point lies {distance} outside the half-space of face {face}")]
    InfeasibleInterior { face: usize, distance: f64 },
}

/// Errors raised while building the oriented adjacency of a mesh.
///
/// All of these are fatal for the mesh they were raised on: a mesh that
/// fails to build must not be handed to an offset engine.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("vertex {vertex}: no unused face is edge-adjacent to face {face}")]
    UnchainableFace { vertex: usize, face: usize },

    #[error("vertex {vertex}: incident faces do not close into a cycle")]
    OpenVertexCycle { vertex: usize },

    #[error("vertex {vertex} has valence {valence}, expected at least 3")]
    LowValence { vertex: usize, valence: usize },

    #[error("face {face}: adjacent-face walk does not close")]
    OpenFaceWalk { face: usize },

    #[error("face {face} repeats directed edge ({from}, {to}) already used by another face")]
    ReversedEdge { face: usize, from: usize, to: usize },

    #[error("face {face} is not incident to vertex {vertex}")]
    FaceNotIncident { face: usize, vertex: usize },

    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),

    #[error("face index {index} is out of range for {count} faces")]
    FaceIndexOutOfRange { index: usize, count: usize },
}

/// Convenience type alias for results using [`FacetError`].
pub type Result<T> = std::result::Result<T, FacetError>;
