/// Adjacency of one mesh vertex.
///
/// `faces` lists the incident faces in counter-clockwise order as seen from
/// outside the solid: consecutive entries (including last to first) share
/// an edge through this vertex, and each incident face appears once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexData {
    /// Incident faces, cyclic and counter-clockwise.
    pub faces: Vec<usize>,
}

impl VertexData {
    /// Creates vertex adjacency from an already ordered face cycle.
    #[must_use]
    pub fn new(faces: Vec<usize>) -> Self {
        Self { faces }
    }

    /// Number of incident faces (equivalently, incident edges).
    #[must_use]
    pub fn valence(&self) -> usize {
        self.faces.len()
    }

    /// Position of `face` in the cycle, if incident.
    #[must_use]
    pub fn position_of(&self, face: usize) -> Option<usize> {
        self.faces.iter().position(|&f| f == face)
    }
}
