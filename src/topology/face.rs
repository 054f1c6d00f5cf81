/// Adjacency of one mesh face.
///
/// `adjacent` is index-aligned with `vertices`: entry `i` is the face across
/// the edge that leaves vertex `i`, i.e. the edge `(vertices[i], vertices[i + 1])`.
/// `neighbors` is the full counter-clockwise cycle of faces sharing at least
/// a vertex with this one, which equals `adjacent` rotated by one when every
/// vertex of the face has valence 3.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceData {
    /// Vertex loop, counter-clockwise seen from outside.
    pub vertices: Vec<usize>,
    /// Edge-adjacent faces, one per vertex.
    pub adjacent: Vec<usize>,
    /// Vertex-adjacent faces, walking around the face. These are the planes
    /// that can bound the face once offsets apply; read them through
    /// [`Topology::face_neighbors`](super::Topology::face_neighbors).
    pub neighbors: Vec<usize>,
}

impl FaceData {
    /// Number of vertices (and edges) of the face.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the face has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertex following `vertices[i]` in loop order.
    #[must_use]
    pub fn next_vertex(&self, i: usize) -> usize {
        self.vertices[(i + 1) % self.vertices.len()]
    }
}
