mod build;
mod check;
pub mod face;
pub mod vertex;

pub use face::FaceData;
pub use vertex::VertexData;

use std::collections::HashMap;

use crate::error::{Result, TopologyError};
use crate::math::Vector3;
use crate::mesh::Mesh;

/// Directed edge `(from, to)` to the face whose loop contains it.
pub(crate) type EdgeMap = HashMap<(usize, usize), usize>;

/// Oriented adjacency of a closed, manifold polygon mesh.
///
/// Built once from an unordered face/vertex incidence list and immutable
/// afterwards, so it can be shared read-only by any number of consumers.
#[derive(Debug, Clone)]
pub struct Topology {
    vertices: Vec<VertexData>,
    faces: Vec<FaceData>,
    edges: EdgeMap,
}

impl Topology {
    /// Builds the topology of a mesh.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if the mesh is not watertight, has a
    /// non-manifold vertex or edge, or is not consistently wound.
    pub fn build(mesh: &Mesh) -> Result<Self> {
        Self::from_loops(mesh.vertex_count(), mesh.faces(), mesh.normals())
    }

    /// Builds the topology from raw face loops and per-face normals.
    ///
    /// # Errors
    ///
    /// Same as [`Topology::build`]. Out-of-range vertex indices are
    /// reported as [`TopologyError::EntityNotFound`].
    pub fn from_loops(
        vertex_count: usize,
        faces: &[Vec<usize>],
        normals: &[Vector3],
    ) -> Result<Self> {
        if normals.len() != faces.len() {
            return Err(TopologyError::EntityNotFound(format!(
                "normal for face {}",
                normals.len().min(faces.len())
            ))
            .into());
        }
        if let Some(v) = faces.iter().flatten().find(|&&v| v >= vertex_count) {
            return Err(TopologyError::EntityNotFound(format!("vertex {v}")).into());
        }
        let (vertices, faces, edges) = build::build_all(vertex_count, faces, normals)?;
        Ok(Self {
            vertices,
            faces,
            edges,
        })
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    /// Adjacency data of every vertex.
    #[must_use]
    pub fn vertices(&self) -> &[VertexData] {
        &self.vertices
    }

    /// Adjacency data of every face.
    #[must_use]
    pub fn faces(&self) -> &[FaceData] {
        &self.faces
    }

    /// Returns the vertex adjacency, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex index is out of range.
    pub fn vertex(&self, index: usize) -> Result<&VertexData> {
        self.vertices
            .get(index)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("vertex {index}")).into())
    }

    /// Returns the face adjacency, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn face(&self, index: usize) -> Result<&FaceData> {
        self.faces
            .get(index)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("face {index}")).into())
    }

    /// Counter-clockwise cycle of faces around vertex `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex index is out of range.
    pub fn vertex_faces(&self, index: usize) -> Result<&[usize]> {
        Ok(&self.vertex(index)?.faces)
    }

    /// Vertex loop of face `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn face_vertices(&self, index: usize) -> Result<&[usize]> {
        Ok(&self.face(index)?.vertices)
    }

    /// Edge-adjacent faces of face `index`, aligned with its vertex loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn face_adjacent(&self, index: usize) -> Result<&[usize]> {
        Ok(&self.face(index)?.adjacent)
    }

    /// Every face sharing at least one vertex with face `index`, in
    /// counter-clockwise order around it.
    ///
    /// These are the faces whose planes can meet face `index` at a corner,
    /// so they bound its polygon once offsets are applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn face_neighbors(&self, index: usize) -> Result<&[usize]> {
        Ok(&self.face(index)?.neighbors)
    }

    /// Valence of vertex `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex index is out of range.
    pub fn valence(&self, index: usize) -> Result<usize> {
        Ok(self.vertex(index)?.valence())
    }

    /// Returns `true` if every vertex joins exactly three faces.
    #[must_use]
    pub fn is_all_valence_three(&self) -> bool {
        self.vertices.iter().all(|v| v.valence() == 3)
    }

    /// The face whose loop contains the directed edge `(from, to)`.
    #[must_use]
    pub fn face_with_edge(&self, from: usize, to: usize) -> Option<usize> {
        self.edges.get(&(from, to)).copied()
    }

    /// Returns `true` if faces `a` and `b` share an edge through `vertex`.
    #[must_use]
    pub fn share_edge_at(&self, vertex: usize, a: usize, b: usize) -> bool {
        let Some(face) = self.faces.get(a) else {
            return false;
        };
        let n = face.vertices.len();
        let Some(i) = face.vertices.iter().position(|&v| v == vertex) else {
            return false;
        };
        let next = face.vertices[(i + 1) % n];
        let prev = face.vertices[(i + n - 1) % n];
        self.face_with_edge(next, vertex) == Some(b) || self.face_with_edge(vertex, prev) == Some(b)
    }
}
