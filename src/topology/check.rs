use crate::error::{Result, TopologyError};
use crate::mesh::Mesh;

use super::Topology;

impl Topology {
    /// Verifies the closure invariants against the mesh this topology was
    /// built from.
    ///
    /// Every vertex cycle must have at least three faces, visit each face
    /// once and join consecutive faces (last to first included) by an edge
    /// through the vertex. Every face must have one edge-adjacent face per
    /// vertex, lying across the edge that leaves that vertex.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`TopologyError`].
    pub fn check(&self, mesh: &Mesh) -> Result<()> {
        if self.vertex_count() != mesh.vertex_count() {
            return Err(TopologyError::EntityNotFound(format!(
                "vertex {}",
                self.vertex_count().min(mesh.vertex_count())
            ))
            .into());
        }
        if self.face_count() != mesh.face_count() {
            return Err(TopologyError::EntityNotFound(format!(
                "face {}",
                self.face_count().min(mesh.face_count())
            ))
            .into());
        }

        for (v, data) in self.vertices().iter().enumerate() {
            let ring = &data.faces;
            if ring.len() < 3 {
                return Err(TopologyError::LowValence {
                    vertex: v,
                    valence: ring.len(),
                }
                .into());
            }
            for (i, &face) in ring.iter().enumerate() {
                if ring[i + 1..].contains(&face) {
                    return Err(TopologyError::OpenVertexCycle { vertex: v }.into());
                }
                if !self.faces()[face].vertices.contains(&v) {
                    return Err(TopologyError::FaceNotIncident { face, vertex: v }.into());
                }
                let next = ring[(i + 1) % ring.len()];
                if !self.share_edge_at(v, face, next) {
                    return Err(TopologyError::OpenVertexCycle { vertex: v }.into());
                }
            }
        }

        for (f, data) in self.faces().iter().enumerate() {
            let expected = mesh.face(f).unwrap_or_default();
            if data.vertices != expected || data.adjacent.len() != data.vertices.len() {
                return Err(TopologyError::OpenFaceWalk { face: f }.into());
            }
            for (i, &adj) in data.adjacent.iter().enumerate() {
                let from = data.vertices[i];
                let to = data.next_vertex(i);
                if self.face_with_edge(to, from) != Some(adj) {
                    return Err(TopologyError::OpenFaceWalk { face: f }.into());
                }
            }
        }
        Ok(())
    }
}
