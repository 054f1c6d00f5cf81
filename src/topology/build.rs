use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{Result, TopologyError};
use crate::math::{Vector3, TOLERANCE};

use super::{EdgeMap, FaceData, VertexData};

/// Registers every directed edge `(a, b)` of every face loop.
///
/// A directed edge may occur only once in a consistently wound manifold;
/// a second occurrence means two faces disagree on orientation or more
/// than two faces meet at the edge.
pub(super) fn directed_edges(faces: &[Vec<usize>]) -> Result<EdgeMap> {
    let mut edges: EdgeMap = HashMap::with_capacity(faces.iter().map(Vec::len).sum());
    for (f, face) in faces.iter().enumerate() {
        let n = face.len();
        for i in 0..n {
            let (from, to) = (face[i], face[(i + 1) % n]);
            if edges.insert((from, to), f).is_some() {
                return Err(TopologyError::ReversedEdge { face: f, from, to }.into());
            }
        }
    }
    Ok(edges)
}

/// Collects, for every vertex, the faces referencing it in face order.
pub(super) fn incident_faces(vertex_count: usize, faces: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut incident = vec![Vec::new(); vertex_count];
    for (f, face) in faces.iter().enumerate() {
        for &v in face {
            incident[v].push(f);
        }
    }
    incident
}

/// The vertex following `vertex` in `face`'s loop.
fn successor(face: &[usize], vertex: usize) -> Option<usize> {
    let i = face.iter().position(|&v| v == vertex)?;
    Some(face[(i + 1) % face.len()])
}

/// Orders the faces around `vertex` into one closed, counter-clockwise cycle.
///
/// Starting from the first incident face, each step crosses the edge that
/// leaves `vertex` in the current face's loop; the face holding the reversed
/// edge must be an unused incident face. After all faces are placed, the
/// last one must lead back to the first.
pub(super) fn order_vertex_faces(
    vertex: usize,
    incident: &[usize],
    faces: &[Vec<usize>],
    normals: &[Vector3],
    edges: &EdgeMap,
) -> Result<Vec<usize>> {
    if incident.len() < 3 {
        return Err(TopologyError::LowValence {
            vertex,
            valence: incident.len(),
        }
        .into());
    }

    let across = |face: usize| -> Option<usize> {
        let next = successor(&faces[face], vertex)?;
        edges.get(&(next, vertex)).copied()
    };

    let mut chain = Vec::with_capacity(incident.len());
    let mut used = vec![false; incident.len()];
    chain.push(incident[0]);
    used[0] = true;

    while chain.len() < incident.len() {
        let current = chain[chain.len() - 1];
        let slot = across(current).and_then(|candidate| {
            incident
                .iter()
                .enumerate()
                .position(|(k, &f)| f == candidate && !used[k])
        });
        let Some(slot) = slot else {
            return Err(TopologyError::UnchainableFace {
                vertex,
                face: current,
            }
            .into());
        };
        used[slot] = true;
        chain.push(incident[slot]);
    }

    if across(chain[chain.len() - 1]) != Some(chain[0]) {
        return Err(TopologyError::OpenVertexCycle { vertex }.into());
    }

    if !is_counter_clockwise(&chain, normals) {
        chain.reverse();
    }
    Ok(chain)
}

/// Decides whether a closed face cycle runs counter-clockwise about the
/// average of its face normals.
///
/// Uses the first consecutive pair of faces whose normals are not parallel.
fn is_counter_clockwise(chain: &[usize], normals: &[Vector3]) -> bool {
    let average: Vector3 = chain.iter().map(|&f| normals[f]).sum();
    let n = chain.len();
    for i in 0..n {
        let cross = normals[chain[i]].cross(&normals[chain[(i + 1) % n]]);
        if cross.norm() > TOLERANCE {
            return cross.dot(&average) >= 0.0;
        }
    }
    true
}

/// Walks around face `face` through the ordered vertex cycles.
///
/// At the first vertex the walk starts right after `face` in the vertex's
/// cycle; at every later vertex it starts right after the face the previous
/// walk ended on. Each walk stops before the next occurrence of `face`.
/// The face each walk ends on lies across the edge leaving that vertex.
pub(super) fn walk_face(
    face: usize,
    loop_vertices: &[usize],
    vertices: &[VertexData],
) -> Result<FaceData> {
    let mut raw: Vec<usize> = Vec::new();
    let mut adjacent = Vec::with_capacity(loop_vertices.len());
    let mut key = face;

    for &v in loop_vertices {
        let ring = &vertices[v].faces;
        let start = vertices[v]
            .position_of(key)
            .ok_or(TopologyError::FaceNotIncident { face: key, vertex: v })?;

        let segment_start = raw.len();
        let mut idx = (start + 1) % ring.len();
        while ring[idx] != face {
            if idx == start {
                // Came round to `key` without meeting `face`.
                return Err(TopologyError::FaceNotIncident { face, vertex: v }.into());
            }
            raw.push(ring[idx]);
            idx = (idx + 1) % ring.len();
        }
        if raw.len() == segment_start {
            return Err(TopologyError::OpenFaceWalk { face }.into());
        }
        key = raw[raw.len() - 1];
        adjacent.push(key);
    }

    if raw.first() != raw.last() {
        return Err(TopologyError::OpenFaceWalk { face }.into());
    }
    raw.pop();

    Ok(FaceData {
        vertices: loop_vertices.to_vec(),
        adjacent,
        neighbors: raw,
    })
}

/// Runs the full build, logging the failure before it propagates.
pub(super) fn build_all(
    vertex_count: usize,
    faces: &[Vec<usize>],
    normals: &[Vector3],
) -> Result<(Vec<VertexData>, Vec<FaceData>, EdgeMap)> {
    let result = build_inner(vertex_count, faces, normals);
    if let Err(err) = &result {
        warn!(%err, "topology build failed");
    }
    result
}

fn build_inner(
    vertex_count: usize,
    faces: &[Vec<usize>],
    normals: &[Vector3],
) -> Result<(Vec<VertexData>, Vec<FaceData>, EdgeMap)> {
    let edges = directed_edges(faces)?;
    let incident = incident_faces(vertex_count, faces);

    let vertices = incident
        .iter()
        .enumerate()
        .map(|(v, inc)| order_vertex_faces(v, inc, faces, normals, &edges).map(VertexData::new))
        .collect::<Result<Vec<_>>>()?;

    let face_data = faces
        .iter()
        .enumerate()
        .map(|(f, face)| walk_face(f, face, &vertices))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        vertices = vertices.len(),
        faces = face_data.len(),
        edges = edges.len() / 2,
        "topology built"
    );
    Ok((vertices, face_data, edges))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::FacetError;

    // Unit cube faces: -z, +z, -y, +x, +y, -x
    fn cube_faces() -> Vec<Vec<usize>> {
        vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![3, 0, 4, 7],
        ]
    }

    fn cube_normals() -> Vec<Vector3> {
        vec![
            -Vector3::z(),
            Vector3::z(),
            -Vector3::y(),
            Vector3::x(),
            Vector3::y(),
            -Vector3::x(),
        ]
    }

    #[test]
    fn directed_edges_cover_every_loop_edge() {
        let edges = directed_edges(&cube_faces()).unwrap();
        assert_eq!(edges.len(), 24);
        assert_eq!(edges[&(0, 3)], 0);
        assert_eq!(edges[&(3, 0)], 5);
    }

    #[test]
    fn duplicated_directed_edge_is_reported() {
        let mut faces = cube_faces();
        faces[1] = vec![7, 6, 5, 4]; // flipped top
        let err = directed_edges(&faces).unwrap_err();
        assert!(matches!(
            err,
            FacetError::Topology(TopologyError::ReversedEdge { face: 2, .. })
        ));
    }

    #[test]
    fn vertex_cycle_is_counter_clockwise() {
        let faces = cube_faces();
        let normals = cube_normals();
        let edges = directed_edges(&faces).unwrap();
        let incident = incident_faces(8, &faces);

        // Vertex 6 = (+,+,+): faces +z(1), +x(3), +y(4)
        let ring = order_vertex_faces(6, &incident[6], &faces, &normals, &edges).unwrap();
        assert_eq!(ring.len(), 3);
        let a = normals[ring[0]];
        let b = normals[ring[1]];
        assert!(a.cross(&b).dot(&Vector3::new(1.0, 1.0, 1.0)) > 0.0);
    }

    #[test]
    fn low_valence_vertex_is_rejected() {
        let faces = cube_faces();
        let normals = cube_normals();
        let edges = directed_edges(&faces).unwrap();
        let err = order_vertex_faces(0, &[0, 2], &faces, &normals, &edges).unwrap_err();
        assert!(matches!(
            err,
            FacetError::Topology(TopologyError::LowValence { vertex: 0, valence: 2 })
        ));
    }

    #[test]
    fn face_walk_stops_at_the_face_itself() {
        let faces = cube_faces();
        let normals = cube_normals();
        let edges = directed_edges(&faces).unwrap();
        let vertices: Vec<VertexData> = incident_faces(8, &faces)
            .iter()
            .enumerate()
            .map(|(v, inc)| {
                VertexData::new(order_vertex_faces(v, inc, &faces, &normals, &edges).unwrap())
            })
            .collect();

        // -z face [0, 3, 2, 1]: leaving edges border -x, +y, +x, -y.
        let data = walk_face(0, &faces[0], &vertices).unwrap();
        assert_eq!(data.adjacent, vec![5, 4, 3, 2]);
        assert_eq!(data.neighbors.len(), 4);
    }

    #[test]
    fn face_missing_from_ring_is_reported() {
        let faces = cube_faces();
        let mut vertices = vec![VertexData::new(vec![1, 3, 4]); 8];
        vertices[0] = VertexData::new(vec![0, 2, 5]);
        // Vertex 3 holds the walk's key face 5 but not face 0.
        vertices[3] = VertexData::new(vec![5, 3, 4]);
        let err = walk_face(0, &faces[0], &vertices).unwrap_err();
        assert!(matches!(
            err,
            FacetError::Topology(TopologyError::FaceNotIncident { face: 0, vertex: 3 })
        ));
    }
}
