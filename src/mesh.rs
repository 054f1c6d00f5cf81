use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::Plane;
use crate::math::polygon_3d::{centroid, newell_normal};
use crate::math::{Point3, Vector3, TOLERANCE};

/// A closed polygonal mesh as handed over by a mesh reader.
///
/// Faces are loops of vertex indices, counter-clockwise when seen from
/// outside, each with a unit outward normal. The mesh itself only checks
/// that indices are well formed; watertightness and consistent winding are
/// established by [`Topology::build`](crate::topology::Topology::build).
#[derive(Debug, Clone)]
pub struct Mesh {
    positions: Vec<Point3>,
    faces: Vec<Vec<usize>>,
    normals: Vec<Vector3>,
}

impl Mesh {
    /// Creates a mesh from positions, face loops and one normal per face.
    ///
    /// Normals are normalized on the way in.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than four vertices or faces, a
    /// face has fewer than three vertices, repeats a vertex or references
    /// one out of range, or the normal count does not match the face count.
    pub fn new(
        positions: Vec<Point3>,
        faces: Vec<Vec<usize>>,
        normals: Vec<Vector3>,
    ) -> Result<Self> {
        validate_loops(positions.len(), &faces)?;
        if normals.len() != faces.len() {
            return Err(OperationError::InvalidInput(format!(
                "{} normals supplied for {} faces",
                normals.len(),
                faces.len()
            ))
            .into());
        }
        let normals = normals
            .into_iter()
            .map(|n| {
                let len = n.norm();
                if len < TOLERANCE {
                    Err(GeometryError::ZeroVector.into())
                } else {
                    Ok(n / len)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            positions,
            faces,
            normals,
        })
    }

    /// Creates a mesh from positions and face loops, deriving each face
    /// normal from its winding (Newell's method).
    ///
    /// # Errors
    ///
    /// Same as [`Mesh::new`], plus an error for a face with zero area.
    pub fn from_polygons(positions: Vec<Point3>, faces: Vec<Vec<usize>>) -> Result<Self> {
        validate_loops(positions.len(), &faces)?;
        let normals = faces
            .iter()
            .map(|face| {
                let points: Vec<Point3> = face.iter().map(|&v| positions[v]).collect();
                newell_normal(&points)
            })
            .collect();
        Self::new(positions, faces, normals)
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// All vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// All face loops.
    #[must_use]
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// All unit face normals.
    #[must_use]
    pub fn normals(&self) -> &[Vector3] {
        &self.normals
    }

    /// Position of vertex `index`.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<&Point3> {
        self.positions.get(index)
    }

    /// Vertex loop of face `index`.
    #[must_use]
    pub fn face(&self, index: usize) -> Option<&[usize]> {
        self.faces.get(index).map(Vec::as_slice)
    }

    /// Unit outward normal of face `index`.
    #[must_use]
    pub fn normal(&self, index: usize) -> Option<&Vector3> {
        self.normals.get(index)
    }

    /// Positions of face `index`'s vertices in loop order.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn face_points(&self, index: usize) -> Result<Vec<Point3>> {
        let face = self.face_or_err(index)?;
        Ok(face.iter().map(|&v| self.positions[v]).collect())
    }

    /// Supporting plane of face `index`, through its first vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn face_plane(&self, index: usize) -> Result<Plane> {
        let face = self.face_or_err(index)?;
        Plane::from_point_normal(&self.positions[face[0]], self.normals[index])
    }

    /// Supporting planes of all faces, in face order.
    ///
    /// # Errors
    ///
    /// Returns an error if any plane cannot be built.
    pub fn face_planes(&self) -> Result<Vec<Plane>> {
        (0..self.faces.len()).map(|i| self.face_plane(i)).collect()
    }

    /// Arithmetic mean of face `index`'s vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn face_centroid(&self, index: usize) -> Result<Point3> {
        Ok(centroid(&self.face_points(index)?))
    }

    /// Centroid of all vertices. For a convex mesh this is strictly inside.
    #[must_use]
    pub fn interior_point(&self) -> Point3 {
        centroid(&self.positions)
    }

    fn face_or_err(&self, index: usize) -> Result<&[usize]> {
        self.face(index).ok_or_else(|| {
            OperationError::FaceIndexOutOfRange {
                index,
                count: self.faces.len(),
            }
            .into()
        })
    }
}

/// Checks the counts and index ranges of raw face loops.
fn validate_loops(vertex_count: usize, faces: &[Vec<usize>]) -> Result<()> {
    if vertex_count < 4 {
        return Err(OperationError::InvalidInput(format!(
            "a closed mesh needs at least 4 vertices, got {vertex_count}"
        ))
        .into());
    }
    if faces.len() < 4 {
        return Err(OperationError::InvalidInput(format!(
            "a closed mesh needs at least 4 faces, got {}",
            faces.len()
        ))
        .into());
    }
    for (f, face) in faces.iter().enumerate() {
        if face.len() < 3 {
            return Err(OperationError::InvalidInput(format!(
                "face {f} has {} vertices, expected at least 3",
                face.len()
            ))
            .into());
        }
        if let Some(&bad) = face.iter().find(|&&v| v >= vertex_count) {
            return Err(OperationError::InvalidInput(format!(
                "face {f} references vertex {bad}, but there are {vertex_count}"
            ))
            .into());
        }
        for (i, v) in face.iter().enumerate() {
            if face[i + 1..].contains(v) {
                return Err(OperationError::InvalidInput(format!(
                    "face {f} repeats vertex {v}"
                ))
                .into());
            }
        }
    }
    Ok(())
}
