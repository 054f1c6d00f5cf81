use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::Plane;
use crate::math::polygon_3d::centroid;
use crate::math::{Matrix3, Point3, Vector3};
use crate::mesh::Mesh;
use crate::topology::Topology;

use super::{FacePolygons, HalfSpaceIntersection, OffsetParams, ReconstructedFaces};

/// Outcome of one offset recomputation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetReport {
    /// Number of vertices of the offset polyhedron.
    pub vertex_count: usize,
    /// Faces whose offset plane no longer carries a polygon.
    pub skipped_faces: Vec<usize>,
}

/// Offsets the faces of a convex polyhedron along their outward normals.
///
/// Each face `i` is the plane `normal_i · x + constant_i = 0` of the input,
/// displaced outward by a non-negative `delta_i`. After every
/// [`set_offset`](Self::set_offset) the offset polyhedron is recomputed from
/// scratch as the intersection of the displaced half-spaces, seeded by an
/// interior point fixed at construction.
#[derive(Debug, Clone)]
pub struct OffsetEngine {
    planes: Vec<Plane>,
    interior: Point3,
    params: OffsetParams,
    base_polygons: Vec<Vec<Point3>>,
    base_positions: Vec<Point3>,
    vertex_faces: Vec<Vec<usize>>,
    deltas: Vec<f64>,
    vertices: Vec<Point3>,
    faces: ReconstructedFaces,
}

impl OffsetEngine {
    /// Creates an engine over a mesh and its topology, at zero offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the topology was built for a different mesh, or
    /// if the mesh is not a bounded convex polyhedron containing its own
    /// vertex centroid.
    pub fn new(mesh: &Mesh, topology: &Topology) -> Result<Self> {
        if topology.vertex_count() != mesh.vertex_count()
            || topology.face_count() != mesh.face_count()
        {
            return Err(OperationError::InvalidInput(format!(
                "topology has {} vertices and {} faces, mesh has {} and {}",
                topology.vertex_count(),
                topology.face_count(),
                mesh.vertex_count(),
                mesh.face_count()
            ))
            .into());
        }

        let base_polygons = (0..mesh.face_count())
            .map(|f| mesh.face_points(f))
            .collect::<Result<Vec<_>>>()?;
        let vertex_faces = topology.vertices().iter().map(|v| v.faces.clone()).collect();

        Self::init(
            mesh.face_planes()?,
            mesh.interior_point(),
            OffsetParams::default(),
            Some(base_polygons),
            mesh.positions().to_vec(),
            vertex_faces,
        )
    }

    /// Creates an engine from face planes and one point strictly inside all
    /// of them, at zero offset.
    ///
    /// Without a mesh there is no vertex topology, so
    /// [`closed_form_vertex`](Self::closed_form_vertex) always returns `None`
    /// and the zero-offset reconstruction serves as the base polygons.
    ///
    /// # Errors
    ///
    /// Returns an error if `interior` is not strictly inside every plane or
    /// the planes do not bound a polyhedron.
    pub fn from_planes(planes: Vec<Plane>, interior: Point3) -> Result<Self> {
        Self::init(
            planes,
            interior,
            OffsetParams::default(),
            None,
            Vec::new(),
            Vec::new(),
        )
    }

    /// Replaces the numerical tolerances and recomputes the current offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the recomputation fails under the new tolerances.
    pub fn with_params(mut self, params: OffsetParams) -> Result<Self> {
        self.params = params;
        let (vertices, faces) = self.reconstruct(&self.deltas)?;
        self.vertices = vertices;
        self.faces = faces;
        Ok(self)
    }

    fn init(
        planes: Vec<Plane>,
        interior: Point3,
        params: OffsetParams,
        base_polygons: Option<Vec<Vec<Point3>>>,
        base_positions: Vec<Point3>,
        vertex_faces: Vec<Vec<usize>>,
    ) -> Result<Self> {
        let deltas = vec![0.0; planes.len()];
        let mut engine = Self {
            planes,
            interior,
            params,
            base_polygons: Vec::new(),
            base_positions,
            vertex_faces,
            deltas,
            vertices: Vec::new(),
            faces: ReconstructedFaces::default(),
        };
        let (vertices, faces) = engine.reconstruct(&engine.deltas)?;
        engine.vertices = vertices;
        engine.faces = faces;
        engine.base_polygons = match base_polygons {
            Some(polygons) => polygons,
            None => engine.face_polygons(),
        };
        Ok(engine)
    }

    /// Sets the offset of one face, or of every face when `face_index < 0`,
    /// and recomputes the offset polyhedron.
    ///
    /// Negative deltas are clamped to zero. On error the previous offsets
    /// and geometry are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if `delta` is not finite, `face_index` is out of
    /// range, or the half-space intersection fails.
    pub fn set_offset(&mut self, delta: f64, face_index: isize) -> Result<OffsetReport> {
        if !delta.is_finite() {
            return Err(OperationError::InvalidInput(format!("offset {delta} is not finite")).into());
        }
        let delta = delta.max(0.0);

        let mut deltas = self.deltas.clone();
        match usize::try_from(face_index) {
            Err(_) => deltas.fill(delta),
            Ok(index) => {
                let count = deltas.len();
                let slot = deltas
                    .get_mut(index)
                    .ok_or(OperationError::FaceIndexOutOfRange { index, count })?;
                *slot = delta;
            }
        }

        let (vertices, faces) = self.reconstruct(&deltas)?;
        self.deltas = deltas;
        self.vertices = vertices;
        self.faces = faces;
        Ok(self.report())
    }

    fn reconstruct(&self, deltas: &[f64]) -> Result<(Vec<Point3>, ReconstructedFaces)> {
        let planes: Vec<Plane> = self
            .planes
            .iter()
            .zip(deltas)
            .map(|(plane, &delta)| plane.offset(delta))
            .collect();
        let vertices = HalfSpaceIntersection::new(planes.clone(), self.interior)
            .with_params(self.params)
            .execute()?;
        let faces = FacePolygons::new(&planes, &vertices)
            .with_params(self.params)
            .execute();

        debug!(
            faces = planes.len(),
            vertices = vertices.len(),
            skipped = faces.skipped.len(),
            "offset polyhedron recomputed"
        );
        Ok((vertices, faces))
    }

    /// Summary of the current reconstruction.
    #[must_use]
    pub fn report(&self) -> OffsetReport {
        OffsetReport {
            vertex_count: self.vertices.len(),
            skipped_faces: self.faces.skipped.clone(),
        }
    }

    /// Number of faces (planes).
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.planes.len()
    }

    /// Number of vertices of the offset polyhedron.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertices of the offset polyhedron, in no particular order.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Current per-face offsets.
    #[must_use]
    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }

    /// Current offset of face `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn delta(&self, index: usize) -> Result<f64> {
        self.check_face(index)?;
        Ok(self.deltas[index])
    }

    /// The offset plane of face `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn offset_plane(&self, index: usize) -> Result<Plane> {
        self.check_face(index)?;
        Ok(self.planes[index].offset(self.deltas[index]))
    }

    /// Faces skipped by the last reconstruction.
    #[must_use]
    pub fn skipped_faces(&self) -> &[usize] {
        &self.faces.skipped
    }

    /// Number of faces skipped by the last reconstruction.
    #[must_use]
    pub fn skipped_face_count(&self) -> usize {
        self.faces.skipped.len()
    }

    /// Loop of indices into [`vertices`](Self::vertices) bounding face
    /// `index`, counter-clockwise seen from outside. Empty if skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn face_loop(&self, index: usize) -> Result<&[usize]> {
        self.check_face(index)?;
        Ok(&self.faces.polygons[index])
    }

    /// Polygon of face `index` on its offset plane. Empty if skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn face_polygon(&self, index: usize) -> Result<Vec<Point3>> {
        Ok(self
            .face_loop(index)?
            .iter()
            .map(|&v| self.vertices[v])
            .collect())
    }

    /// Polygons of all faces, in face order.
    #[must_use]
    pub fn face_polygons(&self) -> Vec<Vec<Point3>> {
        self.faces
            .polygons
            .iter()
            .map(|polygon| polygon.iter().map(|&v| self.vertices[v]).collect())
            .collect()
    }

    /// Original polygon of face `index` translated by `normal · delta`,
    /// without re-intersecting its neighbours.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn approximate_face_polygon(&self, index: usize) -> Result<Vec<Point3>> {
        self.check_face(index)?;
        let shift = self.planes[index].normal() * self.deltas[index];
        Ok(self.base_polygons[index]
            .iter()
            .map(|p| p + shift)
            .collect())
    }

    /// Centre of face `index`.
    ///
    /// With `with_offset` the centre of the
    /// [approximate polygon](Self::approximate_face_polygon) is returned;
    /// otherwise the mean of the exact polygon's vertices. A face with no
    /// polygon falls back to the foot of the interior point on its plane.
    ///
    /// # Errors
    ///
    /// Returns an error if the face index is out of range.
    pub fn face_centroid(&self, index: usize, with_offset: bool) -> Result<Point3> {
        let polygon = if with_offset {
            self.approximate_face_polygon(index)?
        } else {
            self.face_polygon(index)?
        };
        if polygon.is_empty() {
            let plane = self.offset_plane(index)?;
            return Ok(self.interior - plane.normal() * plane.signed_distance(&self.interior));
        }
        Ok(centroid(&polygon))
    }

    /// Offset position of input vertex `vertex` from its three incident
    /// planes alone, solving `N x = N p + δ`.
    ///
    /// Only exact when the vertex has valence 3; returns `None` for any
    /// other valence, for engines built with
    /// [`from_planes`](Self::from_planes), and for singular systems.
    #[must_use]
    pub fn closed_form_vertex(&self, vertex: usize) -> Option<Point3> {
        let ring = self.vertex_faces.get(vertex)?;
        let &[a, b, c] = ring.as_slice() else {
            return None;
        };
        let p = self.base_positions.get(vertex)?;
        let n = Matrix3::from_rows(&[
            self.planes[a].normal().transpose(),
            self.planes[b].normal().transpose(),
            self.planes[c].normal().transpose(),
        ]);
        if n.determinant().abs() < self.params.singular_tolerance {
            return None;
        }
        let rhs = n * p.coords + Vector3::new(self.deltas[a], self.deltas[b], self.deltas[c]);
        n.lu().solve(&rhs).map(Point3::from)
    }

    fn check_face(&self, index: usize) -> Result<()> {
        if index < self.planes.len() {
            Ok(())
        } else {
            Err(OperationError::FaceIndexOutOfRange {
                index,
                count: self.planes.len(),
            }
            .into())
        }
    }
}
