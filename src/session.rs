use std::collections::BTreeSet;

use slotmap::SlotMap;
use tracing::debug;

use crate::error::{OperationError, Result, TopologyError};
use crate::mesh::Mesh;
use crate::operations::offset::{OffsetEngine, OffsetReport};
use crate::topology::Topology;

slotmap::new_key_type! {
    /// Unique identifier for an object loaded into a session.
    pub struct ObjectId;
}

/// A loaded mesh together with its topology and offset state.
#[derive(Debug, Clone)]
pub struct SessionObject {
    mesh: Mesh,
    topology: Topology,
    engine: OffsetEngine,
}

impl SessionObject {
    /// The input mesh.
    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// The mesh's oriented adjacency.
    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The offset engine bound to the mesh.
    #[must_use]
    pub fn engine(&self) -> &OffsetEngine {
        &self.engine
    }

    /// Mutable access to the offset engine.
    pub fn engine_mut(&mut self) -> &mut OffsetEngine {
        &mut self.engine
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hover {
    object: ObjectId,
    face: usize,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    hover: Hover,
    start: f64,
    all_faces: bool,
}

/// Explicit editing state: loaded objects, the selection and the face
/// offset manipulator.
///
/// Every change that affects what a viewer would draw bumps
/// [`generation`](Self::generation).
#[derive(Debug, Default)]
pub struct Session {
    objects: SlotMap<ObjectId, SessionObject>,
    selection: BTreeSet<ObjectId>,
    hover: Option<Hover>,
    drag: Option<Drag>,
    generation: u64,
}

impl Session {
    /// Creates a new, empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter bumped on every visible state change.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn touch(&mut self) {
        self.generation += 1;
    }

    // --- Objects ---

    /// Builds the topology and a zero-offset engine for `mesh` and adds it.
    ///
    /// # Errors
    ///
    /// Returns an error if the topology or the offset engine cannot be built.
    pub fn add_object(&mut self, mesh: Mesh) -> Result<ObjectId> {
        let topology = Topology::build(&mesh)?;
        let engine = OffsetEngine::new(&mesh, &topology)?;
        let id = self.objects.insert(SessionObject {
            mesh,
            topology,
            engine,
        });
        debug!(?id, objects = self.objects.len(), "object added");
        self.touch();
        Ok(id)
    }

    /// Removes an object, dropping it from the selection and the manipulator.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<SessionObject> {
        let removed = self.objects.remove(id)?;
        self.selection.remove(&id);
        if self.hover.is_some_and(|h| h.object == id) {
            self.hover = None;
            self.drag = None;
        }
        self.touch();
        Some(removed)
    }

    /// Removes every object.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.selection.clear();
        self.hover = None;
        self.drag = None;
        self.touch();
    }

    /// Number of loaded objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if no object is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// IDs of all loaded objects.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys()
    }

    /// Returns a reference to the object, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not in the session.
    pub fn object(&self, id: ObjectId) -> Result<&SessionObject> {
        self.objects
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("object".into()).into())
    }

    /// Returns a mutable reference to the object, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not in the session.
    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut SessionObject> {
        self.objects
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("object".into()).into())
    }

    // --- Selection ---

    /// Adds objects to the selection, returning how many were newly added.
    /// Unknown IDs are ignored.
    pub fn select(&mut self, ids: &[ObjectId]) -> usize {
        let mut added = 0;
        for &id in ids {
            if self.objects.contains_key(id) && self.selection.insert(id) {
                added += 1;
            }
        }
        if added > 0 {
            self.touch();
        }
        added
    }

    /// Flips the selection state of each object, returning how many changed.
    pub fn toggle(&mut self, ids: &[ObjectId]) -> usize {
        let requested: BTreeSet<ObjectId> = ids
            .iter()
            .copied()
            .filter(|&id| self.objects.contains_key(id))
            .collect();
        for id in &requested {
            if !self.selection.remove(id) {
                self.selection.insert(*id);
            }
        }
        if !requested.is_empty() {
            self.touch();
        }
        requested.len()
    }

    /// Removes objects from the selection, returning how many were selected.
    pub fn deselect(&mut self, ids: &[ObjectId]) -> usize {
        let removed = ids.iter().filter(|id| self.selection.remove(id)).count();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    /// Replaces the selection, returning how many objects changed state.
    pub fn set_selection(&mut self, ids: &[ObjectId]) -> usize {
        let wanted: BTreeSet<ObjectId> = ids
            .iter()
            .copied()
            .filter(|&id| self.objects.contains_key(id))
            .collect();
        let changed = self.selection.symmetric_difference(&wanted).count();
        self.selection = wanted;
        if changed > 0 {
            self.touch();
        }
        changed
    }

    /// Clears the selection, returning how many objects were selected.
    pub fn deselect_all(&mut self) -> usize {
        let count = self.selection.len();
        self.selection.clear();
        if count > 0 {
            self.touch();
        }
        count
    }

    /// Returns `true` if the object is selected.
    #[must_use]
    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selection.contains(&id)
    }

    /// Selected objects, in a stable order.
    pub fn selection(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.selection.iter().copied()
    }

    // --- Offset manipulator ---

    /// Sets the face under the cursor. A negative `face` clears the hover.
    ///
    /// Ignored while a drag is in progress. Returns `true` if the hovered
    /// face changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is unknown or `face` is out of range.
    pub fn hover(&mut self, id: ObjectId, face: isize) -> Result<bool> {
        if self.drag.is_some() {
            return Ok(false);
        }
        let next = match usize::try_from(face) {
            Err(_) => None,
            Ok(face) => {
                let count = self.object(id)?.engine.face_count();
                if face >= count {
                    return Err(OperationError::FaceIndexOutOfRange { index: face, count }.into());
                }
                Some(Hover { object: id, face })
            }
        };
        if next == self.hover {
            return Ok(false);
        }
        self.hover = next;
        self.touch();
        Ok(true)
    }

    /// The hovered object and face, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<(ObjectId, usize)> {
        self.hover.map(|h| (h.object, h.face))
    }

    /// Starts dragging the hovered face, remembering its current offset.
    ///
    /// With `all_faces` every face of the object follows the drag.
    ///
    /// # Errors
    ///
    /// Returns an error if no face is hovered.
    pub fn begin_drag(&mut self, all_faces: bool) -> Result<()> {
        let hover = self
            .hover
            .ok_or_else(|| OperationError::InvalidInput("no face is hovered".into()))?;
        let start = self.object(hover.object)?.engine.delta(hover.face)?;
        self.drag = Some(Drag {
            hover,
            start,
            all_faces,
        });
        Ok(())
    }

    /// Sets the dragged offset to the starting offset plus `amount`,
    /// clamped at zero, and recomputes the object's offset polyhedron.
    ///
    /// # Errors
    ///
    /// Returns an error if no drag is in progress or the recomputation fails.
    pub fn drag_to(&mut self, amount: f64) -> Result<OffsetReport> {
        let drag = self
            .drag
            .ok_or_else(|| OperationError::InvalidInput("no drag in progress".into()))?;
        let delta = (drag.start + amount).max(0.0);
        let face_index = if drag.all_faces {
            -1
        } else {
            isize::try_from(drag.hover.face)
                .map_err(|_| OperationError::InvalidInput("face index overflows isize".into()))?
        };
        let report = self
            .object_mut(drag.hover.object)?
            .engine
            .set_offset(delta, face_index)?;
        self.touch();
        Ok(report)
    }

    /// Finishes the drag. Returns `false` if none was in progress.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Returns `true` while a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::FacetError;
    use crate::math::Point3;
    use crate::operations::creation::{MakeBox, MakeTetrahedron};
    use approx::assert_relative_eq;

    fn cube() -> Mesh {
        MakeBox::new(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5))
            .execute()
            .unwrap()
    }

    fn session_with_two() -> (Session, ObjectId, ObjectId) {
        let mut session = Session::new();
        let a = session.add_object(cube()).unwrap();
        let b = session
            .add_object(MakeTetrahedron::new(Point3::origin(), 1.0).execute().unwrap())
            .unwrap();
        (session, a, b)
    }

    #[test]
    fn ids_are_not_reused() {
        let mut session = Session::new();
        let a = session.add_object(cube()).unwrap();
        session.remove_object(a).unwrap();
        let b = session.add_object(cube()).unwrap();

        assert_ne!(a, b);
        assert!(session.object(a).is_err());
        assert!(session.object(b).is_ok());
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn open_mesh_is_rejected() {
        let mesh = cube();
        let mut faces = mesh.faces().to_vec();
        let mut normals = mesh.normals().to_vec();
        faces.pop();
        normals.pop();
        let open = Mesh::new(mesh.positions().to_vec(), faces, normals).unwrap();

        let mut session = Session::new();
        let err = session.add_object(open).unwrap_err();
        assert!(matches!(err, FacetError::Topology(_)));
        assert!(session.is_empty());
    }

    #[test]
    fn select_counts_new_objects() {
        let (mut session, a, b) = session_with_two();
        assert_eq!(session.select(&[a]), 1);
        assert_eq!(session.select(&[a, b]), 1);
        assert!(session.is_selected(a) && session.is_selected(b));
        assert_eq!(session.deselect_all(), 2);
        assert_eq!(session.selection().count(), 0);
    }

    #[test]
    fn toggle_counts_changes() {
        let (mut session, a, b) = session_with_two();
        session.select(&[a]);
        assert_eq!(session.toggle(&[a, b]), 2);
        assert!(!session.is_selected(a));
        assert!(session.is_selected(b));
    }

    #[test]
    fn set_selection_and_deselect() {
        let (mut session, a, b) = session_with_two();
        session.select(&[a]);
        assert_eq!(session.set_selection(&[b]), 2);
        assert_eq!(session.selection().collect::<Vec<_>>(), vec![b]);
        assert_eq!(session.deselect(&[a, b]), 1);
    }

    #[test]
    fn removed_object_leaves_selection() {
        let (mut session, a, b) = session_with_two();
        session.select(&[a, b]);
        session.remove_object(a);
        assert_eq!(session.selection().collect::<Vec<_>>(), vec![b]);
        assert_eq!(session.select(&[a]), 0);
    }

    #[test]
    fn generation_tracks_visible_changes() {
        let (mut session, a, _) = session_with_two();
        let g = session.generation();
        session.select(&[a]);
        assert_eq!(session.generation(), g + 1);
        session.select(&[a]);
        assert_eq!(session.generation(), g + 1);
        session.hover(a, 2).unwrap();
        assert_eq!(session.generation(), g + 2);
    }

    #[test]
    fn drag_offsets_hovered_face() {
        let (mut session, a, _) = session_with_two();
        assert!(session.hover(a, 3).unwrap());
        session.begin_drag(false).unwrap();

        session.drag_to(0.4).unwrap();
        session.drag_to(0.25).unwrap();
        assert!(session.end_drag());

        let engine = session.object(a).unwrap().engine();
        assert_relative_eq!(engine.delta(3).unwrap(), 0.25);
        assert_relative_eq!(engine.delta(2).unwrap(), 0.0);

        // A second drag starts from the stored offset and clamps at zero.
        session.begin_drag(false).unwrap();
        session.drag_to(-1.0).unwrap();
        session.end_drag();
        assert_relative_eq!(session.object(a).unwrap().engine().delta(3).unwrap(), 0.0);
    }

    #[test]
    fn drag_all_faces() {
        let (mut session, a, _) = session_with_two();
        session.hover(a, 0).unwrap();
        session.begin_drag(true).unwrap();
        let report = session.drag_to(0.1).unwrap();
        session.end_drag();

        assert_eq!(report.vertex_count, 8);
        for &delta in session.object(a).unwrap().engine().deltas() {
            assert_relative_eq!(delta, 0.1);
        }
    }

    #[test]
    fn hover_validation() {
        let (mut session, a, _) = session_with_two();
        assert!(session.hover(a, 6).is_err());
        assert!(!session.hover(a, -1).unwrap());
        assert!(session.begin_drag(false).is_err());
        assert!(session.drag_to(0.1).is_err());

        session.hover(a, 1).unwrap();
        session.begin_drag(false).unwrap();
        // Hover is frozen during a drag.
        assert!(!session.hover(a, 2).unwrap());
        assert_eq!(session.hovered(), Some((a, 1)));
    }
}
