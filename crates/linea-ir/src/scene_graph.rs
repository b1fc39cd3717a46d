use std::collections::{HashMap, HashSet};

use linea_core::{BoundingBox, LineaError, LineaResult, ObjectId};

use crate::object::DrawableObject;

/// Animated presence of a visible object, kept apart from its natural style
/// so bindings can recompute the object without losing build-in or fade state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presence {
    /// Fraction of the build-in (create / write) revealed, 0.0–1.0.
    pub reveal: f64,
    /// Fade multiplier applied on top of the natural opacity, 0.0–1.0.
    pub fade: f64,
}

impl Presence {
    pub const FULL: Presence = Presence {
        reveal: 1.0,
        fade: 1.0,
    };
}

impl Default for Presence {
    fn default() -> Self {
        Presence::FULL
    }
}

/// A visible object and its presence.
#[derive(Debug, Clone)]
pub struct SceneEntry {
    pub object: DrawableObject,
    pub presence: Presence,
    seq: u64,
}

/// The live set of visible objects.
///
/// Membership changes are idempotent: adding a present object or removing
/// an absent one does nothing. The graph is only mutated between render
/// passes; all access goes through `&mut self`.
#[derive(Debug, Default)]
pub struct SceneGraph {
    entries: HashMap<ObjectId, SceneEntry>,
    next_seq: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add at full presence. Returns `false` if the object was already visible.
    pub fn add(&mut self, object: DrawableObject) -> bool {
        self.add_with(object, Presence::FULL)
    }

    pub fn add_with(&mut self, object: DrawableObject, presence: Presence) -> bool {
        if self.entries.contains_key(&object.id) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            object.id,
            SceneEntry {
                object,
                presence,
                seq,
            },
        );
        true
    }

    /// Remove a single object. Absent ids are a no-op.
    pub fn remove(&mut self, id: ObjectId) -> Option<DrawableObject> {
        self.entries.remove(&id).map(|e| e.object)
    }

    /// Remove an object and, for groups, every visible member recursively.
    pub fn remove_tree(&mut self, id: ObjectId) -> usize {
        let ids = self.subtree(id);
        ids.into_iter().filter(|i| self.remove(*i).is_some()).count()
    }

    /// Swap in a new state for a visible slot, keeping its order and presence.
    pub fn replace(&mut self, mut object: DrawableObject, slot: ObjectId) -> LineaResult<()> {
        let entry = self
            .entries
            .get_mut(&slot)
            .ok_or(LineaError::UnknownObject(slot))?;
        object.id = slot;
        entry.object = object;
        Ok(())
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&DrawableObject> {
        self.entries.get(&id).map(|e| &e.object)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut DrawableObject> {
        self.entries.get_mut(&id).map(|e| &mut e.object)
    }

    pub fn presence(&self, id: ObjectId) -> Option<Presence> {
        self.entries.get(&id).map(|e| e.presence)
    }

    pub fn presence_mut(&mut self, id: ObjectId) -> Option<&mut Presence> {
        self.entries.get_mut(&id).map(|e| &mut e.presence)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Visible objects for a rendering pass, ordered by z-index, then by
    /// the order they were added.
    pub fn current_members(&self) -> Vec<&SceneEntry> {
        let mut members: Vec<&SceneEntry> = self.entries.values().collect();
        members.sort_by_key(|e| (e.object.z_index, e.seq));
        members
    }

    /// `id` followed by all visible descendants (depth-first, member order).
    /// Missing members are skipped and cycles are cut.
    pub fn subtree(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.collect_subtree(id, &mut seen, &mut out);
        out
    }

    fn collect_subtree(&self, id: ObjectId, seen: &mut HashSet<ObjectId>, out: &mut Vec<ObjectId>) {
        if !seen.insert(id) {
            return;
        }
        let Some(obj) = self.get(id) else {
            return;
        };
        out.push(id);
        for member in obj.members() {
            self.collect_subtree(*member, seen, out);
        }
    }

    /// Bounding box of a visible object; for groups, the union of members.
    pub fn bounds_of(&self, id: ObjectId) -> Option<BoundingBox> {
        self.subtree(id)
            .into_iter()
            .filter_map(|i| self.get(i).and_then(|o| o.shape.bounds()))
            .reduce(|a, b| a.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linea_core::Point2D;

    #[test]
    fn test_add_is_idempotent() {
        let mut graph = SceneGraph::new();
        let dot = DrawableObject::point(Point2D::ORIGIN);
        assert!(graph.add(dot.clone()));
        assert!(!graph.add(dot.clone()));
        assert_eq!(graph.current_members().len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut graph = SceneGraph::new();
        let dot = DrawableObject::point(Point2D::ORIGIN);
        let id = dot.id;
        graph.add(dot);
        assert!(graph.remove(id).is_some());
        assert!(graph.remove(id).is_none());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_members_ordered_by_z_then_insertion() {
        let mut graph = SceneGraph::new();
        let top = DrawableObject::text("label", Point2D::ORIGIN).with_z_index(1);
        let a = DrawableObject::point(Point2D::ORIGIN);
        let b = DrawableObject::point(Point2D::UP);
        let (top_id, a_id, b_id) = (top.id, a.id, b.id);
        graph.add(top);
        graph.add(a);
        graph.add(b);
        let order: Vec<ObjectId> = graph.current_members().iter().map(|e| e.object.id).collect();
        assert_eq!(order, vec![a_id, b_id, top_id]);
    }

    #[test]
    fn test_group_bounds_union_members() {
        let mut graph = SceneGraph::new();
        let a = DrawableObject::line(Point2D::new(-1.0, 0.0), Point2D::ORIGIN);
        let b = DrawableObject::line(Point2D::ORIGIN, Point2D::new(2.0, 3.0));
        let group = DrawableObject::group(vec![a.id, b.id]);
        let gid = group.id;
        graph.add(a);
        graph.add(b);
        graph.add(group);
        let bb = graph.bounds_of(gid).unwrap();
        assert_eq!(bb.min, Point2D::new(-1.0, 0.0));
        assert_eq!(bb.max, Point2D::new(2.0, 3.0));
    }

    #[test]
    fn test_remove_tree_fans_out_and_survives_cycles() {
        let mut graph = SceneGraph::new();
        let dot = DrawableObject::point(Point2D::ORIGIN);
        let mut inner = DrawableObject::group(vec![dot.id]);
        let outer = DrawableObject::group(vec![inner.id]);
        // Deliberately cyclic membership.
        inner.shape = crate::object::Shape::Group {
            members: vec![dot.id, outer.id],
        };
        let outer_id = outer.id;
        graph.add(dot);
        graph.add(inner);
        graph.add(outer);
        assert_eq!(graph.remove_tree(outer_id), 3);
        assert!(graph.is_empty());
        assert_eq!(graph.remove_tree(outer_id), 0);
    }

    #[test]
    fn test_replace_keeps_slot_and_presence() {
        let mut graph = SceneGraph::new();
        let dot = DrawableObject::point(Point2D::ORIGIN);
        let id = dot.id;
        graph.add_with(dot, Presence { reveal: 0.5, fade: 0.25 });
        graph
            .replace(DrawableObject::point(Point2D::UP), id)
            .unwrap();
        assert_eq!(graph.get(id).unwrap().id, id);
        assert_eq!(graph.presence(id).unwrap().fade, 0.25);
        assert!(graph
            .replace(DrawableObject::point(Point2D::UP), ObjectId(u64::MAX))
            .is_err());
    }
}
