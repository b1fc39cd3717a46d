//! Parametric bindings: objects whose geometry is a pure function of tracker
//! values.
//!
//! Each binding is an explicit dependency edge from its trackers to a slot
//! identity. The scheduler calls [`BindingRegistry::refresh`] before every
//! rendered frame, so a bound line follows its slope tracker even while an
//! unrelated transition is the one driving the step.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use linea_core::{LineaError, LineaResult, ObjectId, TrackerId};

use crate::object::DrawableObject;
use crate::scene_graph::SceneGraph;
use crate::tracker::TrackerTable;

/// Recompute function. Receives tracker values in declared dependency order.
pub type BindFn = Arc<dyn Fn(&[f64]) -> DrawableObject>;

#[derive(Clone)]
pub struct Binding {
    pub slot: ObjectId,
    pub deps: Vec<TrackerId>,
    func: BindFn,
}

impl Binding {
    pub fn evaluate(&self, trackers: &TrackerTable) -> LineaResult<DrawableObject> {
        let values = trackers.snapshot(&self.deps)?;
        let mut obj = (self.func)(&values);
        obj.id = self.slot;
        Ok(obj)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("slot", &self.slot)
            .field("deps", &self.deps)
            .finish_non_exhaustive()
    }
}

/// Registered bindings in registration order.
#[derive(Debug, Clone, Default)]
pub struct BindingRegistry {
    bindings: Vec<Binding>,
    edges: HashMap<TrackerId, Vec<ObjectId>>,
    strict: bool,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict registries reject a second binding for the same slot.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn bind<F>(&mut self, slot: ObjectId, deps: &[TrackerId], func: F) -> LineaResult<()>
    where
        F: Fn(&[f64]) -> DrawableObject + 'static,
    {
        self.register(Binding {
            slot,
            deps: deps.to_vec(),
            func: Arc::new(func),
        })
    }

    fn register(&mut self, binding: Binding) -> LineaResult<()> {
        if self.is_bound(binding.slot) {
            if self.strict {
                return Err(LineaError::RebindConflict(binding.slot));
            }
            tracing::debug!(slot = %binding.slot, "rebinding slot, later registration wins");
        }
        for dep in &binding.deps {
            let slots = self.edges.entry(*dep).or_default();
            if !slots.contains(&binding.slot) {
                slots.push(binding.slot);
            }
        }
        self.bindings.push(binding);
        Ok(())
    }

    pub fn is_bound(&self, slot: ObjectId) -> bool {
        self.bindings.iter().any(|b| b.slot == slot)
    }

    /// Every bound slot, once, in first registration order.
    pub fn slots(&self) -> Vec<ObjectId> {
        let mut slots = Vec::new();
        for b in &self.bindings {
            if !slots.contains(&b.slot) {
                slots.push(b.slot);
            }
        }
        slots
    }

    /// The first slot with more than one binding, if any.
    pub fn first_conflict(&self) -> Option<ObjectId> {
        self.bindings
            .iter()
            .enumerate()
            .find(|(i, b)| self.bindings[..*i].iter().any(|p| p.slot == b.slot))
            .map(|(_, b)| b.slot)
    }

    /// Slots whose geometry depends on `tracker`.
    pub fn dependents_of(&self, tracker: TrackerId) -> &[ObjectId] {
        self.edges.get(&tracker).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Trackers a slot reads, across all of its bindings.
    pub fn dependencies_of(&self, slot: ObjectId) -> Vec<TrackerId> {
        let mut deps = Vec::new();
        for b in self.bindings.iter().filter(|b| b.slot == slot) {
            for d in &b.deps {
                if !deps.contains(d) {
                    deps.push(*d);
                }
            }
        }
        deps
    }

    /// Evaluate the winning (last registered) binding for `slot`.
    pub fn evaluate(&self, slot: ObjectId, trackers: &TrackerTable) -> LineaResult<Option<DrawableObject>> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.slot == slot)
            .map(|b| b.evaluate(trackers))
            .transpose()
    }

    /// Re-evaluate every binding whose slot is visible and write the result
    /// into the graph, in registration order so the last writer wins.
    /// Returns the number of evaluations.
    pub fn refresh(&self, graph: &mut SceneGraph, trackers: &TrackerTable) -> LineaResult<usize> {
        let mut evaluated = 0;
        for binding in &self.bindings {
            if !graph.contains(binding.slot) {
                continue;
            }
            let obj = binding.evaluate(trackers)?;
            graph.replace(obj, binding.slot)?;
            evaluated += 1;
        }
        Ok(evaluated)
    }

    /// Take over every binding of `other`, after the existing ones.
    pub fn merge(&mut self, other: BindingRegistry) -> LineaResult<()> {
        for binding in other.bindings {
            self.register(binding)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Shape;
    use linea_core::Point2D;

    fn line_through(m: f64, b: f64) -> DrawableObject {
        DrawableObject::line(Point2D::new(-1.0, -m + b), Point2D::new(1.0, m + b))
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let mut trackers = TrackerTable::new();
        let m = trackers.create("m", 0.8);
        let b = trackers.create("b", 1.5);
        let slot = ObjectId::fresh();
        let mut reg = BindingRegistry::new();
        reg.bind(slot, &[m, b], |v| line_through(v[0], v[1])).unwrap();

        trackers.set(m, 1.3).unwrap();
        let first = reg.evaluate(slot, &trackers).unwrap().unwrap();
        trackers.set(m, 1.3).unwrap();
        let second = reg.evaluate(slot, &trackers).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.id, slot);
    }

    #[test]
    fn test_refresh_only_touches_visible_slots() {
        let mut trackers = TrackerTable::new();
        let m = trackers.create("m", 1.0);
        let visible = ObjectId::fresh();
        let hidden = ObjectId::fresh();
        let mut reg = BindingRegistry::new();
        reg.bind(visible, &[m], |v| line_through(v[0], 0.0)).unwrap();
        reg.bind(hidden, &[m], |v| line_through(v[0], 0.0)).unwrap();

        let mut graph = SceneGraph::new();
        let mut initial = reg.evaluate(visible, &trackers).unwrap().unwrap();
        initial.id = visible;
        graph.add(initial);

        trackers.set(m, 2.0).unwrap();
        assert_eq!(reg.refresh(&mut graph, &trackers).unwrap(), 1);
        match &graph.get(visible).unwrap().shape {
            Shape::Line { end, .. } => assert_eq!(end.y, 2.0),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!graph.contains(hidden));
    }

    #[test]
    fn test_last_writer_wins() {
        let trackers = TrackerTable::new();
        let slot = ObjectId::fresh();
        let mut reg = BindingRegistry::new();
        reg.bind(slot, &[], |_| DrawableObject::text("first", Point2D::ORIGIN)).unwrap();
        reg.bind(slot, &[], |_| DrawableObject::text("second", Point2D::ORIGIN)).unwrap();

        let mut graph = SceneGraph::new();
        let mut seed = DrawableObject::text("", Point2D::ORIGIN);
        seed.id = slot;
        graph.add(seed);
        reg.refresh(&mut graph, &trackers).unwrap();
        assert_eq!(graph.get(slot).unwrap().text_content(), Some("second"));
        assert_eq!(
            reg.evaluate(slot, &trackers).unwrap().unwrap().text_content(),
            Some("second")
        );
    }

    #[test]
    fn test_strict_mode_rejects_rebind() {
        let slot = ObjectId::fresh();
        let mut reg = BindingRegistry::strict();
        reg.bind(slot, &[], |_| DrawableObject::point(Point2D::ORIGIN)).unwrap();
        let err = reg
            .bind(slot, &[], |_| DrawableObject::point(Point2D::UP))
            .unwrap_err();
        assert!(matches!(err, LineaError::RebindConflict(s) if s == slot));
    }

    #[test]
    fn test_first_conflict() {
        let slot = ObjectId::fresh();
        let mut reg = BindingRegistry::new();
        reg.bind(slot, &[], |_| DrawableObject::point(Point2D::ORIGIN)).unwrap();
        assert_eq!(reg.first_conflict(), None);
        reg.bind(slot, &[], |_| DrawableObject::point(Point2D::UP)).unwrap();
        assert_eq!(reg.first_conflict(), Some(slot));
        assert_eq!(reg.slots(), vec![slot]);
    }

    #[test]
    fn test_dependency_edges() {
        let mut trackers = TrackerTable::new();
        let m = trackers.create("m", 1.0);
        let b = trackers.create("b", 0.0);
        let line = ObjectId::fresh();
        let label = ObjectId::fresh();
        let mut reg = BindingRegistry::new();
        reg.bind(line, &[m, b], |v| line_through(v[0], v[1])).unwrap();
        reg.bind(label, &[m], |v| DrawableObject::text(format!("{:.2}", v[0]), Point2D::ORIGIN))
            .unwrap();
        assert_eq!(reg.dependents_of(m), &[line, label]);
        assert_eq!(reg.dependents_of(b), &[line]);
        assert_eq!(reg.dependencies_of(line), vec![m, b]);
    }

    #[test]
    fn test_unknown_dependency_surfaces() {
        let trackers = TrackerTable::new();
        let slot = ObjectId::fresh();
        let mut reg = BindingRegistry::new();
        reg.bind(slot, &[TrackerId(u64::MAX)], |_| DrawableObject::point(Point2D::ORIGIN))
            .unwrap();
        assert!(matches!(
            reg.evaluate(slot, &trackers),
            Err(LineaError::UnknownTracker(_))
        ));
    }
}
