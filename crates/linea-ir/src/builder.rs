use linea_core::{LineaResult, ObjectId, TrackerId};

use crate::object::DrawableObject;
use crate::script::Script;
use crate::step::AnimationStep;
use crate::transition::Transition;

/// A builder for assembling a [`Script`] the way a lesson is narrated:
/// declare objects, then play steps and waits in order.
pub struct ScriptBuilder {
    script: Script,
}

impl ScriptBuilder {
    /// Binding strictness starts from the process-wide configuration.
    pub fn new(name: impl Into<String>) -> Self {
        let mut script = Script::new(name);
        script
            .bindings
            .set_strict(linea_core::config::global().binding.strict);
        Self { script }
    }

    /// Reject conflicting bindings instead of letting the later one win.
    pub fn strict(mut self, strict: bool) -> Self {
        self.script.bindings.set_strict(strict);
        self
    }

    /// Declare an object for later steps and return its identity.
    pub fn declare(&mut self, object: DrawableObject) -> ObjectId {
        let id = object.id;
        self.script.declarations.insert(id, object);
        id
    }

    pub fn declare_all(&mut self, objects: impl IntoIterator<Item = DrawableObject>) -> Vec<ObjectId> {
        objects.into_iter().map(|o| self.declare(o)).collect()
    }

    /// Declare a group over already declared (or bound) members.
    pub fn group(&mut self, members: &[ObjectId]) -> ObjectId {
        self.declare(DrawableObject::group(members.to_vec()))
    }

    pub fn tracker(&mut self, name: impl Into<String>, value: f64) -> TrackerId {
        self.script.trackers.create(name, value)
    }

    /// Declare a live object recomputed from `deps` before every frame.
    pub fn bind<F>(&mut self, deps: &[TrackerId], func: F) -> LineaResult<ObjectId>
    where
        F: Fn(&[f64]) -> DrawableObject + 'static,
    {
        let slot = ObjectId::fresh();
        self.bind_slot(slot, deps, func)?;
        Ok(slot)
    }

    /// Bind (or rebind) an explicit slot.
    pub fn bind_slot<F>(&mut self, slot: ObjectId, deps: &[TrackerId], func: F) -> LineaResult<()>
    where
        F: Fn(&[f64]) -> DrawableObject + 'static,
    {
        self.script.bindings.bind(slot, deps, func)
    }

    /// Look at a declaration, e.g. to position a label next to it.
    pub fn get(&self, id: ObjectId) -> Option<&DrawableObject> {
        self.script.declaration(id)
    }

    pub fn play(&mut self, step: AnimationStep) -> &mut Self {
        self.script.timeline.push(step);
        self
    }

    /// Play a single transition over `seconds`.
    pub fn play_one(&mut self, transition: Transition, seconds: f64) -> &mut Self {
        self.play(AnimationStep::new(seconds).with(transition))
    }

    /// Instantly put objects on screen.
    pub fn add(&mut self, ids: &[ObjectId]) -> &mut Self {
        self.play(AnimationStep::new(0.0).with_all(ids.iter().map(|id| Transition::Add(*id))))
    }

    /// Instantly take objects off screen.
    pub fn remove(&mut self, ids: &[ObjectId]) -> &mut Self {
        self.play(AnimationStep::new(0.0).with_all(ids.iter().map(|id| Transition::Remove(*id))))
    }

    pub fn wait(&mut self, seconds: f64) -> &mut Self {
        self.play(AnimationStep::wait(seconds))
    }

    pub fn build(self) -> Script {
        self.script
    }
}
