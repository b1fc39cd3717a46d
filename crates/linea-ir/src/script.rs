use std::collections::HashMap;

use linea_core::{LineaResult, ObjectId};

use crate::binding::BindingRegistry;
use crate::object::DrawableObject;
use crate::timeline::Timeline;
use crate::tracker::TrackerTable;

/// Everything a runner needs for one playback: declared objects, trackers,
/// bindings and the timeline that choreographs them.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub name: String,
    pub declarations: HashMap<ObjectId, DrawableObject>,
    pub trackers: TrackerTable,
    pub bindings: BindingRegistry,
    pub timeline: Timeline,
}

impl Script {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A declared object, or a bound slot.
    pub fn is_declared(&self, id: ObjectId) -> bool {
        self.declarations.contains_key(&id) || self.bindings.is_bound(id)
    }

    pub fn declaration(&self, id: ObjectId) -> Option<&DrawableObject> {
        self.declarations.get(&id)
    }

    /// Collapse several scripts into one ordered timeline played by a
    /// single runner. Identities are process-unique, so merging never clashes.
    pub fn chain(name: impl Into<String>, scripts: impl IntoIterator<Item = Script>) -> LineaResult<Script> {
        let mut out = Script::new(name);
        for script in scripts {
            tracing::debug!(clip = %script.name, steps = script.timeline.len(), "chaining clip");
            out.declarations.extend(script.declarations);
            out.trackers.merge(script.trackers);
            out.bindings.merge(script.bindings)?;
            out.timeline.append(script.timeline);
        }
        Ok(out)
    }
}
