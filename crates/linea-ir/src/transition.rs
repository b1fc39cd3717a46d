use serde::{Deserialize, Serialize};

use linea_core::{Color, ObjectId, TrackerId};

/// A style property animated by a property change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StyleProperty {
    Color(Color),
    StrokeWidth(f64),
    Opacity(f64),
}

/// What happens to the source identity when a transform completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TransformMode {
    /// The source is retired and the target identity stays visible.
    #[default]
    Replace,
    /// The source identity stays visible with the target's final state.
    InPlace,
}

/// One primitive visual transition inside an animation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Transition {
    /// Reveal a declared object along its path.
    Create(ObjectId),
    /// Reveal text by characters; same geometry handling as `Create`.
    Write(ObjectId),
    FadeIn(ObjectId),
    /// Fade to transparent, then remove from the scene graph.
    FadeOut(ObjectId),
    Transform {
        source: ObjectId,
        target: ObjectId,
        mode: TransformMode,
    },
    /// Move a tracker to `to`; every binding follows frame by frame.
    ValueChange { tracker: TrackerId, to: f64 },
    PropertyChange {
        target: ObjectId,
        property: StyleProperty,
    },
    /// Instant insertion at step start.
    Add(ObjectId),
    /// Instant removal at step end. Removing an absent object is a no-op.
    Remove(ObjectId),
}

impl Transition {
    pub fn replace(source: ObjectId, target: ObjectId) -> Self {
        Transition::Transform {
            source,
            target,
            mode: TransformMode::Replace,
        }
    }

    pub fn morph(source: ObjectId, target: ObjectId) -> Self {
        Transition::Transform {
            source,
            target,
            mode: TransformMode::InPlace,
        }
    }

    pub fn set_value(tracker: TrackerId, to: f64) -> Self {
        Transition::ValueChange { tracker, to }
    }

    pub fn set_color(target: ObjectId, color: Color) -> Self {
        Transition::PropertyChange {
            target,
            property: StyleProperty::Color(color),
        }
    }

    pub fn set_stroke_width(target: ObjectId, width: f64) -> Self {
        Transition::PropertyChange {
            target,
            property: StyleProperty::StrokeWidth(width),
        }
    }

    /// Add / Remove happen at a step boundary and take no part in timing.
    pub fn is_instant(&self) -> bool {
        matches!(self, Transition::Add(_) | Transition::Remove(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transition::Create(_) => "create",
            Transition::Write(_) => "write",
            Transition::FadeIn(_) => "fade-in",
            Transition::FadeOut(_) => "fade-out",
            Transition::Transform { .. } => "transform",
            Transition::ValueChange { .. } => "value-change",
            Transition::PropertyChange { .. } => "property-change",
            Transition::Add(_) => "add",
            Transition::Remove(_) => "remove",
        }
    }

    /// Every object identity the transition mentions.
    pub fn objects(&self) -> Vec<ObjectId> {
        match self {
            Transition::Create(id)
            | Transition::Write(id)
            | Transition::FadeIn(id)
            | Transition::FadeOut(id)
            | Transition::Add(id)
            | Transition::Remove(id) => vec![*id],
            Transition::Transform { source, target, .. } => vec![*source, *target],
            Transition::PropertyChange { target, .. } => vec![*target],
            Transition::ValueChange { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_transitions() {
        assert!(Transition::Add(ObjectId(1)).is_instant());
        assert!(Transition::Remove(ObjectId(1)).is_instant());
        assert!(!Transition::FadeOut(ObjectId(1)).is_instant());
    }

    #[test]
    fn test_objects_listed() {
        let t = Transition::replace(ObjectId(1), ObjectId(2));
        assert_eq!(t.objects(), vec![ObjectId(1), ObjectId(2)]);
        assert_eq!(t.name(), "transform");
        assert!(Transition::set_value(TrackerId(1), 2.0).objects().is_empty());
    }
}
