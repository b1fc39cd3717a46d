use std::collections::HashSet;

use linea_core::LineaError;

use crate::script::Script;
use crate::transition::{StyleProperty, Transition};

/// Validate a Script for structural correctness before it is run.
///
/// This is a static pass: it cannot know which objects will be visible at a
/// given step, so presence checks are left to the scheduler.
pub fn validate_script(script: &Script) -> Result<(), Vec<LineaError>> {
    let mut errors = Vec::new();

    if script.timeline.is_empty() {
        errors.push(LineaError::Validation(format!(
            "script '{}' has an empty timeline",
            script.name
        )));
    }

    // Group membership
    for object in script.declarations.values() {
        for member in object.members() {
            if !script.is_declared(*member) {
                errors.push(LineaError::Validation(format!(
                    "group {} has undeclared member {}",
                    object.id, member
                )));
            }
        }
    }

    // Binding dependencies
    for slot in script.bindings.slots() {
        for tracker in script.bindings.dependencies_of(slot) {
            if !script.trackers.contains(tracker) {
                errors.push(LineaError::UnknownTracker(tracker));
            }
        }
    }

    for (index, step) in script.timeline.steps.iter().enumerate() {
        if !step.lag_ratio.is_finite() || step.lag_ratio < 0.0 {
            errors.push(LineaError::InvalidStep(format!(
                "step {} has lag ratio {}",
                index, step.lag_ratio
            )));
        }

        let timed = step.transitions.iter().any(|t| !t.is_instant());
        if timed && step.duration.is_zero() {
            errors.push(LineaError::InvalidStep(format!(
                "step {} has timed transitions but zero duration",
                index
            )));
        }

        // A tracker has a single writer at any time.
        let mut moved = HashSet::new();
        for transition in &step.transitions {
            check_transition(script, index, transition, &mut errors);
            if let Transition::ValueChange { tracker, .. } = transition {
                if !moved.insert(*tracker) {
                    errors.push(LineaError::InvalidStep(format!(
                        "step {} moves {} more than once",
                        index, tracker
                    )));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_transition(
    script: &Script,
    index: usize,
    transition: &Transition,
    errors: &mut Vec<LineaError>,
) {
    // Removing something that was never there is a no-op.
    if !matches!(transition, Transition::Remove(_)) {
        for id in transition.objects() {
            if !script.is_declared(id) {
                errors.push(LineaError::UnknownObject(id));
            }
        }
    }

    match transition {
        Transition::ValueChange { tracker, to } => {
            if !script.trackers.contains(*tracker) {
                errors.push(LineaError::UnknownTracker(*tracker));
            }
            if !to.is_finite() {
                errors.push(LineaError::InvalidStep(format!(
                    "step {} moves {} to non-finite value {}",
                    index, tracker, to
                )));
            }
        }
        Transition::PropertyChange { target, property } => {
            let value = match property {
                StyleProperty::StrokeWidth(w) => Some(*w),
                StyleProperty::Opacity(o) => Some(*o),
                StyleProperty::Color(_) => None,
            };
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                errors.push(LineaError::InvalidStep(format!(
                    "step {} sets an invalid property on {}",
                    index, target
                )));
            }
        }
        _ => {}
    }
}
