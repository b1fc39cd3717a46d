use serde::{Deserialize, Serialize};

use linea_core::Duration;

use crate::step::AnimationStep;

/// Ordered animation steps. Steps run strictly one after another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub steps: Vec<AnimationStep>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: AnimationStep) {
        self.steps.push(step);
    }

    /// Append all steps of `other` after this timeline's steps.
    pub fn append(&mut self, other: Timeline) {
        self.steps.extend(other.steps);
    }

    /// Sum of every step's interpolation time and pause.
    pub fn total_duration(&self) -> Duration {
        self.steps
            .iter()
            .fold(Duration::zero(), |acc, s| acc + s.total())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
