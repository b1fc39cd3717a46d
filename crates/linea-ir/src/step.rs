use serde::{Deserialize, Serialize};

use linea_core::{Duration, Easing};

use crate::transition::Transition;

/// A batch of transitions sharing one clock, plus an optional trailing pause.
///
/// With `n` timed transitions, lag ratio `λ` and duration `D`, every
/// transition runs for `r = D / (1 + λ(n - 1))` and transition `i` starts
/// at `i·λ·r`, so the last one ends exactly at `D`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationStep {
    pub transitions: Vec<Transition>,
    pub duration: Duration,
    pub lag_ratio: f64,
    pub easing: Easing,
    pub pause: Duration,
}

impl AnimationStep {
    pub fn new(seconds: f64) -> Self {
        Self {
            transitions: Vec::new(),
            duration: Duration::from_seconds(seconds),
            lag_ratio: 0.0,
            easing: Easing::Linear,
            pause: Duration::zero(),
        }
    }

    /// A step with no transitions that only holds the current picture.
    pub fn wait(seconds: f64) -> Self {
        let mut step = Self::new(0.0);
        step.pause = Duration::from_seconds(seconds);
        step
    }

    pub fn with(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn with_all(mut self, transitions: impl IntoIterator<Item = Transition>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    pub fn lag_ratio(mut self, lag: f64) -> Self {
        self.lag_ratio = lag;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn then_wait(mut self, seconds: f64) -> Self {
        self.pause = Duration::from_seconds(seconds);
        self
    }

    fn timed_count(&self) -> usize {
        self.transitions.iter().filter(|t| !t.is_instant()).count()
    }

    /// Run time of each timed transition.
    pub fn run_time(&self) -> f64 {
        let n = self.timed_count();
        let spread = 1.0 + self.lag_ratio.max(0.0) * n.saturating_sub(1) as f64;
        self.duration.as_seconds() / spread
    }

    /// Start offset per transition (parallel to `transitions`). Instant
    /// transitions report 0 and do not take a stagger slot.
    pub fn start_offsets(&self) -> Vec<f64> {
        let r = self.run_time();
        let lag = self.lag_ratio.max(0.0);
        let mut slot = 0usize;
        self.transitions
            .iter()
            .map(|t| {
                if t.is_instant() {
                    0.0
                } else {
                    let offset = slot as f64 * lag * r;
                    slot += 1;
                    offset
                }
            })
            .collect()
    }

    /// Eased progress of a transition starting at `offset`, at step-local time `t`.
    pub fn progress(&self, offset: f64, t: f64) -> f64 {
        let r = self.run_time();
        let raw = if r <= 0.0 {
            1.0
        } else {
            ((t - offset) / r).clamp(0.0, 1.0)
        };
        self.easing.apply(raw)
    }

    /// Interpolation time plus trailing pause.
    pub fn total(&self) -> Duration {
        self.duration + self.pause
    }
}
