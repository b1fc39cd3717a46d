//! # linea-anim
//!
//! Plays Linea scripts. The scheduler interpolates each animation step into
//! frames and the runner executes a script's timeline strictly in order,
//! handing every resolved frame to a [`FrameSink`].

pub mod frame;
pub mod runner;
pub mod scheduler;
pub mod sink;

pub use frame::{Frame, RenderItem};
pub use runner::{RunReport, Runner};
pub use scheduler::{Scheduler, Stage, StepOutcome};
pub use sink::{FrameRecorder, FrameSink, HashingSink, JsonLinesSink, NullSink};
