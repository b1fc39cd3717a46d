//! Timeline playback: runs a script's steps strictly in order.

use std::sync::Arc;

use linea_core::{Color, ContentHash, ContentHasher, FrameClock, LineaConfig, LineaError, LineaResult};
use linea_ir::validate::validate_script;
use linea_ir::Script;

use crate::frame::Frame;
use crate::scheduler::{Scheduler, Stage};
use crate::sink::FrameSink;

/// Summary of a complete run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub frames: u64,
    /// Timeline seconds covered, pauses included.
    pub seconds: f64,
    pub steps: usize,
    /// Objects still visible after the last step.
    pub final_members: usize,
    /// Digest over every emitted frame.
    pub hash: ContentHash,
}

/// Forwards frames to the caller's sink while hashing them.
struct Metered<'s> {
    inner: &'s mut dyn FrameSink,
    hasher: ContentHasher,
}

impl FrameSink for Metered<'_> {
    fn consume(&mut self, frame: &Frame) -> LineaResult<()> {
        frame.hash_into(&mut self.hasher);
        self.inner.consume(frame)
    }

    fn finish(&mut self) -> LineaResult<()> {
        self.inner.finish()
    }
}

/// Plays scripts with a configuration frozen at construction.
#[derive(Debug, Clone)]
pub struct Runner {
    config: Arc<LineaConfig>,
    clock: FrameClock,
    background: Color,
}

impl Runner {
    pub fn new(config: Arc<LineaConfig>) -> LineaResult<Self> {
        config.validate()?;
        let background = config.background()?;
        Ok(Self {
            clock: FrameClock::new(config.render.fps),
            config,
            background,
        })
    }

    /// A runner at a different frame rate, everything else unchanged.
    pub fn with_fps(&self, fps: f64) -> LineaResult<Self> {
        let mut config = (*self.config).clone();
        config.render.fps = fps;
        Self::new(Arc::new(config))
    }

    pub fn config(&self) -> &LineaConfig {
        &self.config
    }

    pub fn run(&self, script: &Script, sink: &mut dyn FrameSink) -> LineaResult<RunReport> {
        self.execute(script, sink).map(|(report, _)| report)
    }

    /// Run and also hand back the final stage for inspection.
    ///
    /// The script is not consumed: trackers are copied into the stage, so
    /// running the same script twice produces the same frames.
    pub fn execute(&self, script: &Script, sink: &mut dyn FrameSink) -> LineaResult<(RunReport, Stage)> {
        if let Err(errors) = validate_script(script) {
            for err in &errors {
                tracing::warn!(script = %script.name, "{}", err);
            }
            return Err(errors
                .into_iter()
                .next()
                .unwrap_or_else(|| LineaError::Validation("invalid script".into())));
        }
        if self.config.binding.strict {
            if let Some(slot) = script.bindings.first_conflict() {
                return Err(LineaError::RebindConflict(slot));
            }
        }

        tracing::info!(
            script = %script.name,
            steps = script.timeline.len(),
            duration = %script.timeline.total_duration(),
            fps = self.clock.fps(),
            "starting run"
        );

        let scheduler = Scheduler::new(script, self.clock, self.background);
        let mut stage = Stage::new(script.trackers.clone());
        let mut metered = Metered {
            inner: sink,
            hasher: ContentHasher::new(),
        };

        for (index, step) in script.timeline.steps.iter().enumerate() {
            scheduler.play(&mut stage, index, step, &mut metered)?;
        }
        metered.finish()?;

        let report = RunReport {
            frames: stage.frame_index,
            seconds: stage.time,
            steps: script.timeline.len(),
            final_members: stage.graph.len(),
            hash: metered.hasher.finish(),
        };
        tracing::info!(
            script = %script.name,
            frames = report.frames,
            visible = report.final_members,
            hash = %report.hash,
            "run complete"
        );
        Ok((report, stage))
    }
}

impl Default for Runner {
    fn default() -> Self {
        let config = LineaConfig::default();
        Self {
            clock: FrameClock::new(config.render.fps),
            background: config.background().unwrap_or(Color::BLACK),
            config: Arc::new(config),
        }
    }
}
