/// Core error types for the Linea engine.
use crate::ids::{ObjectId, TrackerId};

/// A specialized Result type for Linea operations.
pub type LineaResult<T> = Result<T, LineaError>;

/// Top-level error type encompassing all Linea subsystems.
#[derive(Debug, thiserror::Error)]
pub enum LineaError {
    /// A sampled function is undefined at `x`. Recovered locally by leaving a gap.
    #[error("domain error at x = {x}: {reason}")]
    Domain { x: f64, reason: String },

    /// A step referenced an object that is neither visible nor declared.
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),

    #[error("unknown tracker {0}")]
    UnknownTracker(TrackerId),

    /// Strict mode only: a second binding was registered for a bound slot.
    #[error("rebind conflict: {0} already has a binding")]
    RebindConflict(ObjectId),

    #[error("invalid step: {0}")]
    InvalidStep(String),

    #[error("script validation error: {0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("render sink error: {0}")]
    Sink(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LineaError {
    pub fn domain(x: f64, reason: impl Into<String>) -> Self {
        LineaError::Domain {
            x,
            reason: reason.into(),
        }
    }

    /// Whether the error aborts a timeline run. Only domain errors are
    /// recoverable, and only inside curve sampling.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, LineaError::Domain { .. })
    }
}
