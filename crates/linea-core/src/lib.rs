//! # linea-core
//!
//! Core types and primitives for the Linea animation engine.
//! This crate contains foundational types shared across all Linea crates:
//! identities, colors, points, durations, easing functions, configuration,
//! content hashing and error types.

pub mod color;
pub mod config;
pub mod error;
pub mod hash;
pub mod ids;
pub mod math;
pub mod time;
pub mod types;

pub use color::Color;
pub use config::LineaConfig;
pub use error::{LineaError, LineaResult};
pub use hash::{ContentHash, ContentHasher};
pub use ids::{ObjectId, TrackerId};
pub use math::{BoundingBox, Point2D};
pub use time::{Duration, FrameClock};
pub use types::{Easing, ObjectKind};
