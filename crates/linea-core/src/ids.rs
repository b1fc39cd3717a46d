//! Process-unique identities for objects and trackers.
//!
//! Scripts are assembled from independently built clips, so ids come from a
//! shared counter instead of a per-scene allocator; chaining clips can never
//! produce two objects with the same identity. Unlike random ids, counters
//! replay the same sequence in a fresh process, and frame hashes leave
//! identities out, so a run's content hash never depends on them.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OBJECT: AtomicU64 = AtomicU64::new(1);
static NEXT_TRACKER: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a drawable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl ObjectId {
    pub fn fresh() -> Self {
        Self(NEXT_OBJECT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// Identity of a tracker (a named mutable scalar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackerId(pub u64);

impl TrackerId {
    pub fn fresh() -> Self {
        Self(NEXT_TRACKER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for TrackerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tracker#{}", self.0)
    }
}
