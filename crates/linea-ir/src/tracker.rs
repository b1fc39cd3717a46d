use std::collections::HashMap;

use linea_core::{LineaError, LineaResult, TrackerId};

/// A named mutable scalar that drives bound geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracker {
    pub id: TrackerId,
    pub name: String,
    pub value: f64,
}

impl Tracker {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            id: TrackerId::fresh(),
            name: name.into(),
            value,
        }
    }
}

/// All trackers of a script run.
#[derive(Debug, Clone, Default)]
pub struct TrackerTable {
    trackers: HashMap<TrackerId, Tracker>,
}

impl TrackerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, name: impl Into<String>, value: f64) -> TrackerId {
        let tracker = Tracker::new(name, value);
        let id = tracker.id;
        self.trackers.insert(id, tracker);
        id
    }

    pub fn insert(&mut self, tracker: Tracker) {
        self.trackers.insert(tracker.id, tracker);
    }

    pub fn get(&self, id: TrackerId) -> LineaResult<f64> {
        self.trackers
            .get(&id)
            .map(|t| t.value)
            .ok_or(LineaError::UnknownTracker(id))
    }

    pub fn set(&mut self, id: TrackerId, value: f64) -> LineaResult<()> {
        let tracker = self
            .trackers
            .get_mut(&id)
            .ok_or(LineaError::UnknownTracker(id))?;
        tracker.value = value;
        Ok(())
    }

    pub fn contains(&self, id: TrackerId) -> bool {
        self.trackers.contains_key(&id)
    }

    pub fn name(&self, id: TrackerId) -> Option<&str> {
        self.trackers.get(&id).map(|t| t.name.as_str())
    }

    /// Current values of `ids`, in the given order.
    pub fn snapshot(&self, ids: &[TrackerId]) -> LineaResult<Vec<f64>> {
        ids.iter().map(|id| self.get(*id)).collect()
    }

    /// Take over every tracker of `other` (used when chaining scripts).
    pub fn merge(&mut self, other: TrackerTable) {
        self.trackers.extend(other.trackers);
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_get_set() {
        let mut table = TrackerTable::new();
        let m = table.create("m", 0.8);
        assert_eq!(table.get(m).unwrap(), 0.8);
        table.set(m, 2.0).unwrap();
        assert_eq!(table.get(m).unwrap(), 2.0);
        assert_eq!(table.name(m), Some("m"));
    }

    #[test]
    fn test_unknown_tracker_errors() {
        let mut table = TrackerTable::new();
        let stray = TrackerId(u64::MAX);
        assert!(matches!(table.get(stray), Err(LineaError::UnknownTracker(_))));
        assert!(table.set(stray, 1.0).is_err());
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let mut table = TrackerTable::new();
        let m = table.create("m", 1.0);
        let b = table.create("b", 2.0);
        assert_eq!(table.snapshot(&[b, m]).unwrap(), vec![2.0, 1.0]);
    }
}
