use sckm_core::KillEvent;
use std::collections::{HashSet, VecDeque};

/// Kill events found during one scan session, newest first.
///
/// Holds no two equal events. Lives exactly as long as the session.
#[derive(Debug, Default)]
pub struct EventStore {
    events: VecDeque<KillEvent>,
    seen: HashSet<KillEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the head. Returns false when an equal event is already stored.
    pub fn insert(&mut self, event: KillEvent) -> bool {
        if self.seen.contains(&event) {
            return false;
        }
        self.seen.insert(event.clone());
        self.events.push_front(event);
        true
    }

    pub fn contains(&self, event: &KillEvent) -> bool {
        self.seen.contains(event)
    }

    /// Order by timestamp, newest first. Stable, so equal timestamps keep
    /// their insertion order.
    pub fn sort_newest_first(&mut self) {
        self.events
            .make_contiguous()
            .sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }

    pub fn iter(&self) -> impl Iterator<Item = &KillEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.seen.clear();
    }
}
