//! Bounded, most-recent-first activity feed.

use std::collections::VecDeque;

use contracts::{ActivityEvent, ActivityKind, FEED_CAPACITY};

/// Events shown before the simulation produces anything, oldest first.
/// Inserting them in this order leaves the last one on top of the feed.
pub const SEED_ACTIVITY: [(&str, &str, ActivityKind); 4] = [
    ("System backup completed successfully", "2 minutes ago", ActivityKind::System),
    ("New user Sarah Wilson registered", "5 minutes ago", ActivityKind::User),
    ("Payment of $1,250 received from John Doe", "8 minutes ago", ActivityKind::Payment),
    ("User Mike Johnson updated their profile", "12 minutes ago", ActivityKind::User),
];

#[derive(Debug, Clone, Default)]
pub struct ActivityFeed {
    events: VecDeque<ActivityEvent>,
}

impl ActivityFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `event` on top and returns whatever fell off the bottom.
    pub fn insert(&mut self, event: ActivityEvent) -> Vec<ActivityEvent> {
        self.events.push_front(event);
        let mut evicted = Vec::new();
        while self.events.len() > FEED_CAPACITY {
            if let Some(oldest) = self.events.pop_back() {
                evicted.push(oldest);
            }
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Displayed order, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &ActivityEvent> {
        self.events.iter()
    }

    pub fn latest(&self) -> Option<&ActivityEvent> {
        self.events.front()
    }

    pub fn to_vec(&self) -> Vec<ActivityEvent> {
        self.events.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(sequence: u64) -> ActivityEvent {
        ActivityEvent {
            sequence,
            text: format!("event {sequence}"),
            time: "Just now".to_string(),
            kind: ActivityKind::System,
            emitted_at_ms: sequence * 10,
        }
    }

    #[test]
    fn newest_event_goes_on_top() {
        let mut feed = ActivityFeed::new();
        feed.insert(event(1));
        feed.insert(event(2));

        let order: Vec<u64> = feed.iter().map(|e| e.sequence).collect();
        assert_eq!(order, vec![2, 1]);
        assert_eq!(feed.latest().map(|e| e.sequence), Some(2));
    }

    #[test]
    fn eleventh_insert_evicts_oldest() {
        let mut feed = ActivityFeed::new();
        for sequence in 1..=10 {
            assert!(feed.insert(event(sequence)).is_empty());
        }

        let evicted = feed.insert(event(11));
        assert_eq!(evicted.iter().map(|e| e.sequence).collect::<Vec<_>>(), vec![1]);
        assert_eq!(feed.len(), FEED_CAPACITY);
        assert_eq!(feed.iter().last().map(|e| e.sequence), Some(2));
    }
}
