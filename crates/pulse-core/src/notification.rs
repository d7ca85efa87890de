//! Self-expiring notifications.
//!
//! A notification enters, stays visible, then leaves:
//! `Entering` until `shown_at + 100`, `Visible` until `shown_at + 5000`,
//! `Leaving` until `shown_at + 5300`, then it is removed. Dismissal removes
//! it at once and the remaining transitions are skipped.

use contracts::{
    Notification, NotificationKind, NotificationPhase, NOTIFICATION_ENTER_MS, NOTIFICATION_EXIT_MS,
    NOTIFICATION_LIFETIME_MS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationTransition {
    Phase { id: u64, phase: NotificationPhase, at_ms: u64 },
    Removed { id: u64, at_ms: u64 },
}

impl NotificationTransition {
    pub fn at_ms(&self) -> u64 {
        match self {
            Self::Phase { at_ms, .. } | Self::Removed { at_ms, .. } => *at_ms,
        }
    }
}

fn next_deadline(notification: &Notification) -> u64 {
    let offset = match notification.phase {
        NotificationPhase::Entering => NOTIFICATION_ENTER_MS,
        NotificationPhase::Visible => NOTIFICATION_LIFETIME_MS,
        NotificationPhase::Leaving => NOTIFICATION_LIFETIME_MS + NOTIFICATION_EXIT_MS,
    };
    notification.shown_at_ms.saturating_add(offset)
}

#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    active: Vec<Notification>,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, text: impl Into<String>, kind: NotificationKind, now_ms: u64) -> Notification {
        self.next_id = self.next_id.saturating_add(1);
        let notification = Notification {
            id: self.next_id,
            text: text.into(),
            kind,
            phase: NotificationPhase::Entering,
            shown_at_ms: now_ms,
        };
        self.active.push(notification.clone());
        notification
    }

    /// Removes a notification early. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.active.len();
        self.active.retain(|notification| notification.id != id);
        self.active.len() != before
    }

    /// Earliest pending transition, if any notification is still on screen.
    pub fn next_deadline(&self) -> Option<u64> {
        self.active.iter().map(next_deadline).min()
    }

    /// Applies every transition due at or before `now_ms`, in time order.
    pub fn advance(&mut self, now_ms: u64) -> Vec<NotificationTransition> {
        let mut transitions = Vec::new();
        while let Some(due) = self.next_deadline().filter(|deadline| *deadline <= now_ms) {
            let mut removed = Vec::new();
            for notification in self.active.iter_mut() {
                if next_deadline(notification) != due {
                    continue;
                }
                match notification.phase {
                    NotificationPhase::Entering => {
                        notification.phase = NotificationPhase::Visible;
                        transitions.push(NotificationTransition::Phase {
                            id: notification.id,
                            phase: NotificationPhase::Visible,
                            at_ms: due,
                        });
                    }
                    NotificationPhase::Visible => {
                        notification.phase = NotificationPhase::Leaving;
                        transitions.push(NotificationTransition::Phase {
                            id: notification.id,
                            phase: NotificationPhase::Leaving,
                            at_ms: due,
                        });
                    }
                    NotificationPhase::Leaving => removed.push(notification.id),
                }
            }
            for id in removed {
                self.active.retain(|notification| notification.id != id);
                transitions.push(NotificationTransition::Removed { id, at_ms: due });
            }
        }
        transitions
    }

    pub fn get(&self, id: u64) -> Option<&Notification> {
        self.active.iter().find(|notification| notification.id == id)
    }

    /// On-screen notifications in the order they were shown.
    pub fn active(&self) -> &[Notification] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_runs_enter_visible_leave_remove() {
        let mut queue = NotificationQueue::new();
        let shown = queue.show("hello", NotificationKind::Info, 1_000);
        assert_eq!(shown.phase, NotificationPhase::Entering);
        assert_eq!(queue.next_deadline(), Some(1_100));

        assert!(queue.advance(1_099).is_empty());
        assert_eq!(
            queue.advance(1_100),
            vec![NotificationTransition::Phase {
                id: shown.id,
                phase: NotificationPhase::Visible,
                at_ms: 1_100
            }]
        );

        let leaving = queue.advance(6_000);
        assert_eq!(leaving.len(), 1);
        assert_eq!(queue.get(shown.id).map(|n| n.phase), Some(NotificationPhase::Leaving));

        assert!(queue.advance(6_299).is_empty());
        assert_eq!(
            queue.advance(6_300),
            vec![NotificationTransition::Removed { id: shown.id, at_ms: 6_300 }]
        );
        assert!(queue.is_empty());
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn one_large_advance_replays_every_step() {
        let mut queue = NotificationQueue::new();
        queue.show("a", NotificationKind::Success, 0);
        queue.show("b", NotificationKind::Warning, 50);

        let transitions = queue.advance(10_000);
        assert_eq!(transitions.len(), 6);
        let times: Vec<u64> = transitions.iter().map(NotificationTransition::at_ms).collect();
        assert_eq!(times, vec![100, 150, 5_000, 5_050, 5_300, 5_350]);
    }

    #[test]
    fn dismiss_is_idempotent() {
        let mut queue = NotificationQueue::new();
        let first = queue.show("a", NotificationKind::Info, 0);
        let second = queue.show("b", NotificationKind::Info, 0);

        assert!(queue.dismiss(first.id));
        assert!(!queue.dismiss(first.id));
        assert!(!queue.dismiss(999));
        assert_eq!(queue.len(), 1);

        let transitions = queue.advance(5_300);
        assert!(transitions.iter().all(|t| match t {
            NotificationTransition::Phase { id, .. } | NotificationTransition::Removed { id, .. } => *id == second.id,
        }));
    }

    #[test]
    fn notifications_stack_without_bound() {
        let mut queue = NotificationQueue::new();
        for i in 0..50 {
            queue.show(format!("n{i}"), NotificationKind::Info, i);
        }
        assert_eq!(queue.len(), 50);
        assert_eq!(queue.active()[0].text, "n0");
    }
}
