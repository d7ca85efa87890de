use contracts::{
    ActivityEvent, ActivityKind, ChartSeries, DashboardChange, DashboardConfig, DashboardUpdate,
    Metrics, MetricsDisplay, Notification, PreconditionViolation, SimulationMode, SimulationStatus,
    Snapshot, SortState, UserRecord, SCHEMA_VERSION_V1,
};
use thiserror::Error;

use crate::charts;
use crate::feed::{ActivityFeed, SEED_ACTIVITY};
use crate::format::metrics_display;
use crate::notification::{NotificationQueue, NotificationTransition};
use crate::rng::SimRng;
use crate::scheduler::SimulationScheduler;

mod controls;
mod simulation;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("simulation cannot run: {0}")]
    Precondition(#[from] PreconditionViolation),
    #[error("clock cannot move backwards: now_ms={now_ms} requested={requested_ms}")]
    ClockRewind { now_ms: u64, requested_ms: u64 },
}

/// Counts of what one `advance_to` call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    pub fires: u64,
    pub notification_transitions: u64,
}

/// Application context for one dashboard session.
///
/// Owns the snapshot, feed, notifications, sort state and the scheduler.
/// Every mutation goes through `&mut self`, so two fires can never interleave.
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    snapshot: Snapshot,
    feed: ActivityFeed,
    notifications: NotificationQueue,
    scheduler: SimulationScheduler,
    sort_state: Option<SortState>,
    rng: SimRng,
    now_ms: u64,
    next_event_sequence: u64,
    next_update_sequence: u64,
    pending_updates: Vec<DashboardUpdate>,
    initialized: bool,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, snapshot: Snapshot) -> Self {
        let scheduler = SimulationScheduler::new(config.min_fire_delay_ms, config.max_fire_delay_ms);
        let rng = SimRng::new(config.seed);
        Self {
            config,
            snapshot,
            feed: ActivityFeed::new(),
            notifications: NotificationQueue::new(),
            scheduler,
            sort_state: None,
            rng,
            now_ms: 0,
            next_event_sequence: 0,
            next_update_sequence: 0,
            pending_updates: Vec::new(),
            initialized: false,
        }
    }

    /// Fills the feed with the seed activity. Idempotent.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        for (text, time, kind) in SEED_ACTIVITY {
            self.push_activity(text.to_string(), time.to_string(), kind);
        }
        let metrics = self.snapshot.metrics;
        self.record(DashboardChange::MetricsUpdated {
            metrics,
            display: metrics_display(&metrics),
        });
    }

    /// `initialize` followed by `start_simulation`, as on page load.
    pub fn boot(config: DashboardConfig, snapshot: Snapshot) -> (Self, Result<(), DashboardError>) {
        let mut dashboard = Self::new(config, snapshot);
        dashboard.initialize();
        let started = dashboard.start_simulation();
        (dashboard, started)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn metrics(&self) -> &Metrics {
        &self.snapshot.metrics
    }

    pub fn metrics_display(&self) -> MetricsDisplay {
        metrics_display(&self.snapshot.metrics)
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.snapshot.users
    }

    pub fn feed(&self) -> &ActivityFeed {
        &self.feed
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.active()
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort_state.as_ref()
    }

    pub fn charts(&self) -> Vec<ChartSeries> {
        charts::all_series(&self.snapshot)
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn mode(&self) -> SimulationMode {
        self.scheduler.mode()
    }

    pub fn scheduler(&self) -> &SimulationScheduler {
        &self.scheduler
    }

    pub fn status(&self) -> SimulationStatus {
        SimulationStatus {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            dashboard_id: self.config.dashboard_id.clone(),
            mode: self.scheduler.mode(),
            now_ms: self.now_ms,
            next_fire_at_ms: self.scheduler.next_fire_at(),
            fired: self.scheduler.fired(),
        }
    }

    /// Hands over every change recorded since the previous drain.
    pub fn drain_updates(&mut self) -> Vec<DashboardUpdate> {
        std::mem::take(&mut self.pending_updates)
    }

    fn record(&mut self, change: DashboardChange) {
        self.record_at(self.now_ms, change);
    }

    fn record_at(&mut self, at_ms: u64, change: DashboardChange) {
        self.next_update_sequence = self.next_update_sequence.saturating_add(1);
        self.pending_updates.push(DashboardUpdate {
            sequence: self.next_update_sequence,
            at_ms,
            change,
        });
    }

    /// Inserts into the feed and raises the matching notification.
    fn push_activity(&mut self, text: String, time: String, kind: ActivityKind) -> ActivityEvent {
        self.next_event_sequence = self.next_event_sequence.saturating_add(1);
        let event = ActivityEvent {
            sequence: self.next_event_sequence,
            text,
            time,
            kind,
            emitted_at_ms: self.now_ms,
        };
        self.insert_event(event.clone());
        event
    }

    fn insert_event(&mut self, event: ActivityEvent) {
        let evicted = self.feed.insert(event.clone());
        let notification =
            self.notifications
                .show(event.text.clone(), event.kind.notification_kind(), self.now_ms);
        self.record(DashboardChange::ActivityAppended(event));
        for gone in evicted {
            self.record(DashboardChange::ActivityEvicted {
                sequence: gone.sequence,
            });
        }
        self.record(DashboardChange::NotificationShown(notification));
    }

    fn record_transitions(&mut self, transitions: Vec<NotificationTransition>) -> u64 {
        let count = transitions.len() as u64;
        for transition in transitions {
            match transition {
                NotificationTransition::Phase { id, phase, at_ms } => {
                    self.record_at(at_ms, DashboardChange::NotificationPhaseChanged { id, phase })
                }
                NotificationTransition::Removed { id, at_ms } => {
                    self.record_at(at_ms, DashboardChange::NotificationRemoved { id })
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests;
