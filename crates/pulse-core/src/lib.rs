//! Simulated live-update engine for the PulseBoard dashboard: scheduler,
//! activity feed, notifications, metric drift, and the user table sort.

pub mod charts;
pub mod dashboard;
pub mod drift;
pub mod feed;
pub mod format;
pub mod generator;
pub mod notification;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod snapshot;
pub mod sorter;
pub mod template;

pub use dashboard::{AdvanceReport, Dashboard, DashboardError};
pub use feed::ActivityFeed;
pub use notification::{NotificationQueue, NotificationTransition};
pub use rng::{RandomSource, ScriptedRandom, SimRng};
pub use scheduler::{ScheduledFire, SimulationScheduler, TimerHandle};
pub use session::{FileSessionStore, MemorySessionStore, SessionError, SessionStore};
pub use snapshot::{
    load_or_fallback, FileSnapshotSource, InlineSnapshotSource, NoSnapshotSource, SnapshotError,
    SnapshotSource,
};
