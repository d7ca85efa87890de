//! v1 cross-boundary contracts for the dashboard engine, API, stream, and renderers.

mod lenient_count;
mod seed_string;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SCHEMA_VERSION_V1: &str = "1.0";

/// Maximum number of events the activity feed displays at once.
pub const FEED_CAPACITY: usize = 10;

/// Delay between `show` and the end of the entrance transition.
pub const NOTIFICATION_ENTER_MS: u64 = 100;
/// Delay between `show` and the start of the exit transition.
pub const NOTIFICATION_LIFETIME_MS: u64 = 5_000;
/// Length of the exit transition before the notification is gone.
pub const NOTIFICATION_EXIT_MS: u64 = 300;

pub const GENERATED_EVENT_TIME: &str = "Just now";
pub const SESSION_KEY: &str = "pulseboardUser";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    pub schema_version: String,
    pub dashboard_id: String,
    #[serde(with = "seed_string")]
    pub seed: u64,
    pub min_fire_delay_ms: u64,
    pub max_fire_delay_ms: u64,
    pub clock_resolution_ms: u64,
    pub stream_capacity: usize,
    pub snapshot_path: Option<String>,
    pub session_path: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            dashboard_id: "pulseboard_local".to_string(),
            seed: 1337,
            min_fire_delay_ms: 8_000,
            max_fire_delay_ms: 12_000,
            clock_resolution_ms: 100,
            stream_capacity: 1024,
            snapshot_path: None,
            session_path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    #[serde(deserialize_with = "lenient_count::deserialize")]
    pub active_users: u64,
    #[serde(deserialize_with = "lenient_count::deserialize")]
    pub revenue: u64,
    pub conversion_rate: f64,
    #[serde(deserialize_with = "lenient_count::deserialize")]
    pub total_sessions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDisplay {
    pub active_users: String,
    pub revenue: String,
    pub conversion_rate: String,
    pub total_sessions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveUsersPoint {
    pub date: String,
    #[serde(deserialize_with = "lenient_count::deserialize")]
    pub users: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyRevenuePoint {
    pub date: String,
    #[serde(deserialize_with = "lenient_count::deserialize")]
    pub revenue: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleShare {
    pub role: String,
    #[serde(deserialize_with = "lenient_count::deserialize")]
    pub count: u64,
    #[serde(default)]
    pub color: Option<String>,
}

/// A row of the user table. The five well-known columns are optional so that
/// documents missing a column still load; any other column is kept verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl UserRecord {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let avatar = format!("assets/avatar-{}.png", name.to_lowercase().replace(' ', "-"));
        Self {
            name: Some(name),
            email: Some(email.into()),
            role: Some(role.into()),
            status: Some(status.into()),
            avatar: Some(avatar),
            extra: BTreeMap::new(),
        }
    }

    /// Raw value of a column, `None` when the row does not carry it.
    pub fn column(&self, key: &str) -> Option<Value> {
        let known = match key {
            "name" => &self.name,
            "email" => &self.email,
            "role" => &self.role,
            "status" => &self.status,
            "avatar" => &self.avatar,
            _ => return self.extra.get(key).filter(|value| !value.is_null()).cloned(),
        };
        known.as_ref().map(|text| Value::String(text.clone()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub metrics: Metrics,
    #[serde(default)]
    pub active_users_time_series: Vec<ActiveUsersPoint>,
    #[serde(default)]
    pub daily_revenue: Vec<DailyRevenuePoint>,
    #[serde(default)]
    pub user_roles: Vec<RoleShare>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub activity_templates: Vec<String>,
}

impl Snapshot {
    /// Document used when the data source cannot be read.
    pub fn fallback() -> Self {
        Self {
            metrics: Metrics {
                active_users: 1234,
                revenue: 45231,
                conversion_rate: 3.24,
                total_sessions: 89432,
            },
            active_users_time_series: Vec::new(),
            daily_revenue: Vec::new(),
            user_roles: Vec::new(),
            users: Vec::new(),
            activity_templates: Vec::new(),
        }
    }

    /// The generator needs at least one template and one user.
    pub fn validate_pools(&self) -> Result<(), PreconditionViolation> {
        if self.activity_templates.is_empty() {
            return Err(PreconditionViolation::EmptyTemplatePool);
        }
        if self.users.is_empty() {
            return Err(PreconditionViolation::EmptyUserPool);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionViolation {
    #[error("activity template pool is empty")]
    EmptyTemplatePool,
    #[error("user pool is empty")]
    EmptyUserPool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    System,
    User,
    Payment,
}

impl ActivityKind {
    pub fn notification_kind(self) -> NotificationKind {
        match self {
            Self::System => NotificationKind::Info,
            Self::User => NotificationKind::Success,
            Self::Payment => NotificationKind::Warning,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityEvent {
    pub sequence: u64,
    pub text: String,
    pub time: String,
    pub kind: ActivityKind,
    pub emitted_at_ms: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPhase {
    Entering,
    Visible,
    Leaving,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub text: String,
    pub kind: NotificationKind,
    pub phase: NotificationPhase,
    pub shown_at_ms: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    Running,
    Paused,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationStatus {
    pub schema_version: String,
    pub dashboard_id: String,
    pub mode: SimulationMode,
    pub now_ms: u64,
    pub next_fire_at_ms: Option<u64>,
    pub fired: u64,
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let next = self
            .next_fire_at_ms
            .map(|at| at.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "dashboard_id={} mode={:?} now_ms={} next_fire_at_ms={} fired={}",
            self.dashboard_id, self.mode, self.now_ms, next, self.fired
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionIdentity {
    pub username: String,
    pub role: String,
}

impl SessionIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
}

/// Labeled series handed to the chart renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartSeries {
    pub chart_id: String,
    pub kind: ChartKind,
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    /// Per-label colours, index aligned with `labels`; `None` leaves the renderer default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DashboardChange {
    ActivityAppended(ActivityEvent),
    ActivityEvicted { sequence: u64 },
    MetricsUpdated { metrics: Metrics, display: MetricsDisplay },
    NotificationShown(Notification),
    NotificationPhaseChanged { id: u64, phase: NotificationPhase },
    NotificationRemoved { id: u64 },
    SimulationStatusChanged(SimulationStatus),
    UsersSorted(SortState),
}

impl DashboardChange {
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::ActivityAppended(_) => "activity.appended",
            Self::ActivityEvicted { .. } => "activity.evicted",
            Self::MetricsUpdated { .. } => "metrics.updated",
            Self::NotificationShown(_) => "notification.shown",
            Self::NotificationPhaseChanged { .. } => "notification.phase",
            Self::NotificationRemoved { .. } => "notification.removed",
            Self::SimulationStatusChanged(_) => "simulation.status",
            Self::UsersSorted(_) => "users.sorted",
        }
    }
}

/// One observable change, stamped with the virtual time it happened at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardUpdate {
    pub sequence: u64,
    pub at_ms: u64,
    pub change: DashboardChange,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidRequest,
    SessionRequired,
    SimulationUnavailable,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub schema_version: String,
    pub error_code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(error_code: ErrorCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            error_code,
            message: message.into(),
            details,
        }
    }
}
