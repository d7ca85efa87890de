//! In-process dashboard facade with input validation, session gating, and the HTTP/websocket server.

mod server;

use std::fmt;

use contracts::{
    ActivityEvent, ApiError, ChartSeries, DashboardConfig, DashboardUpdate, ErrorCode, Metrics,
    MetricsDisplay, Notification, SessionIdentity, SimulationMode, SimulationStatus, Snapshot,
    SortState, UserRecord, SCHEMA_VERSION_V1,
};
use pulse_core::session::{self, SessionError, SessionStore};
use pulse_core::snapshot::{load_or_fallback, FileSnapshotSource, NoSnapshotSource};
use pulse_core::{AdvanceReport, Dashboard, DashboardError, FileSessionStore, MemorySessionStore};
use serde::Serialize;
pub use server::{serve, ServerError};

/// Everything the dashboard page renders, for one signed-in viewer.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub schema_version: String,
    pub dashboard_id: String,
    pub viewer: SessionIdentity,
    pub admin_panel_visible: bool,
    pub metrics: Metrics,
    pub display: MetricsDisplay,
    pub activity: Vec<ActivityEvent>,
    pub notifications: Vec<Notification>,
    pub users: Vec<UserRecord>,
    pub sort: Option<SortState>,
    pub charts: Vec<ChartSeries>,
    pub simulation: SimulationStatus,
    pub simulation_error: Option<String>,
}

pub struct DashboardApi {
    dashboard: Dashboard,
    sessions: Box<dyn SessionStore>,
    startup_error: Option<DashboardError>,
}

impl fmt::Debug for DashboardApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardApi")
            .field("dashboard", &self.dashboard)
            .field("startup_error", &self.startup_error)
            .finish_non_exhaustive()
    }
}

impl DashboardApi {
    /// Loads the snapshot (falling back on failure), opens the session store
    /// and boots the dashboard.
    pub fn from_config(config: DashboardConfig) -> Self {
        let snapshot = match config.snapshot_path.as_deref() {
            Some(path) => load_or_fallback(&FileSnapshotSource::new(path)),
            None => load_or_fallback(&NoSnapshotSource),
        };
        let sessions: Box<dyn SessionStore> = match config.session_path.as_deref() {
            Some(path) => Box::new(FileSessionStore::new(path)),
            None => Box::new(MemorySessionStore::new()),
        };
        Self::with_parts(config, snapshot, sessions)
    }

    pub fn with_parts(
        config: DashboardConfig,
        snapshot: Snapshot,
        sessions: Box<dyn SessionStore>,
    ) -> Self {
        let (dashboard, started) = Dashboard::boot(config, snapshot);
        let startup_error = started.err();
        if let Some(err) = &startup_error {
            tracing::warn!(error = %err, "dashboard booted without a running simulation");
        }
        Self {
            dashboard,
            sessions,
            startup_error,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn config(&self) -> &DashboardConfig {
        self.dashboard.config()
    }

    pub fn dashboard_id(&self) -> &str {
        &self.dashboard.config().dashboard_id
    }

    /// Why the simulation could not be started at boot, if it could not.
    pub fn startup_error(&self) -> Option<&DashboardError> {
        self.startup_error.as_ref()
    }

    pub fn status(&self) -> SimulationStatus {
        self.dashboard.status()
    }

    pub fn metrics(&self) -> (Metrics, MetricsDisplay) {
        (*self.dashboard.metrics(), self.dashboard.metrics_display())
    }

    pub fn activity(&self) -> Vec<ActivityEvent> {
        self.dashboard.feed().to_vec()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.dashboard.notifications().to_vec()
    }

    pub fn users(&self) -> (Vec<UserRecord>, Option<SortState>) {
        (
            self.dashboard.users().to_vec(),
            self.dashboard.sort_state().cloned(),
        )
    }

    pub fn charts(&self) -> Vec<ChartSeries> {
        self.dashboard.charts()
    }

    pub fn view(&self) -> Result<DashboardView, ApiError> {
        let viewer = self.identity()?;
        let (metrics, display) = self.metrics();
        let (users, sort) = self.users();
        Ok(DashboardView {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            dashboard_id: self.dashboard_id().to_string(),
            admin_panel_visible: viewer.is_admin(),
            viewer,
            metrics,
            display,
            activity: self.activity(),
            notifications: self.notifications(),
            users,
            sort,
            charts: self.charts(),
            simulation: self.status(),
            simulation_error: self.startup_error.as_ref().map(ToString::to_string),
        })
    }

    pub fn sort_users(&mut self, key: &str) -> Result<SortState, ApiError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ApiError::new(
                ErrorCode::InvalidRequest,
                "sort key must not be empty",
                None,
            ));
        }
        Ok(self.dashboard.sort_users(key))
    }

    /// Returns whether a toast was removed. Unknown or already dismissed ids are a no-op.
    pub fn dismiss_notification(&mut self, id: u64) -> bool {
        self.dashboard.dismiss_notification(id)
    }

    pub fn pause_simulation(&mut self) -> SimulationStatus {
        self.dashboard.pause_simulation();
        self.dashboard.status()
    }

    pub fn resume_simulation(&mut self) -> Result<SimulationStatus, ApiError> {
        self.dashboard
            .resume_simulation()
            .map_err(dashboard_error)?;
        Ok(self.dashboard.status())
    }

    pub fn toggle_simulation(&mut self) -> Result<SimulationStatus, ApiError> {
        self.dashboard
            .toggle_simulation()
            .map_err(dashboard_error)?;
        Ok(self.dashboard.status())
    }

    pub fn mode(&self) -> SimulationMode {
        self.dashboard.mode()
    }

    pub fn now_ms(&self) -> u64 {
        self.dashboard.now_ms()
    }

    pub fn advance_to(&mut self, now_ms: u64) -> Result<AdvanceReport, ApiError> {
        self.dashboard.advance_to(now_ms).map_err(dashboard_error)
    }

    pub fn advance_by(&mut self, elapsed_ms: u64) -> Result<AdvanceReport, ApiError> {
        self.dashboard.advance_by(elapsed_ms).map_err(dashboard_error)
    }

    pub fn drain_updates(&mut self) -> Vec<DashboardUpdate> {
        self.dashboard.drain_updates()
    }

    pub fn identity(&self) -> Result<SessionIdentity, ApiError> {
        session::current_identity(self.sessions.as_ref()).map_err(session_error)
    }

    pub fn sign_in(&mut self, username: &str, role: &str) -> Result<SessionIdentity, ApiError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::new(
                ErrorCode::InvalidRequest,
                "username is required",
                None,
            ));
        }
        let role = known_role(role)?;
        let identity = SessionIdentity {
            username: username.to_string(),
            role: role.to_string(),
        };
        session::sign_in(self.sessions.as_ref(), &identity).map_err(session_error)?;
        Ok(identity)
    }

    pub fn switch_role(&mut self, role: &str) -> Result<SessionIdentity, ApiError> {
        let role = known_role(role)?;
        session::switch_role(self.sessions.as_ref(), role).map_err(session_error)
    }

    pub fn logout(&mut self) -> Result<(), ApiError> {
        session::logout(self.sessions.as_ref()).map_err(session_error)
    }
}

/// Viewers are either `admin` or `user`.
fn known_role(role: &str) -> Result<&str, ApiError> {
    let trimmed = role.trim();
    if matches!(trimmed, "admin" | "user") {
        Ok(trimmed)
    } else {
        Err(ApiError::new(
            ErrorCode::InvalidRequest,
            "role must be admin or user",
            Some(format!("role={role}")),
        ))
    }
}

fn dashboard_error(err: DashboardError) -> ApiError {
    match err {
        DashboardError::Precondition(violation) => ApiError::new(
            ErrorCode::SimulationUnavailable,
            "simulation cannot run with the loaded snapshot",
            Some(violation.to_string()),
        ),
        DashboardError::ClockRewind { .. } => ApiError::new(
            ErrorCode::InvalidRequest,
            "clock cannot move backwards",
            Some(err.to_string()),
        ),
    }
}

fn session_error(err: SessionError) -> ApiError {
    match err {
        SessionError::Missing => ApiError::new(
            ErrorCode::SessionRequired,
            "sign in to view the dashboard",
            None,
        ),
        other => ApiError::new(
            ErrorCode::InternalError,
            "session store failed",
            Some(other.to_string()),
        ),
    }
}
