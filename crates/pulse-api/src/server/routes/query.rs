async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardView>, HttpApiError> {
    let inner = state.inner.lock().await;
    Ok(Json(inner.api.view()?))
}

#[derive(Debug, Serialize)]
struct MetricsResponse {
    schema_version: String,
    metrics: Metrics,
    display: MetricsDisplay,
}

async fn get_metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    let (metrics, display) = state.inner.lock().await.api.metrics();
    Json(MetricsResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        metrics,
        display,
    })
}

#[derive(Debug, Serialize)]
struct ActivityResponse {
    schema_version: String,
    capacity: usize,
    events: Vec<ActivityEvent>,
}

async fn get_activity(State(state): State<AppState>) -> Json<ActivityResponse> {
    let events = state.inner.lock().await.api.activity();
    Json(ActivityResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        capacity: FEED_CAPACITY,
        events,
    })
}

#[derive(Debug, Serialize)]
struct NotificationsResponse {
    schema_version: String,
    notifications: Vec<Notification>,
}

async fn get_notifications(State(state): State<AppState>) -> Json<NotificationsResponse> {
    let notifications = state.inner.lock().await.api.notifications();
    Json(NotificationsResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        notifications,
    })
}

#[derive(Debug, Serialize)]
struct UsersResponse {
    schema_version: String,
    users: Vec<UserRecord>,
    sort: Option<SortState>,
}

async fn get_users(State(state): State<AppState>) -> Json<UsersResponse> {
    let (users, sort) = state.inner.lock().await.api.users();
    Json(UsersResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        users,
        sort,
    })
}

#[derive(Debug, Serialize)]
struct ChartsResponse {
    schema_version: String,
    charts: Vec<ChartSeries>,
}

async fn get_charts(State(state): State<AppState>) -> Json<ChartsResponse> {
    let charts = state.inner.lock().await.api.charts();
    Json(ChartsResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        charts,
    })
}

#[derive(Debug, Serialize)]
struct SimulationResponse {
    schema_version: String,
    status: SimulationStatus,
    error: Option<String>,
}

impl SimulationResponse {
    fn from_api(api: &DashboardApi) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            status: api.status(),
            error: api.startup_error().map(ToString::to_string),
        }
    }
}

async fn get_simulation(State(state): State<AppState>) -> Json<SimulationResponse> {
    let inner = state.inner.lock().await;
    Json(SimulationResponse::from_api(&inner.api))
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    schema_version: String,
    viewer: SessionIdentity,
    admin_panel_visible: bool,
}

impl SessionResponse {
    fn new(viewer: SessionIdentity) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            admin_panel_visible: viewer.is_admin(),
            viewer,
        }
    }
}

async fn get_session(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, HttpApiError> {
    let viewer = state.inner.lock().await.api.identity()?;
    Ok(Json(SessionResponse::new(viewer)))
}
