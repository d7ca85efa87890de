#[derive(Debug, Serialize)]
struct DismissResponse {
    schema_version: String,
    id: u64,
    removed: bool,
    notifications: Vec<Notification>,
}

async fn dismiss_notification(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Json<DismissResponse> {
    let (response, messages) = {
        let mut inner = state.inner.lock().await;
        let removed = inner.api.dismiss_notification(id);
        let notifications = inner.api.notifications();
        (
            DismissResponse {
                schema_version: SCHEMA_VERSION_V1.to_string(),
                id,
                removed,
                notifications,
            },
            collect_delta_messages(&mut inner),
        )
    };

    broadcast_messages(&state, messages);

    Json(response)
}

#[derive(Debug, Deserialize)]
struct SortRequest {
    key: String,
}

async fn sort_users(
    State(state): State<AppState>,
    Json(request): Json<SortRequest>,
) -> Result<Json<UsersResponse>, HttpApiError> {
    let (response, messages) = {
        let mut inner = state.inner.lock().await;
        inner.api.sort_users(&request.key)?;
        let (users, sort) = inner.api.users();
        (
            UsersResponse {
                schema_version: SCHEMA_VERSION_V1.to_string(),
                users,
                sort,
            },
            collect_delta_messages(&mut inner),
        )
    };

    broadcast_messages(&state, messages);

    Ok(Json(response))
}

async fn toggle_simulation(
    State(state): State<AppState>,
) -> Result<Json<SimulationResponse>, HttpApiError> {
    control_simulation(&state, |api| api.toggle_simulation().map(|_| ())).await
}

async fn pause_simulation(
    State(state): State<AppState>,
) -> Result<Json<SimulationResponse>, HttpApiError> {
    control_simulation(&state, |api| {
        api.pause_simulation();
        Ok(())
    })
    .await
}

async fn resume_simulation(
    State(state): State<AppState>,
) -> Result<Json<SimulationResponse>, HttpApiError> {
    control_simulation(&state, |api| api.resume_simulation().map(|_| ())).await
}

async fn control_simulation(
    state: &AppState,
    action: impl FnOnce(&mut DashboardApi) -> Result<(), ApiError>,
) -> Result<Json<SimulationResponse>, HttpApiError> {
    let (outcome, messages) = {
        let mut inner = state.inner.lock().await;
        let outcome = action(&mut inner.api).map(|()| SimulationResponse::from_api(&inner.api));
        (outcome, collect_delta_messages(&mut inner))
    };

    broadcast_messages(state, messages);

    Ok(Json(outcome?))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    role: String,
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, HttpApiError> {
    let viewer = state
        .inner
        .lock()
        .await
        .api
        .sign_in(&request.username, &request.role)?;
    Ok(Json(SessionResponse::new(viewer)))
}

#[derive(Debug, Deserialize)]
struct RoleRequest {
    role: String,
}

async fn switch_role(
    State(state): State<AppState>,
    Json(request): Json<RoleRequest>,
) -> Result<Json<SessionResponse>, HttpApiError> {
    let viewer = state.inner.lock().await.api.switch_role(&request.role)?;
    Ok(Json(SessionResponse::new(viewer)))
}

async fn logout(State(state): State<AppState>) -> Result<StatusCode, HttpApiError> {
    state.inner.lock().await.api.logout()?;
    Ok(StatusCode::NO_CONTENT)
}
