use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Request, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::Method;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use contracts::{
    ActivityEvent, ApiError, ChartSeries, DashboardConfig, DashboardUpdate, ErrorCode, Metrics,
    MetricsDisplay, Notification, SessionIdentity, SimulationStatus, SortState, UserRecord,
    FEED_CAPACITY, SCHEMA_VERSION_V1,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Mutex};
use tokio::time::{Instant, MissedTickBehavior};

use crate::{DashboardApi, DashboardView};

include!("error.rs");
include!("state.rs");
include!("routes/control.rs");
include!("routes/query.rs");
include!("routes/stream.rs");
include!("util.rs");

/// Boots the dashboard from `config`, starts the clock driver and serves
/// the HTTP/websocket API until the listener fails.
pub async fn serve(addr: SocketAddr, config: DashboardConfig) -> Result<(), ServerError> {
    let resolution = Duration::from_millis(config.clock_resolution_ms.max(1));
    let capacity = config.stream_capacity.max(1);
    let api = DashboardApi::from_config(config);
    let state = AppState::new(api, capacity);

    let driver = tokio::spawn(drive_clock(state.clone(), resolution));
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "pulseboard server listening");
    let served = axum::serve(listener, app).await;
    driver.abort();
    served?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/dashboard", get(get_dashboard))
        .route("/api/v1/metrics", get(get_metrics))
        .route("/api/v1/activity", get(get_activity))
        .route("/api/v1/notifications", get(get_notifications))
        .route(
            "/api/v1/notifications/{id}/dismiss",
            post(dismiss_notification),
        )
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/sort", post(sort_users))
        .route("/api/v1/charts", get(get_charts))
        .route("/api/v1/simulation", get(get_simulation))
        .route("/api/v1/simulation/toggle", post(toggle_simulation))
        .route("/api/v1/simulation/pause", post(pause_simulation))
        .route("/api/v1/simulation/resume", post(resume_simulation))
        .route("/api/v1/session", get(get_session))
        .route("/api/v1/session/login", post(login))
        .route("/api/v1/session/role", post(switch_role))
        .route("/api/v1/session/logout", post(logout))
        .route("/api/v1/stream", get(stream_dashboard))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

/// Moves the virtual clock with wall time and broadcasts whatever changed.
async fn drive_clock(state: AppState, resolution: Duration) {
    let started = Instant::now();
    let mut interval = tokio::time::interval(resolution);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let now_ms = elapsed_ms(started);
        let messages = {
            let mut inner = state.inner.lock().await;
            let advanced = inner.api.advance_to(now_ms);
            let mut messages = collect_delta_messages(&mut inner);
            if let Err(err) = advanced {
                tracing::warn!(now_ms, error = %err.message, "clock driver could not advance");
                messages.push(StreamMessage::warning(now_ms, err.message));
            }
            messages
        };
        broadcast_messages(&state, messages);
    }
}
