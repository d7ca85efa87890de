async fn stream_dashboard(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let (initial_message, rx) = open_stream(&state).await;

    ws.on_upgrade(move |socket| stream_socket(socket, state, initial_message, rx))
}

/// Subscribes before reading the status so no change made after the
/// snapshot can be missed by the new client.
async fn open_stream(state: &AppState) -> (StreamMessage, broadcast::Receiver<StreamMessage>) {
    let rx = state.stream_tx.subscribe();
    let initial_message = {
        let inner = state.inner.lock().await;
        StreamMessage::simulation_status(&inner.api.status())
    };
    (initial_message, rx)
}

async fn stream_socket(
    mut socket: WebSocket,
    state: AppState,
    initial_message: StreamMessage,
    mut rx: broadcast::Receiver<StreamMessage>,
) {
    if send_stream_message(&mut socket, &initial_message)
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {
                        break;
                    }
                    _ => {}
                }
            }
            outgoing = rx.recv() => {
                match outgoing {
                    Ok(message) => {
                        if send_stream_message(&mut socket, &message).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        let now_ms = state.inner.lock().await.api.now_ms();
                        let warning = StreamMessage::warning(
                            now_ms,
                            format!("stream client lagged and skipped {skipped} message(s)"),
                        );

                        if send_stream_message(&mut socket, &warning).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        }
    }
}

async fn send_stream_message(
    socket: &mut WebSocket,
    message: &StreamMessage,
) -> Result<(), axum::Error> {
    let payload = serde_json::to_string(message).map_err(axum::Error::new)?;
    socket.send(Message::Text(payload.into())).await
}

#[derive(Debug, Clone, Serialize)]
struct StreamMessage {
    schema_version: String,
    #[serde(rename = "type")]
    message_type: String,
    sequence: Option<u64>,
    at_ms: u64,
    payload: Value,
}

impl StreamMessage {
    fn update(update: &DashboardUpdate) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            message_type: update.change.message_type().to_string(),
            sequence: Some(update.sequence),
            at_ms: update.at_ms,
            payload: change_payload(update),
        }
    }

    fn simulation_status(status: &SimulationStatus) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            message_type: "simulation.status".to_string(),
            sequence: None,
            at_ms: status.now_ms,
            payload: json!(status),
        }
    }

    fn warning(at_ms: u64, warning: String) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            message_type: "warning".to_string(),
            sequence: None,
            at_ms,
            payload: json!({ "message": warning }),
        }
    }
}
