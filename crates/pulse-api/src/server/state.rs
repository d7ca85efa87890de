#[derive(Clone)]
struct AppState {
    inner: std::sync::Arc<Mutex<ServerInner>>,
    stream_tx: broadcast::Sender<StreamMessage>,
}

impl AppState {
    fn new(api: DashboardApi, stream_capacity: usize) -> Self {
        let (stream_tx, _) = broadcast::channel(stream_capacity);
        Self {
            inner: std::sync::Arc::new(Mutex::new(ServerInner { api })),
            stream_tx,
        }
    }
}

#[derive(Debug)]
struct ServerInner {
    api: DashboardApi,
}

/// Turns every change recorded since the last call into stream messages.
fn collect_delta_messages(inner: &mut ServerInner) -> Vec<StreamMessage> {
    inner
        .api
        .drain_updates()
        .iter()
        .map(StreamMessage::update)
        .collect()
}

fn broadcast_messages(state: &AppState, messages: Vec<StreamMessage>) {
    for message in messages {
        let _ = state.stream_tx.send(message);
    }
}
