fn apply_cors_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-max-age"),
        HeaderValue::from_static("3600"),
    );
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// The `payload` half of an adjacently tagged change.
fn change_payload(update: &DashboardUpdate) -> Value {
    match serde_json::to_value(&update.change) {
        Ok(mut tagged) => tagged
            .get_mut("payload")
            .map(Value::take)
            .unwrap_or(Value::Null),
        Err(err) => json!({ "error": err.to_string() }),
    }
}
