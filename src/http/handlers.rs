//! Route handlers for `GET /` and `POST /myimg`.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::Html,
};
use std::time::Instant;

use crate::http::response::GREETING_HTML;
use crate::http::server::AppState;
use crate::observability::metrics::{self, RelayOutcome};
use crate::relay::{DownstreamPayload, InboundRequest, RelayError};

/// `POST /myimg`: validate, forward once, pass the result back.
pub async fn relay_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<DownstreamPayload, RelayError> {
    let content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let request = match InboundRequest::parse(content_type, &body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(
                body_len = body.len(),
                content_type = content_type.unwrap_or("none"),
                "Rejected relay request without url"
            );
            metrics::record_relay(RelayOutcome::MissingParameter);
            return Err(e);
        }
    };

    tracing::debug!(
        url = %request.url,
        endpoint = %state.downstream.endpoint(),
        "Relaying image request"
    );

    let started = Instant::now();
    let result = state.downstream.relay(&request).await;
    metrics::record_downstream_latency(started);

    match result {
        Ok(payload) => {
            tracing::info!(
                url = %request.url,
                bytes = payload.as_bytes().len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Relay succeeded"
            );
            metrics::record_relay(RelayOutcome::Ok);
            Ok(payload)
        }
        Err(e) => {
            tracing::error!(
                url = %request.url,
                kind = e.kind(),
                error = %e,
                "Error fetching from downstream"
            );
            metrics::record_relay(RelayOutcome::UpstreamUnavailable);
            Err(RelayError::from(e))
        }
    }
}

/// `GET /`: liveness greeting.
pub async fn liveness() -> Html<&'static str> {
    tracing::info!("Someone entered the server");
    Html(GREETING_HTML)
}
