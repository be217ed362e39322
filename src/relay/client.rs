//! HTTP client for the downstream image-processing service.

use url::Url;

use crate::config::DownstreamConfig;
use crate::relay::types::{
    ClientInitError, DownstreamPayload, DownstreamRequest, InboundRequest, UpstreamError,
};

/// Longest slice of a downstream error body kept for logging.
const MAX_ERROR_DETAIL: usize = 512;

/// Client bound to one fixed downstream endpoint.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct DownstreamClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl DownstreamClient {
    /// Create a client from configuration.
    ///
    /// No timeouts are applied unless the config sets them.
    pub fn new(config: &DownstreamConfig) -> Result<Self, ClientInitError> {
        let endpoint = Url::parse(&config.endpoint)?;

        let mut builder = reqwest::Client::builder();
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build()?;

        tracing::debug!(endpoint = %endpoint, "Downstream client initialized");

        Ok(Self { client, endpoint })
    }

    /// The endpoint every call is sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one request downstream and return its JSON body.
    ///
    /// Any 2xx status counts as success. There are no retries.
    pub async fn relay(&self, request: &InboundRequest) -> Result<DownstreamPayload, UpstreamError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&DownstreamRequest { url: &request.url })
            .send()
            .await
            .map_err(UpstreamError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let detail = read_error_detail(response, MAX_ERROR_DETAIL).await;
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.bytes().await.map_err(UpstreamError::from_transport)?;
        DownstreamPayload::from_bytes(body)
    }
}

/// Read at most `max` bytes of an error body, chunk by chunk. The rest of
/// the body is never buffered; dropping the response discards it.
async fn read_error_detail(mut response: reqwest::Response, max: usize) -> String {
    let mut buf: Vec<u8> = Vec::new();
    while buf.len() < max {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(max - buf.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to read downstream error body");
                break;
            }
        }
    }

    let mut detail = String::from_utf8_lossy(&buf).into_owned();
    truncate_at_char_boundary(&mut detail, max);
    detail
}

fn truncate_at_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}
