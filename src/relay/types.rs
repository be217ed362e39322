//! Relay request/result types and error definitions.

use axum::body::Bytes;
use serde::de::IgnoredAny;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A validated `POST /myimg` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    pub url: String,
}

impl InboundRequest {
    /// Parse a request from its `Content-Type` and body.
    ///
    /// A body that is not declared as JSON is not read at all, so it
    /// counts as a request without `url`.
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self, RelayError> {
        match content_type {
            Some(value) if is_json_content_type(value) => Self::from_body(body),
            _ => Err(RelayError::MissingParameter),
        }
    }

    /// Parse a raw request body.
    ///
    /// Anything that is not a JSON object with a non-empty string `url`
    /// (an empty body, malformed JSON, `null`, `""`, a number) is reported
    /// as [`RelayError::MissingParameter`].
    pub fn from_body(body: &[u8]) -> Result<Self, RelayError> {
        let Ok(Value::Object(mut fields)) = serde_json::from_slice::<Value>(body) else {
            return Err(RelayError::MissingParameter);
        };

        match fields.remove("url") {
            Some(Value::String(url)) if !url.is_empty() => Ok(Self { url }),
            _ => Err(RelayError::MissingParameter),
        }
    }
}

/// `application/json` or any `+json` type, parameters such as charset
/// ignored.
pub fn is_json_content_type(value: &str) -> bool {
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.contains('/') && essence.ends_with("+json"))
}

/// Body sent to the downstream service.
#[derive(Debug, Serialize)]
pub(crate) struct DownstreamRequest<'a> {
    pub url: &'a str,
}

/// Successful downstream response body.
///
/// The bytes are known to be a single well-formed JSON document but are
/// otherwise untouched, so they can be handed back to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownstreamPayload(Bytes);

impl DownstreamPayload {
    pub fn from_bytes(bytes: Bytes) -> Result<Self, UpstreamError> {
        serde_json::from_slice::<IgnoredAny>(&bytes).map_err(UpstreamError::MalformedBody)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

/// Why the downstream call did not produce a usable payload.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection refused, reset, DNS failure, broken body stream.
    #[error("downstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// A configured downstream timeout elapsed.
    #[error("downstream request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Downstream answered with a non-2xx status.
    #[error("downstream returned status {status}: {detail}")]
    Status { status: u16, detail: String },

    /// Downstream answered 2xx but the body is not JSON.
    #[error("downstream returned a malformed body: {0}")]
    MalformedBody(#[source] serde_json::Error),
}

impl UpstreamError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Transport(err)
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Timeout(_) => "timeout",
            Self::Status { .. } => "status",
            Self::MalformedBody(_) => "malformed_body",
        }
    }
}

/// Per-request failure of the relay operation.
///
/// The display strings are exactly what the caller sees; the upstream
/// cause stays reachable through `source()` for logging.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing 'url' in request body")]
    MissingParameter,

    #[error("Error fetching data from external source")]
    UpstreamUnavailable(#[from] UpstreamError),
}

/// Failure to construct the downstream client at startup.
#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error("invalid downstream endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_non_empty_url() {
        let req = InboundRequest::from_body(br#"{"url": "https://pds.example/ctx/B01_0001.IMG"}"#).unwrap();
        assert_eq!(req.url, "https://pds.example/ctx/B01_0001.IMG");

        // Extra fields are ignored
        let req = InboundRequest::from_body(br#"{"url": "a", "zoom": 3}"#).unwrap();
        assert_eq!(req.url, "a");
    }

    #[test]
    fn test_rejects_missing_or_falsy_url() {
        let bodies: [&[u8]; 8] = [
            b"{}",
            br#"{"url": ""}"#,
            br#"{"url": null}"#,
            br#"{"url": 42}"#,
            br#"{"url": false}"#,
            br#"["url"]"#,
            b"",
            b"url=https://example.com",
        ];
        for body in bodies {
            let err = InboundRequest::from_body(body).unwrap_err();
            assert!(
                matches!(err, RelayError::MissingParameter),
                "body {:?} should be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_content_type_gates_parsing() {
        let body = br#"{"url": "https://pds.example/a.IMG"}"#;

        assert!(InboundRequest::parse(Some("application/json"), body).is_ok());
        assert!(InboundRequest::parse(Some("Application/JSON; charset=utf-8"), body).is_ok());
        assert!(InboundRequest::parse(Some("application/vnd.relay+json"), body).is_ok());

        for content_type in [None, Some("text/plain"), Some("application/x-www-form-urlencoded"), Some("+json")] {
            let err = InboundRequest::parse(content_type, body).unwrap_err();
            assert!(matches!(err, RelayError::MissingParameter), "{:?}", content_type);
        }
    }

    #[test]
    fn test_payload_keeps_original_bytes() {
        let raw = Bytes::from_static(br#"{"metadata": {"LINES": 7168},  "dzi_path": "x.dzi"}"#);
        let payload = DownstreamPayload::from_bytes(raw.clone()).unwrap();
        assert_eq!(payload.as_bytes(), &raw[..]);
    }

    #[test]
    fn test_payload_rejects_non_json() {
        let bodies: [&[u8]; 3] = [b"", b"<html>oops</html>", b"{\"a\": 1} trailing"];
        for raw in bodies {
            let err = DownstreamPayload::from_bytes(Bytes::copy_from_slice(raw)).unwrap_err();
            assert_eq!(err.kind(), "malformed_body");
        }
    }

    #[test]
    fn test_error_messages_hide_cause() {
        let err = RelayError::from(UpstreamError::Status {
            status: 500,
            detail: "Failed to download".into(),
        });
        assert_eq!(err.to_string(), "Error fetching data from external source");
        assert!(std::error::Error::source(&err).is_some());
    }
}
