//! Response shaping.
//!
//! Maps relay outcomes onto HTTP:
//! - `DownstreamPayload` → 200, downstream bytes unchanged
//! - `MissingParameter` → 400 `{"error": ...}`
//! - `UpstreamUnavailable` → 500 `{"message": ...}`, cause withheld

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::relay::{DownstreamPayload, RelayError};

/// Static page served on `GET /`.
pub const GREETING_HTML: &str = "<h1>Hello World</h1>";

/// Body of a rejected request.
#[derive(Debug, Serialize)]
pub struct ValidationErrorBody {
    pub error: String,
}

/// Body of a request the relay could not complete.
#[derive(Debug, Serialize)]
pub struct UpstreamErrorBody {
    pub message: String,
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingParameter => StatusCode::BAD_REQUEST,
            RelayError::UpstreamUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Display carries the public message only.
        let text = self.to_string();
        match self {
            RelayError::MissingParameter => {
                (status, Json(ValidationErrorBody { error: text })).into_response()
            }
            RelayError::UpstreamUnavailable(_) => {
                (status, Json(UpstreamErrorBody { message: text })).into_response()
            }
        }
    }
}

impl IntoResponse for DownstreamPayload {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            self.into_bytes(),
        )
            .into_response()
    }
}
