//! Configuration validation.
//!
//! Serde handles the syntax; this module checks the values make sense.
//! Every problem is reported, not just the first one.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.host must not be empty")]
    EmptyHost,

    #[error("downstream.endpoint '{endpoint}' is invalid: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a configuration, collecting every error found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    if let Err(reason) = check_endpoint(&config.downstream.endpoint) {
        errors.push(ValidationError::InvalidEndpoint {
            endpoint: config.downstream.endpoint.clone(),
            reason,
        });
    }

    if config.downstream.timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroValue { field: "downstream.timeout_secs" });
    }
    if config.downstream.connect_timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroValue { field: "downstream.connect_timeout_secs" });
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroValue { field: "limits.max_body_bytes" });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_endpoint(endpoint: &str) -> Result<(), String> {
    let url = Url::parse(endpoint).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}'", other)),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
