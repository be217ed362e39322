//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoint of the tile generator when nothing else is configured.
pub const DEFAULT_DOWNSTREAM_ENDPOINT: &str = "http://localhost:5000/generate_dzi";

/// Root configuration for the image relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Downstream image-processing service.
    pub downstream: DownstreamConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Log output settings.
    pub logging: LoggingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. `0` asks the OS for an ephemeral port.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Downstream service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// Absolute URL the relay POSTs `{ "url": ... }` to.
    pub endpoint: String,

    /// Total request timeout in seconds. Unset means no timeout.
    pub timeout_secs: Option<u64>,

    /// Connection establishment timeout in seconds. Unset means no timeout.
    pub connect_timeout_secs: Option<u64>,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` for downstream calls.
    pub use_system_proxy: bool,
}

impl DownstreamConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DOWNSTREAM_ENDPOINT.to_string(),
            timeout_secs: None,
            connect_timeout_secs: None,
            use_system_proxy: false,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allow any origin, method and header.
    pub enabled: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for log aggregation.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is not set.
    pub filter: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "image_relay=info,tower_http=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.downstream.endpoint, DEFAULT_DOWNSTREAM_ENDPOINT);
        assert!(config.downstream.timeout().is_none());
        assert!(config.cors.enabled);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_sections() {
        let config: RelayConfig = toml::from_str(
            r#"
            [listener]
            port = 3000

            [downstream]
            endpoint = "http://tiles.internal:5000/generate_dzi"
            timeout_secs = 120

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.downstream.timeout(), Some(Duration::from_secs(120)));
        assert!(config.downstream.connect_timeout().is_none());
        assert_eq!(config.logging.format, LogFormat::Json);
    }
}
