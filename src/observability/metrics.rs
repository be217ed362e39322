//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relay requests by outcome
//! - `relay_downstream_duration_seconds` (histogram): downstream call latency
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

pub const RELAY_REQUESTS_TOTAL: &str = "relay_requests_total";
pub const DOWNSTREAM_DURATION_SECONDS: &str = "relay_downstream_duration_seconds";

/// How a `POST /myimg` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Ok,
    MissingParameter,
    UpstreamUnavailable,
}

impl RelayOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::MissingParameter => "missing_parameter",
            Self::UpstreamUnavailable => "upstream_unavailable",
        }
    }
}

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Needs a running Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    metrics::describe_counter!(RELAY_REQUESTS_TOTAL, "Relay requests by outcome");
    metrics::describe_histogram!(
        DOWNSTREAM_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Latency of calls to the downstream service"
    );

    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Count one finished relay request.
pub fn record_relay(outcome: RelayOutcome) {
    metrics::counter!(RELAY_REQUESTS_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

/// Record how long a downstream call took, successful or not.
pub fn record_downstream_latency(started: Instant) {
    metrics::histogram!(DOWNSTREAM_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_and_latency_are_recorded() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_relay(RelayOutcome::Ok);
            record_relay(RelayOutcome::Ok);
            record_relay(RelayOutcome::MissingParameter);
            record_relay(RelayOutcome::UpstreamUnavailable);
            record_downstream_latency(Instant::now());
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"relay_requests_total{outcome="ok"} 2"#), "{rendered}");
        assert!(rendered.contains(r#"relay_requests_total{outcome="missing_parameter"} 1"#), "{rendered}");
        assert!(rendered.contains(r#"relay_requests_total{outcome="upstream_unavailable"} 1"#), "{rendered}");
        assert!(rendered.contains("relay_downstream_duration_seconds_count 1"), "{rendered}");
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(RelayOutcome::Ok.as_str(), "ok");
        assert_eq!(RelayOutcome::MissingParameter.as_str(), "missing_parameter");
        assert_eq!(RelayOutcome::UpstreamUnavailable.as_str(), "upstream_unavailable");
    }
}
