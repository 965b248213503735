//! Prometheus metrics
//!
//! Counters are recorded through the `metrics` facade. Without an installed
//! recorder they are no-ops.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;
use voice_relay_config::ObservabilityConfig;

/// Install the Prometheus exporter when enabled
///
/// Serves `/metrics` on its own listener at `metrics_port`. Must be called
/// from within a tokio runtime.
pub fn init_metrics(config: &ObservabilityConfig, host: &str) -> Result<bool, String> {
    if !config.metrics_enabled {
        return Ok(false);
    }

    let addr: SocketAddr = format!("{}:{}", host, config.metrics_port)
        .parse()
        .map_err(|e| format!("Invalid metrics address: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics listener started");
    Ok(true)
}

/// Count a handled notification request
pub fn record_request(endpoint: &'static str, status: u16) {
    metrics::counter!(
        "notify_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Count a request rejected by the rate limiter
pub fn record_rate_limited() {
    metrics::counter!("rate_limited_total").increment(1);
}
