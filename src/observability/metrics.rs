//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatches by method, status
//! - `router_dispatch_duration_seconds` (histogram): dispatch latency by method
//!
//! Without an installed recorder the macros are no-ops, so the router can be
//! used as a library without the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished dispatch.
pub fn record_dispatch(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    ::metrics::counter!(
        "router_dispatch_total",
        "method" => method.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("router_dispatch_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}
