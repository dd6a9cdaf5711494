//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_resolutions_total` (counter): resolutions by outcome
//! - `router_resolution_duration_seconds` (histogram): discovery latency
//! - `router_requests_total` (counter): dispatched requests by verb and status
//!   (non-standard verbs are labelled "other")
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Outcome labels come from a closed set (error kinds plus "resolved")

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record one resolution attempt.
pub fn record_resolution(outcome: &'static str, start: Instant) {
    ::metrics::counter!("router_resolutions_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("router_resolution_duration_seconds").record(start.elapsed().as_secs_f64());
}

const KNOWN_VERBS: [&str; 10] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH", "CLI",
];

/// Label value for `verb`; anything non-standard collapses to "other".
pub fn verb_label(verb: &str) -> &'static str {
    KNOWN_VERBS
        .iter()
        .find(|known| **known == verb)
        .copied()
        .unwrap_or("other")
}

/// Record one dispatched request.
pub fn record_request(verb: &str, status: u16) {
    ::metrics::counter!(
        "router_requests_total",
        "verb" => verb_label(verb),
        "status" => status.to_string()
    )
    .increment(1);
}
