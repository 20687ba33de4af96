//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ersatz_requests_total` (counter): fixture requests by method, status
//! - `ersatz_request_duration_seconds` (histogram): resolution latency
//! - `ersatz_cache_hits_total` / `ersatz_cache_misses_total` (counters)
//! - `ersatz_variations_scheduled_total` / `ersatz_variations_consumed_total` (counters)
//! - `ersatz_routes_discovered` (gauge): routes found at startup
//!
//! Recording is a no-op until a recorder is installed, so library users and
//! tests pay nothing when the exporter is disabled.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "ersatz_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("ersatz_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_cache_lookup(hit: bool) {
    if hit {
        counter!("ersatz_cache_hits_total").increment(1);
    } else {
        counter!("ersatz_cache_misses_total").increment(1);
    }
}

pub fn record_variation_scheduled() {
    counter!("ersatz_variations_scheduled_total").increment(1);
}

pub fn record_variation_consumed() {
    counter!("ersatz_variations_consumed_total").increment(1);
}

pub fn record_routes_discovered(count: usize) {
    gauge!("ersatz_routes_discovered").set(count as f64);
}
