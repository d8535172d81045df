//! Metrics collection and exposition.
//!
//! # Metrics
//! - `faxme_webhook_requests_total` (counter): requests by endpoint, status
//! - `faxme_fax_decisions_total` (counter): accept/reject directives
//! - `faxme_notifications_total` (counter): SMS attempts by outcome
//! - `faxme_directory_refresh_total` (counter): refreshes by outcome
//! - `faxme_directory_accounts` (gauge): accounts in the visible snapshot
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_webhook(endpoint: &'static str, status: u16) {
    counter!(
        "faxme_webhook_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_decision(decision: &'static str) {
    counter!("faxme_fax_decisions_total", "decision" => decision).increment(1);
}

pub fn record_notification(outcome: &'static str) {
    counter!("faxme_notifications_total", "outcome" => outcome).increment(1);
}

pub fn record_directory_refresh(outcome: &'static str) {
    counter!("faxme_directory_refresh_total", "outcome" => outcome).increment(1);
}

pub fn record_directory_size(accounts: usize) {
    gauge!("faxme_directory_accounts").set(accounts as f64);
}
