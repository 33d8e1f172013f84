//! Metrics collection and exposition.
//!
//! # Metrics
//! - `davinci_wallet_rpc_queries_total` (counter): RPC calls by op, outcome
//! - `davinci_wallet_block_height` (gauge): last polled block height
//! - `davinci_wallet_transfers_total` (counter): transfers by outcome
//! - `davinci_wallet_poller_running` (gauge): 1=running, 0=stopped

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_rpc_query(op: &'static str, outcome: &'static str) {
    counter!("davinci_wallet_rpc_queries_total", "op" => op, "outcome" => outcome).increment(1);
}

pub fn record_block_height(height: u64) {
    gauge!("davinci_wallet_block_height").set(height as f64);
}

pub fn record_transfer(outcome: &'static str) {
    counter!("davinci_wallet_transfers_total", "outcome" => outcome).increment(1);
}

pub fn record_poller_running(running: bool) {
    gauge!("davinci_wallet_poller_running").set(if running { 1.0 } else { 0.0 });
}
