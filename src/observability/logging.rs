//! Structured logging.
//!
//! `RUST_LOG` takes precedence over the configured level. Output goes to
//! stderr so it does not interleave with the interactive display on stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive for a configured level, scoped to this crate.
pub fn filter_directive(config: &ObservabilityConfig) -> String {
    format!("davinci_wallet={},warn", config.log_level)
}

/// Install the global tracing subscriber.
///
/// Returns false if a subscriber was already installed.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
