//! Configuration validation.
//!
//! Returns every problem found, not just the first, so a broken config file
//! can be fixed in one pass.

use std::net::SocketAddr;

use crate::config::schema::WalletConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn error(field: &'static str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field,
        message: message.into(),
    }
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &WalletConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.rpc.url.parse::<url::Url>() {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(error("rpc.url", format!("unsupported scheme '{}'", url.scheme())));
        }
        Ok(_) => {}
        Err(e) => errors.push(error("rpc.url", format!("invalid URL '{}': {}", config.rpc.url, e))),
    }

    if config.rpc.chain_id == 0 {
        errors.push(error("rpc.chain_id", "must be non-zero"));
    }
    if config.rpc.timeout_secs == 0 {
        errors.push(error("rpc.timeout_secs", "must be greater than zero"));
    }
    if config.poller.interval_secs == 0 {
        errors.push(error("poller.interval_secs", "must be greater than zero"));
    }
    if config.transfer.confirmation_timeout_secs == 0 {
        errors.push(error("transfer.confirmation_timeout_secs", "must be greater than zero"));
    }
    if config.transfer.receipt_poll_interval_ms == 0 {
        errors.push(error("transfer.receipt_poll_interval_ms", "must be greater than zero"));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(error(
            "observability.metrics_address",
            format!("not a socket address: '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&WalletConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = WalletConfig::default();
        config.rpc.url = "not a url".to_string();
        config.rpc.chain_id = 0;
        config.poller.interval_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["rpc.url", "rpc.chain_id", "poller.interval_secs"]);
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = WalletConfig::default();
        config.rpc.url = "ws://localhost:8546".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "rpc.url");
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = WalletConfig::default();
        config.observability.metrics_address = "nope".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
