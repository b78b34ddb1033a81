//! Configuration validation.
//!
//! Serde handles syntax; this checks values. All problems are reported,
//! not just the first.

use std::fmt;

use crate::blockchain::types::StellarNetwork;
use crate::config::schema::WalletCoreConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &WalletCoreConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let detection = &config.detection;
    if detection.interval_ms == 0 {
        errors.push(ValidationError::new("detection.interval_ms", "must be greater than 0"));
    }
    if detection.detect_attempts == 0 {
        errors.push(ValidationError::new("detection.detect_attempts", "must be at least 1"));
    }
    if detection.connect_attempts == 0 {
        errors.push(ValidationError::new("detection.connect_attempts", "must be at least 1"));
    }

    let network = &config.network;
    if StellarNetwork::from_name(&network.default_network).is_none() {
        errors.push(ValidationError::new(
            "network.default_network",
            format!("unknown network '{}'", network.default_network),
        ));
    }
    if let Err(e) = url::Url::parse(&network.horizon_url) {
        errors.push(ValidationError::new("network.horizon_url", e.to_string()));
    }
    for failover in &network.failover_urls {
        if let Err(e) = url::Url::parse(failover) {
            errors.push(ValidationError::new(
                "network.failover_urls",
                format!("'{}': {}", failover, e),
            ));
        }
    }
    if network.timeout_secs == 0 {
        errors.push(ValidationError::new("network.timeout_secs", "must be greater than 0"));
    }

    if config.assets.usdc_issuer.trim().is_empty() {
        errors.push(ValidationError::new("assets.usdc_issuer", "must not be empty"));
    }

    let donations = &config.donations;
    if donations.enabled {
        if let Err(e) = url::Url::parse(&donations.endpoint_url) {
            errors.push(ValidationError::new("donations.endpoint_url", e.to_string()));
        }
        if donations.timeout_secs == 0 {
            errors.push(ValidationError::new("donations.timeout_secs", "must be greater than 0"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
