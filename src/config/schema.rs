//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the wallet core.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletCoreConfig {
    /// Extension detection polling.
    pub detection: DetectionConfig,

    /// Stellar network and Horizon settings.
    pub network: NetworkConfig,

    /// Asset issuers.
    pub assets: AssetConfig,

    /// Donation-record endpoint.
    pub donations: DonationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Detection poller settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Delay between checks in milliseconds.
    pub interval_ms: u64,

    /// Checks before `detect` reports a wallet as unavailable.
    pub detect_attempts: u32,

    /// Checks before `connect` gives up with NotInstalled.
    pub connect_attempts: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            detect_attempts: 15,
            connect_attempts: 20,
        }
    }
}

/// Network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Network assumed for wallets that do not report one (Albedo, xBull)
    /// and used for donations.
    pub default_network: String,

    /// Primary Horizon URL.
    pub horizon_url: String,

    /// Failover Horizon URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Horizon request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            default_network: "TESTNET".to_string(),
            horizon_url: "https://horizon-testnet.stellar.org".to_string(),
            failover_urls: Vec::new(),
            timeout_secs: 30,
        }
    }
}

/// Asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetConfig {
    /// USDC issuer account on the configured network.
    pub usdc_issuer: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            // Circle's testnet USDC issuer
            usdc_issuer: "GBBD47IF6LWK7P7MDEVSCWR7DPUWV3NY3DTQEVFL4NAT4AQH3ZLLFLA5".to_string(),
        }
    }
}

/// Donation-record endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DonationConfig {
    /// Record donations after a successful payment.
    pub enabled: bool,

    /// Full URL of the donation-record endpoint.
    pub endpoint_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DonationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint_url: "http://localhost:3000/api/donations".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: WalletCoreConfig = toml::from_str("").unwrap();
        assert_eq!(config.detection.interval_ms, 100);
        assert_eq!(config.detection.detect_attempts, 15);
        assert_eq!(config.detection.connect_attempts, 20);
        assert_eq!(config.network.default_network, "TESTNET");
    }

    #[test]
    fn test_partial_section_override() {
        let config: WalletCoreConfig = toml::from_str(
            r#"
            [network]
            default_network = "PUBLIC"
            horizon_url = "https://horizon.stellar.org"
            failover_urls = ["https://horizon.example.org"]

            [detection]
            connect_attempts = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.network.default_network, "PUBLIC");
        assert_eq!(config.network.failover_urls.len(), 1);
        assert_eq!(config.network.timeout_secs, 30);
        assert_eq!(config.detection.connect_attempts, 5);
        assert_eq!(config.detection.detect_attempts, 15);
    }
}
