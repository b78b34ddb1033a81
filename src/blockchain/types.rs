//! Network identifiers and collaborator error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// Re-export NetworkConfig from config module to avoid duplication
pub use crate::config::schema::NetworkConfig;

/// Passphrase for the Stellar public network.
pub const PUBLIC_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";
/// Passphrase for the Stellar test network.
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Stellar networks a wallet may be connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StellarNetwork {
    Public,
    Testnet,
}

impl StellarNetwork {
    /// Resolve a network name as wallets report it ("TESTNET", "PUBLIC",
    /// lowercase variants) or a full network passphrase.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            PUBLIC_PASSPHRASE => return Some(StellarNetwork::Public),
            TESTNET_PASSPHRASE => return Some(StellarNetwork::Testnet),
            _ => {}
        }
        match name.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" | "MAINNET" | "PUBNET" => Some(StellarNetwork::Public),
            "TESTNET" | "TEST" => Some(StellarNetwork::Testnet),
            _ => None,
        }
    }

    /// Canonical uppercase name, as Freighter reports it.
    pub fn name(&self) -> &'static str {
        match self {
            StellarNetwork::Public => "PUBLIC",
            StellarNetwork::Testnet => "TESTNET",
        }
    }

    pub fn passphrase(&self) -> &'static str {
        match self {
            StellarNetwork::Public => PUBLIC_PASSPHRASE,
            StellarNetwork::Testnet => TESTNET_PASSPHRASE,
        }
    }

    /// Lowercase name used by Albedo intents.
    pub fn albedo_name(&self) -> &'static str {
        match self {
            StellarNetwork::Public => "public",
            StellarNetwork::Testnet => "testnet",
        }
    }

    /// SDF-operated Horizon instance for this network.
    pub fn default_horizon_url(&self) -> &'static str {
        match self {
            StellarNetwork::Public => "https://horizon.stellar.org",
            StellarNetwork::Testnet => "https://horizon-testnet.stellar.org",
        }
    }
}

impl fmt::Display for StellarNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Passphrase for a network name, passing unknown values through untouched
/// so a wallet can be handed a custom passphrase directly.
pub fn passphrase_for(network: &str) -> String {
    StellarNetwork::from_name(network)
        .map(|n| n.passphrase().to_string())
        .unwrap_or_else(|| network.to_string())
}

/// Errors from the network and donation-record collaborators.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Transport failure or unexpected response.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Request timed out.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// The ledger rejected the transaction. Message is passed through.
    #[error("{0}")]
    Rejected(String),

    /// Horizon is serving a different network than configured.
    #[error("network mismatch: expected '{expected}', got '{actual}'")]
    NetworkMismatch { expected: String, actual: String },

    /// Malformed endpoint URL.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Result type for collaborator calls.
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Outcome of handing a signed envelope to the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub hash: String,
    /// Ledger the transaction was included in, when reported.
    pub ledger: Option<u64>,
}
