//! Stellar network integration subsystem.
//!
//! # Data Flow
//! ```text
//! SignedEnvelope (from the wallet)
//!     → client.rs (POST /transactions on the primary Horizon)
//!     → transport error / timeout / 5xx: next failover endpoint
//!     → 4xx problem document: NetworkError::Rejected with result codes
//!     → SubmitResponse {hash, ledger}
//! ```
//!
//! # Security Constraints
//! - Signing keys never enter this crate; only signed envelopes do
//! - Envelopes are never logged
//! - All Horizon calls have a configurable timeout

pub mod client;
pub mod types;

pub use client::HorizonClient;
pub use types::{NetworkConfig, NetworkError, NetworkResult, StellarNetwork, SubmitResponse};
