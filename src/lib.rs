//! Stellar browser-wallet bridge.
//!
//! Detects Freighter, Albedo and xBull, holds one active wallet connection
//! per page, collects signatures through it and submits the signed payment
//! to Horizon before recording the donation with the platform backend.

pub mod config;
pub mod observability;
pub mod resilience;

pub mod wallet;
pub mod session;

pub mod blockchain;
pub mod payments;

pub use config::schema::WalletCoreConfig;
pub use session::WalletSession;
pub use wallet::{WalletError, WalletKind};
