//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WalletCoreConfig (validated, immutable)
//!     → sections handed to the adapters, poller, Horizon client and recorder
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::AssetConfig;
pub use schema::DetectionConfig;
pub use schema::DonationConfig;
pub use schema::NetworkConfig;
pub use schema::ObservabilityConfig;
pub use schema::WalletCoreConfig;
