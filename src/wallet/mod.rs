//! Wallet adapter subsystem.
//!
//! # Data Flow
//! ```text
//! ExtensionScope (injected bindings: freighterApi | stellar | albedo | xBull)
//!     → binding.rs (typed view of each extension's call surface)
//!     → freighter.rs / albedo.rs / xbull.rs (detect, connect, sign, disconnect)
//!     → adapter.rs (uniform WalletAdapter contract)
//!     → session (one active connection at a time)
//! ```
//!
//! # Design Decisions
//! - Adapters never touch session state; errors are classified into
//!   `WalletError` at the adapter boundary
//! - A binding may appear or vanish at any time, so every call re-reads it
//!   from the scope

pub mod adapter;
pub mod albedo;
pub mod binding;
pub mod error;
pub mod freighter;
pub mod types;
pub mod xbull;

pub use adapter::{build_adapters, AdapterContext, WalletAdapter};
pub use binding::{ExtensionError, ExtensionScope};
pub use error::{WalletError, WalletResult};
pub use types::{short_key, SignedEnvelope, WalletConnection, WalletInfo, WalletKind};
