//! Wallet session subsystem.
//!
//! # Data Flow
//! ```text
//! UI action
//!     → manager.rs (WalletSession: connect / sign / disconnect / check_available)
//!     → state.rs (atomic transition on the watch channel)
//!     → adapter call (unbounded, user-paced)
//!     → state.rs (completion applied only if its generation is still current)
//!     → subscribers notified
//! ```
//!
//! # Design Decisions
//! - One session per page, passed by reference; never a global
//! - Disconnect always wins over an in-flight connect or sign
//! - Replacing a connection does not call the old adapter's disconnect

pub mod manager;
pub mod state;

pub use manager::WalletSession;
pub use state::{SessionState, SessionStatus};
