//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! adapter detect/connect:
//!     → poller.rs (check binding every interval, bounded attempts)
//!     → found: proceed to the extension call
//!     → exhausted: report unavailable / NotInstalled
//! ```
//!
//! # Design Decisions
//! - Detection is bounded; extension calls are not (the user may take
//!   arbitrarily long to answer a prompt)
//! - Connect and sign are never retried automatically

pub mod poller;

pub use poller::{DetectionPoller, PollObserver, TracingObserver};
