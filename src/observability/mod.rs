//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! poller / adapters / session / submitter produce:
//!     → logging.rs (structured log events, session id as correlation field)
//!     → metrics.rs (counters, histograms)
//! ```

pub mod logging;
pub mod metrics;
