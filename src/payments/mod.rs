//! Payment subsystem.
//!
//! # Data Flow
//! ```text
//! ProjectTarget + connected wallet
//!     → processor.rs (derive PaymentRequest, memo)
//!     → submitter.rs (validate → build → sign via session → submit)
//!     → donation.rs (record the settled donation, best effort)
//! ```

pub mod donation;
pub mod processor;
pub mod submitter;
pub mod types;

pub use donation::{DonationRecord, DonationRecorder, HttpDonationRecorder};
pub use processor::{DonationOutcome, DonationProcessor, ProjectTarget};
pub use submitter::{NetworkSubmitter, PaymentSubmitter, TransactionBuilder};
pub use types::{Asset, PaymentError, PaymentRequest, PaymentResult, SubmitReceipt};
