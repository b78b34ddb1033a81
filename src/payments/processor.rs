//! Donation flow.
//!
//! # Data Flow
//! ```text
//! WalletSession (connected) + ProjectTarget
//!     → PaymentRequest (donor → project wallet, "Donation to {title}" memo)
//!     → PaymentSubmitter (sign via session, submit)
//!     → DonationRecorder (only when donations.enabled; failure is logged)
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::blockchain::types::NetworkResult;
use crate::config::DonationConfig;
use crate::observability::metrics;
use crate::payments::donation::{DonationRecord, DonationRecorder, HttpDonationRecorder};
use crate::payments::submitter::PaymentSubmitter;
use crate::payments::types::{Asset, PaymentError, PaymentRequest, PaymentResult, SubmitReceipt, MAX_MEMO_BYTES};
use crate::session::WalletSession;
use crate::wallet::{short_key, WalletError};

/// The project a donation goes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTarget {
    pub id: String,
    pub title: String,
    /// Receiving account. Projects without one cannot take donations.
    pub wallet_address: Option<String>,
}

/// Result of a settled donation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationOutcome {
    pub receipt: SubmitReceipt,
    /// Whether the backend accepted the donation record.
    pub recorded: bool,
}

/// Drives a donation from the connected wallet to a project.
pub struct DonationProcessor {
    submitter: PaymentSubmitter,
    recorder: Option<Arc<dyn DonationRecorder>>,
}

impl DonationProcessor {
    /// Processor with an explicit recorder; `None` skips recording.
    ///
    /// This does not consult `donations.enabled`. Use [`Self::from_config`]
    /// to honour it.
    pub fn new(submitter: PaymentSubmitter, recorder: Option<Arc<dyn DonationRecorder>>) -> Self {
        Self { submitter, recorder }
    }

    /// Processor recording to the configured endpoint, or not recording at
    /// all when `enabled` is false.
    pub fn from_config(submitter: PaymentSubmitter, config: &DonationConfig) -> NetworkResult<Self> {
        let recorder = if config.enabled {
            Some(Arc::new(HttpDonationRecorder::new(config)?) as Arc<dyn DonationRecorder>)
        } else {
            tracing::debug!("Donation recording disabled");
            None
        };
        Ok(Self::new(submitter, recorder))
    }

    /// Whether settled donations are recorded.
    pub fn records_donations(&self) -> bool {
        self.recorder.is_some()
    }

    /// Pay `amount` of `asset` to `project` from the session's wallet, then
    /// record it.
    ///
    /// A failed record is logged and reported through `recorded`; the payment
    /// has already settled by then and is still a success.
    pub async fn donate(
        &self,
        session: &WalletSession,
        project: &ProjectTarget,
        amount: &str,
        asset: Asset,
    ) -> PaymentResult<DonationOutcome> {
        let connection = session
            .state()
            .connection
            .ok_or(PaymentError::SigningFailed(WalletError::NotConnected))?;
        let destination = project
            .wallet_address
            .as_deref()
            .filter(|addr| !addr.trim().is_empty())
            .ok_or(PaymentError::NoDestination)?;

        let request = PaymentRequest {
            source_public_key: connection.public_key.clone(),
            destination_public_key: destination.to_string(),
            amount: amount.trim().to_string(),
            asset,
            memo: Some(donation_memo(&project.title)),
            network: connection.network.clone(),
        };

        let receipt = self
            .submitter
            .submit(&request, |xdr, network| async move { session.sign(&xdr, &network).await })
            .await?;
        info!(
            project_id = %project.id,
            donor = short_key(&connection.public_key),
            hash = %receipt.hash,
            "Donation settled"
        );

        let recorded = match &self.recorder {
            Some(recorder) => {
                let record = DonationRecord {
                    project_id: project.id.clone(),
                    donor_wallet: connection.public_key.clone(),
                    amount: request.amount.clone(),
                    asset,
                    tx_hash: receipt.hash.clone(),
                    network: request.network.clone(),
                };
                match recorder.record(&record).await {
                    Ok(()) => {
                        metrics::record_donation("recorded");
                        true
                    }
                    Err(e) => {
                        metrics::record_donation("failed");
                        warn!(project_id = %project.id, hash = %receipt.hash, error = %e, "Failed to record donation");
                        false
                    }
                }
            }
            None => false,
        };

        Ok(DonationOutcome { receipt, recorded })
    }
}

/// Text memo for a donation, cut to the ledger's limit on a char boundary.
pub fn donation_memo(title: &str) -> String {
    let mut memo = format!("Donation to {}", title.trim());
    if memo.len() > MAX_MEMO_BYTES {
        let mut end = MAX_MEMO_BYTES;
        while !memo.is_char_boundary(end) {
            end -= 1;
        }
        memo.truncate(end);
    }
    memo
}
