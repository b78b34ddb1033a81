//! Validate → build → sign → submit.
//!
//! The submitter owns none of the steps. Building and submitting are
//! collaborators behind traits; signing is a caller-supplied closure,
//! normally `WalletSession::sign`. Nothing is persisted.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::blockchain::types::{NetworkResult, StellarNetwork, SubmitResponse};
use crate::observability::metrics;
use crate::payments::types::{PaymentError, PaymentRequest, PaymentResult, SubmitReceipt};
use crate::wallet::{SignedEnvelope, WalletResult};

/// Builds an unsigned transaction envelope for a payment.
#[async_trait]
pub trait TransactionBuilder: Send + Sync {
    async fn build_payment(&self, request: &PaymentRequest) -> NetworkResult<String>;
}

/// Submits a signed envelope to the network.
#[async_trait]
pub trait NetworkSubmitter: Send + Sync {
    async fn submit(&self, envelope: &SignedEnvelope) -> NetworkResult<SubmitResponse>;

    /// The one network this submitter reaches, if it is tied to one.
    fn network(&self) -> Option<StellarNetwork> {
        None
    }
}

#[derive(Clone)]
pub struct PaymentSubmitter {
    builder: Arc<dyn TransactionBuilder>,
    network: Arc<dyn NetworkSubmitter>,
}

impl PaymentSubmitter {
    pub fn new(builder: Arc<dyn TransactionBuilder>, network: Arc<dyn NetworkSubmitter>) -> Self {
        Self { builder, network }
    }

    /// Run one payment end to end.
    ///
    /// `signer` receives the unsigned envelope and the request's network and
    /// is not called unless the request validates and builds. A request for
    /// a network other than the submitter's is invalid.
    pub async fn submit<F, Fut>(&self, request: &PaymentRequest, signer: F) -> PaymentResult<SubmitReceipt>
    where
        F: FnOnce(String, String) -> Fut,
        Fut: Future<Output = WalletResult<SignedEnvelope>>,
    {
        let start = Instant::now();
        let result = self.run(request, signer).await;
        let outcome = match &result {
            Ok(_) => "success",
            Err(PaymentError::Validation(_)) | Err(PaymentError::NoDestination) => "invalid",
            Err(PaymentError::BuildFailed(_)) => "build_failed",
            Err(PaymentError::SigningFailed(_)) => "sign_failed",
            Err(PaymentError::NetworkSubmitFailed(_)) => "network_failed",
        };
        metrics::record_submit(outcome, start.elapsed());
        result
    }

    async fn run<F, Fut>(&self, request: &PaymentRequest, signer: F) -> PaymentResult<SubmitReceipt>
    where
        F: FnOnce(String, String) -> Fut,
        Fut: Future<Output = WalletResult<SignedEnvelope>>,
    {
        let stroops = request.validate()?;
        tracing::debug!(
            asset = %request.asset,
            stroops,
            network = %request.network,
            "Payment request validated"
        );
        if let Some(target) = self.network.network() {
            if StellarNetwork::from_name(&request.network) != Some(target) {
                return Err(PaymentError::Validation(format!(
                    "wallet is on {}, submissions go to {}",
                    request.network, target
                )));
            }
        }

        let unsigned = self
            .builder
            .build_payment(request)
            .await
            .map_err(|e| PaymentError::BuildFailed(e.to_string()))?;

        let signed = signer(unsigned, request.network.clone()).await?;

        let response = self
            .network
            .submit(&signed)
            .await
            .map_err(|e| PaymentError::NetworkSubmitFailed(e.to_string()))?;
        if !response.success {
            return Err(PaymentError::NetworkSubmitFailed(format!(
                "transaction {} was not successful",
                response.hash
            )));
        }

        tracing::info!(hash = %response.hash, ledger = ?response.ledger, "Payment submitted");
        Ok(SubmitReceipt {
            hash: response.hash,
            ledger: response.ledger,
        })
    }
}

impl std::fmt::Debug for PaymentSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentSubmitter").finish_non_exhaustive()
    }
}
