//! Donation-record collaborator.
//!
//! After a payment settles, the donation is reported to the platform
//! backend as JSON (`POST /api/donations`). The ledger is the source of
//! truth; this record only feeds the project pages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::blockchain::types::{NetworkError, NetworkResult};
use crate::config::DonationConfig;
use crate::payments::types::Asset;

/// Body of a donation record, camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    pub project_id: String,
    pub donor_wallet: String,
    pub amount: String,
    pub asset: Asset,
    pub tx_hash: String,
    pub network: String,
}

#[async_trait]
pub trait DonationRecorder: Send + Sync {
    async fn record(&self, donation: &DonationRecord) -> NetworkResult<()>;
}

/// Posts donation records over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDonationRecorder {
    client: reqwest::Client,
    endpoint: url::Url,
    timeout_secs: u64,
}

impl HttpDonationRecorder {
    pub fn new(config: &DonationConfig) -> NetworkResult<Self> {
        let endpoint = url::Url::parse(&config.endpoint_url).map_err(|e| NetworkError::InvalidUrl {
            url: config.endpoint_url.clone(),
            reason: e.to_string(),
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NetworkError::Rpc(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

#[async_trait]
impl DonationRecorder for HttpDonationRecorder {
    async fn record(&self, donation: &DonationRecord) -> NetworkResult<()> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(donation)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NetworkError::Timeout(self.timeout_secs)
                } else {
                    NetworkError::Rpc(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::Rpc(format!(
                "donation endpoint returned {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }
        tracing::debug!(project_id = %donation.project_id, tx_hash = %donation.tx_hash, "Donation recorded");
        Ok(())
    }
}
