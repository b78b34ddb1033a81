//! Horizon client with failover.
//!
//! # Responsibilities
//! - Submit signed envelopes (`POST /transactions`, form-encoded `tx`)
//! - Turn Horizon problem documents into readable rejection messages
//! - Fall over to the next endpoint on transport errors, timeouts and 5xx
//! - Health check and network-passphrase verification

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::blockchain::types::{
    passphrase_for, NetworkConfig, NetworkError, NetworkResult, StellarNetwork, SubmitResponse,
};
use crate::payments::submitter::NetworkSubmitter;
use crate::wallet::SignedEnvelope;

/// Successful `POST /transactions` body (fields we use).
#[derive(Debug, Deserialize)]
struct SubmitSuccess {
    hash: String,
    ledger: Option<u64>,
    #[serde(default = "default_successful")]
    successful: bool,
}

fn default_successful() -> bool {
    true
}

/// Horizon problem document.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Problem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    extras: Option<ProblemExtras>,
}

#[derive(Debug, Default, Deserialize)]
struct ProblemExtras {
    result_codes: Option<ResultCodes>,
}

#[derive(Debug, Default, Deserialize)]
struct ResultCodes {
    transaction: Option<String>,
    #[serde(default)]
    operations: Vec<String>,
}

impl Problem {
    /// "Transaction Failed: tx_failed [op_underfunded]" style message.
    pub(crate) fn message(&self) -> String {
        let title = if self.title.is_empty() {
            self.detail.clone().unwrap_or_else(|| "Transaction rejected".to_string())
        } else {
            self.title.clone()
        };
        let Some(codes) = self.extras.as_ref().and_then(|e| e.result_codes.as_ref()) else {
            return title;
        };
        let mut message = title;
        if let Some(tx) = &codes.transaction {
            message.push_str(": ");
            message.push_str(tx);
        }
        if !codes.operations.is_empty() {
            message.push_str(&format!(" [{}]", codes.operations.join(", ")));
        }
        message
    }
}

#[derive(Debug, Deserialize)]
struct RootInfo {
    network_passphrase: String,
}

/// Horizon REST client over a primary endpoint and optional failovers.
///
/// Every endpoint serves `network.default_network`; payments for any other
/// network are refused before signing.
#[derive(Clone)]
pub struct HorizonClient {
    http: reqwest::Client,
    /// Primary first, then failovers in configured order.
    endpoints: Vec<url::Url>,
    network: Option<StellarNetwork>,
    expected_passphrase: String,
    timeout_secs: u64,
}

impl HorizonClient {
    /// Build a client. An invalid primary URL is an error; invalid
    /// failovers are skipped with a warning.
    pub fn new(config: &NetworkConfig) -> NetworkResult<Self> {
        let primary = url::Url::parse(&config.horizon_url).map_err(|e| NetworkError::InvalidUrl {
            url: config.horizon_url.clone(),
            reason: e.to_string(),
        })?;
        let mut endpoints = vec![primary];
        for raw in &config.failover_urls {
            match url::Url::parse(raw) {
                Ok(url) => endpoints.push(url),
                Err(e) => tracing::warn!(url = %raw, error = %e, "Ignoring invalid failover Horizon URL"),
            }
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NetworkError::Rpc(e.to_string()))?;

        Ok(Self {
            http,
            endpoints,
            network: StellarNetwork::from_name(&config.default_network),
            expected_passphrase: passphrase_for(&config.default_network),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoints(&self) -> &[url::Url] {
        &self.endpoints
    }

    fn endpoint(base: &url::Url, path: &str) -> String {
        format!("{}/{}", base.as_str().trim_end_matches('/'), path)
    }

    /// Submit a signed envelope.
    ///
    /// A 4xx answer is final and not retried elsewhere; resubmitting the
    /// same envelope to another Horizon would be rejected the same way.
    pub async fn submit_transaction(&self, envelope_xdr: &str) -> NetworkResult<SubmitResponse> {
        for (i, base) in self.endpoints.iter().enumerate() {
            let url = Self::endpoint(base, "transactions");
            let response = match self.http.post(&url).form(&[("tx", envelope_xdr)]).send().await {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    tracing::warn!(endpoint_idx = i, timeout_secs = self.timeout_secs, "Horizon timeout, trying next endpoint");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(endpoint_idx = i, error = %e, "Horizon error, trying next endpoint");
                    continue;
                }
            };

            let status = response.status();
            if status.is_server_error() {
                tracing::warn!(endpoint_idx = i, status = status.as_u16(), "Horizon unavailable, trying next endpoint");
                continue;
            }
            if status.is_client_error() {
                let problem: Problem = response.json().await.unwrap_or_default();
                let message = problem.message();
                tracing::info!(endpoint_idx = i, status = status.as_u16(), reason = %message, "Transaction rejected");
                return Err(NetworkError::Rejected(message));
            }

            let body: SubmitSuccess = response.json().await.map_err(|e| NetworkError::Decode(e.to_string()))?;
            tracing::debug!(endpoint_idx = i, hash = %body.hash, ledger = ?body.ledger, "Transaction accepted");
            return Ok(SubmitResponse {
                success: body.successful,
                hash: body.hash,
                ledger: body.ledger,
            });
        }
        Err(NetworkError::Rpc("All Horizon endpoints failed".to_string()))
    }

    async fn root(&self) -> NetworkResult<RootInfo> {
        for (i, base) in self.endpoints.iter().enumerate() {
            match self.http.get(base.clone()).send().await {
                Ok(response) if response.status().is_success() => {
                    return response.json().await.map_err(|e| NetworkError::Decode(e.to_string()));
                }
                Ok(response) => tracing::warn!(endpoint_idx = i, status = response.status().as_u16(), "Horizon root unavailable"),
                Err(e) => tracing::warn!(endpoint_idx = i, error = %e, "Horizon error"),
            }
        }
        Err(NetworkError::Rpc("All Horizon endpoints failed".to_string()))
    }

    /// Check the endpoints serve the configured network.
    pub async fn verify_network(&self) -> NetworkResult<()> {
        let root = self.root().await?;
        if root.network_passphrase != self.expected_passphrase {
            return Err(NetworkError::NetworkMismatch {
                expected: self.expected_passphrase.clone(),
                actual: root.network_passphrase,
            });
        }
        Ok(())
    }

    /// Whether any endpoint answers its root document.
    pub async fn is_healthy(&self) -> bool {
        self.root().await.is_ok()
    }
}

#[async_trait]
impl NetworkSubmitter for HorizonClient {
    async fn submit(&self, envelope: &SignedEnvelope) -> NetworkResult<SubmitResponse> {
        self.submit_transaction(envelope.as_str()).await
    }

    fn network(&self) -> Option<StellarNetwork> {
        self.network
    }
}

impl std::fmt::Debug for HorizonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HorizonClient")
            .field("endpoints", &self.endpoints.iter().map(|u| u.as_str()).collect::<Vec<_>>())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
