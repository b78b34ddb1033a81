//! Albedo adapter.
//!
//! Albedo is a web signer reached through intents rather than an extension
//! API. It never reports a network, so the configured default is assumed.
//! User rejections carry error code -4.

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::types::StellarNetwork;
use crate::wallet::adapter::{AdapterContext, WalletAdapter};
use crate::wallet::binding::{AlbedoApi, AlbedoTxRequest, ExtensionError};
use crate::wallet::error::{WalletError, WalletResult};
use crate::wallet::types::{short_key, SignedEnvelope, WalletConnection, WalletKind};

const KIND: WalletKind = WalletKind::Albedo;
const USER_REJECTED: i64 = -4;

pub struct AlbedoAdapter {
    ctx: AdapterContext,
    /// Account handed out by the last `publicKey` intent.
    account: ArcSwapOption<String>,
}

impl AlbedoAdapter {
    pub fn new(ctx: AdapterContext) -> Self {
        Self {
            ctx,
            account: ArcSwapOption::empty(),
        }
    }

    fn binding(&self) -> Option<Arc<Box<dyn AlbedoApi>>> {
        self.ctx.scope.albedo.get()
    }

    fn is_rejection(err: &ExtensionError) -> bool {
        err.code == Some(USER_REJECTED)
    }

    fn intent_network(network: &str) -> String {
        StellarNetwork::from_name(network)
            .map(|n| n.albedo_name().to_string())
            .unwrap_or_else(|| network.to_string())
    }
}

#[async_trait]
impl WalletAdapter for AlbedoAdapter {
    fn kind(&self) -> WalletKind {
        KIND
    }

    async fn detect(&self) -> bool {
        self.ctx.detect.poll(KIND.as_str(), || self.ctx.scope.albedo.is_present()).await
    }

    async fn connect(&self) -> WalletResult<WalletConnection> {
        if !self.ctx.connect.poll(KIND.as_str(), || self.ctx.scope.albedo.is_present()).await {
            return Err(WalletError::NotInstalled(KIND));
        }
        let api = self.binding().ok_or(WalletError::NotInstalled(KIND))?;

        let response = api.public_key().await.map_err(|e| {
            if Self::is_rejection(&e) {
                WalletError::PermissionDenied(KIND)
            } else {
                WalletError::UnknownFailure(e.message)
            }
        })?;
        if response.pubkey.is_empty() {
            return Err(WalletError::UnknownFailure("Albedo returned no public key".into()));
        }

        self.account.store(Some(Arc::new(response.pubkey.clone())));
        tracing::debug!(wallet = %KIND, public_key = short_key(&response.pubkey), "Albedo account selected");
        Ok(WalletConnection::new(KIND, response.pubkey, self.ctx.default_network.clone()))
    }

    async fn sign(&self, envelope: &str, network: &str) -> WalletResult<SignedEnvelope> {
        let account = self.account.load_full().ok_or(WalletError::NotConnected)?;
        let api = self.binding().ok_or(WalletError::NotConnected)?;

        let request = AlbedoTxRequest {
            xdr: envelope.to_string(),
            pubkey: Some(account.as_ref().clone()),
            network: Self::intent_network(network),
            submit: false,
        };
        let response = api.tx(request).await.map_err(|e| {
            if Self::is_rejection(&e) {
                WalletError::SigningRejected(e.message)
            } else {
                WalletError::UnknownFailure(e.message)
            }
        })?;
        Ok(SignedEnvelope::new(response.signed_envelope_xdr))
    }

    async fn disconnect(&self) -> WalletResult<()> {
        self.account.store(None);
        Ok(())
    }
}
