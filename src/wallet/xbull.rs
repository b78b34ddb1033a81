//! xBull adapter.
//!
//! xBull asks for permissions up front and then hands out the account. It
//! signs against a network passphrase and supports an explicit page-side
//! disconnect. Like Albedo it does not report a network.

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::types::passphrase_for;
use crate::wallet::adapter::{AdapterContext, WalletAdapter};
use crate::wallet::binding::{ExtensionError, XBullApi, XBullPermissions, XBullSignOptions};
use crate::wallet::error::{WalletError, WalletResult};
use crate::wallet::types::{short_key, SignedEnvelope, WalletConnection, WalletKind};

const KIND: WalletKind = WalletKind::XBull;
const REJECTION_MARKERS: &[&str] = &["rejected", "denied", "cancel"];

const PERMISSIONS: XBullPermissions = XBullPermissions {
    can_request_public_key: true,
    can_request_sign: true,
};

pub struct XBullAdapter {
    ctx: AdapterContext,
    account: ArcSwapOption<String>,
}

impl XBullAdapter {
    pub fn new(ctx: AdapterContext) -> Self {
        Self {
            ctx,
            account: ArcSwapOption::empty(),
        }
    }

    fn binding(&self) -> Option<Arc<Box<dyn XBullApi>>> {
        self.ctx.scope.xbull.get()
    }

    fn classify(err: ExtensionError, on_reject: WalletError) -> WalletError {
        if err.mentions(REJECTION_MARKERS) {
            on_reject
        } else {
            WalletError::UnknownFailure(err.message)
        }
    }
}

#[async_trait]
impl WalletAdapter for XBullAdapter {
    fn kind(&self) -> WalletKind {
        KIND
    }

    async fn detect(&self) -> bool {
        self.ctx.detect.poll(KIND.as_str(), || self.ctx.scope.xbull.is_present()).await
    }

    async fn connect(&self) -> WalletResult<WalletConnection> {
        if !self.ctx.connect.poll(KIND.as_str(), || self.ctx.scope.xbull.is_present()).await {
            return Err(WalletError::NotInstalled(KIND));
        }
        let api = self.binding().ok_or(WalletError::NotInstalled(KIND))?;

        api.connect(PERMISSIONS)
            .await
            .map_err(|e| Self::classify(e, WalletError::PermissionDenied(KIND)))?;
        let public_key = api
            .get_public_key()
            .await
            .map_err(|e| Self::classify(e, WalletError::PermissionDenied(KIND)))?;
        if public_key.is_empty() {
            return Err(WalletError::PermissionDenied(KIND));
        }

        self.account.store(Some(Arc::new(public_key.clone())));
        tracing::debug!(wallet = %KIND, public_key = short_key(&public_key), "xBull permissions granted");
        Ok(WalletConnection::new(KIND, public_key, self.ctx.default_network.clone()))
    }

    async fn sign(&self, envelope: &str, network: &str) -> WalletResult<SignedEnvelope> {
        let account = self.account.load_full().ok_or(WalletError::NotConnected)?;
        let api = self.binding().ok_or(WalletError::NotConnected)?;

        let opts = XBullSignOptions {
            network: passphrase_for(network),
            public_key: account.as_ref().clone(),
        };
        let signed = api.sign_xdr(envelope, opts).await.map_err(|e| {
            let message = e.message.clone();
            Self::classify(e, WalletError::SigningRejected(message))
        })?;
        Ok(SignedEnvelope::new(signed))
    }

    async fn disconnect(&self) -> WalletResult<()> {
        self.account.store(None);
        match self.binding() {
            Some(api) => api.disconnect().await.map_err(|e| WalletError::UnknownFailure(e.message)),
            None => Ok(()),
        }
    }
}
