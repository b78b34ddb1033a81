//! Freighter adapter.
//!
//! Freighter injects at `freighterApi`, or at `stellar` in some builds.
//! Access is granted per site: `isAllowed` → `setAllowed` prompt →
//! `getPublicKey`, which answers with an empty string when access was not
//! granted. Freighter reports its own network.
//!
//! Detection also accepts the page-level install marker, which can appear
//! before the API object. Connecting still waits for the API itself.

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::types::passphrase_for;
use crate::wallet::adapter::{AdapterContext, WalletAdapter};
use crate::wallet::binding::{ExtensionError, FreighterApi, FreighterSignOptions};
use crate::wallet::error::{WalletError, WalletResult};
use crate::wallet::types::{short_key, SignedEnvelope, WalletConnection, WalletKind};

const KIND: WalletKind = WalletKind::Freighter;
const REJECTION_MARKERS: &[&str] = &["declined", "rejected", "denied"];

pub struct FreighterAdapter {
    ctx: AdapterContext,
    /// Account granted at connect; signing is pinned to it.
    account: ArcSwapOption<String>,
}

impl FreighterAdapter {
    pub fn new(ctx: AdapterContext) -> Self {
        Self {
            ctx,
            account: ArcSwapOption::empty(),
        }
    }

    fn binding(&self) -> Option<Arc<Box<dyn FreighterApi>>> {
        self.ctx
            .scope
            .freighter_api
            .get()
            .or_else(|| self.ctx.scope.stellar.get())
    }

    fn has_binding(&self) -> bool {
        self.ctx.scope.freighter_api.is_present() || self.ctx.scope.stellar.is_present()
    }

    fn is_injected(&self) -> bool {
        self.has_binding() || self.ctx.scope.has_freighter_marker()
    }

    fn classify_connect(err: ExtensionError) -> WalletError {
        if err.mentions(REJECTION_MARKERS) {
            WalletError::PermissionDenied(KIND)
        } else {
            WalletError::UnknownFailure(err.message)
        }
    }

    fn classify_sign(err: ExtensionError) -> WalletError {
        if err.mentions(REJECTION_MARKERS) {
            WalletError::SigningRejected(err.message)
        } else {
            WalletError::UnknownFailure(err.message)
        }
    }
}

#[async_trait]
impl WalletAdapter for FreighterAdapter {
    fn kind(&self) -> WalletKind {
        KIND
    }

    async fn detect(&self) -> bool {
        self.ctx.detect.poll(KIND.as_str(), || self.is_injected()).await
    }

    async fn connect(&self) -> WalletResult<WalletConnection> {
        if !self.ctx.connect.poll(KIND.as_str(), || self.has_binding()).await {
            return Err(WalletError::NotInstalled(KIND));
        }
        let api = self.binding().ok_or(WalletError::NotInstalled(KIND))?;
        if !api.is_connected().await.map_err(Self::classify_connect)? {
            tracing::debug!(wallet = %KIND, "Binding present but extension not responding");
            return Err(WalletError::NotInstalled(KIND));
        }

        let allowed = api.is_allowed().await.map_err(Self::classify_connect)?;
        if !allowed {
            tracing::debug!(wallet = %KIND, "Requesting site access");
            let granted = api.set_allowed().await.map_err(Self::classify_connect)?;
            if !granted {
                return Err(WalletError::PermissionDenied(KIND));
            }
        }

        let public_key = api.get_public_key().await.map_err(Self::classify_connect)?;
        if public_key.is_empty() {
            return Err(WalletError::PermissionDenied(KIND));
        }
        let network = api.get_network().await.map_err(Self::classify_connect)?;

        tracing::debug!(wallet = %KIND, public_key = short_key(&public_key), network = %network, "Freighter access granted");
        self.account.store(Some(Arc::new(public_key.clone())));
        Ok(WalletConnection::new(KIND, public_key, network))
    }

    async fn sign(&self, envelope: &str, network: &str) -> WalletResult<SignedEnvelope> {
        let account = self.account.load_full().ok_or(WalletError::NotConnected)?;
        let api = self.binding().ok_or(WalletError::NotConnected)?;
        // Access can be revoked from the extension between connect and sign.
        let allowed = api.is_allowed().await.map_err(Self::classify_sign)?;
        if !allowed {
            return Err(WalletError::NotConnected);
        }

        let opts = FreighterSignOptions {
            network_passphrase: Some(passphrase_for(network)),
            account_to_sign: Some(account.as_ref().clone()),
        };
        let signed = api
            .sign_transaction(envelope, opts)
            .await
            .map_err(Self::classify_sign)?;
        Ok(SignedEnvelope::new(signed))
    }

    async fn disconnect(&self) -> WalletResult<()> {
        // Site access itself is managed in the extension.
        self.account.store(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::TESTNET_PASSPHRASE;
    use crate::config::DetectionConfig;
    use crate::wallet::binding::{ExtensionResult, ExtensionScope};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeFreighter {
        unresponsive: bool,
        allowed: Mutex<bool>,
        grant_on_prompt: bool,
        public_key: String,
        sign_error: Option<ExtensionError>,
        last_opts: Arc<Mutex<Option<FreighterSignOptions>>>,
    }

    #[async_trait]
    impl FreighterApi for FakeFreighter {
        async fn is_connected(&self) -> ExtensionResult<bool> {
            Ok(!self.unresponsive)
        }

        async fn is_allowed(&self) -> ExtensionResult<bool> {
            Ok(*self.allowed.lock().unwrap())
        }

        async fn set_allowed(&self) -> ExtensionResult<bool> {
            if self.grant_on_prompt {
                *self.allowed.lock().unwrap() = true;
                Ok(true)
            } else {
                Err(ExtensionError::new("User declined access"))
            }
        }

        async fn get_public_key(&self) -> ExtensionResult<String> {
            if *self.allowed.lock().unwrap() {
                Ok(self.public_key.clone())
            } else {
                Ok(String::new())
            }
        }

        async fn get_network(&self) -> ExtensionResult<String> {
            Ok("TESTNET".into())
        }

        async fn sign_transaction(&self, xdr: &str, opts: FreighterSignOptions) -> ExtensionResult<String> {
            *self.last_opts.lock().unwrap() = Some(opts);
            match &self.sign_error {
                Some(e) => Err(e.clone()),
                None => Ok(format!("signed:{}", xdr)),
            }
        }
    }

    fn granted(public_key: &str) -> FakeFreighter {
        FakeFreighter {
            allowed: Mutex::new(true),
            public_key: public_key.into(),
            ..Default::default()
        }
    }

    fn adapter_in(scope: Arc<ExtensionScope>) -> FreighterAdapter {
        FreighterAdapter::new(AdapterContext::new(scope, &DetectionConfig::default(), "TESTNET"))
    }

    fn adapter_with(fake: Option<FakeFreighter>, alternate: bool) -> FreighterAdapter {
        let scope = Arc::new(ExtensionScope::new());
        if let Some(fake) = fake {
            if alternate {
                scope.stellar.inject(Box::new(fake));
            } else {
                scope.freighter_api.inject(Box::new(fake));
            }
        }
        adapter_in(scope)
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_prompts_then_reads_account() {
        let adapter = adapter_with(
            Some(FakeFreighter {
                grant_on_prompt: true,
                public_key: "GABC123".into(),
                ..Default::default()
            }),
            false,
        );

        let conn = adapter.connect().await.unwrap();
        assert_eq!(conn.kind, WalletKind::Freighter);
        assert_eq!(conn.public_key, "GABC123");
        assert_eq!(conn.network, "TESTNET");
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_via_alternate_injection_point() {
        let adapter = adapter_with(Some(granted("GALT")), true);
        assert!(adapter.detect().await);
        assert_eq!(adapter.connect().await.unwrap().public_key, "GALT");
    }

    #[tokio::test(start_paused = true)]
    async fn test_declined_prompt_is_permission_denied() {
        let adapter = adapter_with(
            Some(FakeFreighter {
                grant_on_prompt: false,
                public_key: "GABC".into(),
                ..Default::default()
            }),
            false,
        );
        assert_eq!(
            adapter.connect().await.unwrap_err(),
            WalletError::PermissionDenied(WalletKind::Freighter)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_without_binding_is_not_installed() {
        let adapter = adapter_with(None, false);
        assert!(!adapter.detect().await);
        assert_eq!(
            adapter.connect().await.unwrap_err(),
            WalletError::NotInstalled(WalletKind::Freighter)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unresponsive_extension_is_not_installed() {
        let adapter = adapter_with(
            Some(FakeFreighter {
                unresponsive: true,
                ..granted("GABC")
            }),
            false,
        );
        assert_eq!(
            adapter.connect().await.unwrap_err(),
            WalletError::NotInstalled(WalletKind::Freighter)
        );
        assert_eq!(adapter.sign("AAAA", "TESTNET").await.unwrap_err(), WalletError::NotConnected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_install_marker_counts_for_detection() {
        let scope = Arc::new(ExtensionScope::new());
        scope.mark_freighter_installed();
        let adapter = adapter_in(scope.clone());

        assert!(adapter.detect().await);
        // Connecting needs the API object, not just the marker
        assert_eq!(
            adapter.connect().await.unwrap_err(),
            WalletError::NotInstalled(WalletKind::Freighter)
        );

        scope.freighter_api.inject(Box::new(granted("GMARKED")));
        assert_eq!(adapter.connect().await.unwrap().public_key, "GMARKED");
    }

    #[tokio::test]
    async fn test_sign_passes_network_and_account() {
        let fake = granted("GABC");
        let seen = fake.last_opts.clone();
        let adapter = adapter_with(Some(fake), false);
        adapter.connect().await.unwrap();

        let signed = adapter.sign("AAAA", "TESTNET").await.unwrap();
        assert_eq!(signed.as_str(), "signed:AAAA");
        let opts = seen.lock().unwrap().clone().unwrap();
        assert_eq!(opts.network_passphrase.as_deref(), Some(TESTNET_PASSPHRASE));
        assert_eq!(opts.account_to_sign.as_deref(), Some("GABC"));
    }

    #[tokio::test]
    async fn test_sign_rejection_is_classified() {
        let adapter = adapter_with(
            Some(FakeFreighter {
                sign_error: Some(ExtensionError::new("User declined to sign the transaction")),
                ..granted("GABC")
            }),
            false,
        );
        adapter.connect().await.unwrap();
        assert!(matches!(
            adapter.sign("AAAA", "TESTNET").await,
            Err(WalletError::SigningRejected(_))
        ));
    }

    #[tokio::test]
    async fn test_sign_before_connect_is_not_connected() {
        let fake = granted("GABC");
        let seen = fake.last_opts.clone();
        let adapter = adapter_with(Some(fake), false);

        assert_eq!(adapter.sign("AAAA", "TESTNET").await.unwrap_err(), WalletError::NotConnected);
        assert!(seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_after_disconnect_is_not_connected() {
        let fake = granted("GABC");
        let seen = fake.last_opts.clone();
        let adapter = adapter_with(Some(fake), false);

        adapter.connect().await.unwrap();
        adapter.disconnect().await.unwrap();

        assert_eq!(adapter.sign("AAAA", "TESTNET").await.unwrap_err(), WalletError::NotConnected);
        assert!(seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_after_access_revoked_is_not_connected() {
        let scope = Arc::new(ExtensionScope::new());
        scope.freighter_api.inject(Box::new(granted("GABC")));
        let adapter = adapter_in(scope.clone());
        adapter.connect().await.unwrap();

        scope.freighter_api.inject(Box::new(FakeFreighter::default()));
        assert_eq!(adapter.sign("AAAA", "TESTNET").await.unwrap_err(), WalletError::NotConnected);

        scope.freighter_api.withdraw();
        assert_eq!(adapter.sign("AAAA", "TESTNET").await.unwrap_err(), WalletError::NotConnected);
    }

    #[test]
    fn test_unknown_errors_keep_message() {
        let err = FreighterAdapter::classify_sign(ExtensionError::new("internal error 42"));
        assert_eq!(err, WalletError::UnknownFailure("internal error 42".into()));
    }
}
