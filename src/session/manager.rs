//! The wallet session manager.

use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::config::WalletCoreConfig;
use crate::observability::metrics;
use crate::session::state::{SessionState, SessionStatus};
use crate::wallet::{
    build_adapters, AdapterContext, ExtensionScope, SignedEnvelope, WalletAdapter, WalletConnection, WalletError,
    WalletKind, WalletResult,
};

const SUPERSEDED: &str = "connection attempt superseded by disconnect";

/// Owns the single active wallet connection of one page.
///
/// State changes are published through a `watch` channel; every transition
/// is applied atomically against the current value, so two concurrent
/// callers can never both observe a transition as theirs.
pub struct WalletSession {
    id: Uuid,
    adapters: Vec<Arc<dyn WalletAdapter>>,
    state: watch::Sender<SessionState>,
}

impl WalletSession {
    pub fn new(adapters: Vec<Arc<dyn WalletAdapter>>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            id: Uuid::new_v4(),
            adapters,
            state,
        }
    }

    /// Session over the three built-in adapters.
    pub fn with_scope(scope: Arc<ExtensionScope>, config: &WalletCoreConfig) -> Self {
        let ctx = AdapterContext::new(scope, &config.detection, config.network.default_network.clone());
        Self::new(build_adapters(&ctx))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Change stream for UI re-rendering.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn adapter(&self, kind: WalletKind) -> Option<Arc<dyn WalletAdapter>> {
        self.adapters.iter().find(|a| a.kind() == kind).cloned()
    }

    /// Detect every wallet concurrently.
    ///
    /// Returns the available kinds in declaration order regardless of which
    /// check finished first.
    pub async fn check_available(&self) -> Vec<WalletKind> {
        let checks = self.adapters.iter().map(|adapter| async move {
            let kind = adapter.kind();
            let available = adapter.detect().await;
            metrics::record_detection(kind.as_str(), available);
            (kind, available)
        });
        let mut available: Vec<WalletKind> = join_all(checks)
            .await
            .into_iter()
            .filter_map(|(kind, available)| available.then_some(kind))
            .collect();
        available.sort();

        tracing::debug!(session = %self.id, available = ?available, "Wallet detection complete");
        available
    }

    /// Connect `kind`, replacing any current connection.
    pub async fn connect(&self, kind: WalletKind) -> WalletResult<WalletConnection> {
        let adapter = self.adapter(kind).ok_or(WalletError::NotInstalled(kind))?;
        let generation = self.transition(|s| s.begin_connect())?;
        tracing::info!(session = %self.id, wallet = %kind, "Connecting wallet");

        let result = adapter.connect().await;

        if !self.state.send_if_modified(|s| s.finish_connect(generation, &result)) {
            tracing::info!(session = %self.id, wallet = %kind, "Discarding connect result after disconnect");
            metrics::record_connect(kind.as_str(), "superseded");
            return Err(WalletError::UnknownFailure(SUPERSEDED.to_string()));
        }

        match &result {
            Ok(connection) => {
                metrics::record_connect(kind.as_str(), "connected");
                tracing::info!(
                    session = %self.id,
                    wallet = %kind,
                    public_key = connection.short_key(),
                    network = %connection.network,
                    "Wallet connected"
                );
            }
            Err(e) => {
                metrics::record_connect(kind.as_str(), outcome(e));
                tracing::warn!(session = %self.id, wallet = %kind, error = %e, "Wallet connect failed");
            }
        }
        result
    }

    /// Ask the connected wallet to sign `envelope` for `network`.
    pub async fn sign(&self, envelope: &str, network: &str) -> WalletResult<SignedEnvelope> {
        let (generation, connection) = self.transition(|s| s.begin_sign())?;
        let kind = connection.kind;

        let result = match self.adapter(kind) {
            Some(adapter) => {
                tracing::debug!(session = %self.id, wallet = %kind, network = network, "Requesting signature");
                adapter.sign(envelope, network).await
            }
            None => Err(WalletError::NotConnected),
        };

        if !self.state.send_if_modified(|s| s.finish_sign(generation, result.as_ref().err())) {
            tracing::info!(session = %self.id, wallet = %kind, "Discarding signature after disconnect");
            metrics::record_sign(kind.as_str(), "superseded");
            return Err(WalletError::NotConnected);
        }

        match &result {
            Ok(_) => metrics::record_sign(kind.as_str(), "signed"),
            Err(e) => {
                metrics::record_sign(kind.as_str(), outcome(e));
                tracing::warn!(session = %self.id, wallet = %kind, error = %e, "Signing failed");
            }
        }
        result
    }

    /// Return to `Idle`, then let the previously active adapter clean up.
    ///
    /// Always succeeds from the caller's point of view.
    pub async fn disconnect(&self) {
        let mut previous = None;
        self.state.send_if_modified(|s| {
            let changed = s.connection.is_some() || s.status != SessionStatus::Idle;
            previous = s.reset();
            changed
        });

        let Some(connection) = previous else {
            tracing::debug!(session = %self.id, "Disconnect with no active wallet");
            return;
        };
        tracing::info!(session = %self.id, wallet = %connection.kind, "Wallet disconnected");

        if let Some(adapter) = self.adapter(connection.kind) {
            if let Err(e) = adapter.disconnect().await {
                tracing::warn!(session = %self.id, wallet = %connection.kind, error = %e, "Adapter disconnect failed");
            }
        }
    }

    /// Apply a fallible transition; receivers are only woken on success.
    fn transition<R>(&self, f: impl FnOnce(&mut SessionState) -> WalletResult<R>) -> WalletResult<R> {
        let mut outcome = Err(WalletError::NotConnected);
        self.state.send_if_modified(|s| {
            outcome = f(s);
            outcome.is_ok()
        });
        outcome
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("id", &self.id)
            .field("adapters", &self.adapters.iter().map(|a| a.kind()).collect::<Vec<_>>())
            .field("state", &*self.state.borrow())
            .finish()
    }
}

fn outcome(err: &WalletError) -> &'static str {
    match err {
        WalletError::NotInstalled(_) => "not_installed",
        WalletError::PermissionDenied(_) => "denied",
        WalletError::SigningRejected(_) => "rejected",
        WalletError::NotConnected => "not_connected",
        WalletError::AlreadyConnecting | WalletError::SigningInProgress => "busy",
        WalletError::UnknownFailure(_) => "error",
    }
}
