//! The uniform wallet contract.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::DetectionConfig;
use crate::resilience::DetectionPoller;
use crate::wallet::albedo::AlbedoAdapter;
use crate::wallet::binding::ExtensionScope;
use crate::wallet::error::WalletResult;
use crate::wallet::freighter::FreighterAdapter;
use crate::wallet::types::{SignedEnvelope, WalletConnection, WalletKind};
use crate::wallet::xbull::XBullAdapter;

/// Uniform connect/sign/disconnect contract over one wallet extension.
///
/// Implementations hold no session state. Anything they cache is
/// adapter-local and cleared by `disconnect`.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    fn kind(&self) -> WalletKind;

    /// Whether the extension is reachable. Never fails.
    async fn detect(&self) -> bool;

    /// Request access and read the account and network.
    async fn connect(&self) -> WalletResult<WalletConnection>;

    /// Request a signature over an unsigned envelope.
    async fn sign(&self, envelope: &str, network: &str) -> WalletResult<SignedEnvelope>;

    /// Drop adapter-local state and tell the extension, where it supports it.
    async fn disconnect(&self) -> WalletResult<()>;
}

/// Shared inputs for building the concrete adapters.
#[derive(Clone)]
pub struct AdapterContext {
    pub scope: Arc<ExtensionScope>,
    pub detect: DetectionPoller,
    pub connect: DetectionPoller,
    /// Network assumed for wallets that do not report one.
    pub default_network: String,
}

impl AdapterContext {
    pub fn new(scope: Arc<ExtensionScope>, detection: &DetectionConfig, default_network: impl Into<String>) -> Self {
        Self {
            scope,
            detect: DetectionPoller::for_detection(detection),
            connect: DetectionPoller::for_connect(detection),
            default_network: default_network.into(),
        }
    }
}

/// One adapter per supported wallet, in `WalletKind::ALL` order.
pub fn build_adapters(ctx: &AdapterContext) -> Vec<Arc<dyn WalletAdapter>> {
    vec![
        Arc::new(FreighterAdapter::new(ctx.clone())) as Arc<dyn WalletAdapter>,
        Arc::new(AlbedoAdapter::new(ctx.clone())),
        Arc::new(XBullAdapter::new(ctx.clone())),
    ]
}
