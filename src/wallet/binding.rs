//! Extension injection points and native call shapes.
//!
//! Browser wallets attach their API object to the page's global scope at
//! an unpredictable moment after load. [`ExtensionScope`] is that global
//! scope made explicit: one [`InjectionSlot`] per binding name, filled by
//! whatever host embeds this crate (wasm shell, webview bridge, tests).
//!
//! The traits below mirror each extension's own API. They are deliberately
//! *not* uniform; normalising them is the adapters' job.

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Raw failure thrown by an extension call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExtensionError {
    /// Numeric code, where the extension provides one (Albedo does).
    pub code: Option<i64>,
    pub message: String,
}

impl ExtensionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// Case-insensitive message match against any of `needles`.
    pub(crate) fn mentions(&self, needles: &[&str]) -> bool {
        let lower = self.message.to_ascii_lowercase();
        needles.iter().any(|n| lower.contains(n))
    }
}

/// Result of a native extension call.
pub type ExtensionResult<T> = Result<T, ExtensionError>;

/// A late-bound slot an extension injects its API object into.
pub struct InjectionSlot<T: ?Sized> {
    inner: ArcSwapOption<Box<T>>,
}

impl<T: ?Sized> InjectionSlot<T> {
    pub fn empty() -> Self {
        Self {
            inner: ArcSwapOption::empty(),
        }
    }

    /// Publish a binding, replacing any previous one.
    pub fn inject(&self, binding: Box<T>) {
        self.inner.store(Some(Arc::new(binding)));
    }

    /// Remove the binding (extension disabled or page torn down).
    pub fn withdraw(&self) {
        self.inner.store(None);
    }

    pub fn is_present(&self) -> bool {
        self.inner.load().is_some()
    }

    /// Current binding, if one has been injected.
    pub fn get(&self) -> Option<Arc<Box<T>>> {
        self.inner.load_full()
    }
}

impl<T: ?Sized> Default for InjectionSlot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> std::fmt::Debug for InjectionSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectionSlot")
            .field("present", &self.is_present())
            .finish()
    }
}

/// The page-level scope wallet extensions inject into.
#[derive(Debug, Default)]
pub struct ExtensionScope {
    /// `window.freighterApi`
    pub freighter_api: InjectionSlot<dyn FreighterApi>,
    /// `window.stellar`, Freighter's alternate injection point.
    pub stellar: InjectionSlot<dyn FreighterApi>,
    /// Albedo intent bridge.
    pub albedo: InjectionSlot<dyn AlbedoApi>,
    /// `window.xBullSDK`
    pub xbull: InjectionSlot<dyn XBullApi>,
    /// Set when the page carries Freighter's install marker.
    freighter_marker: AtomicBool,
}

impl ExtensionScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `freighter-extension` meta tag or a
    /// `data-freighter-installed="true"` root attribute.
    ///
    /// The marker shows the extension is installed before its API object
    /// has been injected.
    pub fn mark_freighter_installed(&self) {
        self.freighter_marker.store(true, Ordering::Release);
    }

    pub fn has_freighter_marker(&self) -> bool {
        self.freighter_marker.load(Ordering::Acquire)
    }
}

/// Options accepted by Freighter's `signTransaction`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreighterSignOptions {
    pub network_passphrase: Option<String>,
    pub account_to_sign: Option<String>,
}

/// Freighter's injected API.
#[async_trait]
pub trait FreighterApi: Send + Sync {
    async fn is_connected(&self) -> ExtensionResult<bool>;
    async fn is_allowed(&self) -> ExtensionResult<bool>;
    /// Prompts the user; resolves to whether access is now granted.
    async fn set_allowed(&self) -> ExtensionResult<bool>;
    /// Empty string when the site has not been granted access.
    async fn get_public_key(&self) -> ExtensionResult<String>;
    async fn get_network(&self) -> ExtensionResult<String>;
    async fn sign_transaction(&self, xdr: &str, opts: FreighterSignOptions) -> ExtensionResult<String>;
}

/// Albedo `publicKey` intent response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbedoPublicKey {
    pub pubkey: String,
}

/// Albedo `tx` intent request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbedoTxRequest {
    pub xdr: String,
    pub pubkey: Option<String>,
    /// `"testnet"` or `"public"`.
    pub network: String,
    pub submit: bool,
}

/// Albedo `tx` intent response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbedoTxResponse {
    pub signed_envelope_xdr: String,
    pub tx_hash: Option<String>,
}

/// Albedo's intent API.
#[async_trait]
pub trait AlbedoApi: Send + Sync {
    async fn public_key(&self) -> ExtensionResult<AlbedoPublicKey>;
    async fn tx(&self, request: AlbedoTxRequest) -> ExtensionResult<AlbedoTxResponse>;
}

/// Permissions requested from xBull on connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XBullPermissions {
    pub can_request_public_key: bool,
    pub can_request_sign: bool,
}

/// Options accepted by xBull's `signXDR`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XBullSignOptions {
    /// Network passphrase.
    pub network: String,
    pub public_key: String,
}

/// xBull's injected SDK.
#[async_trait]
pub trait XBullApi: Send + Sync {
    async fn connect(&self, permissions: XBullPermissions) -> ExtensionResult<()>;
    async fn get_public_key(&self) -> ExtensionResult<String>;
    async fn sign_xdr(&self, xdr: &str, opts: XBullSignOptions) -> ExtensionResult<String>;
    async fn disconnect(&self) -> ExtensionResult<()>;
}
