//! Wallet identity and connection types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Supported browser wallet extensions.
///
/// The set is closed: adding a wallet means writing a new adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    Freighter,
    Albedo,
    #[serde(rename = "xbull")]
    XBull,
}

impl WalletKind {
    /// All kinds, in the order availability is reported.
    pub const ALL: [WalletKind; 3] = [WalletKind::Freighter, WalletKind::Albedo, WalletKind::XBull];

    /// Stable lowercase identifier, used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletKind::Freighter => "freighter",
            WalletKind::Albedo => "albedo",
            WalletKind::XBull => "xbull",
        }
    }

    /// Static display information for wallet pickers.
    pub fn info(&self) -> WalletInfo {
        match self {
            WalletKind::Freighter => WalletInfo {
                kind: *self,
                name: "Freighter",
                description: "Browser extension wallet by the Stellar Development Foundation",
                website: "https://www.freighter.app",
            },
            WalletKind::Albedo => WalletInfo {
                kind: *self,
                name: "Albedo",
                description: "Web-based Stellar signer, no installation required",
                website: "https://albedo.link",
            },
            WalletKind::XBull => WalletInfo {
                kind: *self,
                name: "xBull",
                description: "Multi-platform Stellar wallet extension",
                website: "https://xbull.app",
            },
        }
    }
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WalletKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "freighter" => Ok(WalletKind::Freighter),
            "albedo" => Ok(WalletKind::Albedo),
            "xbull" => Ok(WalletKind::XBull),
            other => Err(format!("unknown wallet kind '{}'", other)),
        }
    }
}

/// Display metadata for a wallet kind.
#[derive(Debug, Clone, Serialize)]
pub struct WalletInfo {
    pub kind: WalletKind,
    pub name: &'static str,
    pub description: &'static str,
    pub website: &'static str,
}

/// An established wallet connection.
///
/// Immutable once built; a reconnect produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConnection {
    /// Which extension produced this connection.
    pub kind: WalletKind,
    /// Account address reported by the extension. Not validated here.
    pub public_key: String,
    /// Network name reported by (or assumed for) the extension.
    pub network: String,
    /// Connection time in milliseconds since the Unix epoch.
    pub connected_at: u64,
}

impl WalletConnection {
    /// Build a connection stamped with the current time.
    pub fn new(kind: WalletKind, public_key: impl Into<String>, network: impl Into<String>) -> Self {
        let connected_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self {
            kind,
            public_key: public_key.into(),
            network: network.into(),
            connected_at,
        }
    }

    /// Shortened public key for log output.
    pub fn short_key(&self) -> &str {
        short_key(&self.public_key)
    }
}

/// First eight characters of an account address.
pub fn short_key(key: &str) -> &str {
    match key.char_indices().nth(8) {
        Some((idx, _)) => &key[..idx],
        None => key,
    }
}

/// A signed transaction envelope as returned by a wallet.
///
/// Opaque: the bytes are handed to the network exactly as the wallet
/// produced them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedEnvelope(String);

impl SignedEnvelope {
    pub fn new(xdr: impl Into<String>) -> Self {
        Self(xdr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SignedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedEnvelope")
            .field("len", &self.0.len())
            .finish()
    }
}
