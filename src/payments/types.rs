//! Payment request and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::blockchain::types::StellarNetwork;
use crate::config::AssetConfig;
use crate::wallet::WalletError;

/// Stroops per lumen (and per unit of any Stellar asset).
pub const STROOPS_PER_UNIT: i64 = 10_000_000;
/// Longest text memo Stellar accepts, in bytes.
pub const MAX_MEMO_BYTES: usize = 28;

/// Assets a donation can be paid in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Xlm,
    Usdc,
}

impl Asset {
    pub fn code(&self) -> &'static str {
        match self {
            Asset::Xlm => "XLM",
            Asset::Usdc => "USDC",
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Xlm)
    }

    /// Issuing account, `None` for the native asset.
    pub fn issuer<'a>(&self, assets: &'a AssetConfig) -> Option<&'a str> {
        match self {
            Asset::Xlm => None,
            Asset::Usdc => Some(assets.usdc_issuer.as_str()),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Asset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "XLM" | "NATIVE" => Ok(Asset::Xlm),
            "USDC" => Ok(Asset::Usdc),
            other => Err(format!("unsupported asset '{}'", other)),
        }
    }
}

/// A payment to be built, signed and submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub source_public_key: String,
    pub destination_public_key: String,
    /// Decimal amount as text, e.g. "12.5".
    pub amount: String,
    pub asset: Asset,
    pub memo: Option<String>,
    /// Network name ("TESTNET", "PUBLIC") or passphrase.
    pub network: String,
}

impl PaymentRequest {
    /// Check the request and return the amount in stroops.
    pub fn validate(&self) -> PaymentResult<i64> {
        if self.destination_public_key.trim().is_empty() {
            return Err(PaymentError::NoDestination);
        }
        if self.source_public_key.trim().is_empty() {
            return Err(PaymentError::Validation("source account is required".into()));
        }
        let stroops = parse_amount(&self.amount)?;
        if let Some(memo) = &self.memo {
            if memo.len() > MAX_MEMO_BYTES {
                return Err(PaymentError::Validation(format!(
                    "memo is {} bytes, the limit is {}",
                    memo.len(),
                    MAX_MEMO_BYTES
                )));
            }
        }
        if StellarNetwork::from_name(&self.network).is_none() {
            return Err(PaymentError::Validation(format!("unknown network '{}'", self.network)));
        }
        Ok(stroops)
    }
}

/// Parse a positive decimal amount into stroops.
///
/// At most seven fractional digits are accepted; anything finer cannot be
/// represented on the ledger.
pub fn parse_amount(amount: &str) -> PaymentResult<i64> {
    let invalid = |reason: &str| PaymentError::Validation(format!("invalid amount '{}': {}", amount, reason));

    let text = amount.trim();
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("empty"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid("not a decimal number"));
    }
    if fraction.len() > 7 {
        return Err(invalid("more than 7 decimal places"));
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("too large"))?
    };
    let fraction: i64 = if fraction.is_empty() {
        0
    } else {
        format!("{:0<7}", fraction).parse().map_err(|_| invalid("not a decimal number"))?
    };

    let stroops = whole
        .checked_mul(STROOPS_PER_UNIT)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| invalid("too large"))?;
    if stroops <= 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(stroops)
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub hash: String,
    pub ledger: Option<u64>,
}

/// Payment-side failures.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("invalid payment request: {0}")]
    Validation(String),

    #[error("recipient has no wallet address")]
    NoDestination,

    #[error("failed to build transaction: {0}")]
    BuildFailed(String),

    #[error("signing failed: {0}")]
    SigningFailed(#[from] WalletError),

    /// Underlying network message, passed through.
    #[error("{0}")]
    NetworkSubmitFailed(String),
}

/// Result type for payment operations.
pub type PaymentResult<T> = Result<T, PaymentError>;
