//! Wallet error taxonomy.

use thiserror::Error;

use crate::wallet::types::WalletKind;

/// Errors surfaced by adapters and the session manager.
///
/// Raw extension failures are always classified into one of these
/// before they leave an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// The extension binding never appeared within the polling budget.
    #[error("{0} wallet is not installed or not responding")]
    NotInstalled(WalletKind),

    /// The user declined the connection prompt.
    #[error("{0} access was denied by the user")]
    PermissionDenied(WalletKind),

    /// A connect is already in flight for this session.
    #[error("a wallet connection is already in progress")]
    AlreadyConnecting,

    /// A signature is being collected; the session cannot change wallets yet.
    #[error("a signing request is still pending")]
    SigningInProgress,

    /// No active connection for an operation that needs one.
    #[error("wallet is not connected")]
    NotConnected,

    /// The user declined the signature prompt.
    #[error("signature request was rejected: {0}")]
    SigningRejected(String),

    /// Anything else an extension threw, message preserved.
    #[error("wallet error: {0}")]
    UnknownFailure(String),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;
