//! Session state and its transitions.
//!
//! Every transition the session manager makes goes through one of the
//! methods here, so the connection/status invariant is enforced in one
//! place: a connection is present exactly when the status is `Connected`
//! or `Signing`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::wallet::{WalletConnection, WalletError, WalletResult};

/// Lifecycle status of a wallet session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Connecting,
    Connected,
    /// Sub-state of `Connected` while a signature prompt is open.
    Signing,
    Error(String),
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "idle"),
            SessionStatus::Connecting => write!(f, "connecting"),
            SessionStatus::Connected => write!(f, "connected"),
            SessionStatus::Signing => write!(f, "signing"),
            SessionStatus::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}

/// Snapshot of a wallet session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub connection: Option<WalletConnection>,
    pub status: SessionStatus,
    /// Most recent failure message, kept across a return to `Connected`.
    pub last_error: Option<String>,
    /// Bumped whenever an in-flight completion must be discarded.
    #[serde(skip)]
    pub(crate) generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            connection: None,
            status: SessionStatus::Idle,
            last_error: None,
            generation: 0,
        }
    }
}

impl SessionState {
    pub fn is_connected(&self) -> bool {
        matches!(self.status, SessionStatus::Connected | SessionStatus::Signing)
    }

    /// Enter `Connecting`, dropping any prior connection.
    ///
    /// Returns the generation the completion must present.
    pub(crate) fn begin_connect(&mut self) -> WalletResult<u64> {
        match self.status {
            SessionStatus::Connecting => Err(WalletError::AlreadyConnecting),
            SessionStatus::Signing => Err(WalletError::SigningInProgress),
            _ => {
                self.generation += 1;
                self.connection = None;
                self.status = SessionStatus::Connecting;
                Ok(self.generation)
            }
        }
    }

    /// Apply a connect result. Returns false if the attempt was superseded.
    pub(crate) fn finish_connect(&mut self, generation: u64, result: &WalletResult<WalletConnection>) -> bool {
        if generation != self.generation || self.status != SessionStatus::Connecting {
            return false;
        }
        match result {
            Ok(connection) => {
                self.connection = Some(connection.clone());
                self.status = SessionStatus::Connected;
                self.last_error = None;
            }
            Err(e) => {
                let message = e.to_string();
                self.connection = None;
                self.status = SessionStatus::Error(message.clone());
                self.last_error = Some(message);
            }
        }
        true
    }

    /// Enter `Signing`. Only valid from `Connected`.
    pub(crate) fn begin_sign(&mut self) -> WalletResult<(u64, WalletConnection)> {
        match (&self.status, &self.connection) {
            (SessionStatus::Connected, Some(connection)) => {
                let connection = connection.clone();
                self.status = SessionStatus::Signing;
                Ok((self.generation, connection))
            }
            _ => Err(WalletError::NotConnected),
        }
    }

    /// Return to `Connected` after a signature attempt, whatever its outcome.
    pub(crate) fn finish_sign(&mut self, generation: u64, error: Option<&WalletError>) -> bool {
        if generation != self.generation || self.status != SessionStatus::Signing {
            return false;
        }
        self.status = SessionStatus::Connected;
        if let Some(e) = error {
            self.last_error = Some(e.to_string());
        }
        true
    }

    /// Clear to `Idle`, invalidating anything in flight.
    ///
    /// Returns the connection that was active, if any.
    pub(crate) fn reset(&mut self) -> Option<WalletConnection> {
        self.generation += 1;
        self.status = SessionStatus::Idle;
        self.last_error = None;
        self.connection.take()
    }
}
