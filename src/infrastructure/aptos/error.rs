//! Errors raised at the full node and signer boundaries

use thiserror::Error;

use crate::domain::ValidationError;

/// Full node REST API failures (read path and confirmation wait)
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("node returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("transaction {hash} not confirmed after {secs}s")]
    Timeout { hash: String, secs: u64 },
    #[error("transaction {hash} failed: {vm_status}")]
    Rejected { hash: String, vm_status: String },
}

/// Signing provider failures
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("wallet unavailable: {0}")]
    Unavailable(String),
    #[error("request rejected by wallet: {0}")]
    Rejected(String),
    #[error("wallet request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Everything that can end a purchase/tip/transfer
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Wallet not connected. Please connect your wallet.")]
    NotConnected,
    #[error("another transaction is still being confirmed")]
    Busy,
    #[error(transparent)]
    Signing(#[from] SignerError),
    #[error(transparent)]
    Confirmation(#[from] ChainError),
}

impl ActionError {
    /// True when the error was raised before anything left the process
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ActionError::Validation(_) | ActionError::NotConnected | ActionError::Busy
        )
    }
}
