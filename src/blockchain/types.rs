//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors surfaced by wallet operations.
///
/// Every variant is recoverable at the view boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    /// No signing authority could be reached, or it offered no accounts.
    #[error("No wallet provider available: {0}")]
    NoProviderAvailable(String),

    /// An operation needed a connected session.
    #[error("Wallet not connected")]
    NotConnected,

    /// Transfer amount is not a non-negative decimal.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Recipient is not a well-formed address.
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    /// Signing, submission or confirmation failed.
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    /// Balance or block-height query failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Key material could not be generated or derived.
    #[error("Credential error: {0}")]
    Credential(String),

    /// The block-height poller was started twice.
    #[error("Chain poller is already running")]
    PollerAlreadyRunning,
}

impl WalletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::NoProviderAvailable(_) => ErrorKind::NoProviderAvailable,
            WalletError::NotConnected => ErrorKind::NotConnected,
            WalletError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            WalletError::InvalidRecipient(_) => ErrorKind::InvalidRecipient,
            WalletError::TransferFailed(_) => ErrorKind::TransferFailed,
            WalletError::QueryFailed(_) => ErrorKind::QueryFailed,
            WalletError::Credential(_) => ErrorKind::Credential,
            WalletError::PollerAlreadyRunning => ErrorKind::PollerAlreadyRunning,
        }
    }

    /// Validation failures are detected before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WalletError::NotConnected
                | WalletError::InvalidAmount(_)
                | WalletError::InvalidRecipient(_)
        )
    }
}

/// Discriminant of [`WalletError`], carried by notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    NoProviderAvailable,
    NotConnected,
    InvalidAmount,
    InvalidRecipient,
    TransferFailed,
    QueryFailed,
    Credential,
    PollerAlreadyRunning,
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Latest known chain head, as maintained by the poller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChainStatus {
    /// `None` until the first successful query.
    pub latest_block_height: Option<u64>,
    /// A height query is currently outstanding.
    pub is_syncing: bool,
}

/// Displayed balance, always tied to the address it was fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceView {
    /// Ether-denominated decimal string.
    pub amount: String,
    pub for_address: Address,
    /// Raw value in wei.
    pub wei: U256,
}

/// Outcome of a confirmed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
}
