//! Typed outcome channel from the wallet to the display surface.

use alloy::primitives::{Address, TxHash};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::blockchain::types::{ErrorKind, WalletError};

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    CredentialGenerated { address: Address },
    Connected { address: Address },
    BalanceUpdated { address: Address, amount: String },
    BlockHeight { height: u64 },
    TransferConfirmed { tx_hash: TxHash, block_number: u64 },
    Copied { field: &'static str },
    Failed { kind: ErrorKind, message: String },
}

impl Notification {
    pub fn failed(error: &WalletError) -> Self {
        Notification::Failed {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notification::CredentialGenerated { address } => write!(f, "New wallet generated: {}", address),
            Notification::Connected { address } => write!(f, "Connected as {}", address),
            Notification::BalanceUpdated { address, amount } => write!(f, "Balance of {}: {} ETH", address, amount),
            Notification::BlockHeight { height } => write!(f, "Block #{}", height),
            Notification::TransferConfirmed { tx_hash, block_number } => {
                write!(f, "Transfer {} confirmed in block #{}", tx_hash, block_number)
            }
            Notification::Copied { field } => write!(f, "Copied {} to clipboard", field),
            Notification::Failed { message, .. } => write!(f, "Error: {}", message),
        }
    }
}

/// Receiving half, owned by the display surface.
pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// Sending half, cloned into every component that reports outcomes.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, NotificationReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("Notification dropped: display surface closed");
        }
    }

    pub fn failure(&self, error: &WalletError) {
        self.send(Notification::failed(error));
    }
}
