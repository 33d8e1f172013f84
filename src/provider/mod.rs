//! Provider session subsystem.
//!
//! # Data Flow
//! ```text
//! connect():
//!     SigningAuthority::request_access
//!     → first offered account becomes ProviderSession.connected_address
//!
//! send_transfer():
//!     validate (connected, amount, recipient), no network on failure
//!     → SigningAuthority::sign_and_submit
//!     → SigningAuthority::await_confirmation (one confirmation)
//! ```
//!
//! # Design Decisions
//! - The signing authority is an explicit capability, one adapter per platform
//! - A session is a single optional slot; it never reconnects on its own
//! - Single attempt, no retries

pub mod local;
pub mod session;

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::blockchain::types::{TransferReceipt, WalletResult};

pub use local::LocalSigningAuthority;
pub use session::{ProviderSession, TransferRequest};

/// An external agent that authorizes accounts and signs transfers.
#[async_trait]
pub trait SigningAuthority: Send + Sync {
    /// Ask for account access. May prompt the user.
    async fn request_access(&self) -> WalletResult<Vec<Address>>;

    /// Sign a value transfer and hand it to the network.
    async fn sign_and_submit(&self, from: Address, to: Address, value: U256) -> WalletResult<TxHash>;

    /// Wait until the submitted transfer has one confirmation.
    async fn await_confirmation(&self, tx_hash: TxHash) -> WalletResult<TransferReceipt>;
}
