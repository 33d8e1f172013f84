//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! System randomness
//!     → credential.rs (phrase, key, address)
//! RPC URL
//!     → client.rs (block height and balance queries with timeouts)
//!     → transaction.rs (build transfer, wait for confirmation)
//! User input
//!     → units.rs (amount / recipient parsing, ether display)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or recovery phrases
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when the endpoint is unreachable

pub mod client;
pub mod credential;
pub mod transaction;
pub mod types;
pub mod units;

pub use client::{ChainRpc, RpcClient};
pub use credential::{CredentialGenerator, WalletCredential};
pub use types::{
    BalanceView, ChainId, ChainStatus, ErrorKind, TransferReceipt, WalletError, WalletResult,
};
