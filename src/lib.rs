//! DaVinci wallet: key generation, signer sessions, balance and block-height
//! tracking, and value transfers against a single JSON-RPC endpoint.
//!
//! Cryptography, signing and RPC encoding are delegated to `alloy`; this
//! crate owns the session lifecycle around them.

pub mod blockchain;
pub mod config;
pub mod monitor;
pub mod observability;
pub mod provider;
pub mod resilience;
pub mod wallet;

pub use blockchain::{ChainRpc, RpcClient, WalletCredential, WalletError, WalletResult};
pub use config::WalletConfig;
pub use provider::{LocalSigningAuthority, SigningAuthority};
pub use wallet::WalletView;
