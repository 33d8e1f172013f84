//! Wallet session subsystem.
//!
//! # Data Flow
//! ```text
//! CredentialGenerator, ProviderSession  → identity / session state
//!     → BalanceTracker (on connect, after transfer)
//!     → ChainPoller (timer)              → display state
//! TransferSubmitter → ProviderSession → new chain state → BalanceTracker
//! ```
//!
//! # Design Decisions
//! - One owner (`WalletView`) per active display; no ambient globals
//! - Outcomes flow through a typed notification channel, logs are secondary
//! - A balance is only ever shown for the address it was fetched for

pub mod balance;
pub mod clipboard;
pub mod notify;
pub mod transfer;
pub mod view;

pub use balance::BalanceTracker;
pub use clipboard::{ClipboardSink, MemoryClipboard};
pub use notify::{Notification, NotificationReceiver, Notifier};
pub use transfer::TransferSubmitter;
pub use view::{CredentialField, WalletView};
