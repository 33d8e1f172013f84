//! Chain monitoring subsystem.
//!
//! # Data Flow
//! ```text
//! Fixed-interval timer (first tick immediate)
//!     → ChainRpc::block_number
//!     → ChainStatus (watch channel, single writer)
//!     → BlockHeight / Failed notifications
//! ```
//!
//! # Design Decisions
//! - Started once per active view, stopped once on deactivation or drop
//! - Stop is idempotent and fences out any in-flight query result

pub mod poller;

pub use poller::ChainPoller;
