//! Resilience subsystem.
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: a failed query waits for the next trigger, a failed
//!   transfer must be re-submitted by the user

pub mod timeouts;
