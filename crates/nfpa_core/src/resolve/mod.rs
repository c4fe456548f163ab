//! External identifier resolution.
//!
//! # Responsibility
//! - Define the provider contract and the network boundary.
//! - Reconcile provider answers into one identifier by plurality vote.
//!
//! # Invariants
//! - Provider and transport failures are votes for "unavailable", never
//!   errors surfaced to callers.

pub mod cts;
pub mod opsin;
pub mod provider;
pub mod resolver;
pub mod transport;
