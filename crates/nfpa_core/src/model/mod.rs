//! Domain model for fire-diamond lookups.
//!
//! # Responsibility
//! - Define the hazard profile shared by stored records and user queries.
//! - Define the chemical record and its identifier cache.
//!
//! # Invariants
//! - Ratings are validated at construction; nothing defaults to zero.

pub mod chemical;
pub mod hazard;
