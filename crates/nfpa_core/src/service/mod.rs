//! Core use-case services.
//!
//! # Responsibility
//! - Turn index answers into caller-facing lookup outcomes.
//! - Keep UI layers decoupled from index and resolver details.

pub mod lookup_service;
