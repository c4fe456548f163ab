//! Query indexes over loaded dataset records.
//!
//! # Responsibility
//! - Answer fire-diamond queries per source and across sources.
//! - Merge multi-source answers and drop cross-source duplicates.

pub mod aggregate;
pub mod source;
