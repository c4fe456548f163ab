//! Core logic for NFPA 704 fire-diamond chemical lookup.
//! Datasets, matching, cross-source de-duplication and identifier voting
//! live here; UI front ends only feed queries in and render names out.

pub mod config;
pub mod dataset;
pub mod index;
pub mod logging;
pub mod model;
pub mod resolve;
pub mod service;

pub use config::{ConfigError, LookupConfig, ProviderConfig, ProviderKind};
pub use dataset::{
    parse_records, DatasetError, JsonFileLoader, JsonStrLoader, LoadReport, SkippedRecord,
    SourceLoader,
};
pub use index::aggregate::{dedup, AggregateIndex};
pub use index::source::SingleSourceIndex;
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::chemical::{ChemicalRecord, IdentifierKind};
pub use model::hazard::{
    matches, HazardCategory, HazardProfile, ProfileError, Rating, SpecialSymbol, SpecialSymbols,
};
pub use resolve::provider::{
    clean_name, IdentifierProvider, ProviderError, ProviderRequest, ProviderResult,
};
pub use resolve::resolver::{IdentifierResolver, ResolverError, Vote, VoteTally};
pub use resolve::transport::{StaticTransport, Transport, TransportError};
pub use service::lookup_service::{LookupOutcome, LookupService};

#[cfg(feature = "http")]
pub use resolve::transport::HttpTransport;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
