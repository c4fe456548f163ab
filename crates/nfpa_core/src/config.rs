//! Lookup configuration.
//!
//! # Responsibility
//! - Declare dataset sources, identifier providers and resolution policy.
//! - Validate declarations before any index is built.
//!
//! # Invariants
//! - At least one dataset source is declared.
//! - Each provider kind is declared at most once.
//! - Relative source paths are resolved against the config file directory.

use crate::dataset::{JsonFileLoader, SourceLoader};
use crate::index::aggregate::AggregateIndex;
use crate::model::chemical::IdentifierKind;
use crate::resolve::cts::CtsProvider;
use crate::resolve::opsin::OpsinProvider;
use crate::resolve::provider::IdentifierProvider;
use crate::resolve::resolver::{IdentifierResolver, ResolverError};
use crate::resolve::transport::Transport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Supported identifier providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Opsin,
    Cts,
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opsin => f.write_str("opsin"),
            Self::Cts => f.write_str("cts"),
        }
    }
}

/// One provider declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Overrides the public service endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn build(&self) -> Arc<dyn IdentifierProvider> {
        match (self.kind, self.base_url.as_deref()) {
            (ProviderKind::Opsin, Some(url)) => Arc::new(OpsinProvider::with_base_url(url)),
            (ProviderKind::Opsin, None) => Arc::new(OpsinProvider::new()),
            (ProviderKind::Cts, Some(url)) => Arc::new(CtsProvider::with_base_url(url)),
            (ProviderKind::Cts, None) => Arc::new(CtsProvider::new()),
        }
    }
}

/// Top-level lookup configuration document (JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
    pub sources: Vec<PathBuf>,
    #[serde(default = "default_dedup_identifier")]
    pub dedup_identifier: IdentifierKind,
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub parallel_fanout: bool,
}

fn default_dedup_identifier() -> IdentifierKind {
    IdentifierKind::InchiKey
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

impl LookupConfig {
    /// Config with the given sources and no providers.
    pub fn with_sources(sources: Vec<PathBuf>) -> Self {
        Self {
            sources,
            dedup_identifier: default_dedup_identifier(),
            providers: Vec::new(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            parallel_fanout: false,
        }
    }

    /// Parses and validates a config document.
    pub fn from_json_str(body: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(body).map_err(ConfigError::InvalidJson)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config file; relative sources resolve against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json_str(&body)?;
        if let Some(base_dir) = path.parent() {
            config.sources = config
                .sources
                .into_iter()
                .map(|source| {
                    if source.is_relative() {
                        base_dir.join(source)
                    } else {
                        source
                    }
                })
                .collect();
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        let mut seen = BTreeSet::new();
        for provider in &self.providers {
            if !seen.insert(provider.kind) {
                return Err(ConfigError::DuplicateProvider(provider.kind));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Builds a resolver over `transport` with providers in declaration order.
    pub fn build_resolver(
        &self,
        transport: Arc<dyn Transport>,
    ) -> Result<IdentifierResolver, ConfigError> {
        let mut resolver =
            IdentifierResolver::new(transport).with_parallel_fanout(self.parallel_fanout);
        for provider in &self.providers {
            resolver.register(provider.build())?;
        }
        Ok(resolver)
    }

    pub fn loaders(&self) -> Vec<JsonFileLoader> {
        self.sources.iter().map(JsonFileLoader::new).collect()
    }

    /// Loads every source into an aggregate index.
    ///
    /// De-duplication is enabled only when providers are declared and a
    /// transport is given.
    pub fn build_index(
        &self,
        transport: Option<Arc<dyn Transport>>,
    ) -> Result<AggregateIndex, ConfigError> {
        let resolver = match transport {
            Some(transport) if !self.providers.is_empty() => {
                Some(Arc::new(self.build_resolver(transport)?))
            }
            _ => None,
        };
        let mut index = AggregateIndex::new(resolver, self.dedup_identifier);
        let loaders = self.loaders();
        let loader_refs: Vec<&dyn SourceLoader> = loaders
            .iter()
            .map(|loader| loader as &dyn SourceLoader)
            .collect();
        index.load_sources(&loader_refs);
        Ok(index)
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidJson(serde_json::Error),
    NoSources,
    ZeroTimeout,
    DuplicateProvider(ProviderKind),
    Resolver(ResolverError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::InvalidJson(err) => write!(f, "invalid config document: {err}"),
            Self::NoSources => write!(f, "config must declare at least one dataset source"),
            Self::ZeroTimeout => write!(f, "request_timeout_ms must be greater than zero"),
            Self::DuplicateProvider(kind) => write!(f, "provider `{kind}` is declared twice"),
            Self::Resolver(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidJson(err) => Some(err),
            Self::Resolver(err) => Some(err),
            Self::NoSources | Self::ZeroTimeout | Self::DuplicateProvider(_) => None,
        }
    }
}

impl From<ResolverError> for ConfigError {
    fn from(value: ResolverError) -> Self {
        Self::Resolver(value)
    }
}
