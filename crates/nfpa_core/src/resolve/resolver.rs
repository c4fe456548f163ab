//! Plurality-vote identifier resolution across providers.
//!
//! # Responsibility
//! - Ask every registered provider for one identifier of a chemical name.
//! - Reconcile disagreeing answers by plurality vote.
//!
//! # Invariants
//! - "Unavailable" is a real candidate and is counted like any identifier.
//! - A provider that cannot serve the identifier kind abstains; it casts no
//!   vote at all.
//! - A name that cleans to nothing is never sent to a transport.
//! - Ties go to the candidate first seen in provider registration order.
//! - Every provider is asked before tallying; no early return.
//! - The resolver never fabricates an identifier.

use crate::model::chemical::IdentifierKind;
use crate::resolve::provider::{IdentifierProvider, ProviderError};
use crate::resolve::transport::Transport;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// One provider's answer; `None` means "unavailable".
pub type Vote = Option<String>;

/// Provider registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    InvalidProviderId(String),
    DuplicateProviderId(String),
}

impl Display for ResolverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProviderId(value) => write!(f, "provider id is invalid: {value}"),
            Self::DuplicateProviderId(value) => {
                write!(f, "provider id already registered: {value}")
            }
        }
    }
}

impl Error for ResolverError {}

/// Occurrence counts per distinct vote, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteTally {
    entries: Vec<(Vote, usize)>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, vote: Vote) {
        match self.entries.iter_mut().find(|(seen, _)| *seen == vote) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((vote, 1)),
        }
    }

    pub fn count(&self, vote: &Vote) -> usize {
        self.entries
            .iter()
            .find(|(seen, _)| seen == vote)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Returns the plurality vote; first-seen wins a tie.
    ///
    /// An empty tally yields `None`.
    pub fn winner(&self) -> Vote {
        let mut best: Option<&(Vote, usize)> = None;
        for entry in &self.entries {
            if best.map_or(true, |current| entry.1 > current.1) {
                best = Some(entry);
            }
        }
        best.and_then(|(vote, _)| vote.clone())
    }
}

impl FromIterator<Vote> for VoteTally {
    fn from_iter<T: IntoIterator<Item = Vote>>(iter: T) -> Self {
        let mut tally = Self::new();
        for vote in iter {
            tally.record(vote);
        }
        tally
    }
}

/// Injectable identifier lookup service shared by all records.
pub struct IdentifierResolver {
    providers: Vec<Arc<dyn IdentifierProvider>>,
    transport: Arc<dyn Transport>,
    parallel_fanout: bool,
}

impl IdentifierResolver {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            providers: Vec::new(),
            transport,
            parallel_fanout: false,
        }
    }

    /// Asks providers on scoped threads instead of one after another.
    ///
    /// Votes are still collected completely and in registration order.
    pub fn with_parallel_fanout(mut self, enabled: bool) -> Self {
        self.parallel_fanout = enabled;
        self
    }

    /// Registers one provider; registration order drives tie-breaks.
    pub fn register(
        &mut self,
        provider: Arc<dyn IdentifierProvider>,
    ) -> Result<(), ResolverError> {
        let provider_id = provider.provider_id().trim().to_string();
        if !is_valid_provider_id(&provider_id) {
            return Err(ResolverError::InvalidProviderId(provider_id));
        }
        if self
            .providers
            .iter()
            .any(|existing| existing.provider_id().trim() == provider_id)
        {
            return Err(ResolverError::DuplicateProviderId(provider_id));
        }

        self.providers.push(provider);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registered provider ids in registration order.
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|provider| provider.provider_id().to_string())
            .collect()
    }

    /// Collects every voting provider's answer in registration order.
    ///
    /// Providers that do not support `kind` abstain and are left out.
    pub fn answers(&self, name: &str, kind: IdentifierKind) -> Vec<Vote> {
        if name.trim().is_empty() {
            return Vec::new();
        }
        let ballots: Vec<Option<Vote>> = if self.parallel_fanout && self.providers.len() > 1 {
            std::thread::scope(|scope| {
                let handles: Vec<_> = self
                    .providers
                    .iter()
                    .map(|provider| scope.spawn(move || self.ask(provider.as_ref(), name, kind)))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or(Some(None)))
                    .collect()
            })
        } else {
            self.providers
                .iter()
                .map(|provider| self.ask(provider.as_ref(), name, kind))
                .collect()
        };
        ballots.into_iter().flatten().collect()
    }

    /// Resolves one identifier by plurality vote.
    ///
    /// Returns `None` when the winning vote is "unavailable", when no
    /// provider is registered, or when `name` is blank.
    pub fn resolve(&self, name: &str, kind: IdentifierKind) -> Option<String> {
        let votes = self.answers(name, kind);
        let tally: VoteTally = votes.into_iter().collect();
        let winner = tally.winner();
        info!(
            "event=identifier_resolve module=resolve status={} kind={} providers={} winner_votes={}",
            if winner.is_some() { "ok" } else { "unavailable" },
            kind,
            tally.total(),
            tally.count(&winner)
        );
        winner
    }

    /// One provider's ballot: `None` abstains, `Some(vote)` is counted.
    fn ask(
        &self,
        provider: &dyn IdentifierProvider,
        name: &str,
        kind: IdentifierKind,
    ) -> Option<Vote> {
        let provider_id = provider.provider_id();
        let cleaned = provider.clean_name(name);
        if cleaned.is_empty() {
            debug!(
                "event=identifier_vote module=resolve status=unavailable provider={} kind={} reason=empty_cleaned_name",
                provider_id, kind
            );
            return Some(None);
        }

        let request = match provider.build_request(&cleaned, kind) {
            Ok(request) => request,
            Err(ProviderError::UnsupportedKind(_)) => {
                debug!(
                    "event=identifier_vote module=resolve status=abstain provider={} kind={}",
                    provider_id, kind
                );
                return None;
            }
            Err(err) => return Some(unavailable(provider_id, kind, &err.to_string())),
        };
        let outcome = self
            .transport
            .fetch(&request)
            .map_err(|err| err.to_string())
            .and_then(|body| {
                provider
                    .parse_response(&body, kind)
                    .map_err(|err| err.to_string())
            });

        match outcome {
            Ok(identifier) => {
                debug!(
                    "event=identifier_vote module=resolve status=ok provider={} kind={}",
                    provider_id, kind
                );
                Some(Some(identifier))
            }
            Err(reason) => Some(unavailable(provider_id, kind, &reason)),
        }
    }
}

fn unavailable(provider_id: &str, kind: IdentifierKind, reason: &str) -> Vote {
    debug!(
        "event=identifier_vote module=resolve status=unavailable provider={} kind={} reason={}",
        provider_id, kind, reason
    );
    None
}

fn is_valid_provider_id(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}
