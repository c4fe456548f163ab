//! Multi-source index with identifier-based de-duplication.
//!
//! # Responsibility
//! - Fan a query out to every source index and concatenate the answers.
//! - Drop records that resolve to the same external identifier as an
//!   earlier record.
//!
//! # Invariants
//! - Result order is source order, then record order within a source.
//! - The earliest record of a duplicate group is the one kept.
//! - Records without a resolved identifier are kept.
//! - Resolution failures never fail the query.

use crate::dataset::SourceLoader;
use crate::index::source::SingleSourceIndex;
use crate::model::chemical::{ChemicalRecord, IdentifierKind};
use crate::model::hazard::{HazardProfile, ProfileError, SpecialSymbols};
use crate::resolve::resolver::IdentifierResolver;
use log::info;
use std::sync::Arc;

pub struct AggregateIndex {
    sources: Vec<SingleSourceIndex>,
    resolver: Option<Arc<IdentifierResolver>>,
    dedup_kind: IdentifierKind,
}

impl AggregateIndex {
    /// Creates an empty aggregate.
    ///
    /// Without a resolver, results are concatenated but not de-duplicated.
    pub fn new(resolver: Option<Arc<IdentifierResolver>>, dedup_kind: IdentifierKind) -> Self {
        Self {
            sources: Vec::new(),
            resolver,
            dedup_kind,
        }
    }

    pub fn push_source(&mut self, source: SingleSourceIndex) {
        self.sources.push(source);
    }

    /// Loads and appends every source in order.
    ///
    /// Sources are loaded on scoped threads; each owns disjoint data.
    pub fn load_sources(&mut self, loaders: &[&dyn SourceLoader]) {
        let loaded: Vec<SingleSourceIndex> = std::thread::scope(|scope| {
            let handles: Vec<_> = loaders
                .iter()
                .map(|loader| scope.spawn(move || SingleSourceIndex::load(*loader)))
                .collect();
            handles
                .into_iter()
                .zip(loaders)
                .map(|(handle, loader)| {
                    handle.join().unwrap_or_else(|_| {
                        SingleSourceIndex::from_records(loader.source_name(), Vec::new())
                    })
                })
                .collect()
        });
        self.sources.extend(loaded);
    }

    pub fn sources(&self) -> &[SingleSourceIndex] {
        &self.sources
    }

    pub fn record_count(&self) -> usize {
        self.sources.iter().map(SingleSourceIndex::len).sum()
    }

    pub fn dedup_kind(&self) -> IdentifierKind {
        self.dedup_kind
    }

    /// `true` when a resolver is attached and queries are de-duplicated.
    pub fn deduplicates(&self) -> bool {
        self.resolver.is_some()
    }

    /// Queries every source, then de-duplicates when a resolver is set.
    pub fn query(&self, query: &HazardProfile, include_specials: bool) -> Vec<ChemicalRecord> {
        let merged: Vec<ChemicalRecord> = self
            .sources
            .iter()
            .flat_map(|source| source.query(query, include_specials))
            .collect();
        let candidates = merged.len();

        let results = match self.resolver.as_deref() {
            Some(resolver) => dedup(merged, resolver, self.dedup_kind),
            None => merged.into_iter().filter(ChemicalRecord::is_listed).collect(),
        };
        info!(
            "event=aggregate_query module=index status=ok query={} include_specials={} sources={} candidates={} results={}",
            query,
            include_specials,
            self.sources.len(),
            candidates,
            results.len()
        );
        results
    }

    /// Ratings-only query (`include_specials = false`).
    pub fn query_ratings(
        &self,
        health: u8,
        flammability: u8,
        reactivity: u8,
    ) -> Result<Vec<ChemicalRecord>, ProfileError> {
        let query = HazardProfile::new(health, flammability, reactivity)?;
        Ok(self.query(&query, false))
    }

    /// Ratings plus specials query (`include_specials = true`).
    pub fn query_with_specials(
        &self,
        health: u8,
        flammability: u8,
        reactivity: u8,
        specials: SpecialSymbols,
    ) -> Result<Vec<ChemicalRecord>, ProfileError> {
        let query = HazardProfile::new(health, flammability, reactivity)?.with_specials(specials);
        Ok(self.query(&query, true))
    }

    /// Resolves and caches the de-duplication identifier on every stored
    /// record, so later queries skip the provider round trips.
    ///
    /// Returns the number of identifiers newly cached; `0` without a resolver.
    pub fn resolve_identifiers(&mut self) -> usize {
        let Some(resolver) = self.resolver.clone() else {
            return 0;
        };
        let kind = self.dedup_kind;
        self.sources
            .iter_mut()
            .map(|source| source.resolve_identifiers(&resolver, kind))
            .sum()
    }
}

/// Removes later records whose resolved identifier equals an earlier one.
///
/// Missing identifiers of `kind` are resolved and cached on the returned
/// records. Unnamed records are dropped without being resolved. Running this
/// twice yields the same list.
pub fn dedup(
    records: Vec<ChemicalRecord>,
    resolver: &IdentifierResolver,
    kind: IdentifierKind,
) -> Vec<ChemicalRecord> {
    let mut records = records;
    for record in &mut records {
        if record.identifier(kind).is_some() {
            continue;
        }
        let Some(name) = record.display_name().map(str::to_string) else {
            continue;
        };
        if let Some(identifier) = resolver.resolve(&name, kind) {
            record.set_identifier(kind, identifier);
        }
    }

    let duplicates = mark_duplicates(&records, kind);
    records
        .into_iter()
        .zip(duplicates)
        .filter(|(record, duplicate)| !duplicate && record.is_listed())
        .map(|(record, _)| record)
        .collect()
}

fn mark_duplicates(records: &[ChemicalRecord], kind: IdentifierKind) -> Vec<bool> {
    let mut duplicate = vec![false; records.len()];
    for (i, origin) in records.iter().enumerate() {
        if duplicate[i] || !origin.is_listed() {
            continue;
        }
        let Some(origin_id) = origin.identifier(kind) else {
            continue;
        };
        for (j, candidate) in records.iter().enumerate().skip(i + 1) {
            if !duplicate[j]
                && candidate.is_listed()
                && candidate.identifier(kind) == Some(origin_id)
            {
                duplicate[j] = true;
            }
        }
    }
    duplicate
}
