//! Per-source record index.
//!
//! # Responsibility
//! - Hold the records produced by one dataset source.
//! - Answer strict fire-diamond match queries against them.
//!
//! # Invariants
//! - Results keep load order.
//! - Unlisted (unnamed) records never appear in results.
//! - A failed source load yields an empty index, not an error.

use crate::dataset::SourceLoader;
use crate::model::chemical::{ChemicalRecord, IdentifierKind};
use crate::model::hazard::HazardProfile;
use crate::resolve::resolver::IdentifierResolver;
use log::error;
use std::collections::HashMap;

type BucketKey = (u8, u8, u8);

/// Records of one source, bucketed by numeric ratings.
///
/// Buckets store positions in load order, so a bucket lookup returns the
/// same records in the same order as a full linear scan would.
#[derive(Debug, Clone, Default)]
pub struct SingleSourceIndex {
    source_name: String,
    records: Vec<ChemicalRecord>,
    buckets: HashMap<BucketKey, Vec<usize>>,
}

impl SingleSourceIndex {
    pub fn from_records(source_name: impl Into<String>, records: Vec<ChemicalRecord>) -> Self {
        let mut buckets: HashMap<BucketKey, Vec<usize>> = HashMap::new();
        for (position, record) in records.iter().enumerate() {
            buckets
                .entry(record.profile.bucket_key())
                .or_default()
                .push(position);
        }
        Self {
            source_name: source_name.into(),
            records,
            buckets,
        }
    }

    /// Loads one source; load failures degrade to an empty index.
    pub fn load(loader: &dyn SourceLoader) -> Self {
        let source_name = loader.source_name().to_string();
        match loader.load() {
            Ok(report) => Self::from_records(source_name, report.records),
            Err(err) => {
                error!(
                    "event=source_index_load module=index status=error source={} error={}",
                    source_name, err
                );
                Self::from_records(source_name, Vec::new())
            }
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn records(&self) -> &[ChemicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns every listed record whose profile matches `query`.
    pub fn query(&self, query: &HazardProfile, include_specials: bool) -> Vec<ChemicalRecord> {
        let Some(positions) = self.buckets.get(&query.bucket_key()) else {
            return Vec::new();
        };
        positions
            .iter()
            .map(|position| &self.records[*position])
            .filter(|record| record.is_listed() && record.profile.matches(query, include_specials))
            .cloned()
            .collect()
    }

    /// Resolves and caches `kind` for every listed record lacking it.
    ///
    /// Returns the number of identifiers newly cached.
    pub fn resolve_identifiers(
        &mut self,
        resolver: &IdentifierResolver,
        kind: IdentifierKind,
    ) -> usize {
        let mut cached = 0;
        for record in &mut self.records {
            if record.identifier(kind).is_some() {
                continue;
            }
            let Some(name) = record.display_name().map(str::to_string) else {
                continue;
            };
            if let Some(identifier) = resolver.resolve(&name, kind) {
                if record.set_identifier(kind, identifier) {
                    cached += 1;
                }
            }
        }
        cached
    }
}
