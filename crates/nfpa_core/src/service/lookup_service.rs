//! Fire-diamond lookup use-case service.
//!
//! # Responsibility
//! - Expose the query surface consumed by UI callers.
//! - Shape merged records into name-only outcomes.
//!
//! # Invariants
//! - Outcomes only carry listed (named) records.
//! - Names keep aggregate result order.

use crate::index::aggregate::AggregateIndex;
use crate::model::hazard::HazardProfile;

/// Message shown when nothing matches.
pub const NO_MATCH_MESSAGE: &str = "No results. Try again.";

/// Lookup answer, split by how the caller renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    NoMatch,
    Single(String),
    Multiple(Vec<String>),
}

impl LookupOutcome {
    pub fn from_names(mut names: Vec<String>) -> Self {
        match names.len() {
            0 => Self::NoMatch,
            1 => Self::Single(names.remove(0)),
            _ => Self::Multiple(names),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::NoMatch => Vec::new(),
            Self::Single(name) => vec![name.as_str()],
            Self::Multiple(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Plain-text rendering: the message, the single name, or a ` - name` list.
    pub fn render(&self) -> String {
        match self {
            Self::NoMatch => NO_MATCH_MESSAGE.to_string(),
            Self::Single(name) => name.clone(),
            Self::Multiple(names) => names
                .iter()
                .map(|name| format!(" - {name}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Use-case wrapper around one aggregate index.
pub struct LookupService {
    index: AggregateIndex,
}

impl LookupService {
    pub fn new(index: AggregateIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &AggregateIndex {
        &self.index
    }

    /// Names of matching chemicals in result order.
    pub fn names(&self, query: &HazardProfile, include_specials: bool) -> Vec<String> {
        self.index
            .query(query, include_specials)
            .into_iter()
            .filter_map(|record| record.display_name().map(str::to_string))
            .collect()
    }

    pub fn lookup(&self, query: &HazardProfile, include_specials: bool) -> LookupOutcome {
        LookupOutcome::from_names(self.names(query, include_specials))
    }
}

#[cfg(test)]
mod tests {
    use super::{LookupOutcome, LookupService, NO_MATCH_MESSAGE};
    use crate::index::aggregate::AggregateIndex;
    use crate::index::source::SingleSourceIndex;
    use crate::model::chemical::{ChemicalRecord, IdentifierKind};
    use crate::model::hazard::HazardProfile;

    #[test]
    fn render_distinguishes_result_counts() {
        assert_eq!(LookupOutcome::NoMatch.render(), NO_MATCH_MESSAGE);
        assert_eq!(
            LookupOutcome::Single("Acetone".to_string()).render(),
            "Acetone"
        );
        assert_eq!(
            LookupOutcome::from_names(vec!["Ethanol".to_string(), "Methanol".to_string()])
                .render(),
            " - Ethanol\n - Methanol"
        );
    }

    #[test]
    fn lookup_without_resolver_concatenates_sources() {
        let profile = HazardProfile::new(2, 3, 0).expect("profile");
        let mut index = AggregateIndex::new(None, IdentifierKind::InchiKey);
        index.push_source(SingleSourceIndex::from_records(
            "a",
            vec![ChemicalRecord::new("Ethanol", profile)],
        ));
        index.push_source(SingleSourceIndex::from_records(
            "b",
            vec![ChemicalRecord::new("Ethyl alcohol", profile)],
        ));
        let service = LookupService::new(index);
        assert_eq!(service.index().record_count(), 2);

        let outcome = service.lookup(&profile, false);
        assert_eq!(
            outcome,
            LookupOutcome::Multiple(vec!["Ethanol".to_string(), "Ethyl alcohol".to_string()])
        );
        assert_eq!(outcome.names(), vec!["Ethanol", "Ethyl alcohol"]);
        assert!(LookupOutcome::NoMatch.names().is_empty());
        assert_eq!(
            service.lookup(&HazardProfile::new(4, 4, 4).expect("profile"), false),
            LookupOutcome::NoMatch
        );
    }
}
