//! Chemical record model.
//!
//! # Responsibility
//! - Pair a display name with one hazard profile.
//! - Cache external identifiers resolved during de-duplication.
//!
//! # Invariants
//! - A record without a non-blank name is unlisted and never part of results.
//! - A cached identifier is written once per kind and treated as immutable.

use crate::model::hazard::HazardProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// External structural identifier kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// CAS registry number.
    Casrn,
    /// PubChem compound id.
    Cid,
    /// Standard InChIKey.
    InchiKey,
}

impl Display for IdentifierKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Casrn => "CASRN",
            Self::Cid => "CID",
            Self::InchiKey => "InChI Key",
        };
        f.write_str(label)
    }
}

/// One named hazard profile loaded from a dataset source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChemicalRecord {
    pub name: Option<String>,
    pub profile: HazardProfile,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    identifiers: BTreeMap<IdentifierKind, String>,
}

impl ChemicalRecord {
    /// Creates a named record with an empty identifier cache.
    pub fn new(name: impl Into<String>, profile: HazardProfile) -> Self {
        Self {
            name: Some(name.into()),
            profile,
            identifiers: BTreeMap::new(),
        }
    }

    /// Creates the unnamed, never-indexed record that carries a user query.
    pub fn query(profile: HazardProfile) -> Self {
        Self {
            name: None,
            profile,
            identifiers: BTreeMap::new(),
        }
    }

    /// Returns the name when it is present and not blank.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Whether this record may appear in a result set.
    pub fn is_listed(&self) -> bool {
        self.display_name().is_some()
    }

    pub fn identifier(&self, kind: IdentifierKind) -> Option<&str> {
        self.identifiers.get(&kind).map(String::as_str)
    }

    /// Caches a resolved identifier.
    ///
    /// Returns `false` and keeps the existing value when one is already cached.
    pub fn set_identifier(&mut self, kind: IdentifierKind, value: impl Into<String>) -> bool {
        if self.identifiers.contains_key(&kind) {
            return false;
        }
        self.identifiers.insert(kind, value.into());
        true
    }

    pub fn identifiers(&self) -> &BTreeMap<IdentifierKind, String> {
        &self.identifiers
    }
}

#[cfg(test)]
mod tests {
    use super::{ChemicalRecord, IdentifierKind};
    use crate::model::hazard::HazardProfile;

    fn acetone() -> ChemicalRecord {
        ChemicalRecord::new("Acetone", HazardProfile::new(1, 3, 0).expect("profile"))
    }

    #[test]
    fn blank_names_are_unlisted() {
        let mut record = acetone();
        assert_eq!(record.display_name(), Some("Acetone"));

        record.name = Some("   ".to_string());
        assert!(!record.is_listed());

        let query = ChemicalRecord::query(record.profile);
        assert!(!query.is_listed());
    }

    #[test]
    fn identifiers_are_write_once() {
        let mut record = acetone();
        assert!(record.identifiers().is_empty());

        assert!(record.set_identifier(IdentifierKind::InchiKey, "CSCPPACGZOOCGX-UHFFFAOYSA-N"));
        assert!(!record.set_identifier(IdentifierKind::InchiKey, "OTHER"));
        assert_eq!(
            record.identifier(IdentifierKind::InchiKey),
            Some("CSCPPACGZOOCGX-UHFFFAOYSA-N")
        );
        assert_eq!(record.identifier(IdentifierKind::Cid), None);
    }

    #[test]
    fn identifier_kind_labels() {
        assert_eq!(IdentifierKind::InchiKey.to_string(), "InChI Key");
        assert_eq!(IdentifierKind::Casrn.to_string(), "CASRN");
    }
}
