//! JSON dataset parsing.
//!
//! Bundled datasets are arrays of objects shaped like
//! `{"NAME":"Acetone","HEALTH":1,"FLAMMABILITY":3,"REACTIVITY":0,"SPECIAL":""}`.
//! Ratings may be numbers or numeric strings. `SPECIAL` holds zero or more
//! symbol abbreviations separated by commas or whitespace.

use crate::dataset::{DatasetError, DatasetResult, LoadReport, SkippedRecord, SourceLoader};
use crate::model::chemical::ChemicalRecord;
use crate::model::hazard::{
    HazardCategory, HazardProfile, ProfileError, Rating, SpecialSymbol, SpecialSymbols,
};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const FIELD_NAME: &str = "NAME";
const FIELD_SPECIAL: &str = "SPECIAL";

static SPECIAL_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,;/]+").expect("valid special separator regex"));

/// Parses one dataset document.
///
/// # Errors
/// - `InvalidJson` / `NotAnArray` when the document itself is unusable.
///
/// Individual malformed records land in [`LoadReport::skipped`].
pub fn parse_records(body: &str) -> DatasetResult<LoadReport> {
    let document: Value = serde_json::from_str(body)?;
    let Value::Array(items) = document else {
        return Err(DatasetError::NotAnArray);
    };

    let mut report = LoadReport::default();
    for (position, item) in items.iter().enumerate() {
        match parse_record(item) {
            Ok(record) => report.records.push(record),
            Err(reason) => report.skipped.push(SkippedRecord { position, reason }),
        }
    }
    Ok(report)
}

/// Converts a `SPECIAL` field value into a total symbol map.
///
/// Unknown tokens (non-standard markings such as `COR` or `ACID`) are ignored.
pub fn parse_special_tokens(raw: &str) -> SpecialSymbols {
    let mut symbols = SpecialSymbols::none();
    for token in SPECIAL_SEPARATOR_RE
        .split(raw.trim())
        .filter(|token| !token.is_empty())
    {
        match SpecialSymbol::from_token(token) {
            Some(symbol) => symbols.set(symbol, true),
            None => debug!(
                "event=special_token_ignored module=dataset status=skip token={}",
                token
            ),
        }
    }
    symbols
}

fn parse_record(item: &Value) -> Result<ChemicalRecord, String> {
    let Value::Object(fields) = item else {
        return Err("record is not a JSON object".to_string());
    };

    let name = match fields.get(FIELD_NAME) {
        Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
        Some(Value::String(_)) => return Err("record name is blank".to_string()),
        Some(_) => return Err("record name is not a string".to_string()),
        None => return Err("record has no NAME field".to_string()),
    };

    let specials = match fields.get(FIELD_SPECIAL) {
        Some(Value::String(raw)) => parse_special_tokens(raw),
        Some(Value::Null) | None => SpecialSymbols::none(),
        Some(_) => return Err("SPECIAL field is not a string".to_string()),
    };

    let profile = HazardProfile {
        health: parse_rating(fields, HazardCategory::Health).map_err(|err| err.to_string())?,
        flammability: parse_rating(fields, HazardCategory::Flammability)
            .map_err(|err| err.to_string())?,
        reactivity: parse_rating(fields, HazardCategory::Reactivity)
            .map_err(|err| err.to_string())?,
        specials,
    };
    Ok(ChemicalRecord::new(name, profile))
}

fn parse_rating(
    fields: &Map<String, Value>,
    category: HazardCategory,
) -> Result<Rating, ProfileError> {
    let value = match fields.get(category.as_str()) {
        Some(Value::Number(number)) => number.as_i64().ok_or_else(|| {
            ProfileError::NonNumericRating {
                category,
                raw: number.to_string(),
            }
        })?,
        Some(Value::String(raw)) => {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| ProfileError::NonNumericRating {
                    category,
                    raw: raw.clone(),
                })?
        }
        Some(other) => {
            return Err(ProfileError::NonNumericRating {
                category,
                raw: other.to_string(),
            })
        }
        None => return Err(ProfileError::MissingRating(category)),
    };

    let narrowed = u8::try_from(value)
        .map_err(|_| ProfileError::RatingOutOfRange { category, value })?;
    Rating::new(category, narrowed)
}

fn log_report(source: &str, report: &LoadReport) {
    for skipped in &report.skipped {
        warn!(
            "event=dataset_record_skipped module=dataset status=warn source={} position={} reason={}",
            source, skipped.position, skipped.reason
        );
    }
    info!(
        "event=dataset_load module=dataset status=ok source={} records={} skipped={}",
        source,
        report.records.len(),
        report.skipped.len()
    );
}

/// Loads a dataset file from disk.
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    name: String,
    path: PathBuf,
}

impl JsonFileLoader {
    /// Uses the file name as the source name.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|value| value.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceLoader for JsonFileLoader {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> DatasetResult<LoadReport> {
        let body = std::fs::read_to_string(&self.path).map_err(|source| DatasetError::Io {
            path: self.path.clone(),
            source,
        })?;
        let report = parse_records(&body)?;
        log_report(&self.name, &report);
        Ok(report)
    }
}

/// Dataset held in memory, e.g. an embedded asset.
#[derive(Debug, Clone)]
pub struct JsonStrLoader {
    name: String,
    body: String,
}

impl JsonStrLoader {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

impl SourceLoader for JsonStrLoader {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> DatasetResult<LoadReport> {
        let report = parse_records(&self.body)?;
        log_report(&self.name, &report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_records, parse_special_tokens};
    use crate::dataset::DatasetError;
    use crate::model::hazard::SpecialSymbol;

    #[test]
    fn parses_numeric_and_string_ratings() {
        let report = parse_records(
            r#"[
                {"NAME":"Acetone","HEALTH":1,"FLAMMABILITY":3,"REACTIVITY":0,"SPECIAL":""},
                {"NAME":"Sodium","HEALTH":"3","FLAMMABILITY":"1","REACTIVITY":"2","SPECIAL":"W"}
            ]"#,
        )
        .expect("dataset should parse");

        assert_eq!(report.records.len(), 2);
        assert!(report.skipped.is_empty());
        let sodium = &report.records[1];
        assert_eq!(sodium.profile.bucket_key(), (3, 1, 2));
        assert!(sodium.profile.specials.get(SpecialSymbol::WaterReactive));
    }

    #[test]
    fn skips_malformed_records_and_keeps_the_rest() {
        let report = parse_records(
            r#"[
                {"NAME":"Bad","HEALTH":"x","FLAMMABILITY":0,"REACTIVITY":0,"SPECIAL":""},
                {"NAME":"Missing","HEALTH":1,"REACTIVITY":0},
                {"NAME":"TooHigh","HEALTH":7,"FLAMMABILITY":0,"REACTIVITY":0},
                {"NAME":"Negative","HEALTH":-1,"FLAMMABILITY":0,"REACTIVITY":0},
                {"HEALTH":1,"FLAMMABILITY":1,"REACTIVITY":1},
                "not an object",
                {"NAME":"Water","HEALTH":0,"FLAMMABILITY":0,"REACTIVITY":0}
            ]"#,
        )
        .expect("document should parse");

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].display_name(), Some("Water"));
        let positions: Vec<usize> = report.skipped.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 5]);
        assert!(report.skipped[0].reason.contains("HEALTH"));
    }

    #[test]
    fn rejects_non_array_documents() {
        let err = parse_records(r#"{"NAME":"Acetone"}"#).expect_err("object is not a dataset");
        assert!(matches!(err, DatasetError::NotAnArray));

        let err = parse_records("[{").expect_err("truncated JSON must fail");
        assert!(matches!(err, DatasetError::InvalidJson(_)));
    }

    #[test]
    fn special_tokens_accept_mixed_separators() {
        let symbols = parse_special_tokens("ox, sa/W");
        assert!(symbols.get(SpecialSymbol::Oxidizer));
        assert!(symbols.get(SpecialSymbol::SimpleAsphyxiant));
        assert!(symbols.get(SpecialSymbol::WaterReactive));

        let symbols = parse_special_tokens("COR ACID");
        assert!(symbols.is_empty());
        assert!(parse_special_tokens("").is_empty());
    }
}
