//! Dataset source contracts.
//!
//! # Responsibility
//! - Define the loader contract that turns one named source into records.
//! - Separate whole-source failures from per-record skips.
//!
//! # Invariants
//! - A malformed record is skipped and reported, never fatal to its source.
//! - Loaders return records in source order.

use crate::model::chemical::ChemicalRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod json;

pub use json::{parse_records, parse_special_tokens, JsonFileLoader, JsonStrLoader};

/// Asset name of the first bundled dataset.
pub const BUNDLED_DATASET_1: &str = "NFPA704_DataSet_1.json";
/// Asset name of the second bundled dataset.
pub const BUNDLED_DATASET_2: &str = "NFPA704_DataSet_2.json";

pub type DatasetResult<T> = Result<T, DatasetError>;

/// Whole-source load failure.
#[derive(Debug)]
pub enum DatasetError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidJson(serde_json::Error),
    /// Top-level document is not a JSON array.
    NotAnArray,
}

impl Display for DatasetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read dataset `{}`: {source}", path.display())
            }
            Self::InvalidJson(err) => write!(f, "dataset is not valid JSON: {err}"),
            Self::NotAnArray => write!(f, "dataset must be a JSON array of records"),
        }
    }
}

impl Error for DatasetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidJson(err) => Some(err),
            Self::NotAnArray => None,
        }
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidJson(value)
    }
}

/// One record dropped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Zero-based position in the source array.
    pub position: usize,
    pub reason: String,
}

/// Output of one successful source load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub records: Vec<ChemicalRecord>,
    pub skipped: Vec<SkippedRecord>,
}

/// Produces the records of one named dataset source.
pub trait SourceLoader: Send + Sync {
    fn source_name(&self) -> &str;
    fn load(&self) -> DatasetResult<LoadReport>;
}
