//! JSON interchange for parsed and exported records.
//!
//! # Responsibility
//! - Render records as the `[{questionNo, type, content}]` JSON shape.
//! - Validate a JSON import batch as a whole before anything is written.
//!
//! # Invariants
//! - A batch with any invalid entry is rejected entirely.

use crate::ident::canonical_category;
use crate::model::category::Category;
use crate::model::record::Record;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected JSON import batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Input is not a JSON array of objects.
    Malformed(String),
    /// Entry at `index` is missing a required field.
    MissingField { index: usize, field: &'static str },
    /// Entry at `index` has an identifier with no canonical category.
    InvalidIdentifier { index: usize, identifier: String },
    /// Entry at `index` declares a `type` that disagrees with its identifier.
    CategoryMismatch {
        index: usize,
        declared: String,
        identifier: String,
    },
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "import must be a JSON array: {message}"),
            Self::MissingField { index, field } => {
                write!(f, "question at index {index} is missing required field `{field}`")
            }
            Self::InvalidIdentifier { index, identifier } => write!(
                f,
                "question at index {index} has invalid number `{identifier}`; expected `#N WFD`, `#N RS` or `RAnnn`"
            ),
            Self::CategoryMismatch {
                index,
                declared,
                identifier,
            } => write!(
                f,
                "question at index {index} declares type `{declared}` but number `{identifier}` belongs elsewhere"
            ),
        }
    }
}

impl Error for ImportError {}

#[derive(Debug, Deserialize)]
struct ImportEntry {
    #[serde(rename = "questionNo")]
    question_no: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    content: Option<String>,
}

/// Renders records as pretty-printed interchange JSON.
pub fn records_to_json(records: &[Record]) -> Result<String, serde_json::Error> {
    let unsaved = records
        .iter()
        .map(|record| Record::new(record.category, &record.identifier, &record.content))
        .collect::<Vec<_>>();
    serde_json::to_string_pretty(&unsaved)
}

/// Parses and validates an interchange JSON batch.
///
/// The category of each entry comes from its canonical identifier; a
/// declared `type`, when present, must agree with it.
pub fn parse_json_import(json: &str) -> Result<Vec<Record>, ImportError> {
    let entries: Vec<ImportEntry> =
        serde_json::from_str(json).map_err(|err| ImportError::Malformed(err.to_string()))?;

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let identifier = non_blank(entry.question_no).ok_or(ImportError::MissingField {
            index,
            field: "questionNo",
        })?;
        let content = non_blank(entry.content).ok_or(ImportError::MissingField {
            index,
            field: "content",
        })?;

        let category =
            canonical_category(&identifier).ok_or_else(|| ImportError::InvalidIdentifier {
                index,
                identifier: identifier.clone(),
            })?;

        if let Some(declared) = non_blank(entry.kind) {
            if declared.parse::<Category>().ok() != Some(category) {
                return Err(ImportError::CategoryMismatch {
                    index,
                    declared,
                    identifier,
                });
            }
        }

        records.push(Record::new(category, identifier, content));
    }

    Ok(records)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
