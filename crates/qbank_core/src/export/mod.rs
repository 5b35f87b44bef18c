//! CSV export of record views.
//!
//! # Responsibility
//! - Render records as comma-separated text for spreadsheet tools.
//! - Name export files after the view they were taken from.
//!
//! # Invariants
//! - Header row is always `Identifier,Category,Content`.
//! - `Content` is always quoted, with inner quotes doubled.

use crate::model::category::Category;
use crate::model::record::Record;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const CSV_HEADER: &str = "Identifier,Category,Content";
const UTF8_BOM: &str = "\u{feff}";

/// The catalog view an export was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportView {
    /// Full catalog across categories.
    AllQuestions,
    /// Catalog filtered to one category.
    Category(Category),
    /// Reconciliation results, optionally scoped to one category.
    SearchResults(Option<Category>),
}

impl ExportView {
    /// Download file name for this view.
    pub fn file_name(self) -> String {
        match self {
            Self::AllQuestions => "questions.csv".to_string(),
            Self::Category(category) => format!("{}_questions.csv", file_prefix(category)),
            Self::SearchResults(None) => "search_results.csv".to_string(),
            Self::SearchResults(Some(category)) => {
                format!("{}_search_results.csv", file_prefix(category))
            }
        }
    }

    /// Category-scoped search exports carry a byte-order mark so that
    /// spreadsheet tools detect UTF-8.
    pub fn wants_bom(self) -> bool {
        matches!(self, Self::SearchResults(Some(_)))
    }
}

fn file_prefix(category: Category) -> String {
    category.tag().to_ascii_lowercase()
}

/// Rendering options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvOptions {
    /// Prefix the output with a UTF-8 byte-order mark.
    pub byte_order_mark: bool,
}

impl From<ExportView> for CsvOptions {
    fn from(view: ExportView) -> Self {
        Self {
            byte_order_mark: view.wants_bom(),
        }
    }
}

/// Export failure.
#[derive(Debug)]
pub enum ExportError {
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write export `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Quotes a CSV field, doubling embedded quotes.
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Renders records as CSV text, rows joined by `\n`.
pub fn to_csv(records: &[Record], options: CsvOptions) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for record in records {
        lines.push(format!(
            "{},{},{}",
            record.identifier,
            record.category.tag(),
            quote_field(&record.content)
        ));
    }

    let body = lines.join("\n");
    if options.byte_order_mark {
        format!("{UTF8_BOM}{body}")
    } else {
        body
    }
}

/// Writes a view export into `dir` and returns the written path.
///
/// # Errors
/// - Returns `ExportError::Io` when the file cannot be written.
pub fn write_view(dir: &Path, view: ExportView, records: &[Record]) -> Result<PathBuf, ExportError> {
    let path = dir.join(view.file_name());
    let csv = to_csv(records, CsvOptions::from(view));
    std::fs::write(&path, csv).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(
        "event=export_write module=export status=ok rows={} file={}",
        records.len(),
        view.file_name()
    );
    Ok(path)
}
