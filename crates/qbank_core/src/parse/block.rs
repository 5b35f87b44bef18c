//! Line-oriented record extraction.

use crate::model::category::Category;
use crate::model::record::Record;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::Lines;

static HASH_TAGGED_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([0-9]+)\s*(WFD|RS)\s+(.+)$").expect("valid hash tagged line regex")
});
static PADDED_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(RA[0-9]{3})\s+(.+)$").expect("valid padded line regex"));

/// A line that matched no record shape.
///
/// Informational only: the line is dropped from parser output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number in the original text.
    pub line_number: usize,
    /// Trimmed line text.
    pub line: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {} does not match `#N WFD|RS text` or `RAnnn text`: {}",
            self.line_number, self.line
        )
    }
}

impl Error for ParseError {}

/// Lazy iterator over records parsed from a text block.
#[derive(Debug, Clone)]
pub struct BlockParser<'a> {
    lines: std::iter::Enumerate<Lines<'a>>,
}

impl Iterator for BlockParser<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        for (_, line) in self.lines.by_ref() {
            if let Some(record) = parse_line(line) {
                return Some(record);
            }
        }
        None
    }
}

/// Parses a block of text, one candidate record per line.
pub fn parse_block(text: &str) -> BlockParser<'_> {
    BlockParser {
        lines: text.lines().enumerate(),
    }
}

/// Parse outcome with the dropped lines kept for operator feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockParseReport {
    pub records: Vec<Record>,
    pub rejected: Vec<ParseError>,
}

/// Parses a block of text and records which non-blank lines were dropped.
pub fn parse_block_report(text: &str) -> BlockParseReport {
    let mut report = BlockParseReport::default();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_line(trimmed) {
            Some(record) => report.records.push(record),
            None => report.rejected.push(ParseError {
                line_number: index + 1,
                line: trimmed.to_string(),
            }),
        }
    }
    report
}

fn parse_line(line: &str) -> Option<Record> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(caps) = HASH_TAGGED_LINE_RE.captures(line) {
        let category = Category::from_tag(&caps[2])?;
        let identifier = format!("#{} {}", &caps[1], category.tag());
        return Some(Record::new(category, identifier, caps[3].trim()));
    }

    if let Some(caps) = PADDED_LINE_RE.captures(line) {
        return Some(Record::new(Category::Ra, &caps[1], caps[2].trim()));
    }

    None
}
