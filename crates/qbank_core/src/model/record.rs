//! Question record model.
//!
//! # Responsibility
//! - Define the unit of persisted catalog data.
//! - Validate write-time invariants before a record reaches storage.
//!
//! # Invariants
//! - `id` is `None` until the repository assigns one on insert.
//! - `identifier` is canonical for `category`.
//! - `version` is `0` before insert and grows by one per stored update.

use crate::ident::is_canonical_for;
use crate::model::category::Category;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Repository-assigned record identity.
pub type RecordId = Uuid;

/// Validation errors raised before a record is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Identifier is blank after trim.
    EmptyIdentifier,
    /// Identifier does not match the canonical pattern of its category.
    NonCanonicalIdentifier {
        category: Category,
        identifier: String,
    },
    /// Content is blank after trim.
    EmptyContent,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyIdentifier => write!(f, "identifier must not be empty"),
            Self::NonCanonicalIdentifier {
                category,
                identifier,
            } => write!(
                f,
                "identifier `{identifier}` is not in canonical {category} form"
            ),
            Self::EmptyContent => write!(f, "content must not be empty"),
        }
    }
}

impl Error for RecordValidationError {}

/// One question record.
///
/// Serialized with the catalog's interchange field names
/// (`questionNo`, `type`, `content`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(rename = "questionNo")]
    pub identifier: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "is_unsaved_version")]
    pub version: i64,
}

impl Record {
    /// Creates an unsaved record.
    pub fn new(
        category: Category,
        identifier: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            category,
            identifier: identifier.into(),
            content: content.into(),
            version: 0,
        }
    }

    /// Returns whether the repository has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Checks write-time invariants.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        let identifier = self.identifier.trim();
        if identifier.is_empty() {
            return Err(RecordValidationError::EmptyIdentifier);
        }
        if !is_canonical_for(self.category, identifier) {
            return Err(RecordValidationError::NonCanonicalIdentifier {
                category: self.category,
                identifier: self.identifier.clone(),
            });
        }
        if self.content.trim().is_empty() {
            return Err(RecordValidationError::EmptyContent);
        }
        Ok(())
    }

    /// Numeric part of the identifier, used for catalog ordering.
    pub fn identifier_number(&self) -> Option<u64> {
        let digits: String = self
            .identifier
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }
}

fn is_unsaved_version(version: &i64) -> bool {
    *version == 0
}
