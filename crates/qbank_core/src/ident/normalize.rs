//! Free-form token normalization.

use super::scheme::{canonical_category, format_identifier};
use crate::model::category::Category;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static DIGIT_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit run regex"));
static ALPHA_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]+").expect("valid alpha run regex"));

/// Reasons a single token cannot be resolved to a canonical identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    /// Token is blank after trim.
    EmptyInput,
    /// Token holds no decimal digits.
    NoDigitsFound(String),
    /// Token names more than one category tag and no hint was given.
    AmbiguousCategory {
        token: String,
        candidates: Vec<Category>,
    },
}

impl Display for NormalizationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "identifier input is empty"),
            Self::NoDigitsFound(token) => write!(f, "no digits found in `{token}`"),
            Self::AmbiguousCategory { token, candidates } => {
                let tags = candidates
                    .iter()
                    .map(|category| category.tag())
                    .collect::<Vec<_>>()
                    .join("|");
                write!(f, "`{token}` names conflicting categories ({tags})")
            }
        }
    }
}

impl Error for NormalizationError {}

/// A category-qualified identifier in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalIdentifier {
    pub category: Category,
    pub value: String,
}

impl CanonicalIdentifier {
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }
}

impl Display for CanonicalIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Normalization policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Category used when a token has neither a hint nor a tag prefix.
    pub default_category: Category,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            default_category: Category::Wfd,
        }
    }
}

/// Maps raw operator tokens to canonical identifiers.
///
/// Resolution order:
/// 1. A token already in some category's canonical form keeps that category.
/// 2. Otherwise the longest digit run is formatted for the hinted category,
///    else the category named by a `WFD`/`RS`/`RA` tag in the token, else
///    `config.default_category`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> NormalizerConfig {
        self.config
    }

    /// Normalizes one token.
    ///
    /// # Errors
    /// - `EmptyInput` for blank tokens.
    /// - `NoDigitsFound` when the token is not canonical and holds no digits.
    /// - `AmbiguousCategory` when no hint is given and the token carries
    ///   more than one category tag.
    pub fn normalize(
        &self,
        raw: &str,
        hint: Option<Category>,
    ) -> Result<CanonicalIdentifier, NormalizationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NormalizationError::EmptyInput);
        }
        let upper = trimmed.to_ascii_uppercase();

        if let Some(category) = canonical_category(&upper) {
            return Ok(CanonicalIdentifier {
                category,
                value: upper,
            });
        }

        let Some(digits) = longest_digit_run(&upper) else {
            return Err(NormalizationError::NoDigitsFound(trimmed.to_string()));
        };

        let category = match hint {
            Some(category) => category,
            None => match tagged_categories(&upper).as_slice() {
                [] => self.config.default_category,
                [single] => *single,
                many => {
                    return Err(NormalizationError::AmbiguousCategory {
                        token: trimmed.to_string(),
                        candidates: many.to_vec(),
                    });
                }
            },
        };

        Ok(CanonicalIdentifier {
            category,
            value: format_identifier(category, digits),
        })
    }

    /// Normalizes one token, degrading failures to a usable identifier.
    ///
    /// Used by batch flows where one bad token must not abort the batch:
    /// digits are formatted as-is for the hinted (or default) category, and a
    /// token with no digits is kept as its trimmed uppercase text.
    pub fn normalize_lossy(&self, raw: &str, hint: Option<Category>) -> CanonicalIdentifier {
        match self.normalize(raw, hint) {
            Ok(identifier) => identifier,
            Err(_) => {
                let upper = raw.trim().to_ascii_uppercase();
                let category = hint.unwrap_or(self.config.default_category);
                let value = match longest_digit_run(&upper) {
                    Some(digits) => format_identifier(category, digits),
                    None => upper.clone(),
                };
                CanonicalIdentifier { category, value }
            }
        }
    }
}

/// Normalizes one token with the default policy.
pub fn normalize(
    raw: &str,
    hint: Option<Category>,
) -> Result<CanonicalIdentifier, NormalizationError> {
    Normalizer::default().normalize(raw, hint)
}

fn longest_digit_run(value: &str) -> Option<&str> {
    DIGIT_RUN_RE
        .find_iter(value)
        .map(|m| m.as_str())
        .reduce(|best, run| if run.len() > best.len() { run } else { best })
}

fn tagged_categories(value: &str) -> Vec<Category> {
    let mut found = Vec::new();
    for run in ALPHA_RUN_RE.find_iter(value) {
        if let Some(category) = Category::from_tag(run.as_str()) {
            if !found.contains(&category) {
                found.push(category);
            }
        }
    }
    found
}
