//! Found/missing reconciliation of desired identifiers.
//!
//! # Responsibility
//! - Normalize a batch of operator tokens against one category.
//! - Split the batch into records that exist and identifiers that do not.
//!
//! # Invariants
//! - Input order is preserved in both `found` and `missing`.
//! - Every distinct normalized token lands in exactly one of the two lists.
//! - A bad token degrades to a best-effort identifier reported as missing.

use crate::ident::{CanonicalIdentifier, Normalizer};
use crate::model::category::Category;
use crate::model::record::Record;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Result of reconciling desired identifiers with stored records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Existing records, in the order their identifiers were requested.
    pub found: Vec<Record>,
    /// Canonical identifiers with no stored record, in request order.
    pub missing: Vec<CanonicalIdentifier>,
}

impl Reconciliation {
    /// Number of distinct identifiers that were looked up.
    pub fn total(&self) -> usize {
        self.found.len() + self.missing.len()
    }

    /// Returns whether `identifier` is in the missing list.
    pub fn is_missing(&self, identifier: &str) -> bool {
        self.missing.iter().any(|item| item.value == identifier)
    }
}

/// Normalizes and deduplicates tokens, keeping first-occurrence order.
///
/// Blank tokens are skipped; failing tokens fall back to
/// [`Normalizer::normalize_lossy`].
pub fn normalize_tokens<S: AsRef<str>>(
    normalizer: &Normalizer,
    raw_tokens: &[S],
    category_hint: Category,
) -> Vec<CanonicalIdentifier> {
    let mut seen = HashSet::new();
    let mut identifiers = Vec::new();
    for raw in raw_tokens {
        let raw = raw.as_ref();
        if raw.trim().is_empty() {
            continue;
        }
        let identifier = normalizer.normalize_lossy(raw, Some(category_hint));
        if seen.insert(identifier.clone()) {
            identifiers.push(identifier);
        }
    }
    identifiers
}

/// Partitions already-normalized identifiers against `existing`.
pub fn partition(identifiers: &[CanonicalIdentifier], existing: &[Record]) -> Reconciliation {
    let mut index: HashMap<(Category, &str), &Record> = HashMap::new();
    for record in existing {
        index
            .entry((record.category, record.identifier.as_str()))
            .or_insert(record);
    }

    let mut result = Reconciliation::default();
    for identifier in identifiers {
        match index.get(&(identifier.category, identifier.value.as_str())) {
            Some(record) => result.found.push((*record).clone()),
            None => result.missing.push(identifier.clone()),
        }
    }
    result
}

/// Reconciles raw operator tokens for one category with existing records.
pub fn reconcile<S: AsRef<str>>(
    raw_tokens: &[S],
    category_hint: Category,
    existing: &[Record],
) -> Reconciliation {
    reconcile_with(&Normalizer::default(), raw_tokens, category_hint, existing)
}

/// [`reconcile`] with an explicit normalization policy.
pub fn reconcile_with<S: AsRef<str>>(
    normalizer: &Normalizer,
    raw_tokens: &[S],
    category_hint: Category,
    existing: &[Record],
) -> Reconciliation {
    let identifiers = normalize_tokens(normalizer, raw_tokens, category_hint);
    partition(&identifiers, existing)
}
