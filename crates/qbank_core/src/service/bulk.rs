//! Per-item outcome log for sequential bulk writes.

use crate::model::category::Category;
use crate::model::record::Record;
use serde::Serialize;

/// Progress snapshot emitted after each bulk item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkProgress {
    pub completed: usize,
    pub total: usize,
}

impl BulkProgress {
    /// Whole-number completion percentage.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed * 100) / self.total) as u8
    }
}

/// What happened to one bulk item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Inserted { record: Record },
    SkippedDuplicate,
    Failed { reason: String },
}

/// One bulk item with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub category: Category,
    pub identifier: String,
    pub outcome: ItemOutcome,
}

/// Ordered outcome log for a bulk write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    pub items: Vec<ItemReport>,
}

impl BulkReport {
    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn inserted(&self) -> impl Iterator<Item = &Record> {
        self.items.iter().filter_map(|item| match &item.outcome {
            ItemOutcome::Inserted { record } => Some(record),
            _ => None,
        })
    }

    pub fn inserted_count(&self) -> usize {
        self.inserted().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.outcome == ItemOutcome::SkippedDuplicate)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Failed { .. }))
            .count()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// One-line operator summary.
    pub fn summary(&self) -> String {
        format!(
            "{} inserted, {} skipped as duplicates, {} failed (of {})",
            self.inserted_count(),
            self.skipped_count(),
            self.failed_count(),
            self.total()
        )
    }
}
