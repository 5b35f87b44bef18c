//! Record use-case service.
//!
//! # Responsibility
//! - Provide add/import/list/search/edit/delete entry points.
//! - Normalize operator identifiers before they reach the repository.
//! - Run bulk writes as a sequential pipeline with per-item outcomes.
//!
//! # Invariants
//! - An identifier already stored in a category is never inserted again by
//!   this service.
//! - Bulk writes never roll back; earlier items stay persisted.
//! - Reconciliation always reads from the repository, never a local cache.

use crate::ident::{CanonicalIdentifier, NormalizationError, Normalizer};
use crate::model::category::Category;
use crate::model::record::{Record, RecordId};
use crate::parse::{parse_block_report, split_tokens, ParseError};
use crate::reconcile::{normalize_tokens, partition, Reconciliation};
use crate::repo::record_repo::{
    RecordField, RecordPatch, RecordRepository, RepoError, RepoResult, MEMBERSHIP_QUERY_LIMIT,
};
use crate::service::bulk::{BulkProgress, BulkReport, ItemOutcome, ItemReport};
use crate::service::interchange::{parse_json_import, ImportError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for record use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Operator identifier could not be normalized.
    Normalization(NormalizationError),
    /// Identifier already exists in its category.
    DuplicateIdentifier(CanonicalIdentifier),
    /// Target record does not exist.
    RecordNotFound(RecordId),
    /// JSON import batch was rejected before any write.
    InvalidImport(ImportError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normalization(err) => write!(f, "{err}"),
            Self::DuplicateIdentifier(identifier) => write!(
                f,
                "question number {identifier} already exists in {}",
                identifier.category
            ),
            Self::RecordNotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidImport(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent record state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Normalization(err) => Some(err),
            Self::InvalidImport(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::RecordNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<NormalizationError> for ServiceError {
    fn from(value: NormalizationError) -> Self {
        Self::Normalization(value)
    }
}

impl From<ImportError> for ServiceError {
    fn from(value: ImportError) -> Self {
        Self::InvalidImport(value)
    }
}

/// A bulk item ready to insert, or already rejected before the write.
type PreparedItem = Result<Record, ItemReport>;

/// Filter options for catalog listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordListQuery {
    /// Restrict to one category.
    pub category: Option<Category>,
    /// Case-insensitive substring match on identifier or content.
    pub search_term: Option<String>,
}

/// Outcome of importing a pasted text block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockImportReport {
    /// Non-blank lines that matched no record shape.
    pub rejected_lines: Vec<ParseError>,
    /// Per-record write outcomes.
    pub bulk: BulkReport,
}

/// Record service facade over repository implementations.
pub struct RecordService<R: RecordRepository> {
    repo: R,
    normalizer: Normalizer,
}

impl<R: RecordRepository> RecordService<R> {
    /// Creates a service with the default normalization policy.
    pub fn new(repo: R) -> Self {
        Self::with_normalizer(repo, Normalizer::default())
    }

    /// Creates a service with an explicit normalization policy.
    pub fn with_normalizer(repo: R, normalizer: Normalizer) -> Self {
        Self { repo, normalizer }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Adds one record from operator input.
    ///
    /// # Errors
    /// - `Normalization` when the identifier cannot be resolved.
    /// - `DuplicateIdentifier` when the category already holds it.
    /// - `Repo(Validation)` when content is blank.
    pub fn add_record(
        &self,
        raw_identifier: &str,
        category_hint: Option<Category>,
        content: &str,
    ) -> Result<Record, ServiceError> {
        let identifier = self.normalizer.normalize(raw_identifier, category_hint)?;
        if self.find_by_identifier(&identifier)?.is_some() {
            return Err(ServiceError::DuplicateIdentifier(identifier));
        }

        let record = Record::new(identifier.category, identifier.value, content.trim());
        let id = self.repo.insert(&record)?;
        info!(
            "event=record_add module=service status=ok category={} id={}",
            record.category, id
        );
        self.repo
            .get(id)?
            .ok_or(ServiceError::InconsistentState(
                "created record not found in read-back",
            ))
    }

    /// Adds one record per comma-separated identifier, all sharing `content`.
    ///
    /// Identifiers that fail normalization or already exist are reported in
    /// the outcome log; the remaining ones are still inserted.
    pub fn add_many(
        &self,
        raw_identifiers: &str,
        category_hint: Option<Category>,
        content: &str,
        progress: impl FnMut(BulkProgress),
    ) -> BulkReport {
        let mut prepared = Vec::new();
        for token in split_tokens(raw_identifiers) {
            match self.normalizer.normalize(&token, category_hint) {
                Ok(identifier) => prepared.push(Ok(Record::new(
                    identifier.category,
                    identifier.value,
                    content.trim(),
                ))),
                Err(err) => prepared.push(Err(ItemReport {
                    category: category_hint.unwrap_or(self.normalizer.config().default_category),
                    identifier: token,
                    outcome: ItemOutcome::Failed {
                        reason: err.to_string(),
                    },
                })),
            }
        }
        self.run_bulk(prepared, progress)
    }

    /// Inserts records one at a time, in order, logging each outcome.
    pub fn insert_all(
        &self,
        records: Vec<Record>,
        progress: impl FnMut(BulkProgress),
    ) -> BulkReport {
        self.run_bulk(records.into_iter().map(Ok).collect(), progress)
    }

    /// Parses a pasted text block and inserts every recognized line.
    pub fn import_block(
        &self,
        text: &str,
        progress: impl FnMut(BulkProgress),
    ) -> BlockImportReport {
        let parsed = parse_block_report(text);
        if !parsed.rejected.is_empty() {
            warn!(
                "event=block_import module=service status=partial rejected_lines={}",
                parsed.rejected.len()
            );
        }
        BlockImportReport {
            rejected_lines: parsed.rejected,
            bulk: self.insert_all(parsed.records, progress),
        }
    }

    /// Validates a JSON batch as a whole, then inserts it sequentially.
    ///
    /// # Errors
    /// - `InvalidImport` when any entry is invalid; nothing is written.
    pub fn import_json(
        &self,
        json: &str,
        progress: impl FnMut(BulkProgress),
    ) -> Result<BulkReport, ServiceError> {
        let records = parse_json_import(json)?;
        Ok(self.insert_all(records, progress))
    }

    /// Gets one record by id.
    pub fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>> {
        self.repo.get(id)
    }

    /// Lists records sorted by identifier number.
    pub fn list_records(&self, query: &RecordListQuery) -> Result<Vec<Record>, ServiceError> {
        let mut records = match query.category {
            Some(category) => self
                .repo
                .query_by_equality(RecordField::Category, category.tag())?,
            None => self.repo.list_all()?,
        };

        if let Some(term) = query
            .search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
        {
            let term = term.to_lowercase();
            records.retain(|record| {
                record.content.to_lowercase().contains(&term)
                    || record.identifier.to_lowercase().contains(&term)
            });
        }

        records.sort_by_key(|record| record.identifier_number().unwrap_or(u64::MAX));
        Ok(records)
    }

    /// Reconciles operator identifier tokens for one category against the store.
    ///
    /// Lookups go through membership queries chunked to the store's limit.
    /// A token already canonical for another category is matched in that
    /// category, the same way [`crate::reconcile::reconcile`] does.
    pub fn reconcile_tokens<S: AsRef<str>>(
        &self,
        raw_tokens: &[S],
        category: Category,
    ) -> Result<Reconciliation, ServiceError> {
        let started_at = Instant::now();
        let identifiers = normalize_tokens(&self.normalizer, raw_tokens, category);

        let mut existing = Vec::new();
        for chunk in identifiers.chunks(MEMBERSHIP_QUERY_LIMIT) {
            let values = chunk
                .iter()
                .map(|identifier| identifier.value.clone())
                .collect::<Vec<_>>();
            existing.extend(
                self.repo
                    .query_by_membership(RecordField::Identifier, &values)?
                    .into_iter()
                    .filter(|record| {
                        chunk
                            .iter()
                            .any(|identifier| identifier.category == record.category)
                    }),
            );
        }

        let result = partition(&identifiers, &existing);
        info!(
            "event=reconcile module=service status=ok category={} found={} missing={} duration_ms={}",
            category,
            result.found.len(),
            result.missing.len(),
            started_at.elapsed().as_millis()
        );
        Ok(result)
    }

    /// Reconciles a comma-separated identifier list.
    pub fn search_identifiers(
        &self,
        input: &str,
        category: Category,
    ) -> Result<Reconciliation, ServiceError> {
        self.reconcile_tokens(&split_tokens(input), category)
    }

    /// Edits identifier and/or content of a stored record.
    ///
    /// A new identifier is normalized within the record's own category.
    ///
    /// # Errors
    /// - `RecordNotFound` when the record is gone.
    /// - `DuplicateIdentifier` when another record already uses the new
    ///   identifier.
    /// - `Repo(Conflict)` when `expected_version` is stale.
    pub fn edit_record(
        &self,
        id: RecordId,
        raw_identifier: Option<&str>,
        content: Option<&str>,
        expected_version: i64,
    ) -> Result<Record, ServiceError> {
        let current = self
            .repo
            .get(id)?
            .ok_or(ServiceError::RecordNotFound(id))?;

        let mut patch = RecordPatch {
            identifier: None,
            content: content.map(|value| value.trim().to_string()),
        };

        if let Some(raw) = raw_identifier {
            let identifier = self.normalizer.normalize(raw, Some(current.category))?;
            if identifier.value != current.identifier {
                let taken = self
                    .find_by_identifier(&identifier)?
                    .is_some_and(|other| other.id != current.id);
                if taken {
                    return Err(ServiceError::DuplicateIdentifier(identifier));
                }
                patch.identifier = Some(identifier.value);
            }
        }

        if patch.is_empty() {
            return Ok(current);
        }

        let updated = self.repo.update(id, &patch, expected_version)?;
        info!(
            "event=record_edit module=service status=ok id={} version={}",
            id, updated.version
        );
        Ok(updated)
    }

    /// Deletes one record by id.
    pub fn delete_record(&self, id: RecordId) -> Result<(), ServiceError> {
        self.repo.delete(id)?;
        info!("event=record_delete module=service status=ok id={id}");
        Ok(())
    }

    fn find_by_identifier(
        &self,
        identifier: &CanonicalIdentifier,
    ) -> Result<Option<Record>, ServiceError> {
        Ok(self
            .repo
            .query_by_equality(RecordField::Identifier, &identifier.value)?
            .into_iter()
            .find(|record| record.category == identifier.category))
    }

    fn run_bulk(
        &self,
        items: Vec<PreparedItem>,
        mut progress: impl FnMut(BulkProgress),
    ) -> BulkReport {
        let started_at = Instant::now();
        let total = items.len();
        let mut report = BulkReport::default();

        for (index, item) in items.into_iter().enumerate() {
            let item_report = match item {
                Ok(record) => self.insert_one(record),
                Err(rejected) => rejected,
            };
            if let ItemOutcome::Failed { reason } = &item_report.outcome {
                warn!(
                    "event=bulk_item module=service status=error index={index} reason={reason}"
                );
            }
            report.items.push(item_report);
            progress(BulkProgress {
                completed: index + 1,
                total,
            });
        }

        info!(
            "event=bulk_write module=service status=ok total={} inserted={} skipped={} failed={} duration_ms={}",
            total,
            report.inserted_count(),
            report.skipped_count(),
            report.failed_count(),
            started_at.elapsed().as_millis()
        );
        report
    }

    fn insert_one(&self, record: Record) -> ItemReport {
        let identifier = CanonicalIdentifier {
            category: record.category,
            value: record.identifier.clone(),
        };
        let outcome = match self.find_by_identifier(&identifier) {
            Ok(Some(_)) => ItemOutcome::SkippedDuplicate,
            Ok(None) => match self.repo.insert(&record) {
                Ok(id) => {
                    let mut stored = record;
                    stored.id = Some(id);
                    stored.version = 1;
                    ItemOutcome::Inserted { record: stored }
                }
                Err(err) => ItemOutcome::Failed {
                    reason: err.to_string(),
                },
            },
            Err(err) => ItemOutcome::Failed {
                reason: err.to_string(),
            },
        };

        ItemReport {
            category: identifier.category,
            identifier: identifier.value,
            outcome,
        }
    }
}
