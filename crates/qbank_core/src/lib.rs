//! Core domain logic for the question bank.
//! Identifier rules, record storage and the search/add workflow live here;
//! front-ends only call into this crate.

pub mod db;
pub mod export;
pub mod ident;
pub mod logging;
pub mod model;
pub mod parse;
pub mod reconcile;
pub mod repo;
pub mod service;
pub mod session;

pub use db::{open_db, open_db_in_memory, DbError};
pub use export::{to_csv, write_view, CsvOptions, ExportError, ExportView};
pub use ident::{normalize, CanonicalIdentifier, NormalizationError, Normalizer, NormalizerConfig};
pub use logging::{init_logging, LogLevel, LoggingConfig, LoggingError};
pub use model::category::{Category, UnknownCategory};
pub use model::record::{Record, RecordId, RecordValidationError};
pub use parse::{parse_block, split_tokens, ParseError};
pub use reconcile::{reconcile, Reconciliation};
pub use repo::record_repo::{
    RecordField, RecordPatch, RecordRepository, RepoError, RepoResult, SqliteRecordRepository,
};
pub use service::bulk::{BulkProgress, BulkReport, ItemOutcome};
pub use service::record_service::{
    BlockImportReport, RecordListQuery, RecordService, ServiceError,
};
pub use session::{OperatorSession, SessionError, SessionState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
