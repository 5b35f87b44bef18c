//! Record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/list/query/update/delete over the `records` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Record::validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Updates succeed only against the caller's last-seen `version`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::category::Category;
use crate::model::record::{Record, RecordId, RecordValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Largest value list accepted by [`RecordRepository::query_by_membership`].
pub const MEMBERSHIP_QUERY_LIMIT: usize = 30;

const RECORD_SELECT_SQL: &str = "SELECT
    id,
    category,
    identifier,
    content,
    version
FROM records";

const REQUIRED_RECORD_COLUMNS: &[&str] = &["id", "category", "identifier", "content", "version"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    NotFound(RecordId),
    /// Stored version differs from the version the caller last saw.
    Conflict {
        id: RecordId,
        expected_version: i64,
        actual_version: i64,
    },
    MembershipLimitExceeded {
        requested: usize,
        limit: usize,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Conflict {
                id,
                expected_version,
                actual_version,
            } => write!(
                f,
                "record {id} was modified concurrently (expected version {expected_version}, found {actual_version})"
            ),
            Self::MembershipLimitExceeded { requested, limit } => write!(
                f,
                "membership query with {requested} values exceeds the limit of {limit}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Queryable record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Category,
    Identifier,
    Content,
}

impl RecordField {
    fn column(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Identifier => "identifier",
            Self::Content => "content",
        }
    }
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub identifier: Option<String>,
    pub content: Option<String>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.identifier.is_none() && self.content.is_none()
    }

    fn apply_to(&self, record: &mut Record) {
        if let Some(identifier) = &self.identifier {
            record.identifier = identifier.clone();
        }
        if let Some(content) = &self.content {
            record.content = content.clone();
        }
    }
}

/// Record store contract.
pub trait RecordRepository {
    /// Persists a new record and returns its assigned id.
    fn insert(&self, record: &Record) -> RepoResult<RecordId>;
    /// Loads one record by id.
    fn get(&self, id: RecordId) -> RepoResult<Option<Record>>;
    /// Loads every record in insertion order.
    fn list_all(&self) -> RepoResult<Vec<Record>>;
    /// Loads records whose `field` equals `value`.
    fn query_by_equality(&self, field: RecordField, value: &str) -> RepoResult<Vec<Record>>;
    /// Loads records whose `field` is one of `values`.
    ///
    /// Lists longer than [`MEMBERSHIP_QUERY_LIMIT`] are rejected; callers
    /// chunk.
    fn query_by_membership(&self, field: RecordField, values: &[String])
        -> RepoResult<Vec<Record>>;
    /// Applies `patch` if the stored version equals `expected_version`.
    fn update(
        &self,
        id: RecordId,
        patch: &RecordPatch,
        expected_version: i64,
    ) -> RepoResult<Record>;
    /// Removes one record permanently.
    fn delete(&self, id: RecordId) -> RepoResult<()>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn insert(&self, record: &Record) -> RepoResult<RecordId> {
        record.validate()?;
        let id = Uuid::new_v4();

        self.conn.execute(
            "INSERT INTO records (
                id,
                category,
                identifier,
                content,
                version
            ) VALUES (?1, ?2, ?3, ?4, 1);",
            params![
                id.to_string(),
                record.category.tag(),
                record.identifier.trim(),
                record.content.as_str(),
            ],
        )?;

        Ok(id)
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }
        Ok(None)
    }

    fn list_all(&self) -> RepoResult<Vec<Record>> {
        self.select_where("1 = 1", Vec::new())
    }

    fn query_by_equality(&self, field: RecordField, value: &str) -> RepoResult<Vec<Record>> {
        self.select_where(
            &format!("{} = ?", field.column()),
            vec![Value::Text(value.to_string())],
        )
    }

    fn query_by_membership(
        &self,
        field: RecordField,
        values: &[String],
    ) -> RepoResult<Vec<Record>> {
        if values.len() > MEMBERSHIP_QUERY_LIMIT {
            return Err(RepoError::MembershipLimitExceeded {
                requested: values.len(),
                limit: MEMBERSHIP_QUERY_LIMIT,
            });
        }
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; values.len()].join(", ");
        let bind_values = values
            .iter()
            .map(|value| Value::Text(value.clone()))
            .collect();
        self.select_where(
            &format!("{} IN ({placeholders})", field.column()),
            bind_values,
        )
    }

    fn update(
        &self,
        id: RecordId,
        patch: &RecordPatch,
        expected_version: i64,
    ) -> RepoResult<Record> {
        let mut record = self.get(id)?.ok_or(RepoError::NotFound(id))?;
        if record.version != expected_version {
            return Err(RepoError::Conflict {
                id,
                expected_version,
                actual_version: record.version,
            });
        }

        patch.apply_to(&mut record);
        record.identifier = record.identifier.trim().to_string();
        record.validate()?;

        let changed = self.conn.execute(
            "UPDATE records
             SET
                identifier = ?1,
                content = ?2,
                version = version + 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3
               AND version = ?4;",
            params![
                record.identifier.as_str(),
                record.content.as_str(),
                id.to_string(),
                expected_version,
            ],
        )?;

        if changed == 0 {
            let actual_version = self
                .get(id)?
                .map(|current| current.version)
                .ok_or(RepoError::NotFound(id))?;
            return Err(RepoError::Conflict {
                id,
                expected_version,
                actual_version,
            });
        }

        record.version = expected_version + 1;
        Ok(record)
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM records WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

impl SqliteRecordRepository<'_> {
    fn select_where(&self, predicate: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Record>> {
        let sql = format!("{RECORD_SELECT_SQL} WHERE {predicate} ORDER BY created_at ASC, rowid ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in records.id"))
    })?;

    let category_text: String = row.get("category")?;
    let category = Category::from_tag(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in records.category"
        ))
    })?;

    let record = Record {
        id: Some(id),
        category,
        identifier: row.get("identifier")?,
        content: row.get("content")?,
        version: row.get("version")?,
    };
    record.validate()?;
    Ok(record)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "records")? {
        return Err(RepoError::MissingRequiredTable("records"));
    }

    for &column in REQUIRED_RECORD_COLUMNS {
        if !table_has_column(conn, "records", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "records",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
