//! Generic record store primitives over the three collections.
//!
//! # Responsibility
//! - Provide add/get/get-all/get-by-index/update/delete for any `Record`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate drafts and records before any SQL mutation.
//! - Inserts require a live parent row; updates never move a record to
//!   another parent.
//! - `last_modified` is never moved backwards by an update.
//! - Reads reject invalid persisted state instead of masking it.
//! - Functions here never open transactions; callers pass the connection
//!   or transaction they run in.

use crate::db::DbError;
use crate::model::{
    now_epoch_ms, Collection, EpochMillis, IndexName, IndexValue, RecordId,
    RecordValidationError,
};
use crate::repo::cascade::CascadeReport;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    /// Referenced parent row does not exist.
    MissingParent {
        collection: Collection,
        id: RecordId,
    },
    /// Update tried to re-parent a record.
    ParentChanged {
        collection: Collection,
        id: RecordId,
        stored_parent: RecordId,
        requested_parent: RecordId,
    },
    UnsupportedIndex {
        collection: Collection,
        index: IndexName,
    },
    IndexValueMismatch {
        index: IndexName,
        value: IndexValue,
    },
    NotFound {
        collection: Collection,
        id: RecordId,
    },
    InvalidData(String),
    Db(DbError),
}

impl RepoError {
    /// Whether the error rejects caller input rather than reporting a
    /// storage failure.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::MissingParent { .. }
                | Self::ParentChanged { .. }
                | Self::UnsupportedIndex { .. }
                | Self::IndexValueMismatch { .. }
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::MissingParent { collection, id } => {
                write!(f, "parent record not found: {collection}/{id}")
            }
            Self::ParentChanged {
                collection,
                id,
                stored_parent,
                requested_parent,
            } => write!(
                f,
                "{collection}/{id} belongs to parent {stored_parent}; cannot move it to {requested_parent}"
            ),
            Self::UnsupportedIndex { collection, index } => {
                write!(f, "collection {collection} has no index `{index}`")
            }
            Self::IndexValueMismatch { index, value } => {
                write!(f, "value {value} does not fit index `{index}`")
            }
            Self::NotFound { collection, id } => write!(f, "record not found: {collection}/{id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
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

/// A row type stored in one collection.
///
/// Implemented by `Project`, `Feature` and `Task`; the generic functions in
/// this module and the async `Store` are written against it.
pub trait Record: Sized + Send + 'static {
    /// Caller-supplied fields for inserts.
    type Draft: Send + 'static;

    const COLLECTION: Collection;
    /// `SELECT <columns> FROM <table>` without filter or ordering.
    const SELECT_SQL: &'static str;

    fn id(&self) -> RecordId;
    fn last_modified(&self) -> EpochMillis;
    /// Parent key, `None` for root records.
    fn parent_id(&self) -> Option<RecordId>;
    fn draft_parent_id(draft: &Self::Draft) -> Option<RecordId>;

    fn validate_record(&self) -> Result<(), RecordValidationError>;
    fn validate_draft(draft: &Self::Draft) -> Result<(), RecordValidationError>;

    /// Inserts the draft stamped with `now` and returns the new id.
    fn insert_row(conn: &Connection, draft: &Self::Draft, now: EpochMillis)
        -> RepoResult<RecordId>;
    /// Writes caller-editable fields and `last_modified`. Returns changed rows.
    fn update_row(conn: &Connection, record: &Self, now: EpochMillis) -> RepoResult<usize>;
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;

    /// Deletes the record and every descendant it owns.
    fn remove(conn: &Connection, id: RecordId) -> RepoResult<CascadeReport>;
}

/// Validates `draft`, checks its parent and inserts it.
pub fn insert_record<R: Record>(conn: &Connection, draft: &R::Draft) -> RepoResult<RecordId> {
    R::validate_draft(draft)?;
    if let (Some(parent), Some(parent_id)) = (R::COLLECTION.parent(), R::draft_parent_id(draft)) {
        if !record_exists(conn, parent, parent_id)? {
            return Err(RepoError::MissingParent {
                collection: parent,
                id: parent_id,
            });
        }
    }
    R::insert_row(conn, draft, now_epoch_ms())
}

/// Loads one record. Absence is `Ok(None)`.
pub fn get_record<R: Record>(conn: &Connection, id: RecordId) -> RepoResult<Option<R>> {
    let mut stmt = conn.prepare(&format!("{} WHERE id = ?1;", R::SELECT_SQL))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(R::from_row(row)?));
    }
    Ok(None)
}

/// Lists every record of the collection ordered by id.
pub fn list_records<R: Record>(conn: &Connection) -> RepoResult<Vec<R>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC;", R::SELECT_SQL))?;
    let mut rows = stmt.query([])?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(R::from_row(row)?);
    }
    Ok(records)
}

/// Lists records whose indexed field equals `value`, ordered by id.
pub fn list_records_by_index<R: Record>(
    conn: &Connection,
    index: IndexName,
    value: &IndexValue,
) -> RepoResult<Vec<R>> {
    check_index(R::COLLECTION, index, value)?;
    let mut stmt = conn.prepare(&format!(
        "{} WHERE {} = ?1 ORDER BY id ASC;",
        R::SELECT_SQL,
        index.column()
    ))?;
    let mut rows = stmt.query([value.to_sql_value()])?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(R::from_row(row)?);
    }
    Ok(records)
}

/// Ids of rows whose indexed field equals `value`, ordered by id.
pub fn list_ids_by_index(
    conn: &Connection,
    collection: Collection,
    index: IndexName,
    value: &IndexValue,
) -> RepoResult<Vec<RecordId>> {
    check_index(collection, index, value)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT id FROM {} WHERE {} = ?1 ORDER BY id ASC;",
        collection.table_name(),
        index.column()
    ))?;
    let mut rows = stmt.query([value.to_sql_value()])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        ids.push(row.get(0)?);
    }
    Ok(ids)
}

/// Replaces caller-editable fields of an existing record.
///
/// Returns the stored record as read back after the write.
pub fn update_record<R: Record>(conn: &Connection, record: &R) -> RepoResult<R> {
    record.validate_record()?;
    let id = record.id();
    let current: R = get_record(conn, id)?.ok_or(RepoError::NotFound {
        collection: R::COLLECTION,
        id,
    })?;

    if let (Some(stored_parent), Some(requested_parent)) = (current.parent_id(), record.parent_id())
    {
        if stored_parent != requested_parent {
            return Err(RepoError::ParentChanged {
                collection: R::COLLECTION,
                id,
                stored_parent,
                requested_parent,
            });
        }
    }

    let now = now_epoch_ms().max(current.last_modified());
    if R::update_row(conn, record, now)? == 0 {
        return Err(RepoError::NotFound {
            collection: R::COLLECTION,
            id,
        });
    }

    get_record(conn, id)?.ok_or(RepoError::NotFound {
        collection: R::COLLECTION,
        id,
    })
}

/// Loads a record, applies `change` and writes it back.
pub fn modify_record<R: Record>(
    conn: &Connection,
    id: RecordId,
    change: impl FnOnce(&mut R),
) -> RepoResult<R> {
    let mut record: R = get_record(conn, id)?.ok_or(RepoError::NotFound {
        collection: R::COLLECTION,
        id,
    })?;
    change(&mut record);
    update_record(conn, &record)
}

/// Deletes one row by id. Returns whether a row was removed.
pub fn delete_row(conn: &Connection, collection: Collection, id: RecordId) -> RepoResult<bool> {
    let changed = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1;", collection.table_name()),
        params![id],
    )?;
    Ok(changed > 0)
}

/// Whether a row with `id` exists in `collection`.
pub fn record_exists(conn: &Connection, collection: Collection, id: RecordId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);",
            collection.table_name()
        ),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn check_index(collection: Collection, index: IndexName, value: &IndexValue) -> RepoResult<()> {
    if !collection.supports(index) {
        return Err(RepoError::UnsupportedIndex { collection, index });
    }
    if !index.accepts(value) {
        return Err(RepoError::IndexValueMismatch {
            index,
            value: value.clone(),
        });
    }
    Ok(())
}
