//! Cloneable async handle owning the store connection.

use super::{StoreError, StoreResult};
use crate::config::{StoreConfig, StoreLocation, DEFAULT_BUSY_TIMEOUT};
use crate::db::{ensure_schema_ready, open_db};
use crate::model::{Collection, IndexName, IndexValue, RecordId};
use crate::repo::{self, CascadeReport, Record, RepoResult};
use log::{debug, error, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::fmt::{Debug, Formatter};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Shared handle to the ticket database.
///
/// Clones share one connection. Operations are serialized on it and each
/// runs on the blocking pool inside its own transaction: `IMMEDIATE` for
/// writes, `DEFERRED` for reads.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
    location: Arc<StoreLocation>,
}

impl Debug for Store {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Opens (creating and migrating if needed) the configured database.
    ///
    /// # Errors
    /// - `StoreUnavailable` when the engine cannot be opened or migrated.
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        let location = config.location.clone();
        let conn = tokio::task::spawn_blocking(move || open_db(&config))
            .await
            .map_err(|err| StoreError::Worker(format!("open: {err}")))??;
        Ok(Self::wrap(conn, location))
    }

    /// Opens a private in-memory database.
    pub async fn open_in_memory() -> StoreResult<Self> {
        Self::open(StoreConfig::memory()).await
    }

    /// Wraps a connection that was migrated elsewhere.
    ///
    /// Applies the same pragmas as [`open_db`]: foreign keys on and the
    /// default busy timeout.
    ///
    /// # Errors
    /// - `StoreUnavailable` when the schema is missing or at another version.
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        ensure_schema_ready(&conn)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .and_then(|()| conn.busy_timeout(DEFAULT_BUSY_TIMEOUT))
            .map_err(|err| StoreError::StoreUnavailable(err.into()))?;
        let location = match conn.path().map(PathBuf::from) {
            Some(path) if !path.as_os_str().is_empty() => StoreLocation::File(path),
            _ => StoreLocation::Memory,
        };
        Ok(Self::wrap(conn, location))
    }

    fn wrap(conn: Connection, location: StoreLocation) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            location: Arc::new(location),
        }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Whether both handles share the same underlying connection.
    pub fn same_handle(&self, other: &Store) -> bool {
        Arc::ptr_eq(&self.conn, &other.conn)
    }

    /// Inserts a draft and returns the store-assigned id.
    pub async fn add<R: Record>(&self, draft: R::Draft) -> StoreResult<RecordId> {
        self.write("add", R::COLLECTION, move |tx| repo::insert_record::<R>(tx, &draft))
            .await
    }

    /// Loads one record; a missing id is `Ok(None)`.
    pub async fn get<R: Record>(&self, id: RecordId) -> StoreResult<Option<R>> {
        self.read("get", R::COLLECTION, move |tx| repo::get_record::<R>(tx, id))
            .await
    }

    /// Loads every record of the collection, ordered by id.
    pub async fn get_all<R: Record>(&self) -> StoreResult<Vec<R>> {
        self.read("get_all", R::COLLECTION, |tx| repo::list_records::<R>(tx))
            .await
    }

    /// Loads records whose indexed field equals `value`, ordered by id.
    pub async fn get_by_index<R: Record>(
        &self,
        index: IndexName,
        value: impl Into<IndexValue>,
    ) -> StoreResult<Vec<R>> {
        let value = value.into();
        self.read("get_by_index", R::COLLECTION, move |tx| {
            repo::list_records_by_index::<R>(tx, index, &value)
        })
        .await
    }

    /// Replaces an existing record and returns it with a fresh `last_modified`.
    pub async fn update<R: Record>(&self, record: R) -> StoreResult<R> {
        self.write("update", R::COLLECTION, move |tx| repo::update_record(tx, &record))
            .await
    }

    /// Read-modify-write of one record inside a single transaction.
    pub async fn modify<R, F>(&self, id: RecordId, change: F) -> StoreResult<R>
    where
        R: Record,
        F: FnOnce(&mut R) + Send + 'static,
    {
        self.write("modify", R::COLLECTION, move |tx| {
            repo::modify_record::<R>(tx, id, change)
        })
        .await
    }

    /// Deletes a record and, for parents, every descendant.
    ///
    /// Idempotent: an absent id yields an empty report.
    pub async fn delete<R: Record>(&self, id: RecordId) -> StoreResult<CascadeReport> {
        self.write("delete", R::COLLECTION, move |tx| R::remove(tx, id))
            .await
    }

    /// Runs a read-only repository query in one deferred transaction.
    pub(crate) async fn query<T, F>(
        &self,
        operation: &'static str,
        collection: Collection,
        work: F,
    ) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Transaction<'_>) -> RepoResult<T> + Send + 'static,
    {
        self.read(operation, collection, work).await
    }

    async fn read<T, F>(
        &self,
        operation: &'static str,
        collection: Collection,
        work: F,
    ) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Transaction<'_>) -> RepoResult<T> + Send + 'static,
    {
        self.run(operation, collection, TransactionBehavior::Deferred, work)
            .await
    }

    async fn write<T, F>(
        &self,
        operation: &'static str,
        collection: Collection,
        work: F,
    ) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Transaction<'_>) -> RepoResult<T> + Send + 'static,
    {
        self.run(operation, collection, TransactionBehavior::Immediate, work)
            .await
    }

    async fn run<T, F>(
        &self,
        operation: &'static str,
        collection: Collection,
        behavior: TransactionBehavior,
        work: F,
    ) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Transaction<'_>) -> RepoResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let started_at = Instant::now();
        let outcome = tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().unwrap_or_else(PoisonError::into_inner);
            run_in_transaction(&mut guard, operation, behavior, work)
        })
        .await
        .unwrap_or_else(|err| Err(StoreError::Worker(format!("{operation}: {err}"))));

        let duration_ms = started_at.elapsed().as_millis();
        match &outcome {
            Ok(_) => debug!(
                "event=store_op module=store status=ok op={operation} collection={collection} duration_ms={duration_ms}"
            ),
            Err(err @ (StoreError::NotFound { .. } | StoreError::ConstraintViolation(_))) => warn!(
                "event=store_op module=store status=rejected op={operation} collection={collection} duration_ms={duration_ms} error_code={} error={err}",
                err.code()
            ),
            Err(err) => error!(
                "event=store_op module=store status=error op={operation} collection={collection} duration_ms={duration_ms} error_code={} error={err}",
                err.code()
            ),
        }
        outcome
    }
}

fn run_in_transaction<T, F>(
    conn: &mut Connection,
    operation: &'static str,
    behavior: TransactionBehavior,
    work: F,
) -> StoreResult<T>
where
    F: FnOnce(&Transaction<'_>) -> RepoResult<T>,
{
    let tx = conn
        .transaction_with_behavior(behavior)
        .map_err(|err| StoreError::TransactionAborted {
            operation,
            source: err.into(),
        })?;
    // Dropping `tx` on the error path rolls back everything `work` did.
    let value = work(&tx).map_err(|err| StoreError::from_repo(operation, err))?;
    tx.commit().map_err(|err| StoreError::TransactionAborted {
        operation,
        source: err.into(),
    })?;
    Ok(value)
}
