//! Key-value repository contracts with SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Store and retrieve whole text records by key.
//!
//! # Invariants
//! - `put` replaces any previous value for the key.
//! - `get` returns `None` for keys never written (or removed).

use crate::db::migrations::{has_table, KV_RECORDS_TABLE};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage error for key-value records.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Storage refused the operation (disabled, quota exceeded).
    Unavailable(String),
    /// The required table is missing from the opened database.
    SchemaMissing(&'static str),
    InvalidData { key: String, message: String },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::SchemaMissing(table) => write!(f, "required table `{table}` is missing"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid stored record `{key}`: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
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

/// Repository interface for whole-record key-value storage.
pub trait KvRepository {
    fn put(&self, key: &str, value: &str) -> RepoResult<()>;
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    fn remove(&self, key: &str) -> RepoResult<()>;
}

/// SQLite-backed key-value repository over the `kv_records` table.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `RepoError::SchemaMissing` when `kv_records` does not exist, i.e.
    ///   the connection was not opened through `open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !has_table(conn, KV_RECORDS_TABLE)? {
            return Err(RepoError::SchemaMissing(KV_RECORDS_TABLE));
        }
        Ok(Self { conn })
    }
}

impl KvRepository for SqliteKvRepository<'_> {
    fn put(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_records (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_records WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM kv_records WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// In-memory key-value repository.
///
/// Clones share the same records, so a caller can keep a handle after
/// moving one into a gateway. `set_unavailable(true)` makes every
/// operation fail like disabled or full browser-style storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvRepository {
    records: Rc<RefCell<BTreeMap<String, String>>>,
    unavailable: Rc<Cell<bool>>,
}

impl MemoryKvRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    fn check_available(&self) -> RepoResult<()> {
        if self.unavailable.get() {
            return Err(RepoError::Unavailable("storage quota exceeded".to_string()));
        }
        Ok(())
    }
}

impl KvRepository for MemoryKvRepository {
    fn put(&self, key: &str, value: &str) -> RepoResult<()> {
        self.check_available()?;
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        self.check_available()?;
        Ok(self.records.borrow().get(key).cloned())
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        self.check_available()?;
        self.records.borrow_mut().remove(key);
        Ok(())
    }
}
