/*!
 * Database connection management and the transaction executor.
 *
 * A `Database` is a cheap-to-clone handle around one SQLite connection.
 * Every unit of work runs in its own transaction: committed when the
 * closure returns `Ok`, rolled back when it returns `Err`. Async callers
 * go through `spawn_blocking` so the runtime never blocks on SQLite.
 */

use log::{debug, info, warn};
use parking_lot::Mutex;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::schema;
use crate::errors::{DictionaryError, DictionaryResult, StoreContext};

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "slowko.db";

/// Default database directory name under user's data directory
const DEFAULT_DB_DIRNAME: &str = "slowko";

/// How long a writer waits for another connection's lock
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the dictionary store
#[derive(Clone)]
pub struct Database {
    /// Path to the database file
    db_path: PathBuf,
    /// Connection shared by every clone of this handle
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the database at the default location
    pub fn open_default() -> DictionaryResult<Self> {
        let db_path = Self::default_database_path()?;
        Self::open(&db_path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open (or create) the database file at the specified path
    pub fn open<P: AsRef<Path>>(db_path: P, busy_timeout: Duration) -> DictionaryResult<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Opening database at: {:?}", db_path);

        let conn = Connection::open(&db_path).step("open database")?;
        conn.busy_timeout(busy_timeout).step("set busy timeout")?;
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .step("enable WAL")?;
        debug!("Journal mode: {}", mode);

        Self::from_connection(conn, db_path)
    }

    /// Create an in-memory database (for testing)
    pub fn open_in_memory() -> DictionaryResult<Self> {
        debug!("Creating in-memory database");

        let conn = Connection::open_in_memory().step("open in-memory database")?;
        Self::from_connection(conn, PathBuf::from(":memory:"))
    }

    fn from_connection(conn: Connection, db_path: PathBuf) -> DictionaryResult<Self> {
        // Cascades from translations to examples depend on this.
        conn.pragma_update(None, "foreign_keys", "ON")
            .step("enable foreign keys")?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the default database path
    pub fn default_database_path() -> DictionaryResult<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| {
                DictionaryError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not determine data directory",
                ))
            })?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Execute an operation against the bare connection
    pub fn execute<F, T>(&self, f: F) -> DictionaryResult<T>
    where
        F: FnOnce(&Connection) -> DictionaryResult<T>,
    {
        let conn = self.connection.lock();
        f(&conn)
    }

    /// Run a unit of work atomically.
    ///
    /// The transaction is IMMEDIATE, so the write lock is held from the
    /// first statement and read-then-write decisions inside `f` cannot be
    /// invalidated by another connection to the same file. Any error from
    /// `f` rolls back every statement the unit executed and is returned
    /// unchanged.
    pub fn transaction<F, T>(&self, f: F) -> DictionaryResult<T>
    where
        F: FnOnce(&Transaction) -> DictionaryResult<T>,
    {
        let mut conn = self.connection.lock();

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .step("begin transaction")?;

        match f(&tx) {
            Ok(value) => {
                tx.commit().step("commit")?;
                Ok(value)
            }
            Err(err) => {
                debug!("Rolling back transaction: {}", err);
                if let Err(rollback_err) = tx.rollback() {
                    warn!("Rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }

    /// Run a read-only closure against one consistent snapshot
    pub fn snapshot<F, T>(&self, f: F) -> DictionaryResult<T>
    where
        F: FnOnce(&Transaction) -> DictionaryResult<T>,
    {
        let mut conn = self.connection.lock();

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .step("begin read")?;
        let value = f(&tx)?;
        tx.finish().step("end read")?;

        Ok(value)
    }

    /// Execute a database operation on tokio's blocking pool
    pub async fn execute_async<F, T>(&self, f: F) -> DictionaryResult<T>
    where
        F: FnOnce(&Connection) -> DictionaryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();

        tokio::task::spawn_blocking(move || db.execute(f))
            .await
            .map_err(|e| DictionaryError::Task(e.to_string()))?
    }

    /// Run a unit of work on tokio's blocking pool.
    ///
    /// Dropping the returned future does not interrupt the unit: once
    /// started it runs to commit or rollback.
    pub async fn transaction_async<F, T>(&self, f: F) -> DictionaryResult<T>
    where
        F: FnOnce(&Transaction) -> DictionaryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();

        tokio::task::spawn_blocking(move || db.transaction(f))
            .await
            .map_err(|e| DictionaryError::Task(e.to_string()))?
    }

    /// Get database statistics
    pub fn stats(&self) -> DictionaryResult<DatabaseStats> {
        self.snapshot(|tx| {
            let count = |table: &str| -> DictionaryResult<i64> {
                tx.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })
                .step("count rows")
            };

            let file_size_bytes = if self.db_path.to_string_lossy() != ":memory:" {
                std::fs::metadata(&self.db_path)
                    .map(|m| m.len())
                    .unwrap_or(0)
            } else {
                0
            };

            Ok(DatabaseStats {
                word_count: count("words")?,
                translation_count: count("translations")?,
                example_count: count("examples")?,
                file_size_bytes,
            })
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Number of Polish words
    pub word_count: i64,
    /// Number of translations
    pub translation_count: i64,
    /// Number of example sentences
    pub example_count: i64,
    /// Database file size in bytes
    pub file_size_bytes: u64,
}

impl std::fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Words: {}, Translations: {}, Examples: {}, Size: {} KB",
            self.word_count,
            self.translation_count,
            self.example_count,
            self.file_size_bytes / 1024
        )
    }
}
