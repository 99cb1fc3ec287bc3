/*!
 * Error types for the slowko dictionary core.
 *
 * Every service operation fails with a `DictionaryError`, so callers can
 * branch on the kind of failure rather than on message text.
 */

use thiserror::Error;

/// Errors that can occur while working with the dictionary store
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// Input rejected before the store was touched
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The referenced row does not exist
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Kind of row that was looked up
        resource: &'static str,
        /// Identifier that was looked up
        id: i64,
    },

    /// A translation with the same word and English text already exists
    #[error("Translation '{english}' already exists for word '{word}'")]
    DuplicateTranslation {
        /// Polish word text
        word: String,
        /// English text
        english: String,
    },

    /// Any other store failure, tagged with the step that failed
    #[error("Database error during {step}: {source}")]
    Store {
        /// Name of the failing step
        step: &'static str,
        /// Underlying SQLite error
        #[source]
        source: rusqlite::Error,
    },

    /// The on-disk schema cannot be used by this version
    #[error("Schema error: {0}")]
    Schema(String),

    /// Failure preparing the database location
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking database task could not be completed
    #[error("Database task failed: {0}")]
    Task(String),
}

/// Result alias used throughout the crate
pub type DictionaryResult<T> = Result<T, DictionaryError>;

impl DictionaryError {
    /// True when the error is `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when the error is `DuplicateTranslation`
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateTranslation { .. })
    }

    /// True when the error is `Validation`
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<rusqlite::Error> for DictionaryError {
    fn from(source: rusqlite::Error) -> Self {
        Self::Store {
            step: "query",
            source,
        }
    }
}

/// Attach the name of the failing step to a rusqlite result
pub trait StoreContext<T> {
    /// Wrap an error as `DictionaryError::Store` for the given step
    fn step(self, step: &'static str) -> DictionaryResult<T>;
}

impl<T> StoreContext<T> for rusqlite::Result<T> {
    fn step(self, step: &'static str) -> DictionaryResult<T> {
        self.map_err(|source| DictionaryError::Store { step, source })
    }
}

/// Check whether a SQLite error is a UNIQUE constraint violation
pub fn is_unique_violation(error: &rusqlite::Error) -> bool {
    match error {
        rusqlite::Error::SqliteFailure(err, _) => {
            err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}
