/*!
 * Database schema definitions and migrations.
 *
 * Three tables make up the dictionary: `words`, `translations` and
 * `examples`. Uniqueness and cascade rules live in the DDL so the store,
 * not the service, is the final authority on them.
 */

use log::{debug, info};
use rusqlite::{Connection, OptionalExtension};

use crate::errors::{DictionaryError, DictionaryResult, StoreContext};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> DictionaryResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version == SCHEMA_VERSION {
        debug!("Database schema is up to date (v{})", current_version);
    } else {
        return Err(DictionaryError::Schema(format!(
            "Unsupported schema version {} (this build understands v{})",
            current_version, SCHEMA_VERSION
        )));
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> DictionaryResult<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .step("check schema_version table")?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()
        .step("read schema version")?;

    Ok(version.unwrap_or(0))
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> DictionaryResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )
    .step("set schema version")?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> DictionaryResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .step("create schema_version table")?;

    // Polish headwords
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS words (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            text TEXT NOT NULL CHECK (length(text) > 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(text)
        );
        "#,
    )
    .step("create words table")?;

    // English renderings, at most one per (word, english_text)
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS translations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word_id INTEGER NOT NULL REFERENCES words(id),
            english_text TEXT NOT NULL CHECK (length(english_text) > 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(word_id, english_text)
        );

        CREATE INDEX IF NOT EXISTS idx_translations_word ON translations(word_id);
        "#,
    )
    .step("create translations table")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS examples (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            translation_id INTEGER NOT NULL REFERENCES translations(id) ON DELETE CASCADE,
            sentence TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_examples_translation ON examples(translation_id);
        "#,
    )
    .step("create examples table")?;

    info!("Database schema created successfully");
    Ok(())
}
