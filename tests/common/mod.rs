/*!
 * Common test utilities for the slowko test suite
 */

use anyhow::Result;
use slowko::errors::StoreContext;
use slowko::{Database, NewTranslation, TranslationRecord, TranslationService};
use std::path::PathBuf;
use tempfile::TempDir;

/// Routes library log output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a service over a fresh in-memory database
pub fn memory_service() -> TranslationService {
    init_logging();
    TranslationService::in_memory().expect("Failed to create in-memory service")
}

/// Creates a service over a database file inside a temporary directory.
///
/// The directory must outlive the service, so it is returned alongside.
pub fn file_service() -> Result<(TempDir, PathBuf, TranslationService)> {
    init_logging();
    let dir = TempDir::new()?;
    let path = dir.path().join("dictionary.db");
    let db = Database::open(&path, slowko::database::DEFAULT_BUSY_TIMEOUT)?;
    Ok((dir, path, TranslationService::new(db)))
}

/// Builds a create input from string slices
pub fn new_translation(word: &str, english: &str, examples: &[&str]) -> NewTranslation {
    examples
        .iter()
        .fold(NewTranslation::new(word, english), |input, sentence| {
            input.with_example(*sentence)
        })
}

/// Creates a translation and panics on failure
pub fn create(
    service: &TranslationService,
    word: &str,
    english: &str,
    examples: &[&str],
) -> TranslationRecord {
    service
        .create(&new_translation(word, english, examples))
        .expect("Failed to create translation")
}

/// Counts rows with the given text in the words table
pub fn word_rows(service: &TranslationService, text: &str) -> i64 {
    count(service, "SELECT COUNT(*) FROM words WHERE text = ?1", text)
}

/// Counts example rows belonging to a translation id
pub fn example_rows(service: &TranslationService, translation_id: i64) -> i64 {
    count(
        service,
        "SELECT COUNT(*) FROM examples WHERE translation_id = ?1",
        translation_id,
    )
}

fn count<P: rusqlite::ToSql>(service: &TranslationService, sql: &str, param: P) -> i64 {
    service
        .database()
        .execute(|conn| {
            conn.query_row(sql, [param], |row| row.get(0))
                .step("count rows")
        })
        .expect("Failed to count rows")
}
