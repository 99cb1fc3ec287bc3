/*!
 * Row-level statements used inside units of work.
 *
 * Nothing here opens or commits a transaction: every function takes the
 * connection (or transaction) it should run on, so the service decides
 * which statements share one atomic scope.
 */

use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;

use super::models::{ExampleRecord, TranslationId, TranslationRecord, WordRecord};
use crate::errors::{is_unique_violation, DictionaryError, DictionaryResult, StoreContext};

const TRANSLATION_COLUMNS: &str = r#"
    t.id, t.english_text, t.created_at, t.updated_at,
    w.id, w.text, w.created_at, w.updated_at
"#;

/// Translation row joined with its word, examples not yet attached
fn parse_translation_row(row: &Row) -> rusqlite::Result<TranslationRecord> {
    Ok(TranslationRecord {
        id: TranslationId::new(row.get(0)?),
        english_text: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
        word: WordRecord {
            id: row.get(4)?,
            text: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        },
        examples: Vec::new(),
    })
}

fn parse_example_row(row: &Row) -> rusqlite::Result<ExampleRecord> {
    Ok(ExampleRecord {
        id: row.get(0)?,
        translation_id: row.get(1)?,
        sentence: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

// =========================================================================
// Word Operations
// =========================================================================

/// Insert a word unless one with the same text exists.
///
/// Returns true when a new row was written.
pub fn insert_word_if_absent(conn: &Connection, text: &str, now: &str) -> DictionaryResult<bool> {
    let inserted = conn
        .execute(
            r#"
            INSERT INTO words (text, created_at, updated_at)
            VALUES (?1, ?2, ?2)
            ON CONFLICT(text) DO NOTHING
            "#,
            params![text, now],
        )
        .step("insert word")?;

    Ok(inserted > 0)
}

/// Look up a word by its text
pub fn find_word_by_text(conn: &Connection, text: &str) -> DictionaryResult<Option<WordRecord>> {
    conn.query_row(
        "SELECT id, text, created_at, updated_at FROM words WHERE text = ?1",
        [text],
        |row| {
            Ok(WordRecord {
                id: row.get(0)?,
                text: row.get(1)?,
                created_at: row.get(2)?,
                updated_at: row.get(3)?,
            })
        },
    )
    .optional()
    .step("find word")
}

/// Delete a word once no translation references it.
///
/// Deleting an already-deleted word affects zero rows and is not an
/// error. Returns true when a row was removed.
pub fn delete_word_if_orphaned(conn: &Connection, word_id: i64) -> DictionaryResult<bool> {
    let deleted = conn
        .execute(
            r#"
            DELETE FROM words
            WHERE id = ?1
              AND NOT EXISTS (SELECT 1 FROM translations WHERE word_id = ?1)
            "#,
            [word_id],
        )
        .step("delete orphaned word")?;

    Ok(deleted > 0)
}

// =========================================================================
// Translation Operations
// =========================================================================

/// Find the translation of a word with the given English text
pub fn find_translation_id(
    conn: &Connection,
    word_id: i64,
    english_text: &str,
) -> DictionaryResult<Option<TranslationId>> {
    conn.query_row(
        "SELECT id FROM translations WHERE word_id = ?1 AND english_text = ?2",
        params![word_id, english_text],
        |row| row.get(0).map(TranslationId::new),
    )
    .optional()
    .step("check duplicate translation")
}

/// Insert a translation row.
///
/// A UNIQUE violation on (word_id, english_text) is reported as
/// `DuplicateTranslation`.
pub fn insert_translation(
    conn: &Connection,
    word: &WordRecord,
    english_text: &str,
    now: &str,
) -> DictionaryResult<TranslationId> {
    let result = conn.execute(
        r#"
        INSERT INTO translations (word_id, english_text, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?3)
        "#,
        params![word.id, english_text, now],
    );

    match result {
        Ok(_) => Ok(TranslationId::new(conn.last_insert_rowid())),
        Err(err) if is_unique_violation(&err) => Err(DictionaryError::DuplicateTranslation {
            word: word.text.clone(),
            english: english_text.to_string(),
        }),
        Err(err) => Err(err).step("insert translation"),
    }
}

/// Insert example sentences for a translation, preserving order
pub fn insert_examples(
    conn: &Connection,
    translation_id: TranslationId,
    sentences: &[String],
    now: &str,
) -> DictionaryResult<()> {
    let mut stmt = conn
        .prepare(
            r#"
            INSERT INTO examples (translation_id, sentence, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            "#,
        )
        .step("prepare example insert")?;

    for sentence in sentences {
        stmt.execute(params![translation_id.get(), sentence, now])
            .step("insert example")?;
    }

    debug!(
        "Inserted {} example(s) for translation {}",
        sentences.len(),
        translation_id
    );
    Ok(())
}

/// Overwrite the English text of a translation.
///
/// Returns the number of rows changed (zero when the id does not exist).
pub fn update_english_text(
    conn: &Connection,
    translation: &TranslationRecord,
    english_text: &str,
    now: &str,
) -> DictionaryResult<usize> {
    let result = conn.execute(
        "UPDATE translations SET english_text = ?1, updated_at = ?2 WHERE id = ?3",
        params![english_text, now, translation.id.get()],
    );

    match result {
        Ok(changed) => Ok(changed),
        Err(err) if is_unique_violation(&err) => Err(DictionaryError::DuplicateTranslation {
            word: translation.word.text.clone(),
            english: english_text.to_string(),
        }),
        Err(err) => Err(err).step("update translation"),
    }
}

/// Delete a translation; its examples go with it through the cascade.
///
/// Returns the number of rows removed.
pub fn delete_translation(conn: &Connection, id: TranslationId) -> DictionaryResult<usize> {
    conn.execute("DELETE FROM translations WHERE id = ?1", [id.get()])
        .step("delete translation")
}

/// Count translations still referencing a word
pub fn count_translations_for_word(conn: &Connection, word_id: i64) -> DictionaryResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM translations WHERE word_id = ?1",
        [word_id],
        |row| row.get(0),
    )
    .step("count remaining translations")
}

// =========================================================================
// Eager Loading
// =========================================================================

/// Fetch one translation with its word and examples
pub fn fetch_translation(
    conn: &Connection,
    id: TranslationId,
) -> DictionaryResult<Option<TranslationRecord>> {
    let sql = format!(
        "SELECT {} FROM translations t JOIN words w ON w.id = t.word_id WHERE t.id = ?1",
        TRANSLATION_COLUMNS
    );

    let translation = conn
        .query_row(&sql, [id.get()], parse_translation_row)
        .optional()
        .step("fetch translation")?;

    let Some(mut translation) = translation else {
        return Ok(None);
    };

    let mut stmt = conn
        .prepare(
            r#"
            SELECT id, translation_id, sentence, created_at, updated_at
            FROM examples
            WHERE translation_id = ?1
            ORDER BY id
            "#,
        )
        .step("prepare example fetch")?;

    translation.examples = stmt
        .query_map([id.get()], parse_example_row)
        .step("fetch examples")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .step("read examples")?;

    Ok(Some(translation))
}

/// Fetch every translation with its word and examples, ordered by id.
///
/// Runs two queries regardless of row count: one join for translations
/// and words, one batch for all examples.
pub fn fetch_all_translations(conn: &Connection) -> DictionaryResult<Vec<TranslationRecord>> {
    let sql = format!(
        "SELECT {} FROM translations t JOIN words w ON w.id = t.word_id ORDER BY t.id",
        TRANSLATION_COLUMNS
    );

    let mut stmt = conn.prepare(&sql).step("prepare translation list")?;
    let mut translations = stmt
        .query_map([], parse_translation_row)
        .step("list translations")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .step("read translations")?;

    let mut stmt = conn
        .prepare(
            r#"
            SELECT id, translation_id, sentence, created_at, updated_at
            FROM examples
            ORDER BY translation_id, id
            "#,
        )
        .step("prepare example list")?;

    let mut examples_by_translation: HashMap<i64, Vec<ExampleRecord>> = HashMap::new();
    for example in stmt
        .query_map([], parse_example_row)
        .step("list examples")?
    {
        let example = example.step("read example")?;
        examples_by_translation
            .entry(example.translation_id)
            .or_default()
            .push(example);
    }

    for translation in &mut translations {
        if let Some(examples) = examples_by_translation.remove(&translation.id.get()) {
            translation.examples = examples;
        }
    }

    Ok(translations)
}
