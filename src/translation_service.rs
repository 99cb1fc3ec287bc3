/*!
 * Translation service: the five dictionary operations.
 *
 * Each write operation is one unit of work on the injected `Database`.
 * Words are shared parents: Create inserts them on first use and Remove
 * deletes them once their last translation is gone. The duplicate check in
 * Create and the orphan check in Remove are fast paths only; the UNIQUE
 * constraints and the idempotent delete keep the data correct when two
 * callers race past them.
 */

use anyhow::Context;
use log::{debug, info};

use crate::app_config::Config;
use crate::database::models::{now_timestamp, require_text};
use crate::database::repository;
use crate::database::{Database, NewTranslation, TranslationId, TranslationRecord};
use crate::errors::{DictionaryError, DictionaryResult};

// @module: Dictionary operations over a shared store handle

/// Dictionary service handle; clones share the same store
#[derive(Clone)]
pub struct TranslationService {
    db: Database,
}

impl TranslationService {
    /// Create a service over an already opened store
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the store described by the configuration
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        let path = config.database.resolved_path()?;
        let db = Database::open(&path, config.database.busy_timeout())
            .with_context(|| format!("Failed to open database at {:?}", path))?;
        Ok(Self::new(db))
    }

    /// Service over a fresh in-memory store (for testing)
    pub fn in_memory() -> DictionaryResult<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// The underlying store handle
    pub fn database(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Create a translation, creating its word on first use.
    ///
    /// Fails with `DuplicateTranslation` when the word already has the same
    /// English rendering, whether the pre-check or the store constraint
    /// catches it.
    pub fn create(&self, input: &NewTranslation) -> DictionaryResult<TranslationRecord> {
        input.validate()?;

        let record = self.db.transaction(|tx| {
            let now = now_timestamp();

            if repository::insert_word_if_absent(tx, &input.word, &now)? {
                debug!("Created word '{}'", input.word);
            }

            let word = repository::find_word_by_text(tx, &input.word)?.ok_or_else(|| {
                DictionaryError::Store {
                    step: "read back word",
                    source: rusqlite::Error::QueryReturnedNoRows,
                }
            })?;

            if repository::find_translation_id(tx, word.id, &input.english_text)?.is_some() {
                return Err(DictionaryError::DuplicateTranslation {
                    word: word.text,
                    english: input.english_text.clone(),
                });
            }

            let id = repository::insert_translation(tx, &word, &input.english_text, &now)?;
            repository::insert_examples(tx, id, &input.examples, &now)?;

            repository::fetch_translation(tx, id)?.ok_or_else(|| not_found(id))
        })?;

        info!(
            "Created translation {} ({} -> {}) with {} example(s)",
            record.id,
            record.word.text,
            record.english_text,
            record.examples.len()
        );
        Ok(record)
    }

    /// Remove a translation and, if it was the last one, its word.
    ///
    /// A failure anywhere, including the word cleanup, rolls back the
    /// whole removal.
    pub fn remove(&self, id: TranslationId) -> DictionaryResult<bool> {
        self.db.transaction(|tx| {
            let translation = repository::fetch_translation(tx, id)?.ok_or_else(|| not_found(id))?;
            let word_id = translation.word.id;

            if repository::delete_translation(tx, id)? == 0 {
                return Err(not_found(id));
            }

            let remaining = repository::count_translations_for_word(tx, word_id)?;
            if remaining == 0 {
                if repository::delete_word_if_orphaned(tx, word_id)? {
                    debug!("Removed orphaned word '{}'", translation.word.text);
                }
            } else {
                debug!(
                    "Word '{}' still has {} translation(s)",
                    translation.word.text, remaining
                );
            }

            Ok(())
        })?;

        info!("Removed translation {}", id);
        Ok(true)
    }

    /// Replace the English text of a translation. The last commit wins.
    ///
    /// A missing id is reported as `NotFound` before the new text is
    /// validated.
    pub fn update(
        &self,
        id: TranslationId,
        english_text: &str,
    ) -> DictionaryResult<TranslationRecord> {
        let record = self.db.transaction(|tx| {
            let mut translation = repository::fetch_translation(tx, id)?.ok_or_else(|| not_found(id))?;
            require_text("english text", english_text)?;
            let now = now_timestamp();

            if repository::update_english_text(tx, &translation, english_text, &now)? == 0 {
                return Err(not_found(id));
            }

            translation.english_text = english_text.to_string();
            translation.updated_at = now;
            Ok(translation)
        })?;

        info!("Updated translation {} to '{}'", id, record.english_text);
        Ok(record)
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Fetch one translation with its word and examples
    pub fn get(&self, id: TranslationId) -> DictionaryResult<TranslationRecord> {
        self.db
            .snapshot(|tx| repository::fetch_translation(tx, id))?
            .ok_or_else(|| not_found(id))
    }

    /// Fetch every translation, ordered by id
    pub fn list(&self) -> DictionaryResult<Vec<TranslationRecord>> {
        let translations = self.db.snapshot(|tx| repository::fetch_all_translations(tx))?;
        debug!("Listed {} translation(s)", translations.len());
        Ok(translations)
    }

    // =========================================================================
    // Async Adapters
    // =========================================================================

    /// Run a blocking service call on tokio's blocking pool
    async fn blocking<F, T>(&self, f: F) -> DictionaryResult<T>
    where
        F: FnOnce(&TranslationService) -> DictionaryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = self.clone();

        tokio::task::spawn_blocking(move || f(&service))
            .await
            .map_err(|e| DictionaryError::Task(e.to_string()))?
    }

    /// Async form of [`TranslationService::create`]
    pub async fn create_async(&self, input: NewTranslation) -> DictionaryResult<TranslationRecord> {
        self.blocking(move |service| service.create(&input)).await
    }

    /// Async form of [`TranslationService::remove`]
    pub async fn remove_async(&self, id: TranslationId) -> DictionaryResult<bool> {
        self.blocking(move |service| service.remove(id)).await
    }

    /// Async form of [`TranslationService::update`]
    pub async fn update_async(
        &self,
        id: TranslationId,
        english_text: String,
    ) -> DictionaryResult<TranslationRecord> {
        self.blocking(move |service| service.update(id, &english_text))
            .await
    }

    /// Async form of [`TranslationService::get`]
    pub async fn get_async(&self, id: TranslationId) -> DictionaryResult<TranslationRecord> {
        self.blocking(move |service| service.get(id)).await
    }

    /// Async form of [`TranslationService::list`]
    pub async fn list_async(&self) -> DictionaryResult<Vec<TranslationRecord>> {
        self.blocking(|service| service.list()).await
    }
}

fn not_found(id: TranslationId) -> DictionaryError {
    DictionaryError::NotFound {
        resource: "translation",
        id: id.get(),
    }
}
