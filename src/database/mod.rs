/*!
 * Database module for persistent storage of the dictionary.
 *
 * This module provides SQLite-based persistence for:
 * - Polish words, unique by text
 * - English translations, unique per word
 * - Example sentences, removed together with their translation
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{Database, DatabaseStats, DEFAULT_BUSY_TIMEOUT};
pub use models::{ExampleRecord, NewTranslation, TranslationId, TranslationRecord, WordRecord};
