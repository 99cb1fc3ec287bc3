/*!
 * # slowko - Polish-English dictionary core
 *
 * A Rust library that stores Polish words, their English translations and
 * example sentences in SQLite, with transactional create, update, remove
 * and read operations.
 *
 * ## Features
 *
 * - Words are created on first use and removed with their last translation
 * - At most one translation per (word, English text), enforced by the store
 * - Example sentences kept in insertion order and removed by cascade
 * - Every write runs as one atomic unit of work
 * - Blocking API plus `tokio` adapters for async callers
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: SQLite persistence:
 *   - `database::schema`: Table definitions and versioning
 *   - `database::connection`: Store handle and transaction executor
 *   - `database::repository`: Row-level statements
 *   - `database::models`: Records and identifiers
 * - `translation_service`: The dictionary operations
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod database;
pub mod translation_service;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::{Database, NewTranslation, TranslationId, TranslationRecord};
pub use translation_service::TranslationService;
pub use errors::{DictionaryError, DictionaryResult};
