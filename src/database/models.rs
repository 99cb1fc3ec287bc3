/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DictionaryError;

/// Identifier of a translation row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationId(i64);

impl TranslationId {
    /// Wrap a raw row id
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw row id
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TranslationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TranslationId {
    type Err = DictionaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: i64 = s
            .trim()
            .parse()
            .map_err(|_| DictionaryError::Validation(format!("invalid id format: '{}'", s)))?;

        if id <= 0 {
            return Err(DictionaryError::Validation(format!(
                "id must be positive, got {}",
                id
            )));
        }

        Ok(Self(id))
    }
}

impl From<i64> for TranslationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Polish headword record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    /// Row id
    pub id: i64,
    /// Polish text, unique across all words
    pub text: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

/// Example sentence record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleRecord {
    /// Row id
    pub id: i64,
    /// Owning translation
    pub translation_id: i64,
    /// Sentence text
    pub sentence: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

/// Translation with its word and examples attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Row id
    pub id: TranslationId,
    /// English rendering
    pub english_text: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
    /// The Polish word this translates
    pub word: WordRecord,
    /// Example sentences in insertion order
    pub examples: Vec<ExampleRecord>,
}

impl TranslationRecord {
    /// Example sentences as plain strings, in order
    pub fn sentences(&self) -> Vec<&str> {
        self.examples.iter().map(|e| e.sentence.as_str()).collect()
    }
}

/// Input for creating a translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTranslation {
    /// Polish word text
    pub word: String,
    /// English text
    pub english_text: String,
    /// Example sentences, stored in this order
    #[serde(default)]
    pub examples: Vec<String>,
}

impl NewTranslation {
    /// Create a new translation input
    pub fn new(word: impl Into<String>, english_text: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            english_text: english_text.into(),
            examples: Vec::new(),
        }
    }

    /// Add an example sentence
    pub fn with_example(mut self, sentence: impl Into<String>) -> Self {
        self.examples.push(sentence.into());
        self
    }

    /// Reject empty fields before any store access
    pub fn validate(&self) -> Result<(), DictionaryError> {
        require_text("word", &self.word)?;
        require_text("english text", &self.english_text)?;
        for (index, sentence) in self.examples.iter().enumerate() {
            if sentence.trim().is_empty() {
                return Err(DictionaryError::Validation(format!(
                    "example sentence #{} must not be empty",
                    index + 1
                )));
            }
        }
        Ok(())
    }
}

/// Fail with a validation error when `value` is empty or whitespace
pub fn require_text(field: &str, value: &str) -> Result<(), DictionaryError> {
    if value.trim().is_empty() {
        return Err(DictionaryError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

/// Current timestamp in the format stored in every table.
///
/// Fixed-width RFC 3339 in UTC, so stored values sort chronologically.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
