/*!
 * Dictionary entity models.
 */

use serde::{Deserialize, Serialize};

/// A saved word as stored in the dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Database ID
    pub id: i64,
    pub word: String,
    pub translation: String,
    /// Sentence the word was saved from; empty when none was given
    pub context: String,
    /// RFC 3339 timestamp of the first save
    pub created_at: String,
}

/// A word about to be saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDictionaryEntry {
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub context: String,
}

impl NewDictionaryEntry {
    /// Build an entry with surrounding whitespace removed from word and translation
    pub fn new(word: &str, translation: &str, context: Option<&str>) -> Self {
        Self {
            word: word.trim().to_string(),
            translation: translation.trim().to_string(),
            context: context.unwrap_or_default().to_string(),
        }
    }

    /// Word and translation must both be non-empty
    pub fn is_valid(&self) -> bool {
        !self.word.is_empty() && !self.translation.is_empty()
    }
}
