/*!
 * Repository layer for dictionary operations.
 *
 * `DictionaryStore` is the interface a reading session depends on;
 * `SqliteDictionary` implements it on top of a `DatabaseConnection`.
 */

use anyhow::Result;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::connection::DatabaseConnection;
use super::models::{DictionaryEntry, NewDictionaryEntry};
use crate::errors::DictionaryError;

/// Persistence for saved words
#[async_trait]
pub trait DictionaryStore: Send + Sync + std::fmt::Debug {
    /// Save a word; saving an existing word updates its translation and context
    async fn add_entry(&self, word: &str, translation: &str, context: Option<&str>) -> Result<DictionaryEntry, DictionaryError>;

    /// Whether the word is saved
    async fn has_entry(&self, word: &str) -> Result<bool, DictionaryError>;

    /// All saved words, newest first
    async fn list_entries(&self) -> Result<Vec<DictionaryEntry>, DictionaryError>;

    /// Delete an entry by ID; `false` when no such entry existed
    async fn remove_entry(&self, id: i64) -> Result<bool, DictionaryError>;
}

/// SQLite-backed dictionary
#[derive(Debug, Clone)]
pub struct SqliteDictionary {
    /// Database connection
    db: DatabaseConnection,
}

impl SqliteDictionary {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open or create the dictionary file at `path`
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Ok(Self::new(DatabaseConnection::open(path)?))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        Ok(Self::new(DatabaseConnection::open_in_memory()?))
    }

    fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<DictionaryEntry> {
        Ok(DictionaryEntry {
            id: row.get(0)?,
            word: row.get(1)?,
            translation: row.get(2)?,
            context: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    /// Get an entry by word (synchronous version for use within transactions)
    fn get_entry_sync(conn: &Connection, word: &str) -> Result<Option<DictionaryEntry>> {
        let entry = conn
            .query_row(
                "SELECT id, word, translation, context, created_at FROM user_dictionary WHERE word = ?1",
                [word],
                Self::entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Get a saved entry by word
    pub async fn get_entry(&self, word: &str) -> Result<Option<DictionaryEntry>, DictionaryError> {
        let word = word.trim().to_string();
        Ok(self.db.call(move |conn| Self::get_entry_sync(conn, &word)).await?)
    }
}

#[async_trait]
impl DictionaryStore for SqliteDictionary {
    async fn add_entry(&self, word: &str, translation: &str, context: Option<&str>) -> Result<DictionaryEntry, DictionaryError> {
        let entry = NewDictionaryEntry::new(word, translation, context);
        if !entry.is_valid() {
            return Err(DictionaryError::InvalidEntry(
                "word and translation cannot be empty".to_string(),
            ));
        }

        info!("Saving '{}' -> '{}'", entry.word, entry.translation);
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let saved = self.db
            .call_in_transaction(move |tx| {
                tx.execute(
                    r#"
                    INSERT INTO user_dictionary (word, translation, context, created_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(word) DO UPDATE SET
                        translation = excluded.translation,
                        context = excluded.context
                    "#,
                    params![entry.word, entry.translation, entry.context, created_at],
                )?;

                Self::get_entry_sync(tx, &entry.word)?
                    .ok_or_else(|| anyhow::anyhow!("Saved entry '{}' could not be read back", entry.word))
            })
            .await?;

        Ok(saved)
    }

    async fn has_entry(&self, word: &str) -> Result<bool, DictionaryError> {
        Ok(self.get_entry(word).await?.is_some())
    }

    async fn list_entries(&self) -> Result<Vec<DictionaryEntry>, DictionaryError> {
        let entries = self.db
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, word, translation, context, created_at
                    FROM user_dictionary
                    ORDER BY created_at DESC, id DESC
                    "#,
                )?;

                let entries = stmt
                    .query_map([], Self::entry_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;

                Ok(entries)
            })
            .await?;

        debug!("Found {} dictionary entries", entries.len());
        Ok(entries)
    }

    async fn remove_entry(&self, id: i64) -> Result<bool, DictionaryError> {
        let removed = self.db
            .call(move |conn| {
                Ok(conn.execute("DELETE FROM user_dictionary WHERE id = ?1", [id])?)
            })
            .await?;

        debug!("Removed dictionary entry {}: {}", id, removed > 0);
        Ok(removed > 0)
    }
}
