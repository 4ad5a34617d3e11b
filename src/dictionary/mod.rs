/*!
 * Saved-word dictionary.
 *
 * This module provides SQLite-based persistence for words a reader chose
 * to keep together with their translation and the sentence they came from.
 */

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{DictionaryEntry, NewDictionaryEntry};
pub use repository::{DictionaryStore, SqliteDictionary};
