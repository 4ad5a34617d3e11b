/*!
 * Reading sessions.
 *
 * This module provides:
 * - `ReaderSession`, the per-viewer state and the word-click pipeline
 * - Settings and lookup records exchanged with the presentation layer
 */

pub mod models;
pub mod reader;

// Re-export main types
pub use models::{LookupSource, SessionSettings, WordLookup};
pub use reader::ReaderSession;
