/*!
 * # wordbridge
 *
 * Click-to-translate support for a document reader: resolve the word under
 * the pointer on a rendered page and find its translation in a parallel
 * text, a paragraph alignment table or an external translation service.
 *
 * ## Features
 *
 * - Bigram Dice similarity between strings
 * - Paragraph alignment against a precomputed source/target table
 * - Geometric word location from positioned text fragments
 * - Cross-text word matching with a cascade of exact and fuzzy strategies
 * - Session-scoped translation cache with LRU eviction
 * - SQLite dictionary of saved words
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `text`: marker cleaning, similarity scoring and tokenization
 * - `alignment`: paragraph aligner, word locator and cross-text matcher
 * - `translation`: translation cache and cancellation tokens
 * - `providers`: translator and alignment table sources:
 *   - `providers::http`: the reader's web service
 *   - `providers::alignment_files`: tables stored as JSON files
 *   - `providers::mock`: scripted translator for tests
 * - `dictionary`: saved-word persistence
 * - `session`: the reading session driving clicks and selections
 * - `app_config`: Configuration management
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod alignment;
pub mod app_config;
pub mod dictionary;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod session;
pub mod text;
pub mod translation;

// Re-export main types for easier usage
pub use alignment::{
    AlignedParagraph, AlignmentTable, MatchResult, MatchStrategy, TextFragment, WordHit,
    find_best_paragraph, locate, word_at,
};
pub use app_config::Config;
pub use errors::{AppError, DictionaryError, ProviderError, TranslationError};
pub use session::{ReaderSession, WordLookup};
pub use text::similarity;
