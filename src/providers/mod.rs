/*!
 * Provider implementations for the external collaborators of a reading session.
 *
 * This module contains the interfaces the session depends on and their
 * implementations:
 * - `http`: the translation/alignment web service
 * - `alignment_files`: alignment tables stored as JSON files in a directory
 * - `mock`: scripted translator for tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::alignment::AlignmentTable;
use crate::errors::ProviderError;

/// A request to translate a word, a selection or a whole page
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    /// Text to translate
    pub text: String,

    /// Source language code
    pub source_language: String,

    /// Target language code
    pub target_language: String,

    /// Surrounding text the service may use to disambiguate
    pub context: Option<String>,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            context: None,
        }
    }

    /// Attach surrounding text
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Translated text returned by a translator
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TranslationResult {
    pub text: String,
}

/// Common trait for all translators
///
/// Implementations fail with `ProviderError::AuthenticationError` when the
/// credential is rejected so the session can invalidate it.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate a single request
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, ProviderError>;

    /// Replace the credential used for subsequent requests
    fn set_credentials(&self, _token: &str) {}
}

/// Source of precomputed paragraph alignment tables
#[async_trait]
pub trait AlignmentSource: Send + Sync + Debug {
    /// Load the table for a document; `Ok(None)` when none exists
    async fn load_alignment_table(&self, document_id: &str) -> Result<Option<AlignmentTable>, ProviderError>;
}

pub mod alignment_files;
pub mod http;
pub mod mock;
