/*!
 * Session-specific models.
 *
 * Settings a reading session runs with and the lookup records it hands to
 * the presentation layer.
 */

use anyhow::Result;
use serde::Serialize;

use crate::alignment::{BoundingBox, MatchResult, MatchSettings};
use crate::app_config::Config;
use crate::language_utils;

/// Immutable settings of one reading session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Source language code as sent to the service
    pub source_language: String,
    /// Target language code as sent to the service
    pub target_language: String,
    /// Cross-text matcher thresholds
    pub match_settings: MatchSettings,
    /// Minimum similarity for an alignment table hit
    pub paragraph_min_score: f64,
    /// Click tolerance around fragments
    pub hit_padding: f64,
}

impl SessionSettings {
    /// Settings for a language pair with default thresholds
    pub fn new(source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            source_language: source_language.into(),
            target_language: target_language.into(),
            match_settings: MatchSettings::default(),
            paragraph_min_score: crate::alignment::paragraph::PARAGRAPH_MIN_SCORE,
            hit_padding: crate::alignment::geometry::HIT_PADDING,
        }
    }

    /// Settings from the configuration, with languages normalized to service codes
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            source_language: language_utils::service_code(&config.source_language)?,
            target_language: language_utils::service_code(&config.target_language)?,
            match_settings: config.matching.match_settings(),
            paragraph_min_score: config.matching.paragraph_min_score,
            hit_padding: config.matching.hit_padding,
        })
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::new("en", "ru")
    }
}

/// Where a lookup's translation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupSource {
    /// Target paragraph of the document's alignment table
    Oracle,
    /// Span of the page translation located by the matcher.
    ///
    /// When no translation of the word was known beforehand the span may be
    /// the source word itself, not a dictionary translation of it.
    PageTranslation,
    /// Earlier translator answer for the same word and context
    Cache,
    /// Fresh answer from the translator
    Translator,
}

/// Result of a click or selection, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordLookup {
    pub word: String,
    pub translation: String,
    /// Location of the word in the page translation, when it was found there
    #[serde(rename = "matchedSpan")]
    pub span: Option<MatchResult>,
    pub source: LookupSource,
    /// Whether the word is already in the dictionary; `None` without a dictionary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<bool>,
    /// Estimated box of the clicked word
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl WordLookup {
    pub fn new(word: impl Into<String>, translation: impl Into<String>, source: LookupSource) -> Self {
        Self {
            word: word.into(),
            translation: translation.into(),
            span: None,
            source,
            saved: None,
            bounding_box: None,
        }
    }

    pub fn with_span(mut self, span: MatchResult) -> Self {
        self.span = Some(span);
        self
    }

    /// Whether the translation is anchored in the page translation
    pub fn is_anchored(&self) -> bool {
        self.span.as_ref().is_some_and(|span| span.matched)
    }
}
