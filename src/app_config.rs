use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::alignment::MatchSettings;

/// Application configuration module
/// This module handles loading, validating and saving the reader settings:
/// languages, the translation service, matching thresholds, cache and
/// dictionary storage.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language of the documents being read (ISO code)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language translations are requested in (ISO code)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Matching thresholds
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Translation cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Saved-word dictionary settings
    #[serde(default)]
    pub dictionary: DictionaryConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceConfig {
    /// Base URL of the service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token sent with every request
    #[serde(default = "String::new")]
    pub api_token: String,

    /// Path of the translation endpoint
    #[serde(default = "default_translate_path")]
    pub translate_path: String,

    /// Path prefix of the alignment table endpoint
    #[serde(default = "default_mapping_path")]
    pub mapping_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_token: String::new(),
            translate_path: default_translate_path(),
            mapping_path: default_mapping_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Matching thresholds
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchingConfig {
    /// Fraction of the target length searched around the projected position
    #[serde(default = "default_window_ratio")]
    pub window_ratio: f64,

    /// Minimum letter-overlap score inside the projection window
    #[serde(default = "default_windowed_min_score")]
    pub windowed_min_score: u32,

    /// Minimum letter-overlap score over the full text
    #[serde(default = "default_fallback_min_score")]
    pub fallback_min_score: u32,

    /// Minimum similarity for an alignment table paragraph
    #[serde(default = "default_paragraph_min_score")]
    pub paragraph_min_score: f64,

    /// Click tolerance around text fragments
    #[serde(default = "default_hit_padding")]
    pub hit_padding: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            window_ratio: default_window_ratio(),
            windowed_min_score: default_windowed_min_score(),
            fallback_min_score: default_fallback_min_score(),
            paragraph_min_score: default_paragraph_min_score(),
            hit_padding: default_hit_padding(),
        }
    }
}

impl MatchingConfig {
    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            window_ratio: self.window_ratio,
            windowed_min_score: self.windowed_min_score,
            fallback_min_score: self.fallback_min_score,
        }
    }
}

/// Translation cache configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    /// Whether caching is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of cached translations; `null` keeps everything
    #[serde(default = "default_cache_capacity")]
    pub capacity: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: default_cache_capacity(),
        }
    }
}

/// Dictionary storage configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DictionaryConfig {
    /// SQLite database file; defaults to the platform data directory
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "ru".to_string()
}

fn default_endpoint() -> String {
    "http://localhost:8000".to_string()
}

fn default_translate_path() -> String {
    "/api/translate".to_string()
}

fn default_mapping_path() -> String {
    "/api/book-mapping".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_window_ratio() -> f64 {
    crate::alignment::matcher::WINDOW_RATIO
}

fn default_windowed_min_score() -> u32 {
    crate::alignment::matcher::WINDOWED_MIN_SCORE
}

fn default_fallback_min_score() -> u32 {
    crate::alignment::matcher::FALLBACK_MIN_SCORE
}

fn default_paragraph_min_score() -> f64 {
    crate::alignment::paragraph::PARAGRAPH_MIN_SCORE
}

fn default_hit_padding() -> f64 {
    crate::alignment::geometry::HIT_PADDING
}

fn default_cache_capacity() -> Option<usize> {
    Some(1024)
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if crate::language_utils::language_codes_match(&self.source_language, &self.target_language) {
            return Err(anyhow!(
                "Source and target languages must differ (both are '{}')",
                self.source_language
            ));
        }

        Url::parse(&self.service.endpoint)
            .with_context(|| format!("Invalid service endpoint: {}", self.service.endpoint))?;

        if self.service.timeout_secs == 0 {
            return Err(anyhow!("Service timeout must be at least one second"));
        }

        let matching = &self.matching;
        if !(0.0..=1.0).contains(&matching.window_ratio) {
            return Err(anyhow!("window_ratio must be within [0, 1], got {}", matching.window_ratio));
        }
        if !(0.0..=1.0).contains(&matching.paragraph_min_score) {
            return Err(anyhow!(
                "paragraph_min_score must be within [0, 1], got {}",
                matching.paragraph_min_score
            ));
        }
        if matching.hit_padding < 0.0 || !matching.hit_padding.is_finite() {
            return Err(anyhow!("hit_padding must be a non-negative number"));
        }

        if self.cache.capacity == Some(0) {
            return Err(anyhow!("Cache capacity must be positive; use null for an unbounded cache"));
        }

        Ok(())
    }

    /// Resolved dictionary database path
    pub fn dictionary_path(&self) -> Result<PathBuf> {
        match &self.dictionary.database_path {
            Some(path) => Ok(path.clone()),
            None => crate::dictionary::DatabaseConnection::default_path(),
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            service: ServiceConfig::default(),
            matching: MatchingConfig::default(),
            cache: CacheConfig::default(),
            dictionary: DictionaryConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
