/*!
 * Translation caching functionality.
 *
 * This module memoizes translations for the lifetime of a reading session
 * to avoid redundant calls to the translation service. Keys are taken
 * verbatim: callers clean markers first, and case and whitespace stay
 * significant. With a capacity set, the least recently used entry is
 * evicted on overflow.
 */

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::Mutex;
use log::debug;

use crate::app_config::CacheConfig;

/// Cache key combining source text, optional context and the language pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Source text to translate
    source_text: String,

    /// Context sent alongside the text, if any
    context: Option<String>,

    /// Source language code
    source_language: String,

    /// Target language code
    target_language: String,
}

impl CacheKey {
    fn new(source_text: &str, context: Option<&str>, source_language: &str, target_language: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            context: context.map(str::to_string),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    translation: String,
    last_used: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    clock: u64,
    hits: usize,
    misses: usize,
    evictions: usize,
}

impl CacheState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            debug!("Evicting cached translation for '{}'", truncate_text(&key.source_text, 30));
            self.entries.remove(&key);
            self.evictions += 1;
        }
    }
}

/// Translation cache for storing and retrieving translations
#[derive(Debug, Clone)]
pub struct TranslationCache {
    /// Shared cache state
    state: Arc<Mutex<CacheState>>,

    /// Maximum number of entries, `None` for unbounded
    capacity: Option<usize>,

    /// Whether caching is enabled
    enabled: bool,
}

impl TranslationCache {
    /// Create an unbounded cache
    pub fn new(enabled: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            capacity: None,
            enabled,
        }
    }

    /// Create a cache holding at most `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::new(true)
        }
    }

    /// Create a cache from the cache section of the configuration
    pub fn from_config(config: &CacheConfig) -> Self {
        match (config.enabled, config.capacity) {
            (false, _) => Self::new(false),
            (true, Some(capacity)) => Self::with_capacity(capacity),
            (true, None) => Self::new(true),
        }
    }

    /// Get a translation from the cache
    pub fn get(
        &self,
        source_text: &str,
        context: Option<&str>,
        source_language: &str,
        target_language: &str,
    ) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(source_text, context, source_language, target_language);
        let mut state = self.state.lock();
        let now = state.tick();

        match state.entries.get_mut(&key) {
            Some(entry) => {
                entry.last_used = now;
                let translation = entry.translation.clone();
                state.hits += 1;

                debug!("Cache hit for '{}' ({} -> {})",
                       truncate_text(source_text, 30),
                       source_language,
                       target_language);

                Some(translation)
            },
            None => {
                state.misses += 1;

                debug!("Cache miss for '{}' ({} -> {})",
                       truncate_text(source_text, 30),
                       source_language,
                       target_language);

                None
            }
        }
    }

    /// Store a translation in the cache
    pub fn store(
        &self,
        source_text: &str,
        context: Option<&str>,
        source_language: &str,
        target_language: &str,
        translation: &str,
    ) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::new(source_text, context, source_language, target_language);
        let mut state = self.state.lock();
        let now = state.tick();

        let is_new = !state.entries.contains_key(&key);
        if is_new {
            if let Some(capacity) = self.capacity {
                while state.entries.len() >= capacity {
                    state.evict_least_recent();
                }
            }
        }

        state.entries.insert(key, CacheEntry {
            translation: translation.to_string(),
            last_used: now,
        });

        debug!("Cached translation for '{}' ({} -> {})",
               truncate_text(source_text, 30),
               source_language,
               target_language);
    }

    /// Get cache statistics: hits, misses and hit rate
    pub fn stats(&self) -> (usize, usize, f64) {
        let state = self.state.lock();
        let total = state.hits + state.misses;

        let hit_rate = if total > 0 {
            state.hits as f64 / total as f64
        } else {
            0.0
        };

        (state.hits, state.misses, hit_rate)
    }

    /// Number of entries evicted so far
    pub fn evictions(&self) -> usize {
        self.state.lock().evictions
    }

    /// Clear the cache
    pub fn clear(&self) {
        let mut state = self.state.lock();
        *state = CacheState::default();

        debug!("Translation cache cleared");
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => format!("{}...", &text[..byte]),
        None => text.to_string(),
    }
}
