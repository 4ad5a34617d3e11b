/*!
 * Reading session: turns clicks and selections on a rendered page into
 * translations.
 *
 * A session owns the state of one viewer: the current page's fragments and
 * text, the page translation once fetched, the document's alignment table
 * and the translation cache. A lookup tries, in order:
 * - the alignment table, when a paragraph matches the context confidently
 * - the page translation, when the matcher locates the word in it
 * - the translator, with the context sent alongside the word
 *
 * A translator-bound lookup cancels the one still in flight, and a
 * rejected credential blocks further translator calls until it is reset.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use anyhow::Result;
use log::{debug, error, info, warn};
use parking_lot::Mutex;

use crate::alignment::geometry::{self, TextFragment};
use crate::alignment::{AlignmentTable, MatchQuery, Matcher, find_best_paragraph};
use crate::app_config::Config;
use crate::dictionary::{DictionaryEntry, DictionaryStore};
use crate::errors::{DictionaryError, ProviderError, TranslationError};
use crate::providers::{AlignmentSource, TranslationRequest, Translator};
use crate::text::markers::{clean_markers, has_markers};
use crate::text::tokens::has_alphanumeric;
use crate::translation::{CancellationToken, TranslationCache};

use super::models::{LookupSource, SessionSettings, WordLookup};

/// Selections with at most this many words are translated with the surrounding text as context
const SHORT_SELECTION_WORDS: usize = 3;

/// Text of the page currently displayed
#[derive(Debug, Default)]
struct PageState {
    fragments: Vec<TextFragment>,
    /// Cleaned source text of the page
    source_text: String,
    /// Translation of `source_text`, once known
    target_text: Option<String>,
    /// Bumped on every page change so late answers for an old page are dropped
    generation: u64,
}

/// Alignment table loaded for a document
#[derive(Debug, Clone)]
struct LoadedAlignment {
    document_id: Option<String>,
    table: Option<Arc<AlignmentTable>>,
}

/// State of one reading session
#[derive(Debug)]
pub struct ReaderSession {
    settings: SessionSettings,
    matcher: Matcher,
    translator: Arc<dyn Translator>,
    alignment_source: Option<Arc<dyn AlignmentSource>>,
    dictionary: Option<Arc<dyn DictionaryStore>>,
    cache: TranslationCache,
    page: Mutex<PageState>,
    alignment: Mutex<Option<LoadedAlignment>>,
    /// Token of the translator-bound lookup in flight
    in_flight: Mutex<Option<CancellationToken>>,
    credential_rejected: AtomicBool,
}

impl ReaderSession {
    /// Create a session with an unbounded cache and no oracle or dictionary
    pub fn new(settings: SessionSettings, translator: Arc<dyn Translator>) -> Self {
        Self {
            matcher: Matcher::new(settings.match_settings),
            settings,
            translator,
            alignment_source: None,
            dictionary: None,
            cache: TranslationCache::new(true),
            page: Mutex::new(PageState::default()),
            alignment: Mutex::new(None),
            in_flight: Mutex::new(None),
            credential_rejected: AtomicBool::new(false),
        }
    }

    /// Create a session from the configuration
    pub fn from_config(config: &Config, translator: Arc<dyn Translator>) -> Result<Self> {
        let settings = SessionSettings::from_config(config)?;
        Ok(Self::new(settings, translator).with_cache(TranslationCache::from_config(&config.cache)))
    }

    pub fn with_cache(mut self, cache: TranslationCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_alignment_source(mut self, source: Arc<dyn AlignmentSource>) -> Self {
        self.alignment_source = Some(source);
        self
    }

    pub fn with_dictionary(mut self, dictionary: Arc<dyn DictionaryStore>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    // =========================================================================
    // Page state
    // =========================================================================

    /// Display a new page.
    ///
    /// Replaces fragments and page text and forgets the previous page's
    /// translation; a cached translation of the new text is picked up.
    pub fn load_page(&self, fragments: Vec<TextFragment>) {
        let raw_text = geometry::page_text(&fragments);
        if has_markers(&raw_text) {
            debug!("Stripping template markers from page text");
        }
        let source_text = clean_markers(&raw_text);
        let cached = self.cache.get(
            &source_text,
            None,
            &self.settings.source_language,
            &self.settings.target_language,
        );

        let mut page = self.page.lock();
        debug!(
            "Loaded page with {} fragments ({} chars, translation cached: {})",
            fragments.len(),
            source_text.chars().count(),
            cached.is_some()
        );
        page.fragments = fragments;
        page.source_text = source_text;
        page.target_text = cached;
        page.generation += 1;
    }

    /// Use a translation of the current page obtained elsewhere
    pub fn set_page_translation(&self, translation: impl Into<String>) {
        let translation = translation.into();
        let mut page = self.page.lock();
        self.cache.store(
            &page.source_text,
            None,
            &self.settings.source_language,
            &self.settings.target_language,
            &translation,
        );
        page.target_text = Some(translation);
    }

    /// Cleaned text of the current page
    pub fn page_source_text(&self) -> String {
        self.page.lock().source_text.clone()
    }

    /// Translation of the current page, if fetched
    pub fn page_translation(&self) -> Option<String> {
        self.page.lock().target_text.clone()
    }

    /// Fetch the translation of the current page.
    ///
    /// Returns `Ok(None)` when the page has no text. The answer is kept only
    /// if the page did not change while it was requested.
    pub async fn translate_page(&self) -> Result<Option<String>, TranslationError> {
        let (source_text, generation) = {
            let page = self.page.lock();
            if let Some(target) = &page.target_text {
                return Ok(Some(target.clone()));
            }
            (page.source_text.clone(), page.generation)
        };

        if source_text.is_empty() {
            return Ok(None);
        }

        let translation = match self.cache.get(
            &source_text,
            None,
            &self.settings.source_language,
            &self.settings.target_language,
        ) {
            Some(cached) => cached,
            None => {
                let request = TranslationRequest::new(
                    source_text.as_str(),
                    self.settings.source_language.as_str(),
                    self.settings.target_language.as_str(),
                );
                info!("Translating page ({} chars)", source_text.chars().count());
                let translation = self.call_translator(&request).await?;
                self.cache.store(
                    &source_text,
                    None,
                    &self.settings.source_language,
                    &self.settings.target_language,
                    &translation,
                );
                translation
            }
        };

        let mut page = self.page.lock();
        if page.generation == generation {
            page.target_text = Some(translation.clone());
        } else {
            debug!("Page changed while its translation was requested; keeping it cached only");
        }

        Ok(Some(translation))
    }

    // =========================================================================
    // Alignment table
    // =========================================================================

    /// Load the alignment table of a document, once per document.
    ///
    /// Missing tables and load failures leave the session without an
    /// oracle. Returns whether a usable table is available.
    pub async fn load_alignment(&self, document_id: &str) -> bool {
        if let Some(loaded) = self.alignment.lock().as_ref() {
            if loaded.document_id.as_deref() == Some(document_id) {
                return loaded.table.is_some();
            }
        }

        let Some(source) = &self.alignment_source else {
            debug!("No alignment source configured");
            return false;
        };

        let table = match source.load_alignment_table(document_id).await {
            Ok(Some(table)) if !table.is_empty() => {
                info!("Using alignment table for '{}' ({} paragraphs)", document_id, table.len());
                Some(Arc::new(table))
            }
            Ok(_) => {
                debug!("No alignment table for '{}'", document_id);
                None
            }
            Err(e) => {
                warn!("Failed to load alignment table for '{}': {}", document_id, e);
                None
            }
        };

        let available = table.is_some();
        *self.alignment.lock() = Some(LoadedAlignment {
            document_id: Some(document_id.to_string()),
            table,
        });
        available
    }

    /// Use an alignment table supplied directly; empty tables are ignored
    pub fn set_alignment_table(&self, table: AlignmentTable) {
        let table = (!table.is_empty()).then(|| Arc::new(table));
        *self.alignment.lock() = Some(LoadedAlignment {
            document_id: None,
            table,
        });
    }

    fn alignment_table(&self) -> Option<Arc<AlignmentTable>> {
        self.alignment.lock().as_ref().and_then(|loaded| loaded.table.clone())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Translate the word under a click on the current page.
    ///
    /// Returns `Ok(None)` when the click does not land on a word.
    pub async fn on_click(&self, x: f64, y: f64) -> Result<Option<WordLookup>, TranslationError> {
        let (hit, context) = {
            let page = self.page.lock();
            let hit = geometry::word_at_with_padding(&page.fragments, x, y, self.settings.hit_padding);
            (hit, page.source_text.clone())
        };

        let Some(hit) = hit else {
            debug!("Click at ({}, {}) did not hit a word", x, y);
            return Ok(None);
        };

        let lookup = self.lookup_word(&hit.word, &context).await?;
        Ok(lookup.map(|mut lookup| {
            lookup.bounding_box = Some(hit.bounding_box);
            lookup
        }))
    }

    /// Translate a text selection.
    ///
    /// Short selections are translated with `surrounding` (or the page text)
    /// as context; longer ones serve as their own context.
    pub async fn on_selection(
        &self,
        selected: &str,
        surrounding: Option<&str>,
    ) -> Result<Option<WordLookup>, TranslationError> {
        let selected = selected.trim();
        let word_count = selected.split_whitespace().count();

        let context = if word_count <= SHORT_SELECTION_WORDS {
            match surrounding {
                Some(text) => text.to_string(),
                None => self.page_source_text(),
            }
        } else {
            selected.to_string()
        };

        self.lookup_word(selected, &context).await
    }

    /// Translate a word seen in `context`.
    ///
    /// Returns `Ok(None)` for empty words and words without an ASCII letter
    /// or digit.
    pub async fn lookup_word(&self, word: &str, context: &str) -> Result<Option<WordLookup>, TranslationError> {
        let word = clean_markers(word);
        if word.is_empty() || !has_alphanumeric(&word) {
            debug!("Ignoring lookup of '{}'", word);
            return Ok(None);
        }
        let context = clean_markers(context);

        let mut lookup = match self.lookup_oracle(&word, &context) {
            Some(lookup) => lookup,
            None => match self.lookup_page_translation(&word, &context) {
                Some(lookup) => lookup,
                None => self.lookup_translator(&word, &context).await?,
            },
        };

        lookup.saved = self.is_saved(&word).await;
        Ok(Some(lookup))
    }

    fn lookup_oracle(&self, word: &str, context: &str) -> Option<WordLookup> {
        let table = self.alignment_table()?;
        let best = find_best_paragraph(context, table.entries(), self.settings.paragraph_min_score)?;

        debug!("Alignment table paragraph {} matched with score {:.2}", best.index, best.score);
        Some(WordLookup::new(word, best.target, LookupSource::Oracle))
    }

    /// Locate the word in the page translation.
    ///
    /// Without a known translation of the word the matcher searches for the
    /// word itself, so `translation` is the located span of the page
    /// translation. For words the page leaves untranslated, such as proper
    /// nouns, that span repeats the source word.
    fn lookup_page_translation(&self, word: &str, context: &str) -> Option<WordLookup> {
        let (source_text, target_text) = {
            let page = self.page.lock();
            (page.source_text.clone(), page.target_text.clone()?)
        };

        // A known translation of the word is searched for instead of the word itself
        let known = self.cache.get(
            word,
            Some(context),
            &self.settings.source_language,
            &self.settings.target_language,
        );
        let mut query = MatchQuery::new(word, &source_text);
        if let Some(known) = known.as_deref() {
            query = query.with_target_word(known);
        }

        let result = self.matcher.locate_query(&query, &target_text);
        if !result.matched {
            debug!("'{}' not located in the page translation", word);
            return None;
        }

        Some(WordLookup::new(word, result.matched_text.clone(), LookupSource::PageTranslation).with_span(result))
    }

    async fn lookup_translator(&self, word: &str, context: &str) -> Result<WordLookup, TranslationError> {
        let source_language = &self.settings.source_language;
        let target_language = &self.settings.target_language;

        if let Some(cached) = self.cache.get(word, Some(context), source_language, target_language) {
            return Ok(WordLookup::new(word, cached, LookupSource::Cache));
        }

        let token = self.begin_lookup();
        let request = TranslationRequest::new(word, source_language.as_str(), target_language.as_str())
            .with_context(context);

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(TranslationError::Cancelled),
            result = self.call_translator(&request) => result,
        };
        self.finish_lookup(&token);

        if token.is_cancelled() {
            debug!("Lookup of '{}' was superseded", word);
            return Err(TranslationError::Cancelled);
        }

        let translation = result?;
        self.cache.store(word, Some(context), source_language, target_language, &translation);
        Ok(WordLookup::new(word, translation, LookupSource::Translator))
    }

    /// Send a request, enforcing and recording credential rejection
    async fn call_translator(&self, request: &TranslationRequest) -> Result<String, TranslationError> {
        if self.credential_rejected.load(Ordering::SeqCst) {
            return Err(TranslationError::CredentialRejected);
        }

        let result = self.translator.translate(request).await;
        match result {
            Ok(result) if result.text.trim().is_empty() => Err(TranslationError::EmptyTranslation),
            Ok(result) => Ok(result.text),
            Err(ProviderError::AuthenticationError(message)) => {
                error!("Translator rejected the credential: {}", message);
                self.credential_rejected.store(true, Ordering::SeqCst);
                Err(TranslationError::Auth(message))
            }
            Err(e) => {
                error!("Translation failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Register a new in-flight lookup, cancelling the previous one
    fn begin_lookup(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.in_flight.lock().replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    fn finish_lookup(&self, token: &CancellationToken) {
        let mut in_flight = self.in_flight.lock();
        if in_flight.as_ref().is_some_and(|current| current.same_token(token)) {
            *in_flight = None;
        }
    }

    /// Cancel the translator-bound lookup in flight, if any
    pub fn cancel_pending(&self) {
        if let Some(token) = self.in_flight.lock().take() {
            token.cancel();
        }
    }

    // =========================================================================
    // Credentials and dictionary
    // =========================================================================

    /// Whether the translator rejected the credential
    pub fn credential_rejected(&self) -> bool {
        self.credential_rejected.load(Ordering::SeqCst)
    }

    /// Hand a new credential to the translator and allow requests again
    pub fn reset_credentials(&self, token: &str) {
        self.translator.set_credentials(token);
        self.credential_rejected.store(false, Ordering::SeqCst);
        info!("Credentials reset");
    }

    async fn is_saved(&self, word: &str) -> Option<bool> {
        let dictionary = self.dictionary.as_ref()?;
        match dictionary.has_entry(word).await {
            Ok(saved) => Some(saved),
            Err(e) => {
                warn!("Failed to check dictionary for '{}': {}", word, e);
                None
            }
        }
    }

    /// Save a looked-up word to the dictionary
    pub async fn save_word(&self, lookup: &WordLookup, context: Option<&str>) -> Result<DictionaryEntry, DictionaryError> {
        let dictionary = self.dictionary.as_ref()
            .ok_or_else(|| DictionaryError::Storage("No dictionary configured".to_string()))?;
        dictionary.add_entry(&lookup.word, &lookup.translation, context).await
    }
}
