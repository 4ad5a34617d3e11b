/*!
 * Fuzzy cross-text matching.
 *
 * Locates the span of a translated text that corresponds to a word clicked
 * in the source text. Strategies run in order and the first success wins:
 *
 * 1. Project the word's relative position in the source context onto the
 *    target and look for a literal occurrence inside a window around it.
 * 2. Score the tokens starting inside that window by letter overlap.
 * 3. Find the sentence holding the word in the source and look for a
 *    literal occurrence in the sentence with the same index in the target.
 * 4. Without usable context: whole-word case-insensitive search over the
 *    full target, then letter-overlap scoring over every target token with
 *    a looser threshold.
 *
 * Offsets in results are byte offsets into the target text.
 */

use std::ops::Range;

use log::{debug, trace};
use serde::Serialize;

use crate::text::tokens::{
    byte_to_char, char_len, char_to_byte, find_whole_word, normalize_token, sentences, tokens,
    Token,
};

/// Fraction of the target length searched on each side of the projected position
pub const WINDOW_RATIO: f64 = 0.15;

/// Minimum letter-overlap score inside the projection window
pub const WINDOWED_MIN_SCORE: u32 = 10;

/// Minimum letter-overlap score when scanning the whole target
pub const FALLBACK_MIN_SCORE: u32 = 5;

/// Score of an exact match for words too short to fuzzy-match
const SHORT_WORD_EXACT_SCORE: u32 = 100;

/// Which strategy produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    WindowExact,
    WindowFuzzy,
    SentenceExact,
    WholeWord,
    FullTextFuzzy,
}

/// Outcome of a lookup. `start_index` and `matched_text` are only
/// meaningful when `matched` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub matched: bool,
    pub start_index: usize,
    pub matched_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<MatchStrategy>,
}

impl MatchResult {
    pub fn found(start_index: usize, matched_text: impl Into<String>, strategy: MatchStrategy) -> Self {
        Self {
            matched: true,
            start_index,
            matched_text: matched_text.into(),
            strategy: Some(strategy),
        }
    }

    pub fn no_match() -> Self {
        Self {
            matched: false,
            start_index: 0,
            matched_text: String::new(),
            strategy: None,
        }
    }

    /// Byte range of the match in the target text
    pub fn span(&self) -> Option<Range<usize>> {
        self.matched
            .then(|| self.start_index..self.start_index + self.matched_text.len())
    }

    /// Character index of the match start, for consumers counting characters
    pub fn char_index(&self, target: &str) -> Option<usize> {
        self.matched.then(|| byte_to_char(target, self.start_index))
    }
}

/// Tunable thresholds of the matcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSettings {
    pub window_ratio: f64,
    pub windowed_min_score: u32,
    pub fallback_min_score: u32,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            window_ratio: WINDOW_RATIO,
            windowed_min_score: WINDOWED_MIN_SCORE,
            fallback_min_score: FALLBACK_MIN_SCORE,
        }
    }
}

/// A lookup request.
///
/// `source_word` is located in `source_context`; `target_word` is searched
/// for in the target text. They are equal unless the word's translation is
/// already known.
#[derive(Debug, Clone, Copy)]
pub struct MatchQuery<'a> {
    pub source_word: &'a str,
    pub target_word: &'a str,
    pub source_context: &'a str,
}

impl<'a> MatchQuery<'a> {
    pub fn new(word: &'a str, source_context: &'a str) -> Self {
        Self {
            source_word: word,
            target_word: word,
            source_context,
        }
    }

    pub fn with_target_word(mut self, target_word: &'a str) -> Self {
        self.target_word = target_word;
        self
    }
}

/// Cross-text matcher
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    settings: MatchSettings,
}

impl Matcher {
    pub fn new(settings: MatchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    /// Locate `word`, found in `source_context`, inside `target`
    pub fn locate(&self, word: &str, source_context: &str, target: &str) -> MatchResult {
        self.locate_query(&MatchQuery::new(word, source_context), target)
    }

    pub fn locate_query(&self, query: &MatchQuery<'_>, target: &str) -> MatchResult {
        let source_word = query.source_word.trim();
        let target_word = query.target_word.trim();

        if target_word.is_empty() || target.is_empty() {
            return MatchResult::no_match();
        }

        if !source_word.is_empty() && !query.source_context.is_empty() {
            if let Some(result) = self.locate_with_context(source_word, target_word, query.source_context, target) {
                return result;
            }
        }

        self.locate_anywhere(target_word, target)
    }

    fn locate_with_context(
        &self,
        source_word: &str,
        target_word: &str,
        context: &str,
        target: &str,
    ) -> Option<MatchResult> {
        let Some((source_offset, _)) = find_whole_word(context, source_word) else {
            trace!("'{}' not found as a word in the source context", source_word);
            return None;
        };

        let window = self.projection_window(context, source_offset, target);
        trace!("Projection window for '{}': bytes {:?}", source_word, window);

        let window_text = &target[window.clone()];
        if let Some(position) = window_text.find(target_word) {
            debug!("Exact match for '{}' inside the projection window", target_word);
            return Some(MatchResult::found(
                window.start + position,
                target_word,
                MatchStrategy::WindowExact,
            ));
        }

        let candidates = tokens(window_text).map(|token| Token {
            text: token.text,
            start: window.start + token.start,
        });
        if let Some((token, score)) = best_token(candidates, target_word) {
            if score >= self.settings.windowed_min_score {
                debug!("Fuzzy match '{}' for '{}' inside the window (score {})", token.text, target_word, score);
                return Some(MatchResult::found(token.start, token.text, MatchStrategy::WindowFuzzy));
            }
        }

        sentence_match(source_word, target_word, context, target)
    }

    /// Byte range of the target to search around the projected position
    fn projection_window(&self, context: &str, source_offset: usize, target: &str) -> Range<usize> {
        let relative_position = byte_to_char(context, source_offset) as f64 / char_len(context) as f64;
        let target_chars = char_len(target);

        let approx = (relative_position * target_chars as f64).floor() as usize;
        let radius = (target_chars as f64 * self.settings.window_ratio).floor() as usize;

        let start = approx.saturating_sub(radius);
        let end = (approx + radius).min(target_chars);

        char_to_byte(target, start)..char_to_byte(target, end)
    }

    /// Context-free search over the whole target
    fn locate_anywhere(&self, word: &str, target: &str) -> MatchResult {
        if let Some((offset, matched)) = find_whole_word(target, word) {
            debug!("Whole-word match for '{}' at byte {}", word, offset);
            return MatchResult::found(offset, matched, MatchStrategy::WholeWord);
        }

        if let Some((token, score)) = best_token(tokens(target), word) {
            if score >= self.settings.fallback_min_score {
                debug!("Fuzzy match '{}' for '{}' in the full text (score {})", token.text, word, score);
                return MatchResult::found(token.start, token.text, MatchStrategy::FullTextFuzzy);
            }
        }

        debug!("No match for '{}'", word);
        MatchResult::no_match()
    }
}

/// Locate `word` in `target` with default settings
pub fn locate(word: &str, source_context: &str, target: &str) -> MatchResult {
    Matcher::default().locate(word, source_context, target)
}

/// Literal search in the target sentence with the same index as the source
/// sentence containing the word
fn sentence_match(source_word: &str, target_word: &str, context: &str, target: &str) -> Option<MatchResult> {
    let source_sentences = sentences(context);
    let index = source_sentences
        .iter()
        .position(|sentence| sentence.text.contains(source_word))?;

    let target_sentences = sentences(target);
    let sentence = target_sentences.get(index)?;
    let position = sentence.text.find(target_word)?;

    debug!("Exact match for '{}' in aligned sentence #{}", target_word, index);
    Some(MatchResult::found(
        sentence.start + position,
        target_word,
        MatchStrategy::SentenceExact,
    ))
}

/// Highest-scoring candidate; the first one wins on equal scores
fn best_token<'a>(candidates: impl Iterator<Item = Token<'a>>, word: &str) -> Option<(Token<'a>, u32)> {
    let word = normalize_token(word);
    let mut best: Option<(Token<'a>, u32)> = None;

    for token in candidates {
        let candidate = normalize_token(token.text);
        if candidate.chars().count() < 2 {
            continue;
        }

        let score = letter_overlap_score(&candidate, &word);
        if score > best.map_or(0, |(_, best_score)| best_score) {
            best = Some((token, score));
        }
    }

    best
}

/// Letter-overlap score of `candidate` against `word`.
///
/// Both inputs are expected lowercased and stripped of punctuation. Words of
/// three characters or fewer only score on an exact match.
pub fn letter_overlap_score(candidate: &str, word: &str) -> u32 {
    let word_chars: Vec<char> = word.chars().collect();
    if word_chars.len() <= 3 {
        return if candidate == word { SHORT_WORD_EXACT_SCORE } else { 0 };
    }

    let candidate_chars: Vec<char> = candidate.chars().collect();
    let mut score = 0;

    let prefix_len = word_chars.len().min(4);
    if candidate_chars.starts_with(&word_chars[..prefix_len]) {
        score += 10;
    }

    let positional = candidate_chars
        .iter()
        .zip(&word_chars)
        .filter(|(a, b)| a == b)
        .count();
    score += positional as u32;

    let longest = candidate_chars.len().max(word_chars.len());
    if positional as f64 / longest as f64 > 0.7 {
        score += 10;
    }

    score
}
