/*!
 * Tokenization helpers.
 *
 * All offsets returned here are byte offsets into the original string and
 * always fall on character boundaries.
 */

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Runs of non-whitespace
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\S+").expect("Invalid token regex")
});

/// Sentence terminators
static SENTENCE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?]+").expect("Invalid sentence regex")
});

/// Punctuation stripped from tokens before fuzzy scoring
const TOKEN_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '"', '\'', '(', ')'];

/// A whitespace-delimited token and its byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
}

/// A sentence slice and its byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub start: usize,
}

/// Split `text` on whitespace, keeping offsets
pub fn tokens(text: &str) -> impl Iterator<Item = Token<'_>> {
    TOKEN_REGEX.find_iter(text).map(|m| Token {
        text: m.as_str(),
        start: m.start(),
    })
}

/// Split `text` on runs of `.`, `!` and `?`, dropping blank pieces
pub fn sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut result = Vec::new();
    let mut start = 0;

    for terminator in SENTENCE_BREAK_REGEX.find_iter(text) {
        push_sentence(&mut result, text, start, terminator.start());
        start = terminator.end();
    }
    push_sentence(&mut result, text, start, text.len());

    result
}

fn push_sentence<'a>(result: &mut Vec<Sentence<'a>>, text: &'a str, start: usize, end: usize) {
    let piece = &text[start..end];
    if !piece.trim().is_empty() {
        result.push(Sentence { text: piece, start });
    }
}

/// Strip scoring punctuation and lowercase
pub fn normalize_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| !TOKEN_PUNCTUATION.contains(c))
        .collect::<String>()
        .to_lowercase()
}

/// Characters that may belong to a clicked word: `[A-Za-z0-9_'’-]`
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '\u{2019}' | '-')
}

/// `[A-Za-z0-9_]`
fn is_core_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Trim leading and trailing characters outside `[A-Za-z0-9_]`
pub fn trim_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| !is_core_word_char(c))
}

/// Whether `word` contains at least one ASCII letter or digit
pub fn has_alphanumeric(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Case-insensitive whole-word search.
///
/// Returns the byte offset and the text actually matched.
pub fn find_whole_word<'a>(haystack: &'a str, word: &str) -> Option<(usize, &'a str)> {
    if word.is_empty() {
        return None;
    }

    let pattern = format!(r"\b{}\b", regex::escape(word));
    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;

    regex.find(haystack).map(|m| (m.start(), m.as_str()))
}

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the character at `char_index`, or `text.len()` past the end
pub fn char_to_byte(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Character index of the character starting at `byte_offset`
pub fn byte_to_char(text: &str, byte_offset: usize) -> usize {
    text.char_indices()
        .take_while(|(byte, _)| *byte < byte_offset)
        .count()
}
