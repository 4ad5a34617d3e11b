/*!
 * Geometric word location over positioned text fragments.
 *
 * Character positions inside a fragment are estimated from the fragment
 * width assuming every character has the same advance. The estimate only
 * seeds the fuzzy search, so it does not need exact typesetting.
 */

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::text::markers::clean_markers;
use crate::text::tokens::{is_word_char, trim_punctuation};

/// Hit-test tolerance around each fragment, in viewport units
pub const HIT_PADDING: f64 = 10.0;

/// A positioned run of text from a rendered page.
///
/// `y` is the baseline; the fragment occupies `[y - height, y]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// Build a fragment from raw extracted text, removing template markers
    pub fn sanitized(raw: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(clean_markers(raw), x, y, width, height)
    }

    fn contains(&self, x: f64, y: f64, padding: f64) -> bool {
        x >= self.x - padding
            && x <= self.x + self.width + padding
            && y >= self.y - self.height - padding
            && y <= self.y + padding
    }
}

/// Estimated box of a word on the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A word resolved from a click
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordHit {
    pub word: String,
    pub bounding_box: BoundingBox,
    /// Index of the fragment the word came from
    pub fragment_index: usize,
}

/// Join fragment texts into the page text used as matching context
pub fn page_text(fragments: &[TextFragment]) -> String {
    fragments
        .iter()
        .map(|fragment| fragment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First fragment within `padding` of the point, in extraction order
pub fn fragment_at(fragments: &[TextFragment], x: f64, y: f64, padding: f64) -> Option<usize> {
    fragments.iter().position(|fragment| fragment.contains(x, y, padding))
}

/// Resolve the word under `(x, y)` with the default padding
pub fn word_at(fragments: &[TextFragment], x: f64, y: f64) -> Option<WordHit> {
    word_at_with_padding(fragments, x, y, HIT_PADDING)
}

/// Resolve the word under `(x, y)`.
///
/// Returns `None` for negative or non-finite coordinates, when no fragment
/// is hit, when the estimated character falls outside the fragment text,
/// or when the character under the pointer is not part of a word.
pub fn word_at_with_padding(
    fragments: &[TextFragment],
    x: f64,
    y: f64,
    padding: f64,
) -> Option<WordHit> {
    if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
        debug!("Rejecting click at invalid coordinates ({}, {})", x, y);
        return None;
    }

    let fragment_index = fragment_at(fragments, x, y, padding)?;
    let fragment = &fragments[fragment_index];
    trace!("Click ({:.1}, {:.1}) hit fragment #{}: {:?}", x, y, fragment_index, fragment.text);

    let chars: Vec<char> = fragment.text.chars().collect();
    if chars.is_empty() || fragment.text.trim().is_empty() || fragment.width <= 0.0 {
        return None;
    }

    let avg_char_width = fragment.width / chars.len() as f64;
    let estimated = ((x - fragment.x) / avg_char_width).floor();
    if estimated < 0.0 || estimated >= chars.len() as f64 {
        debug!("Estimated character {} is outside {:?}", estimated, fragment.text);
        return None;
    }
    let seed = estimated as usize;

    if !is_word_char(chars[seed]) {
        trace!("Character {:?} under the pointer is not part of a word", chars[seed]);
        return None;
    }

    let mut start = seed;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = seed;
    while end + 1 < chars.len() && is_word_char(chars[end + 1]) {
        end += 1;
    }

    let span: String = chars[start..=end].iter().collect();
    let word = trim_punctuation(&span);
    if word.is_empty() {
        return None;
    }

    Some(WordHit {
        word: word.to_string(),
        bounding_box: BoundingBox {
            left: fragment.x + start as f64 * avg_char_width,
            top: fragment.y - fragment.height,
            width: (end - start + 1) as f64 * avg_char_width,
            height: fragment.height,
        },
        fragment_index,
    })
}
