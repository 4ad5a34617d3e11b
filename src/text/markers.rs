/*!
 * Template-marker cleaning for extracted page text.
 *
 * Rendered documents sometimes carry leftover template tags (`{% if … %}`,
 * `{{ … }}` and bracketed variants) inside their text runs. They are removed
 * before text is matched, cached or sent for translation.
 */

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

/// Marker patterns, applied in order
static MARKER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\[\{%.*?%\}\]",
        r"\{%\s*if\s+has_mapping\s*%\}",
        r"\{%\s*endif\s*%\}",
        r"\{\{%.*?%\}\}",
        r"\{%.*?%\}",
        r"\{\{.*?\}\}",
        r"\[%.*?%\]",
        r"\[\{\{.*?\}\}\]",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid marker regex"))
    .collect()
});

/// Dangling fragments left behind by partially rendered markers
const STRAY_LITERALS: &[&str] = &["{{% endif %", "{{% if", "%}}"];

/// Remove template markers from `text` and trim the result.
///
/// The result is a fixed point: cleaning it again returns it unchanged.
pub fn clean_markers(text: &str) -> String {
    let mut current = text.to_string();

    loop {
        let next = clean_once(&current);
        if next == current {
            return next;
        }
        trace!("Marker pass shortened text from {} to {} bytes", current.len(), next.len());
        current = next;
    }
}

/// Whether `text` still contains anything `clean_markers` would remove
pub fn has_markers(text: &str) -> bool {
    clean_once(text) != text
}

fn clean_once(text: &str) -> String {
    let mut cleaned = text.to_string();

    for pattern in MARKER_PATTERNS.iter() {
        if pattern.is_match(&cleaned) {
            cleaned = pattern.replace_all(&cleaned, "").into_owned();
        }
    }

    for literal in STRAY_LITERALS {
        if cleaned.contains(literal) {
            cleaned = cleaned.replace(literal, "");
        }
    }

    cleaned.trim().to_string()
}
