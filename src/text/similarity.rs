/*!
 * Bigram similarity scoring.
 *
 * Scores two strings with the Dice coefficient over their sets of
 * contiguous character pairs. The scorer is case-sensitive; callers
 * normalize (trim + lowercase) before comparing.
 */

use std::collections::HashSet;

/// Dice coefficient of the bigram sets of `a` and `b`, in `[0, 1]`.
///
/// Empty inputs score `0.0`, identical inputs score `1.0`. Strings too
/// short to form a bigram score `0.0` unless identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let bigrams_a = bigrams(a);
    let bigrams_b = bigrams(b);

    let total = bigrams_a.len() + bigrams_b.len();
    if total == 0 {
        return 0.0;
    }

    let shared = bigrams_a.intersection(&bigrams_b).count();

    (2 * shared) as f64 / total as f64
}

/// Distinct contiguous character pairs of `text`
fn bigrams(text: &str) -> HashSet<(char, char)> {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(2).map(|pair| (pair[0], pair[1])).collect()
}
