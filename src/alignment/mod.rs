/*!
 * Cross-lingual alignment engine.
 *
 * - `paragraph`: best paragraph lookup in a precomputed alignment table
 * - `geometry`: word under a click in positioned text fragments
 * - `matcher`: fuzzy location of a word in a translated text
 */

pub mod geometry;
pub mod matcher;
pub mod paragraph;

pub use self::geometry::{BoundingBox, TextFragment, WordHit, page_text, word_at};
pub use self::matcher::{MatchQuery, MatchResult, MatchSettings, MatchStrategy, Matcher, locate};
pub use self::paragraph::{AlignedParagraph, AlignmentTable, ParagraphMatch, find_best_paragraph};
