/*!
 * Text primitives shared by the alignment engine.
 *
 * - `markers`: removal of template-marker debris from extracted page text
 * - `similarity`: bigram Dice coefficient
 * - `tokens`: whitespace tokens with offsets, sentence spans, word classes
 */

pub mod markers;
pub mod similarity;
pub mod tokens;

pub use markers::clean_markers;
pub use similarity::similarity;
