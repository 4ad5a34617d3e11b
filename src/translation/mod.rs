/*!
 * Translation support shared by reading sessions.
 *
 * - `cache`: memoized translations keyed by text, context and language pair
 * - `cancel`: tokens that let a newer lookup supersede an in-flight one
 */

pub use self::cache::TranslationCache;
pub use self::cancel::CancellationToken;

pub mod cache;
pub mod cancel;
