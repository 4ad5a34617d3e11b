/*!
 * Paragraph-level alignment against a precomputed table.
 *
 * A table is an ordered list of source/target paragraph pairs prepared for
 * one document. Given the text around a clicked word, the aligner picks the
 * source paragraph with the highest bigram similarity and answers with its
 * paired target paragraph.
 */

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::AlignmentError;
use crate::text::similarity;

/// Minimum similarity for a paragraph match to be accepted
pub const PARAGRAPH_MIN_SCORE: f64 = 0.7;

/// One source/target paragraph pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedParagraph {
    #[serde(alias = "english")]
    pub source: String,
    #[serde(alias = "russian")]
    pub target: String,
}

impl AlignedParagraph {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// The winning paragraph of a lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphMatch {
    /// Ordinal of the entry in the table
    pub index: usize,
    pub source: String,
    pub target: String,
    pub score: f64,
}

/// Ordered, immutable collection of aligned paragraphs for one document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AlignmentTable {
    entries: Vec<AlignedParagraph>,
}

/// Accepted wire shapes for a table
#[derive(Deserialize)]
#[serde(untagged)]
enum TablePayload {
    List(Vec<AlignedParagraph>),
    Indexed(BTreeMap<String, AlignedParagraph>),
}

impl AlignmentTable {
    pub fn new(entries: Vec<AlignedParagraph>) -> Self {
        Self { entries }
    }

    /// Pair paragraphs of two parallel texts by ordinal.
    ///
    /// Paragraphs are separated by blank lines; empty ones are dropped and
    /// surplus paragraphs of the longer text are ignored.
    pub fn from_parallel_texts(source: &str, target: &str) -> Self {
        let source_paragraphs = split_paragraphs(source);
        let target_paragraphs = split_paragraphs(target);

        if source_paragraphs.len() != target_paragraphs.len() {
            debug!(
                "Paragraph count mismatch ({} vs {}), pairing the first {}",
                source_paragraphs.len(),
                target_paragraphs.len(),
                source_paragraphs.len().min(target_paragraphs.len())
            );
        }

        let entries = source_paragraphs
            .into_iter()
            .zip(target_paragraphs)
            .map(|(source, target)| AlignedParagraph::new(source, target))
            .collect();

        Self { entries }
    }

    /// Parse a table from JSON.
    ///
    /// Accepts a list of `{source, target}` objects or an object keyed by
    /// paragraph ordinal (`{"0": {"english": …, "russian": …}}`), which is
    /// ordered by numeric key.
    pub fn from_json(json: &str) -> Result<Self, AlignmentError> {
        let payload: TablePayload = serde_json::from_str(json)
            .map_err(|e| AlignmentError::Malformed(e.to_string()))?;

        let entries = match payload {
            TablePayload::List(entries) => entries,
            TablePayload::Indexed(map) => {
                let mut keyed = Vec::with_capacity(map.len());
                for (key, entry) in map {
                    let ordinal: usize = key
                        .trim()
                        .parse()
                        .map_err(|_| AlignmentError::InvalidKey(key.clone()))?;
                    keyed.push((ordinal, entry));
                }
                keyed.sort_by_key(|(ordinal, _)| *ordinal);
                keyed.into_iter().map(|(_, entry)| entry).collect()
            }
        };

        Ok(Self { entries })
    }

    pub fn to_json(&self) -> Result<String, AlignmentError> {
        serde_json::to_string_pretty(self).map_err(|e| AlignmentError::Malformed(e.to_string()))
    }

    pub fn entries(&self) -> &[AlignedParagraph] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best paragraph for `context` using the default acceptance threshold
    pub fn find_best_paragraph(&self, context: &str) -> Option<ParagraphMatch> {
        find_best_paragraph(context, &self.entries, PARAGRAPH_MIN_SCORE)
    }
}

/// Scan every entry for the source paragraph most similar to `context`.
///
/// Both sides are trimmed and lowercased before scoring. On equal scores the
/// earlier entry is kept. Returns `None` for an empty table or when the best
/// score is below `min_score`.
pub fn find_best_paragraph(
    context: &str,
    table: &[AlignedParagraph],
    min_score: f64,
) -> Option<ParagraphMatch> {
    let normalized_context = normalize(context);
    let mut best: Option<(usize, f64)> = None;

    for (index, entry) in table.iter().enumerate() {
        let score = similarity(&normalized_context, &normalize(&entry.source));
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    let (index, score) = best?;
    if score < min_score {
        debug!("Best paragraph #{} scored {:.3}, below {:.2}", index, score, min_score);
        return None;
    }

    debug!("Paragraph #{} matched with score {:.3}", index, score);
    let entry = &table[index];

    Some(ParagraphMatch {
        index,
        source: entry.source.clone(),
        target: entry.target.clone(),
        score,
    })
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn split_paragraphs(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
