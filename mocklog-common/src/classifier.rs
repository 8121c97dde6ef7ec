//! Chapter classifier
//!
//! Maps free-text chapter labels onto the canonical chapter taxonomy by
//! substring keyword matching. First match in table order wins; there is no
//! best-match scoring.

use crate::taxonomy::ChapterKeywordTable;
use serde::Serialize;
use tracing::debug;

/// Outcome of classifying one label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Canonical chapter, or the title-cased input when nothing matched
    pub chapter: String,
    /// False when `chapter` is the title-cased fallback
    pub canonical: bool,
}

/// Keyword classifier over an injected chapter table
#[derive(Debug, Clone, Copy)]
pub struct ChapterClassifier<'a> {
    table: &'a ChapterKeywordTable,
}

impl<'a> ChapterClassifier<'a> {
    pub fn new(table: &'a ChapterKeywordTable) -> Self {
        Self { table }
    }

    /// Classify a raw label, returning the chapter name only
    ///
    /// Never fails. A label with no keyword hit comes back title-cased, which
    /// is not a canonical chapter and must be rejected by validation.
    pub fn classify(&self, raw: &str) -> String {
        self.classify_detailed(raw).chapter
    }

    /// Classify a raw label and report whether the result is canonical
    pub fn classify_detailed(&self, raw: &str) -> Classification {
        let normalized = raw.trim().to_lowercase();

        for entry in self.table.iter() {
            if let Some(keyword) = entry
                .keywords
                .iter()
                .find(|k| normalized.contains(k.as_str()))
            {
                debug!(input = %raw, chapter = %entry.name, keyword = %keyword, "Classified chapter");
                return Classification {
                    chapter: entry.name.clone(),
                    canonical: true,
                };
            }
        }

        debug!(input = %raw, "No chapter keyword matched, using title case");
        Classification {
            chapter: title_case(&normalized),
            canonical: false,
        }
    }
}

/// Upper-case every character that follows an uncased one, lower-case the rest
///
/// "co-op basics" becomes "Co-Op Basics". Only cased characters continue a
/// word, so "中a x" becomes "中A X".
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_is_cased = false;

    for c in input.chars() {
        if prev_is_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_is_cased = c.is_lowercase() || c.is_uppercase();
    }

    out
}
