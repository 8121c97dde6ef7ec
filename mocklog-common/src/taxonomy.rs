//! Canonical taxonomy tables
//!
//! The chapter keyword table and the column alias table are read-only data
//! built once at startup and passed by reference into the classifier and the
//! reconciler. Both keep their definition order, which decides first-match
//! behaviour.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical record fields, in schema order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    TestNo,
    Date,
    QNo,
    Chapter,
    Attempted,
    Correct,
    Difficulty,
    Remarks,
}

impl Field {
    /// Every field in schema order
    pub const ALL: [Field; 8] = [
        Field::TestNo,
        Field::Date,
        Field::QNo,
        Field::Chapter,
        Field::Attempted,
        Field::Correct,
        Field::Difficulty,
        Field::Remarks,
    ];

    /// Header used for this field in stored and exported tables
    pub fn header(&self) -> &'static str {
        match self {
            Field::TestNo => "Test No.",
            Field::Date => "Date",
            Field::QNo => "Q No.",
            Field::Chapter => "Chapter",
            Field::Attempted => "Attempted",
            Field::Correct => "Correct",
            Field::Difficulty => "Difficulty",
            Field::Remarks => "Remarks",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One canonical chapter and the lowercase substrings that identify it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterKeywords {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Canonical chapter name → ordered keyword list
///
/// Iteration order is definition order. The classifier returns the first
/// chapter with any matching keyword, so reordering entries changes results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterKeywordTable {
    entries: Vec<ChapterKeywords>,
}

const BUILTIN_CHAPTERS: &[(&str, &[&str])] = &[
    ("Data Interpretation", &["data", "interpretation"]),
    ("Algebra", &["algebra"]),
    ("Average", &["average"]),
    ("Co-ordinate Geometry", &["co-ordinate", "coordinate", "co ordinate"]),
    ("Geometry(Circles)", &["geometry(circles)", "circle"]),
    ("Geometry(Triangles)", &["geometry(triangles)", "triangle"]),
    ("Mensuration", &["mensuration"]),
    ("Geometry", &["geometry"]),
    ("SI/CI", &["si", "ci", "compound", "interest"]),
    ("Time,Speed&Distance", &["time", "speed", "distance"]),
    ("Mixtures&Alligations", &["mixture", "alligation"]),
    ("Ratio&Porportions", &["ratio", "proportion"]),
    ("Simplification", &["simplification"]),
    ("Boats&Streams", &["boat", "stream"]),
    ("Time&Work", &["time", "work"]),
    ("Trignometry", &["trigno", "trig"]),
    ("Heights&Distances", &["height", "distance"]),
    ("Number System", &["number system"]),
    ("Percentages,Profit &Loss", &["percent", "profit", "loss"]),
    ("Pipes & Cisterns", &["pipe", "cistern"]),
];

impl ChapterKeywordTable {
    /// Built-in chapter table
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_CHAPTERS
                .iter()
                .map(|(name, keywords)| ChapterKeywords {
                    name: (*name).to_string(),
                    keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Build a table from configured entries
    ///
    /// Keywords are trimmed and lower-cased. Names must be unique and every
    /// chapter needs at least one non-empty keyword.
    pub fn from_entries(entries: Vec<ChapterKeywords>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::Config("chapter table must not be empty".to_string()));
        }

        let mut normalized: Vec<ChapterKeywords> = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry.name.trim().to_string();
            if name.is_empty() {
                return Err(Error::Config("chapter name must not be empty".to_string()));
            }
            if normalized.iter().any(|e| e.name == name) {
                return Err(Error::Config(format!("duplicate chapter: {}", name)));
            }

            let keywords: Vec<String> = entry
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            if keywords.is_empty() {
                return Err(Error::Config(format!("chapter {} has no keywords", name)));
            }

            normalized.push(ChapterKeywords { name, keywords });
        }

        Ok(Self { entries: normalized })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChapterKeywords> {
        self.entries.iter()
    }

    /// Canonical chapter names in table order
    pub fn chapter_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// True when `name` is exactly one of the canonical chapters
    pub fn is_canonical(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ChapterKeywordTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Canonical field → header aliases accepted from imported files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAliasTable {
    entries: Vec<(Field, Vec<String>)>,
}

impl ColumnAliasTable {
    /// Built-in alias table
    pub fn builtin() -> Self {
        let table: [(Field, &[&str]); 8] = [
            (Field::TestNo, &["test no", "test number", "test_no", "Test No."]),
            (Field::Date, &["date"]),
            (Field::QNo, &["q no", "question number", "q#", "Q No."]),
            (Field::Chapter, &["chapter", "topic"]),
            (Field::Attempted, &["attempted", "attempt status"]),
            (Field::Correct, &["correct", "correct answer", "is correct"]),
            (Field::Difficulty, &["difficulty", "level"]),
            (Field::Remarks, &["remarks", "comment", "note"]),
        ];

        Self {
            entries: table
                .iter()
                .map(|(field, aliases)| {
                    (*field, aliases.iter().map(|a| (*a).to_string()).collect())
                })
                .collect(),
        }
    }

    /// Fields with their aliases, in schema order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &[String])> {
        self.entries.iter().map(|(f, a)| (*f, a.as_slice()))
    }

    pub fn aliases(&self, field: Field) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, a)| a.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for ColumnAliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}
