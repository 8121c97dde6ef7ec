//! Question records and their validation
//!
//! A `RecordDraft` carries raw, untrusted strings from a form or an imported
//! row. `RecordDraft::validate` turns it into a typed `Record` or reports
//! every field-level violation at once.

use crate::classifier::ChapterClassifier;
use crate::taxonomy::{ChapterKeywordTable, Field};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest question number in a test
pub const MAX_Q_NO: i64 = 25;

/// Yes/No answer used by the attempted and correct columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub const ALL: [YesNo; 2] = [YesNo::Yes, YesNo::No];

    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

/// Question difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Remark attached to a question outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Remark {
    #[serde(rename = "Silly mistake")]
    SillyMistake,
    Analytical,
    Skipped,
}

impl Remark {
    pub const ALL: [Remark; 3] = [Remark::SillyMistake, Remark::Analytical, Remark::Skipped];

    pub fn as_str(&self) -> &'static str {
        match self {
            Remark::SillyMistake => "Silly mistake",
            Remark::Analytical => "Analytical",
            Remark::Skipped => "Skipped",
        }
    }
}

macro_rules! impl_label_enum {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ty {
            /// Case-insensitive match against the display labels
            pub fn parse_label(raw: &str) -> Option<Self> {
                let trimmed = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(trimmed))
            }
        }
    };
}

impl_label_enum!(YesNo);
impl_label_enum!(Difficulty);
impl_label_enum!(Remark);

/// One answered or skipped question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub test_no: i64,
    /// `None` is the unknown-date sentinel for unparseable imported dates
    pub date: Option<NaiveDate>,
    pub q_no: i64,
    /// Always a canonical chapter name
    pub chapter: String,
    pub attempted: YesNo,
    /// `None` means not recorded, allowed only for unattempted questions
    pub correct: Option<YesNo>,
    pub difficulty: Difficulty,
    pub remarks: Remark,
}

/// How an unparseable date is treated during validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePolicy {
    /// Manual entry: the date must parse
    Strict,
    /// Import: unparseable dates become the unknown-date sentinel
    Permissive,
}

/// One field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: Field,
    pub message: String,
}

impl FieldViolation {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Raw record fields as received from a form or an imported row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    #[serde(default)]
    pub test_no: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub q_no: String,
    #[serde(default)]
    pub chapter: String,
    #[serde(default)]
    pub attempted: String,
    #[serde(default)]
    pub correct: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub remarks: String,
}

impl RecordDraft {
    /// Set a field by its canonical name
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::TestNo => self.test_no = value,
            Field::Date => self.date = value,
            Field::QNo => self.q_no = value,
            Field::Chapter => self.chapter = value,
            Field::Attempted => self.attempted = value,
            Field::Correct => self.correct = value,
            Field::Difficulty => self.difficulty = value,
            Field::Remarks => self.remarks = value,
        }
    }

    /// Classify the chapter, parse every field and collect all violations
    pub fn validate(
        &self,
        chapters: &ChapterKeywordTable,
        date_policy: DatePolicy,
    ) -> std::result::Result<Record, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        let test_no = match parse_integer(&self.test_no) {
            Some(n) if n >= 1 => Some(n),
            Some(n) => {
                violations.push(FieldViolation::new(
                    Field::TestNo,
                    format!("must be at least 1, got {}", n),
                ));
                None
            }
            None => {
                violations.push(FieldViolation::new(
                    Field::TestNo,
                    format!("not an integer: {:?}", self.test_no),
                ));
                None
            }
        };

        let date = match (parse_date(&self.date), date_policy) {
            (Some(d), _) => Some(d),
            (None, DatePolicy::Permissive) => None,
            (None, DatePolicy::Strict) => {
                violations.push(FieldViolation::new(
                    Field::Date,
                    format!("not a recognised date: {:?}", self.date),
                ));
                None
            }
        };

        let q_no = match parse_integer(&self.q_no) {
            Some(n) if (1..=MAX_Q_NO).contains(&n) => Some(n),
            Some(n) => {
                violations.push(FieldViolation::new(
                    Field::QNo,
                    format!("must be between 1 and {}, got {}", MAX_Q_NO, n),
                ));
                None
            }
            None => {
                violations.push(FieldViolation::new(
                    Field::QNo,
                    format!("not an integer: {:?}", self.q_no),
                ));
                None
            }
        };

        let classification = ChapterClassifier::new(chapters).classify_detailed(&self.chapter);
        let chapter = if classification.canonical {
            Some(classification.chapter)
        } else {
            violations.push(FieldViolation::new(
                Field::Chapter,
                format!("unknown chapter: {:?}", classification.chapter),
            ));
            None
        };

        let attempted = parse_required::<YesNo>(Field::Attempted, &self.attempted, &mut violations);
        let difficulty = parse_required::<Difficulty>(Field::Difficulty, &self.difficulty, &mut violations);
        let remarks = parse_required::<Remark>(Field::Remarks, &self.remarks, &mut violations);

        let correct = if self.correct.trim().is_empty() {
            if attempted == Some(YesNo::Yes) {
                violations.push(FieldViolation::new(
                    Field::Correct,
                    "required for attempted questions",
                ));
            }
            None
        } else {
            match YesNo::parse_label(&self.correct) {
                Some(v) => Some(v),
                None => {
                    violations.push(FieldViolation::new(
                        Field::Correct,
                        format!("expected Yes or No, got {:?}", self.correct),
                    ));
                    None
                }
            }
        };

        match (test_no, q_no, chapter, attempted, difficulty, remarks) {
            (Some(test_no), Some(q_no), Some(chapter), Some(attempted), Some(difficulty), Some(remarks))
                if violations.is_empty() =>
            {
                Ok(Record {
                    test_no,
                    date,
                    q_no,
                    chapter,
                    attempted,
                    correct,
                    difficulty,
                    remarks,
                })
            }
            _ => Err(violations),
        }
    }
}

/// Labels accepted for a required enumerated field
trait LabelField: Sized {
    fn parse(raw: &str) -> Option<Self>;
    fn expected() -> String;
}

macro_rules! impl_label_field {
    ($ty:ty) => {
        impl LabelField for $ty {
            fn parse(raw: &str) -> Option<Self> {
                <$ty>::parse_label(raw)
            }

            fn expected() -> String {
                <$ty>::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }
    };
}

impl_label_field!(YesNo);
impl_label_field!(Difficulty);
impl_label_field!(Remark);

fn parse_required<T: LabelField>(
    field: Field,
    raw: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<T> {
    let parsed = T::parse(raw);
    if parsed.is_none() {
        violations.push(FieldViolation::new(
            field,
            format!("expected one of [{}], got {:?}", T::expected(), raw),
        ));
    }
    parsed
}

/// Parse an integer cell, accepting integral decimals such as "3.0"
pub fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
        _ => None,
    }
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a date in any of the accepted spellings
///
/// Returns `None` for blank or unrecognised input.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RecordDraft {
        RecordDraft {
            test_no: "3".to_string(),
            date: "2024-05-01".to_string(),
            q_no: "12".to_string(),
            chapter: "coordinate geometry".to_string(),
            attempted: "Yes".to_string(),
            correct: "No".to_string(),
            difficulty: "Hard".to_string(),
            remarks: "Silly mistake".to_string(),
        }
    }

    #[test]
    fn test_valid_draft_produces_record() {
        let table = ChapterKeywordTable::builtin();
        let record = draft().validate(&table, DatePolicy::Strict).unwrap();

        assert_eq!(record.test_no, 3);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(record.q_no, 12);
        assert_eq!(record.chapter, "Co-ordinate Geometry");
        assert_eq!(record.attempted, YesNo::Yes);
        assert_eq!(record.correct, Some(YesNo::No));
        assert_eq!(record.difficulty, Difficulty::Hard);
        assert_eq!(record.remarks, Remark::SillyMistake);
    }

    #[test]
    fn test_all_violations_reported_together() {
        let table = ChapterKeywordTable::builtin();
        let bad = RecordDraft {
            test_no: "0".to_string(),
            date: "yesterday".to_string(),
            q_no: "26".to_string(),
            chapter: "astrology".to_string(),
            attempted: "maybe".to_string(),
            correct: "perhaps".to_string(),
            difficulty: "Brutal".to_string(),
            remarks: "".to_string(),
        };

        let violations = bad.validate(&table, DatePolicy::Strict).unwrap_err();
        let fields: Vec<Field> = violations.iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec![
                Field::TestNo,
                Field::Date,
                Field::QNo,
                Field::Chapter,
                Field::Attempted,
                Field::Difficulty,
                Field::Remarks,
                Field::Correct,
            ]
        );
    }

    #[test]
    fn test_unknown_chapter_is_a_violation() {
        let table = ChapterKeywordTable::builtin();
        let mut d = draft();
        d.chapter = "xyz unknown topic".to_string();

        let violations = d.validate(&table, DatePolicy::Strict).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, Field::Chapter);
        assert!(violations[0].message.contains("Xyz Unknown Topic"));
    }

    #[test]
    fn test_permissive_date_degrades_to_unknown() {
        let table = ChapterKeywordTable::builtin();
        let mut d = draft();
        d.date = "not a date".to_string();

        let record = d.validate(&table, DatePolicy::Permissive).unwrap();
        assert_eq!(record.date, None);

        assert!(d.validate(&table, DatePolicy::Strict).is_err());
    }

    #[test]
    fn test_correct_may_be_blank_only_when_unattempted() {
        let table = ChapterKeywordTable::builtin();
        let mut d = draft();
        d.correct = " ".to_string();

        let violations = d.validate(&table, DatePolicy::Strict).unwrap_err();
        assert_eq!(violations[0].field, Field::Correct);

        d.attempted = "No".to_string();
        let record = d.validate(&table, DatePolicy::Strict).unwrap();
        assert_eq!(record.correct, None);
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        assert_eq!(YesNo::parse_label(" yes "), Some(YesNo::Yes));
        assert_eq!(Difficulty::parse_label("MEDIUM"), Some(Difficulty::Medium));
        assert_eq!(Remark::parse_label("silly mistake"), Some(Remark::SillyMistake));
        assert_eq!(Remark::parse_label("silly"), None);
    }

    #[test]
    fn test_parse_integer_accepts_integral_decimals() {
        assert_eq!(parse_integer(" 7 "), Some(7));
        assert_eq!(parse_integer("7.0"), Some(7));
        assert_eq!(parse_integer("7.5"), None);
        assert_eq!(parse_integer(""), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date("2024-03-09"), expected);
        assert_eq!(parse_date("2024/03/09"), expected);
        assert_eq!(parse_date("03/09/2024"), expected);
        assert_eq!(parse_date("09-Mar-2024"), expected);
        assert_eq!(parse_date("9 March 2024"), expected);
        assert_eq!(parse_date("March 9, 2024"), expected);
        assert_eq!(parse_date("2024-03-09 10:15:00"), expected);
        assert_eq!(parse_date("2024-03-09T10:15:00"), expected);
        assert_eq!(parse_date("2024-13-40"), None);
        assert_eq!(parse_date("  "), None);
    }

    #[test]
    fn test_remark_serializes_with_label() {
        let json = serde_json::to_string(&Remark::SillyMistake).unwrap();
        assert_eq!(json, "\"Silly mistake\"");
    }
}
