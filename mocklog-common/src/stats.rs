//! Per-chapter performance statistics
//!
//! Recomputed from the full record set on every call; nothing is cached.
//!
//! Percentages are rounded half away from zero to two decimal places
//! (`f64::round` on the value scaled by 100). Every ratio with a zero
//! denominator is reported as 0.

use crate::record::{Record, Remark, YesNo};
use serde::Serialize;
use std::collections::HashMap;

/// Marks awarded for a correct answer
pub const MARKS_CORRECT: i64 = 2;
/// Marks deducted for an incorrect answer
pub const MARKS_INCORRECT: i64 = 5;

/// Aggregate metrics for one chapter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterStats {
    pub chapter: String,
    pub total_questions: usize,
    pub attempted: usize,
    pub correct: usize,
    /// Every record marked not correct, attempted or not
    pub incorrect: usize,
    pub accuracy_pct: f64,
    pub score: i64,
    pub score_pct: f64,
    pub unattempted: usize,
    pub unattempted_rate_pct: f64,
    /// Skipped remarks among unattempted questions
    pub skipped_pct: f64,
    /// Share of all records across every chapter
    pub topic_pct: f64,
}

#[derive(Debug, Default)]
struct Tally {
    total: usize,
    attempted: usize,
    correct: usize,
    incorrect: usize,
    unattempted: usize,
    skipped: usize,
}

impl Tally {
    fn add(&mut self, record: &Record) {
        self.total += 1;
        match record.attempted {
            YesNo::Yes => self.attempted += 1,
            YesNo::No => {
                self.unattempted += 1;
                if record.remarks == Remark::Skipped {
                    self.skipped += 1;
                }
            }
        }
        // Counted independently of `attempted`: an unattempted record marked
        // not correct lands in both `unattempted` and `incorrect`.
        match record.correct {
            Some(YesNo::Yes) => self.correct += 1,
            Some(YesNo::No) => self.incorrect += 1,
            None => {}
        }
    }

    fn finish(self, chapter: String, total_questions_all: usize) -> ChapterStats {
        let score = MARKS_CORRECT * self.correct as i64 - MARKS_INCORRECT * self.incorrect as i64;
        let max_score = self.total as i64 * MARKS_CORRECT;

        ChapterStats {
            chapter,
            total_questions: self.total,
            attempted: self.attempted,
            correct: self.correct,
            incorrect: self.incorrect,
            accuracy_pct: percent(self.correct as f64, self.attempted as f64),
            score,
            score_pct: percent(score as f64, max_score as f64),
            unattempted: self.unattempted,
            unattempted_rate_pct: percent(self.unattempted as f64, self.total as f64),
            skipped_pct: percent(self.skipped as f64, self.unattempted as f64),
            topic_pct: percent(self.total as f64, total_questions_all as f64),
        }
    }
}

/// Compute one `ChapterStats` per chapter, in first-encountered order
///
/// An empty record set yields an empty vector.
pub fn compute(records: &[Record]) -> Vec<ChapterStats> {
    let mut order: Vec<(String, Tally)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = match index.get(record.chapter.as_str()) {
            Some(&i) => i,
            None => {
                order.push((record.chapter.clone(), Tally::default()));
                index.insert(record.chapter.as_str(), order.len() - 1);
                order.len() - 1
            }
        };
        order[slot].1.add(record);
    }

    let total_questions_all = records.len();
    order
        .into_iter()
        .map(|(chapter, tally)| tally.finish(chapter, total_questions_all))
        .collect()
}

/// `numerator / denominator * 100`, rounded to 2 places; 0 when dividing by zero
pub fn percent(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    round2(numerator / denominator * 100.0)
}

/// Round half away from zero to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Difficulty;

    fn record(chapter: &str, attempted: YesNo, correct: Option<YesNo>, remarks: Remark) -> Record {
        Record {
            test_no: 1,
            date: None,
            q_no: 1,
            chapter: chapter.to_string(),
            attempted,
            correct,
            difficulty: Difficulty::Medium,
            remarks,
        }
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(compute(&[]).is_empty());
    }

    #[test]
    fn test_first_encountered_order() {
        let records = vec![
            record("Geometry", YesNo::Yes, Some(YesNo::Yes), Remark::Analytical),
            record("Algebra", YesNo::Yes, Some(YesNo::Yes), Remark::Analytical),
            record("Geometry", YesNo::No, None, Remark::Skipped),
            record("Average", YesNo::Yes, Some(YesNo::No), Remark::SillyMistake),
        ];
        let chapters: Vec<String> = compute(&records).into_iter().map(|s| s.chapter).collect();
        assert_eq!(chapters, vec!["Geometry", "Algebra", "Average"]);
    }

    #[test]
    fn test_unattempted_marked_incorrect_is_double_counted() {
        let records = vec![record("Algebra", YesNo::No, Some(YesNo::No), Remark::Skipped)];
        let stats = &compute(&records)[0];

        assert_eq!(stats.unattempted, 1);
        assert_eq!(stats.incorrect, 1);
        assert_eq!(stats.attempted, 0);
        assert_eq!(stats.score, -5);
        assert_eq!(stats.accuracy_pct, 0.0);
        assert_eq!(stats.score_pct, -250.0);
    }

    #[test]
    fn test_zero_denominators_report_zero() {
        let records = vec![record("Algebra", YesNo::Yes, Some(YesNo::Yes), Remark::Analytical)];
        let stats = &compute(&records)[0];

        assert_eq!(stats.unattempted, 0);
        assert_eq!(stats.skipped_pct, 0.0);
        assert_eq!(stats.unattempted_rate_pct, 0.0);
        assert_eq!(stats.accuracy_pct, 100.0);
        assert_eq!(stats.score_pct, 100.0);
        assert_eq!(stats.topic_pct, 100.0);
    }

    #[test]
    fn test_skipped_only_counts_unattempted() {
        let records = vec![
            // Attempted but remarked as skipped: ignored by skip rate
            record("Algebra", YesNo::Yes, Some(YesNo::Yes), Remark::Skipped),
            record("Algebra", YesNo::No, None, Remark::Skipped),
            record("Algebra", YesNo::No, None, Remark::Analytical),
        ];
        let stats = &compute(&records)[0];
        assert_eq!(stats.skipped_pct, 50.0);
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(12.5), 12.5);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(33.333_333), 33.33);
    }

    #[test]
    fn test_percent_guards_division_by_zero() {
        assert_eq!(percent(5.0, 0.0), 0.0);
        assert_eq!(percent(1.0, 3.0), 33.33);
    }
}
