//! # mocklog Common Library
//!
//! Shared code for the practice-test log:
//! - Canonical chapter and column alias tables
//! - Chapter classification and import column reconciliation
//! - Record model, validation and SQLite storage
//! - CSV/XLSX decoding, import pipeline and CSV export
//! - Per-chapter statistics
//! - Configuration loading

pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod reconcile;
pub mod record;
pub mod stats;
pub mod tabular;
pub mod taxonomy;

pub use classifier::{ChapterClassifier, Classification};
pub use error::{Error, Result};
pub use reconcile::{ColumnMapping, ColumnReconciler};
pub use record::{Difficulty, Record, RecordDraft, Remark, YesNo};
pub use stats::ChapterStats;
pub use taxonomy::{ChapterKeywordTable, ColumnAliasTable, Field};
