//! Import pipeline
//!
//! decode → reconcile headers → classify and validate every row → append the
//! whole batch. Format, column and row errors are terminal for the batch:
//! nothing is written unless every row validates. Unparseable dates are the
//! one permissive exception and degrade to the unknown-date sentinel.

use crate::db::records::append_records;
use crate::reconcile::{ColumnBinding, ColumnMapping, ColumnReconciler};
use crate::record::{DatePolicy, FieldViolation, Record};
use crate::tabular::{Table, TabularFormat};
use crate::taxonomy::{ChapterKeywordTable, ColumnAliasTable};
use crate::{Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use std::fmt;
use tracing::{info, warn};

/// Violations found in one imported data row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowViolations {
    /// 1-based data row number, header excluded
    pub row: usize,
    pub violations: Vec<FieldViolation>,
}

impl fmt::Display for RowViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        write!(f, "row {}: {}", self.row, parts.join("; "))
    }
}

/// Validated records ready to be appended
#[derive(Debug, Clone)]
pub struct ImportBatch {
    pub records: Vec<Record>,
    pub mapping: ColumnMapping,
    pub unknown_dates: usize,
}

/// Outcome of a completed import
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub rows_imported: usize,
    pub unknown_dates: usize,
    pub columns: Vec<ColumnBinding>,
}

/// Reconcile and validate an already decoded table
pub fn prepare_table(
    table: &Table,
    chapters: &ChapterKeywordTable,
    aliases: &ColumnAliasTable,
) -> Result<ImportBatch> {
    let mapping = ColumnReconciler::new(aliases).reconcile(&table.headers)?;

    let mut records = Vec::with_capacity(table.rows.len());
    let mut failures = Vec::new();
    let mut unknown_dates = 0;

    for (idx, row) in table.rows.iter().enumerate() {
        let draft = mapping.draft_from_row(row);
        match draft.validate(chapters, DatePolicy::Permissive) {
            Ok(record) => {
                if record.date.is_none() {
                    unknown_dates += 1;
                }
                records.push(record);
            }
            Err(violations) => failures.push(RowViolations {
                row: idx + 1,
                violations,
            }),
        }
    }

    if !failures.is_empty() {
        warn!(rejected = failures.len(), total = table.rows.len(), "Import rows failed validation");
        return Err(Error::InvalidRows(failures));
    }

    if unknown_dates > 0 {
        warn!(unknown_dates, "Imported rows with unrecognised dates");
    }

    Ok(ImportBatch {
        records,
        mapping,
        unknown_dates,
    })
}

/// Decode a named upload and turn it into a validated batch
pub fn prepare_import(
    filename: &str,
    bytes: &[u8],
    chapters: &ChapterKeywordTable,
    aliases: &ColumnAliasTable,
) -> Result<ImportBatch> {
    let format = TabularFormat::from_filename(filename)?;
    let table = Table::decode(format, bytes)?;
    prepare_table(&table, chapters, aliases)
}

/// Validate an upload and append all of its rows in one transaction
pub async fn import_file(
    pool: &SqlitePool,
    filename: &str,
    bytes: &[u8],
    chapters: &ChapterKeywordTable,
    aliases: &ColumnAliasTable,
) -> Result<ImportSummary> {
    let batch = prepare_import(filename, bytes, chapters, aliases)?;
    append_records(pool, &batch.records).await?;

    info!(
        filename = %filename,
        rows = batch.records.len(),
        unknown_dates = batch.unknown_dates,
        "Import complete"
    );

    Ok(ImportSummary {
        rows_imported: batch.records.len(),
        unknown_dates: batch.unknown_dates,
        columns: batch.mapping.bindings().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Field;

    fn prepare(csv: &str) -> Result<ImportBatch> {
        prepare_import(
            "upload.csv",
            csv.as_bytes(),
            &ChapterKeywordTable::builtin(),
            &ColumnAliasTable::builtin(),
        )
    }

    #[test]
    fn test_rows_are_classified_and_dated() {
        let csv = "\
test number,date,q#,topic,attempt status,is correct,level,comment,extra
4,2024-02-03,1,co ordinate geometry,Yes,Yes,Easy,Analytical,ignored
4,garbage,2,ALGEBRA,No,,Hard,Skipped,ignored
";
        let batch = prepare(csv).unwrap();

        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].chapter, "Co-ordinate Geometry");
        assert!(batch.records[0].date.is_some());
        assert_eq!(batch.records[1].chapter, "Algebra");
        assert_eq!(batch.records[1].date, None);
        assert_eq!(batch.unknown_dates, 1);
    }

    #[test]
    fn test_missing_columns_abort_before_rows() {
        let csv = "Test No.,Date,Q No.,Chapter,Attempted,Correct,Difficulty\n1,2024-01-01,1,Algebra,Yes,Yes,Easy\n";
        match prepare(csv) {
            Err(Error::MissingColumns(missing)) => assert_eq!(missing, vec![Field::Remarks]),
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        let result = prepare_import(
            "upload.txt",
            b"anything",
            &ChapterKeywordTable::builtin(),
            &ColumnAliasTable::builtin(),
        );
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_invalid_rows_are_all_reported() {
        let csv = "\
Test No.,Date,Q No.,Chapter,Attempted,Correct,Difficulty,Remarks
1,2024-01-01,1,Algebra,Yes,Yes,Easy,Analytical
1,2024-01-01,30,Algebra,Yes,Yes,Easy,Analytical
1,2024-01-01,3,astrology,Yes,Yes,Easy,Analytical
";
        match prepare(csv) {
            Err(Error::InvalidRows(rows)) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].row, 2);
                assert_eq!(rows[0].violations[0].field, Field::QNo);
                assert_eq!(rows[1].row, 3);
                assert_eq!(rows[1].violations[0].field, Field::Chapter);
            }
            other => panic!("expected InvalidRows, got {:?}", other),
        }
    }
}
