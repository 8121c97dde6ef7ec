//! CSV export of stored records
//!
//! Writes the canonical header row followed by one line per record. Unknown
//! dates and unrecorded correctness become empty cells, so an export can be
//! imported again unchanged.

use crate::record::Record;
use crate::taxonomy::Field;
use crate::{Error, Result};

/// Render records as CSV bytes
pub fn records_to_csv(records: &[Record]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(Field::ALL.iter().map(|f| f.header()))
        .map_err(csv_error)?;

    for record in records {
        let date = record
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let test_no = record.test_no.to_string();
        let q_no = record.q_no.to_string();

        writer
            .write_record([
                test_no.as_str(),
                date.as_str(),
                q_no.as_str(),
                record.chapter.as_str(),
                record.attempted.as_str(),
                record.correct.map(|c| c.as_str()).unwrap_or(""),
                record.difficulty.as_str(),
                record.remarks.as_str(),
            ])
            .map_err(csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("CSV flush failed: {}", e)))
}

fn csv_error(e: csv::Error) -> Error {
    Error::Internal(format!("CSV write failed: {}", e))
}
