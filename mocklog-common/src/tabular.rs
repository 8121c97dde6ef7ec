//! Tabular decoding for imported files
//!
//! Two encodings are understood: CSV and XLSX. Either way the first row is the
//! header and every cell comes back as a string.

use crate::{Error, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

/// Supported import encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Csv,
    Xlsx,
}

impl TabularFormat {
    /// Pick the format from a file name extension
    ///
    /// # Errors
    /// `Error::UnsupportedFormat` for anything other than `.csv` or `.xlsx`.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(TabularFormat::Csv),
            "xlsx" => Ok(TabularFormat::Xlsx),
            _ => Err(Error::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// A decoded table: header row plus data rows of string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Decode `bytes` in the given format
    pub fn decode(format: TabularFormat, bytes: &[u8]) -> Result<Self> {
        let table = match format {
            TabularFormat::Csv => Self::from_csv(bytes)?,
            TabularFormat::Xlsx => Self::from_xlsx(bytes)?,
        };
        debug!(
            format = ?format,
            columns = table.headers.len(),
            rows = table.rows.len(),
            "Decoded import table"
        );
        Ok(table)
    }

    /// Decode CSV; ragged rows are allowed, blank rows skipped
    pub fn from_csv(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::Tabular(format!("Failed to read CSV header: {}", e)))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result
                .map_err(|e| Error::Tabular(format!("Failed to read CSV row {}: {}", idx + 1, e)))?;
            let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            if !is_blank(&row) {
                rows.push(row);
            }
        }

        Ok(Self { headers, rows })
    }

    /// Decode the first worksheet of an XLSX workbook
    pub fn from_xlsx(bytes: &[u8]) -> Result<Self> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| Error::Tabular(format!("Failed to open workbook: {}", e)))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let Some(first) = sheet_names.first() else {
            return Err(Error::Tabular("Workbook has no worksheets".to_string()));
        };
        if sheet_names.len() > 1 {
            warn!(sheet = %first, ignored = sheet_names.len() - 1, "Importing first worksheet only");
        }

        let range = workbook
            .worksheet_range(first)
            .map_err(|e| Error::Tabular(format!("Failed to read worksheet {}: {}", first, e)))?;

        let mut rows_iter = range.rows();
        let headers: Vec<String> = match rows_iter.next() {
            Some(row) => row.iter().map(cell_to_string).collect(),
            None => Vec::new(),
        };

        let rows = rows_iter
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
            .filter(|row| !is_blank(row))
            .collect();

        Ok(Self { headers, rows })
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

/// Render a spreadsheet cell the way a text-typed read would
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{:?}", e),
    }
}

/// Convert a 1900-system spreadsheet serial number to a calendar date
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    // Day zero is 1899-12-30 once the fictitious 1900-02-29 is accounted for
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}
