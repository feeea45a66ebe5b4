//! Source file readers.
//!
//! Both CSV and Excel exports are read into the same [`RawTable`]: the header
//! row as written by the exporting site, then every data row as typed cells.
//! Nothing is interpreted here; column names and values are resolved by the
//! normalizer.

use crate::errors::{AppError, AppResult};
use crate::models::upload::FileKind;
use crate::utils::excel_date::excel_serial_to_datetime;
use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDateTime;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl RawCell {
    /// Text cell, or `Empty` when blank.
    pub fn text(s: &str) -> Self {
        let t = s.trim();
        if t.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(t.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row; short rows are padded with empty cells.
    pub fn push_row(&mut self, mut row: Vec<RawCell>) {
        if row.len() < self.headers.len() {
            row.resize(self.headers.len(), RawCell::Empty);
        }
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Read a source file. Structural problems (missing file, bad workbook,
/// malformed CSV) are reported as [`AppError::SourceFormat`].
pub fn read_source(path: &Path, kind: FileKind) -> AppResult<RawTable> {
    if !path.exists() {
        return Err(AppError::SourceFormat(format!(
            "file not found: {}",
            path.display()
        )));
    }

    match kind {
        FileKind::Csv => read_csv(path),
        FileKind::Excel => read_excel(path),
    }
}

pub fn read_csv(path: &Path) -> AppResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)?;

    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| clean_header(&String::from_utf8_lossy(h)))
        .collect();

    // zero-byte file: reported as empty input by the pipeline
    if headers.is_empty() {
        return Ok(RawTable::default());
    }

    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::SourceFormat(format!(
            "missing header row in {}",
            path.display()
        )));
    }

    let mut table = RawTable::new(headers);

    for record in rdr.byte_records() {
        let record = record?;
        let row: Vec<RawCell> = record
            .iter()
            .map(|c| RawCell::text(&String::from_utf8_lossy(c)))
            .collect();

        if row.iter().all(RawCell::is_empty) {
            continue;
        }
        table.push_row(row);
    }

    Ok(table)
}

pub fn read_excel(path: &Path) -> AppResult<RawTable> {
    let mut workbook = open_workbook_auto(path)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::SourceFormat(format!("no worksheet in {}", path.display())))??;

    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(first) => first.iter().map(|c| clean_header(&c.to_string())).collect(),
        None => return Ok(RawTable::default()),
    };

    let mut table = RawTable::new(headers);

    for r in rows {
        let row: Vec<RawCell> = r.iter().map(excel_cell).collect();
        if row.iter().all(RawCell::is_empty) {
            continue;
        }
        table.push_row(row);
    }

    Ok(table)
}

fn excel_cell(c: &Data) -> RawCell {
    match c {
        Data::Empty | Data::Error(_) => RawCell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::text(s),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map(RawCell::DateTime)
            .unwrap_or(RawCell::Empty),
    }
}

/// Trim blanks and a UTF-8 byte-order mark from a header cell.
fn clean_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_string()
}
