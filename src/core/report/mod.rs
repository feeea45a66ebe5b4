//! Compliance workbook model.
//!
//! Builders here only aggregate: a [`Report`] is a list of named sheets of
//! typed cells. Rendering it (styles, widths, number formats) is done by
//! `export::xlsx`.

pub mod sheets;
pub mod weekly;

use crate::models::time_entry::TimeEntry;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// More provisional entries than this means the employee must be enrolled
/// for fingerprint clocking.
pub const ENROLLMENT_THRESHOLD: usize = 2;

pub const ENROLLMENT_HEADER: &str = "Enrollment of Fingerprint Needed";

/// Excel refuses longer sheet names.
pub const MAX_SHEET_NAME: usize = 31;

pub fn enrollment_needed(provisional_count: usize) -> bool {
    provisional_count > ENROLLMENT_THRESHOLD
}

pub fn enrollment_flag(provisional_count: usize) -> Cell {
    Cell::text(if enrollment_needed(provisional_count) {
        "Yes"
    } else {
        ""
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Decimal(Decimal),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn count(n: usize) -> Self {
        Cell::Int(n as i64)
    }

    pub fn date(d: Option<NaiveDate>) -> Self {
        d.map(Cell::Date).unwrap_or(Cell::Empty)
    }

    /// Plain text rendering (used for column widths and tests).
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Decimal(d) => d.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Single-column placeholder written when a sheet has nothing to show.
    pub fn no_data(name: &str, message: &str) -> Self {
        let mut s = Self::new(name, &["No Data"]);
        s.rows.push(vec![Cell::text(message)]);
        s
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cell at `row` under `header`.
    pub fn cell(&self, row: usize, header: &str) -> Option<&Cell> {
        self.rows.get(row)?.get(self.column(header)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub sheets: Vec<Sheet>,
}

impl Report {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Inputs besides the facts themselves.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub year: i32,
    /// Applied filter criteria, as `(name, value)`.
    pub filters: Vec<(String, String)>,
    pub generated_at: NaiveDateTime,
}

/// All legacy sheets: metadata, directions, data, pivots, one per site.
pub fn full_report(entries: &[TimeEntry], ctx: &ReportContext) -> Report {
    let mut names = SheetNames::default();
    let mut report = Report::default();

    for sheet in [
        sheets::checking_the_file(entries, ctx),
        sheets::directions(),
        sheets::data(entries),
        sheets::all_pivot(entries),
        sheets::prov_weekly(entries),
        sheets::write_ins(entries),
        sheets::provisional_detail(entries),
    ] {
        names.reserve(&sheet.name);
        report.sheets.push(sheet);
    }

    for mut sheet in sheets::site_sheets(entries) {
        sheet.name = names.claim(&sheet.name);
        report.sheets.push(sheet);
    }

    report
}

/// Summary KPIs and the week-by-week table.
pub fn weekly_summary(entries: &[TimeEntry], ctx: &ReportContext) -> Report {
    Report {
        sheets: vec![weekly::summary(entries, ctx), weekly::weekly_trends(entries)],
    }
}

/// Excel-safe sheet name: `:\/?*[]` become `-`, at most 31 characters.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            ':' | '\\' | '/' | '?' | '*' | '[' | ']' => '-',
            other => other,
        })
        .take(MAX_SHEET_NAME)
        .collect();

    if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

/// Sheet names already used in a workbook (Excel compares them
/// case-insensitively).
#[derive(Debug, Default)]
pub struct SheetNames {
    taken: HashSet<String>,
}

impl SheetNames {
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_lowercase());
    }

    /// Sanitised, unique variant of `name`: `Name`, `Name (2)`, `Name (3)`…
    pub fn claim(&mut self, name: &str) -> String {
        let base = sanitize_sheet_name(name);
        let mut candidate = base.clone();
        let mut n = 2;

        while self.taken.contains(&candidate.to_lowercase()) {
            let suffix = format!(" ({n})");
            let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
            candidate = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
            n += 1;
        }

        self.reserve(&candidate);
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_names_are_cleaned_and_truncated() {
        assert_eq!(sanitize_sheet_name("A/B:C"), "A-B-C");
        let long = "x".repeat(40);
        assert_eq!(sanitize_sheet_name(&long).chars().count(), MAX_SHEET_NAME);
    }

    #[test]
    fn duplicate_sheet_names_get_a_suffix() {
        let mut names = SheetNames::default();
        names.reserve("Data");
        assert_eq!(names.claim("data"), "data (2)");
        assert_eq!(names.claim("Data"), "Data (3)");
        assert_eq!(names.claim("Austin"), "Austin");
    }

    #[test]
    fn enrollment_threshold_is_strict() {
        assert!(!enrollment_needed(2));
        assert!(enrollment_needed(3));
    }
}
