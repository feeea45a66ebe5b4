#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rtimecompliance::core::normalize::Normalizer;
use rtimecompliance::core::source::{RawCell, RawTable};
use rtimecompliance::models::entry_type::EntryType;
use rtimecompliance::models::time_entry::TimeEntry;
use rust_decimal::Decimal;
use chrono::NaiveDate;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub fn rti() -> Command {
    cargo_bin_cmd!("rtimecompliance")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimecompliance.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub const HEADER: &str = "year,XLC Operation,OfcName,dtEndCliWorkWeek,ApplicantID,FullName,ShiftNumber,BUDeptName,RegHours,OTHours,Total Hours,ClockIn_Tries,ClockIn_Method,ClockOut_Tries,ClockOut_Method,EntryType";

/// One CSV data line in `HEADER` order.
pub fn csv_line(
    year: i32,
    site: &str,
    week_ending: &str,
    id: &str,
    name: &str,
    entry_type: &str,
    hours: &str,
) -> String {
    format!(
        "{year},{site},{site} Office,{week_ending},{id},{name},1,Packing,{hours},0,{hours},1,Finger,1,Finger,{entry_type}"
    )
}

pub fn write_csv(path: &Path, lines: &[String]) {
    let mut body = String::from(HEADER);
    body.push('\n');
    for l in lines {
        body.push_str(l);
        body.push('\n');
    }
    fs::write(path, body).expect("write csv");
}

/// Small 2025 dataset: two sites, three employees, all four entry types.
pub fn sample_lines() -> Vec<String> {
    vec![
        csv_line(2025, "Austin", "2025-01-05", "A1", "Ann Lee", "Finger", "40"),
        csv_line(2025, "Austin", "2025-01-05", "A2", "Bob Ray", "Provisional Entry", "38.5"),
        csv_line(2025, "Austin", "2025-01-12", "A2", "Bob Ray", "Provisional Entry", "40"),
        csv_line(2025, "Austin", "2025-01-19", "A2", "Bob Ray", "Provisional Entry", "40"),
        csv_line(2025, "Dallas", "2025-01-04", "D1", "Cy Moe", "Write-In", "32"),
        csv_line(2025, "Dallas", "2025-01-11", "D1", "Cy Moe", "Missing c/o", "8"),
    ]
}

/// Table with the same columns as `HEADER`, built in memory.
pub fn raw_table(lines: &[String]) -> RawTable {
    let mut t = RawTable::new(HEADER.split(',').map(String::from).collect());
    for l in lines {
        t.push_row(l.split(',').map(RawCell::text).collect());
    }
    t
}

pub fn normalizer() -> Normalizer {
    Normalizer::default()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
}

/// In-memory fact for KPI/report tests.
pub fn entry(site: &str, name: &str, kind: EntryType, week_ending: Option<&str>) -> TimeEntry {
    let mut e = TimeEntry::new(2025);
    e.site = site.to_string();
    e.office_name = site.to_string();
    e.full_name = name.to_string();
    e.employee_id = format!("ID-{name}");
    e.department = "Packing".to_string();
    e.shift = "1".to_string();
    e.entry_type = kind;
    e.week_ending = week_ending.map(date);
    let (w, y) = rtimecompliance::core::week::week_align(e.week_ending);
    e.week_number = w;
    e.week_year = y;
    e.total_hours = Decimal::from(8);
    e.regular_hours = Decimal::from(8);
    e
}

pub fn repeat(n: usize, e: TimeEntry) -> Vec<TimeEntry> {
    std::iter::repeat_n(e, n).collect()
}
