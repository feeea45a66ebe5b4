use super::entry_type::EntryType;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

/// One normalized fact: an employee's clock record for one work week at one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEntry {
    pub id: Option<i64>, // ⇔ time_entries.id, None until stored
    pub year: i32,       // reporting year, key of replace-for-year

    pub office_name: String, // ⇔ OfcName
    pub site: String,        // ⇔ XLC Operation, the site used for grouping

    pub week_ending: Option<NaiveDate>, // site-local week-ending date
    pub work_date: Option<NaiveDate>,
    pub date_range: String,

    // ISO coordinates derived from `week_ending`
    pub week_number: Option<u32>,
    pub week_year: Option<i32>,

    pub employee_id: String,
    pub last_name: String,
    pub first_name: String,
    pub full_name: String,
    pub employee_type_id: String,

    pub shift: String,
    pub department: String,
    pub allocation_method: String,

    pub time_start: Option<NaiveDateTime>,
    pub time_end: Option<NaiveDateTime>,

    pub regular_hours: Decimal,
    pub overtime_hours: Decimal,
    pub double_time_hours: Decimal,
    pub holiday_hours: Decimal,
    pub total_hours: Decimal, // as exported, never recomputed

    pub clock_in_local: String,
    pub clock_in_tries: i64,
    pub clock_in_method: String,
    pub clock_out_local: String,
    pub clock_out_tries: i64,
    pub clock_out_method: String,

    pub entry_type: EntryType,
}

impl TimeEntry {
    /// Empty fact for `year` with the schema defaults applied.
    pub fn new(year: i32) -> Self {
        Self {
            id: None,
            year,
            office_name: String::new(),
            site: String::new(),
            week_ending: None,
            work_date: None,
            date_range: String::new(),
            week_number: None,
            week_year: None,
            employee_id: String::new(),
            last_name: String::new(),
            first_name: String::new(),
            full_name: String::new(),
            employee_type_id: String::new(),
            shift: String::new(),
            department: String::new(),
            allocation_method: String::new(),
            time_start: None,
            time_end: None,
            regular_hours: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            double_time_hours: Decimal::ZERO,
            holiday_hours: Decimal::ZERO,
            total_hours: Decimal::ZERO,
            clock_in_local: String::new(),
            clock_in_tries: 1,
            clock_in_method: String::new(),
            clock_out_local: String::new(),
            clock_out_tries: 1,
            clock_out_method: String::new(),
            entry_type: EntryType::Other(String::new()),
        }
    }

    pub fn week_ending_str(&self) -> String {
        self.week_ending
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}
