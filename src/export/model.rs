// src/export/model.rs

use crate::models::time_entry::TimeEntry;
use rust_decimal::Decimal;
use serde::Serialize;

/// Flat, export-friendly view of a fact row.
#[derive(Debug, Clone, Serialize)]
pub struct FactExport {
    pub id: i64,
    pub year: i32,
    pub office_name: String,
    pub site: String,
    pub week_ending: String,
    pub week_number: Option<u32>,
    pub week_year: Option<i32>,
    pub employee_id: String,
    pub full_name: String,
    pub shift: String,
    pub department: String,
    pub entry_type: String,
    pub regular_hours: Decimal,
    pub overtime_hours: Decimal,
    pub total_hours: Decimal,
    pub clock_in_tries: i64,
    pub clock_in_method: String,
    pub clock_out_tries: i64,
    pub clock_out_method: String,
}

impl From<&TimeEntry> for FactExport {
    fn from(e: &TimeEntry) -> Self {
        Self {
            id: e.id.unwrap_or_default(),
            year: e.year,
            office_name: e.office_name.clone(),
            site: e.site.clone(),
            week_ending: e.week_ending_str(),
            week_number: e.week_number,
            week_year: e.week_year,
            employee_id: e.employee_id.clone(),
            full_name: e.full_name.clone(),
            shift: e.shift.clone(),
            department: e.department.clone(),
            entry_type: e.entry_type.to_db_str().to_string(),
            regular_hours: e.regular_hours,
            overtime_hours: e.overtime_hours,
            total_hours: e.total_hours,
            clock_in_tries: e.clock_in_tries,
            clock_in_method: e.clock_in_method.clone(),
            clock_out_tries: e.clock_out_tries,
            clock_out_method: e.clock_out_method.clone(),
        }
    }
}
