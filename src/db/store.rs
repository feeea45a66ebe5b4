//! Store seams used by the ingestion pipeline and the read commands.
//!
//! The SQLite implementation lives in `db::facts` and `db::etl_history`;
//! anything else that can replace a year atomically and answer filtered
//! queries can stand in (tests use this to inject failures).

use crate::errors::AppResult;
use crate::models::etl_run::EtlStatus;
use crate::models::filter::FactFilter;
use crate::models::time_entry::TimeEntry;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Fact fields that can be listed or aggregated by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactField {
    Year,
    Site,
    OfficeName,
    EntryType,
    Department,
    Shift,
    EmployeeId,
    FullName,
    WeekEnding,
    WeekNumber,
    WeekYear,
    RegularHours,
    OvertimeHours,
    TotalHours,
    ClockInTries,
    ClockOutTries,
    ClockInMethod,
    ClockOutMethod,
}

/// How a field's stored value reads back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Integer,
    /// Stored as integer hundredths.
    Hours,
}

impl FactField {
    pub fn column(&self) -> &'static str {
        match self {
            FactField::Year => "year",
            FactField::Site => "site",
            FactField::OfficeName => "office_name",
            FactField::EntryType => "entry_type",
            FactField::Department => "department",
            FactField::Shift => "shift",
            FactField::EmployeeId => "employee_id",
            FactField::FullName => "full_name",
            FactField::WeekEnding => "week_ending",
            FactField::WeekNumber => "week_number",
            FactField::WeekYear => "week_year",
            FactField::RegularHours => "regular_hours_hundredths",
            FactField::OvertimeHours => "overtime_hours_hundredths",
            FactField::TotalHours => "total_hours_hundredths",
            FactField::ClockInTries => "clock_in_tries",
            FactField::ClockOutTries => "clock_out_tries",
            FactField::ClockInMethod => "clock_in_method",
            FactField::ClockOutMethod => "clock_out_method",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FactField::Year
            | FactField::WeekNumber
            | FactField::WeekYear
            | FactField::ClockInTries
            | FactField::ClockOutTries => FieldKind::Integer,
            FactField::RegularHours | FactField::OvertimeHours | FactField::TotalHours => {
                FieldKind::Hours
            }
            FactField::WeekEnding => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Sum,
    Min,
    Max,
}

impl AggregateOp {
    pub fn sql(&self) -> &'static str {
        match self {
            AggregateOp::Sum => "SUM",
            AggregateOp::Min => "MIN",
            AggregateOp::Max => "MAX",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AggregateValue {
    Int(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    Text(String),
}

impl fmt::Display for AggregateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateValue::Int(v) => write!(f, "{v}"),
            AggregateValue::Decimal(v) => write!(f, "{v}"),
            AggregateValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            AggregateValue::Text(v) => f.write_str(v),
        }
    }
}

/// Row counts of one replace operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceStats {
    pub deleted: usize,
    pub inserted: usize,
}

pub trait FactStore {
    /// Delete every fact of `year` and insert `rows`, all or nothing.
    fn replace_year(&mut self, year: i32, rows: &[TimeEntry]) -> AppResult<ReplaceStats>;

    /// Delete every fact of every year and insert `rows`, all or nothing.
    fn replace_all(&mut self, rows: &[TimeEntry]) -> AppResult<ReplaceStats>;

    /// Matching facts, newest week first, then by site.
    fn query(&self, filter: &FactFilter) -> AppResult<Vec<TimeEntry>>;

    fn count(&self, filter: &FactFilter) -> AppResult<usize>;

    /// Sorted distinct non-empty values of `field`.
    fn distinct(&self, field: FactField, filter: &FactFilter) -> AppResult<Vec<String>>;

    /// `None` when nothing matches.
    fn aggregate(
        &self,
        op: AggregateOp,
        field: FactField,
        filter: &FactFilter,
    ) -> AppResult<Option<AggregateValue>>;
}

/// Append-only audit of ingestion attempts.
pub trait EtlAudit {
    /// Open a run in `running` state and return its id.
    fn open_run(&mut self, year: i32, message: &str) -> AppResult<i64>;

    /// Finalize a running record. A record can be finalized only once.
    fn finish_run(
        &mut self,
        id: i64,
        status: EtlStatus,
        records_processed: usize,
        duration_seconds: f64,
        message: &str,
    ) -> AppResult<()>;
}
