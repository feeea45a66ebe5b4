//! Schema normalizer: raw export table → canonical facts.
//!
//! Column names are resolved once per table through the [`AliasTable`];
//! unknown columns are ignored. When two raw columns resolve to the same
//! field, the leftmost one wins. Each row then goes through an explicit
//! field-by-field assignment into [`TimeEntry`].

pub mod aliases;
pub mod coerce;

pub use aliases::{AliasTable, CanonicalField};

use crate::core::source::{RawCell, RawTable};
use crate::models::entry_type::EntryType;
use crate::models::time_entry::TimeEntry;
use coerce::{to_count, to_date, to_datetime, to_decimal, to_text, to_year};
use std::collections::HashMap;

pub struct Normalizer {
    aliases: AliasTable,
}

/// Column position of each canonical field present in a table.
#[derive(Debug, Default)]
pub struct ColumnLayout {
    slots: HashMap<CanonicalField, usize>,
    ignored: Vec<String>,
}

impl ColumnLayout {
    pub fn has(&self, field: CanonicalField) -> bool {
        self.slots.contains_key(&field)
    }

    pub fn position(&self, field: CanonicalField) -> Option<usize> {
        self.slots.get(&field).copied()
    }

    /// Raw headers that matched no alias (or lost to an earlier duplicate).
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    fn cell<'r>(&self, row: &'r [RawCell], field: CanonicalField) -> Option<&'r RawCell> {
        self.slots.get(&field).and_then(|i| row.get(*i))
    }
}

impl Normalizer {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn layout(&self, headers: &[String]) -> ColumnLayout {
        let mut layout = ColumnLayout::default();

        for (idx, header) in headers.iter().enumerate() {
            match self.aliases.resolve(header) {
                Some(field) if !layout.slots.contains_key(&field) => {
                    layout.slots.insert(field, idx);
                }
                _ => layout.ignored.push(header.clone()),
            }
        }

        layout
    }

    /// One canonical fact per input row, same order. Rows without a usable
    /// year cell (or tables without a year column) get `target_year`.
    pub fn normalize(&self, table: &RawTable, target_year: i32) -> Vec<TimeEntry> {
        let layout = self.layout(&table.headers);

        table
            .rows
            .iter()
            .map(|row| self.normalize_row(&layout, row, target_year))
            .collect()
    }

    pub fn normalize_row(
        &self,
        layout: &ColumnLayout,
        row: &[RawCell],
        target_year: i32,
    ) -> TimeEntry {
        use CanonicalField as F;

        let text = |f| to_text(layout.cell(row, f));
        let hours = |f| to_decimal(layout.cell(row, f));
        // Missing column keeps the schema default of one try;
        // a present but blank/bad cell is zero like every numeric field.
        let tries = |f| {
            if layout.has(f) {
                to_count(layout.cell(row, f))
            } else {
                1
            }
        };

        let mut e = TimeEntry::new(to_year(layout.cell(row, F::Year)).unwrap_or(target_year));

        e.office_name = text(F::OfficeName);
        e.site = text(F::Site);

        e.week_ending = to_date(layout.cell(row, F::WeekEnding));
        e.work_date = to_date(layout.cell(row, F::WorkDate));
        e.date_range = text(F::DateRange);

        e.employee_id = text(F::EmployeeId);
        e.last_name = text(F::LastName);
        e.first_name = text(F::FirstName);
        e.full_name = text(F::FullName);
        e.employee_type_id = text(F::EmployeeTypeId);

        e.shift = text(F::Shift);
        e.department = text(F::Department);
        e.allocation_method = text(F::AllocationMethod);

        e.time_start = to_datetime(layout.cell(row, F::TimeStart));
        e.time_end = to_datetime(layout.cell(row, F::TimeEnd));

        e.regular_hours = hours(F::RegularHours);
        e.overtime_hours = hours(F::OvertimeHours);
        e.double_time_hours = hours(F::DoubleTimeHours);
        e.holiday_hours = hours(F::HolidayHours);
        e.total_hours = hours(F::TotalHours);

        e.clock_in_local = text(F::ClockInLocal);
        e.clock_in_tries = tries(F::ClockInTries);
        e.clock_in_method = text(F::ClockInMethod);
        e.clock_out_local = text(F::ClockOutLocal);
        e.clock_out_tries = tries(F::ClockOutTries);
        e.clock_out_method = text(F::ClockOutMethod);

        e.entry_type = EntryType::parse(&text(F::EntryType));

        e
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(AliasTable::builtin())
    }
}
