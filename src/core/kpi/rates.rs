//! Rate formulas and the per-collection tally they are computed from.

use crate::core::week::week_align;
use crate::models::entry_type::EntryType;
use crate::models::time_entry::TimeEntry;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashSet;

/// `part / total * 100`, one decimal place, half away from zero.
/// Zero when `total` is zero.
pub fn percentage(part: usize, total: usize) -> Decimal {
    let mut rate = if total == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(part as u64) * Decimal::ONE_HUNDRED / Decimal::from(total as u64))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    };
    rate.rescale(1);
    rate
}

/// `sum / n`, two decimal places. Zero when `n` is zero.
pub fn average(sum: i64, n: usize) -> Decimal {
    let mut avg = if n == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(sum) / Decimal::from(n as u64))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };
    avg.rescale(2);
    avg
}

/// ISO week of an entry: the stored coordinate, or derived from the
/// week-ending date for rows that were never aligned.
pub fn iso_week_of(e: &TimeEntry) -> Option<(i32, u32)> {
    match (e.week_year, e.week_number) {
        (Some(y), Some(w)) => Some((y, w)),
        _ => match week_align(e.week_ending) {
            (Some(w), Some(y)) => Some((y, w)),
            _ => None,
        },
    }
}

/// Everything the KPI formulas need, accumulated in one pass.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    pub total: usize,
    pub finger: usize,
    pub provisional: usize,
    pub write_in: usize,
    pub missing_co: usize,

    pub total_hours: Decimal,
    pub regular_hours: Decimal,
    pub overtime_hours: Decimal,

    pub clock_in_tries: i64,
    pub clock_out_tries: i64,
    pub first_try_in: usize,
    pub first_try_out: usize,

    employees: HashSet<String>,
    sites: HashSet<String>,
    weeks: HashSet<(i32, u32)>,
    pub min_week_ending: Option<NaiveDate>,
    pub max_week_ending: Option<NaiveDate>,
}

impl Tally {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a TimeEntry>,
    {
        let mut t = Tally::default();
        for e in entries {
            t.add(e);
        }
        t
    }

    pub fn add(&mut self, e: &TimeEntry) {
        self.total += 1;
        match e.entry_type {
            EntryType::Finger => self.finger += 1,
            EntryType::ProvisionalEntry => self.provisional += 1,
            EntryType::WriteIn => self.write_in += 1,
            EntryType::MissingClockOut => self.missing_co += 1,
            EntryType::Other(_) => {}
        }

        self.total_hours += e.total_hours;
        self.regular_hours += e.regular_hours;
        self.overtime_hours += e.overtime_hours;

        self.clock_in_tries += e.clock_in_tries;
        self.clock_out_tries += e.clock_out_tries;
        if e.clock_in_tries == 1 {
            self.first_try_in += 1;
        }
        if e.clock_out_tries == 1 {
            self.first_try_out += 1;
        }

        if !e.employee_id.is_empty() {
            self.employees.insert(e.employee_id.clone());
        }
        if !e.site.is_empty() {
            self.sites.insert(e.site.clone());
        }
        if let Some(w) = iso_week_of(e) {
            self.weeks.insert(w);
        }

        if let Some(d) = e.week_ending {
            self.min_week_ending = Some(self.min_week_ending.map_or(d, |m| m.min(d)));
            self.max_week_ending = Some(self.max_week_ending.map_or(d, |m| m.max(d)));
        }
    }

    pub fn unique_employees(&self) -> usize {
        self.employees.len()
    }

    pub fn unique_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn unique_weeks(&self) -> usize {
        self.weeks.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceKpis {
    pub total_entries: usize,
    pub finger_count: usize,
    pub provisional_count: usize,
    pub write_in_count: usize,
    pub missing_co_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub finger_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub provisional_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub write_in_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub missing_co_rate: Decimal,
    /// Provisional + write-in: entries that needed a supervisor.
    #[serde(with = "rust_decimal::serde::float")]
    pub manual_rate: Decimal,
}

impl ComplianceKpis {
    pub fn from_tally(t: &Tally) -> Self {
        let provisional_rate = percentage(t.provisional, t.total);
        let write_in_rate = percentage(t.write_in, t.total);

        Self {
            total_entries: t.total,
            finger_count: t.finger,
            provisional_count: t.provisional,
            write_in_count: t.write_in,
            missing_co_count: t.missing_co,
            finger_rate: percentage(t.finger, t.total),
            provisional_rate,
            write_in_rate,
            missing_co_rate: percentage(t.missing_co, t.total),
            manual_rate: provisional_rate + write_in_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeKpis {
    pub total_entries: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub regular_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub overtime_hours: Decimal,
    pub unique_employees: usize,
    pub unique_offices: usize,
    pub unique_weeks: usize,
    pub min_week_ending: Option<NaiveDate>,
    pub max_week_ending: Option<NaiveDate>,
}

impl VolumeKpis {
    pub fn from_tally(t: &Tally) -> Self {
        Self {
            total_entries: t.total,
            total_hours: t.total_hours.round_dp(2),
            regular_hours: t.regular_hours.round_dp(2),
            overtime_hours: t.overtime_hours.round_dp(2),
            unique_employees: t.unique_employees(),
            unique_offices: t.unique_sites(),
            unique_weeks: t.unique_weeks(),
            min_week_ending: t.min_week_ending,
            max_week_ending: t.max_week_ending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyKpis {
    #[serde(with = "rust_decimal::serde::float")]
    pub first_try_clock_in_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub first_try_clock_out_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_clock_in_tries: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_clock_out_tries: Decimal,
}

impl EfficiencyKpis {
    pub fn from_tally(t: &Tally) -> Self {
        Self {
            first_try_clock_in_rate: percentage(t.first_try_in, t.total),
            first_try_clock_out_rate: percentage(t.first_try_out, t.total),
            avg_clock_in_tries: average(t.clock_in_tries, t.total),
            avg_clock_out_tries: average(t.clock_out_tries, t.total),
        }
    }
}

/// All global KPIs, one object per section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub compliance: ComplianceKpis,
    pub volume: VolumeKpis,
    pub efficiency: EfficiencyKpis,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn percentage_rounds_half_away_from_zero() {
        assert_eq!(percentage(1, 8), dec!(12.5));
        // 1/16 = 6.25 → 6.3
        assert_eq!(percentage(1, 16), dec!(6.3));
        // 2/3 = 66.666… → 66.7
        assert_eq!(percentage(2, 3), dec!(66.7));
    }

    #[test]
    fn percentage_of_empty_set_is_zero() {
        assert_eq!(percentage(0, 0), Decimal::ZERO);
        assert_eq!(percentage(0, 0).to_string(), "0.0");
    }

    #[test]
    fn rates_keep_one_decimal_place() {
        assert_eq!(percentage(1, 1).to_string(), "100.0");
        assert_eq!(percentage(1, 4).to_string(), "25.0");
    }

    #[test]
    fn average_two_places() {
        assert_eq!(average(5, 3), dec!(1.67));
        assert_eq!(average(0, 0).to_string(), "0.00");
    }
}
