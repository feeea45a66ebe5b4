use super::breakdown::WeekRow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekTrend {
    pub week_year: i32,
    pub week_number: u32,
    pub week: Option<NaiveDate>,
    pub total_entries: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub finger_rate: Decimal,
    /// Change from the previous week; `None` for the first week.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub finger_rate_change: Option<Decimal>,
    pub entries_change: Option<i64>,
}

/// Week-over-week deltas over a chronologically sorted week breakdown.
pub fn trends(weeks: &[WeekRow]) -> Vec<WeekTrend> {
    let mut out = Vec::with_capacity(weeks.len());
    let mut prev: Option<&WeekRow> = None;

    for w in weeks {
        out.push(WeekTrend {
            week_year: w.week_year,
            week_number: w.week_number,
            week: w.week,
            total_entries: w.metrics.total_entries,
            finger_rate: w.metrics.finger_rate,
            finger_rate_change: prev.map(|p| w.metrics.finger_rate - p.metrics.finger_rate),
            entries_change: prev
                .map(|p| w.metrics.total_entries as i64 - p.metrics.total_entries as i64),
        });
        prev = Some(w);
    }

    out
}
