//! Grouped KPIs: one tally per group key, built in a single pass.

use super::rates::{Tally, iso_week_of, percentage};
use crate::core::week::week_display_date;
use crate::models::time_entry::TimeEntry;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// Compliance + volume numbers of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMetrics {
    pub total_entries: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_hours: Decimal,
    pub unique_employees: usize,
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
    #[serde(with = "rust_decimal::serde::float")]
    pub manual_rate: Decimal,
}

impl GroupMetrics {
    pub fn from_tally(t: &Tally) -> Self {
        let provisional_rate = percentage(t.provisional, t.total);
        let write_in_rate = percentage(t.write_in, t.total);

        Self {
            total_entries: t.total,
            total_hours: t.total_hours.round_dp(2),
            unique_employees: t.unique_employees(),
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
pub struct GroupRow {
    pub key: String,
    #[serde(flatten)]
    pub metrics: GroupMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekRow {
    pub week_year: i32,
    pub week_number: u32,
    /// Sunday of the ISO week, for display.
    pub week: Option<NaiveDate>,
    #[serde(flatten)]
    pub metrics: GroupMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRow {
    pub employee_id: String,
    pub full_name: String,
    pub site: String,
    #[serde(flatten)]
    pub metrics: GroupMetrics,
}

/// Tally per key; entries for which `key` returns `None` are skipped.
fn group_by<'a, K, F>(entries: &'a [TimeEntry], key: F) -> HashMap<K, Tally>
where
    K: Eq + Hash,
    F: Fn(&'a TimeEntry) -> Option<K>,
{
    let mut groups: HashMap<K, Tally> = HashMap::new();
    for e in entries {
        if let Some(k) = key(e) {
            groups.entry(k).or_default().add(e);
        }
    }
    groups
}

fn rows_by_key<F>(entries: &[TimeEntry], key: F) -> Vec<GroupRow>
where
    F: Fn(&TimeEntry) -> String,
{
    group_by(entries, |e| Some(key(e)))
        .into_iter()
        .map(|(key, t)| GroupRow {
            key,
            metrics: GroupMetrics::from_tally(&t),
        })
        .collect()
}

/// Sites, alphabetically.
pub fn by_office(entries: &[TimeEntry]) -> Vec<GroupRow> {
    let mut rows = rows_by_key(entries, |e| e.site.clone());
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
}

/// ISO weeks, chronologically. Entries without a week-ending date are
/// left out.
pub fn by_week(entries: &[TimeEntry]) -> Vec<WeekRow> {
    let mut rows: Vec<WeekRow> = group_by(entries, iso_week_of)
        .into_iter()
        .map(|((week_year, week_number), t)| WeekRow {
            week_year,
            week_number,
            week: week_display_date(week_year, week_number),
            metrics: GroupMetrics::from_tally(&t),
        })
        .collect();

    rows.sort_by_key(|r| (r.week_year, r.week_number));
    rows
}

/// Employees by entry volume, largest first; `limit` keeps the top N.
pub fn by_employee(entries: &[TimeEntry], limit: Option<usize>) -> Vec<EmployeeRow> {
    let mut rows: Vec<EmployeeRow> = group_by(entries, |e| {
        Some((e.employee_id.as_str(), e.full_name.as_str(), e.site.as_str()))
    })
    .into_iter()
    .map(|((id, name, site), t)| EmployeeRow {
        employee_id: id.to_string(),
        full_name: name.to_string(),
        site: site.to_string(),
        metrics: GroupMetrics::from_tally(&t),
    })
    .collect();

    rows.sort_by(|a, b| {
        b.metrics
            .total_entries
            .cmp(&a.metrics.total_entries)
            .then_with(|| a.full_name.cmp(&b.full_name))
            .then_with(|| a.employee_id.cmp(&b.employee_id))
            .then_with(|| a.site.cmp(&b.site))
    });

    if let Some(n) = limit {
        rows.truncate(n);
    }
    rows
}

/// Departments by entry volume, largest first.
pub fn by_department(entries: &[TimeEntry]) -> Vec<GroupRow> {
    let mut rows = rows_by_key(entries, |e| e.department.clone());
    rows.sort_by(|a, b| {
        b.metrics
            .total_entries
            .cmp(&a.metrics.total_entries)
            .then_with(|| a.key.cmp(&b.key))
    });
    rows
}

/// Shifts, by shift label.
pub fn by_shift(entries: &[TimeEntry]) -> Vec<GroupRow> {
    let mut rows = rows_by_key(entries, |e| e.shift.clone());
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
}
