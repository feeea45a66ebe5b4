//! Filter flags shared by the read commands, resolved into a [`FactFilter`].

use crate::errors::{AppError, AppResult};
use crate::models::filter::FactFilter;
use chrono::NaiveDate;
use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long = "year-from")]
    pub year_from: Option<i32>,
    #[arg(long = "year-to")]
    pub year_to: Option<i32>,

    /// Site, case-insensitive exact match
    #[arg(long)]
    pub site: Option<String>,
    /// Comma separated list of sites
    #[arg(long, value_delimiter = ',')]
    pub sites: Vec<String>,

    /// Entry type label, e.g. "Write-In"
    #[arg(long = "entry-type")]
    pub entry_type: Option<String>,
    #[arg(long = "entry-types", value_delimiter = ',')]
    pub entry_types: Vec<String>,

    /// Week-ending date (YYYY-MM-DD)
    #[arg(long = "week-ending")]
    pub week_ending: Option<String>,
    /// First week-ending date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Last week-ending date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// ISO week number
    #[arg(long)]
    pub week: Option<u32>,
    #[arg(long = "week-from")]
    pub week_from: Option<u32>,
    #[arg(long = "week-to")]
    pub week_to: Option<u32>,
    #[arg(long = "week-year")]
    pub week_year: Option<i32>,

    /// Department substring, case-insensitive
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long, value_delimiter = ',')]
    pub departments: Vec<String>,

    #[arg(long = "employee-id")]
    pub employee_id: Option<String>,
    /// Full name substring, case-insensitive
    #[arg(long)]
    pub name: Option<String>,
}

fn parse_date(flag: &str, s: &Option<String>) -> AppResult<Option<NaiveDate>> {
    match s {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::InvalidDate(format!("--{flag} {v} (expected YYYY-MM-DD)"))),
    }
}

fn check_week(flag: &str, w: Option<u32>) -> AppResult<Option<u32>> {
    match w {
        Some(n) if !(1..=53).contains(&n) => Err(AppError::InvalidFilter(format!(
            "--{flag} must be between 1 and 53, got {n}"
        ))),
        other => Ok(other),
    }
}

fn check_order<T: PartialOrd + std::fmt::Display>(
    what: &str,
    lo: Option<T>,
    hi: Option<T>,
) -> AppResult<()> {
    if let (Some(a), Some(b)) = (lo, hi)
        && a > b
    {
        return Err(AppError::InvalidFilter(format!(
            "{what} range is empty: {a} > {b}"
        )));
    }
    Ok(())
}

fn non_blank(s: &Option<String>) -> Option<String> {
    s.as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn list(v: &[String]) -> Vec<String> {
    v.iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl FilterArgs {
    pub fn to_filter(&self) -> AppResult<FactFilter> {
        let week_ending = parse_date("week-ending", &self.week_ending)?;
        let from = parse_date("from", &self.from)?;
        let to = parse_date("to", &self.to)?;

        check_order("year", self.year_from, self.year_to)?;
        check_order("week-ending", from, to)?;

        let week = check_week("week", self.week)?;
        let week_from = check_week("week-from", self.week_from)?;
        let week_to = check_week("week-to", self.week_to)?;
        check_order("week", week_from, week_to)?;

        Ok(FactFilter {
            year: self.year,
            year_gte: self.year_from,
            year_lte: self.year_to,
            site: non_blank(&self.site),
            sites_in: list(&self.sites),
            entry_type: non_blank(&self.entry_type),
            entry_types_in: list(&self.entry_types),
            week_ending,
            week_ending_gte: from,
            week_ending_lte: to,
            week_number: week,
            week_number_gte: week_from,
            week_number_lte: week_to,
            week_year: self.week_year,
            department: non_blank(&self.department),
            departments_in: list(&self.departments),
            employee_id: non_blank(&self.employee_id),
            full_name: non_blank(&self.name),
            ..FactFilter::default()
        })
    }
}
