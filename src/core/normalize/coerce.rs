//! Cell → typed value coercions. None of these fail: a bad cell degrades to
//! the type's default (empty string, 0, or no date).

use crate::core::source::RawCell;
use crate::utils::excel_date::excel_serial_to_datetime;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::str::FromStr;

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d-%b-%y",
    "%Y%m%d",
];

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

pub fn to_text(cell: Option<&RawCell>) -> String {
    match cell {
        None | Some(RawCell::Empty) => String::new(),
        Some(RawCell::Text(s)) => s.clone(),
        Some(RawCell::Number(n)) => number_text(*n),
        Some(RawCell::Bool(b)) => b.to_string(),
        Some(RawCell::DateTime(dt)) => {
            if dt.time() == chrono::NaiveTime::MIN {
                dt.date().format("%Y-%m-%d").to_string()
            } else {
                dt.format("%Y-%m-%d %H:%M:%S").to_string()
            }
        }
    }
}

/// Whole floats print without the trailing `.0` (ids typed as numbers).
fn number_text(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

pub fn to_date(cell: Option<&RawCell>) -> Option<NaiveDate> {
    match cell? {
        RawCell::Empty | RawCell::Bool(_) => None,
        RawCell::DateTime(dt) => Some(dt.date()),
        RawCell::Number(n) => excel_serial_to_datetime(*n).map(|dt| dt.date()),
        RawCell::Text(s) => parse_date_str(s),
    }
}

pub fn to_datetime(cell: Option<&RawCell>) -> Option<NaiveDateTime> {
    match cell? {
        RawCell::Empty | RawCell::Bool(_) => None,
        RawCell::DateTime(dt) => Some(*dt),
        RawCell::Number(n) => excel_serial_to_datetime(*n),
        RawCell::Text(s) => parse_datetime_str(s),
    }
}

pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt)
            && plausible(d)
        {
            return Some(d);
        }
    }

    // a timestamp in a date column keeps its date part
    parse_datetime_str(s).map(|dt| dt.date())
}

pub fn parse_datetime_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt)
            && plausible(dt.date())
        {
            return Some(dt);
        }
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt)
            && plausible(d)
        {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// `%Y` happily reads "25" as year 25; two-digit years must go through `%y`.
fn plausible(d: NaiveDate) -> bool {
    (1900..=9999).contains(&d.year())
}

/// Decimal with two places; anything unparseable is zero.
pub fn to_decimal(cell: Option<&RawCell>) -> Decimal {
    let value = match cell {
        Some(RawCell::Number(n)) => Decimal::from_f64(*n),
        Some(RawCell::Text(s)) => parse_decimal_str(s),
        Some(RawCell::Bool(b)) => Some(if *b { Decimal::ONE } else { Decimal::ZERO }),
        _ => None,
    };

    value.map(|d| d.round_dp(2)).unwrap_or(Decimal::ZERO)
}

pub fn parse_decimal_str(s: &str) -> Option<Decimal> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Integer count (fractional part dropped); anything unparseable is zero.
pub fn to_count(cell: Option<&RawCell>) -> i64 {
    to_decimal(cell).trunc().to_i64().unwrap_or(0)
}

/// Year cell, if it holds a plausible four-digit year.
pub fn to_year(cell: Option<&RawCell>) -> Option<i32> {
    let y = to_decimal(cell).trunc().to_i32()?;
    (1900..=9999).contains(&y).then_some(y)
}
