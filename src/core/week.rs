//! ISO-8601 week alignment.
//!
//! Sites close their work week on different weekdays (one on Saturday, the
//! others on Sunday). Both week-ending dates fall inside the same ISO week
//! (Monday..Sunday), so `(week_number, week_year)` is the shared coordinate
//! used to compare sites week by week.

use crate::models::time_entry::TimeEntry;
use chrono::{Datelike, Duration, NaiveDate};

/// `(ISO week number, ISO week year)` of a week-ending date.
/// A missing date yields `(None, None)`.
pub fn week_align(date: Option<NaiveDate>) -> (Option<u32>, Option<i32>) {
    match date {
        Some(d) => {
            let iso = d.iso_week();
            (Some(iso.week()), Some(iso.year()))
        }
        None => (None, None),
    }
}

/// Sunday of ISO week `week_number` of `week_year`, for display.
///
/// Monday of week 1 (the week holding January 4th) plus `week_number - 1`
/// weeks plus six days. Returns `None` outside 1..=53 or when the date
/// overflows the calendar.
pub fn week_display_date(week_year: i32, week_number: u32) -> Option<NaiveDate> {
    if !(1..=53).contains(&week_number) {
        return None;
    }

    let jan4 = NaiveDate::from_ymd_opt(week_year, 1, 4)?;
    let week1_monday =
        jan4 - Duration::days(i64::from(jan4.weekday().number_from_monday()) - 1);

    week1_monday.checked_add_signed(Duration::weeks(i64::from(week_number) - 1) + Duration::days(6))
}

/// Fill `week_number`/`week_year` on every entry from its week-ending date.
pub fn align_entries(entries: &mut [TimeEntry]) {
    for e in entries.iter_mut() {
        let (week, year) = week_align(e.week_ending);
        e.week_number = week;
        e.week_year = year;
    }
}
