use chrono::{Datelike, Duration, NaiveDate, Weekday};
use proptest::prelude::*;
use rtimecompliance::core::week::{align_entries, week_align, week_display_date};
use rtimecompliance::models::time_entry::TimeEntry;

mod common;
use common::date;

#[test]
fn missing_date_has_no_week() {
    assert_eq!(week_align(None), (None, None));
}

#[test]
fn saturday_and_sunday_sites_share_the_iso_week() {
    // Dallas closes on Saturday, Austin on Sunday
    let sat = week_align(Some(date("2025-01-11")));
    let sun = week_align(Some(date("2025-01-12")));
    assert_eq!(sat, (Some(2), Some(2025)));
    assert_eq!(sat, sun);
}

#[test]
fn year_boundary_uses_iso_year() {
    // Sunday 2024-12-29 still belongs to 2024-W52, Monday 12-30 to 2025-W01
    assert_eq!(week_align(Some(date("2024-12-29"))), (Some(52), Some(2024)));
    assert_eq!(week_align(Some(date("2024-12-30"))), (Some(1), Some(2025)));
    assert_eq!(week_align(Some(date("2021-01-03"))), (Some(53), Some(2020)));
}

#[test]
fn display_date_is_the_sunday() {
    assert_eq!(week_display_date(2025, 1), Some(date("2025-01-05")));
    assert_eq!(week_display_date(2020, 53), Some(date("2021-01-03")));
    assert_eq!(week_display_date(2025, 0), None);
    assert_eq!(week_display_date(2025, 54), None);
}

#[test]
fn align_entries_fills_both_fields() {
    let mut rows = vec![TimeEntry::new(2025), TimeEntry::new(2025)];
    rows[0].week_ending = Some(date("2025-03-09"));

    align_entries(&mut rows);

    assert_eq!(rows[0].week_number, Some(10));
    assert_eq!(rows[0].week_year, Some(2025));
    assert_eq!(rows[1].week_number, None);
    assert_eq!(rows[1].week_year, None);
}

proptest! {
    #[test]
    fn aligned_week_round_trips_to_its_sunday(days in 0i64..(365 * 200)) {
        let d = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap() + Duration::days(days);

        let (w, y) = week_align(Some(d));
        let (w, y) = (w.unwrap(), y.unwrap());

        prop_assert_eq!(d.iso_week().week(), w);
        prop_assert_eq!(d.iso_week().year(), y);

        let sunday = week_display_date(y, w).unwrap();
        prop_assert_eq!(sunday.weekday(), Weekday::Sun);
        prop_assert_eq!(sunday.iso_week(), d.iso_week());
        prop_assert!(sunday >= d && (sunday - d).num_days() < 7);
    }
}
