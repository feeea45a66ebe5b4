// src/utils/excel_date.rs

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Excel's day zero (the 1900 leap-year bug is absorbed by using 12/30).
fn excel_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Date → Excel serial (whole days).
pub fn date_to_excel_serial(d: NaiveDate) -> f64 {
    d.and_hms_opt(0, 0, 0)
        .map(|dt| naive_datetime_to_excel_serial(&dt))
        .unwrap_or(0.0)
}

pub fn naive_datetime_to_excel_serial(dt: &NaiveDateTime) -> f64 {
    let duration = *dt - excel_epoch();

    let days = duration.num_days() as f64;
    let secs = (duration.num_seconds() - duration.num_days() * 86400) as f64;

    days + secs / 86400.0
}

/// Excel serial → timestamp, rounded to the second.
/// Non-finite or negative serials are rejected.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial > 2_958_465.0 {
        return None;
    }

    let days = serial.trunc() as i64;
    let secs = ((serial - serial.trunc()) * 86400.0).round() as i64;

    excel_epoch().checked_add_signed(Duration::days(days) + Duration::seconds(secs))
}
