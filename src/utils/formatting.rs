//! Formatting utilities used for CLI and export outputs.

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// `95.0%`
pub fn fmt_rate(rate: Decimal) -> String {
    format!("{rate}%")
}

/// Signed delta, `-` when there is nothing to compare against.
pub fn fmt_change<T>(value: Option<T>) -> String
where
    T: std::fmt::Display + PartialOrd + Default,
{
    match value {
        Some(v) if v > T::default() => format!("+{v}"),
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

pub fn fmt_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Human readable byte size (`12.3 KB`).
pub fn fmt_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn change_is_signed() {
        assert_eq!(fmt_change(Some(dec!(1.5))), "+1.5");
        assert_eq!(fmt_change(Some(dec!(-0.5))), "-0.5");
        assert_eq!(fmt_change(Some(0i64)), "0");
        assert_eq!(fmt_change::<i64>(None), "-");
    }

    #[test]
    fn bytes_are_scaled() {
        assert_eq!(fmt_bytes(512), "512 B");
        assert_eq!(fmt_bytes(2048), "2.0 KB");
    }
}
