/// ANSI color helper utilities for terminal output.
use rust_decimal::Decimal;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Finger rate color:
/// ≥ 95 → green
/// ≥ 90 → yellow
/// below → red
pub fn color_for_finger_rate(rate: Decimal) -> &'static str {
    if rate >= Decimal::from(95) {
        GREEN
    } else if rate >= Decimal::from(90) {
        YELLOW
    } else {
        RED
    }
}

/// Week-over-week change color:
/// \>0 → green
/// \<0 → red
/// 0 → reset
pub fn color_for_change(value: Decimal) -> &'static str {
    if value > Decimal::ZERO {
        GREEN
    } else if value < Decimal::ZERO {
        RED
    } else {
        RESET
    }
}

/// Grey for empty cells and `-` placeholders, plain otherwise.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "-" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

pub fn paint(color: &str, value: &str) -> String {
    format!("{color}{value}{RESET}")
}
