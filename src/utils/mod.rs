pub mod colors;
pub mod excel_date;
pub mod formatting;
pub mod path;
pub mod table;

pub use formatting::{fmt_change, fmt_rate};
