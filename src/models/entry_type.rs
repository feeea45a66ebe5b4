use serde::{Serialize, Serializer};
use std::fmt;

/// Compliance category of a time entry.
///
/// The four known labels come from the timekeeping exports verbatim;
/// anything else (including an empty cell) is kept as `Other` so that
/// the row still counts toward totals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryType {
    Finger,
    ProvisionalEntry,
    WriteIn,
    MissingClockOut,
    Other(String),
}

impl EntryType {
    pub const FINGER: &'static str = "Finger";
    pub const PROVISIONAL: &'static str = "Provisional Entry";
    pub const WRITE_IN: &'static str = "Write-In";
    pub const MISSING_CO: &'static str = "Missing c/o";

    /// The four classified types, in legacy report column order.
    pub const REPORT_ORDER: [EntryType; 4] = [
        EntryType::Finger,
        EntryType::MissingClockOut,
        EntryType::ProvisionalEntry,
        EntryType::WriteIn,
    ];

    /// Parse a raw export label. Matching ignores case and surrounding blanks.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.eq_ignore_ascii_case(Self::FINGER) {
            Self::Finger
        } else if s.eq_ignore_ascii_case(Self::PROVISIONAL) {
            Self::ProvisionalEntry
        } else if s.eq_ignore_ascii_case(Self::WRITE_IN) {
            Self::WriteIn
        } else if s.eq_ignore_ascii_case(Self::MISSING_CO) {
            Self::MissingClockOut
        } else {
            Self::Other(s.to_string())
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &str {
        match self {
            EntryType::Finger => Self::FINGER,
            EntryType::ProvisionalEntry => Self::PROVISIONAL,
            EntryType::WriteIn => Self::WRITE_IN,
            EntryType::MissingClockOut => Self::MISSING_CO,
            EntryType::Other(s) => s.as_str(),
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl Serialize for EntryType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_db_str())
    }
}
