//! Already-resolved predicate over fact fields.
//!
//! The CLI layer builds it from user arguments (and rejects bad input there);
//! the store translates it into its own query language.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FactFilter {
    pub year: Option<i32>,
    pub year_gte: Option<i32>,
    pub year_lte: Option<i32>,

    /// Case-insensitive exact match on the site.
    pub site: Option<String>,
    pub sites_in: Vec<String>,

    /// Case-insensitive exact match on the entry label.
    pub entry_type: Option<String>,
    pub entry_types_in: Vec<String>,

    pub week_ending: Option<NaiveDate>,
    pub week_ending_gte: Option<NaiveDate>,
    pub week_ending_lte: Option<NaiveDate>,

    pub week_number: Option<u32>,
    pub week_number_gte: Option<u32>,
    pub week_number_lte: Option<u32>,
    pub week_year: Option<i32>,
    pub week_year_gte: Option<i32>,
    pub week_year_lte: Option<i32>,

    /// Case-insensitive substring of the department.
    pub department: Option<String>,
    pub departments_in: Vec<String>,

    pub employee_id: Option<String>,
    /// Case-insensitive substring of the full name.
    pub full_name: Option<String>,
}

impl FactFilter {
    pub fn for_year(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Non-empty criteria as `(name, value)` pairs, in declaration order.
    /// Used for the report metadata sheet.
    pub fn applied(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();

        let mut push = |k: &str, v: Option<String>| {
            if let Some(v) = v
                && !v.is_empty()
            {
                out.push((k.to_string(), v));
            }
        };

        let join = |v: &[String]| (!v.is_empty()).then(|| v.join(","));

        push("year", self.year.map(|v| v.to_string()));
        push("year__gte", self.year_gte.map(|v| v.to_string()));
        push("year__lte", self.year_lte.map(|v| v.to_string()));
        push("site", self.site.clone());
        push("site__in", join(&self.sites_in));
        push("entry_type", self.entry_type.clone());
        push("entry_type__in", join(&self.entry_types_in));
        push("week_ending", self.week_ending.map(|d| d.to_string()));
        push("week_ending__gte", self.week_ending_gte.map(|d| d.to_string()));
        push("week_ending__lte", self.week_ending_lte.map(|d| d.to_string()));
        push("week_number", self.week_number.map(|v| v.to_string()));
        push("week_number__gte", self.week_number_gte.map(|v| v.to_string()));
        push("week_number__lte", self.week_number_lte.map(|v| v.to_string()));
        push("week_year", self.week_year.map(|v| v.to_string()));
        push("week_year__gte", self.week_year_gte.map(|v| v.to_string()));
        push("week_year__lte", self.week_year_lte.map(|v| v.to_string()));
        push("department", self.department.clone());
        push("department__in", join(&self.departments_in));
        push("employee_id", self.employee_id.clone());
        push("full_name", self.full_name.clone());

        out
    }
}
