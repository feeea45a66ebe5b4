//! FactFilter → SQL `WHERE` clause.

use crate::models::filter::FactFilter;
use rusqlite::types::Value;

#[derive(Debug, Default)]
pub struct SqlWhere {
    clauses: Vec<String>,
    pub params: Vec<Value>,
}

impl SqlWhere {
    /// ` WHERE a AND b`, or an empty string when there is no criterion.
    pub fn sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    /// Append an extra condition with no parameter.
    pub fn and(&mut self, clause: &str) {
        self.clauses.push(clause.to_string());
    }

    fn cmp(&mut self, column: &str, op: &str, v: Value) {
        self.clauses.push(format!("{column} {op} ?"));
        self.params.push(v);
    }

    fn iexact(&mut self, column: &str, v: &str) {
        self.clauses.push(format!("{column} = ? COLLATE NOCASE"));
        self.params.push(Value::Text(v.to_string()));
    }

    fn icontains(&mut self, column: &str, v: &str) {
        self.clauses.push(format!("{column} LIKE ? ESCAPE '\\'"));
        self.params.push(Value::Text(format!("%{}%", escape_like(v))));
    }

    fn one_of(&mut self, column: &str, values: &[String]) {
        if values.is_empty() {
            return;
        }
        let marks = vec!["?"; values.len()].join(", ");
        self.clauses.push(format!("{column} IN ({marks})"));
        self.params
            .extend(values.iter().map(|v| Value::Text(v.clone())));
    }
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn int(v: impl Into<i64>) -> Value {
    Value::Integer(v.into())
}

fn date(d: chrono::NaiveDate) -> Value {
    Value::Text(d.format("%Y-%m-%d").to_string())
}

pub fn build_where(f: &FactFilter) -> SqlWhere {
    let mut w = SqlWhere::default();

    if let Some(v) = f.year {
        w.cmp("year", "=", int(v));
    }
    if let Some(v) = f.year_gte {
        w.cmp("year", ">=", int(v));
    }
    if let Some(v) = f.year_lte {
        w.cmp("year", "<=", int(v));
    }

    if let Some(v) = &f.site {
        w.iexact("site", v);
    }
    w.one_of("site", &f.sites_in);

    if let Some(v) = &f.entry_type {
        w.iexact("entry_type", v);
    }
    w.one_of("entry_type", &f.entry_types_in);

    if let Some(d) = f.week_ending {
        w.cmp("week_ending", "=", date(d));
    }
    if let Some(d) = f.week_ending_gte {
        w.cmp("week_ending", ">=", date(d));
    }
    if let Some(d) = f.week_ending_lte {
        w.cmp("week_ending", "<=", date(d));
    }

    if let Some(v) = f.week_number {
        w.cmp("week_number", "=", int(v));
    }
    if let Some(v) = f.week_number_gte {
        w.cmp("week_number", ">=", int(v));
    }
    if let Some(v) = f.week_number_lte {
        w.cmp("week_number", "<=", int(v));
    }
    if let Some(v) = f.week_year {
        w.cmp("week_year", "=", int(v));
    }
    if let Some(v) = f.week_year_gte {
        w.cmp("week_year", ">=", int(v));
    }
    if let Some(v) = f.week_year_lte {
        w.cmp("week_year", "<=", int(v));
    }

    if let Some(v) = &f.department {
        w.icontains("department", v);
    }
    w.one_of("department", &f.departments_in);

    if let Some(v) = &f.employee_id {
        w.cmp("employee_id", "=", Value::Text(v.clone()));
    }
    if let Some(v) = &f.full_name {
        w.icontains("full_name", v);
    }

    w
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_where() {
        let w = build_where(&FactFilter::default());
        assert_eq!(w.sql(), "");
        assert!(w.params.is_empty());
    }

    #[test]
    fn criteria_are_joined_in_order() {
        let f = FactFilter {
            year: Some(2025),
            site: Some("martinsburg".into()),
            sites_in: vec!["A".into(), "B".into()],
            ..FactFilter::default()
        };
        let w = build_where(&f);
        assert_eq!(
            w.sql(),
            " WHERE year = ? AND site = ? COLLATE NOCASE AND site IN (?, ?)"
        );
        assert_eq!(w.params.len(), 4);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        let f = FactFilter {
            department: Some("50%_off".into()),
            ..FactFilter::default()
        };
        let w = build_where(&f);
        assert_eq!(w.params, vec![Value::Text("%50\\%\\_off%".into())]);
    }
}
