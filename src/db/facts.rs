//! SQLite fact store (`time_entries`).

use crate::core::normalize::coerce::{parse_date_str, parse_datetime_str};
use crate::db::filter_sql::build_where;
use crate::db::pool::DbPool;
use crate::db::store::{
    AggregateOp, AggregateValue, FactField, FactStore, FieldKind, ReplaceStats,
};
use crate::errors::AppResult;
use crate::models::entry_type::EntryType;
use crate::models::filter::FactFilter;
use crate::models::time_entry::TimeEntry;
use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{Connection, Row, Transaction, TransactionBehavior, params, params_from_iter};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

const SELECT_COLUMNS: &str = "id, year, office_name, site, week_ending, work_date, date_range,
    week_number, week_year, employee_id, last_name, first_name, full_name, employee_type_id,
    shift, department, allocation_method, time_start, time_end,
    regular_hours_hundredths, overtime_hours_hundredths, double_time_hours_hundredths,
    holiday_hours_hundredths, total_hours_hundredths,
    clock_in_local, clock_in_tries, clock_in_method,
    clock_out_local, clock_out_tries, clock_out_method, entry_type";

pub fn to_hundredths(d: Decimal) -> i64 {
    (d.round_dp(2) * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .unwrap_or(0)
}

pub fn from_hundredths(v: i64) -> Decimal {
    Decimal::new(v, 2)
}

fn timestamp_str(dt: &Option<NaiveDateTime>) -> Option<String> {
    dt.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

pub fn map_row(row: &Row) -> rusqlite::Result<TimeEntry> {
    let week_ending: Option<String> = row.get("week_ending")?;
    let work_date: Option<String> = row.get("work_date")?;
    let time_start: Option<String> = row.get("time_start")?;
    let time_end: Option<String> = row.get("time_end")?;
    let entry_type: String = row.get("entry_type")?;

    Ok(TimeEntry {
        id: row.get("id")?,
        year: row.get("year")?,
        office_name: row.get("office_name")?,
        site: row.get("site")?,
        week_ending: week_ending.as_deref().and_then(parse_date_str),
        work_date: work_date.as_deref().and_then(parse_date_str),
        date_range: row.get("date_range")?,
        week_number: row.get("week_number")?,
        week_year: row.get("week_year")?,
        employee_id: row.get("employee_id")?,
        last_name: row.get("last_name")?,
        first_name: row.get("first_name")?,
        full_name: row.get("full_name")?,
        employee_type_id: row.get("employee_type_id")?,
        shift: row.get("shift")?,
        department: row.get("department")?,
        allocation_method: row.get("allocation_method")?,
        time_start: time_start.as_deref().and_then(parse_datetime_str),
        time_end: time_end.as_deref().and_then(parse_datetime_str),
        regular_hours: from_hundredths(row.get("regular_hours_hundredths")?),
        overtime_hours: from_hundredths(row.get("overtime_hours_hundredths")?),
        double_time_hours: from_hundredths(row.get("double_time_hours_hundredths")?),
        holiday_hours: from_hundredths(row.get("holiday_hours_hundredths")?),
        total_hours: from_hundredths(row.get("total_hours_hundredths")?),
        clock_in_local: row.get("clock_in_local")?,
        clock_in_tries: row.get("clock_in_tries")?,
        clock_in_method: row.get("clock_in_method")?,
        clock_out_local: row.get("clock_out_local")?,
        clock_out_tries: row.get("clock_out_tries")?,
        clock_out_method: row.get("clock_out_method")?,
        entry_type: EntryType::from_db_str(&entry_type),
    })
}

pub fn insert_entries(conn: &Connection, rows: &[TimeEntry]) -> AppResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO time_entries (
            year, office_name, site, week_ending, work_date, date_range,
            week_number, week_year, employee_id, last_name, first_name, full_name,
            employee_type_id, shift, department, allocation_method, time_start, time_end,
            regular_hours_hundredths, overtime_hours_hundredths, double_time_hours_hundredths,
            holiday_hours_hundredths, total_hours_hundredths,
            clock_in_local, clock_in_tries, clock_in_method,
            clock_out_local, clock_out_tries, clock_out_method, entry_type
         ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
            ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30
         )",
    )?;

    for e in rows {
        stmt.execute(params![
            e.year,
            e.office_name,
            e.site,
            e.week_ending.map(|d| d.format("%Y-%m-%d").to_string()),
            e.work_date.map(|d| d.format("%Y-%m-%d").to_string()),
            e.date_range,
            e.week_number,
            e.week_year,
            e.employee_id,
            e.last_name,
            e.first_name,
            e.full_name,
            e.employee_type_id,
            e.shift,
            e.department,
            e.allocation_method,
            timestamp_str(&e.time_start),
            timestamp_str(&e.time_end),
            to_hundredths(e.regular_hours),
            to_hundredths(e.overtime_hours),
            to_hundredths(e.double_time_hours),
            to_hundredths(e.holiday_hours),
            to_hundredths(e.total_hours),
            e.clock_in_local,
            e.clock_in_tries,
            e.clock_in_method,
            e.clock_out_local,
            e.clock_out_tries,
            e.clock_out_method,
            e.entry_type.to_db_str(),
        ])?;
    }

    Ok(rows.len())
}

/// Run `delete` then insert `rows` in one IMMEDIATE transaction: the write
/// lock is taken up front, so two imports never interleave.
fn replace_with<F>(pool: &mut DbPool, rows: &[TimeEntry], delete: F) -> AppResult<ReplaceStats>
where
    F: FnOnce(&Transaction) -> rusqlite::Result<usize>,
{
    let tx = pool
        .conn
        .transaction_with_behavior(TransactionBehavior::Immediate)?;

    let deleted = delete(&tx)?;
    let inserted = insert_entries(&tx, rows)?;

    tx.commit()?;

    Ok(ReplaceStats { deleted, inserted })
}

fn aggregate_value(kind: FieldKind, op: AggregateOp, v: Value) -> Option<AggregateValue> {
    match (kind, v) {
        (_, Value::Null) => None,
        (FieldKind::Hours, Value::Integer(i)) => Some(AggregateValue::Decimal(from_hundredths(i))),
        (FieldKind::Integer, Value::Integer(i)) => Some(AggregateValue::Int(i)),
        (FieldKind::Date, Value::Text(s)) if op != AggregateOp::Sum => {
            parse_date_str(&s).map(AggregateValue::Date)
        }
        (_, Value::Integer(i)) => Some(AggregateValue::Int(i)),
        (_, Value::Real(r)) => Some(AggregateValue::Text(r.to_string())),
        (_, Value::Text(s)) => Some(AggregateValue::Text(s)),
        (_, Value::Blob(_)) => None,
    }
}

fn value_text(kind: FieldKind, v: Value) -> Option<String> {
    match (kind, v) {
        (_, Value::Null) => None,
        (FieldKind::Hours, Value::Integer(i)) => Some(from_hundredths(i).to_string()),
        (_, Value::Integer(i)) => Some(i.to_string()),
        (_, Value::Real(r)) => Some(r.to_string()),
        (_, Value::Text(s)) if s.trim().is_empty() => None,
        (_, Value::Text(s)) => Some(s),
        (_, Value::Blob(_)) => None,
    }
}

impl FactStore for DbPool {
    fn replace_year(&mut self, year: i32, rows: &[TimeEntry]) -> AppResult<ReplaceStats> {
        replace_with(self, rows, |tx| {
            tx.execute("DELETE FROM time_entries WHERE year = ?1", [year])
        })
    }

    fn replace_all(&mut self, rows: &[TimeEntry]) -> AppResult<ReplaceStats> {
        replace_with(self, rows, |tx| tx.execute("DELETE FROM time_entries", []))
    }

    fn query(&self, filter: &FactFilter) -> AppResult<Vec<TimeEntry>> {
        let w = build_where(filter);
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM time_entries{}
             ORDER BY week_ending DESC, site ASC, id ASC",
            w.sql()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(w.params.iter()), map_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn count(&self, filter: &FactFilter) -> AppResult<usize> {
        let w = build_where(filter);
        let sql = format!("SELECT COUNT(*) FROM time_entries{}", w.sql());

        let n: i64 = self
            .conn
            .query_row(&sql, params_from_iter(w.params.iter()), |row| row.get(0))?;
        Ok(n as usize)
    }

    fn distinct(&self, field: FactField, filter: &FactFilter) -> AppResult<Vec<String>> {
        let col = field.column();
        let mut w = build_where(filter);
        w.and(&format!("{col} IS NOT NULL"));

        let sql = format!(
            "SELECT DISTINCT {col} FROM time_entries{} ORDER BY {col} ASC",
            w.sql()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(w.params.iter()), |row| {
            row.get::<_, Value>(0)
        })?;

        let kind = field.kind();
        let mut out = Vec::new();
        for r in rows {
            if let Some(s) = value_text(kind, r?) {
                out.push(s);
            }
        }
        Ok(out)
    }

    fn aggregate(
        &self,
        op: AggregateOp,
        field: FactField,
        filter: &FactFilter,
    ) -> AppResult<Option<AggregateValue>> {
        let col = field.column();
        let mut w = build_where(filter);
        if field.kind() == FieldKind::Date || field.kind() == FieldKind::Text {
            w.and(&format!("{col} IS NOT NULL AND {col} <> ''"));
        }

        let sql = format!("SELECT {}({col}) FROM time_entries{}", op.sql(), w.sql());

        let v: Value = self
            .conn
            .query_row(&sql, params_from_iter(w.params.iter()), |row| row.get(0))?;

        Ok(aggregate_value(field.kind(), op, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn hundredths_round_trip() {
        assert_eq!(to_hundredths(dec!(8.5)), 850);
        assert_eq!(to_hundredths(dec!(0.125)), 12);
        assert_eq!(from_hundredths(850), dec!(8.50));
        assert_eq!(to_hundredths(dec!(-1.25)), -125);
    }
}
