//! One-time fill of ISO week fields on legacy fact rows.

use crate::core::normalize::coerce::parse_date_str;
use crate::core::week::week_align;
use crate::errors::AppResult;
use rusqlite::{Connection, params};

pub const BACKFILL_BATCH: usize = 5000;

/// Rows whose week-ending date is set but whose ISO week fields are not.
pub fn pending_backfill(conn: &Connection) -> AppResult<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM time_entries
         WHERE week_ending IS NOT NULL AND week_ending <> ''
           AND (week_number IS NULL OR week_year IS NULL)",
        [],
        |row| row.get(0),
    )?;
    Ok(n as usize)
}

/// Fill `week_number`/`week_year` from `week_ending`, `batch` rows per
/// transaction. Rows with an unreadable date are left as they are.
/// Returns how many rows were updated.
pub fn backfill_week_numbers(conn: &Connection, batch: usize) -> AppResult<usize> {
    let batch = batch.max(1);
    let mut updated = 0usize;
    let mut last_id = 0i64;

    loop {
        let rows: Vec<(i64, String)> = {
            let mut stmt = conn.prepare_cached(
                "SELECT id, week_ending FROM time_entries
                 WHERE id > ?1
                   AND week_ending IS NOT NULL AND week_ending <> ''
                   AND (week_number IS NULL OR week_year IS NULL)
                 ORDER BY id ASC
                 LIMIT ?2",
            )?;
            let mapped = stmt.query_map(params![last_id, batch as i64], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;

            let mut out = Vec::new();
            for r in mapped {
                out.push(r?);
            }
            out
        };

        if rows.is_empty() {
            break;
        }

        let tx = conn.unchecked_transaction()?;
        {
            let mut upd = tx.prepare_cached(
                "UPDATE time_entries SET week_number = ?1, week_year = ?2 WHERE id = ?3",
            )?;

            for (id, raw) in &rows {
                last_id = *id;
                if let (Some(week), Some(year)) = week_align(parse_date_str(raw)) {
                    upd.execute(params![week, year, id])?;
                    updated += 1;
                }
            }
        }
        tx.commit()?;

        if rows.len() < batch {
            break;
        }
    }

    Ok(updated)
}
