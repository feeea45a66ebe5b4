use crate::db::pool::DbPool;
use crate::db::store::EtlAudit;
use crate::errors::{AppError, AppResult};
use crate::models::etl_run::{EtlRun, EtlStatus};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_row(row: &Row) -> rusqlite::Result<EtlRun> {
    let status_str: String = row.get("status")?;
    let status = EtlStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid ETL status: {}", status_str))),
        )
    })?;

    Ok(EtlRun {
        id: row.get("id")?,
        year: row.get("year")?,
        run_date: row.get("run_date")?,
        status,
        records_processed: row.get::<_, i64>("records_processed")? as usize,
        duration_seconds: row.get("duration_seconds")?,
        message: row.get("message")?,
    })
}

pub fn insert_run(conn: &Connection, year: i32, message: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO etl_history (year, run_date, status, records_processed, message)
         VALUES (?1, ?2, 'running', 0, ?3)",
        params![year, Local::now().to_rfc3339(), message],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Only a `running` record can be finalized.
pub fn finalize_run(
    conn: &Connection,
    id: i64,
    status: EtlStatus,
    records_processed: usize,
    duration_seconds: f64,
    message: &str,
) -> AppResult<()> {
    if status == EtlStatus::Running {
        return Err(AppError::Other(format!(
            "ETL run {id} cannot be finalized as running"
        )));
    }

    let changed = conn.execute(
        "UPDATE etl_history
            SET status = ?1, records_processed = ?2, duration_seconds = ?3, message = ?4
          WHERE id = ?5 AND status = 'running'",
        params![
            status.to_db_str(),
            records_processed as i64,
            duration_seconds,
            message,
            id
        ],
    )?;

    if changed == 0 {
        return Err(AppError::Other(format!(
            "ETL run {id} is not running (already finalized or missing)"
        )));
    }
    Ok(())
}

pub fn get_run(conn: &Connection, id: i64) -> AppResult<Option<EtlRun>> {
    let run = conn
        .query_row("SELECT * FROM etl_history WHERE id = ?1", [id], map_row)
        .optional()?;
    Ok(run)
}

/// Newest first.
pub fn list_runs(conn: &Connection, limit: usize) -> AppResult<Vec<EtlRun>> {
    let mut stmt =
        conn.prepare("SELECT * FROM etl_history ORDER BY run_date DESC, id DESC LIMIT ?1")?;
    let rows = stmt.query_map([limit as i64], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn last_success(conn: &Connection) -> AppResult<Option<EtlRun>> {
    let run = conn
        .query_row(
            "SELECT * FROM etl_history WHERE status = 'success'
             ORDER BY run_date DESC, id DESC LIMIT 1",
            [],
            map_row,
        )
        .optional()?;
    Ok(run)
}

impl EtlAudit for DbPool {
    fn open_run(&mut self, year: i32, message: &str) -> AppResult<i64> {
        insert_run(&self.conn, year, message)
    }

    fn finish_run(
        &mut self,
        id: i64,
        status: EtlStatus,
        records_processed: usize,
        duration_seconds: f64,
        message: &str,
    ) -> AppResult<()> {
        finalize_run(
            &self.conn,
            id,
            status,
            records_processed,
            duration_seconds,
            message,
        )
    }
}
