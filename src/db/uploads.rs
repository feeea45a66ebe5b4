use crate::errors::{AppError, AppResult};
use crate::models::upload::{FileKind, Upload, UploadStatus};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn conversion_error(msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(AppError::Other(msg)),
    )
}

fn map_row(row: &Row) -> rusqlite::Result<Upload> {
    let kind_str: String = row.get("file_kind")?;
    let file_kind = FileKind::from_db_str(&kind_str)
        .ok_or_else(|| conversion_error(format!("Invalid file kind: {kind_str}")))?;

    let status_str: String = row.get("status")?;
    let status = UploadStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(format!("Invalid upload status: {status_str}")))?;

    Ok(Upload {
        id: row.get("id")?,
        file_path: row.get("file_path")?,
        file_kind,
        year: row.get("year")?,
        uploaded_at: row.get("uploaded_at")?,
        status,
        records_processed: row.get::<_, i64>("records_processed")? as usize,
        error_message: row.get("error_message")?,
        processing_time: row.get("processing_time")?,
        replace_all_years: row.get::<_, i32>("replace_all_years")? == 1,
    })
}

/// Register a file handed in for import (status `pending`).
pub fn insert_upload(
    conn: &Connection,
    file_path: &str,
    file_kind: FileKind,
    year: i32,
    replace_all_years: bool,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO uploads (file_path, file_kind, year, uploaded_at, status, replace_all_years)
         VALUES (?1, ?2, ?3, ?4, 'pending', ?5)",
        params![
            file_path,
            file_kind.to_db_str(),
            year,
            Local::now().to_rfc3339(),
            if replace_all_years { 1 } else { 0 },
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_upload(conn: &Connection, id: i64) -> AppResult<Upload> {
    conn.query_row("SELECT * FROM uploads WHERE id = ?1", [id], map_row)
        .optional()?
        .ok_or(AppError::UploadNotFound(id))
}

pub fn set_status(conn: &Connection, id: i64, status: UploadStatus) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE uploads SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )?;
    if changed == 0 {
        return Err(AppError::UploadNotFound(id));
    }
    Ok(())
}

pub fn finish_upload(
    conn: &Connection,
    id: i64,
    status: UploadStatus,
    records_processed: usize,
    error_message: &str,
    processing_time: f64,
) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE uploads
            SET status = ?1, records_processed = ?2, error_message = ?3, processing_time = ?4
          WHERE id = ?5",
        params![
            status.to_db_str(),
            records_processed as i64,
            error_message,
            processing_time,
            id
        ],
    )?;
    if changed == 0 {
        return Err(AppError::UploadNotFound(id));
    }
    Ok(())
}

/// Newest first.
pub fn list_uploads(conn: &Connection, limit: usize) -> AppResult<Vec<Upload>> {
    let mut stmt = conn.prepare("SELECT * FROM uploads ORDER BY id DESC LIMIT ?1")?;
    let rows = stmt.query_map([limit as i64], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
