use crate::db::backfill::{BACKFILL_BATCH, backfill_week_numbers};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use rusqlite::{Connection, OptionalExtension, Result};

const MIGRATION_ISO_WEEK_COLUMNS: &str = "20250610_0002_add_iso_week_columns";

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Fact table with the current schema. Hours are integer hundredths.
fn create_time_entries_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS time_entries (
            id                          INTEGER PRIMARY KEY AUTOINCREMENT,
            year                        INTEGER NOT NULL,
            office_name                 TEXT NOT NULL DEFAULT '',
            site                        TEXT NOT NULL DEFAULT '',
            week_ending                 TEXT,
            work_date                   TEXT,
            date_range                  TEXT NOT NULL DEFAULT '',
            week_number                 INTEGER,
            week_year                   INTEGER,
            employee_id                 TEXT NOT NULL DEFAULT '',
            last_name                   TEXT NOT NULL DEFAULT '',
            first_name                  TEXT NOT NULL DEFAULT '',
            full_name                   TEXT NOT NULL DEFAULT '',
            employee_type_id            TEXT NOT NULL DEFAULT '',
            shift                       TEXT NOT NULL DEFAULT '',
            department                  TEXT NOT NULL DEFAULT '',
            allocation_method           TEXT NOT NULL DEFAULT '',
            time_start                  TEXT,
            time_end                    TEXT,
            regular_hours_hundredths    INTEGER NOT NULL DEFAULT 0,
            overtime_hours_hundredths   INTEGER NOT NULL DEFAULT 0,
            double_time_hours_hundredths INTEGER NOT NULL DEFAULT 0,
            holiday_hours_hundredths    INTEGER NOT NULL DEFAULT 0,
            total_hours_hundredths      INTEGER NOT NULL DEFAULT 0,
            clock_in_local              TEXT NOT NULL DEFAULT '',
            clock_in_tries              INTEGER NOT NULL DEFAULT 1,
            clock_in_method             TEXT NOT NULL DEFAULT '',
            clock_out_local             TEXT NOT NULL DEFAULT '',
            clock_out_tries             INTEGER NOT NULL DEFAULT 1,
            clock_out_method            TEXT NOT NULL DEFAULT '',
            entry_type                  TEXT NOT NULL DEFAULT ''
        );
        "#,
    )?;
    Ok(())
}

fn create_time_entries_indices(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_entries_year_week ON time_entries(year, week_ending);
        CREATE INDEX IF NOT EXISTS idx_entries_site_type ON time_entries(site, entry_type);
        CREATE INDEX IF NOT EXISTS idx_entries_iso_week ON time_entries(week_year, week_number);
        "#,
    )?;
    Ok(())
}

fn create_etl_history_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS etl_history (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            year              INTEGER NOT NULL,
            run_date          TEXT NOT NULL,
            status            TEXT NOT NULL CHECK(status IN ('running','success','failed')),
            records_processed INTEGER NOT NULL DEFAULT 0,
            duration_seconds  REAL,
            message           TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_etl_history_run_date ON etl_history(run_date);
        "#,
    )?;
    Ok(())
}

fn create_uploads_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS uploads (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            file_path         TEXT NOT NULL,
            file_kind         TEXT NOT NULL CHECK(file_kind IN ('csv','excel')),
            year              INTEGER NOT NULL,
            uploaded_at       TEXT NOT NULL,
            status            TEXT NOT NULL DEFAULT 'pending'
                              CHECK(status IN ('pending','processing','success','failed')),
            records_processed INTEGER NOT NULL DEFAULT 0,
            error_message     TEXT NOT NULL DEFAULT '',
            processing_time   REAL,
            replace_all_years INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )?;
    Ok(())
}

/// Fact tables created before ISO week alignment lack `week_number` and
/// `week_year`: add them, then fill them from the week-ending dates.
fn migrate_add_iso_week_columns(conn: &Connection) -> AppResult<()> {
    if migration_applied(conn, MIGRATION_ISO_WEEK_COLUMNS)? {
        return Ok(());
    }

    let has_number = has_column(conn, "time_entries", "week_number")?;
    let has_year = has_column(conn, "time_entries", "week_year")?;

    if has_number && has_year {
        mark_applied(
            conn,
            MIGRATION_ISO_WEEK_COLUMNS,
            "ISO week columns already present",
        )?;
        return Ok(());
    }

    warning("Adding ISO week columns to time_entries...");

    if !has_number {
        conn.execute("ALTER TABLE time_entries ADD COLUMN week_number INTEGER;", [])
            .map_err(|e| AppError::Migration(format!("Failed to add 'week_number': {e}")))?;
    }
    if !has_year {
        conn.execute("ALTER TABLE time_entries ADD COLUMN week_year INTEGER;", [])
            .map_err(|e| AppError::Migration(format!("Failed to add 'week_year': {e}")))?;
    }

    let filled = backfill_week_numbers(conn, BACKFILL_BATCH)?;

    mark_applied(
        conn,
        MIGRATION_ISO_WEEK_COLUMNS,
        &format!("Added ISO week columns, backfilled {filled} rows"),
    )?;

    success(format!(
        "Migration applied: {} → week columns added, {} rows backfilled",
        MIGRATION_ISO_WEEK_COLUMNS, filled
    ));

    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invocata da db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Fact table: fresh schema, or upgrade of a pre-ISO-week one
    if table_exists(conn, "time_entries")? {
        migrate_add_iso_week_columns(conn)?;
    } else {
        create_time_entries_table(conn)?;
        mark_applied(
            conn,
            MIGRATION_ISO_WEEK_COLUMNS,
            "Created time_entries with ISO week columns",
        )?;
        success("Created time_entries table (current schema).");
    }
    create_time_entries_indices(conn)?;

    // 3) Audit and upload tables
    create_etl_history_table(conn)?;
    create_uploads_table(conn)?;

    Ok(())
}
