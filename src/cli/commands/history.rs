use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::etl_history::list_runs;
use crate::db::pool::DbPool;
use crate::db::uploads::list_uploads;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::{GREEN, RED, YELLOW, paint};
use crate::utils::table::{Column, Table};

fn status_color(status: &str) -> &'static str {
    match status {
        "success" => GREEN,
        "failed" => RED,
        _ => YELLOW,
    }
}

fn seconds(s: Option<f64>) -> String {
    s.map(|v| format!("{v:.2}s")).unwrap_or_else(|| "-".to_string())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History { uploads, limit } = cmd {
        let pool = DbPool::open(&cfg.database)?;

        if *uploads {
            let rows = list_uploads(&pool.conn, *limit)?;
            if rows.is_empty() {
                info("No uploads recorded.");
                return Ok(());
            }

            let mut t = Table::new(vec![
                Column::right("ID"),
                Column::left("Uploaded"),
                Column::left("File"),
                Column::left("Kind"),
                Column::right("Year"),
                Column::left("Status"),
                Column::right("Records"),
                Column::right("Time"),
                Column::left("Error"),
            ]);

            for u in rows {
                let status = u.status.to_db_str();
                t.add_row(vec![
                    u.id.to_string(),
                    u.uploaded_at.clone(),
                    u.file_name(),
                    u.file_kind.to_db_str().to_string(),
                    u.year.to_string(),
                    paint(status_color(status), status),
                    u.records_processed.to_string(),
                    seconds(u.processing_time),
                    u.error_message.clone(),
                ]);
            }
            t.print();
        } else {
            let rows = list_runs(&pool.conn, *limit)?;
            if rows.is_empty() {
                info("No ETL runs recorded.");
                return Ok(());
            }

            let mut t = Table::new(vec![
                Column::right("ID"),
                Column::left("Run date"),
                Column::right("Year"),
                Column::left("Status"),
                Column::right("Records"),
                Column::right("Duration"),
                Column::left("Message"),
            ]);

            for r in rows {
                let status = r.status.to_db_str();
                t.add_row(vec![
                    r.id.to_string(),
                    r.run_date.clone(),
                    r.year.to_string(),
                    paint(status_color(status), status),
                    r.records_processed.to_string(),
                    seconds(r.duration_seconds),
                    r.message.clone(),
                ]);
            }
            t.print();
        }
    }

    Ok(())
}
