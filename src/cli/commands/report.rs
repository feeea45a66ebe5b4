use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::export::logic::ReportKind;
use crate::ui::messages::info;
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report {
        file,
        weekly,
        force,
        filters,
    } = cmd
    {
        let filter = filters.to_filter()?;
        let year = filter
            .year
            .unwrap_or_else(|| cfg.effective_default_year());
        let kind = if *weekly {
            ReportKind::Weekly
        } else {
            ReportKind::Full
        };

        let path = expand_tilde(file);
        let pool = DbPool::open(&cfg.database)?;
        let report = ExportLogic::report(&pool, &filter, year, kind, &path, *force)?;

        info(format!("Sheets: {}", report.sheet_names().join(", ")));

        ttlog_soft(
            &pool.conn,
            "report",
            &path.to_string_lossy(),
            &format!("{} sheets, year {}", report.sheets.len(), year),
        );
    }

    Ok(())
}
