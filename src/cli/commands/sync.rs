use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ingest::IngestionPipeline;
use crate::core::normalize::Normalizer;
use crate::core::sync::{discover_sources, sync_sources};
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{error, header, success, warning};
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sync {
        year,
        clear_all,
        dir,
    } = cmd
    {
        let data_dir = match dir {
            Some(d) => expand_tilde(d),
            None => cfg.data_dir_path(),
        };

        let files = discover_sources(&data_dir, &cfg.source_file_name, *year)?;
        header(format!("Syncing {} file(s) from {}", files.len(), data_dir.display()));

        let mut pool = DbPool::open(&cfg.database)?;
        let normalizer = Normalizer::default();

        let report = {
            let mut pipeline = IngestionPipeline::new(&mut pool, &normalizer);
            sync_sources(
                &mut pipeline,
                &files,
                cfg.effective_default_year(),
                *clear_all,
            )?
        };

        for f in &report.synced {
            if f.outcome.success {
                success(&f.outcome.message);
            } else {
                error(format!("{}: {}", f.path.display(), f.outcome.message));
            }
        }

        let summary = format!(
            "{} file(s) synced, {} failed, {} skipped, {} records",
            report.synced.len() - report.failures(),
            report.failures(),
            report.skipped.len(),
            report.records()
        );

        ttlog_soft(
            &pool.conn,
            "sync",
            &data_dir.to_string_lossy(),
            &summary,
        );

        if report.failures() > 0 || !report.skipped.is_empty() {
            warning(summary);
        } else {
            success(summary);
        }
    }

    Ok(())
}
