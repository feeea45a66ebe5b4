use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::normalize::Normalizer;
use crate::core::upload::UploadLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::upload::FileKind;
use crate::ui::messages::{info, success};
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import {
        file,
        year,
        kind,
        clear_all,
    } = cmd
    {
        let path = expand_tilde(file);

        let kind = match kind.or_else(|| FileKind::from_path(&path)) {
            Some(k) => k,
            None => {
                return Err(AppError::SourceFormat(format!(
                    "cannot tell the format of {} (use --kind csv|excel)",
                    path.display()
                )));
            }
        };

        let year = year.unwrap_or_else(|| cfg.effective_default_year());

        let mut pool = DbPool::open(&cfg.database)?;
        let upload_id = UploadLogic::register(&pool, &path, kind, year, *clear_all)?;
        info(format!(
            "Upload #{} registered: {} ({}, year {})",
            upload_id,
            path.display(),
            kind.to_db_str(),
            year
        ));

        let normalizer = Normalizer::default();
        let outcome = UploadLogic::process(&mut pool, &normalizer, upload_id)?;

        if !outcome.success {
            return Err(AppError::ImportFailed(outcome.message));
        }

        success(format!(
            "{} ({} replaced, {:.2}s)",
            outcome.message, outcome.deleted, outcome.duration_seconds
        ));
    }

    Ok(())
}
