use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        force,
        filters,
    } = cmd
    {
        let filter = filters.to_filter()?;
        let path = expand_tilde(file);
        let pool = DbPool::open(&cfg.database)?;

        let n = ExportLogic::export(&pool, &filter, format.clone(), &path, *force)?;

        if n > 0 {
            ttlog_soft(
                &pool.conn,
                "export",
                &path.to_string_lossy(),
                &format!("{} rows as {}", n, format.as_str()),
            );
        }
    }
    Ok(())
}
