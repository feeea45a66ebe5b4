use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::backfill::{BACKFILL_BATCH, backfill_week_numbers, pending_backfill};
use crate::db::log::ttlog_soft;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
        backfill_weeks,
    } = cmd
    {
        if !(*migrate || *check || *vacuum || *info || *backfill_weeks) {
            return Ok(());
        }

        // Unica istanza condivisa
        let pool = DbPool::new(&cfg.database)?;

        //
        // 1) MIGRATE (implicito per le altre opzioni)
        //
        if *migrate {
            println!("{}▶ Running migrations…{}", CYAN, RESET);
        }
        run_pending_migrations(&pool.conn)?;
        if *migrate {
            println!("{}✔ Migration completed.{}\n", GREEN, RESET);
        }

        //
        // 2) BACKFILL
        //
        if *backfill_weeks {
            let pending = pending_backfill(&pool.conn)?;
            println!(
                "{}▶ Backfilling ISO weeks ({} rows pending)…{}",
                CYAN, pending, RESET
            );

            let updated = backfill_week_numbers(&pool.conn, BACKFILL_BATCH)?;

            ttlog_soft(
                &pool.conn,
                "backfill",
                "time_entries",
                &format!("Backfilled week numbers on {updated} rows"),
            );
            println!("{}✔ Updated {} rows.{}\n", GREEN, updated, RESET);
        }

        //
        // 3) INFO
        //
        if *info {
            stats::print_db_info(&pool, &cfg.database, Local::now().date_naive())?;
        }

        //
        // 4) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }

        //
        // 5) VACUUM
        //
        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);

            pool.conn.execute_batch("VACUUM;")?;
            ttlog_soft(&pool.conn, "vacuum", "", "Database vacuumed");

            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
