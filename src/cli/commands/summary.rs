use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::kpi::percentage;
use crate::db::pool::DbPool;
use crate::db::store::{AggregateOp, AggregateValue, FactField, FactStore};
use crate::errors::AppResult;
use crate::models::filter::FactFilter;
use crate::ui::messages::{header, info};
use crate::utils::fmt_rate;
use crate::utils::table::{Column, Table};

fn show(v: Option<AggregateValue>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary { filters } = cmd {
        let filter = filters.to_filter()?;
        let pool = DbPool::open(&cfg.database)?;

        let total = pool.count(&filter)?;
        if total == 0 {
            info("No records match the selected filters.");
            return Ok(());
        }

        header("Summary");
        println!("  Entries:      {}", total);
        println!(
            "  Total hours:  {}",
            show(pool.aggregate(AggregateOp::Sum, FactField::TotalHours, &filter)?)
        );
        println!(
            "  Week-ending:  {} → {}",
            show(pool.aggregate(AggregateOp::Min, FactField::WeekEnding, &filter)?),
            show(pool.aggregate(AggregateOp::Max, FactField::WeekEnding, &filter)?)
        );
        println!(
            "  Offices:      {}",
            pool.distinct(FactField::Site, &filter)?.len()
        );
        println!(
            "  Employees:    {}",
            pool.distinct(FactField::EmployeeId, &filter)?.len()
        );
        println!();

        let mut t = Table::new(vec![
            Column::left("Entry type"),
            Column::right("Entries"),
            Column::right("Share"),
            Column::right("Hours"),
        ]);

        for label in pool.distinct(FactField::EntryType, &filter)? {
            let by_type = FactFilter {
                entry_type: Some(label.clone()),
                ..filter.clone()
            };
            let n = pool.count(&by_type)?;
            t.add_row(vec![
                label,
                n.to_string(),
                fmt_rate(percentage(n, total)),
                show(pool.aggregate(AggregateOp::Sum, FactField::TotalHours, &by_type)?),
            ]);
        }
        t.print();
    }

    Ok(())
}
