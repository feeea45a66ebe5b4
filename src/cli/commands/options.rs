use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::store::{FactField, FactStore};
use crate::errors::AppResult;
use crate::models::filter::FactFilter;
use crate::ui::messages::header;

/// Print the distinct values usable with the filter flags.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database)?;
    let all = FactFilter::default();

    let sections = [
        ("Years (--year)", FactField::Year),
        ("Sites (--site)", FactField::Site),
        ("Entry types (--entry-type)", FactField::EntryType),
        ("Departments (--department)", FactField::Department),
        ("Week endings (--week-ending)", FactField::WeekEnding),
    ];

    for (title, field) in sections {
        header(title);
        let values = pool.distinct(field, &all)?;
        if values.is_empty() {
            println!("  (none)");
        }
        for v in values {
            println!("  {v}");
        }
        println!();
    }

    Ok(())
}
