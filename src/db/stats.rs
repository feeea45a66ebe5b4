use crate::db::etl_history::last_success;
use crate::db::pool::DbPool;
use crate::db::store::{AggregateOp, AggregateValue, FactField, FactStore};
use crate::errors::AppResult;
use crate::models::etl_run::EtlRun;
use crate::models::filter::FactFilter;
use crate::utils::colors::{CYAN, GREEN, GREY, RED, RESET, YELLOW};
use chrono::NaiveDate;
use std::fs;

/// Age class of the newest week-ending date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Current,
    Recent,
    Stale,
    Outdated,
}

impl Freshness {
    /// ≤7 days current, ≤14 recent, ≤30 stale, older outdated.
    pub fn from_age(days: i64) -> Self {
        match days {
            d if d <= 7 => Freshness::Current,
            d if d <= 14 => Freshness::Recent,
            d if d <= 30 => Freshness::Stale,
            _ => Freshness::Outdated,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Current => "current",
            Freshness::Recent => "recent",
            Freshness::Stale => "stale",
            Freshness::Outdated => "outdated",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            Freshness::Current => GREEN,
            Freshness::Recent => CYAN,
            Freshness::Stale => YELLOW,
            Freshness::Outdated => RED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbInfo {
    pub total_rows: usize,
    pub first_week: Option<NaiveDate>,
    pub last_week: Option<NaiveDate>,
    pub per_year: Vec<(i32, usize)>,
    pub last_success: Option<EtlRun>,
    pub freshness: Option<Freshness>,
}

fn as_date(v: Option<AggregateValue>) -> Option<NaiveDate> {
    match v {
        Some(AggregateValue::Date(d)) => Some(d),
        _ => None,
    }
}

pub fn collect_db_info(pool: &DbPool, today: NaiveDate) -> AppResult<DbInfo> {
    let all = FactFilter::default();

    let total_rows = pool.count(&all)?;
    let first_week = as_date(pool.aggregate(AggregateOp::Min, FactField::WeekEnding, &all)?);
    let last_week = as_date(pool.aggregate(AggregateOp::Max, FactField::WeekEnding, &all)?);

    let mut per_year = Vec::new();
    for y in pool.distinct(FactField::Year, &all)? {
        if let Ok(year) = y.parse::<i32>() {
            per_year.push((year, pool.count(&FactFilter::for_year(year))?));
        }
    }

    let freshness = last_week.map(|d| Freshness::from_age((today - d).num_days()));

    Ok(DbInfo {
        total_rows,
        first_week,
        last_week,
        per_year,
        last_success: last_success(&pool.conn)?,
        freshness,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str, today: NaiveDate) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    let info = collect_db_info(pool, today)?;

    //
    // 2) TOTAL ROWS
    //
    println!(
        "{}• Total entries:{} {}{}{}",
        CYAN, RESET, GREEN, info.total_rows, RESET
    );

    //
    // 3) WEEK RANGE
    //
    let fmt = |d: Option<NaiveDate>| {
        d.map(|d| d.to_string())
            .unwrap_or_else(|| format!("{GREY}--{RESET}"))
    };

    println!("{}• Week-ending range:{}", CYAN, RESET);
    println!("    from: {}", fmt(info.first_week));
    println!("    to:   {}", fmt(info.last_week));

    //
    // 4) PER YEAR
    //
    if !info.per_year.is_empty() {
        println!("{}• Entries per year:{}", CYAN, RESET);
        for (year, n) in &info.per_year {
            println!("    {}: {}", year, n);
        }
    }

    //
    // 5) FRESHNESS / LAST ETL
    //
    match info.freshness {
        Some(f) => println!("{}• Freshness:{} {}{}{}", CYAN, RESET, f.color(), f.as_str(), RESET),
        None => println!("{}• Freshness:{} {GREY}unknown{RESET}", CYAN, RESET),
    }

    match &info.last_success {
        Some(run) => println!(
            "{}• Last successful ETL:{} {} (year {}, {} records)",
            CYAN, RESET, run.run_date, run.year, run.records_processed
        ),
        None => println!("{}• Last successful ETL:{} {GREY}--{RESET}", CYAN, RESET),
    }

    println!();
    Ok(())
}
