pub mod backfill;
pub mod etl_history;
pub mod facts;
pub mod filter_sql;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod stats;
pub mod store;
pub mod uploads;
