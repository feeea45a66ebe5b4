pub mod config;
pub mod db;
pub mod export;
pub mod history;
pub mod import;
pub mod init;
pub mod kpi;
pub mod log;
pub mod options;
pub mod report;
pub mod summary;
pub mod sync;
