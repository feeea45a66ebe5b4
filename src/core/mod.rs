pub mod ingest;
pub mod kpi;
pub mod log;
pub mod normalize;
pub mod report;
pub mod source;
pub mod sync;
pub mod upload;
pub mod week;
