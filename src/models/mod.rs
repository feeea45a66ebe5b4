pub mod entry_type;
pub mod etl_run;
pub mod filter;
pub mod time_entry;
pub mod upload;
