//! Ingestion pipeline: source → normalizer → week aligner → replace-for-year.
//!
//! Every attempt is audited: a `running` record is opened before anything
//! else and finalized exactly once. The source is fully parsed, normalized
//! and checked before the store is touched, and the store replaces the
//! year in a single transaction, so a failed attempt leaves the previous
//! facts of that year in place.

use crate::core::normalize::Normalizer;
use crate::core::source::{RawTable, read_source};
use crate::core::week::align_entries;
use crate::db::store::{EtlAudit, FactStore, ReplaceStats};
use crate::errors::{AppError, AppResult};
use crate::models::etl_run::EtlStatus;
use crate::models::time_entry::TimeEntry;
use crate::models::upload::FileKind;
use serde::Serialize;
use std::borrow::Cow;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    /// Also drop the facts of every other year. The target year is
    /// replaced either way.
    pub clear_other_years: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub success: bool,
    pub message: String,
    pub records_processed: usize,
    pub run_id: i64,
    /// Facts removed by the replace (0 on failure).
    pub deleted: usize,
    pub duration_seconds: f64,
}

pub struct IngestionPipeline<'a, S: FactStore + EtlAudit> {
    store: &'a mut S,
    normalizer: &'a Normalizer,
}

impl<'a, S: FactStore + EtlAudit> IngestionPipeline<'a, S> {
    pub fn new(store: &'a mut S, normalizer: &'a Normalizer) -> Self {
        Self { store, normalizer }
    }

    pub fn normalizer(&self) -> &Normalizer {
        self.normalizer
    }

    /// Read and ingest a source file. Read failures end up in the audit
    /// record like any other failure.
    pub fn ingest_file(
        &mut self,
        path: &Path,
        kind: FileKind,
        year: i32,
        opts: IngestOptions,
    ) -> AppResult<IngestOutcome> {
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        self.run(year, &label, opts, || read_source(path, kind).map(Cow::Owned))
    }

    /// Ingest an already-parsed table.
    pub fn ingest_table(
        &mut self,
        table: &RawTable,
        year: i32,
        label: &str,
        opts: IngestOptions,
    ) -> AppResult<IngestOutcome> {
        self.run(year, label, opts, || Ok(Cow::Borrowed(table)))
    }

    /// Audit a file that never reached the pipeline: a failed run with the
    /// read error as its message. Nothing is written to the store.
    pub fn record_failure(
        &mut self,
        year: i32,
        label: &str,
        err: AppError,
    ) -> AppResult<IngestOutcome> {
        self.run(year, label, IngestOptions::default(), move || Err(err))
    }

    /// `Err` only when the audit record itself cannot be written; a failed
    /// ingestion is an `Ok` outcome with `success == false`.
    fn run<'t, F>(
        &mut self,
        year: i32,
        label: &str,
        opts: IngestOptions,
        load: F,
    ) -> AppResult<IngestOutcome>
    where
        F: FnOnce() -> AppResult<Cow<'t, RawTable>>,
    {
        let started = Instant::now();
        let run_id = self
            .store
            .open_run(year, &format!("Processing {label}"))?;

        let result = self.execute(year, label, opts, load);
        let duration_seconds = started.elapsed().as_secs_f64();

        let outcome = match result {
            Ok(stats) => IngestOutcome {
                success: true,
                message: format!(
                    "Successfully imported {} records from {} (year {})",
                    stats.inserted, label, year
                ),
                records_processed: stats.inserted,
                run_id,
                deleted: stats.deleted,
                duration_seconds,
            },
            Err(e) => IngestOutcome {
                success: false,
                message: e.to_string(),
                records_processed: 0,
                run_id,
                deleted: 0,
                duration_seconds,
            },
        };

        let status = if outcome.success {
            EtlStatus::Success
        } else {
            EtlStatus::Failed
        };

        self.store.finish_run(
            run_id,
            status,
            outcome.records_processed,
            duration_seconds,
            &outcome.message,
        )?;

        Ok(outcome)
    }

    fn execute<'t, F>(
        &mut self,
        year: i32,
        label: &str,
        opts: IngestOptions,
        load: F,
    ) -> AppResult<ReplaceStats>
    where
        F: FnOnce() -> AppResult<Cow<'t, RawTable>>,
    {
        let table = load()?;
        if table.is_empty() {
            return Err(AppError::EmptySource(label.to_string()));
        }

        let entries = self.prepare(&table, year)?;

        if opts.clear_other_years {
            self.store.replace_all(&entries)
        } else {
            self.store.replace_year(year, &entries)
        }
    }

    /// Normalize + align, then refuse rows that belong to another year:
    /// storing them under `year` would break replace-for-year on reimport.
    fn prepare(&self, table: &RawTable, year: i32) -> AppResult<Vec<TimeEntry>> {
        let mut entries = self.normalizer.normalize(table, year);
        align_entries(&mut entries);

        if let Some(found) = entries.iter().map(|e| e.year).find(|y| *y != year) {
            return Err(AppError::YearMismatch {
                expected: year,
                found,
            });
        }

        Ok(entries)
    }
}
