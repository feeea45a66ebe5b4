// src/export/logic.rs

use crate::core::report::{self, ReportContext};
use crate::db::store::FactStore;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::FactExport;
use crate::export::xlsx::write_report;
use crate::models::filter::FactFilter;
use crate::ui::messages::warning;
use chrono::Local;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// All legacy sheets.
    Full,
    /// Summary + weekly trends.
    Weekly,
}

/// Logica di alto livello per l'export.
pub struct ExportLogic;

impl ExportLogic {
    /// Export dei fatti filtrati in CSV o JSON; ritorna il numero di righe.
    pub fn export<S: FactStore>(
        store: &S,
        filter: &FactFilter,
        format: ExportFormat,
        path: &Path,
        force: bool,
    ) -> AppResult<usize> {
        ensure_writable(path, force)?;

        let rows: Vec<FactExport> = store.query(filter)?.iter().map(FactExport::from).collect();

        if rows.is_empty() {
            warning("No records found for the selected filters.");
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        Ok(rows.len())
    }

    /// Build the requested report over the filtered facts and save it as
    /// XLSX. An empty selection still produces a workbook.
    pub fn report<S: FactStore>(
        store: &S,
        filter: &FactFilter,
        year: i32,
        kind: ReportKind,
        path: &Path,
        force: bool,
    ) -> AppResult<report::Report> {
        ensure_writable(path, force)?;

        let entries = store.query(filter)?;
        let ctx = ReportContext {
            year,
            filters: filter.applied(),
            generated_at: Local::now().naive_local(),
        };

        let built = match kind {
            ReportKind::Full => report::full_report(&entries, &ctx),
            ReportKind::Weekly => report::weekly_summary(&entries, &ctx),
        };

        write_report(&built, path)?;
        Ok(built)
    }
}
