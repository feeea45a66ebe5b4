//! Batch sync of the weekly export folder.
//!
//! Layout: `<data_dir>/<YYYY>/<source_file_name>`; the older flat layout
//! (`<data_dir>/bstt_data_2024.csv` and similar) is used only when no
//! year folder holds a source file.

use crate::core::ingest::{IngestOptions, IngestOutcome, IngestionPipeline};
use crate::core::normalize::CanonicalField;
use crate::core::normalize::coerce::to_year;
use crate::core::source::{RawTable, read_source};
use crate::db::store::{EtlAudit, FactStore};
use crate::errors::{AppError, AppResult};
use crate::models::upload::FileKind;
use crate::ui::messages::{info, warning};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct SyncedFile {
    pub path: PathBuf,
    pub year: i32,
    pub outcome: IngestOutcome,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub synced: Vec<SyncedFile>,
    /// Files that could not be read at all, with the reason. Each one
    /// still leaves a failed audit record.
    pub skipped: Vec<(PathBuf, String)>,
}

impl SyncReport {
    pub fn failures(&self) -> usize {
        self.synced.iter().filter(|f| !f.outcome.success).count()
    }

    pub fn records(&self) -> usize {
        self.synced.iter().map(|f| f.outcome.records_processed).sum()
    }
}

fn year_regex() -> AppResult<Regex> {
    Regex::new(r"(\d{4})").map_err(|e| AppError::Other(e.to_string()))
}

fn is_year_name(name: &str) -> bool {
    name.len() == 4 && name.chars().all(|c| c.is_ascii_digit())
}

/// Source files under `data_dir`, sorted by path. `year` narrows the
/// search to that year.
pub fn discover_sources(
    data_dir: &Path,
    file_name: &str,
    year: Option<i32>,
) -> AppResult<Vec<PathBuf>> {
    if !data_dir.is_dir() {
        return Err(AppError::Config(format!(
            "Data directory not found: {}",
            data_dir.display()
        )));
    }

    let wanted = year.map(|y| y.to_string());

    let mut found = Vec::new();
    for entry in fs::read_dir(data_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();

        if !entry.path().is_dir() || !is_year_name(&name) {
            continue;
        }
        if let Some(w) = &wanted
            && *w != name
        {
            continue;
        }

        let candidate = entry.path().join(file_name);
        if candidate.is_file() {
            found.push(candidate);
        }
    }

    if found.is_empty() {
        let re = year_regex()?;
        for entry in fs::read_dir(data_dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .map(|e| e.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if !path.is_file() || !is_csv {
                continue;
            }

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();

            let matches = match &wanted {
                Some(w) => re.find_iter(&stem).any(|m| m.as_str() == w),
                None => re.is_match(&stem),
            };
            if matches {
                found.push(path);
            }
        }
    }

    if found.is_empty() {
        return Err(AppError::SourceFormat(match year {
            Some(y) => format!("No source file found for year {y} in {}", data_dir.display()),
            None => format!("No source files found in {}", data_dir.display()),
        }));
    }

    found.sort();
    Ok(found)
}

/// Year a file belongs to: the `year` column of its first row, else a
/// four-digit parent folder, else the first four-digit run in the file
/// name, else `default_year`.
pub fn detect_year(
    table: &RawTable,
    year_column: Option<usize>,
    path: &Path,
    default_year: i32,
) -> i32 {
    if let Some(idx) = year_column
        && let Some(first) = table.rows.first()
        && let Some(y) = to_year(first.get(idx))
    {
        return y;
    }

    if let Some(parent) = path.parent().and_then(|p| p.file_name())
        && let Some(name) = parent.to_str()
        && is_year_name(name)
        && let Ok(y) = name.parse::<i32>()
    {
        return y;
    }

    if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
        && let Ok(re) = year_regex()
        && let Some(m) = re.find(stem)
        && let Ok(y) = m.as_str().parse::<i32>()
    {
        return y;
    }

    default_year
}

/// Ingest every file in turn. With `clear_all`, the first successful
/// import also wipes the other years; later files only replace their own.
pub fn sync_sources<S: FactStore + EtlAudit>(
    pipeline: &mut IngestionPipeline<'_, S>,
    files: &[PathBuf],
    default_year: i32,
    clear_all: bool,
) -> AppResult<SyncReport> {
    let mut report = SyncReport::default();
    let mut cleared = false;

    for path in files {
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        info(format!("Processing {}...", path.display()));

        let kind = FileKind::from_path(path).unwrap_or(FileKind::Csv);
        let table = match read_source(path, kind) {
            Ok(t) => t,
            Err(e) => {
                warning(format!("Error reading {}: {}", path.display(), e));
                let year = detect_year(&RawTable::default(), None, path, default_year);
                let outcome = pipeline.record_failure(year, &label, e)?;
                report.skipped.push((path.clone(), outcome.message));
                continue;
            }
        };

        let year_column = pipeline
            .normalizer()
            .layout(&table.headers)
            .position(CanonicalField::Year);

        let year = detect_year(&table, year_column, path, default_year);

        let opts = IngestOptions {
            clear_other_years: clear_all && !cleared,
        };
        let outcome = pipeline.ingest_table(&table, year, &label, opts)?;

        if outcome.success {
            cleared = true;
        }

        report.synced.push(SyncedFile {
            path: path.clone(),
            year,
            outcome,
        });
    }

    Ok(report)
}
