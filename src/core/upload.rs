use crate::core::ingest::{IngestOptions, IngestOutcome, IngestionPipeline};
use crate::core::normalize::Normalizer;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::uploads::{finish_upload, get_upload, insert_upload, set_status};
use crate::errors::AppResult;
use crate::models::upload::{FileKind, UploadStatus};
use std::path::Path;
use std::time::Instant;

/// High-level logic behind the `import` command.
pub struct UploadLogic;

impl UploadLogic {
    /// Register `path` as a pending upload and return its id.
    pub fn register(
        pool: &DbPool,
        path: &Path,
        kind: FileKind,
        year: i32,
        replace_all_years: bool,
    ) -> AppResult<i64> {
        insert_upload(
            &pool.conn,
            &path.to_string_lossy(),
            kind,
            year,
            replace_all_years,
        )
    }

    /// Run a registered upload through the ingestion pipeline:
    /// pending → processing → success | failed.
    pub fn process(
        pool: &mut DbPool,
        normalizer: &Normalizer,
        upload_id: i64,
    ) -> AppResult<IngestOutcome> {
        let upload = get_upload(&pool.conn, upload_id)?;
        set_status(&pool.conn, upload_id, UploadStatus::Processing)?;

        let started = Instant::now();
        let result = {
            let mut pipeline = IngestionPipeline::new(pool, normalizer);
            pipeline.ingest_file(
                Path::new(&upload.file_path),
                upload.file_kind,
                upload.year,
                IngestOptions {
                    clear_other_years: upload.replace_all_years,
                },
            )
        };
        let elapsed = started.elapsed().as_secs_f64();

        // audit write failed: the upload must not stay in `processing`
        let outcome = match result {
            Ok(o) => o,
            Err(e) => {
                let _ = finish_upload(
                    &pool.conn,
                    upload_id,
                    UploadStatus::Failed,
                    0,
                    &e.to_string(),
                    elapsed,
                );
                return Err(e);
            }
        };

        let (status, error_message) = if outcome.success {
            (UploadStatus::Success, String::new())
        } else {
            (UploadStatus::Failed, outcome.message.clone())
        };

        finish_upload(
            &pool.conn,
            upload_id,
            status,
            outcome.records_processed,
            &error_message,
            elapsed,
        )?;

        ttlog_soft(
            &pool.conn,
            "import",
            &upload.file_name(),
            &format!(
                "upload {} year {}: {}",
                upload_id, upload.year, outcome.message
            ),
        );

        Ok(outcome)
    }
}
