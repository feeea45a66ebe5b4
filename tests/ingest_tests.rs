use rtimecompliance::core::ingest::{IngestOptions, IngestionPipeline};
use rtimecompliance::core::source::RawTable;
use rtimecompliance::db::etl_history::{get_run, list_runs};
use rtimecompliance::db::pool::DbPool;
use rtimecompliance::db::store::FactStore;
use rtimecompliance::models::etl_run::EtlStatus;
use rtimecompliance::models::filter::FactFilter;
use rtimecompliance::models::time_entry::TimeEntry;
use rtimecompliance::models::upload::FileKind;
use tempfile::tempdir;

mod common;
use common::{csv_line, normalizer, raw_table, sample_lines, write_csv};

const KEEP: IngestOptions = IngestOptions {
    clear_other_years: false,
};

fn facts(pool: &DbPool, filter: &FactFilter) -> Vec<TimeEntry> {
    let mut rows = pool.query(filter).unwrap();
    for r in rows.iter_mut() {
        r.id = None;
    }
    rows
}

#[test]
fn import_stores_aligned_facts_and_a_success_run() {
    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();

    let outcome = IngestionPipeline::new(&mut pool, &n)
        .ingest_table(&raw_table(&sample_lines()), 2025, "sample.csv", KEEP)
        .unwrap();

    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.records_processed, 6);
    assert!(outcome.message.contains("Successfully imported 6 records"));

    let rows = facts(&pool, &FactFilter::for_year(2025));
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|e| e.week_number.is_some() && e.week_year == Some(2025)));

    let run = get_run(&pool.conn, outcome.run_id).unwrap().unwrap();
    assert_eq!(run.status, EtlStatus::Success);
    assert_eq!(run.records_processed, 6);
    assert!(run.duration_seconds.is_some());
}

#[test]
fn reimport_is_idempotent_but_audited_twice() {
    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();
    let table = raw_table(&sample_lines());

    IngestionPipeline::new(&mut pool, &n)
        .ingest_table(&table, 2025, "a.csv", KEEP)
        .unwrap();
    let first = facts(&pool, &FactFilter::default());

    let second_outcome = IngestionPipeline::new(&mut pool, &n)
        .ingest_table(&table, 2025, "a.csv", KEEP)
        .unwrap();
    let second = facts(&pool, &FactFilter::default());

    assert_eq!(first, second);
    assert_eq!(second_outcome.deleted, 6);
    assert_eq!(list_runs(&pool.conn, 10).unwrap().len(), 2);
}

#[test]
fn empty_file_fails_without_touching_existing_year() {
    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();

    IngestionPipeline::new(&mut pool, &n)
        .ingest_table(&raw_table(&sample_lines()), 2025, "a.csv", KEEP)
        .unwrap();

    let dir = tempdir().unwrap();
    let empty = dir.path().join("empty.csv");
    write_csv(&empty, &[]);

    let outcome = IngestionPipeline::new(&mut pool, &n)
        .ingest_file(&empty, FileKind::Csv, 2025, KEEP)
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.records_processed, 0);
    assert!(outcome.message.contains("empty"), "{}", outcome.message);

    let run = get_run(&pool.conn, outcome.run_id).unwrap().unwrap();
    assert_eq!(run.status, EtlStatus::Failed);
    assert_eq!(pool.count(&FactFilter::for_year(2025)).unwrap(), 6);
}

#[test]
fn zero_byte_file_is_reported_as_empty() {
    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();

    let dir = tempdir().unwrap();
    let path = dir.path().join("zero.csv");
    std::fs::write(&path, "").unwrap();

    let outcome = IngestionPipeline::new(&mut pool, &n)
        .ingest_file(&path, FileKind::Csv, 2025, KEEP)
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.message.contains("empty"), "{}", outcome.message);
}

#[test]
fn missing_file_is_a_failed_run() {
    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();

    let outcome = IngestionPipeline::new(&mut pool, &n)
        .ingest_file(
            std::path::Path::new("/definitely/not/here.csv"),
            FileKind::Csv,
            2025,
            KEEP,
        )
        .unwrap();

    assert!(!outcome.success);
    let run = get_run(&pool.conn, outcome.run_id).unwrap().unwrap();
    assert_eq!(run.status, EtlStatus::Failed);
    assert!(run.message.contains("file not found"));
}

#[test]
fn unparseable_date_keeps_the_row() {
    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();

    let lines = vec![csv_line(2025, "Austin", "31/31/2025", "A1", "Ann Lee", "Finger", "40")];
    IngestionPipeline::new(&mut pool, &n)
        .ingest_table(&raw_table(&lines), 2025, "bad.csv", KEEP)
        .unwrap();

    let rows = facts(&pool, &FactFilter::default());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].week_ending, None);
    assert_eq!(rows[0].week_number, None);
    assert_eq!(rows[0].full_name, "Ann Lee");
    assert_eq!(rows[0].site, "Austin");
}

#[test]
fn store_failure_rolls_back_the_whole_year() {
    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();

    IngestionPipeline::new(&mut pool, &n)
        .ingest_table(&raw_table(&sample_lines()), 2025, "a.csv", KEEP)
        .unwrap();
    let before = facts(&pool, &FactFilter::default());

    pool.conn
        .execute_batch(
            "CREATE TRIGGER boom BEFORE INSERT ON time_entries
             WHEN NEW.employee_id = 'BOOM'
             BEGIN SELECT RAISE(ABORT, 'insert rejected'); END;",
        )
        .unwrap();

    let mut lines = sample_lines();
    lines.truncate(2);
    lines.push(csv_line(2025, "Austin", "2025-02-02", "BOOM", "Bad Row", "Finger", "1"));

    let outcome = IngestionPipeline::new(&mut pool, &n)
        .ingest_table(&raw_table(&lines), 2025, "b.csv", KEEP)
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.message.contains("insert rejected"), "{}", outcome.message);
    assert_eq!(facts(&pool, &FactFilter::default()), before);

    let run = get_run(&pool.conn, outcome.run_id).unwrap().unwrap();
    assert_eq!(run.status, EtlStatus::Failed);
}

#[test]
fn rows_of_another_year_are_refused() {
    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();

    let lines = vec![
        csv_line(2025, "Austin", "2025-01-05", "A1", "Ann Lee", "Finger", "40"),
        csv_line(2024, "Austin", "2024-12-29", "A1", "Ann Lee", "Finger", "40"),
    ];

    let outcome = IngestionPipeline::new(&mut pool, &n)
        .ingest_table(&raw_table(&lines), 2025, "mixed.csv", KEEP)
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.message.contains("2024"));
    assert_eq!(pool.count(&FactFilter::default()).unwrap(), 0);
}

#[test]
fn other_years_survive_unless_cleared() {
    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();

    let y2024 = vec![csv_line(2024, "Austin", "2024-06-02", "A1", "Ann Lee", "Finger", "40")];

    IngestionPipeline::new(&mut pool, &n)
        .ingest_table(&raw_table(&y2024), 2024, "2024.csv", KEEP)
        .unwrap();
    IngestionPipeline::new(&mut pool, &n)
        .ingest_table(&raw_table(&sample_lines()), 2025, "2025.csv", KEEP)
        .unwrap();

    assert_eq!(pool.count(&FactFilter::for_year(2024)).unwrap(), 1);
    assert_eq!(pool.count(&FactFilter::for_year(2025)).unwrap(), 6);

    let outcome = IngestionPipeline::new(&mut pool, &n)
        .ingest_table(
            &raw_table(&sample_lines()[..2]),
            2025,
            "2025.csv",
            IngestOptions {
                clear_other_years: true,
            },
        )
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.deleted, 7);
    assert_eq!(pool.count(&FactFilter::for_year(2024)).unwrap(), 0);
    assert_eq!(pool.count(&FactFilter::for_year(2025)).unwrap(), 2);
}

#[test]
fn header_only_table_is_empty_input() {
    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();
    let table = RawTable::new(vec!["FullName".into()]);

    let outcome = IngestionPipeline::new(&mut pool, &n)
        .ingest_table(&table, 2025, "header.csv", KEEP)
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.records_processed, 0);
}

#[test]
fn upload_moves_from_pending_to_success() {
    use rtimecompliance::core::upload::UploadLogic;
    use rtimecompliance::db::uploads::get_upload;
    use rtimecompliance::models::upload::UploadStatus;

    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();

    let dir = tempdir().unwrap();
    let path = dir.path().join("YTD_Data_Weekly.csv");
    write_csv(&path, &sample_lines());

    let id = UploadLogic::register(&pool, &path, FileKind::Csv, 2025, false).unwrap();
    assert_eq!(get_upload(&pool.conn, id).unwrap().status, UploadStatus::Pending);

    let outcome = UploadLogic::process(&mut pool, &n, id).unwrap();
    assert!(outcome.success);

    let upload = get_upload(&pool.conn, id).unwrap();
    assert_eq!(upload.status, UploadStatus::Success);
    assert_eq!(upload.records_processed, 6);
    assert!(upload.error_message.is_empty());
    assert!(upload.processing_time.is_some());
}

#[test]
fn failed_upload_keeps_the_error() {
    use rtimecompliance::core::upload::UploadLogic;
    use rtimecompliance::db::uploads::get_upload;
    use rtimecompliance::models::upload::UploadStatus;

    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();

    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    write_csv(&path, &[]);

    let id = UploadLogic::register(&pool, &path, FileKind::Csv, 2025, false).unwrap();
    let outcome = UploadLogic::process(&mut pool, &n, id).unwrap();
    assert!(!outcome.success);

    let upload = get_upload(&pool.conn, id).unwrap();
    assert_eq!(upload.status, UploadStatus::Failed);
    assert_eq!(upload.records_processed, 0);
    assert!(upload.error_message.contains("empty"));
}

#[test]
fn upload_is_failed_when_the_audit_cannot_be_written() {
    use rtimecompliance::core::upload::UploadLogic;
    use rtimecompliance::db::uploads::get_upload;
    use rtimecompliance::models::upload::UploadStatus;

    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();

    let dir = tempdir().unwrap();
    let path = dir.path().join("YTD_Data_Weekly.csv");
    write_csv(&path, &sample_lines());

    let id = UploadLogic::register(&pool, &path, FileKind::Csv, 2025, false).unwrap();
    pool.conn.execute_batch("DROP TABLE etl_history").unwrap();

    assert!(UploadLogic::process(&mut pool, &n, id).is_err());

    let upload = get_upload(&pool.conn, id).unwrap();
    assert_eq!(upload.status, UploadStatus::Failed);
    assert_eq!(upload.records_processed, 0);
    assert!(upload.error_message.contains("etl_history"));
    assert_eq!(pool.count(&FactFilter::for_year(2025)).unwrap(), 0);
}

#[test]
fn unknown_upload_is_an_error() {
    use rtimecompliance::core::upload::UploadLogic;

    let mut pool = DbPool::in_memory().unwrap();
    let n = normalizer();
    assert!(UploadLogic::process(&mut pool, &n, 42).is_err());
}

#[test]
fn backfill_fills_legacy_rows_in_batches() {
    use rtimecompliance::db::backfill::{backfill_week_numbers, pending_backfill};

    let pool = DbPool::in_memory().unwrap();
    for (i, we) in ["2025-01-05", "2025-01-04", "2025-12-31", "not a date"]
        .iter()
        .enumerate()
    {
        pool.conn
            .execute(
                "INSERT INTO time_entries (year, employee_id, week_ending) VALUES (2025, ?1, ?2)",
                rusqlite::params![format!("E{i}"), we],
            )
            .unwrap();
    }
    pool.conn
        .execute(
            "INSERT INTO time_entries (year, employee_id) VALUES (2025, 'no-date')",
            [],
        )
        .unwrap();

    assert_eq!(pending_backfill(&pool.conn).unwrap(), 4);

    let updated = backfill_week_numbers(&pool.conn, 2).unwrap();
    assert_eq!(updated, 3);
    // the unreadable date stays pending
    assert_eq!(pending_backfill(&pool.conn).unwrap(), 1);

    let weeks: Vec<(String, Option<u32>, Option<i32>)> = {
        let mut stmt = pool
            .conn
            .prepare("SELECT employee_id, week_number, week_year FROM time_entries ORDER BY id")
            .unwrap();
        stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
    };

    assert_eq!(weeks[0], ("E0".into(), Some(1), Some(2025)));
    assert_eq!(weeks[1], ("E1".into(), Some(1), Some(2025)));
    assert_eq!(weeks[2], ("E2".into(), Some(1), Some(2026)));
    assert_eq!(weeks[3], ("E3".into(), None, None));
    assert_eq!(weeks[4], ("no-date".into(), None, None));

    assert_eq!(backfill_week_numbers(&pool.conn, 2).unwrap(), 0);
}
