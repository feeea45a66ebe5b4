mod common;
use common::{rti, sample_lines, setup_test_db, temp_out, write_csv};
use predicates::prelude::*;
use std::fs;

/// Fresh DB with the sample 2025 file imported.
fn imported_db(name: &str) -> String {
    let db = setup_test_db(name);
    rti().args(["--db", &db, "--test", "init"]).assert().success();

    let src = temp_out(name, "csv");
    write_csv(std::path::Path::new(&src), &sample_lines());

    rti()
        .args(["--db", &db, "import", "--file", &src, "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully imported 6 records"));

    db
}

#[test]
fn init_creates_the_database() {
    let db = setup_test_db("cli_init");
    rti()
        .args(["--db", &db, "--test", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database initialized"));
    assert!(std::path::Path::new(&db).exists());
}

#[test]
fn import_then_summary() {
    let db = imported_db("cli_summary");

    rti()
        .args(["--db", &db, "summary", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries:      6"))
        .stdout(predicate::str::contains("Provisional Entry"))
        .stdout(predicate::str::contains("198.50"));
}

#[test]
fn reimport_keeps_one_copy() {
    let db = imported_db("cli_reimport");
    let src = temp_out("cli_reimport_again", "csv");
    write_csv(std::path::Path::new(&src), &sample_lines());

    rti()
        .args(["--db", &db, "import", "--file", &src, "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("6 replaced"));

    rti()
        .args(["--db", &db, "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries:      6"));
}

#[test]
fn empty_import_fails_and_is_recorded() {
    let db = imported_db("cli_empty_import");
    let src = temp_out("cli_empty_import_src", "csv");
    write_csv(std::path::Path::new(&src), &[]);

    rti()
        .args(["--db", &db, "import", "--file", &src, "--year", "2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source file is empty"));

    rti()
        .args(["--db", &db, "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("failed"))
        .stdout(predicate::str::contains("success"));

    rti()
        .args(["--db", &db, "history", "--uploads"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cli_empty_import_src_out.csv"));

    // previous facts untouched
    rti()
        .args(["--db", &db, "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries:      6"));
}

#[test]
fn unknown_extension_needs_kind() {
    let db = setup_test_db("cli_unknown_ext");
    rti().args(["--db", &db, "--test", "init"]).assert().success();

    let src = temp_out("cli_unknown_ext", "dat");
    write_csv(std::path::Path::new(&src), &sample_lines());

    rti()
        .args(["--db", &db, "import", "--file", &src, "--year", "2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--kind"));

    rti()
        .args([
            "--db", &db, "import", "--file", &src, "--year", "2025", "--kind", "csv",
        ])
        .assert()
        .success();
}

#[test]
fn kpi_compliance_as_json() {
    let db = imported_db("cli_kpi_json");

    let out = rti()
        .args(["--db", &db, "kpi", "compliance", "--json"])
        .output()
        .expect("run kpi");
    assert!(out.status.success());

    let v: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("kpi output is JSON");
    assert_eq!(v["total_entries"], 6);
    assert_eq!(v["finger_count"], 1);
    assert_eq!(v["provisional_count"], 3);
    assert!(v["provisional_rate"].to_string().contains("50.0"));
}

#[test]
fn kpi_summary_json_nests_each_section() {
    let db = imported_db("cli_kpi_summary_json");

    let out = rti()
        .args(["--db", &db, "kpi", "summary", "--json"])
        .output()
        .expect("run kpi");
    assert!(out.status.success());

    let v: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("kpi output is JSON");
    assert!(v.get("total_entries").is_none());
    assert_eq!(v["compliance"]["total_entries"], 6);
    assert_eq!(v["volume"]["total_entries"], 6);
    assert_eq!(v["compliance"]["provisional_rate"], 50.0);
    assert_eq!(v["volume"]["total_hours"], 198.5);
}

#[test]
fn kpi_tables_respect_filters() {
    let db = imported_db("cli_kpi_offices");

    rti()
        .args(["--db", &db, "kpi", "offices"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Austin"))
        .stdout(predicate::str::contains("Dallas"));

    rti()
        .args(["--db", &db, "kpi", "offices", "--site", "dallas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dallas"))
        .stdout(predicate::str::contains("Austin").not());

    rti()
        .args(["--db", &db, "kpi", "trends"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-W01"));
}

#[test]
fn bad_filter_is_rejected() {
    let db = imported_db("cli_bad_filter");

    rti()
        .args(["--db", &db, "kpi", "summary", "--from", "2025-02-30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));

    rti()
        .args(["--db", &db, "kpi", "summary", "--week", "54"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 53"));
}

#[test]
fn report_writes_an_xlsx_workbook() {
    let db = imported_db("cli_report");
    let out = temp_out("cli_report", "xlsx");

    rti()
        .args(["--db", &db, "report", "--file", &out, "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CheckingTheFile"))
        .stdout(predicate::str::contains("Austin"));

    let bytes = fs::read(&out).expect("read report");
    assert!(bytes.starts_with(b"PK"));

    // existing file with --force is overwritten without prompting
    rti()
        .args(["--db", &db, "report", "--file", &out, "--weekly", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Weekly Trends"));
}

#[test]
fn report_needs_an_absolute_path() {
    let db = imported_db("cli_report_relative");
    rti()
        .args(["--db", &db, "report", "--file", "relative.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be absolute"));
}

#[test]
fn export_csv_and_json() {
    let db = imported_db("cli_export");

    let csv_out = temp_out("cli_export", "csv");
    rti()
        .args([
            "--db", &db, "export", "--format", "csv", "--file", &csv_out, "--entry-type",
            "Provisional Entry",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&csv_out).expect("read csv");
    assert_eq!(content.lines().count(), 4);
    assert!(content.contains("Bob Ray"));
    assert!(!content.contains("Ann Lee"));

    let json_out = temp_out("cli_export", "json");
    rti()
        .args(["--db", &db, "export", "--format", "json", "--file", &json_out])
        .assert()
        .success();

    let v: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_out).unwrap()).unwrap();
    assert_eq!(v.as_array().map(|a| a.len()), Some(6));
}

#[test]
fn options_and_db_info() {
    let db = imported_db("cli_options");

    rti()
        .args(["--db", &db, "options"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025"))
        .stdout(predicate::str::contains("Write-In"))
        .stdout(predicate::str::contains("2025-01-19"));

    rti()
        .args(["--db", &db, "db", "--info", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total entries:"))
        .stdout(predicate::str::contains("Integrity check passed"));

    rti()
        .args(["--db", &db, "db", "--backfill-weeks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 0 rows"));
}

#[test]
fn log_lists_operations() {
    let db = imported_db("cli_log");

    rti()
        .args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains("import"));
}

#[test]
fn sync_reads_year_folders() {
    let db = setup_test_db("cli_sync");
    rti().args(["--db", &db, "--test", "init"]).assert().success();

    let root = tempfile::tempdir().unwrap();
    let y2025 = root.path().join("2025");
    fs::create_dir_all(&y2025).unwrap();
    write_csv(&y2025.join("YTD_Data_Weekly.csv"), &sample_lines());

    rti()
        .args([
            "--db",
            &db,
            "sync",
            "--dir",
            &root.path().to_string_lossy(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully imported 6 records"));

    rti()
        .args(["--db", &db, "summary", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries:      6"));
}
