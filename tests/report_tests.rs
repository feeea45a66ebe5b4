use chrono::NaiveDateTime;
use rtimecompliance::core::report::{
    Cell, ENROLLMENT_HEADER, ReportContext, full_report, weekly_summary,
};
use rtimecompliance::models::entry_type::EntryType;
use rtimecompliance::models::time_entry::TimeEntry;
use rust_decimal_macros::dec;

mod common;
use common::{entry, repeat};

fn ctx(filters: Vec<(&str, &str)>) -> ReportContext {
    ReportContext {
        year: 2025,
        filters: filters
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        generated_at: NaiveDateTime::parse_from_str("2025-03-01 08:30:00", "%Y-%m-%d %H:%M:%S")
            .unwrap(),
    }
}

/// Ann: all Finger. Bob: 3 provisional over three weeks. Cy: 2 provisional,
/// 1 write-in. Dee (Dallas): 1 missing c/o.
fn sample() -> Vec<TimeEntry> {
    let mut v = vec![
        entry("Austin", "Ann", EntryType::Finger, Some("2025-01-05")),
        entry("Austin", "Ann", EntryType::Finger, Some("2025-01-12")),
        entry("Austin", "Bob", EntryType::ProvisionalEntry, Some("2025-01-05")),
        entry("Austin", "Bob", EntryType::ProvisionalEntry, Some("2025-01-12")),
        entry("Austin", "Bob", EntryType::ProvisionalEntry, Some("2025-01-19")),
        entry("Austin", "Cy", EntryType::WriteIn, Some("2025-01-12")),
        entry("Dallas", "Dee", EntryType::MissingClockOut, Some("2025-01-11")),
    ];
    v.extend(repeat(
        2,
        entry("Austin", "Cy", EntryType::ProvisionalEntry, Some("2025-01-19")),
    ));
    v
}

fn text(c: Option<&Cell>) -> String {
    c.map(Cell::display).unwrap_or_default()
}

#[test]
fn full_report_has_the_legacy_sheets_in_order() {
    let r = full_report(&sample(), &ctx(vec![]));
    assert_eq!(
        r.sheet_names(),
        [
            "CheckingTheFile",
            "Directions",
            "Data",
            "All",
            "Prov",
            "Write Ins",
            "Provisional",
            "Austin",
            "Dallas",
        ]
    );
}

#[test]
fn checking_the_file_lists_counts_and_filters() {
    let r = full_report(&sample(), &ctx(vec![("site", "Austin"), ("department", "")]));
    let s = r.sheet("CheckingTheFile").unwrap();

    let value = |field: &str| {
        s.rows
            .iter()
            .find(|row| row[0].display() == field)
            .map(|row| row[1].display())
    };

    assert_eq!(value("Year:").as_deref(), Some("2025"));
    assert_eq!(value("Generated:").as_deref(), Some("2025-03-01 08:30:00"));
    assert_eq!(value("Start Date:").as_deref(), Some("2025-01-05"));
    assert_eq!(value("End Date:").as_deref(), Some("2025-01-19"));
    assert_eq!(value("Total Records:").as_deref(), Some("9"));
    assert_eq!(value("Unique Employees:").as_deref(), Some("4"));
    assert_eq!(value("Unique Offices:").as_deref(), Some("2"));
    assert_eq!(value("  site:").as_deref(), Some("Austin"));
    // blank criteria are not listed
    assert_eq!(value("  department:"), None);
    assert_eq!(value("  None"), None);
}

#[test]
fn no_filters_and_no_rows() {
    let r = full_report(&[], &ctx(vec![]));
    let s = r.sheet("CheckingTheFile").unwrap();

    let fields: Vec<String> = s.rows.iter().map(|row| row[0].display()).collect();
    assert!(fields.contains(&"  None".to_string()));

    let start = s.rows.iter().find(|row| row[0].display() == "Start Date:").unwrap();
    assert_eq!(start[1].display(), "N/A");

    for name in ["Data", "All", "Prov", "Write Ins", "Provisional"] {
        let sheet = r.sheet(name).unwrap();
        assert_eq!(sheet.headers, ["No Data"], "{name}");
        assert_eq!(sheet.rows.len(), 1);
    }

    // no site sheets without rows
    assert_eq!(r.sheets.len(), 7);
}

#[test]
fn directions_state_the_threshold() {
    let r = full_report(&sample(), &ctx(vec![]));
    let s = r.sheet("Directions").unwrap();
    let yes = s.rows.iter().find(|row| row[0].display() == "Yes").unwrap();
    assert!(yes[1].display().contains("more than 2 provisional"));
}

#[test]
fn data_sheet_consolidates_rows() {
    let r = full_report(&sample(), &ctx(vec![]));
    let s = r.sheet("Data").unwrap();

    // Cy's two provisional rows in week 2025-01-19 collapse into one
    assert_eq!(s.rows.len(), 8);

    let cy = s
        .rows
        .iter()
        .position(|row| row[6].display() == "Cy" && row[5].display() == "Provisional Entry")
        .unwrap();
    assert_eq!(text(s.cell(cy, "TotalEntries")), "2");
    assert_eq!(s.cell(cy, "Total Hours"), Some(&Cell::Decimal(dec!(16))));
    assert_eq!(text(s.cell(cy, "weekday")), "Sunday");
    assert_eq!(text(s.cell(cy, "w-e")), "19-Jan");

    // sorted by site first
    assert_eq!(text(s.cell(0, "OfcName")), "Austin");
    assert_eq!(text(s.cell(7, "OfcName")), "Dallas");
}

#[test]
fn all_pivot_orders_by_grand_total() {
    let r = full_report(&sample(), &ctx(vec![]));
    let s = r.sheet("All").unwrap();

    assert_eq!(
        s.headers,
        ["Employee", "Finger", "Missing c/o", "Provisional Entry", "Write-In", "Grand Total"]
    );

    let names: Vec<String> = (0..s.rows.len()).map(|i| text(s.cell(i, "Employee"))).collect();
    // Bob and Cy tie on 3; ties keep name order
    assert_eq!(names, ["Bob", "Cy", "Ann", "Dee"]);
    assert_eq!(text(s.cell(1, "Write-In")), "1");
    assert_eq!(text(s.cell(1, "Provisional Entry")), "2");
}

#[test]
fn prov_sheet_flags_more_than_two_provisionals() {
    let r = full_report(&sample(), &ctx(vec![]));
    let s = r.sheet("Prov").unwrap();

    assert_eq!(
        s.headers,
        ["OfcName", "FullName", "5-Jan", "12-Jan", "19-Jan", "Total", "Average", ENROLLMENT_HEADER]
    );

    assert_eq!(text(s.cell(0, "FullName")), "Bob");
    assert_eq!(text(s.cell(0, "Total")), "3");
    assert_eq!(s.cell(0, "Average"), Some(&Cell::Decimal(dec!(1.0))));
    assert_eq!(text(s.cell(0, ENROLLMENT_HEADER)), "Yes");

    assert_eq!(text(s.cell(1, "FullName")), "Cy");
    assert_eq!(text(s.cell(1, "19-Jan")), "2");
    assert_eq!(text(s.cell(1, "Average")), "0.7");
    assert_eq!(text(s.cell(1, ENROLLMENT_HEADER)), "");
}

#[test]
fn write_ins_sheet_has_no_flag() {
    let r = full_report(&sample(), &ctx(vec![]));
    let s = r.sheet("Write Ins").unwrap();

    assert_eq!(s.headers, ["OfcName", "FullName", "12-Jan", "Total", "Average"]);
    assert_eq!(s.rows.len(), 1);
    assert_eq!(text(s.cell(0, "Average")), "1.0");
}

#[test]
fn provisional_detail_by_count() {
    let r = full_report(&sample(), &ctx(vec![]));
    let s = r.sheet("Provisional").unwrap();

    assert_eq!(s.rows.len(), 2);
    assert_eq!(text(s.cell(0, "Employee")), "Bob");
    assert_eq!(text(s.cell(0, "Provisional Count")), "3");
    assert_eq!(s.cell(0, "Total Hours"), Some(&Cell::Decimal(dec!(24))));
    assert_eq!(text(s.cell(0, ENROLLMENT_HEADER)), "Yes");
    assert_eq!(text(s.cell(1, ENROLLMENT_HEADER)), "");
}

#[test]
fn site_sheets_skip_finger_only_employees() {
    let r = full_report(&sample(), &ctx(vec![]));

    let austin = r.sheet("Austin").unwrap();
    let names: Vec<String> = (0..austin.rows.len())
        .map(|i| text(austin.cell(i, "Full Name")))
        .collect();
    assert_eq!(names, ["Bob", "Cy"]);
    assert_eq!(text(austin.cell(0, ENROLLMENT_HEADER)), "Yes");

    let dallas = r.sheet("Dallas").unwrap();
    assert_eq!(dallas.rows.len(), 1);
    assert_eq!(text(dallas.cell(0, "Missing c/o")), "1");
}

#[test]
fn finger_only_site_gets_no_sheet() {
    let entries = vec![
        entry("Austin", "Ann", EntryType::Finger, Some("2025-01-05")),
        entry("Dallas", "Dee", EntryType::WriteIn, Some("2025-01-05")),
    ];
    let r = full_report(&entries, &ctx(vec![]));
    assert!(r.sheet("Austin").is_none());
    assert!(r.sheet("Dallas").is_some());
}

#[test]
fn site_names_are_made_workbook_safe() {
    let entries = vec![
        entry("North/South", "Ann", EntryType::WriteIn, Some("2025-01-05")),
        entry("data", "Bob", EntryType::WriteIn, Some("2025-01-05")),
    ];
    let r = full_report(&entries, &ctx(vec![]));
    assert!(r.sheet("North-South").is_some());
    // collides with the Data sheet
    assert!(r.sheet("data (2)").is_some());
}

#[test]
fn weekly_summary_sheets() {
    let r = weekly_summary(&sample(), &ctx(vec![]));
    assert_eq!(r.sheet_names(), ["Summary", "Weekly Trends"]);

    let s = r.sheet("Summary").unwrap();
    let value = |metric: &str| {
        s.rows
            .iter()
            .find(|row| row[0].display() == metric)
            .map(|row| row[1].display())
    };
    assert_eq!(value("Total Entries").as_deref(), Some("9"));
    assert_eq!(value("Finger Rate").as_deref(), Some("22.2%"));
    assert_eq!(value("Provisional Rate").as_deref(), Some("55.6%"));
    assert_eq!(value("Period").as_deref(), Some("2025-01-05 to 2025-01-19"));

    let t = r.sheet("Weekly Trends").unwrap();
    let weeks: Vec<String> = (0..t.rows.len()).map(|i| text(t.cell(i, "ISO Week"))).collect();
    assert_eq!(weeks, ["2025-W01", "2025-W02", "2025-W03"]);
    assert_eq!(text(t.cell(1, "Entries")), "4");
}

#[test]
fn weekly_summary_of_nothing() {
    let r = weekly_summary(&[], &ctx(vec![]));
    let t = r.sheet("Weekly Trends").unwrap();
    assert_eq!(t.headers, ["No Data"]);

    let s = r.sheet("Summary").unwrap();
    let period = s.rows.iter().find(|row| row[0].display() == "Period").unwrap();
    assert_eq!(period[1].display(), "N/A");
}
