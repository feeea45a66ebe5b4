//! Sheets of the full compliance workbook.

use super::{Cell, ENROLLMENT_HEADER, ENROLLMENT_THRESHOLD, ReportContext, Sheet, enrollment_flag};
use crate::core::kpi::Tally;
use crate::models::entry_type::EntryType;
use crate::models::time_entry::TimeEntry;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, BTreeSet, HashMap};

const NO_RECORDS: &str = "No records found";

/// Week column label, e.g. `9-Nov`.
pub fn week_label(d: NaiveDate) -> String {
    d.format("%-d-%b").to_string()
}

fn count_of(counts: &HashMap<EntryType, usize>, t: &EntryType) -> usize {
    counts.get(t).copied().unwrap_or(0)
}

pub fn checking_the_file(entries: &[TimeEntry], ctx: &ReportContext) -> Sheet {
    let t = Tally::from_entries(entries);
    let mut s = Sheet::new("CheckingTheFile", &["Field", "Value"]);

    let date_or_na = |d: Option<NaiveDate>| {
        d.map(|d| Cell::text(d.format("%Y-%m-%d").to_string()))
            .unwrap_or_else(|| Cell::text("N/A"))
    };

    let mut row = |k: &str, v: Cell| s.push(vec![Cell::text(k), v]);

    row("Compliance Report - File Information", Cell::Empty);
    row("", Cell::Empty);
    row(
        "Generated:",
        Cell::text(ctx.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()),
    );
    row("Year:", Cell::Int(i64::from(ctx.year)));
    row("", Cell::Empty);
    row("Data Range:", Cell::Empty);
    row("Start Date:", date_or_na(t.min_week_ending));
    row("End Date:", date_or_na(t.max_week_ending));
    row("", Cell::Empty);
    row("Record Counts:", Cell::Empty);
    row("Total Records:", Cell::count(t.total));
    row("Unique Employees:", Cell::count(t.unique_employees()));
    row("Unique Offices:", Cell::count(t.unique_sites()));
    row("Unique Weeks:", Cell::count(t.unique_weeks()));
    row("", Cell::Empty);
    row("Filters Applied:", Cell::Empty);

    let applied: Vec<&(String, String)> =
        ctx.filters.iter().filter(|(_, v)| !v.is_empty()).collect();

    if applied.is_empty() {
        row("  None", Cell::Empty);
    } else {
        for (k, v) in applied {
            row(&format!("  {k}:"), Cell::text(v.clone()));
        }
    }

    s
}

pub fn directions() -> Sheet {
    let mut s = Sheet::new("Directions", &["Topic", "Description"]);
    let threshold_note = format!(
        "Employee has more than {ENROLLMENT_THRESHOLD} provisional entries and needs fingerprint enrollment"
    );

    let lines: &[(&str, &str)] = &[
        ("Compliance Report - Directions", ""),
        ("", ""),
        ("Sheet Descriptions:", ""),
        ("", ""),
        ("CheckingTheFile", "Report metadata and filter information"),
        ("Directions", "This sheet - instructions for using the report"),
        ("Data", "Consolidated time entry data with aggregations"),
        ("All", "Entry type pivot by employee - count of each entry type per employee"),
        ("Prov", "Weekly provisional tracking with enrollment status"),
        ("Write Ins", "Write-in entries tracking by employee"),
        ("Provisional", "Employees with provisional entries"),
        ("[Office Name]", "Office-specific entry type analysis"),
        ("", ""),
        ("Entry Types:", ""),
        (EntryType::FINGER, "Biometric (fingerprint) clock entry - Target: 95%+"),
        (
            EntryType::PROVISIONAL,
            "Temporary entry pending fingerprint enrollment - Target: <1%",
        ),
        (EntryType::WRITE_IN, "Manual write-in entry - Target: <3%"),
        (EntryType::MISSING_CO, "Missing clock-out entry - Target: <2%"),
        ("", ""),
        ("Enrollment of Fingerprint Needed:", ""),
        ("Yes", ""),
        ("(blank)", "Employee does not require immediate enrollment action"),
        ("", ""),
        ("Color Coding:", ""),
        ("Green (95%+)", "Meeting finger rate target"),
        ("Yellow (90-95%)", "Below target but acceptable"),
        ("Red (<90%)", "Requires immediate attention"),
    ];

    for &(topic, desc) in lines {
        let desc = if topic == "Yes" { threshold_note.as_str() } else { desc };
        s.push(vec![Cell::text(topic), Cell::text(desc)]);
    }

    s
}

/// Consolidated rows: one per site, week, employee, shift, department
/// and entry type, with hour and entry totals.
pub fn data(entries: &[TimeEntry]) -> Sheet {
    if entries.is_empty() {
        return Sheet::no_data("Data", NO_RECORDS);
    }

    type Key<'a> = (
        &'a str,
        Option<NaiveDate>,
        &'a str,
        &'a str,
        &'a str,
        &'a str,
        &'a str,
    );

    let mut groups: HashMap<Key, (Decimal, usize)> = HashMap::new();
    for e in entries {
        let key = (
            e.site.as_str(),
            e.week_ending,
            e.full_name.as_str(),
            e.employee_id.as_str(),
            e.shift.as_str(),
            e.department.as_str(),
            e.entry_type.to_db_str(),
        );
        let g = groups.entry(key).or_insert((Decimal::ZERO, 0));
        g.0 += e.total_hours;
        g.1 += 1;
    }

    let mut keys: Vec<&Key> = groups.keys().collect();
    keys.sort();

    let mut s = Sheet::new(
        "Data",
        &[
            "OfcName",
            "dtEndCliWorkWeek",
            "ApplicantID",
            "ShiftNumber",
            "BUDeptName",
            "EntryType",
            "FullName",
            "Total Hours",
            "TotalEntries",
            "weekday",
            "w-e",
        ],
    );

    for key in keys {
        let (site, week, name, id, shift, dept, etype) = *key;
        let (hours, n) = groups[key];

        s.push(vec![
            Cell::text(site),
            Cell::date(week),
            Cell::text(id),
            Cell::text(shift),
            Cell::text(dept),
            Cell::text(etype),
            Cell::text(name),
            Cell::Decimal(hours.round_dp(2)),
            Cell::count(n),
            week.map(|d| Cell::text(d.format("%A").to_string()))
                .unwrap_or(Cell::Empty),
            week.map(|d| Cell::text(week_label(d))).unwrap_or(Cell::Empty),
        ]);
    }

    s
}

/// Entry type counts per employee name.
fn type_counts_by_name<'a, I>(entries: I) -> BTreeMap<&'a str, HashMap<EntryType, usize>>
where
    I: IntoIterator<Item = &'a TimeEntry>,
{
    let mut out: BTreeMap<&str, HashMap<EntryType, usize>> = BTreeMap::new();
    for e in entries {
        *out.entry(e.full_name.as_str())
            .or_default()
            .entry(e.entry_type.clone())
            .or_insert(0) += 1;
    }
    out
}

/// Employees × the four entry types, largest grand total first.
pub fn all_pivot(entries: &[TimeEntry]) -> Sheet {
    if entries.is_empty() {
        return Sheet::no_data("All", NO_RECORDS);
    }

    let mut rows: Vec<(&str, [usize; 4], usize)> = type_counts_by_name(entries)
        .into_iter()
        .map(|(name, counts)| {
            let per_type = EntryType::REPORT_ORDER.map(|t| count_of(&counts, &t));
            (name, per_type, per_type.iter().sum())
        })
        .collect();

    // stable sort keeps names alphabetical within equal totals
    rows.sort_by(|a, b| b.2.cmp(&a.2));

    let mut s = Sheet::new(
        "All",
        &[
            "Employee",
            EntryType::FINGER,
            EntryType::MISSING_CO,
            EntryType::PROVISIONAL,
            EntryType::WRITE_IN,
            "Grand Total",
        ],
    );

    for (name, per_type, total) in rows {
        let mut row = vec![Cell::text(name)];
        row.extend(per_type.iter().map(|n| Cell::count(*n)));
        row.push(Cell::count(total));
        s.push(row);
    }

    s
}

/// One row per (site, employee) with a count per week-ending date.
struct WeeklyPivot<'a> {
    weeks: Vec<NaiveDate>,
    rows: Vec<WeeklyRow<'a>>,
}

struct WeeklyRow<'a> {
    site: &'a str,
    name: &'a str,
    per_week: Vec<usize>,
    total: usize,
}

impl WeeklyRow<'_> {
    /// Mean over every week column, one decimal place.
    fn average(&self, weeks: usize) -> Decimal {
        let mut avg = if weeks == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(self.total as u64) / Decimal::from(weeks as u64))
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        };
        avg.rescale(1);
        avg
    }
}

/// Entries without a week-ending date have no column to land in.
fn weekly_pivot<'a>(entries: &[&'a TimeEntry]) -> WeeklyPivot<'a> {
    let weeks: Vec<NaiveDate> = entries
        .iter()
        .filter_map(|e| e.week_ending)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let col: HashMap<NaiveDate, usize> = weeks.iter().enumerate().map(|(i, d)| (*d, i)).collect();

    let mut grouped: BTreeMap<(&str, &str), Vec<usize>> = BTreeMap::new();
    for &e in entries {
        let Some(d) = e.week_ending else { continue };
        let counts = grouped
            .entry((e.site.as_str(), e.full_name.as_str()))
            .or_insert_with(|| vec![0; weeks.len()]);
        counts[col[&d]] += 1;
    }

    let mut rows: Vec<WeeklyRow> = grouped
        .into_iter()
        .map(|((site, name), per_week)| WeeklyRow {
            site,
            name,
            total: per_week.iter().sum(),
            per_week,
        })
        .collect();

    rows.sort_by(|a, b| b.total.cmp(&a.total));

    WeeklyPivot { weeks, rows }
}

fn weekly_sheet(name: &str, entries: &[&TimeEntry], with_flag: bool) -> Sheet {
    let pivot = weekly_pivot(entries);

    let mut headers: Vec<String> = vec!["OfcName".into(), "FullName".into()];
    headers.extend(pivot.weeks.iter().map(|d| week_label(*d)));
    headers.push("Total".into());
    headers.push("Average".into());
    if with_flag {
        headers.push(ENROLLMENT_HEADER.into());
    }

    let mut s = Sheet {
        name: name.to_string(),
        headers,
        rows: Vec::new(),
    };

    for r in &pivot.rows {
        let mut row = vec![Cell::text(r.site), Cell::text(r.name)];
        row.extend(r.per_week.iter().map(|n| Cell::count(*n)));
        row.push(Cell::count(r.total));
        row.push(Cell::Decimal(r.average(pivot.weeks.len())));
        if with_flag {
            row.push(enrollment_flag(r.total));
        }
        s.push(row);
    }

    s
}

fn of_type<'a>(entries: &'a [TimeEntry], t: &EntryType) -> Vec<&'a TimeEntry> {
    entries.iter().filter(|e| &e.entry_type == t).collect()
}

/// Weekly provisional tracking with the enrollment flag.
pub fn prov_weekly(entries: &[TimeEntry]) -> Sheet {
    let prov = of_type(entries, &EntryType::ProvisionalEntry);
    if prov.is_empty() {
        return Sheet::no_data("Prov", "No provisional entries found");
    }
    weekly_sheet("Prov", &prov, true)
}

/// Weekly write-in tracking, same layout as `Prov` without the flag.
pub fn write_ins(entries: &[TimeEntry]) -> Sheet {
    let wi = of_type(entries, &EntryType::WriteIn);
    if wi.is_empty() {
        return Sheet::no_data("Write Ins", "No write-in entries found");
    }
    weekly_sheet("Write Ins", &wi, false)
}

/// Employees with provisional entries, most entries first.
pub fn provisional_detail(entries: &[TimeEntry]) -> Sheet {
    let prov = of_type(entries, &EntryType::ProvisionalEntry);
    if prov.is_empty() {
        return Sheet::no_data("Provisional", "No provisional entries found");
    }

    let mut groups: BTreeMap<(&str, &str, &str, &str), (usize, Decimal)> = BTreeMap::new();
    for e in prov {
        let g = groups
            .entry((
                e.site.as_str(),
                e.full_name.as_str(),
                e.employee_id.as_str(),
                e.department.as_str(),
            ))
            .or_insert((0, Decimal::ZERO));
        g.0 += 1;
        g.1 += e.total_hours;
    }

    let mut rows: Vec<_> = groups.into_iter().collect();
    rows.sort_by(|a, b| b.1.0.cmp(&a.1.0));

    let mut s = Sheet::new(
        "Provisional",
        &[
            "Office",
            "Employee",
            "Employee ID",
            "Department",
            "Provisional Count",
            "Total Hours",
            ENROLLMENT_HEADER,
        ],
    );

    for ((site, name, id, dept), (count, hours)) in rows {
        s.push(vec![
            Cell::text(site),
            Cell::text(name),
            Cell::text(id),
            Cell::text(dept),
            Cell::count(count),
            Cell::Decimal(hours.round_dp(2)),
            enrollment_flag(count),
        ]);
    }

    s
}

/// One sheet per site (alphabetical), listing employees with at least one
/// non-Finger entry there. Sites without such employees get no sheet.
/// Names are the raw site names; the caller makes them workbook-safe.
pub fn site_sheets(entries: &[TimeEntry]) -> Vec<Sheet> {
    let mut by_site: BTreeMap<&str, Vec<&TimeEntry>> = BTreeMap::new();
    for e in entries.iter().filter(|e| !e.site.is_empty()) {
        by_site.entry(e.site.as_str()).or_default().push(e);
    }

    let non_finger = [
        EntryType::MissingClockOut,
        EntryType::ProvisionalEntry,
        EntryType::WriteIn,
    ];

    let mut out = Vec::new();

    for (site, site_entries) in by_site {
        let mut rows: Vec<(&str, [usize; 3], usize)> = type_counts_by_name(site_entries)
            .into_iter()
            .map(|(name, counts)| {
                let per_type = non_finger.clone().map(|t| count_of(&counts, &t));
                (name, per_type, per_type.iter().sum())
            })
            .filter(|(_, _, total)| *total > 0)
            .collect();

        if rows.is_empty() {
            continue;
        }

        rows.sort_by(|a, b| b.2.cmp(&a.2));

        let mut s = Sheet::new(
            site,
            &[
                "Full Name",
                EntryType::MISSING_CO,
                EntryType::PROVISIONAL,
                EntryType::WRITE_IN,
                "Grand Total",
                ENROLLMENT_HEADER,
            ],
        );

        for (name, per_type, total) in rows {
            let mut row = vec![Cell::text(name)];
            row.extend(per_type.iter().map(|n| Cell::count(*n)));
            row.push(Cell::count(total));
            // per_type[1] is the provisional count
            row.push(enrollment_flag(per_type[1]));
            s.push(row);
        }

        out.push(s);
    }

    out
}
