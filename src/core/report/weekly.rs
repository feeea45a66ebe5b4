use super::{Cell, ReportContext, Sheet};
use crate::core::kpi::KpiCalculator;
use crate::models::time_entry::TimeEntry;
use rust_decimal::Decimal;

fn rate(r: Decimal) -> Cell {
    Cell::text(format!("{r}%"))
}

/// Global KPIs as a Metric/Value table.
pub fn summary(entries: &[TimeEntry], ctx: &ReportContext) -> Sheet {
    let k = KpiCalculator::new(entries).summary();
    let mut s = Sheet::new("Summary", &["Metric", "Value"]);

    let period = match (k.volume.min_week_ending, k.volume.max_week_ending) {
        (Some(a), Some(b)) => format!("{} to {}", a.format("%Y-%m-%d"), b.format("%Y-%m-%d")),
        _ => "N/A".to_string(),
    };

    let rows: Vec<(&str, Cell)> = vec![
        ("Year", Cell::Int(i64::from(ctx.year))),
        (
            "Generated",
            Cell::text(ctx.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        ("Period", Cell::text(period)),
        ("Total Entries", Cell::count(k.compliance.total_entries)),
        ("Total Hours", Cell::Decimal(k.volume.total_hours)),
        ("Unique Employees", Cell::count(k.volume.unique_employees)),
        ("Unique Offices", Cell::count(k.volume.unique_offices)),
        ("Unique Weeks", Cell::count(k.volume.unique_weeks)),
        ("Finger Rate", rate(k.compliance.finger_rate)),
        ("Provisional Rate", rate(k.compliance.provisional_rate)),
        ("Write-In Rate", rate(k.compliance.write_in_rate)),
        ("Missing c/o Rate", rate(k.compliance.missing_co_rate)),
        ("Manual Rate", rate(k.compliance.manual_rate)),
        (
            "First-Try Clock-In Rate",
            rate(k.efficiency.first_try_clock_in_rate),
        ),
        (
            "First-Try Clock-Out Rate",
            rate(k.efficiency.first_try_clock_out_rate),
        ),
    ];

    for (metric, value) in rows {
        s.push(vec![Cell::text(metric), value]);
    }

    s
}

/// One row per ISO week, oldest first.
pub fn weekly_trends(entries: &[TimeEntry]) -> Sheet {
    let weeks = KpiCalculator::new(entries).by_week();
    if weeks.is_empty() {
        return Sheet::no_data("Weekly Trends", "No records found");
    }

    let mut s = Sheet::new(
        "Weekly Trends",
        &[
            "Week",
            "ISO Week",
            "Entries",
            "Finger %",
            "Provisional %",
            "Total Hours",
            "Employees",
        ],
    );

    for w in weeks {
        s.push(vec![
            Cell::date(w.week),
            Cell::text(format!("{}-W{:02}", w.week_year, w.week_number)),
            Cell::count(w.metrics.total_entries),
            Cell::Decimal(w.metrics.finger_rate),
            Cell::Decimal(w.metrics.provisional_rate),
            Cell::Decimal(w.metrics.total_hours),
            Cell::count(w.metrics.unique_employees),
        ]);
    }

    s
}
