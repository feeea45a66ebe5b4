use crate::cli::parser::{Commands, KpiSection};
use crate::config::Config;
use crate::core::kpi::{GroupMetrics, GroupRow, KpiCalculator, MethodUsage};
use crate::db::pool::DbPool;
use crate::db::store::FactStore;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{color_for_change, color_for_finger_rate, colorize_optional, paint};
use crate::utils::formatting::{fmt_date, pad_right};
use crate::utils::table::{Column, Table};
use crate::utils::{fmt_change, fmt_rate};
use serde::Serialize;
use std::collections::BTreeMap;

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn kv(rows: &[(&str, String)]) {
    let w = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (k, v) in rows {
        println!("  {} {}", pad_right(&format!("{k}:"), w + 1), v);
    }
}

fn finger(rate: rust_decimal::Decimal) -> String {
    paint(color_for_finger_rate(rate), &fmt_rate(rate))
}

fn metric_columns(first: Vec<Column>) -> Vec<Column> {
    let mut cols = first;
    cols.extend([
        Column::right("Entries"),
        Column::right("Hours"),
        Column::right("Employees"),
        Column::right("Finger"),
        Column::right("Prov"),
        Column::right("Write-In"),
        Column::right("Missing"),
        Column::right("Manual"),
    ]);
    cols
}

fn metric_cells(m: &GroupMetrics) -> Vec<String> {
    vec![
        m.total_entries.to_string(),
        m.total_hours.to_string(),
        m.unique_employees.to_string(),
        finger(m.finger_rate),
        fmt_rate(m.provisional_rate),
        fmt_rate(m.write_in_rate),
        fmt_rate(m.missing_co_rate),
        fmt_rate(m.manual_rate),
    ]
}

fn group_table(label: &str, rows: &[GroupRow]) {
    let mut t = Table::new(metric_columns(vec![Column::left(label)]));
    for r in rows {
        let mut cells = vec![r.key.clone()];
        cells.extend(metric_cells(&r.metrics));
        t.add_row(cells);
    }
    t.print();
}

fn tries_table(label: &str, dist: &BTreeMap<i64, usize>) {
    let mut t = Table::new(vec![Column::right(label), Column::right("Entries")]);
    for (tries, n) in dist {
        t.add_row(vec![tries.to_string(), n.to_string()]);
    }
    t.print();
}

fn methods_table(label: &str, methods: &[MethodUsage]) {
    let mut t = Table::new(vec![
        Column::left(label),
        Column::right("Entries"),
        Column::right("Share"),
    ]);
    for m in methods {
        let name = if m.method.is_empty() {
            "(none)".to_string()
        } else {
            m.method.clone()
        };
        t.add_row(vec![name, m.count.to_string(), fmt_rate(m.percentage)]);
    }
    t.print();
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Kpi {
        section,
        json,
        limit,
        filters,
    } = cmd
    {
        let filter = filters.to_filter()?;
        let pool = DbPool::open(&cfg.database)?;
        let entries = pool.query(&filter)?;
        let calc = KpiCalculator::new(&entries);

        if calc.is_empty() && !*json {
            info("No records match the selected filters.");
            return Ok(());
        }

        match section {
            KpiSection::Summary => {
                let s = calc.summary();
                if *json {
                    return print_json(&s);
                }
                header("KPI summary");
                kv(&[
                    ("Entries", s.compliance.total_entries.to_string()),
                    ("Total hours", s.volume.total_hours.to_string()),
                    ("Employees", s.volume.unique_employees.to_string()),
                    ("Offices", s.volume.unique_offices.to_string()),
                    ("Weeks", s.volume.unique_weeks.to_string()),
                    ("Finger rate", finger(s.compliance.finger_rate)),
                    ("Manual rate", fmt_rate(s.compliance.manual_rate)),
                    (
                        "First-try clock-in",
                        fmt_rate(s.efficiency.first_try_clock_in_rate),
                    ),
                ]);
            }
            KpiSection::Compliance => {
                let c = calc.compliance();
                if *json {
                    return print_json(&c);
                }
                header("Compliance");
                kv(&[
                    ("Entries", c.total_entries.to_string()),
                    (
                        "Finger",
                        format!("{} ({})", c.finger_count, finger(c.finger_rate)),
                    ),
                    (
                        "Provisional Entry",
                        format!("{} ({})", c.provisional_count, fmt_rate(c.provisional_rate)),
                    ),
                    (
                        "Write-In",
                        format!("{} ({})", c.write_in_count, fmt_rate(c.write_in_rate)),
                    ),
                    (
                        "Missing c/o",
                        format!("{} ({})", c.missing_co_count, fmt_rate(c.missing_co_rate)),
                    ),
                    ("Manual", fmt_rate(c.manual_rate)),
                ]);
            }
            KpiSection::Volume => {
                let v = calc.volume();
                if *json {
                    return print_json(&v);
                }
                header("Volume");
                kv(&[
                    ("Entries", v.total_entries.to_string()),
                    ("Total hours", v.total_hours.to_string()),
                    ("Regular hours", v.regular_hours.to_string()),
                    ("Overtime hours", v.overtime_hours.to_string()),
                    ("Employees", v.unique_employees.to_string()),
                    ("Offices", v.unique_offices.to_string()),
                    ("Weeks", v.unique_weeks.to_string()),
                    ("First week-ending", fmt_date(v.min_week_ending)),
                    ("Last week-ending", fmt_date(v.max_week_ending)),
                ]);
            }
            KpiSection::Efficiency => {
                let e = calc.efficiency();
                if *json {
                    return print_json(&e);
                }
                header("Efficiency");
                kv(&[
                    ("First-try clock-in", fmt_rate(e.first_try_clock_in_rate)),
                    ("First-try clock-out", fmt_rate(e.first_try_clock_out_rate)),
                    ("Avg clock-in tries", e.avg_clock_in_tries.to_string()),
                    ("Avg clock-out tries", e.avg_clock_out_tries.to_string()),
                ]);
            }
            KpiSection::Offices => {
                let rows = calc.by_office();
                if *json {
                    return print_json(&rows);
                }
                group_table("Office", &rows);
            }
            KpiSection::Departments => {
                let rows = calc.by_department();
                if *json {
                    return print_json(&rows);
                }
                group_table("Department", &rows);
            }
            KpiSection::Shifts => {
                let rows = calc.by_shift();
                if *json {
                    return print_json(&rows);
                }
                group_table("Shift", &rows);
            }
            KpiSection::Weeks => {
                let rows = calc.by_week();
                if *json {
                    return print_json(&rows);
                }
                let mut t = Table::new(metric_columns(vec![
                    Column::left("ISO week"),
                    Column::left("Week"),
                ]));
                for r in &rows {
                    let mut cells = vec![
                        format!("{}-W{:02}", r.week_year, r.week_number),
                        fmt_date(r.week),
                    ];
                    cells.extend(metric_cells(&r.metrics));
                    t.add_row(cells);
                }
                t.print();
            }
            KpiSection::Employees => {
                let rows = calc.by_employee(*limit);
                if *json {
                    return print_json(&rows);
                }
                let mut t = Table::new(metric_columns(vec![
                    Column::left("ID"),
                    Column::left("Name"),
                    Column::left("Site"),
                ]));
                for r in &rows {
                    let mut cells = vec![r.employee_id.clone(), r.full_name.clone(), r.site.clone()];
                    cells.extend(metric_cells(&r.metrics));
                    t.add_row(cells);
                }
                t.print();
            }
            KpiSection::Trends => {
                let rows = calc.trends();
                if *json {
                    return print_json(&rows);
                }
                let mut t = Table::new(vec![
                    Column::left("ISO week"),
                    Column::left("Week"),
                    Column::right("Entries"),
                    Column::right("Δ Entries"),
                    Column::right("Finger"),
                    Column::right("Δ Finger"),
                ]);
                for r in &rows {
                    let delta = match r.finger_rate_change {
                        Some(d) => paint(color_for_change(d), &fmt_change(Some(d))),
                        None => colorize_optional(&fmt_change::<rust_decimal::Decimal>(None)),
                    };
                    t.add_row(vec![
                        format!("{}-W{:02}", r.week_year, r.week_number),
                        fmt_date(r.week),
                        r.total_entries.to_string(),
                        fmt_change(r.entries_change),
                        finger(r.finger_rate),
                        delta,
                    ]);
                }
                t.print();
            }
            KpiSection::Clock => {
                let c = calc.clock_behavior();
                if *json {
                    return print_json(&c);
                }
                header("Clock-in tries");
                tries_table("Tries", &c.clock_in_tries);
                header("Clock-out tries");
                tries_table("Tries", &c.clock_out_tries);
                header("Clock-in methods");
                methods_table("Method", &c.clock_in_methods);
                header("Clock-out methods");
                methods_table("Method", &c.clock_out_methods);
            }
        }
    }

    Ok(())
}
