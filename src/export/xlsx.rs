// src/export/xlsx.rs

use crate::core::report::{Cell, Report, Sheet};
use crate::errors::AppResult;
use crate::export::notify_export_success;
use crate::ui::messages::info;
use crate::utils::excel_date::date_to_excel_serial;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::fs;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const MAX_COL_WIDTH: usize = 50;

/// Stili condivisi da tutte le celle di un foglio.
struct Styles {
    header: Format,
    bands: [Color; 2],
}

impl Styles {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_color(Color::RGB(0xFFFFFF))
                .set_background_color(Color::RGB(0x2F75B5))
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Thin),
            bands: [Color::RGB(0xEAF3FB), Color::RGB(0xFFFFFF)],
        }
    }

    fn body(&self, row_index: usize) -> Format {
        Format::new()
            .set_background_color(self.bands[row_index % 2])
            .set_pattern(FormatPattern::Solid)
            .set_border(FormatBorder::Thin)
    }
}

/// Render the whole workbook in memory.
pub fn render_report(report: &Report) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let styles = Styles::new();

    for sheet in &report.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet(worksheet, sheet, &styles)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Render and write to `path`.
pub fn write_report(report: &Report, path: &Path) -> AppResult<()> {
    info(format!("Writing XLSX report: {}", path.display()));

    let bytes = render_report(report)?;
    fs::write(path, bytes)?;

    notify_export_success("XLSX report", path);
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, styles: &Styles) -> AppResult<()> {
    // ---------------------------
    // Header
    // ---------------------------
    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, header.as_str(), &styles.header)?;
    }

    worksheet.set_freeze_panes(1, 0)?;

    // ---------------------------
    // Calcolo larghezze colonne
    // ---------------------------
    let mut col_widths: Vec<usize> = sheet
        .headers
        .iter()
        .map(|h| UnicodeWidthStr::width(h.as_str()))
        .collect();

    // ---------------------------
    // Scrittura righe
    // ---------------------------
    for (row_index, cells) in sheet.rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let base = styles.body(row_index);

        for (col, cell) in cells.iter().enumerate() {
            write_cell(worksheet, row, col as u16, cell, &base)?;

            let w = UnicodeWidthStr::width(cell.display().as_str());
            match col_widths.get_mut(col) {
                Some(cw) => *cw = (*cw).max(w),
                None => col_widths.push(w),
            }
        }
    }

    // ---------------------------
    // Set column widths
    // ---------------------------
    for (c, w) in col_widths.iter().enumerate() {
        worksheet.set_column_width(c as u16, (*w).min(MAX_COL_WIDTH) as f64 + 2.0)?;
    }

    Ok(())
}

/// Scrive una singola cella secondo il suo tipo.
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    base: &Format,
) -> AppResult<()> {
    match cell {
        Cell::Empty => {
            worksheet.write_blank(row, col, base)?;
        }
        Cell::Text(s) => {
            worksheet.write_with_format(row, col, s.as_str(), base)?;
        }
        Cell::Int(i) => {
            let fmt = base.clone().set_align(FormatAlign::Right);
            worksheet.write_with_format(row, col, *i as f64, &fmt)?;
        }
        Cell::Decimal(d) => {
            let places = d.scale().min(4) as usize;
            let num_format = if places == 0 {
                "0".to_string()
            } else {
                format!("0.{}", "0".repeat(places))
            };
            let fmt = base
                .clone()
                .set_align(FormatAlign::Right)
                .set_num_format(num_format);
            worksheet.write_with_format(row, col, d.to_f64().unwrap_or(0.0), &fmt)?;
        }
        Cell::Date(d) => {
            let fmt = base.clone().set_num_format("yyyy-mm-dd");
            worksheet.write_with_format(row, col, date_to_excel_serial(*d), &fmt)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_zip_container() {
        let mut sheet = Sheet::new("Data", &["Name", "Count"]);
        sheet.push(vec![Cell::text("Ann"), Cell::Int(3)]);
        let report = Report {
            sheets: vec![sheet, Sheet::no_data("Prov", "No provisional entries found")],
        };

        let bytes = render_report(&report).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
