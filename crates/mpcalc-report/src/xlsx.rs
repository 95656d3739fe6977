//! Excel rendering of [`Report`] tables.

use std::path::{Path, PathBuf};

use umya_spreadsheet::{Border, HorizontalAlignmentValues, Worksheet};

use crate::error::ReportError;
use crate::table::{Cell, Report, Sheet};

const HEADER_FILL: &str = "FFF4ECC5";
const HEADER_BORDER: &str = "FFC5B775";
const MONEY_FORMAT: &str = "#,##0.0";
const COUNT_FORMAT: &str = "#,##0";
const PERCENT_FORMAT: &str = "0.0";

/// Spreadsheet column letters for a 1-based index: 1 is `A`, 27 is `AA`.
fn column_letter(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn column_width(index: u32) -> f64 {
    match index {
        1 => 30.0,
        2 => 18.0,
        3 => 10.0,
        _ => 15.0,
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn thin(border: &mut Border) {
    border.set_border_style(Border::BORDER_THIN);
    border.get_color_mut().set_argb(HEADER_BORDER);
}

fn write_header(ws: &mut Worksheet, headers: &[&str]) {
    for (i, header) in headers.iter().enumerate() {
        let coord = (to_u32(i) + 1, 1);
        ws.get_cell_mut(coord).set_value(*header);
        let style = ws.get_style_mut(coord);
        style.get_font_mut().set_bold(true);
        style.set_background_color(HEADER_FILL);
        let borders = style.get_borders_mut();
        thin(borders.get_left_mut());
        thin(borders.get_right_mut());
        thin(borders.get_top_mut());
        thin(borders.get_bottom_mut());
    }
}

fn write_row(ws: &mut Worksheet, row: u32, cells: &[Cell], bold: bool) {
    for (i, cell) in cells.iter().enumerate() {
        let coord = (to_u32(i) + 1, row);
        let format = match cell {
            Cell::Empty => None,
            Cell::Text(text) => {
                ws.get_cell_mut(coord).set_value(text.as_str());
                None
            }
            Cell::Money(v) => Some((*v, MONEY_FORMAT)),
            Cell::Count(v) => Some((*v, COUNT_FORMAT)),
            Cell::Percent(v) => Some((*v, PERCENT_FORMAT)),
        };
        if let Some((value, code)) = format {
            ws.get_cell_mut(coord).set_value_number(value);
            let style = ws.get_style_mut(coord);
            style.get_number_format_mut().set_format_code(code);
            style
                .get_alignment_mut()
                .set_horizontal(HorizontalAlignmentValues::Right);
        }
        if bold {
            ws.get_style_mut(coord).get_font_mut().set_bold(true);
        }
    }
}

fn write_sheet(ws: &mut Worksheet, sheet: &Sheet) {
    write_header(ws, &sheet.headers);

    let mut row = 2;
    for cells in &sheet.rows {
        write_row(ws, row, cells, false);
        row += 1;
    }
    if let Some(totals) = &sheet.totals {
        write_row(ws, row, totals, true);
    }

    let width = to_u32(sheet.headers.len());
    for col in 1..=width {
        ws.get_column_dimension_mut(&column_letter(col))
            .set_width(column_width(col));
    }
    if width > 0 {
        let last_data_row = to_u32(sheet.rows.len()) + 1;
        ws.set_auto_filter(format!("A1:{}{last_data_row}", column_letter(width)));
    }
}

/// Writes `report` into `dir`, creating the directory if needed, and returns
/// the path of the written workbook.
///
/// # Errors
///
/// Returns [`ReportError`] when the directory cannot be created, a sheet
/// cannot be added, or the workbook cannot be saved.
pub fn write_report(report: &Report, dir: &Path) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::OutputDir {
        path: dir.display().to_string(),
        source,
    })?;

    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    for sheet in &report.sheets {
        let ws = book
            .new_sheet(sheet.title.as_str())
            .map_err(|reason| ReportError::Sheet {
                title: sheet.title.clone(),
                reason: reason.to_string(),
            })?;
        write_sheet(ws, sheet);
    }

    let path = dir.join(&report.file_name);
    umya_spreadsheet::writer::xlsx::write(&book, &path).map_err(|e| ReportError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), sheets = report.sheets.len(), "report written");
    Ok(path)
}
