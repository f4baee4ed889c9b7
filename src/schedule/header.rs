use chrono::NaiveDate;
use log::debug;

use crate::{grid::Workbook, CellValue, ColNum, RowNum};

use super::{date::normalize_date, model::ColumnHeader, ScheduleLayout};

/// Resolve the header rows of every column, left to right.
///
/// Header labels are usually written once over a run of columns, so every field
/// carries the last non-empty value seen to its left until a new one shows up.
/// The fields are filled independently: a new program does not reset the date.
pub fn resolve_headers<W: Workbook + ?Sized>(book: &W, layout: &ScheduleLayout) -> Vec<ColumnHeader> {
    let mut block: Option<String> = None;
    let mut date: Option<NaiveDate> = None;
    let mut weekday: Option<String> = None;
    let mut program: Option<String> = None;

    let mut headers = Vec::with_capacity(book.max_column() as usize);
    for col in 1..=book.max_column() {
        if let Some(v) = present(book, layout.block_label_row, col) {
            block = text_of(v);
        }
        if let Some(v) = present(book, layout.date_row, col) {
            date = normalize_date(v);
            if date.is_none() {
                debug!("column {col}: unreadable date header {:?}", v);
            }
        }
        if let Some(v) = present(book, layout.weekday_row, col) {
            weekday = text_of(v);
        }
        if let Some(v) = present(book, layout.program_row, col) {
            program = text_of(v);
        }
        headers.push(ColumnHeader {
            session_block: block.clone(),
            date,
            weekday: weekday.clone(),
            program: program.clone(),
        });
    }
    headers
}

fn present<W: Workbook + ?Sized>(book: &W, row: RowNum, col: ColNum) -> Option<&CellValue> {
    let value = book.cell_value(row, col);
    (!value.is_blank()).then_some(value)
}

fn text_of(value: &CellValue) -> Option<String> {
    value
        .get::<String>()
        .ok()
        .flatten()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
