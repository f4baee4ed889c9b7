//! Turns a term class-schedule workbook into a flat, chronologically ordered list of session events. The workbook is a grid where every column is one session-day of one program and every body row is a 15 minute time slot; merged cells mark sessions longer than one slot and a red font marks remote sessions.
//!
//! The crate ships its own xlsx reader ([`read`]), but the extraction engine ([`schedule`]) only depends on the [`grid::Workbook`] capability, so any grid source can be plugged in.
use std::path::Path;

use anyhow::{anyhow, bail, Result};
use read::FromCellValue;

/// Excel file reader
pub mod read;
/// In-memory grid and the workbook capability consumed by the engine
pub mod grid;
/// Schedule extraction engine
pub mod schedule;
/// JSON and iCalendar output
pub mod export;

/// reexport chrono
pub use chrono;

pub use grid::{FontColor, SheetGrid, Workbook};
pub use schedule::{extract_events, Event, ScheduleLayout, SessionType};

/// row number, starting from 1
pub type RowNum = u32;
/// column number, starting from 1
pub type ColNum = u16;
/// merged range, ((top row, left column), (bottom row, right column))
pub type MergedRange = ((RowNum, ColNum), (RowNum, ColNum));

/// file extensions the reader accepts
pub static SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "xlsm"];

/// Fail fast when the input path does not look like an Office 2007+ workbook.
pub fn ensure_supported_extension<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        bail!("unsupported input file {:?}: only .xlsx and .xlsm workbooks are supported", path)
    }
}

/// Convert character based Excel cell column addresses to number. If you pass parameter D to this function, you will get 4
pub fn get_num_from_ord(addr: &[u8]) -> Result<ColNum> {
    let mut col: ColNum = 0;
    for b in addr.to_ascii_uppercase() {
        if b.is_ascii_uppercase() {
            col = col
                .checked_mul(26)
                .and_then(|c| c.checked_add((b - b'@') as ColNum))
                .ok_or(anyhow!("column address out of range: {:?}", String::from_utf8_lossy(addr)))?;
        }
    }
    Ok(col)
}

/// Convert number based Excel cell column addresses to character. If you pass parameter 4 to this function, you will get D
pub fn get_ord_from_num(num: ColNum) -> Result<String> {
    if num == 0 {
        return Err(anyhow!("column number starts from 1"));
    }
    let mut col = num as u32;
    let mut addr = Vec::with_capacity(3);
    while col > 0 {
        let rem = (col - 1) % 26;
        addr.push((rem as u8 + b'A') as char);
        col = (col - 1) / 26;
    }
    addr.reverse();
    Ok(String::from_iter(addr))
}

/// Convert character based Excel cell addresses to numbers. If you pass parameter D2 to this function, you will get (2, 4)
pub fn get_tuple_from_ord(addr: &[u8]) -> Result<(RowNum, ColNum)> {
    let split = addr.iter().position(|b| b.is_ascii_digit()).ok_or(anyhow!("invalid cell address: {:?}", String::from_utf8_lossy(addr)))?;
    let (letters, digits) = addr.split_at(split);
    let letters: Vec<u8> = letters.iter().copied().filter(|b| *b != b'$').collect();
    if letters.is_empty() {
        return Err(anyhow!("invalid cell address: {:?}", String::from_utf8_lossy(addr)));
    }
    let row = std::str::from_utf8(digits)?.parse::<RowNum>()?;
    Ok((row, get_num_from_ord(&letters)?))
}

/// Convert numbers based Excel cell addresses to characters. If you pass parameter (2, 4) to this function, you will get D2.
pub fn get_ord_from_tuple(row: RowNum, col: ColNum) -> Result<String> {
    Ok(format!("{}{}", get_ord_from_num(col)?, row))
}

/// Cell Value Type
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Blank,
    Bool(bool),
    Number(f64),
    Date(f64),
    Time(f64),
    Datetime(f64),
    String(String),
    Error(String),
}

impl CellValue {
    /// Attention: as to blank cell, String will return String::new(), and other types will return None.
    pub fn get<T: FromCellValue>(&self) -> Result<Option<T>> {
        T::try_from_cval(self)
    }

    /// whether the cell carries nothing but whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Blank => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}
