//! Schedule extraction engine.
//!
//! Headers and merged blocks are resolved once per sheet, then the body grid is
//! scanned a single time. Nothing in here fails: missing data becomes `None` or a
//! skipped column.
mod assemble;
pub mod date;
pub mod filter;
mod header;
pub mod merge;
mod model;
pub mod remote;
pub mod slot;
pub mod text;

use crate::RowNum;

pub use assemble::{extract_events, sort_events};
pub use date::{normalize_date, parse_date_text};
pub use filter::EventFilter;
pub use header::resolve_headers;
pub use merge::{Block, MergedRangeIndex};
pub use model::{hhmm, ColumnHeader, Event, ParsedCell, SessionType};
pub use remote::{is_red, is_remote};
pub use slot::TimeSlots;
pub use text::parse_cell;

/// Where things live on the schedule sheet. Rows are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleLayout {
    /// session block ("zjazd") labels
    pub block_label_row: RowNum,
    pub date_row: RowNum,
    pub weekday_row: RowNum,
    pub program_row: RowNum,
    /// last body row scanned, rows below are notes
    pub last_body_row: RowNum,
    /// body rows, from `slots.first_row` on
    pub slots: TimeSlots,
}

impl Default for ScheduleLayout {
    fn default() -> Self {
        ScheduleLayout {
            block_label_row: 1,
            date_row: 2,
            weekday_row: 3,
            program_row: 4,
            last_body_row: 57,
            slots: TimeSlots::default(),
        }
    }
}
