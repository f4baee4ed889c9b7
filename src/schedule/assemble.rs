use log::{debug, info, trace};

use crate::{grid::Workbook, ColNum, RowNum};

use super::{
    header::resolve_headers,
    merge::MergedRangeIndex,
    model::{ColumnHeader, Event},
    remote::is_remote,
    text::parse_cell,
    ScheduleLayout,
};

/// Extract every session of a sheet, sorted by date, program and start time.
///
/// Columns without a date or a program are skipped. A merged block yields one
/// event from its top-left cell and its height decides the duration.
pub fn extract_events<W: Workbook + ?Sized>(book: &W, layout: &ScheduleLayout) -> Vec<Event> {
    let headers = resolve_headers(book, layout);
    let blocks = MergedRangeIndex::build(book.merged_ranges());
    let last_row = book.max_row().min(layout.last_body_row);

    let mut events = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        let col = (idx + 1) as ColNum;
        let (Some(date), Some(program)) = (header.date, header.program.as_deref()) else {
            debug!("column {col}: no date or program, skipped");
            continue;
        };
        scan_column(book, layout, &blocks, col, header, date, program, last_row, &mut events);
    }
    sort_events(&mut events);
    info!("{} events from {} columns", events.len(), headers.len());
    events
}

#[allow(clippy::too_many_arguments)]
fn scan_column<W: Workbook + ?Sized>(
    book: &W,
    layout: &ScheduleLayout,
    blocks: &MergedRangeIndex,
    col: ColNum,
    header: &ColumnHeader,
    date: chrono::NaiveDate,
    program: &str,
    last_row: RowNum,
    events: &mut Vec<Event>,
) {
    let mut row = layout.slots.first_row;
    while row <= last_row {
        let block = blocks.block_at(row, col);
        if !block.is_top_left(row, col) {
            row += 1;
            continue;
        }
        let text = book.cell_value(row, col).get::<String>().ok().flatten().unwrap_or_default();
        if text.trim().is_empty() {
            // an empty block still leaves the rows under it to be visited
            row += 1;
            continue;
        }
        let Some(start) = layout.slots.start_of(row) else {
            row += 1;
            continue;
        };
        let end = layout.slots.end_of(start, block.height());
        let remote = is_remote(book, row, col);
        let event = Event::new(header, date, program, start, end, parse_cell(&text), remote);
        trace!("{date} {program} {start}-{end}: {:?}", event.display_title());
        events.push(event);
        row += block.height();
    }
}

/// Stable sort on `(date, program, start time)`.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.program.cmp(&b.program))
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
}
