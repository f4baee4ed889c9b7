use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    ensure_supported_extension,
    grid::Workbook,
    read::XlsxBook,
    schedule::{extract_events, Event, ScheduleLayout},
};

/// marker for an export that covers every program
pub const ALL_PROGRAMS: &str = "ALL";

const ICS_PRODID: &str = "-//MUP Harmonogram//PL";
const ICS_LINE_OCTETS: usize = 75;

/// The JSON document written next to the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleExport {
    pub source_file: String,
    /// local time, `YYYY-MM-DDTHH:MM:SS`
    pub generated_at: String,
    pub program: String,
    pub events: Vec<Event>,
}

impl ScheduleExport {
    pub fn new<S: Into<String>>(source_file: S, events: Vec<Event>) -> Self {
        ScheduleExport {
            source_file: source_file.into(),
            generated_at: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            program: ALL_PROGRAMS.to_string(),
            events,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).with_context(|| format!("failed to write {:?}", path))
    }
}

/// Open a workbook and extract the events of one sheet, or of the active sheet when `sheet` is `None`.
pub fn read_schedule<P: AsRef<Path>>(input: P, sheet: Option<&str>, layout: &ScheduleLayout) -> Result<Vec<Event>> {
    let input = input.as_ref();
    ensure_supported_extension(input)?;
    let mut book = XlsxBook::new(input)?;
    let sheet = book.select_sheet(sheet)?;
    let grid = book.load_sheet(&sheet)?;
    info!("sheet {:?}: {} rows x {} columns", sheet, grid.max_row(), grid.max_column());
    Ok(extract_events(&grid, layout))
}

/// Run the whole pipeline and write the JSON envelope. Returns the event count and the written file.
pub fn export_schedule_to_json<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q, sheet: Option<&str>) -> Result<(usize, PathBuf)> {
    let input = input.as_ref();
    let events = read_schedule(input, sheet, &ScheduleLayout::default())?;
    let export = ScheduleExport::new(input.to_string_lossy(), events);
    export.write_json(output.as_ref())?;
    Ok((export.events.len(), output.as_ref().to_path_buf()))
}

/// Render events as an iCalendar document. Times are floating local times.
pub fn build_ics(events: &[Event], stamp: DateTime<Utc>) -> String {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".into(),
        "VERSION:2.0".into(),
        format!("PRODID:{ICS_PRODID}"),
        "CALSCALE:GREGORIAN".into(),
        "METHOD:PUBLISH".into(),
    ];
    let stamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();
    for e in events {
        let start = ics_local(e.date, e.start_time);
        let end = ics_local(e.date, e.end_time);
        let location = match (&e.location, e.is_remote) {
            (Some(loc), _) => loc.clone(),
            (None, true) => "Zdalnie".to_string(),
            (None, false) => String::new(),
        };

        let mut details = vec![format!("Program: {}", e.program)];
        if let Some(t) = e.session_type {
            details.push(format!("Typ: {t}"));
        }
        if let Some(loc) = &e.location {
            details.push(format!("Sala: {loc}"));
        } else if e.is_remote {
            details.push("Zdalnie".to_string());
        }
        if !e.instructors.is_empty() {
            details.push(format!("Prowadzący: {}", e.instructors.join(", ")));
        }
        if let Some(block) = &e.session_block_label {
            details.push(format!("Zjazd: {block}"));
        }

        let uid = format!("{}|{}|{}|{}", start, end, e.title.as_deref().unwrap_or_default(), e.location.as_deref().unwrap_or_default());
        lines.push("BEGIN:VEVENT".into());
        lines.push(format!("DTSTAMP:{stamp}"));
        lines.push(format!("UID:{}@mup", string_hash(&uid)));
        lines.push(format!("DTSTART:{start}"));
        lines.push(format!("DTEND:{end}"));
        lines.push(format!("SUMMARY:{}", ics_escape(e.display_title())));
        lines.push(format!("DESCRIPTION:{}", ics_escape(&details.join("\n"))));
        if !location.is_empty() {
            lines.push(format!("LOCATION:{}", ics_escape(&location)));
        }
        lines.push("END:VEVENT".into());
    }
    lines.push("END:VCALENDAR".into());

    let mut out = String::new();
    for line in &lines {
        fold_line(line, &mut out);
        out.push_str("\r\n");
    }
    out
}

/// write `build_ics` output stamped with the current time
pub fn write_ics<P: AsRef<Path>>(events: &[Event], path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, build_ics(events, Utc::now())).with_context(|| format!("failed to write {:?}", path))
}

fn ics_local(date: NaiveDate, time: NaiveTime) -> String {
    date.and_time(time).format("%Y%m%dT%H%M%S").to_string()
}

fn ics_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => {},
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            _ => out.push(c),
        }
    }
    out
}

// content lines are limited to 75 octets, continuation lines start with a space
fn fold_line(line: &str, out: &mut String) {
    let mut used = 0;
    for c in line.chars() {
        if used + c.len_utf8() > ICS_LINE_OCTETS {
            out.push_str("\r\n ");
            used = 1;
        }
        out.push(c);
        used += c.len_utf8();
    }
}

// 31-multiplier string hash in base 36, stable across runs
fn string_hash(s: &str) -> String {
    let h = s.chars().fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32));
    let mut n = h.unsigned_abs();
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(std::char::from_digit(n % 36, 36).unwrap_or('0'));
        n /= 36;
    }
    digits.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping() {
        assert_eq!(ics_escape("a,b;c\\d\ne"), "a\\,b\\;c\\\\d\\ne");
    }

    #[test]
    fn folding_keeps_multibyte_chars_whole() {
        let mut out = String::new();
        fold_line(&"ł".repeat(60), &mut out);
        for part in out.split("\r\n") {
            assert!(part.len() <= ICS_LINE_OCTETS);
        }
        assert_eq!(out.replace("\r\n ", ""), "ł".repeat(60));
    }

    #[test]
    fn hash_is_stable() {
        assert_eq!(string_hash(""), "0");
        assert_eq!(string_hash("a"), "2p");
        assert_eq!(string_hash("ab"), string_hash("ab"));
        assert_ne!(string_hash("ab"), string_hash("ba"));
    }
}
