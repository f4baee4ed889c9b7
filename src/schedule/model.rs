use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Kind of class, read from the markers the schedule authors put in cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    /// wykład, `W`
    Lecture,
    /// konwersatorium, `K`
    Seminar,
    /// laboratory, `LAB`
    Lab,
    /// `PROJEKT`
    Project,
    /// exercise classes (ćwiczenia, `ĆW`)
    Other,
}

impl SessionType {
    /// the abbreviation used on printed schedules
    pub fn code(&self) -> &'static str {
        match self {
            SessionType::Lecture => "W",
            SessionType::Seminar => "K",
            SessionType::Lab => "LAB",
            SessionType::Project => "PROJEKT",
            SessionType::Other => "ĆW",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SessionType {
    type Err = anyhow::Error;

    /// accepts both the variant name (`LECTURE`) and the schedule abbreviation (`W`)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "LECTURE" | "W" => Ok(SessionType::Lecture),
            "SEMINAR" | "K" => Ok(SessionType::Seminar),
            "LAB" => Ok(SessionType::Lab),
            "PROJECT" | "PROJEKT" => Ok(SessionType::Project),
            "OTHER" | "ĆW" | "CW" => Ok(SessionType::Other),
            other => Err(anyhow!("unknown session type {:?}", other)),
        }
    }
}

/// Metadata of one grid column after forward-filling the header rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnHeader {
    pub session_block: Option<String>,
    pub date: Option<NaiveDate>,
    pub weekday: Option<String>,
    pub program: Option<String>,
}

/// Semantic fields pulled out of a cell's free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCell {
    pub title: Option<String>,
    pub session_type: Option<SessionType>,
    pub instructors: Vec<String>,
    pub location: Option<String>,
    pub raw_text: String,
}

/// One scheduled session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub session_block_label: Option<String>,
    pub program: String,
    pub date: NaiveDate,
    pub weekday: Option<String>,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub title: Option<String>,
    pub session_type: Option<SessionType>,
    pub instructors: Vec<String>,
    pub location: Option<String>,
    pub is_remote: bool,
    pub color_tag: Option<String>,
    pub raw_text: String,
}

impl Event {
    pub(crate) fn new(header: &ColumnHeader, date: NaiveDate, program: &str, start_time: NaiveTime, end_time: NaiveTime, cell: ParsedCell, is_remote: bool) -> Self {
        Event {
            session_block_label: header.session_block.clone(),
            program: program.to_string(),
            date,
            weekday: header.weekday.clone(),
            start_time,
            end_time,
            title: cell.title,
            session_type: cell.session_type,
            instructors: cell.instructors,
            location: cell.location,
            is_remote,
            color_tag: is_remote.then(|| "red".to_string()),
            raw_text: cell.raw_text,
        }
    }

    /// the title, or the first line of the raw text when no title survived cleaning
    pub fn display_title(&self) -> &str {
        match &self.title {
            Some(t) => t,
            None => self.raw_text.lines().next().unwrap_or_default().trim(),
        }
    }
}

/// `HH:MM` wall-clock times
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(D::Error::custom)
    }
}
