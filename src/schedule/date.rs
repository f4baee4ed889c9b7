//! Calendar dates from header cells.
//!
//! Header dates arrive either as native spreadsheet dates or as Polish free text
//! such as `wtorek 10 września 2024`, sometimes with the accented month names
//! mangled by a wrong code page.
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

use crate::{read::serial_to_date, CellValue};

/// characters that stand in for a letter lost to a broken encoding
const PLACEHOLDERS: [char; 2] = ['?', '\u{FFFD}'];

/// month number with every spelling seen in real schedules, lower case
pub static MONTH_VARIANTS: [(u32, &[&str]); 12] = [
    (1, &["stycznia"]),
    (2, &["lutego"]),
    (3, &["marca"]),
    (4, &["kwietnia"]),
    (5, &["maja"]),
    (6, &["czerwca"]),
    (7, &["lipca"]),
    (8, &["sierpnia"]),
    (9, &["wrzesnia", "września", "wrze?nia", "wrzeĺ›nia"]),
    (10, &["października", "pazdziernika", "pa?dziernika", "paĺşdziernika"]),
    (11, &["listopada"]),
    (12, &["grudnia"]),
];

lazy_static! {
    static ref YEAR_RE: Regex = Regex::new(r"(20\d{2})").unwrap();
    static ref DAY_RE: Regex = Regex::new(r"\b(\d{1,2})\b").unwrap();
    static ref WORD_RE: Regex = Regex::new(r"[\p{L}?\x{FFFD}]+").unwrap();
}

/// Normalise a header cell into a calendar date. Never fails, absence is `None`.
pub fn normalize_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Date(n) | CellValue::Datetime(n) => serial_to_date(*n).ok(),
        // plain numbers only count as serial dates within the 20xx window
        CellValue::Number(n) => serial_to_date(*n).ok().filter(|d| (2000..2100).contains(&d.year())),
        CellValue::String(s) => parse_date_text(s),
        _ => None,
    }
}

/// Parse free-text dates: ISO forms first, then `<day> <month name> <20xx>` in any order.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    // `t="d"` cells store ISO 8601 datetimes
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(datetime.date());
        }
    }

    let s = trimmed.to_lowercase();
    let year: i32 = YEAR_RE.captures(&s)?.get(1)?.as_str().parse().ok()?;
    let day: u32 = DAY_RE.captures(&s)?.get(1)?.as_str().parse().ok()?;
    let month = month_by_substring(&s).or_else(|| month_by_token(&s))?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_by_substring(s: &str) -> Option<u32> {
    MONTH_VARIANTS
        .iter()
        .find(|(_, variants)| variants.iter().any(|v| s.contains(v)))
        .map(|(month, _)| *month)
}

// the month name is expected as the second word, e.g. "wtorek 10 pa?dziernika 2024"
fn month_by_token(s: &str) -> Option<u32> {
    let mid = WORD_RE.find_iter(s).nth(1)?.as_str();
    MONTH_VARIANTS
        .iter()
        .find(|(_, variants)| variants.iter().any(|v| same_with_placeholders(mid, v)))
        .map(|(month, _)| *month)
}

fn same_with_placeholders(word: &str, variant: &str) -> bool {
    word.chars().count() == variant.chars().count()
        && word
            .chars()
            .zip(variant.chars())
            .all(|(a, b)| a == b || PLACEHOLDERS.contains(&a) || PLACEHOLDERS.contains(&b))
}
