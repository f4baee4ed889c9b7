//! Free-text cell parsing.
//!
//! Cells look like `Algorytmy LAB dr Jan Kowalski 1.23 CP 3/5`. Every field is
//! found by an ordered table of independent rules; the first rule that matches
//! wins, and whatever is left after cutting out the matches becomes the title.
use lazy_static::lazy_static;
use regex::Regex;

use super::model::{ParsedCell, SessionType};

/// A session-type marker, matched against `" " + UPPER(text) + " "`.
#[derive(Debug, Clone, Copy)]
pub struct TypeRule {
    pub marker: &'static str,
    pub session_type: SessionType,
}

/// priority order matters: `LAB` beats a stray `W` in the same cell
pub static TYPE_RULES: [TypeRule; 8] = [
    TypeRule { marker: "LAB", session_type: SessionType::Lab },
    TypeRule { marker: " PROJEKT", session_type: SessionType::Project },
    TypeRule { marker: "WYKŁAD", session_type: SessionType::Lecture },
    TypeRule { marker: "KONWERSATORIUM", session_type: SessionType::Seminar },
    TypeRule { marker: " W ", session_type: SessionType::Lecture },
    TypeRule { marker: " K ", session_type: SessionType::Seminar },
    TypeRule { marker: " ĆW", session_type: SessionType::Other },
    TypeRule { marker: " ?W", session_type: SessionType::Other },
];

// marker words removed from titles; single letters only in upper case since "w" is a preposition
static TITLE_MARKERS: [&str; 6] = ["LAB", "PROJEKT", "WYKŁAD", "KONWERSATORIUM", "ĆW", "?W"];
static TITLE_LETTER_MARKERS: [&str; 2] = ["W", "K"];
// punctuation that may stick to a marker, as in `(W)`, `LAB;` or `W/ĆW`; a dot is left alone since `K.` is an initial
static MARKER_SEPARATORS: [char; 6] = [',', ';', ':', '(', ')', '/'];

/// A named room pattern.
pub struct LocationRule {
    pub name: &'static str,
    pattern: Regex,
}

impl LocationRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        LocationRule { name, pattern: Regex::new(pattern).unwrap() }
    }

    /// matched room text, trimmed
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.find(text).map(|m| m.as_str().trim()).filter(|m| !m.is_empty())
    }
}

lazy_static! {
    /// academic title followed by one to three capitalised name parts
    static ref INSTRUCTOR_RE: Regex = Regex::new(
        r"\b(?:prof\. dr hab\. inż\.|prof\. dr hab\.|dr hab\. inż\.|dr hab\.|dr inż\.|mgr inż\.|prof\.|prof|dr|mgr)(?: +\p{Lu}(?:\p{Ll}+(?:-\p{Lu}\p{Ll}+)?\b|\.)){1,3}"
    ).unwrap();
    /// group sizes such as `3/5`
    static ref FRACTION_RE: Regex = Regex::new(r"\b\d+\s*/\s*\d+\b").unwrap();
    pub static ref LOCATION_RULES: Vec<LocationRule> = vec![
        LocationRule::new("room-building", r"(?i)\b\d+\.\d+\s*(?:CP|CI|CsH)\b"),
        LocationRule::new("building-room", r"(?i)\b(?:CP|CI|CsH)\s*\d+\b"),
        LocationRule::new("aula", r"(?i)\baula[^;\n]*"),
        LocationRule::new("sala", r"(?i)\bsala[^;\n]*"),
    ];
}

/// Session type by the first marker found in the text.
pub fn classify(text: &str) -> Option<SessionType> {
    let spaced = text.replace(&MARKER_SEPARATORS[..], " ");
    let padded = format!(" {} ", collapse_whitespace(&spaced).to_uppercase());
    TYPE_RULES
        .iter()
        .find(|rule| padded.contains(rule.marker))
        .map(|rule| rule.session_type)
}

/// Every instructor mention, in reading order.
pub fn find_instructors(text: &str) -> Vec<String> {
    INSTRUCTOR_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// The room, by the first location rule that matches.
pub fn find_location(text: &str) -> Option<String> {
    LOCATION_RULES.iter().find_map(|rule| rule.find(text)).map(str::to_string)
}

/// Split a cell's text into its semantic fields. The trimmed text is always kept as `raw_text`.
pub fn parse_cell(text: &str) -> ParsedCell {
    let raw = text.trim();
    if raw.is_empty() {
        return ParsedCell::default();
    }
    let session_type = classify(raw);
    let instructors = find_instructors(raw);
    let location = find_location(raw);

    let mut rest = FRACTION_RE.replace_all(raw, " ").into_owned();
    for name in &instructors {
        rest = rest.replace(name.as_str(), " ");
    }
    if let Some(loc) = &location {
        rest = rest.replace(loc.as_str(), " ");
    }
    let title = rest
        .split_whitespace()
        .filter(|token| !is_marker_token(token))
        .collect::<Vec<_>>()
        .join(" ");
    let title = title.trim_matches(|c: char| c.is_whitespace() || matches!(c, ';' | ',' | '-' | '/'));

    ParsedCell {
        title: (!title.is_empty()).then(|| title.to_string()),
        session_type,
        instructors,
        location,
        raw_text: raw.to_string(),
    }
}

// a token made only of markers, `W/ĆW` included
fn is_marker_token(token: &str) -> bool {
    token.split('/').all(is_marker_word)
}

fn is_marker_word(part: &str) -> bool {
    let word = part.trim_matches(&MARKER_SEPARATORS[..]);
    if word.is_empty() {
        return false;
    }
    TITLE_LETTER_MARKERS.contains(&word)
        || TITLE_MARKERS.contains(&word.trim_end_matches('.').to_uppercase().as_str())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_tokens() {
        assert!(is_marker_token("LAB"));
        assert!(is_marker_token("lab,"));
        assert!(is_marker_token("ćw."));
        assert!(is_marker_token("W"));
        assert!(!is_marker_token("w"));
        assert!(!is_marker_token("Wstęp"));
        assert!(!is_marker_token(";"));
        assert!(is_marker_token("(W)"));
        assert!(is_marker_token("W/ĆW"));
        assert!(!is_marker_token("K."));
        assert!(!is_marker_token("wejście/wyjście"));
    }

    #[test]
    fn location_rules_are_ordered() {
        let names: Vec<_> = LOCATION_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, ["room-building", "building-room", "aula", "sala"]);
        // a numbered room wins over a later "sala" mention
        assert_eq!(find_location("sala komputerowa 2.15 CI").as_deref(), Some("2.15 CI"));
    }
}
