use harmonogram::{
    chrono::{NaiveDate, NaiveTime},
    schedule::{is_red, normalize_date, parse_cell, parse_date_text, slot::TimeSlots, Block, MergedRangeIndex, SessionType},
    CellValue, FontColor,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn canonical_month_names() {
    let months = [
        "stycznia", "lutego", "marca", "kwietnia", "maja", "czerwca",
        "lipca", "sierpnia", "września", "października", "listopada", "grudnia",
    ];
    for (i, name) in months.iter().enumerate() {
        let month = i as u32 + 1;
        for day in [1, 9, 28] {
            let text = format!("sobota {day} {name} 2024");
            let date = parse_date_text(&text).unwrap();
            assert_eq!(date, ymd(2024, month, day));
            assert_eq!(date.to_string(), format!("2024-{month:02}-{day:02}"));
        }
    }
}

#[test]
fn corrupted_month_names() {
    let canonical = parse_date_text("10 września 2024").unwrap();
    for text in ["10 wrzesnia 2024", "10 wrze?nia 2024", "10 wrzeĺ›nia 2024", "wtorek 10 WRZE\u{FFFD}NIA 2024"] {
        assert_eq!(parse_date_text(text), Some(canonical), "{text}");
    }
    let canonical = parse_date_text("piątek 25 października 2024").unwrap();
    for text in ["piątek 25 pazdziernika 2024", "piątek 25 pa?dziernika 2024", "piątek 25 paĺşdziernika 2024", "piatek 25 pa\u{FFFD}dziernika 2024"] {
        assert_eq!(parse_date_text(text), Some(canonical), "{text}");
    }
}

#[test]
fn invalid_dates_are_absent() {
    assert_eq!(parse_date_text("31 września 2024"), None);
    assert_eq!(parse_date_text("30 lutego 2024"), None);
    assert_eq!(parse_date_text("10 września"), None);
    assert_eq!(parse_date_text("10 września 1999"), None);
    assert_eq!(parse_date_text("wrzesień"), None);
    assert_eq!(parse_date_text("10 foo 2024"), None);
    assert_eq!(parse_date_text("   "), None);
}

#[test]
fn date_cell_values() {
    // 45545 is 2024-09-10 in the 1900 date system
    assert_eq!(normalize_date(&CellValue::Date(45545.0)), Some(ymd(2024, 9, 10)));
    assert_eq!(normalize_date(&CellValue::Datetime(45545.5)), Some(ymd(2024, 9, 10)));
    assert_eq!(normalize_date(&CellValue::Number(45545.0)), Some(ymd(2024, 9, 10)));
    // small numbers are group counts, not dates
    assert_eq!(normalize_date(&CellValue::Number(3.0)), None);
    assert_eq!(normalize_date(&"2024-09-10".into()), Some(ymd(2024, 9, 10)));
    assert_eq!(normalize_date(&"2024/09/10".into()), Some(ymd(2024, 9, 10)));
    // text of `t="d"` cells
    assert_eq!(normalize_date(&"2024-09-10T00:00:00".into()), Some(ymd(2024, 9, 10)));
    assert_eq!(normalize_date(&"2024-09-10T08:30:00.000".into()), Some(ymd(2024, 9, 10)));
    assert_eq!(normalize_date(&"2024-09-31T00:00:00".into()), None);
    assert_eq!(normalize_date(&CellValue::Blank), None);
    assert_eq!(normalize_date(&CellValue::Bool(true)), None);
}

#[test]
fn time_slots() {
    let slots = TimeSlots::default();
    assert_eq!(slots.start_of(5), None);
    assert_eq!(slots.start_of(1), None);
    assert_eq!(slots.start_of(6), Some(hm(8, 0)));
    assert_eq!(slots.start_of(10), Some(hm(9, 0)));
    assert_eq!(slots.start_of(57), Some(hm(20, 45)));
    assert_eq!(slots.end_of(hm(8, 0), 4), hm(9, 0));
    assert_eq!(slots.end_of(hm(8, 45), 1), hm(9, 0));
    assert_eq!(slots.end_of(hm(20, 45), 1), hm(21, 0));
}

#[test]
fn merged_blocks() {
    let index = MergedRangeIndex::build(&[((6, 2), (9, 2)), ((12, 3), (13, 4))]);
    assert!(!index.is_empty());
    let block = index.block_at(8, 2);
    assert_eq!(block, Block { top_row: 6, top_col: 2, bottom_row: 9, bottom_col: 2 });
    assert_eq!(block.height(), 4);
    assert!(block.is_top_left(6, 2));
    assert!(!block.is_top_left(8, 2));
    assert_eq!(index.block_at(13, 4).height(), 2);
    assert_eq!(index.block_at(10, 2), Block::single(10, 2));
    assert_eq!(index.block_at(10, 2).height(), 1);
    assert!(MergedRangeIndex::build(&[]).is_empty());
}

#[test]
fn red_fonts() {
    assert!(is_red(&FontColor::Rgb("FF0000".into())));
    assert!(is_red(&FontColor::Rgb("ff0000".into())));
    assert!(is_red(&FontColor::Rgb("FFFF0000".into())));
    assert!(is_red(&FontColor::Rgb("00FF0000".into())));
    assert!(is_red(&FontColor::Indexed(10)));
    assert!(!is_red(&FontColor::Rgb("FF000000".into())));
    assert!(!is_red(&FontColor::Rgb("FFC00000".into())));
    assert!(!is_red(&FontColor::Rgb("0000FF".into())));
    assert!(!is_red(&FontColor::Rgb("".into())));
    assert!(!is_red(&FontColor::Indexed(8)));
    assert!(!is_red(&FontColor::Theme(1)));
    assert!(!is_red(&FontColor::Auto));
}

#[test]
fn lab_cell() {
    let cell = parse_cell("dr Jan Kowalski LAB 1.23 CP");
    assert_eq!(cell.session_type, Some(SessionType::Lab));
    assert_eq!(cell.instructors, vec!["dr Jan Kowalski".to_string()]);
    assert_eq!(cell.location.as_deref(), Some("1.23 CP"));
    assert_eq!(cell.title, None);
    assert_eq!(cell.raw_text, "dr Jan Kowalski LAB 1.23 CP");
}

#[test]
fn full_cell() {
    let cell = parse_cell("Bazy danych W\nprof. dr hab. Anna Nowak-Wiśniewska, mgr inż. P. Zieliński\nCI 105 3/5");
    assert_eq!(cell.session_type, Some(SessionType::Lecture));
    assert_eq!(cell.instructors, vec!["prof. dr hab. Anna Nowak-Wiśniewska".to_string(), "mgr inż. P. Zieliński".to_string()]);
    assert_eq!(cell.location.as_deref(), Some("CI 105"));
    assert_eq!(cell.title.as_deref(), Some("Bazy danych"));
}

#[test]
fn engineering_titles() {
    let cell = parse_cell("Bazy danych W dr hab. inż. Jan Nowak CP 12");
    assert_eq!(cell.session_type, Some(SessionType::Lecture));
    assert_eq!(cell.instructors, vec!["dr hab. inż. Jan Nowak".to_string()]);
    assert_eq!(cell.location.as_deref(), Some("CP 12"));
    assert_eq!(cell.title.as_deref(), Some("Bazy danych"));

    let cell = parse_cell("Robotyka LAB prof. dr hab. inż. Maria Zając-Kowal 2.01 CP");
    assert_eq!(cell.instructors, vec!["prof. dr hab. inż. Maria Zając-Kowal".to_string()]);
    assert_eq!(cell.location.as_deref(), Some("2.01 CP"));
    assert_eq!(cell.title.as_deref(), Some("Robotyka"));
}

#[test]
fn session_types() {
    assert_eq!(parse_cell("Programowanie PROJEKT").session_type, Some(SessionType::Project));
    assert_eq!(parse_cell("Ekonomia wykład").session_type, Some(SessionType::Lecture));
    assert_eq!(parse_cell("Etyka konwersatorium").session_type, Some(SessionType::Seminar));
    assert_eq!(parse_cell("Statystyka ćw. sala 12").session_type, Some(SessionType::Other));
    assert_eq!(parse_cell("Statystyka ?w").session_type, Some(SessionType::Other));
    assert_eq!(parse_cell("Prawo K").session_type, Some(SessionType::Seminar));
    // LAB outranks a trailing lecture marker
    assert_eq!(parse_cell("Sieci LAB / W").session_type, Some(SessionType::Lab));
    // single letters inside words do not count
    assert_eq!(parse_cell("Kwantowe Wprowadzenie").session_type, None);
    assert_eq!(parse_cell("Seminarium dyplomowe").session_type, None);
    // punctuation around a marker does not hide it
    for text in ["Analiza W;", "Analiza (W)", "Analiza W/ĆW"] {
        let cell = parse_cell(text);
        assert_eq!(cell.session_type, Some(SessionType::Lecture), "{text}");
        assert_eq!(cell.title.as_deref(), Some("Analiza"), "{text}");
    }
    assert_eq!(parse_cell("Etyka (K)").session_type, Some(SessionType::Seminar));
    // an initial is not a marker
    assert_eq!(parse_cell("Etyka mgr K. Nowak").session_type, None);
}

#[test]
fn rooms() {
    assert_eq!(parse_cell("Analiza 2.15CI").location.as_deref(), Some("2.15CI"));
    assert_eq!(parse_cell("Analiza CsH 3").location.as_deref(), Some("CsH 3"));
    assert_eq!(parse_cell("Analiza; aula A").location.as_deref(), Some("aula A"));
    assert_eq!(parse_cell("Analiza; Sala 7; W").location.as_deref(), Some("Sala 7"));
    assert_eq!(parse_cell("Analiza").location, None);
}

#[test]
fn titles() {
    assert_eq!(parse_cell("Algorytmy LAB dr Jan Kowalski 1.23 CP 3/5").title.as_deref(), Some("Algorytmy"));
    // lower-case "w" is a word, not a marker
    assert_eq!(parse_cell("Prawo w biznesie K").title.as_deref(), Some("Prawo w biznesie"));
    assert_eq!(parse_cell("LAB 3/5").title, None);
    assert_eq!(parse_cell("  ").raw_text, "");
    assert_eq!(parse_cell(" Marketing ; ").title.as_deref(), Some("Marketing"));
}
