use std::{collections::{HashMap, HashSet}, fs::File, io::{BufRead, BufReader}, path::Path};
use anyhow::{anyhow, Context, Result};
use zip::ZipArchive;
use chrono::{Duration, NaiveDate, NaiveTime};
use quick_xml::{events::{BytesStart, Event}, reader::Reader};
use lazy_static::lazy_static;
use log::{debug, warn};

use crate::{get_tuple_from_ord, grid::{SheetGrid, Workbook}, CellValue, ColNum, RowNum};

mod style;

pub use style::{CellXf, StyleSheet};
use style::{FMT_DATE, FMT_DATETIME, FMT_TIME};

// ooxml： http://www.officeopenxml.com/

macro_rules! get_attr_val {
    ($e:expr, $tag:expr, to_string) => {
        match $e.try_get_attribute($tag)? {
            Some(v) => {v.unescape_value()?.to_string()},
            None => return Err(anyhow!("attribute {} not exist", $tag))
        }
    };
}

/// xlsx book reader
pub struct XlsxBook {
    str_share: Vec<String>,
    styles: StyleSheet,
    sheet_order: Vec<String>,
    shts_hidden: Vec<String>,
    shts_visible: Vec<String>,
    active_tab: usize,
    map_sheet: HashMap<String, String>,
    zip_archive: ZipArchive<BufReader<File>>,
}

impl XlsxBook {
    /// open a workbook; shared strings and styles are loaded right away, sheets on demand
    pub fn new<T: AsRef<Path>>(path: T) -> Result<XlsxBook> {
        let path = path.as_ref();
        let mut zip_archive = {
            let file = File::open(path).with_context(|| format!("failed to open {:?}", path))?;
            let zipreader = BufReader::new(file);
            ZipArchive::new(zipreader).with_context(|| format!("{:?} is not a zip container", path))?
        };

        let book_refs = {
            let file = zip_archive.by_name("xl/_rels/workbook.xml.rels").context("workbook relationships not found")?;

            let mut buf = Vec::new();
            let mut refs = HashMap::new();
            let mut reader = Reader::from_reader(BufReader::new(file));
            loop {
                match reader.read_event_into(&mut buf) {
                    Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                        if e.name().as_ref() == b"Relationship" {
                            refs.insert(get_attr_val!(e, "Id", to_string), get_attr_val!(e, "Target", to_string));
                        };
                    },
                    Ok(Event::Eof) => break,
                    Err(e) => return Err(anyhow!("workbook.xml.rels broken: {:?}", e)),
                    _ => ()
                }
                buf.clear();
            };
            refs
        };

        let mut sheet_order = Vec::<String>::new();
        let mut shts_hidden = Vec::<String>::new();
        let mut shts_visible = Vec::<String>::new();
        let mut active_tab: usize = 0;
        let map_sheet = {
            let file = zip_archive.by_name("xl/workbook.xml").context("xl/workbook.xml not found")?;
            let mut reader = Reader::from_reader(BufReader::new(file));

            let mut buf = Vec::new();
            let mut map_sheet: HashMap<String, String> = HashMap::new();
            loop {
                match reader.read_event_into(&mut buf) {
                    Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                        if e.name().as_ref() == b"sheet" {
                            let name = get_attr_val!(e, "name", to_string);
                            let rid = get_attr_val!(e, "r:id", to_string);
                            let target = book_refs.get(&rid).ok_or(anyhow!("Relationship of sheet-{rid} not found"))?;
                            let sheet = if target.starts_with('/') {
                                target.trim_start_matches('/').to_string()
                            } else {
                                format!("xl/{}", target)
                            };
                            match e.try_get_attribute("state")? {
                                Some(attr) if &*attr.unescape_value()? != "visible" => {
                                    shts_hidden.push(name.clone());
                                },
                                _ => shts_visible.push(name.clone()),
                            };
                            sheet_order.push(name.clone());
                            map_sheet.insert(name, sheet);
                        } else if e.name().as_ref() == b"workbookView" {
                            if let Some(attr) = e.try_get_attribute("activeTab")? {
                                active_tab = attr.unescape_value()?.parse()?;
                            }
                        };
                    },
                    Ok(Event::Eof) => break,
                    Err(e) => return Err(anyhow!("workbook.xml is broken: {:?}", e)),
                    _ => ()
                }
                buf.clear();
            };
            map_sheet
        };

        let styles = match zip_archive.by_name("xl/styles.xml") {
            Ok(file) => StyleSheet::from_reader(BufReader::new(file))?,
            Err(_) => StyleSheet::default(),
        };

        let str_share = match zip_archive.by_name("xl/sharedStrings.xml") {
            Ok(file) => load_share_strings(BufReader::new(file))?,
            Err(_) => Vec::new(),
        };
        debug!("opened workbook {:?}: {} sheet(s), {} shared string(s)", path, sheet_order.len(), str_share.len());

        Ok(XlsxBook {
            str_share,
            styles,
            sheet_order,
            shts_hidden,
            shts_visible,
            active_tab,
            map_sheet,
            zip_archive,
        })
    }
    /// get hidden sheets
    pub fn get_hidden_sheets(&self) -> &Vec<String> {
        &self.shts_hidden
    }
    /// get visible sheets
    pub fn get_visible_sheets(&self) -> &Vec<String> {
        &self.shts_visible
    }
    /// every sheet name in workbook order
    pub fn sheet_names(&self) -> &Vec<String> {
        &self.sheet_order
    }
    /// the sheet shown when the workbook was last saved
    pub fn active_sheet(&self) -> Option<&String> {
        self.sheet_order.get(self.active_tab).or(self.sheet_order.first())
    }
    /// the named sheet if it exists, the active sheet otherwise
    pub fn select_sheet(&self, name: Option<&str>) -> Result<String> {
        if let Some(name) = name {
            if self.map_sheet.contains_key(name) {
                return Ok(name.to_string());
            }
            warn!("sheet {:?} not found, falling back to the active sheet", name);
        }
        self.active_sheet().cloned().ok_or(anyhow!("workbook has no sheets"))
    }
    /// read a whole worksheet into memory
    pub fn load_sheet(&mut self, sht_name: &str) -> Result<SheetGrid> {
        let target = self.map_sheet.get(sht_name).ok_or(anyhow!("{} sheet not found!", sht_name))?.clone();
        let file = self.zip_archive.by_name(&target).map_err(|_| anyhow!("sheet {} - {} lost！", sht_name, target))?;
        let grid = SheetGrid::with_xf_colors(sht_name, self.styles.xf_font_colors());
        let mut parser = SheetParser::new(grid, &self.str_share, &self.styles);
        parser.run(BufReader::new(file)).with_context(|| format!("failed to read sheet {}", sht_name))?;
        let grid = parser.grid;
        debug!("loaded sheet {:?}: {} cell(s), {} merged range(s)", sht_name, grid.cell_count(), grid.merged_ranges().len());
        Ok(grid)
    }
}

fn load_share_strings<R: BufRead>(source: R) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::with_capacity(3069);
    let mut vec_share: Vec<String> = Vec::new();
    let mut shstring = String::new();
    let mut in_text = false;
    let mut in_phonetic = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                match e.name().as_ref() {
                    b"sst" => {
                        if let Some(cnt) = e.try_get_attribute("uniqueCount")? {
                            vec_share.reserve(cnt.unescape_value()?.parse()?);
                        }
                    },
                    b"si" => shstring.clear(),
                    b"rPh" => in_phonetic = true,
                    b"t" => in_text = !in_phonetic,
                    _ => (),
                }
            },
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"si" {
                    vec_share.push(String::new());
                }
            },
            Ok(Event::Text(ref t)) => {
                if in_text {
                    shstring.push_str(&t.unescape()?);
                }
            },
            Ok(Event::End(ref e)) => {
                match e.name().as_ref() {
                    b"t" => in_text = false,
                    b"rPh" => in_phonetic = false,
                    b"si" => vec_share.push(std::mem::take(&mut shstring)),
                    _ => (),
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow!("sharedStrings.xml is broken: {:?}", e)),
            _ => ()
        }
        buf.clear();
    };
    Ok(vec_share)
}

/// streaming state while reading one worksheet xml
struct SheetParser<'a> {
    grid: SheetGrid,
    str_share: &'a Vec<String>,
    styles: &'a StyleSheet,
    cell: Option<(RowNum, ColNum)>,
    cell_type: Vec<u8>,
    cell_style: u32,
    in_value: bool,
    in_inline: bool,
    text: String,
}

impl<'a> SheetParser<'a> {
    fn new(grid: SheetGrid, str_share: &'a Vec<String>, styles: &'a StyleSheet) -> Self {
        SheetParser {
            grid,
            str_share,
            styles,
            cell: None,
            cell_type: Vec::new(),
            cell_style: 0,
            in_value: false,
            in_inline: false,
            text: String::new(),
        }
    }

    fn run<R: BufRead>(&mut self, source: R) -> Result<()> {
        let mut reader = Reader::from_reader(source);
        let mut buf = Vec::with_capacity(8 * 1024);
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => self.open_tag(e, false)?,
                Ok(Event::Empty(ref e)) => self.open_tag(e, true)?,
                Ok(Event::Text(ref t)) => {
                    if self.in_value || self.in_inline {
                        self.text.push_str(&t.unescape()?);
                    }
                },
                Ok(Event::End(ref e)) => {
                    match e.name().as_ref() {
                        b"v" => self.in_value = false,
                        b"t" => self.in_inline = false,
                        b"c" => self.close_cell()?,
                        _ => (),
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(anyhow!("sheet data is broken: {:?}", e)),
                _ => ()
            }
            buf.clear();
        }
        Ok(())
    }

    fn open_tag(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<()> {
        match e.name().as_ref() {
            b"dimension" => {
                let attr = get_attr_val!(e, "ref", to_string);
                if let Some(x) = attr.split(':').last() {
                    let (row, col) = get_tuple_from_ord(x.as_bytes())?;
                    self.grid.extend_to(row, col);
                }
            },
            b"c" => {
                let addr = get_attr_val!(e, "r", to_string);
                self.cell = Some(get_tuple_from_ord(addr.as_bytes())?);
                self.cell_type = match e.try_get_attribute("t")? {
                    Some(attr) => attr.unescape_value()?.as_bytes().to_owned(),
                    None => b"n".to_vec(),
                };
                self.cell_style = match e.try_get_attribute("s")? {
                    Some(attr) => attr.unescape_value()?.parse::<u32>()?,
                    None => 0,
                };
                self.text.clear();
                if empty {
                    self.close_cell()?;
                }
            },
            b"v" if !empty => self.in_value = true,
            b"t" if !empty && self.cell.is_some() => self.in_inline = true,
            b"mergeCell" => {
                let attr = get_attr_val!(e, "ref", to_string);
                let mut dim = attr.split(':');
                let left_top = get_tuple_from_ord(dim.next().unwrap_or_default().as_bytes())?;
                let right_end = match dim.next() {
                    Some(x) => get_tuple_from_ord(x.as_bytes())?,
                    None => left_top,
                };
                self.grid.merge(left_top.0, left_top.1, right_end.0, right_end.1);
            },
            _ => (),
        }
        Ok(())
    }

    // b for boolean, d for date, e for error, inlineStr for an inline string,
    // n for number, s for shared string, str for a formula result
    fn close_cell(&mut self) -> Result<()> {
        let Some((row, col)) = self.cell.take() else {
            return Ok(());
        };
        let raw = std::mem::take(&mut self.text);
        let value = if raw.is_empty() && self.cell_type != b"inlineStr" {
            CellValue::Blank
        } else {
            match self.cell_type.as_slice() {
                b"s" => {
                    let idx = raw.trim().parse::<usize>()?;
                    CellValue::String(self.str_share.get(idx).ok_or(anyhow!("shared string {} out of range", idx))?.clone())
                },
                b"inlineStr" | b"str" | b"d" => CellValue::String(raw),
                b"b" => CellValue::Bool(raw.trim() == "1"),
                b"e" => CellValue::Error(raw),
                _ => {
                    let n = raw.trim().parse::<f64>()?;
                    let fmt = self.styles.format_class(self.cell_style);
                    if fmt == FMT_DATE {
                        CellValue::Date(n)
                    } else if fmt == FMT_DATETIME {
                        CellValue::Datetime(n)
                    } else if fmt == FMT_TIME {
                        CellValue::Time(n)
                    } else {
                        CellValue::Number(n)
                    }
                },
            }
        };
        if self.cell_style != 0 {
            self.grid.set_style(row, col, self.cell_style);
        }
        self.grid.set_value(row, col, value);
        Ok(())
    }
}

/// get another type of data from cell value
pub trait FromCellValue {
    fn try_from_cval(val: &CellValue) -> Result<Option<Self>>
        where Self: Sized;
}

impl FromCellValue for String {
    fn try_from_cval(val: &CellValue) -> Result<Option<Self>> {
        match val {
            CellValue::Number(n) => Ok(Some(n.to_string())),
            CellValue::Date(n) | CellValue::Datetime(n) => {
                Ok(Some(serial_to_date(*n)?.to_string()))
            },
            CellValue::Time(n) => {
                let secs = ((n - n.trunc()) * 86400.0).round() as u32;
                Ok(Some(NaiveTime::from_num_seconds_from_midnight_opt(secs % 86400, 0).ok_or(anyhow!("invalid time"))?.format("%H:%M:%S").to_string()))
            },
            CellValue::String(s) => Ok(Some(s.to_owned())),
            CellValue::Error(s) => Ok(Some(s.to_string())),
            CellValue::Bool(b) => Ok(Some(if *b {"true".to_string()} else {"false".to_string()})),
            CellValue::Blank => Ok(Some("".to_string())),
        }
    }
}

impl FromCellValue for NaiveDate {
    fn try_from_cval(val: &CellValue) -> Result<Option<Self>> {
        match val {
            CellValue::Number(n) | CellValue::Date(n) | CellValue::Datetime(n) => Ok(Some(serial_to_date(*n)?)),
            CellValue::String(s) => {
                let s = s.trim();
                match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    Ok(v) => Ok(Some(v)),
                    Err(_) => {
                        match NaiveDate::parse_from_str(s, "%Y/%m/%d") {
                            Ok(v) => Ok(Some(v)),
                            Err(_) => {
                                if NULL_STRING.contains(s) {
                                    Ok(None)
                                } else {
                                    Err(anyhow!("invalid date-{:?}", val))
                                }
                            }
                        }
                    }
                }
            },
            CellValue::Time(_) | CellValue::Error(_) | CellValue::Bool(_) => Err(anyhow!("invalid date-{:?}", val)),
            CellValue::Blank => Ok(None),
        }
    }
}

/// Excel 1900-system serial number to calendar date
pub fn serial_to_date(n: f64) -> Result<NaiveDate> {
    let days = Duration::try_days(n.trunc() as i64).ok_or(anyhow!("invalid date serial {}", n))?;
    BASE_DATE.checked_add_signed(days).ok_or(anyhow!("invalid date serial {}", n))
}

lazy_static! {
    static ref BASE_DATE: NaiveDate = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default();
    static ref NULL_STRING: HashSet<&'static str> = ["", "-", "--", "#N/A"].into_iter().collect();
}
