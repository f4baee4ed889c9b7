use std::{collections::HashMap, io::BufRead};

use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use quick_xml::{events::{BytesStart, Event}, reader::Reader};

use crate::grid::FontColor;

// datetime sign
pub(crate) static FMT_DATE: u8 = 0;
pub(crate) static FMT_TIME: u8 = 1;
pub(crate) static FMT_DATETIME: u8 = 2;
pub(crate) static FMT_DEFAULT: u8 = 255;

/// one entry of `cellXfs`, the index a cell's `s` attribute points at
#[derive(Debug, Clone, Copy, Default)]
pub struct CellXf {
    pub num_fmt_id: u32,
    pub font_id: u32,
}

/// the parts of `xl/styles.xml` the schedule needs: date formats and font colors
#[derive(Debug, Clone)]
pub struct StyleSheet {
    datetime_fmts: HashMap<u32, u8>,
    fonts: Vec<Option<FontColor>>,
    cell_xfs: Vec<CellXf>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        StyleSheet {
            datetime_fmts: DATETIME_FMTS.clone(),
            fonts: Vec::new(),
            cell_xfs: Vec::new(),
        }
    }
}

#[derive(PartialEq)]
enum Section {
    Other,
    NumFmts,
    Fonts,
    CellXfs,
}

impl StyleSheet {
    /// parse styles.xml
    pub fn from_reader<R: BufRead>(source: R) -> Result<StyleSheet> {
        let mut reader = Reader::from_reader(source);
        let mut styles = StyleSheet::default();
        let mut section = Section::Other;
        let mut in_font = false;
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    match e.name().as_ref() {
                        b"numFmts" => section = Section::NumFmts,
                        b"fonts" => section = Section::Fonts,
                        b"cellXfs" => section = Section::CellXfs,
                        b"font" if section == Section::Fonts => {
                            in_font = true;
                            styles.fonts.push(None);
                        },
                        _ => styles.process_tag(e, &section, in_font)?,
                    }
                },
                Ok(Event::Empty(ref e)) => {
                    if e.name().as_ref() == b"font" && section == Section::Fonts {
                        styles.fonts.push(None);
                    } else {
                        styles.process_tag(e, &section, in_font)?;
                    }
                },
                Ok(Event::End(ref e)) => {
                    match e.name().as_ref() {
                        b"font" => in_font = false,
                        b"numFmts" | b"fonts" => section = Section::Other,
                        b"cellXfs" => break,
                        _ => (),
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(anyhow!("styles.xml is broken: {:?}", e)),
                _ => (),
            }
            buf.clear();
        }
        Ok(styles)
    }

    fn process_tag(&mut self, e: &BytesStart<'_>, section: &Section, in_font: bool) -> Result<()> {
        match (section, e.name().as_ref()) {
            (Section::NumFmts, b"numFmt") => {
                let code = attr_string(e, "formatCode")?.unwrap_or_default();
                let id: u32 = attr_string(e, "numFmtId")?.ok_or(anyhow!("numFmt without numFmtId"))?.parse()?;
                if let Some(fmt) = classify_format_code(&code) {
                    self.datetime_fmts.insert(id, fmt);
                }
            },
            (Section::Fonts, b"color") if in_font => {
                if let Some(slot) = self.fonts.last_mut() {
                    *slot = font_color_from_tag(e)?;
                }
            },
            (Section::CellXfs, b"xf") => {
                let num_fmt_id = attr_string(e, "numFmtId")?.map(|v| v.parse()).transpose()?.unwrap_or(0);
                let font_id = attr_string(e, "fontId")?.map(|v| v.parse()).transpose()?.unwrap_or(0);
                self.cell_xfs.push(CellXf { num_fmt_id, font_id });
            },
            _ => (),
        }
        Ok(())
    }

    /// number format class (date, time, datetime or default) for a cell style index
    pub fn format_class(&self, xf: u32) -> u8 {
        self.cell_xfs
            .get(xf as usize)
            .and_then(|x| self.datetime_fmts.get(&x.num_fmt_id))
            .copied()
            .unwrap_or(FMT_DEFAULT)
    }

    /// font color for every cellXfs entry, in order; None where the font has no color
    pub fn xf_font_colors(&self) -> Vec<Option<FontColor>> {
        self.cell_xfs
            .iter()
            .map(|x| self.fonts.get(x.font_id as usize).cloned().flatten())
            .collect()
    }
}

fn attr_string(e: &BytesStart<'_>, tag: &str) -> Result<Option<String>> {
    match e.try_get_attribute(tag)? {
        Some(v) => Ok(Some(v.unescape_value()?.to_string())),
        None => Ok(None),
    }
}

fn font_color_from_tag(e: &BytesStart<'_>) -> Result<Option<FontColor>> {
    if let Some(rgb) = attr_string(e, "rgb")? {
        return Ok(Some(FontColor::Rgb(rgb)));
    }
    if let Some(indexed) = attr_string(e, "indexed")? {
        return Ok(Some(FontColor::Indexed(indexed.parse()?)));
    }
    if let Some(theme) = attr_string(e, "theme")? {
        return Ok(Some(FontColor::Theme(theme.parse()?)));
    }
    if attr_string(e, "auto")?.is_some() {
        return Ok(Some(FontColor::Auto));
    }
    Ok(None)
}

/// decide whether a custom number format renders dates, times or both
fn classify_format_code(code: &str) -> Option<u8> {
    // drop quoted literals and escapes so that "h" in a literal does not count
    let mut cleaned = String::with_capacity(code.len());
    let mut quoted = false;
    let mut chars = code.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => quoted = !quoted,
            '\\' => {
                chars.next();
            },
            _ if !quoted => cleaned.extend(c.to_lowercase()),
            _ => (),
        }
    }
    if cleaned.contains("yy") || cleaned.contains("dd") || cleaned.contains("mmm") {
        if cleaned.contains('h') || cleaned.contains("ss") {
            Some(FMT_DATETIME)
        } else {
            Some(FMT_DATE)
        }
    } else if cleaned.contains("ss") || cleaned.contains("h:mm") {
        Some(FMT_TIME)
    } else {
        None
    }
}

lazy_static! {
    static ref DATETIME_FMTS: HashMap<u32, u8> = {
        let mut v = HashMap::new();
        v.extend((14..18).map(|n| (n, FMT_DATE)));
        v.extend((27..32).map(|n| (n, FMT_DATE)));
        v.extend((34..37).map(|n| (n, FMT_DATE)));
        v.extend((50..59).map(|n| (n, FMT_DATE)));
        v.extend((18..22).map(|n| (n, FMT_TIME)));
        v.extend((32..34).map(|n| (n, FMT_TIME)));
        v.extend((45..48).map(|n| (n, FMT_TIME)));
        v.insert(22, FMT_DATETIME);
        v
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy\-mm\-dd"/></numFmts>
<fonts count="3">
<font><sz val="11"/><color theme="1"/><name val="Calibri"/></font>
<font><sz val="11"/><color rgb="FFFF0000"/><name val="Calibri"/></font>
<font><sz val="11"/><name val="Calibri"/></font>
</fonts>
<borders count="1"><border><left style="thin"><color indexed="10"/></left></border></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="4">
<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
<xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"><alignment wrapText="1"/></xf>
<xf numFmtId="164" fontId="2" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
<xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
</cellXfs>
</styleSheet>"#;

    #[test]
    fn fonts_and_formats_follow_cell_xfs() {
        let styles = StyleSheet::from_reader(STYLES.as_bytes()).unwrap();
        let colors = styles.xf_font_colors();
        assert_eq!(colors.len(), 4);
        assert_eq!(colors[0], Some(FontColor::Theme(1)));
        assert_eq!(colors[1], Some(FontColor::Rgb("FFFF0000".into())));
        assert_eq!(colors[2], None);
        assert_eq!(styles.format_class(2), FMT_DATE);
        assert_eq!(styles.format_class(3), FMT_DATE);
        assert_eq!(styles.format_class(1), FMT_DEFAULT);
        assert_eq!(styles.format_class(99), FMT_DEFAULT);
    }

    #[test]
    fn format_codes() {
        assert_eq!(classify_format_code("yyyy\\-mm\\-dd"), Some(FMT_DATE));
        assert_eq!(classify_format_code("dd/mm/yyyy hh:mm"), Some(FMT_DATETIME));
        assert_eq!(classify_format_code("hh:mm:ss"), Some(FMT_TIME));
        assert_eq!(classify_format_code("0.00\"h\""), None);
        assert_eq!(classify_format_code("#,##0.00"), None);
    }
}
