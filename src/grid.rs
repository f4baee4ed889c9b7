use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::{CellValue, ColNum, MergedRange, RowNum};

static BLANK: CellValue = CellValue::Blank;

/// Font color attribute as stored by the workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontColor {
    /// hex string, `RRGGBB` or `AARRGGBB`
    Rgb(String),
    /// legacy palette index
    Indexed(u32),
    /// theme color slot
    Theme(u32),
    /// system automatic color
    Auto,
}

/// What the schedule engine needs from a workbook. Rows and columns start from 1.
pub trait Workbook {
    /// last used row
    fn max_row(&self) -> RowNum;
    /// last used column
    fn max_column(&self) -> ColNum;
    /// cell value, `CellValue::Blank` for cells that do not exist
    fn cell_value(&self, row: RowNum, col: ColNum) -> &CellValue;
    /// every merged range declared by the sheet
    fn merged_ranges(&self) -> &[MergedRange];
    /// font color of a cell, `Ok(None)` when the cell carries no color
    fn font_color(&self, row: RowNum, col: ColNum) -> Result<Option<FontColor>>;
}

/// A worksheet held fully in memory.
///
/// The xlsx reader produces one per sheet; tests build them by hand.
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    name: String,
    cells: HashMap<(RowNum, ColNum), CellValue>,
    cell_styles: HashMap<(RowNum, ColNum), u32>,
    xf_colors: Vec<Option<FontColor>>,
    merged_rects: Vec<MergedRange>,
    max_size: (RowNum, ColNum),
}

impl SheetGrid {
    pub fn new<S: Into<String>>(name: S) -> Self {
        SheetGrid {
            name: name.into(),
            // style 0 is the workbook default and has no color
            xf_colors: vec![None],
            ..Default::default()
        }
    }

    /// grid backed by the font colors of a workbook's `cellXfs` table
    pub(crate) fn with_xf_colors<S: Into<String>>(name: S, xf_colors: Vec<Option<FontColor>>) -> Self {
        SheetGrid {
            name: name.into(),
            xf_colors,
            ..Default::default()
        }
    }

    /// get sheet name
    pub fn sheet_name(&self) -> &str {
        &self.name
    }

    /// number of non-blank cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn grow(&mut self, row: RowNum, col: ColNum) {
        self.max_size.0 = self.max_size.0.max(row);
        self.max_size.1 = self.max_size.1.max(col);
    }

    /// widen the sheet extent, e.g. from a `<dimension>` tag
    pub fn extend_to(&mut self, row: RowNum, col: ColNum) {
        self.grow(row, col);
    }

    pub fn set_value<V: Into<CellValue>>(&mut self, row: RowNum, col: ColNum, value: V) -> &mut Self {
        let value = value.into();
        self.grow(row, col);
        if matches!(value, CellValue::Blank) {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
        self
    }

    /// assign a `cellXfs` style index to a cell
    pub fn set_style(&mut self, row: RowNum, col: ColNum, xf: u32) -> &mut Self {
        self.grow(row, col);
        self.cell_styles.insert((row, col), xf);
        self
    }

    /// give a cell its own font color, registering a fresh style for it
    pub fn set_font_color(&mut self, row: RowNum, col: ColNum, color: FontColor) -> &mut Self {
        self.xf_colors.push(Some(color));
        let xf = (self.xf_colors.len() - 1) as u32;
        self.set_style(row, col, xf)
    }

    /// declare a merged range, coordinates included
    pub fn merge(&mut self, top: RowNum, left: ColNum, bottom: RowNum, right: ColNum) -> &mut Self {
        self.grow(bottom, right);
        self.merged_rects.push(((top, left), (bottom, right)));
        self
    }
}

impl Workbook for SheetGrid {
    fn max_row(&self) -> RowNum {
        self.max_size.0
    }

    fn max_column(&self) -> ColNum {
        self.max_size.1
    }

    fn cell_value(&self, row: RowNum, col: ColNum) -> &CellValue {
        self.cells.get(&(row, col)).unwrap_or(&BLANK)
    }

    fn merged_ranges(&self) -> &[MergedRange] {
        &self.merged_rects
    }

    fn font_color(&self, row: RowNum, col: ColNum) -> Result<Option<FontColor>> {
        match self.cell_styles.get(&(row, col)) {
            None => Ok(None),
            Some(xf) => self
                .xf_colors
                .get(*xf as usize)
                .cloned()
                .ok_or(anyhow!("cell ({row}, {col}) refers to missing style {xf}")),
        }
    }
}
