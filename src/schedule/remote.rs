use log::debug;

use crate::{grid::{FontColor, Workbook}, ColNum, RowNum};

/// legacy palette slots holding pure red (`FF0000`)
pub static RED_PALETTE_INDEXES: [u32; 2] = [2, 10];

/// Whether a font color is the red that marks remote sessions.
pub fn is_red(color: &FontColor) -> bool {
    match color {
        FontColor::Rgb(rgb) => {
            let hex = rgb.trim().trim_start_matches('#').to_ascii_uppercase();
            match hex.len() {
                6 => hex == "FF0000",
                // AARRGGBB, alpha is ignored
                8 => hex.ends_with("FF0000"),
                _ => false,
            }
        },
        FontColor::Indexed(idx) => RED_PALETTE_INDEXES.contains(idx),
        FontColor::Theme(_) | FontColor::Auto => false,
    }
}

/// A session is remote exactly when its cell font is red. Unreadable colors count as in person.
pub fn is_remote<W: Workbook + ?Sized>(book: &W, row: RowNum, col: ColNum) -> bool {
    match book.font_color(row, col) {
        Ok(Some(color)) => is_red(&color),
        Ok(None) => false,
        Err(e) => {
            debug!("cannot read font color at ({row}, {col}): {e:#}");
            false
        },
    }
}
