// The 80x50 character-cell screen every page draws into. Colors are
// palette indices (0-15), resolved to real colors only in view.rs.
// Anything drawn outside the grid is clipped.

use crate::shared::{SCREEN_HEIGHT, SCREEN_WIDTH};

const COLS: usize = SCREEN_WIDTH as usize;
const ROWS: usize = SCREEN_HEIGHT as usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: u8,
    pub bg: u8,
}

impl Default for Cell {
    fn default() -> Self {
        Self { ch: ' ', fg: 0, bg: 2 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxStyle {
    ThinInset,
    ThinOutset,
    ThickInset,
    ThickOutset,
}

#[derive(Clone, Debug)]
pub struct CellGrid {
    cells: Vec<Cell>,
}

impl Default for CellGrid {
    fn default() -> Self {
        Self { cells: vec![Cell::default(); COLS * ROWS] }
    }
}

impl CellGrid {
    pub fn width(&self) -> u16 {
        SCREEN_WIDTH
    }

    pub fn height(&self) -> u16 {
        SCREEN_HEIGHT
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        if (x as usize) < COLS && (y as usize) < ROWS {
            self.cells.get(y as usize * COLS + x as usize)
        } else {
            None
        }
    }

    // the row as plain text, handy for tests
    pub fn row_text(&self, y: u16) -> String {
        (0..SCREEN_WIDTH).filter_map(|x| self.cell(x, y)).map(|c| c.ch).collect()
    }

    pub fn draw_char(&mut self, ch: char, x: u16, y: u16, fg: u8, bg: u8) {
        if (x as usize) < COLS && (y as usize) < ROWS {
            self.cells[y as usize * COLS + x as usize] = Cell { ch, fg, bg };
        }
    }

    pub fn draw_text(&mut self, text: &str, x: u16, y: u16, fg: u8, bg: u8) {
        for (i, ch) in text.chars().enumerate() {
            self.draw_char(ch, x.saturating_add(i as u16), y, fg, bg);
        }
    }

    // exactly `len` cells: truncated or padded with blanks
    pub fn draw_text_len(&mut self, text: &str, len: usize, x: u16, y: u16, fg: u8, bg: u8) {
        let mut chars = text.chars();
        for i in 0..len {
            let ch = chars.next().unwrap_or(' ');
            self.draw_char(ch, x.saturating_add(i as u16), y, fg, bg);
        }
    }

    pub fn draw_fill_chars(&mut self, x1: u16, y1: u16, x2: u16, y2: u16, bg: u8) {
        for y in y1..=y2 {
            for x in x1..=x2 {
                self.draw_char(' ', x, y, 0, bg);
            }
        }
    }

    pub fn draw_box(&mut self, x1: u16, y1: u16, x2: u16, y2: u16, style: BoxStyle) {
        let (light, dark) = (3, 1);
        let (tl, br) = match style {
            BoxStyle::ThinInset | BoxStyle::ThickInset => (dark, light),
            BoxStyle::ThinOutset | BoxStyle::ThickOutset => (light, dark),
        };
        let [h, v, c_tl, c_tr, c_bl, c_br] = match style {
            BoxStyle::ThinInset | BoxStyle::ThinOutset => ['─', '│', '┌', '┐', '└', '┘'],
            BoxStyle::ThickInset | BoxStyle::ThickOutset => ['═', '║', '╔', '╗', '╚', '╝'],
        };
        for x in x1 + 1..x2 {
            self.draw_char(h, x, y1, tl, 2);
            self.draw_char(h, x, y2, br, 2);
        }
        for y in y1 + 1..y2 {
            self.draw_char(v, x1, y, tl, 2);
            self.draw_char(v, x2, y, br, 2);
        }
        self.draw_char(c_tl, x1, y1, tl, 2);
        self.draw_char(c_tr, x2, y1, br, 2);
        self.draw_char(c_bl, x1, y2, tl, 2);
        self.draw_char(c_br, x2, y2, br, 2);
    }

    // level 0..=63 across `width` cells
    pub fn draw_vu_meter(&mut self, x: u16, y: u16, width: u16, level: u8, fg: u8, peak_fg: u8) {
        let lit = (level as u32 * width as u32 / 63) as u16;
        for i in 0..width {
            let (ch, color) = if i < lit {
                ('▌', if i + 3 >= width { peak_fg } else { fg })
            } else {
                ('·', 1)
            };
            self.draw_char(ch, x + i, y, color, 0);
        }
    }

    // interleaved 16-bit samples squeezed into a w x h box of block glyphs
    pub fn draw_sample_data(&mut self, x: u16, y: u16, w: u16, h: u16, data: &[i16], channels: usize) {
        const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
        let channels = channels.max(1);
        let frames = data.len() / channels;
        for col in 0..w {
            for row in 0..h {
                self.draw_char(' ', x + col, y + row, 0, 0);
            }
            if frames == 0 {
                continue;
            }
            let start = frames * col as usize / w as usize;
            let end = (frames * (col as usize + 1) / w as usize).max(start + 1).min(frames);
            let peak = data[start * channels..end * channels]
                .iter()
                .map(|s| (*s as i32).unsigned_abs())
                .max()
                .unwrap_or(0);
            // 0..=h*8 eighths of a cell, growing up from the bottom row
            let eighths = (peak as u64 * (h as u64 * 8) / i16::MAX as u64) as u16;
            for row in 0..h {
                let filled = eighths.saturating_sub((h - 1 - row) * 8).min(8);
                if filled > 0 {
                    self.draw_char(LEVELS[filled as usize - 1], x + col, y + row, 5, 0);
                }
            }
        }
    }

    pub fn draw_thumb_bar(&mut self, x: u16, y: u16, width: u16, min: i32, max: i32, value: i32, selected: bool) {
        let span = (max - min).max(1) as i64;
        let pos = ((value - min).clamp(0, max - min) as i64 * (width.saturating_sub(1)) as i64 / span) as u16;
        for i in 0..width {
            self.draw_char('─', x + i, y, 1, 0);
        }
        self.draw_char('█', x + pos, y, if selected { 3 } else { 2 }, 0);
        let label = format!("{value:3}");
        self.draw_text(&label, x + width + 1, y, 1, 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_clipped_at_the_edge() {
        let mut grid = CellGrid::default();
        grid.draw_text("abcdef", 77, 0, 0, 2);
        assert_eq!(grid.cell(79, 0).map(|c| c.ch), Some('c'));
        assert!(grid.cell(80, 0).is_none());
    }

    #[test]
    fn text_len_pads_and_truncates() {
        let mut grid = CellGrid::default();
        grid.draw_text_len("abcdef", 3, 0, 1, 0, 2);
        grid.draw_text_len("x", 3, 10, 1, 0, 2);
        assert_eq!(&grid.row_text(1)[..13], "abc       x  ");
    }

    #[test]
    fn full_vu_meter_lights_every_cell() {
        let mut grid = CellGrid::default();
        grid.draw_vu_meter(0, 0, 15, 63, 5, 4);
        assert!(grid.row_text(0).starts_with(&"▌".repeat(15)));
    }

    #[test]
    fn silent_scope_draws_nothing() {
        let mut grid = CellGrid::default();
        grid.draw_sample_data(0, 0, 15, 2, &[0; 64], 2);
        assert_eq!(grid.row_text(1).trim(), "");
    }
}
