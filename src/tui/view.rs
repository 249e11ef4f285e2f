use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::tui::grid::CellGrid;

// the tracker's default 16-color palette
const PALETTE: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (124, 88, 68),
    (180, 148, 120),
    (232, 232, 200),
    (176, 0, 84),
    (252, 252, 84),
    (68, 152, 72),
    (76, 12, 24),
    (32, 84, 0),
    (24, 116, 44),
    (56, 156, 116),
    (220, 232, 224),
    (108, 196, 208),
    (80, 28, 0),
    (120, 60, 40),
    (200, 216, 200),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Look {
    pub inverted: bool,
    pub mono: bool, // glyphs only, white on black
}

pub fn color(index: u8, look: Look) -> Color {
    let (r, g, b) = PALETTE[(index & 15) as usize];
    if look.inverted {
        Color::Rgb(255 - r, 255 - g, 255 - b)
    } else {
        Color::Rgb(r, g, b)
    }
}

pub fn render(frame: &mut Frame, area: Rect, grid: &CellGrid, look: Look) {
    render_into(frame.buffer_mut(), area, grid, look);
}

// copies the grid into the buffer at the area's corner, clipped to the area
pub fn render_into(buf: &mut Buffer, area: Rect, grid: &CellGrid, look: Look) {
    let area = area.intersection(buf.area);
    let (w, h) = (grid.width().min(area.width), grid.height().min(area.height));
    for y in 0..h {
        for x in 0..w {
            let Some(src) = grid.cell(x, y) else {
                continue;
            };
            let Some(dst) = buf.cell_mut((area.x + x, area.y + y)) else {
                continue;
            };
            dst.set_char(src.ch);
            if look.mono {
                dst.set_fg(Color::White).set_bg(Color::Black);
            } else {
                dst.set_fg(color(src.fg, look)).set_bg(color(src.bg, look));
            }
        }
    }
}
