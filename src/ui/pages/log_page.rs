// Message log: every line App::log collected, newest at the bottom.

use crate::shared::{HelpIndex, KeyEvent, KeySym};
use crate::tui::grid::{BoxStyle, CellGrid};

use crate::ui::app::App;
use crate::ui::page::{PageHooks, PageSlot, PageState};

const VISIBLE: usize = 35;

// lines scrolled up from the bottom; 0 follows new output
#[derive(Default)]
struct Log {
    back: usize,
}

impl Log {
    fn first_line(&self, total: usize) -> usize {
        total.saturating_sub(VISIBLE + self.back)
    }
}

impl PageHooks for Log {
    fn draw_const(&mut self, _app: &App, grid: &mut CellGrid) {
        grid.draw_box(1, 12, 78, 48, BoxStyle::ThickInset);
        grid.draw_fill_chars(2, 13, 77, 47, 0);
    }

    fn predraw(&mut self, app: &App, grid: &mut CellGrid) {
        let first = self.first_line(app.log_lines.len());
        for (i, line) in app.log_lines.iter().skip(first).take(VISIBLE).enumerate() {
            grid.draw_text_len(line, 74, 3, 13 + i as u16, 5, 0);
        }
    }

    fn set_page(&mut self, _app: &mut App) {
        self.back = 0;
    }

    fn pre_handle_key(&mut self, app: &mut App, k: &KeyEvent) -> bool {
        super::escape_to_previous(app, k)
    }

    fn handle_key(&mut self, app: &mut App, k: &KeyEvent) -> bool {
        if !k.no_modifier() {
            return false;
        }
        let most = app.log_lines.len().saturating_sub(VISIBLE);
        let back = match k.sym {
            KeySym::Up => self.back + 1,
            KeySym::Down => self.back.saturating_sub(1),
            KeySym::PageUp => self.back + VISIBLE,
            KeySym::PageDown => self.back.saturating_sub(VISIBLE),
            KeySym::Home => most,
            KeySym::End => 0,
            _ => return false,
        };
        if k.pressed() {
            self.back = back.min(most);
            app.status.need_update();
        }
        true
    }
}

pub fn register() -> PageSlot {
    PageSlot::new(PageState::new("Message Log Viewer", HelpIndex::Global), Log::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolling_back_is_bounded_by_the_log_length() {
        let mut log = Log::default();
        assert_eq!(log.first_line(10), 0);
        log.back = 5;
        assert_eq!(log.first_line(100), 100 - VISIBLE - 5);
        assert_eq!(log.first_line(20), 0);
    }
}
