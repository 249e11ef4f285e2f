// Font editor. It owns the whole screen: a 16x16 table of the character
// set with a cursor, and a larger view of the selected glyph's code.

use crate::shared::{HelpIndex, KeyEvent, KeySym, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::tui::grid::{BoxStyle, CellGrid};

use crate::ui::app::{App, VideoMode};
use crate::ui::charset::cp437_to_char;
use crate::ui::page::{PageHooks, PageSlot, PageState};

const TABLE_X: u16 = 20;
const TABLE_Y: u16 = 12;

#[derive(Default)]
struct FontEdit {
    selected: u8,
}

impl PageHooks for FontEdit {
    fn claims_full_draw(&self) -> bool {
        true
    }

    fn draw_full(&mut self, _app: &App, grid: &mut CellGrid) {
        grid.draw_fill_chars(0, 0, SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1, 0);
        grid.draw_text("Font Editor", 34, 2, 3, 0);
        grid.draw_box(TABLE_X - 1, TABLE_Y - 1, TABLE_X + 32, TABLE_Y + 16, BoxStyle::ThinInset);

        for code in 0..=255u8 {
            let x = TABLE_X + (code % 16) as u16 * 2;
            let y = TABLE_Y + (code / 16) as u16;
            let bg = if code == self.selected { 3 } else { 0 };
            grid.draw_char(cp437_to_char(code), x, y, 5, bg);
        }

        let glyph = cp437_to_char(self.selected);
        grid.draw_text(&format!("Character {:3} (0x{:02X})  {glyph}", self.selected, self.selected), TABLE_X, TABLE_Y + 18, 5, 0);
        grid.draw_text("Arrows select, Escape returns", TABLE_X, TABLE_Y + 20, 1, 0);
    }

    fn set_page(&mut self, app: &mut App) {
        app.video_mode = VideoMode::Mono;
    }

    fn pre_handle_key(&mut self, app: &mut App, k: &KeyEvent) -> bool {
        super::escape_to_previous(app, k)
    }

    fn handle_key(&mut self, app: &mut App, k: &KeyEvent) -> bool {
        if !k.no_modifier() {
            return false;
        }
        let step: i16 = match k.sym {
            KeySym::Left => -1,
            KeySym::Right => 1,
            KeySym::Up => -16,
            KeySym::Down => 16,
            _ => return false,
        };
        if k.pressed() {
            self.selected = (self.selected as i16 + step).rem_euclid(256) as u8;
            app.status.need_update();
        }
        true
    }
}

pub fn register() -> PageSlot {
    PageSlot::new(PageState::new("Font Editor (Shift-F12)", HelpIndex::Global), FontEdit::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Playback;
    use crate::pipeline::song::Song;
    use crate::shared::PageId;
    use crate::ui::dispatch::handle_key;

    #[test]
    fn entering_switches_to_mono_and_leaving_restores() {
        let mut app = App::new(Song::default(), Playback::new(1000));
        app.set_page(PageId::Info);
        app.set_page(PageId::FontEdit);
        assert_eq!(app.video_mode, VideoMode::Mono);

        handle_key(&mut app, &KeyEvent::press(KeySym::Escape));
        assert_eq!(app.status.current_page, PageId::Info);
        assert_eq!(app.video_mode, VideoMode::Default);
    }
}
