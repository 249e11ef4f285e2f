// Song message. Typing appends to the message, Backspace takes the last
// character back, Enter starts a new line; the arrows scroll.

use crate::shared::{HelpIndex, KeyEvent, KeySym};
use crate::status::StatusFlags;
use crate::tui::grid::{BoxStyle, CellGrid};

use crate::ui::app::App;
use crate::ui::page::{PageHooks, PageSlot, PageState};

const TOP: u16 = 13;
const VISIBLE: usize = 35;
const WIDTH: usize = 74;
const MAX_LEN: usize = 8000;

#[derive(Default)]
struct Message {
    top: usize,
}

impl Message {
    // keeps the end of the message, where typing happens, on screen
    fn follow_end(&mut self, app: &App) {
        let lines = app.song.message.lines().count().max(1);
        self.top = lines.saturating_sub(VISIBLE);
    }
}

impl PageHooks for Message {
    fn draw_const(&mut self, _app: &App, grid: &mut CellGrid) {
        grid.draw_box(1, TOP - 1, 78, TOP + VISIBLE as u16, BoxStyle::ThickInset);
    }

    fn predraw(&mut self, app: &App, grid: &mut CellGrid) {
        for (line, text) in app.song.message.split('\n').skip(self.top).take(VISIBLE).enumerate() {
            grid.draw_text_len(text, WIDTH, 3, TOP + line as u16, 6, 0);
        }
    }

    fn set_page(&mut self, app: &mut App) {
        self.follow_end(app);
    }

    fn song_changed(&mut self, _app: &mut App) {
        self.top = 0;
    }

    fn handle_key(&mut self, app: &mut App, k: &KeyEvent) -> bool {
        if k.ctrl() || k.alt() {
            return false;
        }
        let lines = app.song.message.split('\n').count();
        let edit = match k.sym {
            KeySym::Up => {
                if k.pressed() {
                    self.top = self.top.saturating_sub(1);
                }
                false
            }
            KeySym::Down => {
                if k.pressed() {
                    self.top = (self.top + 1).min(lines.saturating_sub(1));
                }
                false
            }
            KeySym::Backspace => {
                if k.pressed() {
                    app.song.message.pop();
                }
                true
            }
            KeySym::Enter => {
                if k.pressed() && app.song.message.len() < MAX_LEN {
                    app.song.message.push('\n');
                }
                true
            }
            _ => match k.unicode {
                Some(c) if !c.is_control() => {
                    if k.pressed() && app.song.message.len() < MAX_LEN {
                        app.song.message.push(c);
                    }
                    true
                }
                _ => return false,
            },
        };
        if k.pressed() {
            if edit {
                app.status.flags.insert(StatusFlags::SONG_NEEDS_SAVE);
                self.follow_end(app);
            }
            app.status.need_update();
        }
        true
    }
}

pub fn register() -> PageSlot {
    PageSlot::new(PageState::new("Message Editor (Shift-F9)", HelpIndex::Message), Message::default())
}
