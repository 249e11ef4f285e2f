// Load Module / Save Module. A list of the song files in the song
// directory, a file name entry, and a button. Up/Down walk the list and copy
// the highlighted name into the entry; Enter or the button commits.

use std::path::Path;

use crate::pipeline::persistence::index_songs_in_dir;
use crate::shared::{HelpIndex, KeyEvent, KeySym, PageId};
use crate::tui::grid::{BoxStyle, CellGrid};

use crate::ui::app::App;
use crate::ui::page::{PageHooks, PageSlot, PageState};
use crate::ui::prompts;
use crate::ui::widget::{Nav, Widget};

const LIST_TOP: u16 = 14;
const VISIBLE: usize = 26;
const NAME_LEN: usize = 60;
const ENTRY_WIDTH: u16 = 50;

struct FilePage {
    id: PageId,
    files: Vec<String>,
    cursor: Option<usize>,
}

impl FilePage {
    fn rescan(&mut self, app: &App) {
        let dir = app.song_dir.as_deref().unwrap_or(Path::new("."));
        self.files = match index_songs_in_dir(dir) {
            Ok(paths) => paths
                .iter()
                .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect(),
            Err(e) => {
                log::warn!("{e:#}");
                Vec::new()
            }
        };
        self.cursor = None;
    }

    fn commit(&mut self, app: &mut App) {
        let name = app.pages.state(self.id).widgets[0].text().trim().to_string();
        if name.is_empty() {
            app.status_text_flash("No file name given");
            return;
        }
        let path = app.song_path(&name);
        if self.id == PageId::LoadModule {
            prompts::song_load(app, &path);
        } else {
            let saved = prompts::save_to(app, &path);
            app.set_page(if saved { PageId::Blank } else { PageId::Log });
        }
    }
}

impl PageHooks for FilePage {
    fn draw_const(&mut self, _app: &App, grid: &mut CellGrid) {
        grid.draw_box(3, LIST_TOP - 1, 76, LIST_TOP + VISIBLE as u16, BoxStyle::ThickInset);
        grid.draw_text("Filename", 3, 43, 0, 2);
        grid.draw_box(12, 42, 13 + ENTRY_WIDTH, 44, BoxStyle::ThinInset);
    }

    fn predraw(&mut self, _app: &App, grid: &mut CellGrid) {
        let first = self.cursor.map_or(0, |c| c.saturating_sub(VISIBLE - 1));
        for (line, name) in self.files.iter().enumerate().skip(first).take(VISIBLE) {
            let y = LIST_TOP + (line - first) as u16;
            let bg = if Some(line) == self.cursor { 14 } else { 0 };
            grid.draw_text_len(name, 72, 4, y, 6, bg);
        }
        if self.files.is_empty() {
            grid.draw_text("No song files", 4, LIST_TOP, 1, 0);
        }
    }

    fn set_page(&mut self, app: &mut App) {
        self.rescan(app);
        if self.id == PageId::SaveModule {
            let name = app.song.basename();
            if !name.is_empty() {
                app.pages.state_mut(self.id).widgets[0].set_text(&name);
            }
        }
    }

    fn pre_handle_key(&mut self, app: &mut App, k: &KeyEvent) -> bool {
        if !app.status.dialog_type.is_none() || !k.no_modifier() || self.files.is_empty() {
            return false;
        }
        let last = self.files.len() - 1;
        let next = match (k.sym, self.cursor) {
            (KeySym::Up, Some(c)) => c.saturating_sub(1),
            (KeySym::Down, Some(c)) => (c + 1).min(last),
            (KeySym::Up | KeySym::Down, None) => 0,
            _ => return false,
        };
        if k.pressed() {
            self.cursor = Some(next);
            let name = self.files[next].clone();
            app.pages.state_mut(self.id).widgets[0].set_text(&name);
            app.status.need_update();
        }
        true
    }

    fn widget_changed(&mut self, app: &mut App, _index: usize, activated: bool) {
        if activated {
            self.commit(app);
        }
    }
}

pub fn register(id: PageId) -> PageSlot {
    let (title, button) = match id {
        PageId::SaveModule => ("Save Module (F10)", "Save"),
        _ => ("Load Module (F9)", "Load"),
    };
    let widgets = vec![
        Widget::text_entry("", NAME_LEN, 13, 43, ENTRY_WIDTH, Nav::new(0, 1, 0, 0, 1)),
        Widget::button(button, 67, 43, 8, Nav::new(0, 1, 0, 1, 0)),
    ];
    let state = PageState::new(title, HelpIndex::Global).with_widgets(widgets, 0);
    PageSlot::new(state, FilePage { id, files: Vec::new(), cursor: None })
}
