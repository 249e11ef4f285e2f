// The four instrument list subpages. They share one list and name entry
// layout; F4 steps through them, and entering one makes it the subpage the
// global F4 comes back to.

use crate::shared::{HelpIndex, KeyEvent, KeySym, NUM_INSTRUMENTS, PageId};
use crate::status::StatusFlags;
use crate::tui::grid::{BoxStyle, CellGrid};

use crate::ui::app::App;
use crate::ui::page::{PageHooks, PageSlot, PageState};
use crate::ui::widget::{Nav, Widget};

use super::sample_list::{list_first, list_key};

const LIST_TOP: u16 = 14;
const VISIBLE: usize = 34;
const NAME_LEN: usize = 25;

fn next_subpage(id: PageId) -> PageId {
    match id {
        PageId::InstrumentListGeneral => PageId::InstrumentListVolume,
        PageId::InstrumentListVolume => PageId::InstrumentListPanning,
        PageId::InstrumentListPanning => PageId::InstrumentListPitch,
        _ => PageId::InstrumentListGeneral,
    }
}

fn title(id: PageId) -> &'static str {
    match id {
        PageId::InstrumentListVolume => "Instrument List (Volume)",
        PageId::InstrumentListPanning => "Instrument List (Panning)",
        PageId::InstrumentListPitch => "Instrument List (Pitch)",
        _ => "Instrument List (General)",
    }
}

struct InstrumentList {
    id: PageId,
}

impl InstrumentList {
    fn refresh_name(&self, app: &mut App) {
        let name = app.song.instrument_name(app.current_instrument).to_string();
        if let Some(w) = app.pages.state_mut(self.id).widgets.first_mut() {
            w.set_text(&name);
        }
    }
}

impl PageHooks for InstrumentList {
    fn draw_const(&mut self, _app: &App, grid: &mut CellGrid) {
        grid.draw_box(4, LIST_TOP - 1, 35, LIST_TOP + VISIBLE as u16, BoxStyle::ThickInset);
        grid.draw_text("Name", 38, 14, 0, 2);
        grid.draw_box(43, 13, 70, 15, BoxStyle::ThinInset);
        grid.draw_text("Sample", 36, 17, 0, 2);
    }

    fn predraw(&mut self, app: &App, grid: &mut CellGrid) {
        let first = list_first(app.current_instrument, VISIBLE, NUM_INSTRUMENTS);
        for (line, n) in (first..=NUM_INSTRUMENTS).take(VISIBLE).enumerate() {
            let y = LIST_TOP + line as u16;
            let bg = if n == app.current_instrument { 14 } else { 0 };
            grid.draw_text(&format!("{n:02}"), 2, y, 0, 2);
            grid.draw_text_len(app.song.instrument_name(n), NAME_LEN, 5, y, 6, bg);
        }
        let sample = app.song.instruments.get(app.current_instrument).map_or(0, |i| i.sample);
        let label = if sample == 0 { "..".to_string() } else { format!("{sample:02}") };
        grid.draw_text(&label, 44, 17, 5, 0);
    }

    fn set_page(&mut self, app: &mut App) {
        app.last_instrument_page = self.id;
        self.refresh_name(app);
    }

    fn pre_handle_key(&mut self, app: &mut App, k: &KeyEvent) -> bool {
        if !app.status.dialog_type.is_none() {
            return false;
        }
        let Some(next) = list_key(k, app.current_instrument, NUM_INSTRUMENTS) else {
            return false;
        };
        if k.pressed() {
            app.set_current_instrument(next);
            self.refresh_name(app);
        }
        true
    }

    fn handle_key(&mut self, app: &mut App, k: &KeyEvent) -> bool {
        if k.sym != KeySym::F(4) || !k.no_modifier() {
            return false;
        }
        if k.pressed() {
            app.set_page(next_subpage(self.id));
        }
        true
    }

    fn song_changed(&mut self, app: &mut App) {
        self.refresh_name(app);
    }

    fn widget_changed(&mut self, app: &mut App, index: usize, _activated: bool) {
        if index != 0 {
            return;
        }
        let name = app.pages.state(self.id).widgets[0].text().to_string();
        if let Some(slot) = app.song.instruments.get_mut(app.current_instrument) {
            slot.name = name;
            app.status.flags.insert(StatusFlags::SONG_NEEDS_SAVE);
        }
    }
}

pub fn register(id: PageId) -> PageSlot {
    let widgets = vec![Widget::text_entry("", NAME_LEN, 44, 14, NAME_LEN as u16, Nav::stay(0))];
    let state = PageState::new(title(id), HelpIndex::InstrumentList).with_widgets(widgets, 0);
    PageSlot::new(state, InstrumentList { id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Playback;
    use crate::pipeline::song::Song;
    use crate::ui::dispatch::{Handled, handle_key};

    fn app() -> App {
        App::new(Song::default(), Playback::new(1000))
    }

    #[test]
    fn f4_cycles_the_subpages_and_wraps() {
        let mut app = app();
        app.set_page(PageId::InstrumentListGeneral);
        let mut seen = Vec::new();
        for _ in 0..4 {
            assert_eq!(handle_key(&mut app, &KeyEvent::press(KeySym::F(4))), Handled::Page);
            handle_key(&mut app, &KeyEvent::release(KeySym::F(4)));
            seen.push(app.status.current_page);
        }
        assert_eq!(
            seen,
            [
                PageId::InstrumentListVolume,
                PageId::InstrumentListPanning,
                PageId::InstrumentListPitch,
                PageId::InstrumentListGeneral
            ]
        );
    }

    #[test]
    fn global_f4_returns_to_the_last_subpage() {
        let mut app = app();
        app.set_page(PageId::InstrumentListPanning);
        app.set_page(PageId::Info);
        assert_eq!(handle_key(&mut app, &KeyEvent::press(KeySym::F(4))), Handled::Global);
        assert_eq!(app.status.current_page, PageId::InstrumentListPanning);
    }

    #[test]
    fn arrows_change_the_current_instrument() {
        let mut app = app();
        app.song.instruments[2].name = "pad".into();
        app.set_page(PageId::InstrumentListGeneral);
        assert_eq!(app.current_instrument, 1);
        handle_key(&mut app, &KeyEvent::press(KeySym::Down));
        assert_eq!(app.current_instrument, 2);
        assert!(app.status.flags.contains(StatusFlags::INSTRUMENT_CHANGED));
        assert_eq!(app.focused_widget().map(|w| w.text()), Some("pad"));
    }
}
