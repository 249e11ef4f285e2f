// Sample list: the 99 slots with the current one highlighted, and a name
// entry for the current slot.

use crate::shared::{HelpIndex, KeyEvent, KeySym, NUM_SAMPLES, PageId};
use crate::status::StatusFlags;
use crate::tui::grid::{BoxStyle, CellGrid};

use crate::ui::app::App;
use crate::ui::page::{PageHooks, PageSlot, PageState};
use crate::ui::widget::{Nav, Widget};

const LIST_TOP: u16 = 14;
const VISIBLE: usize = 34;
const NAME_LEN: usize = 25;

// first slot shown so `current` is on screen
pub(super) fn list_first(current: usize, visible: usize, count: usize) -> usize {
    let current = current.max(1);
    let first = current.saturating_sub(visible / 2).max(1);
    first.min((count + 1).saturating_sub(visible)).max(1)
}

// Up/Down/PgUp/PgDn over a 1-based slot list; claims the key before the
// name entry's own nav links see it
pub(super) fn list_key(k: &KeyEvent, current: usize, count: usize) -> Option<i32> {
    if !k.no_modifier() {
        return None;
    }
    let current = current as i32;
    let next = match k.sym {
        KeySym::Up => current - 1,
        KeySym::Down => current + 1,
        KeySym::PageUp => current - 16,
        KeySym::PageDown => current + 16,
        _ => return None,
    };
    Some(next.clamp(1, count as i32))
}

fn refresh_name(app: &mut App) {
    let name = app.song.sample_name(app.current_sample).to_string();
    if let Some(w) = app.pages.state_mut(PageId::SampleList).widgets.first_mut() {
        w.set_text(&name);
    }
}

struct SampleList;

impl PageHooks for SampleList {
    fn draw_const(&mut self, _app: &App, grid: &mut CellGrid) {
        grid.draw_box(4, LIST_TOP - 1, 35, LIST_TOP + VISIBLE as u16, BoxStyle::ThickInset);
        grid.draw_text("Name", 38, 14, 0, 2);
        grid.draw_box(43, 13, 70, 15, BoxStyle::ThinInset);
    }

    fn predraw(&mut self, app: &App, grid: &mut CellGrid) {
        let first = list_first(app.current_sample, VISIBLE, NUM_SAMPLES);
        for (line, n) in (first..=NUM_SAMPLES).take(VISIBLE).enumerate() {
            let y = LIST_TOP + line as u16;
            let bg = if n == app.current_sample { 14 } else { 0 };
            grid.draw_text(&format!("{n:02}"), 2, y, 0, 2);
            grid.draw_text_len(app.song.sample_name(n), NAME_LEN, 5, y, 6, bg);
        }
    }

    fn set_page(&mut self, app: &mut App) {
        refresh_name(app);
    }

    fn pre_handle_key(&mut self, app: &mut App, k: &KeyEvent) -> bool {
        if !app.status.dialog_type.is_none() {
            return false;
        }
        let Some(next) = list_key(k, app.current_sample, NUM_SAMPLES) else {
            return false;
        };
        if k.pressed() {
            app.set_current_sample(next);
            refresh_name(app);
        }
        true
    }

    fn song_changed(&mut self, app: &mut App) {
        refresh_name(app);
    }

    fn widget_changed(&mut self, app: &mut App, index: usize, _activated: bool) {
        if index != 0 {
            return;
        }
        let name = app.pages.state(PageId::SampleList).widgets[0].text().to_string();
        if let Some(slot) = app.song.samples.get_mut(app.current_sample) {
            slot.name = name;
            app.status.flags.insert(StatusFlags::SONG_NEEDS_SAVE);
        }
    }
}

pub fn register() -> PageSlot {
    let widgets = vec![Widget::text_entry("", NAME_LEN, 44, 14, NAME_LEN as u16, Nav::stay(0))];
    let state = PageState::new("Sample List", HelpIndex::SampleList).with_widgets(widgets, 0);
    PageSlot::new(state, SampleList)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Playback;
    use crate::pipeline::song::Song;
    use crate::shared::{KeyMod, KeyState};
    use crate::ui::dispatch::{Handled, handle_key};

    fn app() -> App {
        let mut app = App::new(Song::default(), Playback::new(1000));
        app.song.samples[1].name = "kick".into();
        app.song.samples[2].name = "snare".into();
        app.set_page(PageId::SampleList);
        app
    }

    #[test]
    fn list_window_tracks_the_current_slot() {
        assert_eq!(list_first(1, 34, 99), 1);
        assert_eq!(list_first(50, 34, 99), 33);
        assert_eq!(list_first(99, 34, 99), 66);
    }

    #[test]
    fn arrows_select_samples_and_reload_the_name_entry() {
        let mut app = app();
        assert_eq!(app.current_sample, 1);
        assert_eq!(app.focused_widget().map(|w| w.text()), Some("kick"));

        assert_eq!(handle_key(&mut app, &KeyEvent::press(KeySym::Down)), Handled::PreHandler);
        assert_eq!(app.current_sample, 2);
        assert!(app.status.flags.contains(StatusFlags::SAMPLE_CHANGED));
        assert_eq!(app.focused_widget().map(|w| w.text()), Some("snare"));

        handle_key(&mut app, &KeyEvent::press(KeySym::Up));
        handle_key(&mut app, &KeyEvent::press(KeySym::Up));
        assert_eq!(app.current_sample, 1);
    }

    #[test]
    fn typing_renames_the_current_sample() {
        let mut app = app();
        for c in ['s', '!'] {
            handle_key(&mut app, &KeyEvent::character(c, KeyMod::empty(), KeyState::Pressed));
            handle_key(&mut app, &KeyEvent::character(c, KeyMod::empty(), KeyState::Released));
        }
        assert_eq!(app.song.sample_name(1), "kicks!");
        assert!(app.status.flags.contains(StatusFlags::SONG_NEEDS_SAVE));
    }
}
