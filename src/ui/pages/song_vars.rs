// Song variables: title, initial speed/tempo/global volume, and whether the
// song plays through instruments or straight from samples.

use crate::shared::{HelpIndex, PageId};
use crate::status::StatusFlags;
use crate::tui::grid::{BoxStyle, CellGrid};

use crate::ui::app::App;
use crate::ui::page::{PageHooks, PageSlot, PageState};
use crate::ui::widget::{Nav, Widget, toggle_set};

const TITLE: usize = 0;
const SPEED: usize = 1;
const TEMPO: usize = 2;
const VOLUME: usize = 3;
const SAMPLES: usize = 4;
const INSTRUMENTS: usize = 5;

fn load_from_song(app: &mut App) {
    let song = &app.song;
    let (title, speed, tempo, volume, instruments) = (
        song.title.clone(),
        song.initial_speed as i32,
        song.initial_tempo as i32,
        song.initial_global_volume as i32,
        song.instrument_mode,
    );
    let widgets = &mut app.pages.state_mut(PageId::SongVariables).widgets;
    widgets[TITLE].set_text(&title);
    widgets[SPEED].set_value(speed);
    widgets[TEMPO].set_value(tempo);
    widgets[VOLUME].set_value(volume);
    toggle_set(widgets, if instruments { INSTRUMENTS } else { SAMPLES }, true);
}

struct SongVariables;

impl PageHooks for SongVariables {
    fn draw_const(&mut self, _app: &App, grid: &mut CellGrid) {
        grid.draw_text("Song Name", 7, 16, 0, 2);
        grid.draw_box(16, 15, 43, 17, BoxStyle::ThinInset);
        grid.draw_text("Initial Speed", 3, 19, 0, 2);
        grid.draw_text("Initial Tempo", 3, 20, 0, 2);
        grid.draw_text("Global Volume", 3, 21, 0, 2);
        grid.draw_box(16, 18, 21, 22, BoxStyle::ThinInset);
        grid.draw_text("Control", 8, 25, 0, 2);
    }

    fn set_page(&mut self, app: &mut App) {
        load_from_song(app);
    }

    fn song_changed(&mut self, app: &mut App) {
        load_from_song(app);
    }

    fn widget_changed(&mut self, app: &mut App, _index: usize, _activated: bool) {
        let widgets = &app.pages.state(PageId::SongVariables).widgets;
        let title = widgets[TITLE].text().to_string();
        let speed = widgets[SPEED].value().clamp(1, 255) as u8;
        let tempo = widgets[TEMPO].value().clamp(31, 255) as u8;
        let volume = widgets[VOLUME].value().clamp(0, 128) as u8;
        let instruments = widgets[INSTRUMENTS].value() != 0;

        let song = &mut app.song;
        song.title = title;
        song.initial_speed = speed;
        song.initial_tempo = tempo;
        song.initial_global_volume = volume;
        song.instrument_mode = instruments;
        app.status.flags.insert(StatusFlags::SONG_NEEDS_SAVE);
        app.time.cache.invalidate();
        if !app.is_playing() {
            app.playback.set_layout(app.song.layout());
        }
    }
}

pub fn register() -> PageSlot {
    let widgets = vec![
        Widget::text_entry("", 25, 17, 16, 26, Nav::new(TITLE, SPEED, TITLE, TITLE, SPEED)),
        Widget::num_entry(6, 1, 255, 17, 19, 3, Nav::new(TITLE, TEMPO, SPEED, SPEED, TEMPO)),
        Widget::num_entry(125, 31, 255, 17, 20, 3, Nav::new(SPEED, VOLUME, TEMPO, TEMPO, VOLUME)),
        Widget::num_entry(128, 0, 128, 17, 21, 3, Nav::new(TEMPO, SAMPLES, VOLUME, VOLUME, SAMPLES)),
        Widget::toggle("Samples", true, Some(0), 17, 25, 11, Nav::new(VOLUME, SAMPLES, SAMPLES, INSTRUMENTS, INSTRUMENTS)),
        Widget::toggle("Instruments", false, Some(0), 32, 25, 11, Nav::new(VOLUME, INSTRUMENTS, SAMPLES, INSTRUMENTS, TITLE)),
    ];
    let state = PageState::new("Song Variables & Directory Configuration (F12)", HelpIndex::Global).with_widgets(widgets, TITLE);
    PageSlot::new(state, SongVariables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Playback;
    use crate::pipeline::song::Song;
    use crate::shared::{KeyEvent, KeyMod, KeyState, KeySym};
    use crate::ui::dispatch::handle_key;

    fn app() -> App {
        let mut app = App::new(Song::default(), Playback::new(1000));
        app.song.title = "demo".into();
        app.song.instrument_mode = true;
        app.set_page(PageId::SongVariables);
        app
    }

    #[test]
    fn entering_the_page_loads_the_song_values() {
        let app = app();
        let widgets = &app.pages.state(PageId::SongVariables).widgets;
        assert_eq!(widgets[TITLE].text(), "demo");
        assert_eq!(widgets[TEMPO].value(), 125);
        assert_eq!(widgets[INSTRUMENTS].value(), 1);
        assert_eq!(widgets[SAMPLES].value(), 0);
    }

    #[test]
    fn editing_the_speed_writes_the_initial_speed() {
        let mut app = app();
        handle_key(&mut app, &KeyEvent::press(KeySym::Down));
        assert_eq!(app.pages.state(PageId::SongVariables).selected_widget, Some(SPEED));
        handle_key(&mut app, &KeyEvent::character('+', KeyMod::empty(), KeyState::Pressed));
        assert_eq!(app.song.initial_speed, 7);
        assert!(app.status.flags.contains(StatusFlags::SONG_NEEDS_SAVE));
    }

    #[test]
    fn the_control_toggles_switch_instrument_mode() {
        let mut app = app();
        app.change_focus_to(SAMPLES);
        handle_key(&mut app, &KeyEvent::press(KeySym::Enter));
        assert!(!app.song.instrument_mode);
    }
}
