// The mini popup: a one-thumbbar dialog opened by clicking a number in the
// header. It writes its value through on every change, and a click outside
// the slider closes it once the slider has been used.
//
//   Idle --open--> Opened --change--> Armed --click elsewhere--> Idle
//   Opened/Armed --open again--> Armed (never a second dialog)

use crate::shared::{KeyEvent, MouseKind, PageId};
use crate::tui::grid::{BoxStyle, CellGrid};

use super::app::App;
use super::dialog::{Dialog, DialogAction, DialogArt};
use super::widget::{Nav, Widget};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MiniPopKind {
    Octave,
    Speed,
    Tempo,
    Instrument,
    Sample,
    Row,
    Pattern,
    Order,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Opened,
    Armed,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MiniPop {
    pub phase: Phase,
    kind: Option<MiniPopKind>,
    midx: u16,
    midy: u16,
}

impl MiniPop {
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.kind = None;
    }

    pub fn kind(&self) -> Option<MiniPopKind> {
        self.kind
    }

    fn slider_hit(&self, x: u16, y: u16) -> bool {
        y == self.midy && (self.midx - 8..self.midx - 8 + 13).contains(&x)
    }
}

pub fn open(app: &mut App, kind: MiniPopKind, value: i32, min: i32, max: i32, midx: u16, midy: u16) {
    if app.minipop.phase != Phase::Idle {
        app.minipop.phase = Phase::Armed;
        return;
    }
    let max = max.max(min);
    let slider = Widget::thumb_bar(value.clamp(min, max), min, max, midx - 8, midy, 13, Nav::stay(0));
    let mut dialog = Dialog::custom(midx - 10, midy - 3, 20, 6, vec![slider], 0, DialogArt::MiniPop);
    dialog.on_yes = DialogAction::MiniPopFinish;
    dialog.on_cancel = DialogAction::MiniPopFinish;
    app.push_dialog(dialog);

    app.minipop = MiniPop { phase: Phase::Opened, kind: Some(kind), midx, midy };
    app.status.need_update();
}

// the slider moved
pub fn change(app: &mut App, value: i32) {
    let Some(kind) = app.minipop.kind else {
        return;
    };
    let playing = app.is_playing();
    match kind {
        MiniPopKind::Octave => app.set_octave(value),
        MiniPopKind::Speed => {
            app.playback.set_speed(value);
            if !playing {
                app.song.initial_speed = value.clamp(1, 255) as u8;
                app.time.cache.invalidate();
            }
        }
        MiniPopKind::Tempo => {
            app.playback.set_tempo(value);
            if !playing {
                app.song.initial_tempo = value.clamp(32, 255) as u8;
                app.time.cache.invalidate();
            }
        }
        MiniPopKind::Instrument => app.set_current_instrument(value),
        MiniPopKind::Sample => app.set_current_sample(value),
        MiniPopKind::Row => app.set_current_row(value),
        MiniPopKind::Pattern => app.set_current_pattern(value),
        MiniPopKind::Order => app.set_current_order(value),
    }
    app.minipop.phase = Phase::Armed;
    app.status.need_update();
}

pub fn finish(app: &mut App) {
    app.minipop.reset();
    app.destroy_all_dialogs();
}

// Header hot zones. Returns true when the event was used.
pub fn handle_mouse(app: &mut App, k: &KeyEvent) -> bool {
    let (x, y) = (k.x, k.y);

    if app.minipop.phase == Phase::Armed && k.mouse == MouseKind::Click && k.released() && !app.minipop.slider_hit(x, y)
    {
        app.status.need_update();
        app.destroy_all_dialogs();
        app.minipop.reset();
        return true;
    }
    if app.minipop.phase != Phase::Idle {
        return false;
    }

    match k.mouse {
        MouseKind::Click if k.pressed() => click(app, x, y),
        MouseKind::DoubleClick => {
            if y == 4 && (11..=28).contains(&x) {
                app.set_page(PageId::SaveModule);
                true
            } else if y == 3 && (11..=35).contains(&x) {
                app.set_page(PageId::SongVariables);
                true
            } else {
                false
            }
        }
        _ => false,
    }
}

fn click(app: &mut App, x: u16, y: u16) -> bool {
    if !app.status.classic() && (63..=77).contains(&x) && (6..=7).contains(&y) {
        app.status.vis_style = app.status.vis_style.next();
        app.status.need_update();
        return true;
    }

    let page = app.status.current_page;
    match (x, y) {
        (50, 5) => open(app, MiniPopKind::Octave, app.octave as i32, 0, 8, 50, 5),
        (50..=52, 4) => open(app, MiniPopKind::Speed, app.playback.speed() as i32, 1, 255, 51, 4),
        (54..=56, 4) => open(app, MiniPopKind::Tempo, app.playback.tempo() as i32, 32, 255, 55, 4),
        (50..=77, 3) => {
            let instruments = !page.shows_samples_only(app.status.classic()) && app.song.instrument_mode;
            if instruments {
                let min = page.is_instrument_list() as i32;
                open(app, MiniPopKind::Instrument, app.current_instrument as i32, min, 99, 58, 3);
            } else {
                let min = (page == PageId::SampleList) as i32;
                open(app, MiniPopKind::Sample, app.current_sample as i32, min, 99, 58, 3);
            }
        }
        (11..=17, 7) => {
            let rows = app.song.rows_in_pattern(app.cursor.pattern) as i32;
            open(app, MiniPopKind::Row, app.cursor.row as i32, 0, (rows - 1).max(0), 14, 7);
        }
        (11..=17, 6) => {
            let max = app.song.num_patterns() as i32;
            open(app, MiniPopKind::Pattern, app.cursor.pattern as i32, 0, max, 14, 6);
        }
        (11..=17, 5) => {
            let max = app.song.num_orders() as i32;
            open(app, MiniPopKind::Order, app.cursor.order as i32, 0, max, 14, 5);
        }
        _ => return false,
    }
    true
}

pub fn draw(app: &App, grid: &mut CellGrid) {
    let Some(kind) = app.minipop.kind else {
        return;
    };
    let (tx, ty) = (app.minipop.midx - 9, app.minipop.midy - 2);

    let slot_name = |name: &str, empty: &str| -> String {
        if name.is_empty() { empty.to_string() } else { name.to_string() }
    };
    let (label, colon) = match kind {
        MiniPopKind::Octave => ("Octave".to_string(), true),
        MiniPopKind::Speed => ("Speed".to_string(), true),
        MiniPopKind::Tempo => ("Tempo".to_string(), true),
        MiniPopKind::Row => ("Row".to_string(), true),
        MiniPopKind::Pattern => ("Pattern".to_string(), true),
        MiniPopKind::Order => ("Order".to_string(), true),
        MiniPopKind::Instrument => {
            let n = app.current_instrument;
            let name = if n == 0 { "" } else { app.song.instrument_name(n) };
            (slot_name(name, "(No Instrument)"), false)
        }
        MiniPopKind::Sample => {
            let n = app.current_sample;
            let name = if n == 0 { "" } else { app.song.sample_name(n) };
            (slot_name(name, "(No Sample)"), false)
        }
    };

    grid.draw_fill_chars(tx, ty, tx + 17, ty, 2);
    grid.draw_text_len(&label, 17, tx, ty, 0, 2);
    let len = label.chars().count() as u16;
    if colon && len < 17 {
        grid.draw_char(':', tx + len, ty, 0, 2);
    }
    grid.draw_box(tx, ty + 1, tx + 14, ty + 3, BoxStyle::ThinInset);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Playback;
    use crate::pipeline::song::Song;
    use crate::shared::KeyState;

    fn app() -> App {
        App::new(Song::default(), Playback::new(1000))
    }

    fn click_at(x: u16, y: u16, state: KeyState) -> KeyEvent {
        KeyEvent::mouse(MouseKind::Click, x, y, state)
    }

    #[test]
    fn clicking_the_octave_opens_a_slider() {
        let mut app = app();
        assert!(handle_mouse(&mut app, &click_at(50, 5, KeyState::Pressed)));
        assert_eq!(app.dialogs.len(), 1);
        assert_eq!(app.minipop.phase, Phase::Opened);
        assert_eq!(app.minipop.kind(), Some(MiniPopKind::Octave));
        assert_eq!(app.dialogs[0].widget_value(0), 4);
    }

    #[test]
    fn opening_twice_rearms_instead_of_stacking() {
        let mut app = app();
        open(&mut app, MiniPopKind::Octave, 4, 0, 8, 50, 5);
        open(&mut app, MiniPopKind::Speed, 6, 1, 255, 51, 4);
        assert_eq!(app.dialogs.len(), 1);
        assert_eq!(app.minipop.phase, Phase::Armed);
        assert_eq!(app.minipop.kind(), Some(MiniPopKind::Octave));
    }

    #[test]
    fn reopening_an_adjusted_slider_keeps_one_dialog() {
        let mut app = app();
        open(&mut app, MiniPopKind::Octave, 4, 0, 8, 50, 5);
        change(&mut app, 5);
        assert_eq!(app.minipop.phase, Phase::Armed);
        open(&mut app, MiniPopKind::Octave, 5, 0, 8, 50, 5);
        assert_eq!(app.dialogs.len(), 1);
        assert_eq!(app.minipop.phase, Phase::Armed);
    }

    #[test]
    fn empty_range_collapses_instead_of_panicking() {
        let mut app = app();
        open(&mut app, MiniPopKind::Row, 3, 0, -1, 14, 7);
        assert_eq!(app.dialogs.len(), 1);
        assert_eq!(app.dialogs[0].widget_value(0), 0);
    }

    #[test]
    fn row_slider_on_a_zero_row_pattern() {
        let mut app = app();
        app.song.patterns[0].rows = 0;
        assert!(handle_mouse(&mut app, &click_at(12, 7, KeyState::Pressed)));
        assert_eq!(app.minipop.kind(), Some(MiniPopKind::Row));
        assert_eq!(app.dialogs[0].widget_value(0), 0);
    }

    #[test]
    fn speed_writes_initial_value_only_when_stopped() {
        let mut app = app();
        open(&mut app, MiniPopKind::Speed, 6, 1, 255, 51, 4);
        change(&mut app, 9);
        assert_eq!(app.playback.speed(), 9);
        assert_eq!(app.song.initial_speed, 9);

        app.playback.start();
        change(&mut app, 3);
        assert_eq!(app.playback.speed(), 3);
        assert_eq!(app.song.initial_speed, 9);
    }

    #[test]
    fn armed_popup_closes_on_a_click_elsewhere() {
        let mut app = app();
        open(&mut app, MiniPopKind::Octave, 4, 0, 8, 50, 5);
        change(&mut app, 6);
        assert_eq!(app.octave, 6);

        // releasing over the slider keeps it open
        assert!(!handle_mouse(&mut app, &click_at(45, 5, KeyState::Released)));
        assert_eq!(app.dialogs.len(), 1);

        assert!(handle_mouse(&mut app, &click_at(5, 30, KeyState::Released)));
        assert!(app.dialogs.is_empty());
        assert_eq!(app.minipop.phase, Phase::Idle);
    }

    #[test]
    fn vis_box_click_cycles_the_style_outside_classic_mode() {
        let mut app = app();
        let before = app.status.vis_style;
        assert!(handle_mouse(&mut app, &click_at(70, 6, KeyState::Pressed)));
        assert_eq!(app.status.vis_style, before.next());
        assert!(app.dialogs.is_empty());
    }

    #[test]
    fn header_slot_uses_the_sample_list_minimum() {
        let mut app = app();
        app.status.current_page = PageId::SampleList;
        app.current_sample = 0;
        assert!(handle_mouse(&mut app, &click_at(60, 3, KeyState::Pressed)));
        assert_eq!(app.minipop.kind(), Some(MiniPopKind::Sample));
        assert_eq!(app.dialogs[0].widget_value(0), 1);
    }

    #[test]
    fn double_click_on_the_file_name_opens_save_module() {
        let mut app = app();
        let k = KeyEvent::mouse(MouseKind::DoubleClick, 15, 4, KeyState::Pressed);
        assert!(handle_mouse(&mut app, &k));
        assert_eq!(app.status.current_page, PageId::SaveModule);
    }
}
