// Full repaint. Unless the page takes over the whole screen, the screen is
// built back to front: frame, static chrome, live header, visualization,
// time, flash line, page title, page art. Widgets and the topmost overlay
// always go on last.

use crate::shared::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::status::{DialogType, VisStyle};
use crate::tui::grid::{BoxStyle, CellGrid};

use super::app::{App, WidgetOwner};
use super::dialog::draw_dialogs;
use super::menu::menu_draw;
use super::time::time_visible;
use super::widget::draw_widget;

const BANNER: &str = concat!("tracktty ", env!("CARGO_PKG_VERSION"));
const CLASSIC_BANNER: &str = "Impulse Tracker v2.14 Copyright (C) 1995-1998 Jeffrey Lim";

// classic mode's memory readout counts down from these
const CONVENTIONAL_BYTES: usize = 512 * 1024;
const EMS_BYTES: usize = 64 * 1024 * 1024;

const FLASH_WIDTH: usize = 58;
const NAME_WIDTH: usize = 25;

pub fn redraw_screen(app: &mut App, grid: &mut CellGrid) {
    let page = app.status.current_page;
    let full = app.with_page_hooks(page, false, |hooks, _| hooks.claims_full_draw());

    if full {
        app.with_page_hooks(page, (), |hooks, app| hooks.draw_full(app, grid));
    } else {
        draw_frame(grid);
        draw_chrome(app, grid);
        draw_header(app, grid);
        draw_vis(app, grid);
        draw_time(app, grid);
        draw_flash(app, grid);
        draw_title(app, grid);
        app.with_page_hooks(page, (), |hooks, app| {
            hooks.draw_const(app, grid);
            hooks.predraw(app, grid);
        });
    }

    draw_page_widgets(app, grid);

    if app.status.dialog_type.contains(DialogType::MENU) {
        menu_draw(app, grid);
    } else if app.status.dialog_type.contains(DialogType::BOX) {
        draw_dialogs(app, grid);
    }
}

// ── Chrome ────────────────────────────────────────────────────────

fn draw_frame(grid: &mut CellGrid) {
    grid.draw_fill_chars(0, 0, SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1, 2);
    grid.draw_box(0, 0, SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1, BoxStyle::ThinOutset);
}

fn centred(text: &str) -> u16 {
    SCREEN_WIDTH.saturating_sub(text.chars().count() as u16) / 2
}

fn draw_chrome(app: &App, grid: &mut CellGrid) {
    let banner = if app.status.classic() { CLASSIC_BANNER } else { BANNER };
    grid.draw_text(banner, centred(banner), 1, 0, 2);

    grid.draw_text("Song Name", 2, 3, 0, 2);
    grid.draw_text("File Name", 2, 4, 0, 2);
    grid.draw_text("Order", 6, 5, 0, 2);
    grid.draw_text("Pattern", 4, 6, 0, 2);
    grid.draw_text("Row", 8, 7, 0, 2);
    grid.draw_text("Speed/Tempo", 38, 4, 0, 2);
    grid.draw_text("Octave", 43, 5, 0, 2);
    grid.draw_text("F1...Help", 21, 6, 0, 2);
    grid.draw_text("ESC..Main Menu", 21, 7, 0, 2);
    grid.draw_text("Time", 63, 9, 0, 2);

    grid.draw_box(11, 2, 37, 8, BoxStyle::ThinInset);
    grid.draw_box(62, 5, 78, 8, BoxStyle::ThinInset);
}

// ── Header ────────────────────────────────────────────────────────

fn draw_header(app: &App, grid: &mut CellGrid) {
    let song = &app.song;
    grid.draw_text_len(&song.title, NAME_WIDTH, 12, 3, 5, 0);
    grid.draw_text_len(&song.basename(), 18, 12, 4, 5, 0);

    let cursor = app.cursor;
    let rows = song.rows_in_pattern(cursor.pattern);
    grid.draw_text(&format!("{:03}/{:03}", cursor.order, song.num_orders()), 12, 5, 5, 0);
    grid.draw_text(&format!("{:03}/{:03}", cursor.pattern, song.num_patterns()), 12, 6, 5, 0);
    grid.draw_text(&format!("{:03}/{:03}", cursor.row, rows.saturating_sub(1)), 12, 7, 5, 0);

    let page = app.status.current_page;
    let (label, n, name) = if song.instrument_mode && !page.shows_samples_only(app.status.classic()) {
        ("Instrument", app.current_instrument, song.instrument_name(app.current_instrument))
    } else {
        ("Sample", app.current_sample, song.sample_name(app.current_sample))
    };
    grid.draw_text_len(label, 10, 39, 3, 0, 2);
    if n == 0 {
        grid.draw_text("..", 50, 3, 5, 0);
        grid.draw_text_len("........", NAME_WIDTH, 53, 3, 5, 0);
    } else {
        grid.draw_text(&format!("{n:02}"), 50, 3, 5, 0);
        grid.draw_text_len(name, NAME_WIDTH, 53, 3, 5, 0);
    }

    grid.draw_text(&format!("{:03}", app.playback.speed()), 50, 4, 5, 0);
    grid.draw_char('/', 53, 4, 0, 2);
    grid.draw_text(&format!("{:03}", app.playback.tempo()), 54, 4, 5, 0);
    grid.draw_char(char::from(b'0' + app.octave.min(9)), 50, 5, 5, 0);
}

// ── Visualization ─────────────────────────────────────────────────

fn draw_vis(app: &App, grid: &mut CellGrid) {
    let style = if app.status.classic() { VisStyle::Memory } else { app.status.vis_style };
    grid.draw_fill_chars(63, 6, 77, 7, 0);
    match style {
        VisStyle::Off => {}
        VisStyle::Memory => draw_memory(app, grid),
        VisStyle::Oscilloscope => {
            let scope = app.playback.scope_snapshot();
            grid.draw_sample_data(63, 6, 15, 2, &scope, 2);
        }
        VisStyle::VuMeter => {
            let (left, right) = app.playback.vu();
            grid.draw_vu_meter(63, 6, 15, left, 5, 3);
            grid.draw_vu_meter(63, 7, 15, right, 5, 3);
        }
    }
}

fn draw_memory(app: &App, grid: &mut CellGrid) {
    let (song, samples) = app.song.memory_usage();
    let (top, bottom) = if app.status.classic() {
        (
            format!("FreeMem {}k", CONVENTIONAL_BYTES.saturating_sub(song) / 1024),
            format!("FreeEMS {}k", EMS_BYTES.saturating_sub(samples) / 1024),
        )
    } else {
        (format!("   Song {}k", song / 1024), format!("Samples {}k", samples / 1024))
    };
    grid.draw_text_len(&top, 15, 63, 6, 0, 2);
    grid.draw_text_len(&bottom, 15, 63, 7, 0, 2);
}

// ── Time and status line ──────────────────────────────────────────

pub fn time_text(app: &App) -> String {
    let t = app.time.current;
    format!("{:3}:{:02}:{:02}", t.h % 1000, t.m, t.s)
}

fn draw_time(app: &App, grid: &mut CellGrid) {
    if !time_visible(app.status.time_display, app.is_playing()) {
        return;
    }
    grid.draw_text(&time_text(app), 69, 9, 0, 2);
}

fn draw_flash(app: &App, grid: &mut CellGrid) {
    grid.draw_text_len(app.flash_text().unwrap_or(""), FLASH_WIDTH, 2, 9, 0, 2);
}

fn draw_title(app: &App, grid: &mut CellGrid) {
    let title = app.pages.state(app.status.current_page).title;
    for x in 1..SCREEN_WIDTH - 1 {
        grid.draw_char('─', x, 11, 1, 2);
    }
    if title.is_empty() {
        return;
    }
    let padded = format!(" {title} ");
    grid.draw_text(&padded, centred(&padded), 11, 0, 2);
}

// ── Widgets ───────────────────────────────────────────────────────

fn draw_page_widgets(app: &App, grid: &mut CellGrid) {
    let page = app.status.current_page;
    let state = app.pages.state(page);
    let focused = app.active == WidgetOwner::Page(page);
    for (i, w) in state.widgets.iter().enumerate().rev() {
        draw_widget(grid, w, focused && state.selected_widget == Some(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Playback;
    use crate::pipeline::song::Song;
    use crate::shared::PageId;
    use crate::status::{Hms, StatusFlags, TimeDisplay};
    use crate::ui::prompts;

    fn app() -> App {
        let mut song = Song::default();
        song.title = "Morning".into();
        song.filename = Some("/tmp/songs/morning.json".into());
        song.samples[1].name = "kick".into();
        App::new(song, Playback::new(1000))
    }

    fn draw(app: &mut App) -> CellGrid {
        let mut grid = CellGrid::default();
        redraw_screen(app, &mut grid);
        grid
    }

    #[test]
    fn header_shows_song_and_slot() {
        let mut app = app();
        app.set_page(PageId::SampleList);
        let grid = draw(&mut app);
        assert!(grid.row_text(3).contains("Morning"));
        assert!(grid.row_text(4).contains("morning.json"));
        assert!(grid.row_text(3).contains("Sample"));
        assert!(grid.row_text(3).contains("01 kick"));
        assert!(grid.row_text(4).contains("006/125"));
        assert!(grid.row_text(11).contains(" Sample List "));
    }

    #[test]
    fn empty_slot_shows_dots() {
        let mut app = app();
        let grid = draw(&mut app);
        assert!(grid.row_text(3).contains(".. ........"));
    }

    #[test]
    fn time_readout_hides_when_off() {
        let mut app = app();
        app.time.current = Hms { h: 1001, m: 2, s: 3 };
        let grid = draw(&mut app);
        assert!(grid.row_text(9).contains("  1:02:03"));

        app.status.time_display = TimeDisplay::Off;
        let grid = draw(&mut app);
        assert!(!grid.row_text(9).contains("1:02:03"));

        app.status.time_display = TimeDisplay::PlayOff;
        let grid = draw(&mut app);
        assert!(!grid.row_text(9).contains("1:02:03"));
    }

    #[test]
    fn classic_mode_forces_the_memory_readout() {
        let mut app = app();
        app.status.vis_style = VisStyle::Off;
        app.status.flags.insert(StatusFlags::CLASSIC_MODE);
        let grid = draw(&mut app);
        assert!(grid.row_text(6).contains("FreeMem"));
        assert!(grid.row_text(7).contains("FreeEMS"));
        assert!(grid.row_text(1).contains("Impulse Tracker"));
    }

    #[test]
    fn flash_line_shows_the_message() {
        let mut app = app();
        app.status_text_flash("Order list locked");
        let grid = draw(&mut app);
        assert!(grid.row_text(9).contains("Order list locked"));
    }

    #[test]
    fn full_draw_pages_skip_the_chrome() {
        let mut app = app();
        app.set_page(PageId::FontEdit);
        let grid = draw(&mut app);
        assert!(!grid.row_text(3).contains("Song Name"));
        assert!(grid.row_text(2).contains("Font Editor"));
    }

    #[test]
    fn dialogs_draw_over_the_page() {
        let mut app = app();
        prompts::show_song_length(&mut app);
        let grid = draw(&mut app);
        let text: String = (0..SCREEN_HEIGHT).map(|y| grid.row_text(y)).collect();
        assert!(text.contains("Total song time:"));
    }
}
