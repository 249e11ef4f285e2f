// Pattern editor. Pattern contents are not modelled, so this is a row
// cursor over an empty grid of channels, plus the two dialogs the global
// F2 / Ctrl-F2 keys open while it is up.

use crate::shared::{HelpIndex, KeyEvent, KeySym, MAX_PATTERNS, PageId};
use crate::status::StatusFlags;
use crate::tui::grid::{BoxStyle, CellGrid};

use crate::ui::app::App;
use crate::ui::dialog::{Dialog, DialogAction, DialogArt};
use crate::ui::page::{PageHooks, PageSlot, PageState};
use crate::ui::widget::{Nav, Widget, WidgetRole};

const TOP: u16 = 15;
const VISIBLE: usize = 32;
const CHANNELS: usize = 5;
const CHANNEL_WIDTH: u16 = 14;
const EMPTY_CELL: &str = "... .. .. ...";

const MIN_LENGTH: i32 = 32;
const MAX_LENGTH: i32 = 200;
const MAX_HIGHLIGHT: i32 = 128;

// first row drawn so the cursor sits mid-screen where it can
fn first_visible(row: usize, rows: usize) -> usize {
    row.saturating_sub(VISIBLE / 2).min(rows.saturating_sub(VISIBLE))
}

#[derive(Default)]
struct PatternEditor;

impl PageHooks for PatternEditor {
    fn draw_const(&mut self, _app: &App, grid: &mut CellGrid) {
        grid.draw_box(4, TOP - 2, 5 + CHANNEL_WIDTH * CHANNELS as u16, TOP + VISIBLE as u16, BoxStyle::ThickInset);
    }

    fn predraw(&mut self, app: &App, grid: &mut CellGrid) {
        let song = &app.song;
        let pattern = app.cursor.pattern;
        let rows = song.rows_in_pattern(pattern);
        let highlight = song.row_highlight as usize;

        for ch in 0..CHANNELS {
            let x = 5 + CHANNEL_WIDTH * ch as u16;
            let muted = song.channel_mute.get(ch).copied().unwrap_or(false);
            let label = if muted { "  Muted".to_string() } else { format!(" Channel {:02}", ch + 1) };
            grid.draw_text_len(&label, CHANNEL_WIDTH as usize - 1, x, TOP - 1, if muted { 1 } else { 0 }, 2);
        }

        let pos = app.playback.position();
        let playing_here = app.is_playing() && pos.pattern == pattern;
        let first = first_visible(app.cursor.row, rows);

        for (line, row) in (first..rows).take(VISIBLE).enumerate() {
            let y = TOP + line as u16;
            let fg = if playing_here && pos.row == row { 3 } else { 0 };
            grid.draw_text(&format!("{row:03}"), 1, y, fg, 2);

            let bg = if row == app.cursor.row {
                8
            } else if highlight > 0 && row % highlight == 0 {
                14
            } else {
                0
            };
            for ch in 0..CHANNELS {
                let x = 5 + CHANNEL_WIDTH * ch as u16;
                grid.draw_text_len(EMPTY_CELL, CHANNEL_WIDTH as usize, x, y, 6, bg);
            }
        }
    }

    fn handle_key(&mut self, app: &mut App, k: &KeyEvent) -> bool {
        if k.ctrl() || k.alt() {
            return false;
        }
        let row = app.cursor.row as i32;
        let page = app.song.row_highlight.max(1) as i32;
        let last = app.song.rows_in_pattern(app.cursor.pattern) as i32 - 1;
        let pattern = app.cursor.pattern as i32;

        enum Move {
            Row(i32),
            Pattern(i32),
        }
        let target = match k.sym {
            KeySym::Up => Move::Row(row - 1),
            KeySym::Down => Move::Row(row + 1),
            KeySym::PageUp => Move::Row(row - page),
            KeySym::PageDown => Move::Row(row + page),
            KeySym::Home => Move::Row(0),
            KeySym::End => Move::Row(last),
            KeySym::Char('+') | KeySym::Keypad('+') => Move::Pattern(pattern + 1),
            KeySym::Char('-') | KeySym::Keypad('-') => Move::Pattern(pattern - 1),
            _ => return false,
        };
        if k.released() {
            return true;
        }
        match target {
            Move::Row(r) => app.set_current_row(r),
            Move::Pattern(p) => {
                app.set_current_pattern(p.clamp(0, MAX_PATTERNS as i32 - 1));
                if let Some(order) = app.song.order_for_pattern(app.cursor.pattern, Some(app.cursor.order)) {
                    app.cursor.order = order;
                }
            }
        }
        true
    }

    // with tracing on the cursor follows the playing row
    fn playback_update(&mut self, app: &mut App) {
        if !app.playback_tracing || !app.is_playing() {
            return;
        }
        let pos = app.playback.position();
        let cursor = app.cursor;
        if (cursor.order, cursor.pattern, cursor.row) != (pos.order, pos.pattern, pos.row) {
            app.cursor.order = pos.order;
            app.cursor.pattern = pos.pattern;
            app.cursor.row = pos.row;
            app.status.need_update();
        }
    }
}

pub fn register() -> PageSlot {
    PageSlot::new(PageState::new("Pattern Editor", HelpIndex::PatternEditor), PatternEditor)
}

// ── Dialogs ───────────────────────────────────────────────────────

fn slider_dialog(value: i32, min: i32, max: i32, art: DialogArt, action: DialogAction) -> Dialog {
    let widgets = vec![
        Widget::thumb_bar(value, min, max, 39, 24, 10, Nav::new(0, 1, 0, 0, 1)),
        Widget::button("OK", 28, 27, 8, Nav::new(0, 1, 1, 2, 2)).with_role(WidgetRole::Yes),
        Widget::button("Cancel", 42, 27, 8, Nav::new(0, 2, 1, 2, 0)).with_role(WidgetRole::Cancel),
    ];
    let mut dialog = Dialog::custom(22, 21, 36, 9, widgets, 0, art);
    dialog.on_yes = action;
    dialog
}

// Ctrl-F2
pub fn length_edit(app: &mut App) {
    let rows = app.song.rows_in_pattern(app.cursor.pattern) as i32;
    app.push_dialog(slider_dialog(rows, MIN_LENGTH, MAX_LENGTH, DialogArt::PatternLength, DialogAction::PatternLength));
}

pub fn length_ok(app: &mut App, dialog: &Dialog) {
    let rows = dialog.widget_value(0).max(1) as usize;
    let pattern = app.cursor.pattern;
    app.song.set_rows_in_pattern(pattern, rows);
    app.set_current_row(app.cursor.row as i32);
    app.status.flags.insert(StatusFlags::SONG_NEEDS_SAVE);
    app.time.cache.invalidate();
    app.playback.set_layout(app.song.layout());
    log::debug!("pattern {pattern} resized to {rows} rows");
}

// F2 while already on the pattern editor
pub fn display_options(app: &mut App) {
    let highlight = app.song.row_highlight as i32;
    app.push_dialog(slider_dialog(highlight, 0, MAX_HIGHLIGHT, DialogArt::DisplayOptions, DialogAction::DisplayOptions));
}

pub fn options_ok(app: &mut App, dialog: &Dialog) {
    app.song.row_highlight = dialog.widget_value(0).clamp(0, MAX_HIGHLIGHT) as u8;
    if app.status.current_page == PageId::PatternEditor {
        app.status.need_update();
    }
}

pub fn draw_dialog(grid: &mut CellGrid, d: &Dialog) {
    let (title, label) = match d.art {
        DialogArt::PatternLength => ("Set Pattern Length", "Pattern Length"),
        _ => ("Pattern Editor Options", " Row Highlight"),
    };
    let tx = d.x + (d.w - title.len() as u16) / 2;
    grid.draw_text(title, tx, d.y + 1, 3, 2);
    grid.draw_text(label, d.x + 2, d.y + 3, 0, 2);
}
