// Global prompts: exit, new song, song length, time jump, and the song
// load/save flows that may stop to ask about unsaved changes.

use std::path::{Path, PathBuf};

use crate::audio::{DiskWriter, DiskWriterEvent};
use crate::pipeline::persistence::{load_song, save_song};
use crate::pipeline::song::KeepFlags;
use crate::shared::{KeyEvent, KeySym, PageId};
use crate::status::{DialogType, Hms, StatusFlags};
use crate::tui::grid::{BoxStyle, CellGrid};

use super::app::App;
use super::dialog::{Dialog, DialogAction, DialogArt, DialogKeys};
use super::minipop;
use super::pages::pattern_editor;
use super::widget::{Nav, Widget, WidgetRole};

const UNSAVED: &str = "Current module not saved. Proceed?";

pub fn run_dialog_action(app: &mut App, action: DialogAction, dialog: &Dialog) {
    match action {
        DialogAction::None => {}
        DialogAction::Exit => {
            if app.status.flags.contains(StatusFlags::SONG_NEEDS_SAVE) {
                app.push_dialog(Dialog::message(DialogType::OK_CANCEL, UNSAVED, DialogAction::RealExit, DialogAction::None, 1));
            } else {
                app.exit_requested = true;
            }
        }
        DialogAction::RealExit => app.exit_requested = true,
        DialogAction::FontExit => {
            app.destroy_all_dialogs();
            app.set_page(PageId::PatternEditor);
        }
        DialogAction::NewSong => new_song_ok(app, dialog),
        DialogAction::LoadSongUnchecked(path) => {
            app.destroy_all_dialogs();
            song_load_unchecked(app, &path);
        }
        DialogAction::TimeJump => timejump_ok(app, dialog),
        DialogAction::MiniPopFinish => minipop::finish(app),
        DialogAction::PatternLength => pattern_editor::length_ok(app, dialog),
        DialogAction::DisplayOptions => pattern_editor::options_ok(app, dialog),
    }
}

// ── Exit ──────────────────────────────────────────────────────────

pub fn show_exit_prompt(app: &mut App) {
    // may arrive with a dialog already up
    app.destroy_all_dialogs();

    let (text, action) = if app.status.classic() {
        ("Exit Impulse Tracker?", DialogAction::Exit)
    } else if app.status.current_page == PageId::FontEdit
        && !app.status.flags.contains(StatusFlags::STARTUP_FONTEDIT)
    {
        ("Exit Font Editor?", DialogAction::FontExit)
    } else {
        ("Exit Tracker?", DialogAction::Exit)
    };
    app.push_dialog(Dialog::message(DialogType::OK_CANCEL, text, action, DialogAction::None, 0));
}

// ── New song ──────────────────────────────────────────────────────

const NEW_SONG_ROWS: [(u16, &str, u16); 4] =
    [(24, "Patterns", 26), (27, "Samples", 27), (30, "Instruments", 23), (33, "Order List", 24)];

pub fn new_song_dialog(app: &mut App) {
    let mut widgets = Vec::with_capacity(10);
    for (i, &(y, _, _)) in NEW_SONG_ROWS.iter().enumerate() {
        let keep = 2 * i;
        let clear = keep + 1;
        let last = i == NEW_SONG_ROWS.len() - 1;
        let up = |n: usize| if i == 0 { n } else { n - 2 };
        let group = Some(i as u8);
        widgets.push(Widget::toggle(
            "Keep",
            false,
            group,
            35,
            y,
            6,
            Nav::new(up(keep), if last { 8 } else { keep + 2 }, keep, clear, clear),
        ));
        widgets.push(Widget::toggle(
            "Clear",
            true,
            group,
            45,
            y,
            7,
            Nav::new(up(clear), if last { 9 } else { clear + 2 }, keep, clear, if last { 8 } else { clear + 1 }),
        ));
    }
    widgets.push(Widget::button("OK", 28, 36, 8, Nav::new(6, 8, 8, 9, 9)).with_role(WidgetRole::Yes));
    widgets.push(Widget::button("Cancel", 41, 36, 8, Nav::new(7, 9, 8, 9, 0)).with_role(WidgetRole::Cancel));

    let mut dialog = Dialog::custom(21, 20, 38, 19, widgets, 8, DialogArt::NewSong);
    dialog.on_yes = DialogAction::NewSong;
    app.push_dialog(dialog);
}

pub fn draw_new_song(grid: &mut CellGrid) {
    grid.draw_text("New Song", 36, 21, 3, 2);
    for &(y, label, x) in &NEW_SONG_ROWS {
        grid.draw_text(label, x, y, 0, 2);
    }
}

fn new_song_ok(app: &mut App, dialog: &Dialog) {
    let parts = [KeepFlags::KEEP_PATTERNS, KeepFlags::KEEP_SAMPLES, KeepFlags::KEEP_INSTRUMENTS, KeepFlags::KEEP_ORDERLIST];
    let keep = parts
        .iter()
        .enumerate()
        .filter(|&(i, _)| dialog.widget_value(2 * i) != 0)
        .fold(KeepFlags::empty(), |acc, (_, &flag)| acc | flag);

    app.playback.stop();
    app.song.new_song(keep);
    app.status.flags.remove(StatusFlags::SONG_NEEDS_SAVE);
    log::info!("new song, keeping {keep:?}");
    app.song_changed();
}

// ── Song length / time jump ───────────────────────────────────────

pub fn show_song_length(app: &mut App) {
    let t = Hms::from_secs(app.song.length());
    let text = format!("Total song time: {:3}:{:02}:{:02}", t.h, t.m, t.s);
    app.push_dialog(Dialog::message(DialogType::OK, &text, DialogAction::None, DialogAction::None, 0));
}

pub fn show_song_timejump(app: &mut App) {
    let widgets = vec![
        Widget::num_entry(0, 0, 21, 44, 26, 2, Nav::new(0, 2, 0, 1, 1)).reversed(),
        Widget::num_entry(0, 0, 59, 47, 26, 2, Nav::new(1, 2, 0, 1, 2)).reversed(),
        Widget::button("OK", 30, 29, 8, Nav::new(0, 2, 2, 3, 3)).with_role(WidgetRole::Yes),
        Widget::button("Cancel", 42, 29, 8, Nav::new(1, 3, 2, 3, 0)).with_role(WidgetRole::Cancel),
    ];
    let mut dialog = Dialog::custom(26, 24, 30, 8, widgets, 0, DialogArt::TimeJump);
    dialog.keys = DialogKeys::TimeJump;
    dialog.on_yes = DialogAction::TimeJump;
    app.push_dialog(dialog);
}

// ':' hops from minutes to seconds, backspace on empty seconds hops back
pub fn timejump_keys(app: &mut App, k: &KeyEvent) -> bool {
    let Some(dialog) = app.dialogs.last() else {
        return false;
    };
    let selected = dialog.selected_widget;
    match k.sym {
        KeySym::Backspace if selected == Some(1) && dialog.widget_value(1) == 0 => {
            if k.pressed() {
                app.change_focus_to(0);
            }
            true
        }
        KeySym::Char(':') => {
            if k.pressed() && selected == Some(0) {
                app.change_focus_to(1);
            }
            true
        }
        _ => false,
    }
}

pub fn draw_timejump(grid: &mut CellGrid) {
    grid.draw_text("Jump to time:", 30, 26, 0, 2);
    grid.draw_char(':', 46, 26, 3, 0);
    grid.draw_box(43, 25, 49, 27, BoxStyle::ThinInset);
}

fn timejump_ok(app: &mut App, dialog: &Dialog) {
    let secs = (dialog.widget_value(0) * 60 + dialog.widget_value(1)).max(0) as u64;
    let (order, row) = app.song.position_at(secs);
    app.set_current_order(order as i32);
    if let Some(pattern) = app.song.pattern_at_order(order) {
        app.set_current_pattern(pattern as i32);
        app.set_current_row(row as i32);
        app.set_page(PageId::PatternEditor);
    }
}

// ── Load / save ───────────────────────────────────────────────────

pub fn save_song_or_save_as(app: &mut App) {
    match app.song.filename.clone() {
        Some(path) => {
            let page = if save_to(app, &path) { PageId::Blank } else { PageId::Log };
            app.set_page(page);
        }
        None => app.set_page(PageId::SaveModule),
    }
}

// a .wav name renders the song instead of saving it
pub fn save_to(app: &mut App, path: &Path) -> bool {
    let is_wav = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("wav"));
    if is_wav {
        return start_disk_writer(app, path.to_path_buf());
    }
    match save_song(path, &app.song) {
        Ok(()) => {
            app.song.filename = Some(path.to_path_buf());
            app.status.flags.remove(StatusFlags::SONG_NEEDS_SAVE);
            app.log(format!("Saved {}", path.display()));
            app.status_text_flash("Saved");
            true
        }
        Err(e) => {
            log::error!("save failed: {e:#}");
            app.log(format!("Error: {e:#}"));
            false
        }
    }
}

pub fn song_load(app: &mut App, path: &Path) {
    app.destroy_all_dialogs();
    if app.status.flags.contains(StatusFlags::SONG_NEEDS_SAVE) {
        let confirm = Dialog::message(
            DialogType::OK_CANCEL,
            UNSAVED,
            DialogAction::LoadSongUnchecked(path.to_path_buf()),
            DialogAction::None,
            1,
        );
        app.push_dialog(confirm);
    } else {
        song_load_unchecked(app, path);
    }
}

pub fn song_load_unchecked(app: &mut App, path: &Path) -> bool {
    match load_song(path) {
        Ok(song) => {
            app.playback.stop();
            app.song = song;
            app.status.flags.remove(StatusFlags::SONG_NEEDS_SAVE);
            app.song_changed();
            if app.status.current_page == PageId::LoadModule {
                app.set_page(PageId::Blank);
            }
            true
        }
        Err(e) => {
            log::error!("load failed: {e:#}");
            app.log(format!("Error: {e:#}"));
            app.set_page(PageId::Log);
            false
        }
    }
}

// ── Disk writer ───────────────────────────────────────────────────

fn start_disk_writer(app: &mut App, path: PathBuf) -> bool {
    if app.disk_writer.is_some() {
        app.status_text_flash("Disk writer already running");
        return false;
    }
    app.playback.stop();
    app.log(format!("Writing {}", path.display()));
    app.disk_writer = Some(DiskWriter::start(path, app.song.layout(), app.song.length()));
    app.status.flags.insert(StatusFlags::DISKWRITER_ACTIVE);
    app.status.need_update();
    true
}

// once per main loop tick
pub fn poll_disk_writer(app: &mut App) {
    let Some(writer) = app.disk_writer.as_mut() else {
        return;
    };
    let mut events = Vec::new();
    while let Some(event) = writer.poll() {
        let done = !matches!(event, DiskWriterEvent::Progress(_));
        events.push(event);
        if done {
            break;
        }
    }
    for event in events {
        match event {
            DiskWriterEvent::Progress(pct) => app.status_text_flash(format!("Writing... {pct}%")),
            DiskWriterEvent::Finished(path) => {
                app.disk_writer = None;
                app.status.flags.remove(StatusFlags::DISKWRITER_ACTIVE);
                app.log(format!("Finished writing {}", path.display()));
                app.status_text_flash("Disk write finished");
            }
            DiskWriterEvent::Failed(msg) => {
                app.disk_writer = None;
                app.status.flags.remove(StatusFlags::DISKWRITER_ACTIVE);
                log::error!("disk writer failed: {msg}");
                app.log(format!("Error: {msg}"));
                app.status_text_flash("Disk write failed");
            }
        }
    }
}
