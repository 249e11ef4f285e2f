// Global shortcuts: keys that work whatever page is up. Checked after the
// page's pre-handler and before the menu, widgets and the page itself.
//
// Mouse (header hot zones) goes to minipop::handle_mouse first.
//
// Always on, even with a dialog open:
//
//   key              mods        when     action
//   Insert           Shift       release  paste clipboard  (text widget focused)
//   Insert           Ctrl        release  copy to clipboard (text widget focused)
//   Enter            Ctrl+Alt    release  toggle fullscreen
//   C                Alt         release  copy to clipboard (text widget focused)
//   V / P            Alt         release  paste clipboard  (text widget focused)
//   M                Ctrl        press    toggle mouse capture
//   E                Ctrl        press    reinitialise the display
//
// Nothing below fires while the disk writer runs. "gated" keys give up
// (unhandled) while any dialog is open.
//
//   key              mods        when     gated  action
//   Q                Ctrl        release  yes    exit prompt
//   N                Ctrl        release  yes    new song dialog
//   G                Ctrl        release  yes    time jump dialog
//   P                Ctrl        release  yes    song length
//   F1               -           press    yes    help
//   F1               Shift       press    yes    midi page
//   F1               Ctrl        press    yes    config page
//   F2               -           press    *      pattern editor; on it: display options,
//                                                or close the open dialog
//   F2               Ctrl        press    *      pattern length (on the pattern editor)
//   F3               -           press    yes    sample list
//   F3               Ctrl        press    yes    sample library
//   F4               -           press    yes    last instrument subpage (unhandled when on one)
//   F4               Ctrl        press    yes    instrument library
//   F5               -           press    page   play if stopped, then info page
//   F5               Shift       release  yes    preferences
//   F5               Ctrl        press    no     play song
//   F6               -           press    no     loop current pattern
//   F6               Shift       press    no     play from current order
//   F7               -           press    no     play from cursor
//   F8               -           press    no     stop
//   F9               -           press    yes    load module
//   F9               Shift       press    yes    song message
//   L / R            Ctrl        release  yes    load module
//   S                Ctrl        release  yes    save, or save as when unnamed
//   W                Ctrl        release  yes    save module
//   F10              -           press    yes    save module
//   F11              -           press    yes    order list panning <-> volumes
//   F11              Ctrl        press    yes    log page, about when on it
//   F11              Alt         press    yes    toggle order list lock
//   F12              -           press    yes    song variables
//   F12              Ctrl        press    yes    palette editor
//   F12              Shift       press    yes    font editor
//   ScrollLock       -           press    yes    toggle playback tracing
//   ScrollLock       Alt         press    yes    toggle midi input
//   F1..F8           Alt         press    yes    toggle mute on channels 1..8

use crate::audio::PlayMode;
use crate::shared::{KeyEvent, KeyMod, KeySym, PageId};
use crate::status::{DialogType, StatusFlags};

use super::app::{App, Cursor};
use super::menu;
use super::minipop;
use super::pages::pattern_editor;
use super::prompts;

pub fn handle_key_global(app: &mut App, k: &KeyEvent) -> bool {
    if minipop::handle_mouse(app, k) {
        return true;
    }
    if k.is_mouse() {
        return false;
    }
    if let Some(handled) = always_on(app, k) {
        return handled;
    }
    if app.status.headless() {
        return false;
    }
    if let Some(handled) = page_and_transport(app, k) {
        return handled;
    }
    channel_mute(app, k)
}

fn alt_only(k: &KeyEvent) -> bool {
    k.alt() && !k.modifiers.intersects(KeyMod::CTRL | KeyMod::SHIFT)
}

fn always_on(app: &mut App, k: &KeyEvent) -> Option<bool> {
    let text = app.focused_accepts_text();
    match k.sym {
        KeySym::Insert if text && k.shift() => {
            if k.released() {
                app.status.flags.insert(StatusFlags::CLIPPY_PASTE_BUFFER);
            }
            Some(true)
        }
        KeySym::Insert if text && k.ctrl() => {
            if k.released() {
                yank(app);
            }
            Some(true)
        }
        KeySym::Enter if k.ctrl() && k.alt() => {
            if k.released() {
                app.fullscreen = !app.fullscreen;
                app.status_text_flash(if app.fullscreen { "Fullscreen on" } else { "Fullscreen off" });
            }
            Some(true)
        }
        KeySym::Char('c') if text && alt_only(k) => {
            if k.released() {
                yank(app);
            }
            Some(true)
        }
        KeySym::Char('v' | 'p') if text && alt_only(k) => {
            if k.released() {
                app.status.flags.insert(StatusFlags::CLIPPY_PASTE_BUFFER);
            }
            Some(true)
        }
        KeySym::Char('m') if k.ctrl() => {
            if k.pressed() {
                app.mouse_captured = !app.mouse_captured;
                let state = if app.mouse_captured { "enabled" } else { "disabled" };
                app.status_text_flash(format!("Mouse capture {state}"));
            }
            Some(true)
        }
        KeySym::Char('e') if k.ctrl() => {
            if k.pressed() {
                app.reinit_requested = true;
                app.status.need_update();
            }
            Some(true)
        }
        _ => None,
    }
}

// ctrl+letter shortcuts act on release and swallow the press
fn ctrl_on_release(app: &mut App, k: &KeyEvent, dialog: bool, action: fn(&mut App)) -> Option<bool> {
    if dialog {
        return Some(false);
    }
    if !k.ctrl() {
        return None;
    }
    if k.released() {
        action(app);
    }
    Some(true)
}

// Some(handled) stops here, None falls through to the channel mutes
fn page_and_transport(app: &mut App, k: &KeyEvent) -> Option<bool> {
    let dialog = !app.status.dialog_type.is_none();
    let page = app.status.current_page;
    let press = k.pressed();
    let plain = k.no_modifier();

    match k.sym {
        KeySym::Char('q') => ctrl_on_release(app, k, dialog, prompts::show_exit_prompt),
        KeySym::Char('n') => ctrl_on_release(app, k, dialog, prompts::new_song_dialog),
        KeySym::Char('g') => ctrl_on_release(app, k, dialog, prompts::show_song_timejump),
        KeySym::Char('p') => ctrl_on_release(app, k, dialog, prompts::show_song_length),
        KeySym::Char('l' | 'r') => ctrl_on_release(app, k, dialog, |app| app.set_page(PageId::LoadModule)),
        KeySym::Char('s') => ctrl_on_release(app, k, dialog, prompts::save_song_or_save_as),
        KeySym::Char('w') => ctrl_on_release(app, k, dialog, |app| app.set_page(PageId::SaveModule)),

        KeySym::F(1) => {
            if dialog {
                return Some(false);
            }
            let target = if k.ctrl() {
                PageId::Config
            } else if k.shift() {
                PageId::Midi
            } else if plain {
                PageId::Help
            } else {
                return None;
            };
            if press {
                app.set_page(target);
            }
            Some(true)
        }
        KeySym::F(2) if k.ctrl() => {
            if page == PageId::PatternEditor {
                if press {
                    pattern_editor::length_edit(app);
                }
                return Some(true);
            }
            if dialog { Some(false) } else { None }
        }
        KeySym::F(2) if plain => {
            if page == PageId::PatternEditor {
                if press {
                    if dialog {
                        app.destroy_all_dialogs();
                        app.status.need_update();
                    } else {
                        pattern_editor::display_options(app);
                    }
                }
            } else {
                if dialog {
                    return Some(false);
                }
                if press {
                    app.set_page(PageId::PatternEditor);
                }
            }
            Some(true)
        }
        KeySym::F(3) => {
            if dialog {
                return Some(false);
            }
            let target = if plain {
                PageId::SampleList
            } else if k.ctrl() {
                PageId::LibrarySample
            } else {
                return None;
            };
            if press {
                app.set_page(target);
            }
            Some(true)
        }
        KeySym::F(4) => {
            if dialog {
                return Some(false);
            }
            if plain {
                // the instrument pages cycle their own subpages
                if page.is_instrument_list() {
                    return Some(false);
                }
                if press {
                    app.set_page(app.last_instrument_page);
                }
                Some(true)
            } else if k.shift() {
                Some(false)
            } else if k.ctrl() {
                if press {
                    app.set_page(PageId::LibraryInstrument);
                }
                Some(true)
            } else {
                None
            }
        }
        KeySym::F(5) => {
            if k.ctrl() {
                if press {
                    play_song(app);
                }
            } else if k.shift() {
                if dialog {
                    return Some(false);
                }
                if k.released() {
                    app.set_page(PageId::Preferences);
                }
            } else if plain {
                let mode = app.playback.mode();
                let restart = mode == PlayMode::STOPPED || (mode == PlayMode::SINGLE_STEP && page == PageId::Info);
                if press && restart {
                    play_song(app);
                }
                if press {
                    if dialog {
                        return Some(false);
                    }
                    app.set_page(PageId::Info);
                }
            } else {
                return None;
            }
            Some(true)
        }
        KeySym::F(6) => {
            if k.shift() {
                if press {
                    play_from_order(app);
                }
            } else if plain {
                if press {
                    play_pattern(app);
                }
            } else {
                return None;
            }
            Some(true)
        }
        KeySym::F(7) if plain => {
            if press {
                play_from_mark(app);
            }
            Some(true)
        }
        KeySym::F(8) if plain => {
            if press {
                stop(app);
            }
            app.status.need_update();
            Some(true)
        }
        KeySym::F(9) => {
            if dialog {
                return Some(false);
            }
            let target = if k.shift() {
                PageId::Message
            } else if plain {
                PageId::LoadModule
            } else {
                return None;
            };
            if press {
                app.set_page(target);
            }
            Some(true)
        }
        KeySym::F(10) => {
            if dialog {
                return Some(false);
            }
            if !plain {
                return None;
            }
            if press {
                app.set_page(PageId::SaveModule);
            }
            Some(true)
        }
        KeySym::F(11) => {
            if dialog {
                return Some(false);
            }
            if plain {
                if press {
                    let target = if page == PageId::OrderListPanning {
                        PageId::OrderListVolumes
                    } else {
                        PageId::OrderListPanning
                    };
                    app.set_page(target);
                }
            } else if k.ctrl() {
                if press {
                    let target = if page == PageId::Log { PageId::About } else { PageId::Log };
                    app.set_page(target);
                }
            } else if press && k.alt() {
                let locked = app.song.toggle_orderlist_locked();
                app.status_text_flash(if locked { "Order list locked" } else { "Order list unlocked" });
            } else {
                return None;
            }
            Some(true)
        }
        KeySym::F(12) => {
            if dialog {
                return Some(false);
            }
            let target = if k.ctrl() {
                PageId::PaletteEditor
            } else if k.shift() {
                PageId::FontEdit
            } else if plain {
                PageId::SongVariables
            } else {
                return None;
            };
            if press {
                app.set_page(target);
            }
            Some(true)
        }
        KeySym::ScrollLock => {
            if dialog {
                return Some(false);
            }
            if k.alt() {
                if press {
                    app.midi_record_disabled = !app.midi_record_disabled;
                    let state = if app.midi_record_disabled { "Disabled" } else { "Enabled" };
                    app.status_text_flash(format!("MIDI Input {state}"));
                }
                Some(true)
            } else if plain {
                if press {
                    app.playback_tracing = !app.playback_tracing;
                    let state = if app.playback_tracing { "enabled" } else { "disabled" };
                    app.status_text_flash(format!("Playback tracing {state}"));
                }
                Some(true)
            } else {
                None
            }
        }
        _ if dialog => Some(false),
        _ => None,
    }
}

fn channel_mute(app: &mut App, k: &KeyEvent) -> bool {
    if !k.alt() {
        return false;
    }
    let KeySym::F(n @ 1..=8) = k.sym else {
        return false;
    };
    if k.released() {
        return true;
    }
    app.song.toggle_channel_mute(n as usize - 1);
    if app.status.current_page == PageId::PatternEditor {
        app.status.need_update();
    }
    true
}

// ── Residual keys ─────────────────────────────────────────────────

// keys nothing else claimed: order skipping, the menu, keypad octave,
// speed and global volume
pub fn handle_residual(app: &mut App, k: &KeyEvent) -> bool {
    if app.status.dialog_type.contains(DialogType::BOX) {
        return false;
    }
    let headless = app.status.headless();
    let page = app.status.current_page;

    match k.sym {
        KeySym::Left | KeySym::Right => {
            if k.released() || headless {
                return true;
            }
            if k.ctrl() && page != PageId::PatternEditor {
                if app.playback.mode() == PlayMode::PLAYING {
                    let order = app.playback.position().order;
                    let target = if k.sym == KeySym::Left { order.saturating_sub(1) } else { order + 1 };
                    app.playback.set_order(target);
                    app.status.need_update();
                }
                return true;
            }
            false
        }
        KeySym::Escape => {
            if headless {
                return true;
            }
            let menu_allowed = k.no_modifier()
                && app.status.dialog_type.is_none()
                && !matches!(page, PageId::LoadSample | PageId::LoadInstrument);
            if !menu_allowed {
                return false;
            }
            if k.pressed() {
                menu::menu_show(app);
            }
            true
        }
        KeySym::Char('/') | KeySym::Char('*') => {
            if k.released() || headless {
                return true;
            }
            match k.orig_sym {
                KeySym::Keypad('/') => app.set_octave(app.octave as i32 - 1),
                KeySym::Keypad('*') => app.set_octave(app.octave as i32 + 1),
                _ => {}
            }
            true
        }
        KeySym::Char(c @ ('[' | ']')) => {
            if k.released() {
                return false;
            }
            if headless {
                return true;
            }
            let delta = if c == '[' { -1 } else { 1 };
            let playing = app.is_playing();
            if k.shift() {
                app.playback.set_speed(app.playback.speed() as i32 + delta);
                let speed = app.playback.speed();
                app.status_text_flash(format!("Speed set to {speed} frames per row"));
                if !playing {
                    app.song.initial_speed = speed;
                    app.time.cache.invalidate();
                }
            } else if k.no_modifier() {
                app.playback.set_global_volume(app.playback.global_volume() as i32 + delta);
                let volume = app.playback.global_volume();
                app.status_text_flash(format!("Global volume set to {volume}"));
                if !playing {
                    app.song.initial_global_volume = volume;
                }
            }
            true
        }
        _ => false,
    }
}

// ── Clipboard ─────────────────────────────────────────────────────

fn yank(app: &mut App) {
    if let Some(w) = app.focused_widget() {
        if w.accepts_text() {
            app.clipboard = w.text().to_string();
            log::debug!("yanked {} chars", app.clipboard.chars().count());
        }
    }
}

// runs after dispatch when a paste key set the flag
pub fn paste(app: &mut App) {
    app.status.flags.remove(StatusFlags::CLIPPY_PASTE_BUFFER);
    if app.clipboard.is_empty() {
        return;
    }
    let text = app.clipboard.clone();
    let pasted = app.focused_widget_mut().filter(|w| w.accepts_text()).is_some_and(|w| w.insert_text(&text));
    if pasted {
        app.status.need_update();
        super::dispatch::notify_widget_change(app, false);
    }
}

// ── Transport ─────────────────────────────────────────────────────

pub fn play_song(app: &mut App) {
    app.playback.set_layout(app.song.layout());
    app.playback.start();
    app.status.need_update();
}

pub fn play_pattern(app: &mut App) {
    app.playback.set_layout(app.song.layout());
    app.playback.loop_pattern(app.cursor.pattern, 0);
    app.status.need_update();
}

pub fn play_from_order(app: &mut App) {
    app.playback.set_layout(app.song.layout());
    app.playback.start_at(app.cursor.order, 0);
    app.status.need_update();
}

// from the cursor position in the pattern editor
pub fn play_from_mark(app: &mut App) {
    app.playback.set_layout(app.song.layout());
    let Cursor { order, pattern, row } = app.cursor;
    match app.song.order_for_pattern(pattern, Some(order)) {
        Some(order) => app.playback.start_at(order, row),
        None => app.playback.loop_pattern(pattern, row),
    }
    app.status.need_update();
}

pub fn stop(app: &mut App) {
    app.playback.stop();
    app.status.need_update();
}
