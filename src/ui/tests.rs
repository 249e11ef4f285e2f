// Whole-app scenarios: synthetic key events through the full dispatch
// chain, no terminal and no audio device.

use proptest::prelude::*;

use crate::audio::Playback;
use crate::pipeline::song::Song;
use crate::shared::{KeyEvent, KeyMod, KeyState, KeySym, PageId};
use crate::status::{DialogType, StatusFlags};

use super::app::{App, WidgetOwner};
use super::dispatch::{Handled, handle_key, process_event};
use super::prompts;

fn app() -> App {
    App::new(Song::default(), Playback::new(1000))
}

fn key(sym: KeySym, mods: KeyMod, state: KeyState) -> KeyEvent {
    KeyEvent::key(sym, mods, state)
}

// press then release, returns what took the press
fn tap(app: &mut App, sym: KeySym, mods: KeyMod) -> Handled {
    let handled = handle_key(app, &key(sym, mods, KeyState::Pressed));
    handle_key(app, &key(sym, mods, KeyState::Released));
    handled
}

fn type_char(app: &mut App, c: char) {
    handle_key(app, &KeyEvent::character(c, KeyMod::empty(), KeyState::Pressed));
    handle_key(app, &KeyEvent::character(c, KeyMod::empty(), KeyState::Released));
}

fn focused_text(app: &App) -> String {
    app.focused_widget().map(|w| w.text().to_string()).unwrap_or_default()
}

// ── Page switching ────────────────────────────────────────────────

proptest! {
    #[test]
    fn set_page_back_to_previous_is_an_inverse(
        a in prop::sample::select(PageId::ALL.to_vec()),
        b in prop::sample::select(PageId::ALL.to_vec()),
    ) {
        prop_assume!(a != b);
        let mut app = app();
        app.set_page(a);
        app.set_page(b);
        prop_assert_eq!(app.status.previous_page, a);

        let previous = app.status.previous_page;
        app.set_page(previous);
        prop_assert_eq!(app.status.current_page, a);
        prop_assert_eq!(app.status.previous_page, b);
        prop_assert_eq!(app.active, WidgetOwner::Page(a));
    }
}

#[test]
fn sample_list_never_shows_slot_zero() {
    let mut app = app();
    assert_eq!(app.current_sample, 0);
    app.status.take_update();
    app.set_page(PageId::SampleList);
    assert_eq!(app.current_sample, 1);
    assert_eq!(app.active, WidgetOwner::Page(PageId::SampleList));
    assert!(app.status.flags.contains(StatusFlags::NEED_UPDATE));

    app.set_page(PageId::InstrumentListGeneral);
    assert_eq!(app.current_instrument, 1);
}

#[test]
fn help_topic_follows_the_page_but_not_the_help_page() {
    let mut app = app();
    app.set_page(PageId::OrderListPanning);
    let topic = app.status.current_help_index;
    app.set_page(PageId::Help);
    assert_eq!(app.status.current_help_index, topic);
}

#[test]
fn an_open_dialog_keeps_focus_across_set_page() {
    let mut app = app();
    app.song.title = "kept".into();
    prompts::show_song_length(&mut app);
    app.set_page(PageId::SongVariables);

    assert_eq!(app.status.current_page, PageId::SongVariables);
    assert_eq!(app.active, WidgetOwner::Dialog);
    // the page's entry hook did not run
    assert_eq!(app.pages.state(PageId::SongVariables).widgets[0].text(), "");
}

#[test]
fn an_ok_cancel_prompt_holds_focus_across_set_page() {
    let mut app = app();
    prompts::show_exit_prompt(&mut app);
    assert!(app.status.dialog_type.contains(DialogType::OK_CANCEL));
    app.status.take_update();

    app.set_page(PageId::Info);
    assert_eq!(app.status.current_page, PageId::Info);
    assert_eq!(app.active, WidgetOwner::Dialog);
    assert_eq!(app.dialogs.len(), 1);
    assert!(!app.status.flags.contains(StatusFlags::NEED_UPDATE));
}

#[test]
fn set_page_closes_the_menu() {
    let mut app = app();
    assert_eq!(tap(&mut app, KeySym::Escape, KeyMod::empty()), Handled::Residual);
    assert!(app.status.dialog_type.contains(DialogType::MENU));

    app.set_page(PageId::Info);
    assert!(app.status.dialog_type.is_none());
    assert_eq!(app.active, WidgetOwner::Page(PageId::Info));
}

// ── Global keys ───────────────────────────────────────────────────

#[test]
fn ctrl_q_twice_opens_a_single_prompt() {
    let mut app = app();
    assert_eq!(tap(&mut app, KeySym::Char('q'), KeyMod::CTRL), Handled::Global);
    assert_eq!(app.dialogs.len(), 1);

    tap(&mut app, KeySym::Char('q'), KeyMod::CTRL);
    assert_eq!(app.dialogs.len(), 1);
    assert!(app.status.dialog_type.contains(DialogType::OK_CANCEL));
}

#[test]
fn function_keys_switch_pages() {
    let mut app = app();
    let steps = [
        (KeySym::F(3), KeyMod::empty(), PageId::SampleList),
        (KeySym::F(9), KeyMod::empty(), PageId::LoadModule),
        (KeySym::F(9), KeyMod::SHIFT, PageId::Message),
        (KeySym::F(11), KeyMod::empty(), PageId::OrderListPanning),
        (KeySym::F(11), KeyMod::empty(), PageId::OrderListVolumes),
        (KeySym::F(11), KeyMod::CTRL, PageId::Log),
        (KeySym::F(11), KeyMod::CTRL, PageId::About),
        (KeySym::F(12), KeyMod::empty(), PageId::SongVariables),
        (KeySym::F(12), KeyMod::SHIFT, PageId::FontEdit),
        (KeySym::F(1), KeyMod::SHIFT, PageId::Midi),
        (KeySym::F(10), KeyMod::empty(), PageId::SaveModule),
    ];
    for (sym, mods, page) in steps {
        tap(&mut app, sym, mods);
        assert_eq!(app.status.current_page, page, "{sym:?} {mods:?}");
    }
}

#[test]
fn shift_f5_acts_on_release() {
    let mut app = app();
    handle_key(&mut app, &key(KeySym::F(5), KeyMod::SHIFT, KeyState::Pressed));
    assert_eq!(app.status.current_page, PageId::Blank);
    handle_key(&mut app, &key(KeySym::F(5), KeyMod::SHIFT, KeyState::Released));
    assert_eq!(app.status.current_page, PageId::Preferences);
}

#[test]
fn alt_f_keys_toggle_channel_mutes() {
    let mut app = app();
    assert_eq!(tap(&mut app, KeySym::F(1), KeyMod::ALT), Handled::Global);
    tap(&mut app, KeySym::F(3), KeyMod::ALT);
    assert_eq!(&app.song.channel_mute[..4], &[true, false, true, false]);
    tap(&mut app, KeySym::F(1), KeyMod::ALT);
    assert!(!app.song.channel_mute[0]);
}

#[test]
fn alt_f11_locks_the_order_list() {
    let mut app = app();
    tap(&mut app, KeySym::F(11), KeyMod::ALT);
    assert!(app.song.orderlist_locked);
    assert_eq!(app.flash_text(), Some("Order list locked"));
}

#[test]
fn headless_mode_ignores_page_keys() {
    let mut app = app();
    app.status.flags.insert(StatusFlags::DISKWRITER_ACTIVE);
    assert_eq!(tap(&mut app, KeySym::F(3), KeyMod::empty()), Handled::Unhandled);
    assert_eq!(app.status.current_page, PageId::Blank);
    // escape is swallowed instead of opening the menu
    assert_eq!(tap(&mut app, KeySym::Escape, KeyMod::empty()), Handled::Residual);
    assert!(app.status.dialog_type.is_none());
}

// ── Residual keys ─────────────────────────────────────────────────

#[test]
fn brackets_adjust_global_volume_and_speed() {
    let mut app = app();
    let handled = handle_key(&mut app, &KeyEvent::character('[', KeyMod::empty(), KeyState::Pressed));
    assert_eq!(handled, Handled::Residual);
    assert_eq!(app.playback.global_volume(), 127);
    assert_eq!(app.song.initial_global_volume, 127);
    assert_eq!(app.flash_text(), Some("Global volume set to 127"));

    handle_key(&mut app, &KeyEvent::character(']', KeyMod::SHIFT, KeyState::Pressed));
    assert_eq!(app.playback.speed(), 7);
    assert_eq!(app.song.initial_speed, 7);
}

#[test]
fn residual_keys_stand_down_under_a_dialog_box() {
    let mut app = app();
    prompts::show_song_length(&mut app);
    let handled = handle_key(&mut app, &KeyEvent::character('[', KeyMod::empty(), KeyState::Pressed));
    assert_ne!(handled, Handled::Residual);
    assert_eq!(app.playback.global_volume(), 128);
}

#[test]
fn keypad_slash_and_star_change_the_octave() {
    let mut app = app();
    let slash = KeyEvent::character('/', KeyMod::empty(), KeyState::Pressed).with_orig(KeySym::Keypad('/'));
    handle_key(&mut app, &slash);
    assert_eq!(app.octave, 3);
    let star = KeyEvent::character('*', KeyMod::empty(), KeyState::Pressed).with_orig(KeySym::Keypad('*'));
    handle_key(&mut app, &star);
    handle_key(&mut app, &star);
    assert_eq!(app.octave, 5);
}

// ── Text entry ────────────────────────────────────────────────────

#[test]
fn digraph_lands_in_the_file_name_entry() {
    let mut app = app();
    app.set_page(PageId::SaveModule);
    for _ in 0..2 {
        handle_key(&mut app, &key(KeySym::LCtrl, KeyMod::CTRL, KeyState::Pressed));
        handle_key(&mut app, &key(KeySym::LCtrl, KeyMod::empty(), KeyState::Released));
    }
    type_char(&mut app, 'a');
    type_char(&mut app, 'e');
    assert_eq!(focused_text(&app), "æ");
}

#[test]
fn yank_and_paste_through_the_clipboard() {
    let mut app = app();
    app.set_page(PageId::SaveModule);
    for c in "abc".chars() {
        type_char(&mut app, c);
    }
    tap(&mut app, KeySym::Insert, KeyMod::CTRL);
    assert_eq!(app.clipboard, "abc");

    if let Some(w) = app.focused_widget_mut() {
        w.set_text("");
    }
    process_event(&mut app, &key(KeySym::Insert, KeyMod::SHIFT, KeyState::Pressed));
    process_event(&mut app, &key(KeySym::Insert, KeyMod::SHIFT, KeyState::Released));
    assert_eq!(focused_text(&app), "abc");
    assert!(!app.status.flags.contains(StatusFlags::CLIPPY_PASTE_BUFFER));
}

#[test]
fn clipboard_keys_need_a_text_widget() {
    let mut app = app();
    app.clipboard = "abc".into();
    process_event(&mut app, &key(KeySym::Insert, KeyMod::SHIFT, KeyState::Released));
    assert!(!app.status.flags.contains(StatusFlags::CLIPPY_PASTE_BUFFER));
}
