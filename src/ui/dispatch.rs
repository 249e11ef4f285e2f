// The key dispatch chain. Every terminal event enters through
// process_event; the first layer that claims it stops it:
//
//   1. text composition (digraph, ctrl+shift unicode, alt+numpad)
//   2. the page's pre-handler
//   3. global shortcuts and header hot zones
//   4. the main menu
//   5. widget focus and editing
//   6. residual global keys
//   7. the open dialog box, or else the page's own handler
//
// Characters produced by composition are replayed from the top as a
// synthetic press/release pair, after the machines have been reset.

use crate::shared::{KeyEvent, KeyState};
use crate::status::{DialogType, StatusFlags};

use super::app::{App, WidgetOwner};
use super::compose::Outcome;
use super::dialog;
use super::global;
use super::menu;
use super::widget::{FocusResult, handle_focus_key};

// which layer took the event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handled {
    Composition,
    PreHandler,
    Global,
    Menu,
    Widget,
    Residual,
    Dialog,
    Page,
    Unhandled,
}

impl Handled {
    pub fn consumed(self) -> bool {
        self != Handled::Unhandled
    }
}

pub fn process_event(app: &mut App, k: &KeyEvent) -> Handled {
    let handled = handle_key(app, k);
    if app.status.flags.contains(StatusFlags::CLIPPY_PASTE_BUFFER) {
        global::paste(app);
    }
    handled
}

pub fn handle_key(app: &mut App, k: &KeyEvent) -> Handled {
    if app.focused_accepts_text() {
        let step = app.composer.feed(k, app.status.classic());
        if let Some(text) = step.flash {
            app.status_text_flash(text);
        }
        match step.outcome {
            Outcome::Pass => {}
            Outcome::Swallow => return Handled::Composition,
            Outcome::Replay(c) => {
                replay(app, c);
                return Handled::Composition;
            }
        }
    } else {
        app.composer.reset();
    }

    let headless = app.status.headless();
    let page = app.status.current_page;
    if !headless && app.with_page_hooks(page, false, |hooks, app| hooks.pre_handle_key(app, k)) {
        return Handled::PreHandler;
    }

    if global::handle_key_global(app, k) {
        return Handled::Global;
    }
    if !headless && menu::menu_handle_key(app, k) {
        return Handled::Menu;
    }
    if handle_widget_key(app, k) {
        return Handled::Widget;
    }
    if global::handle_residual(app, k) {
        return Handled::Residual;
    }

    if app.status.dialog_type.contains(DialogType::BOX) {
        return if dialog::handle_key(app, k) { Handled::Dialog } else { Handled::Unhandled };
    }
    if headless {
        return Handled::Unhandled;
    }
    let page = app.status.current_page;
    if app.with_page_hooks(page, false, |hooks, app| hooks.handle_key(app, k)) {
        Handled::Page
    } else {
        Handled::Unhandled
    }
}

fn replay(app: &mut App, c: char) {
    app.composer.reset();
    let press = KeyEvent::synthetic(c);
    let release = KeyEvent { state: KeyState::Released, ..press.clone() };
    handle_key(app, &press);
    handle_key(app, &release);
}

fn handle_widget_key(app: &mut App, k: &KeyEvent) -> bool {
    let (widgets, selected) = app.active_widgets_mut();
    match handle_focus_key(widgets, selected, k) {
        FocusResult::Unhandled => false,
        FocusResult::Consumed => true,
        FocusResult::Moved => {
            if !app.focused_accepts_text() {
                app.composer.reset();
            }
            app.status.need_update();
            true
        }
        FocusResult::Changed(i) => {
            widget_event(app, i, false);
            true
        }
        FocusResult::Activated(i) => {
            widget_event(app, i, true);
            true
        }
    }
}

// tells the owner of widget `i` that it changed or was activated
fn widget_event(app: &mut App, i: usize, activated: bool) {
    app.status.need_update();
    match app.active {
        WidgetOwner::Dialog => dialog::widget_event(app, i, activated),
        WidgetOwner::Page(id) => app.with_page_hooks(id, (), |hooks, app| hooks.widget_changed(app, i, activated)),
    }
}

// the focused widget changed from outside the focus handler (paste)
pub fn notify_widget_change(app: &mut App, activated: bool) {
    let (_, selected) = app.active_widgets();
    if let Some(i) = selected {
        widget_event(app, i, activated);
    }
}
