// Modal dialogs. Dialogs live on a stack in App; the top one owns input.
// Each dialog carries what its outcomes mean as data (DialogAction) so an
// outcome can destroy the dialog first and then run, free to open another.

use std::path::PathBuf;

use crate::shared::{KeyEvent, KeySym};
use crate::status::DialogType;
use crate::tui::grid::{BoxStyle, CellGrid};

use super::app::App;
use super::widget::{Nav, Widget, WidgetRole, draw_widget};
use super::pages::pattern_editor;
use super::{minipop, prompts};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DialogAction {
    #[default]
    None,
    Exit,
    RealExit,
    FontExit,
    NewSong,
    LoadSongUnchecked(PathBuf),
    TimeJump,
    MiniPopFinish,
    PatternLength,
    DisplayOptions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogOutcome {
    Yes,
    No,
    Cancel,
}

// extra keys a dialog understands beyond its widgets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DialogKeys {
    #[default]
    None,
    TimeJump,
}

// what gets drawn inside the box besides the widgets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DialogArt {
    #[default]
    Text,
    NewSong,
    TimeJump,
    MiniPop,
    PatternLength,
    DisplayOptions,
}

#[derive(Clone, Debug)]
pub struct Dialog {
    pub kind: DialogType,
    pub text: String,
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
    pub widgets: Vec<Widget>,
    pub selected_widget: Option<usize>,
    pub on_yes: DialogAction,
    pub on_no: DialogAction,
    pub on_cancel: DialogAction,
    pub keys: DialogKeys,
    pub art: DialogArt,
}

impl Dialog {
    // a text box with the standard buttons for `kind`
    pub fn message(kind: DialogType, text: &str, on_yes: DialogAction, on_no: DialogAction, default_widget: usize) -> Self {
        let text_len = text.chars().count() as u16;
        let w = (text_len.max(22) + 8).min(78);
        let x = (80 - w) / 2;
        let (y, h) = (22, 8);
        let mid = x + w / 2;
        let by = y + 5;

        let widgets = if kind == DialogType::OK {
            vec![Widget::button("OK", mid - 4, by, 8, Nav::stay(0)).with_role(WidgetRole::Yes)]
        } else {
            let (yes, no, no_role) = if kind == DialogType::YES_NO {
                ("Yes", "No", WidgetRole::No)
            } else {
                ("OK", "Cancel", WidgetRole::Cancel)
            };
            vec![
                Widget::button(yes, mid - 12, by, 8, Nav::new(0, 0, 1, 1, 1)).with_role(WidgetRole::Yes),
                Widget::button(no, mid + 4, by, 8, Nav::new(1, 1, 0, 0, 0)).with_role(no_role),
            ]
        };
        let selected = default_widget.min(widgets.len() - 1);
        Self {
            kind,
            text: text.into(),
            x,
            y,
            w,
            h,
            widgets,
            selected_widget: Some(selected),
            on_yes,
            on_no,
            on_cancel: DialogAction::None,
            keys: DialogKeys::None,
            art: DialogArt::Text,
        }
    }

    pub fn custom(x: u16, y: u16, w: u16, h: u16, widgets: Vec<Widget>, selected: usize, art: DialogArt) -> Self {
        Self {
            kind: DialogType::CUSTOM,
            text: String::new(),
            x,
            y,
            w,
            h,
            selected_widget: (selected < widgets.len()).then_some(selected),
            widgets,
            on_yes: DialogAction::None,
            on_no: DialogAction::None,
            on_cancel: DialogAction::None,
            keys: DialogKeys::None,
            art,
        }
    }

    pub fn action_for(&self, outcome: DialogOutcome) -> DialogAction {
        match outcome {
            DialogOutcome::Yes => self.on_yes.clone(),
            DialogOutcome::No => self.on_no.clone(),
            DialogOutcome::Cancel => self.on_cancel.clone(),
        }
    }

    pub fn widget_value(&self, i: usize) -> i32 {
        self.widgets.get(i).map_or(0, Widget::value)
    }
}

pub fn outcome_for_role(role: WidgetRole) -> Option<DialogOutcome> {
    match role {
        WidgetRole::None => None,
        WidgetRole::Yes => Some(DialogOutcome::Yes),
        WidgetRole::No => Some(DialogOutcome::No),
        WidgetRole::Cancel => Some(DialogOutcome::Cancel),
    }
}

// last stop for a key while a dialog box is up
pub fn handle_key(app: &mut App, k: &KeyEvent) -> bool {
    let Some(dialog) = app.dialogs.last() else {
        return false;
    };
    let (kind, keys) = (dialog.kind, dialog.keys);

    if keys == DialogKeys::TimeJump && prompts::timejump_keys(app, k) {
        return true;
    }
    if k.is_mouse() || !k.no_modifier() {
        return false;
    }
    let outcome = match k.sym {
        KeySym::Escape => Some(DialogOutcome::Cancel),
        KeySym::Enter if kind == DialogType::OK => Some(DialogOutcome::Yes),
        KeySym::Char('y') if kind == DialogType::YES_NO => Some(DialogOutcome::Yes),
        KeySym::Char('n') if kind == DialogType::YES_NO => Some(DialogOutcome::No),
        KeySym::Char('o') if kind == DialogType::OK_CANCEL => Some(DialogOutcome::Yes),
        KeySym::Char('c') if kind == DialogType::OK_CANCEL => Some(DialogOutcome::Cancel),
        _ => None,
    };
    let Some(outcome) = outcome else {
        return false;
    };
    if k.pressed() {
        app.dialog_outcome(outcome);
    }
    true
}

// a widget in the top dialog changed or was activated
pub fn widget_event(app: &mut App, i: usize, activated: bool) {
    let Some(d) = app.dialogs.last() else {
        return;
    };
    let Some(w) = d.widgets.get(i) else {
        return;
    };
    let (art, value, role) = (d.art, w.value(), w.role);
    if !activated {
        if art == DialogArt::MiniPop {
            minipop::change(app, value);
        }
        return;
    }
    let outcome = outcome_for_role(role).unwrap_or(DialogOutcome::Yes);
    app.dialog_outcome(outcome);
}

// ── Drawing ───────────────────────────────────────────────────────

pub fn draw_dialogs(app: &App, grid: &mut CellGrid) {
    for dialog in &app.dialogs {
        draw_dialog(app, grid, dialog);
    }
}

fn draw_dialog(app: &App, grid: &mut CellGrid, d: &Dialog) {
    let (x2, y2) = (d.x + d.w - 1, d.y + d.h - 1);
    grid.draw_fill_chars(d.x + 1, d.y + 1, x2 - 1, y2 - 1, 2);
    grid.draw_box(d.x, d.y, x2, y2, BoxStyle::ThickOutset);

    match d.art {
        DialogArt::Text => {
            let len = d.text.chars().count() as u16;
            let tx = d.x + d.w.saturating_sub(len) / 2;
            grid.draw_text(&d.text, tx, d.y + 2, 0, 2);
        }
        DialogArt::NewSong => prompts::draw_new_song(grid),
        DialogArt::TimeJump => prompts::draw_timejump(grid),
        DialogArt::PatternLength | DialogArt::DisplayOptions => pattern_editor::draw_dialog(grid, d),
        DialogArt::MiniPop => minipop::draw(app, grid),
    }

    for (i, w) in d.widgets.iter().enumerate().rev() {
        draw_widget(grid, w, d.selected_widget == Some(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_cancel_has_two_buttons_and_honours_the_default() {
        let d = Dialog::message(DialogType::OK_CANCEL, "Proceed?", DialogAction::RealExit, DialogAction::None, 1);
        assert_eq!(d.widgets.len(), 2);
        assert_eq!(d.selected_widget, Some(1));
        assert_eq!(d.widgets[1].role, WidgetRole::Cancel);
    }

    #[test]
    fn ok_dialog_clamps_the_default_widget() {
        let d = Dialog::message(DialogType::OK, "Total song time:   0:00:00", DialogAction::None, DialogAction::None, 3);
        assert_eq!(d.selected_widget, Some(0));
    }

    #[test]
    fn dialog_box_fits_the_screen() {
        let long = "x".repeat(70);
        let d = Dialog::message(DialogType::OK, &long, DialogAction::None, DialogAction::None, 0);
        assert!(d.x + d.w <= 80);
    }
}
