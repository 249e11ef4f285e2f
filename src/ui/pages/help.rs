// Help viewer. Shows the topic the last page left in current_help_index,
// scrolled with the arrow keys.

use crate::shared::{HelpIndex, KeyEvent, KeySym};
use crate::tui::grid::{BoxStyle, CellGrid};

use crate::ui::app::App;
use crate::ui::page::{PageHooks, PageSlot, PageState};

const VISIBLE: usize = 33;

const GLOBAL: &[&str] = &[
    "Global Keys.",
    "  F1            Help (context sensitive!)",
    "  F2            Pattern editor / options",
    "  F3            Sample list",
    "  F4            Instrument list",
    "  F5            Play information / song",
    "  F6            Play current pattern",
    "  Shift-F6      Play song from current order",
    "  F7            Play from mark / current row",
    "  F8            Stop playback",
    "  F9            Load module",
    "  Shift-F9      Message editor",
    "  F10           Save module",
    "  F11           Order list and panning",
    "  2*F11         Order list and channel volume",
    "  Ctrl-F11      Message log",
    "  Alt-F11       Lock/unlock order list",
    "  F12           Song variables",
    "  Ctrl-F12      Palette configuration",
    "",
    "  Ctrl-N        New song",
    "  Ctrl-S        Save current song",
    "  Ctrl-P        Calculate song length",
    "  Ctrl-G        Jump to time",
    "  Ctrl-Q        Quit",
    "",
    "  Alt-F1..F8    Toggle channels 1-8",
    "  ScrollLock    Toggle playback tracing",
    "  [ ]           Decrease/increase global volume",
    "  Shift-[ ]     Decrease/increase playback speed",
    "  Keypad / *    Decrease/increase octave",
    "",
    "Text entry.",
    "  Ctrl Ctrl a b          Digraph",
    "  Ctrl-Shift + hex       Unicode character",
    "  Alt + keypad digits    DOS/ASCII character",
    "  Ctrl-Ins / Alt-C       Copy",
    "  Shift-Ins / Alt-V      Paste",
];

const PATTERN: &[&str] = &[
    "Pattern Edit Keys.",
    "  Up/Down       Move up/down a row",
    "  PgUp/PgDn     Move up/down 16 rows",
    "  Home/End      First/last row",
    "  + / -         Next/previous pattern",
    "  Ctrl-F2       Set pattern length",
    "  F2            Pattern editor options",
];

const SAMPLES: &[&str] = &[
    "Sample List Keys.",
    "  Up/Down       Select sample",
    "  PgUp/PgDn     Move 16 samples",
    "  Typing        Edit the sample name",
];

const INSTRUMENTS: &[&str] = &[
    "Instrument List Keys.",
    "  Up/Down       Select instrument",
    "  F4            Cycle instrument subpages",
    "  Typing        Edit the instrument name",
];

const INFO: &[&str] = &["Info Page.", "  Shows the playback state and channel mutes."];

const ORDERS: &[&str] = &[
    "Order Keys.",
    "  Up/Down       Move through the order list",
    "  Enter         Edit the pattern at the cursor",
    "  Insert        Insert an order",
    "  Delete        Delete an order",
    "  Alt-F11       Lock/unlock the order list",
];

const MESSAGE: &[&str] = &["Message Editor.", "  Shows the song message."];

const MIDI: &[&str] = &["MIDI.", "  MIDI configuration is not available."];

const COPYRIGHT: &[&str] = &["tracktty", "", "A character-cell music tracker front end."];

fn topic(index: HelpIndex) -> &'static [&'static str] {
    match index {
        HelpIndex::Global => GLOBAL,
        HelpIndex::PatternEditor => PATTERN,
        HelpIndex::SampleList => SAMPLES,
        HelpIndex::InstrumentList => INSTRUMENTS,
        HelpIndex::Info => INFO,
        HelpIndex::OrderList => ORDERS,
        HelpIndex::Message => MESSAGE,
        HelpIndex::Midi => MIDI,
        HelpIndex::Copyright => COPYRIGHT,
    }
}

// the page topic first, then the global keys
fn lines(index: HelpIndex) -> Vec<&'static str> {
    let mut out = topic(index).to_vec();
    if index != HelpIndex::Global {
        out.push("");
        out.extend_from_slice(GLOBAL);
    }
    out
}

#[derive(Default)]
struct Help {
    top: usize,
}

impl PageHooks for Help {
    fn draw_const(&mut self, _app: &App, grid: &mut CellGrid) {
        grid.draw_box(1, 12, 78, 46, BoxStyle::ThickInset);
        grid.draw_fill_chars(2, 13, 77, 45, 0);
    }

    fn predraw(&mut self, app: &App, grid: &mut CellGrid) {
        for (i, line) in lines(app.status.current_help_index).iter().skip(self.top).take(VISIBLE).enumerate() {
            grid.draw_text_len(line, 76, 2, 13 + i as u16, 6, 0);
        }
    }

    fn set_page(&mut self, _app: &mut App) {
        self.top = 0;
    }

    fn pre_handle_key(&mut self, app: &mut App, k: &KeyEvent) -> bool {
        super::escape_to_previous(app, k)
    }

    fn handle_key(&mut self, app: &mut App, k: &KeyEvent) -> bool {
        if !k.no_modifier() {
            return false;
        }
        let last = lines(app.status.current_help_index).len().saturating_sub(VISIBLE);
        let top = match k.sym {
            KeySym::Up => self.top.saturating_sub(1),
            KeySym::Down => self.top + 1,
            KeySym::PageUp => self.top.saturating_sub(VISIBLE),
            KeySym::PageDown => self.top + VISIBLE,
            KeySym::Home => 0,
            KeySym::End => last,
            _ => return false,
        };
        if k.pressed() {
            self.top = top.min(last);
            app.status.need_update();
        }
        true
    }
}

pub fn register() -> PageSlot {
    PageSlot::new(PageState::new("Help", HelpIndex::Global), Help::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Playback;
    use crate::pipeline::song::Song;
    use crate::shared::PageId;
    use crate::ui::dispatch::{Handled, handle_key};

    #[test]
    fn help_shows_the_topic_of_the_page_it_was_opened_from() {
        let mut app = App::new(Song::default(), Playback::new(1000));
        app.set_page(PageId::SampleList);
        app.set_page(PageId::Help);
        assert_eq!(app.status.current_help_index, HelpIndex::SampleList);
        assert_eq!(lines(app.status.current_help_index)[0], "Sample List Keys.");
    }

    #[test]
    fn escape_goes_back_instead_of_opening_the_menu() {
        let mut app = App::new(Song::default(), Playback::new(1000));
        app.set_page(PageId::Info);
        app.set_page(PageId::Help);
        assert_eq!(handle_key(&mut app, &KeyEvent::press(KeySym::Escape)), Handled::PreHandler);
        assert_eq!(app.status.current_page, PageId::Info);
        assert!(app.status.dialog_type.is_none());
    }
}
