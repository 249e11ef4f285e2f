// Pages that are reachable from the keyboard and the menu but only show a
// short text: the MIDI screens, the palette editor, the sample and
// instrument browsers, About and the system configuration.

use crate::shared::{HelpIndex, PageId};
use crate::tui::grid::{BoxStyle, CellGrid};

use crate::ui::app::App;
use crate::ui::page::{PageHooks, PageSlot, PageState};

struct Info {
    title: &'static str,
    help: HelpIndex,
    body: &'static [&'static str],
}

fn info(id: PageId) -> Info {
    let (title, help, body): (_, _, &'static [&'static str]) = match id {
        PageId::Midi => ("MIDI Screen (Shift-F1)", HelpIndex::Midi, &["No MIDI ports are configured."]),
        PageId::MidiOutput => ("MIDI Output Configuration", HelpIndex::Midi, &["No MIDI output ports are configured."]),
        PageId::PaletteEditor => (
            "Palette Configuration (Ctrl-F12)",
            HelpIndex::Global,
            &["The palette follows the terminal.", "Use Preferences to invert it."],
        ),
        PageId::LoadSample => ("Load Sample", HelpIndex::Global, &["Sample loading is not available."]),
        PageId::LibrarySample => ("Sample Library (Ctrl-F3)", HelpIndex::Global, &["The sample library is empty."]),
        PageId::LoadInstrument => ("Load Instrument", HelpIndex::Global, &["Instrument loading is not available."]),
        PageId::LibraryInstrument => (
            "Instrument Library (Ctrl-F4)",
            HelpIndex::Global,
            &["The instrument library is empty."],
        ),
        PageId::About => (
            "About tracktty",
            HelpIndex::Copyright,
            &["tracktty", "A tracker front end for the terminal.", "", "Press F1 for help, Escape for the menu."],
        ),
        _ => ("System Configuration (Ctrl-F1)", HelpIndex::Global, &["Settings are kept in config.toml."]),
    };
    Info { title, help, body }
}

struct StaticPage {
    body: &'static [&'static str],
}

impl PageHooks for StaticPage {
    fn draw_const(&mut self, _app: &App, grid: &mut CellGrid) {
        let bottom = 16 + self.body.len() as u16;
        grid.draw_box(10, 14, 69, bottom, BoxStyle::ThickInset);
        for (i, line) in self.body.iter().enumerate() {
            grid.draw_text_len(line, 56, 12, 15 + i as u16, 0, 2);
        }
    }
}

pub fn register(id: PageId) -> PageSlot {
    let Info { title, help, body } = info(id);
    PageSlot::new(PageState::new(title, help), StaticPage { body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn about_and_midi_have_their_own_help_topics() {
        assert_eq!(info(PageId::About).help, HelpIndex::Copyright);
        assert_eq!(info(PageId::Midi).help, HelpIndex::Midi);
        assert_eq!(info(PageId::Config).help, HelpIndex::Global);
    }
}
