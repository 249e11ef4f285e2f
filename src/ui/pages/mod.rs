// The page set. Each module hands back the slot for its page(s); the table
// is filled once, in PageId::ALL order.

mod blank;
mod file;
mod font_edit;
mod help;
mod info;
mod instrument_list;
mod log_page;
mod message;
mod orderlist;
pub mod pattern_editor;
mod preferences;
mod sample_list;
mod song_vars;
mod static_page;

use crate::shared::{KeyEvent, KeySym, PageId};

use super::app::App;
use super::page::PageTable;

pub fn load_pages() -> PageTable {
    PageTable::build(|id| match id {
        PageId::Blank => blank::register(),
        PageId::Help => help::register(),
        PageId::PatternEditor => pattern_editor::register(),
        PageId::SampleList => sample_list::register(),
        PageId::InstrumentListGeneral
        | PageId::InstrumentListVolume
        | PageId::InstrumentListPanning
        | PageId::InstrumentListPitch => instrument_list::register(id),
        PageId::Info => info::register(),
        PageId::Preferences => preferences::register(),
        PageId::FontEdit => font_edit::register(),
        PageId::LoadModule | PageId::SaveModule => file::register(id),
        PageId::OrderListPanning | PageId::OrderListVolumes => orderlist::register(id),
        PageId::SongVariables => song_vars::register(),
        PageId::Message => message::register(),
        PageId::Log => log_page::register(),
        PageId::Midi
        | PageId::MidiOutput
        | PageId::PaletteEditor
        | PageId::LoadSample
        | PageId::LibrarySample
        | PageId::LoadInstrument
        | PageId::LibraryInstrument
        | PageId::About
        | PageId::Config => static_page::register(id),
    })
}

// escape back to wherever we came from; the pre-handler runs before the
// residual escape that would open the menu
fn escape_to_previous(app: &mut App, k: &KeyEvent) -> bool {
    if k.sym != KeySym::Escape || !k.no_modifier() || !app.status.dialog_type.is_none() {
        return false;
    }
    if k.pressed() {
        let previous = app.status.previous_page;
        app.set_page(previous);
    }
    true
}
