use crate::shared::HelpIndex;

use crate::ui::page::{NoHooks, PageSlot, PageState};

pub fn register() -> PageSlot {
    PageSlot::new(PageState::new("", HelpIndex::Global), NoHooks)
}
