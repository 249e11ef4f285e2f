// Page registry. One slot per PageId, filled once at startup by the page
// modules' registration functions. A slot is plain data (title, widgets,
// focus, help topic) plus an optional set of hooks.

use crate::shared::{HelpIndex, KeyEvent, PageId};
use crate::status::DialogType;
use crate::tui::grid::CellGrid;

use super::app::{App, VideoMode, WidgetOwner};
use super::menu;
use super::widget::Widget;

// Every hook is optional. A page that wants the whole screen returns true
// from claims_full_draw and gets draw_full instead of the standard chrome.
pub trait PageHooks {
    fn claims_full_draw(&self) -> bool {
        false
    }

    fn draw_full(&mut self, _app: &App, _grid: &mut CellGrid) {}

    // static art drawn under the widgets
    fn draw_const(&mut self, _app: &App, _grid: &mut CellGrid) {}

    // live content drawn after the header, before the widgets
    fn predraw(&mut self, _app: &App, _grid: &mut CellGrid) {}

    fn set_page(&mut self, _app: &mut App) {}

    fn pre_handle_key(&mut self, _app: &mut App, _k: &KeyEvent) -> bool {
        false
    }

    fn handle_key(&mut self, _app: &mut App, _k: &KeyEvent) -> bool {
        false
    }

    fn playback_update(&mut self, _app: &mut App) {}

    fn song_changed(&mut self, _app: &mut App) {}

    // a widget on this page changed value (`activated` for buttons)
    fn widget_changed(&mut self, _app: &mut App, _index: usize, _activated: bool) {}
}

#[derive(Clone, Debug)]
pub struct PageState {
    pub title: &'static str,
    pub widgets: Vec<Widget>,
    pub selected_widget: Option<usize>,
    pub help_index: HelpIndex,
}

impl PageState {
    pub fn new(title: &'static str, help_index: HelpIndex) -> Self {
        Self { title, widgets: Vec::new(), selected_widget: None, help_index }
    }

    pub fn with_widgets(mut self, widgets: Vec<Widget>, selected: usize) -> Self {
        self.selected_widget = (selected < widgets.len()).then_some(selected);
        self.widgets = widgets;
        self
    }
}

pub struct PageSlot {
    pub state: PageState,
    // None only while checked out by App::with_page_hooks
    hooks: Option<Box<dyn PageHooks>>,
}

impl PageSlot {
    pub fn new(state: PageState, hooks: impl PageHooks + 'static) -> Self {
        Self { state, hooks: Some(Box::new(hooks)) }
    }
}

// hooks for pages that are nothing but a title and a widget table
pub struct NoHooks;

impl PageHooks for NoHooks {}

pub struct PageTable {
    slots: Vec<PageSlot>,
}

impl PageTable {
    // `register` is called for every PageId in registration order
    pub fn build(mut register: impl FnMut(PageId) -> PageSlot) -> Self {
        Self { slots: PageId::ALL.iter().map(|&id| register(id)).collect() }
    }

    pub fn state(&self, id: PageId) -> &PageState {
        &self.slots[id.index()].state
    }

    pub fn state_mut(&mut self, id: PageId) -> &mut PageState {
        &mut self.slots[id.index()].state
    }

    pub(super) fn take_hooks(&mut self, id: PageId) -> Option<Box<dyn PageHooks>> {
        self.slots[id.index()].hooks.take()
    }

    pub(super) fn put_hooks(&mut self, id: PageId, hooks: Box<dyn PageHooks>) {
        self.slots[id.index()].hooks = Some(hooks);
    }
}

impl App {
    pub fn set_page(&mut self, new_page: PageId) {
        self.video_mode = VideoMode::Default;

        let current = self.status.current_page;
        if new_page != current {
            self.status.previous_page = current;
        }
        self.status.current_page = new_page;
        log::debug!("set_page {current:?} -> {new_page:?}");

        if new_page != PageId::Help {
            self.status.current_help_index = self.pages.state(new_page).help_index;
        }

        self.sync_sample_instrument();

        if new_page.is_instrument_list() {
            self.current_instrument = self.current_instrument.max(1);
        } else if new_page == PageId::SampleList {
            self.current_sample = self.current_sample.max(1);
        }

        if self.status.dialog_type.contains(DialogType::MENU) {
            menu::menu_hide(self);
        } else if !self.status.dialog_type.is_none() {
            return;
        }

        self.active = WidgetOwner::Page(new_page);
        self.with_page_hooks(new_page, (), |hooks, app| hooks.set_page(app));
        self.status.need_update();
    }
}
