// Preferences: classic mode, palette inversion, and the two header
// readouts (time display mode and visualization style).

use crate::shared::{HelpIndex, PageId};
use crate::status::{StatusFlags, TimeDisplay, VisStyle};
use crate::tui::grid::CellGrid;

use crate::ui::app::App;
use crate::ui::page::{PageHooks, PageSlot, PageState};
use crate::ui::widget::{Nav, Widget};

const CLASSIC: usize = 0;
const INVERTED: usize = 1;
const TIME: usize = 2;
const VIS: usize = 3;

fn vis_label(style: VisStyle) -> &'static str {
    match style {
        VisStyle::Off => "Off",
        VisStyle::Memory => "Memory usage",
        VisStyle::Oscilloscope => "Oscilloscope",
        VisStyle::VuMeter => "VU meter",
    }
}

fn load_from_status(app: &mut App) {
    let status = &app.status;
    let classic = status.classic();
    let inverted = status.flags.contains(StatusFlags::INVERTED_PALETTE);
    let time = TimeDisplay::ALL.iter().position(|&t| t == status.time_display).unwrap_or(0) as i32;
    let vis = VisStyle::ALL.iter().position(|&v| v == status.vis_style).unwrap_or(0) as i32;

    let widgets = &mut app.pages.state_mut(PageId::Preferences).widgets;
    widgets[CLASSIC].set_value(classic as i32);
    widgets[INVERTED].set_value(inverted as i32);
    widgets[TIME].set_value(time);
    widgets[VIS].set_value(vis);
}

struct Preferences;

impl PageHooks for Preferences {
    fn draw_const(&mut self, _app: &App, grid: &mut CellGrid) {
        grid.draw_text("Time Display", 6, 20, 0, 2);
        grid.draw_text("Visualization", 5, 22, 0, 2);
    }

    fn predraw(&mut self, app: &App, grid: &mut CellGrid) {
        grid.draw_text_len(app.status.time_display.label(), 20, 40, 20, 5, 0);
        grid.draw_text_len(vis_label(app.status.vis_style), 20, 40, 22, 5, 0);
    }

    fn set_page(&mut self, app: &mut App) {
        load_from_status(app);
    }

    fn widget_changed(&mut self, app: &mut App, index: usize, _activated: bool) {
        let value = app.pages.state(PageId::Preferences).widgets[index].value();
        match index {
            CLASSIC => app.status.flags.set(StatusFlags::CLASSIC_MODE, value != 0),
            INVERTED => app.status.flags.set(StatusFlags::INVERTED_PALETTE, value != 0),
            TIME => {
                if let Some(&mode) = TimeDisplay::ALL.get(value as usize) {
                    app.status.time_display = mode;
                    app.time.cache.invalidate();
                }
            }
            VIS => {
                if let Some(&style) = VisStyle::ALL.get(value as usize) {
                    app.status.vis_style = style;
                }
            }
            _ => return,
        }
        log::debug!("preference {index} set to {value}");
        app.status.need_update();
    }
}

pub fn register() -> PageSlot {
    let last_time = TimeDisplay::ALL.len() as i32 - 1;
    let last_vis = VisStyle::ALL.len() as i32 - 1;
    let widgets = vec![
        Widget::toggle("Classic Mode", false, None, 19, 15, 16, Nav::new(CLASSIC, INVERTED, CLASSIC, INVERTED, INVERTED)),
        Widget::toggle("Inverted Palette", false, None, 19, 17, 16, Nav::new(CLASSIC, TIME, CLASSIC, INVERTED, TIME)),
        Widget::thumb_bar(1, 0, last_time, 19, 20, 16, Nav::new(INVERTED, VIS, TIME, TIME, VIS)),
        Widget::thumb_bar(3, 0, last_vis, 19, 22, 16, Nav::new(TIME, VIS, VIS, VIS, CLASSIC)),
    ];
    let state = PageState::new("Preferences (Shift-F5)", HelpIndex::Global).with_widgets(widgets, CLASSIC);
    PageSlot::new(state, Preferences)
}
