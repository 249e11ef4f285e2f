// Order list, in its panning and volume flavours. The list itself is the
// same on both; the right hand side only differs in its heading. Typing
// digits shifts a pattern number into the current entry, '+' and '-' write
// the skip and end markers, Insert/Delete shift the list.

use crate::shared::{HelpIndex, KeyEvent, KeySym, MAX_PATTERNS, ORDER_LAST, ORDER_SKIP, PageId};
use crate::status::StatusFlags;
use crate::tui::grid::{BoxStyle, CellGrid};

use crate::ui::app::App;
use crate::ui::page::{PageHooks, PageSlot, PageState};

const LIST_TOP: u16 = 15;
const VISIBLE: usize = 32;
const MAX_ORDERS: usize = 256;

fn order_label(value: Option<u8>) -> String {
    match value {
        Some(ORDER_SKIP) => "+++".into(),
        Some(ORDER_LAST) | None => "---".into(),
        Some(p) => format!("{p:03}"),
    }
}

// writes `value` at `order`, padding with end markers
fn set_entry(orders: &mut Vec<u8>, order: usize, value: u8) {
    if order >= MAX_ORDERS {
        return;
    }
    if orders.len() <= order {
        orders.resize(order + 1, ORDER_LAST);
    }
    orders[order] = value;
}

fn insert_entry(orders: &mut Vec<u8>, order: usize) {
    if order >= orders.len() {
        return;
    }
    orders.insert(order, ORDER_LAST);
    orders.truncate(MAX_ORDERS);
}

fn delete_entry(orders: &mut Vec<u8>, order: usize) {
    if order < orders.len() {
        orders.remove(order);
    }
}

enum Edit {
    Move(i32),
    Digit(u8),
    Write(u8),
    Insert,
    Delete,
    Play,
}

fn classify(k: &KeyEvent, order: usize) -> Option<Edit> {
    if k.ctrl() || k.alt() {
        return None;
    }
    let order = order as i32;
    let edit = match k.sym {
        KeySym::Up => Edit::Move(order - 1),
        KeySym::Down => Edit::Move(order + 1),
        KeySym::PageUp => Edit::Move(order - 16),
        KeySym::PageDown => Edit::Move(order + 16),
        KeySym::Home => Edit::Move(0),
        KeySym::End => Edit::Move(MAX_ORDERS as i32 - 1),
        KeySym::Enter => Edit::Play,
        KeySym::Insert => Edit::Insert,
        KeySym::Delete => Edit::Delete,
        KeySym::Char(c @ '0'..='9') => Edit::Digit(c as u8 - b'0'),
        KeySym::Char('+') => Edit::Write(ORDER_SKIP),
        KeySym::Char('-' | '.') => Edit::Write(ORDER_LAST),
        _ => return None,
    };
    Some(edit)
}

struct OrderList {
    id: PageId,
}

impl PageHooks for OrderList {
    fn draw_const(&mut self, _app: &App, grid: &mut CellGrid) {
        grid.draw_box(5, LIST_TOP - 1, 9, LIST_TOP + VISIBLE as u16, BoxStyle::ThickInset);
        grid.draw_box(19, LIST_TOP - 1, 78, LIST_TOP + VISIBLE as u16, BoxStyle::ThickInset);
        let heading = if self.id == PageId::OrderListVolumes { "Volume" } else { "Panning" };
        grid.draw_text(heading, 20, LIST_TOP - 2, 0, 2);
    }

    fn predraw(&mut self, app: &App, grid: &mut CellGrid) {
        let orders = &app.song.orderlist;
        let current = app.cursor.order;
        let first = current.saturating_sub(VISIBLE - 1);
        let playing = app.is_playing().then(|| app.playback.position().order);

        for (line, order) in (first..MAX_ORDERS).take(VISIBLE).enumerate() {
            let y = LIST_TOP + line as u16;
            let fg = if playing == Some(order) { 3 } else { 0 };
            grid.draw_text(&format!("{order:03}"), 1, y, fg, 2);
            let bg = if order == current { 14 } else { 0 };
            grid.draw_text_len(&order_label(orders.get(order).copied()), 3, 6, y, 6, bg);
        }

        for ch in 0..VISIBLE {
            let muted = app.song.channel_mute.get(ch).copied().unwrap_or(false);
            let y = LIST_TOP + ch as u16;
            grid.draw_text(&format!("Channel {:02}", ch + 1), 20, y, 0, 2);
            grid.draw_text_len(if muted { "Muted" } else { "" }, 8, 32, y, 1, 0);
        }

        let lock = if app.song.orderlist_locked { "Locked" } else { "" };
        grid.draw_text_len(lock, 6, 2, LIST_TOP + VISIBLE as u16 + 1, 3, 2);
    }

    fn handle_key(&mut self, app: &mut App, k: &KeyEvent) -> bool {
        let order = app.cursor.order;
        let Some(edit) = classify(k, order) else {
            return false;
        };
        if k.released() {
            return true;
        }

        let editing = !matches!(edit, Edit::Move(_) | Edit::Play);
        if editing && app.song.orderlist_locked {
            app.status_text_flash("Order list locked");
            return true;
        }

        match edit {
            Edit::Move(target) => {
                app.cursor.order = target.clamp(0, MAX_ORDERS as i32 - 1) as usize;
                app.status.need_update();
                return true;
            }
            Edit::Play => {
                if let Some(pattern) = app.song.pattern_at_order(order) {
                    app.set_current_pattern(pattern as i32);
                    app.set_page(PageId::PatternEditor);
                }
                return true;
            }
            Edit::Digit(d) => {
                let old = app.song.orderlist.get(order).copied().filter(|&p| (p as usize) < MAX_PATTERNS);
                let shifted = (old.unwrap_or(0) as usize % 100) * 10 + d as usize;
                let value = if shifted < MAX_PATTERNS { shifted } else { d as usize };
                set_entry(&mut app.song.orderlist, order, value as u8);
            }
            Edit::Write(marker) => set_entry(&mut app.song.orderlist, order, marker),
            Edit::Insert => insert_entry(&mut app.song.orderlist, order),
            Edit::Delete => delete_entry(&mut app.song.orderlist, order),
        }

        app.status.flags.insert(StatusFlags::SONG_NEEDS_SAVE);
        app.time.cache.invalidate();
        if !app.is_playing() {
            app.playback.set_layout(app.song.layout());
        }
        app.status.need_update();
        true
    }
}

pub fn register(id: PageId) -> PageSlot {
    let title = match id {
        PageId::OrderListVolumes => "Order List and Channel Volume (F11)",
        _ => "Order List and Panning (F11)",
    };
    PageSlot::new(PageState::new(title, HelpIndex::OrderList), OrderList { id })
}
