// Widgets: the focusable elements a page or dialog declares. Focus moves
// along explicit nav links (indices into the owner's widget vec), the same
// way for pages and dialogs. Only text entries accept free text, which is
// what gates the composition machines.

use crate::shared::{KeyEvent, KeySym, MouseKind};
use crate::tui::grid::{BoxStyle, CellGrid};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Nav {
    pub up: usize,
    pub down: usize,
    pub left: usize,
    pub right: usize,
    pub tab: usize,
    pub backtab: usize,
}

impl Nav {
    pub fn new(up: usize, down: usize, left: usize, right: usize, tab: usize) -> Self {
        Self { up, down, left, right, tab, backtab: left }
    }

    // every link points back at the widget itself
    pub fn stay(i: usize) -> Self {
        Self::new(i, i, i, i, i)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum WidgetKind {
    Button { label: String },
    Toggle { label: String, state: bool, group: Option<u8> },
    NumEntry { value: i32, min: i32, max: i32, reverse: bool, cursor: usize },
    ThumbBar { value: i32, min: i32, max: i32 },
    TextEntry { text: String, max_len: usize, cursor: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidgetRole {
    #[default]
    None,
    Yes,
    No,
    Cancel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Widget {
    pub kind: WidgetKind,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub nav: Nav,
    pub role: WidgetRole, // what activating it means inside a dialog
}

impl Widget {
    fn new(kind: WidgetKind, x: u16, y: u16, width: u16, nav: Nav) -> Self {
        Self { kind, x, y, width, nav, role: WidgetRole::None }
    }

    pub fn button(label: &str, x: u16, y: u16, width: u16, nav: Nav) -> Self {
        Self::new(WidgetKind::Button { label: label.into() }, x, y, width, nav)
    }

    pub fn toggle(label: &str, state: bool, group: Option<u8>, x: u16, y: u16, width: u16, nav: Nav) -> Self {
        Self::new(WidgetKind::Toggle { label: label.into(), state, group }, x, y, width, nav)
    }

    pub fn num_entry(value: i32, min: i32, max: i32, x: u16, y: u16, width: u16, nav: Nav) -> Self {
        let value = value.clamp(min, max);
        Self::new(WidgetKind::NumEntry { value, min, max, reverse: false, cursor: 0 }, x, y, width, nav)
    }

    pub fn thumb_bar(value: i32, min: i32, max: i32, x: u16, y: u16, width: u16, nav: Nav) -> Self {
        let max = max.max(min);
        let value = value.clamp(min, max);
        Self::new(WidgetKind::ThumbBar { value, min, max }, x, y, width, nav)
    }

    pub fn text_entry(text: &str, max_len: usize, x: u16, y: u16, width: u16, nav: Nav) -> Self {
        let text: String = text.chars().take(max_len).collect();
        let cursor = text.chars().count();
        Self::new(WidgetKind::TextEntry { text, max_len, cursor }, x, y, width, nav)
    }

    pub fn with_role(mut self, role: WidgetRole) -> Self {
        self.role = role;
        self
    }

    pub fn reversed(mut self) -> Self {
        if let WidgetKind::NumEntry { reverse, .. } = &mut self.kind {
            *reverse = true;
        }
        self
    }

    pub fn accepts_text(&self) -> bool {
        matches!(self.kind, WidgetKind::TextEntry { .. })
    }

    pub fn value(&self) -> i32 {
        match &self.kind {
            WidgetKind::NumEntry { value, .. } | WidgetKind::ThumbBar { value, .. } => *value,
            WidgetKind::Toggle { state, .. } => *state as i32,
            _ => 0,
        }
    }

    pub fn set_value(&mut self, v: i32) {
        match &mut self.kind {
            WidgetKind::NumEntry { value, min, max, .. } | WidgetKind::ThumbBar { value, min, max } => {
                *value = v.clamp(*min, *max);
            }
            WidgetKind::Toggle { state, .. } => *state = v != 0,
            _ => {}
        }
    }

    pub fn text(&self) -> &str {
        match &self.kind {
            WidgetKind::TextEntry { text, .. } => text,
            _ => "",
        }
    }

    pub fn set_text(&mut self, s: &str) {
        if let WidgetKind::TextEntry { text, max_len, cursor } = &mut self.kind {
            *text = s.chars().take(*max_len).collect();
            *cursor = text.chars().count();
        }
    }

    // pastes at the caret, as much as fits
    pub fn insert_text(&mut self, s: &str) -> bool {
        let WidgetKind::TextEntry { text, max_len, cursor } = &mut self.kind else {
            return false;
        };
        let mut chars: Vec<char> = text.chars().collect();
        let room = max_len.saturating_sub(chars.len());
        let incoming: Vec<char> = s.chars().filter(|c| !c.is_control()).take(room).collect();
        let at = (*cursor).min(chars.len());
        chars.splice(at..at, incoming.iter().copied());
        *cursor = at + incoming.len();
        *text = chars.into_iter().collect();
        !incoming.is_empty()
    }

    fn contains(&self, x: u16, y: u16) -> bool {
        y == self.y && x >= self.x && x < self.x + self.width.max(1)
    }
}

// radio groups: turning one member on turns the rest of its group off
pub fn toggle_set(widgets: &mut [Widget], i: usize, on: bool) {
    let group = match widgets.get(i).map(|w| &w.kind) {
        Some(WidgetKind::Toggle { group, .. }) => *group,
        _ => return,
    };
    for (j, w) in widgets.iter_mut().enumerate() {
        if let WidgetKind::Toggle { state, group: g, .. } = &mut w.kind {
            if j == i {
                *state = on || group.is_some();
            } else if group.is_some() && *g == group {
                *state = false;
            }
        }
    }
}

// ── Focus / navigation ────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusResult {
    Unhandled,
    Consumed,
    Moved,
    Changed(usize),
    Activated(usize),
}

impl FocusResult {
    pub fn handled(self) -> bool {
        self != FocusResult::Unhandled
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Op {
    Focus(usize),
    Activate,
    Toggle,
    Digit(i32),
    Backspace,
    Step(i32),
    SetValue(i32),
    Insert(char),
    Delete,
    Caret(isize),
    CaretTo(usize),
}

pub fn handle_focus_key(widgets: &mut [Widget], selected: &mut Option<usize>, k: &KeyEvent) -> FocusResult {
    if k.is_mouse() {
        return handle_mouse(widgets, selected, k);
    }
    let Some(i) = selected.filter(|&i| i < widgets.len()) else {
        return FocusResult::Unhandled;
    };
    let Some(op) = classify(&widgets[i], k) else {
        return FocusResult::Unhandled;
    };
    if k.released() {
        return FocusResult::Consumed;
    }
    apply(widgets, selected, i, op)
}

fn classify(w: &Widget, k: &KeyEvent) -> Option<Op> {
    let plain = k.no_modifier();
    let nav = |target: usize| Some(Op::Focus(target));

    // keys the widget itself wants come first
    match &w.kind {
        WidgetKind::ThumbBar { min, max, .. } => {
            let mul = if k.ctrl() { 4 } else { 1 };
            match k.sym {
                KeySym::Left if !k.alt() => return Some(Op::Step(-mul)),
                KeySym::Right if !k.alt() => return Some(Op::Step(mul)),
                KeySym::Home if plain => return Some(Op::SetValue(*min)),
                KeySym::End if plain => return Some(Op::SetValue(*max)),
                _ => {}
            }
        }
        WidgetKind::NumEntry { value, .. } => match k.sym {
            KeySym::Char(c) | KeySym::Keypad(c) if plain && c.is_ascii_digit() => {
                return Some(Op::Digit(c as i32 - '0' as i32));
            }
            KeySym::Char('+') | KeySym::Keypad('+') if !k.ctrl() => return Some(Op::Step(1)),
            KeySym::Char('-') | KeySym::Keypad('-') if !k.ctrl() => return Some(Op::Step(-1)),
            // an empty entry lets backspace through to the owner
            KeySym::Backspace if plain && *value != 0 => return Some(Op::Backspace),
            _ => {}
        },
        WidgetKind::TextEntry { .. } => {
            match k.sym {
                KeySym::Backspace if plain => return Some(Op::Backspace),
                KeySym::Delete if plain => return Some(Op::Delete),
                KeySym::Left if plain => return Some(Op::Caret(-1)),
                KeySym::Right if plain => return Some(Op::Caret(1)),
                KeySym::Home if plain => return Some(Op::CaretTo(0)),
                KeySym::End if plain => return Some(Op::CaretTo(usize::MAX)),
                _ => {}
            }
            if let Some(c) = k.unicode {
                if !k.ctrl() && !k.alt() && !c.is_control() {
                    return Some(Op::Insert(c));
                }
            }
        }
        WidgetKind::Button { .. } | WidgetKind::Toggle { .. } => {}
    }

    match k.sym {
        KeySym::Up if plain => nav(w.nav.up),
        KeySym::Down if plain => nav(w.nav.down),
        KeySym::Left if plain => nav(w.nav.left),
        KeySym::Right if plain => nav(w.nav.right),
        KeySym::Tab if plain => nav(w.nav.tab),
        KeySym::Tab if k.shift() && !k.ctrl() && !k.alt() => nav(w.nav.backtab),
        KeySym::Enter if plain => match w.kind {
            WidgetKind::Toggle { .. } => Some(Op::Toggle),
            _ => Some(Op::Activate),
        },
        KeySym::Char(' ') if plain => match w.kind {
            WidgetKind::Button { .. } => Some(Op::Activate),
            WidgetKind::Toggle { .. } => Some(Op::Toggle),
            _ => None,
        },
        _ => None,
    }
}

fn apply(widgets: &mut [Widget], selected: &mut Option<usize>, i: usize, op: Op) -> FocusResult {
    match op {
        Op::Focus(target) => {
            if target == i || target >= widgets.len() {
                return FocusResult::Consumed;
            }
            *selected = Some(target);
            FocusResult::Moved
        }
        Op::Activate => FocusResult::Activated(i),
        Op::Toggle => {
            let on = widgets[i].value() == 0;
            toggle_set(widgets, i, on);
            FocusResult::Changed(i)
        }
        op => {
            let before = widgets[i].kind.clone();
            edit(&mut widgets[i], op);
            if widgets[i].kind == before { FocusResult::Consumed } else { FocusResult::Changed(i) }
        }
    }
}

fn edit(w: &mut Widget, op: Op) {
    let width = w.width as u32;
    match (&mut w.kind, op) {
        (WidgetKind::NumEntry { value, min, max, reverse, cursor }, Op::Digit(d)) => {
            let limit = 10i32.saturating_pow(width.max(1));
            let next = if *reverse {
                (*value * 10 + d) % limit
            } else {
                // overwrite the digit under the cursor, then step right
                let text = format!("{:0>w$}", (*value).max(0), w = width as usize);
                let mut digits: Vec<u8> = text.into_bytes();
                let at = (*cursor).min(digits.len().saturating_sub(1));
                digits[at] = b'0' + d as u8;
                *cursor = (at + 1).min(digits.len().saturating_sub(1));
                String::from_utf8_lossy(&digits).parse().unwrap_or(*value)
            };
            *value = next.clamp(*min, *max);
        }
        (WidgetKind::NumEntry { value, min, max, cursor, .. }, Op::Backspace) => {
            *value = (*value / 10).clamp(*min, *max);
            *cursor = cursor.saturating_sub(1);
        }
        (WidgetKind::NumEntry { value, min, max, .. } | WidgetKind::ThumbBar { value, min, max }, Op::Step(d)) => {
            *value = (*value + d).clamp(*min, *max);
        }
        (WidgetKind::ThumbBar { value, min, max }, Op::SetValue(v)) => {
            *value = v.clamp(*min, *max);
        }
        (WidgetKind::TextEntry { text, max_len, cursor }, op) => {
            let mut chars: Vec<char> = text.chars().collect();
            let at = (*cursor).min(chars.len());
            match op {
                Op::Insert(c) if chars.len() < *max_len => {
                    chars.insert(at, c);
                    *cursor = at + 1;
                }
                Op::Backspace if at > 0 => {
                    chars.remove(at - 1);
                    *cursor = at - 1;
                }
                Op::Delete if at < chars.len() => {
                    chars.remove(at);
                }
                Op::Caret(d) => *cursor = at.saturating_add_signed(d).min(chars.len()),
                Op::CaretTo(to) => *cursor = to.min(chars.len()),
                _ => {}
            }
            *text = chars.into_iter().collect();
        }
        _ => {}
    }
}

fn handle_mouse(widgets: &mut [Widget], selected: &mut Option<usize>, k: &KeyEvent) -> FocusResult {
    if k.mouse == MouseKind::None {
        return FocusResult::Unhandled;
    }
    let Some(i) = widgets.iter().position(|w| w.contains(k.x, k.y)) else {
        return FocusResult::Unhandled;
    };
    if k.released() {
        return FocusResult::Consumed;
    }
    *selected = Some(i);
    match widgets[i].kind.clone() {
        WidgetKind::ThumbBar { min, max, .. } => {
            let w = &mut widgets[i];
            let span = w.width.saturating_sub(1).max(1) as i32;
            let offset = (k.x - w.x) as i32;
            w.set_value(min + (max - min) * offset / span);
            FocusResult::Changed(i)
        }
        WidgetKind::Button { .. } => FocusResult::Activated(i),
        WidgetKind::Toggle { .. } => {
            let on = widgets[i].value() == 0;
            toggle_set(widgets, i, on);
            FocusResult::Changed(i)
        }
        _ => FocusResult::Moved,
    }
}

// ── Drawing ───────────────────────────────────────────────────────

pub fn draw_widget(grid: &mut CellGrid, w: &Widget, selected: bool) {
    match &w.kind {
        WidgetKind::Button { label } => {
            let style = if selected { BoxStyle::ThinInset } else { BoxStyle::ThinOutset };
            grid.draw_box(w.x.saturating_sub(1), w.y.saturating_sub(1), w.x + w.width, w.y + 1, style);
            let pad = (w.width as usize).saturating_sub(label.chars().count()) / 2;
            grid.draw_text_len(&format!("{:pad$}{label}", ""), w.width as usize, w.x, w.y, if selected { 3 } else { 0 }, 2);
        }
        WidgetKind::Toggle { label, state, .. } => {
            let style = if *state { BoxStyle::ThinInset } else { BoxStyle::ThinOutset };
            grid.draw_box(w.x.saturating_sub(1), w.y.saturating_sub(1), w.x + w.width, w.y + 1, style);
            let pad = (w.width as usize).saturating_sub(label.chars().count()) / 2;
            grid.draw_text_len(&format!("{:pad$}{label}", ""), w.width as usize, w.x, w.y, if selected { 3 } else { 0 }, 2);
        }
        WidgetKind::NumEntry { value, cursor, reverse, .. } => {
            let text = format!("{value:0>width$}", width = w.width as usize);
            grid.draw_text_len(&text, w.width as usize, w.x, w.y, 2, 0);
            if selected {
                let at = if *reverse { w.width.saturating_sub(1) } else { *cursor as u16 };
                let ch = text.chars().nth(at as usize).unwrap_or(' ');
                grid.draw_char(ch, w.x + at, w.y, 0, 3);
            }
        }
        WidgetKind::ThumbBar { value, min, max } => {
            grid.draw_thumb_bar(w.x, w.y, w.width, *min, *max, *value, selected);
        }
        WidgetKind::TextEntry { text, cursor, .. } => {
            // scroll so the caret stays visible
            let width = w.width as usize;
            let first = cursor.saturating_sub(width.saturating_sub(1));
            let visible: String = text.chars().skip(first).collect();
            grid.draw_text_len(&visible, width, w.x, w.y, 2, 0);
            if selected {
                let at = (cursor - first) as u16;
                let ch = text.chars().nth(*cursor).unwrap_or(' ');
                grid.draw_char(ch, w.x + at, w.y, 0, 3);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{KeyMod, KeyState};

    fn form() -> Vec<Widget> {
        vec![
            Widget::text_entry("ab", 8, 10, 10, 8, Nav::new(0, 1, 0, 0, 1)),
            Widget::thumb_bar(5, 0, 10, 10, 12, 11, Nav::new(0, 2, 1, 1, 2)),
            Widget::button("OK", 10, 14, 8, Nav::new(1, 2, 2, 2, 0)),
        ]
    }

    fn press(sym: KeySym) -> KeyEvent {
        KeyEvent::press(sym)
    }

    #[test]
    fn arrows_follow_nav_links() {
        let mut w = form();
        let mut sel = Some(0);
        assert_eq!(handle_focus_key(&mut w, &mut sel, &press(KeySym::Down)), FocusResult::Moved);
        assert_eq!(sel, Some(1));
        assert_eq!(handle_focus_key(&mut w, &mut sel, &press(KeySym::Tab)), FocusResult::Moved);
        assert_eq!(sel, Some(2));
    }

    #[test]
    fn release_of_a_handled_key_is_consumed_without_effect() {
        let mut w = form();
        let mut sel = Some(0);
        assert_eq!(handle_focus_key(&mut w, &mut sel, &KeyEvent::release(KeySym::Down)), FocusResult::Consumed);
        assert_eq!(sel, Some(0));
    }

    #[test]
    fn text_entry_edits_at_the_caret() {
        let mut w = form();
        let mut sel = Some(0);
        handle_focus_key(&mut w, &mut sel, &press(KeySym::Home));
        let typed = KeyEvent::character('X', KeyMod::SHIFT, KeyState::Pressed);
        assert_eq!(handle_focus_key(&mut w, &mut sel, &typed), FocusResult::Changed(0));
        assert_eq!(w[0].text(), "Xab");
        handle_focus_key(&mut w, &mut sel, &press(KeySym::Delete));
        assert_eq!(w[0].text(), "Xb");
    }

    #[test]
    fn synthetic_characters_reach_the_text_entry() {
        let mut w = form();
        let mut sel = Some(0);
        assert_eq!(handle_focus_key(&mut w, &mut sel, &KeyEvent::synthetic('æ')), FocusResult::Changed(0));
        assert_eq!(w[0].text(), "abæ");
    }

    #[test]
    fn thumb_bar_steps_and_clamps() {
        let mut w = form();
        let mut sel = Some(1);
        handle_focus_key(&mut w, &mut sel, &press(KeySym::Right));
        assert_eq!(w[1].value(), 6);
        let ctrl_right = KeyEvent::key(KeySym::Right, KeyMod::CTRL, KeyState::Pressed);
        handle_focus_key(&mut w, &mut sel, &ctrl_right);
        assert_eq!(w[1].value(), 10);
        assert_eq!(handle_focus_key(&mut w, &mut sel, &press(KeySym::Right)), FocusResult::Consumed);
    }

    #[test]
    fn clicking_a_thumb_bar_focuses_and_sets_it() {
        let mut w = form();
        let mut sel = Some(0);
        let click = KeyEvent::mouse(MouseKind::Click, 20, 12, KeyState::Pressed);
        assert_eq!(handle_focus_key(&mut w, &mut sel, &click), FocusResult::Changed(1));
        assert_eq!(sel, Some(1));
        assert_eq!(w[1].value(), 10);
    }

    #[test]
    fn enter_activates_buttons() {
        let mut w = form();
        let mut sel = Some(2);
        assert_eq!(handle_focus_key(&mut w, &mut sel, &press(KeySym::Enter)), FocusResult::Activated(2));
    }

    #[test]
    fn reverse_num_entry_shifts_digits_in() {
        let mut w = vec![Widget::num_entry(0, 0, 59, 0, 0, 2, Nav::stay(0)).reversed()];
        let mut sel = Some(0);
        handle_focus_key(&mut w, &mut sel, &press(KeySym::Char('4')));
        handle_focus_key(&mut w, &mut sel, &press(KeySym::Char('2')));
        assert_eq!(w[0].value(), 42);
        handle_focus_key(&mut w, &mut sel, &press(KeySym::Char('7')));
        assert_eq!(w[0].value(), 27);
    }

    #[test]
    fn empty_num_entry_lets_backspace_through() {
        let mut w = vec![Widget::num_entry(0, 0, 59, 0, 0, 2, Nav::stay(0))];
        let mut sel = Some(0);
        assert_eq!(handle_focus_key(&mut w, &mut sel, &press(KeySym::Backspace)), FocusResult::Unhandled);
    }

    #[test]
    fn radio_group_keeps_one_member_on() {
        let mut w = vec![
            Widget::toggle("Keep", true, Some(0), 0, 0, 6, Nav::new(0, 0, 1, 1, 1)),
            Widget::toggle("Clear", false, Some(0), 8, 0, 7, Nav::new(1, 1, 0, 0, 0)),
        ];
        toggle_set(&mut w, 1, true);
        assert_eq!((w[0].value(), w[1].value()), (0, 1));
    }
}
