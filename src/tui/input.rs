use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyEventState, KeyModifiers, ModifierKeyCode, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::shared::{KeyEvent, KeyMod, KeyState, KeySym, MouseKind};

const DOUBLE_CLICK: Duration = Duration::from_millis(400);

#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Key(KeyEvent),
    Resize,
}

// state local to the terminal side: whether the terminal reports key
// releases, and the last click for double-click detection
#[derive(Clone, Debug, Default)]
pub struct InputState {
    pub reports_release: bool,
    last_click: Option<(Instant, u16, u16)>,
}

impl InputState {
    pub fn new(reports_release: bool) -> Self {
        Self { reports_release, last_click: None }
    }
}

// poll for input from the terminal and translate it into tracker key events
pub fn poll_input(timeout: Duration, state: &mut InputState) -> anyhow::Result<Vec<Input>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }
    let ev = event::read()?;
    Ok(translate(&ev, state, Instant::now()))
}

pub fn translate(ev: &Event, state: &mut InputState, now: Instant) -> Vec<Input> {
    match ev {
        Event::Key(key) => translate_key(key, state),
        Event::Mouse(mouse) => translate_mouse(mouse, state, now).into_iter().map(Input::Key).collect(),
        Event::Resize(..) => vec![Input::Resize],
        _ => vec![],
    }
}

fn modifiers(m: KeyModifiers) -> KeyMod {
    let mut out = KeyMod::empty();
    out.set(KeyMod::SHIFT, m.contains(KeyModifiers::SHIFT));
    out.set(KeyMod::CTRL, m.contains(KeyModifiers::CONTROL));
    out.set(KeyMod::ALT, m.contains(KeyModifiers::ALT));
    out.set(KeyMod::META, m.intersects(KeyModifiers::META | KeyModifiers::SUPER));
    out
}

fn modifier_sym(code: ModifierKeyCode) -> Option<KeySym> {
    let sym = match code {
        ModifierKeyCode::LeftControl => KeySym::LCtrl,
        ModifierKeyCode::RightControl => KeySym::RCtrl,
        ModifierKeyCode::LeftShift => KeySym::LShift,
        ModifierKeyCode::RightShift => KeySym::RShift,
        ModifierKeyCode::LeftAlt => KeySym::LAlt,
        ModifierKeyCode::RightAlt => KeySym::RAlt,
        ModifierKeyCode::LeftMeta | ModifierKeyCode::LeftSuper => KeySym::LMeta,
        ModifierKeyCode::RightMeta | ModifierKeyCode::RightSuper => KeySym::RMeta,
        _ => return None,
    };
    Some(sym)
}

fn translate_key(key: &event::KeyEvent, state: &InputState) -> Vec<Input> {
    let key_state = match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => KeyState::Pressed,
        KeyEventKind::Release => KeyState::Released,
    };
    let mut mods = modifiers(key.modifiers);
    let keypad = key.state.contains(KeyEventState::KEYPAD);

    let ev = match key.code {
        // shifted brackets arrive as braces; the tracker wants the bracket plus shift
        KeyCode::Char('{') => KeyEvent::character('[', mods | KeyMod::SHIFT, key_state),
        KeyCode::Char('}') => KeyEvent::character(']', mods | KeyMod::SHIFT, key_state),
        KeyCode::Char(c) if keypad && matches!(c, '0'..='9' | '/' | '*' | '-' | '+' | '.') => {
            KeyEvent::character(c, mods, key_state).with_orig(KeySym::Keypad(c))
        }
        KeyCode::Char(c) => KeyEvent::character(c, mods, key_state),
        KeyCode::Enter if keypad => KeyEvent::key(KeySym::Enter, mods, key_state).with_orig(KeySym::Keypad('\n')),
        KeyCode::Modifier(code) => {
            let Some(sym) = modifier_sym(code) else {
                return vec![];
            };
            // the modifier's own bit is down while it is pressed
            match sym {
                KeySym::LCtrl | KeySym::RCtrl => mods.set(KeyMod::CTRL, key_state == KeyState::Pressed),
                KeySym::LShift | KeySym::RShift => mods.set(KeyMod::SHIFT, key_state == KeyState::Pressed),
                _ => {}
            }
            KeyEvent::key(sym, mods, key_state)
        }
        code => {
            let sym = match code {
                KeyCode::F(n) => KeySym::F(n),
                KeyCode::Left => KeySym::Left,
                KeyCode::Right => KeySym::Right,
                KeyCode::Up => KeySym::Up,
                KeyCode::Down => KeySym::Down,
                KeyCode::Home => KeySym::Home,
                KeyCode::End => KeySym::End,
                KeyCode::PageUp => KeySym::PageUp,
                KeyCode::PageDown => KeySym::PageDown,
                KeyCode::Tab => KeySym::Tab,
                KeyCode::BackTab => {
                    mods.insert(KeyMod::SHIFT);
                    KeySym::Tab
                }
                KeyCode::Enter => KeySym::Enter,
                KeyCode::Esc => KeySym::Escape,
                KeyCode::Backspace => KeySym::Backspace,
                KeyCode::Delete => KeySym::Delete,
                KeyCode::Insert => KeySym::Insert,
                KeyCode::ScrollLock => KeySym::ScrollLock,
                _ => return vec![],
            };
            KeyEvent::key(sym, mods, key_state)
        }
    };

    // terminals without release reporting get a release right behind the press
    if !state.reports_release && key.kind == KeyEventKind::Press {
        let release = KeyEvent { state: KeyState::Released, ..ev.clone() };
        return vec![Input::Key(ev), Input::Key(release)];
    }
    vec![Input::Key(ev)]
}

fn translate_mouse(mouse: &MouseEvent, state: &mut InputState, now: Instant) -> Option<KeyEvent> {
    let (x, y) = (mouse.column, mouse.row);
    let mut ev = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let double = matches!(state.last_click,
                Some((at, lx, ly)) if (lx, ly) == (x, y) && now.duration_since(at) < DOUBLE_CLICK);
            if double {
                state.last_click = None;
                KeyEvent::mouse(MouseKind::DoubleClick, x, y, KeyState::Pressed)
            } else {
                state.last_click = Some((now, x, y));
                KeyEvent::mouse(MouseKind::Click, x, y, KeyState::Pressed)
            }
        }
        MouseEventKind::Up(MouseButton::Left) => KeyEvent::mouse(MouseKind::Click, x, y, KeyState::Released),
        _ => return None,
    };
    ev.modifiers = modifiers(mouse.modifiers);
    Some(ev)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(inputs: Vec<Input>) -> Vec<KeyEvent> {
        inputs
            .into_iter()
            .filter_map(|i| match i {
                Input::Key(k) => Some(k),
                Input::Resize => None,
            })
            .collect()
    }

    fn press(code: KeyCode, m: KeyModifiers, kstate: KeyEventState, state: &mut InputState) -> Vec<KeyEvent> {
        let ev = Event::Key(event::KeyEvent::new_with_kind_and_state(code, m, KeyEventKind::Press, kstate));
        keys(translate(&ev, state, Instant::now()))
    }

    fn reporting() -> InputState {
        InputState::new(true)
    }

    #[test]
    fn letters_get_a_lowercase_sym_and_keep_the_glyph() {
        let out = press(KeyCode::Char('Q'), KeyModifiers::SHIFT, KeyEventState::NONE, &mut reporting());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sym, KeySym::Char('q'));
        assert_eq!(out[0].unicode, Some('Q'));
        assert!(out[0].shift());
    }

    #[test]
    fn braces_become_shifted_brackets() {
        let out = press(KeyCode::Char('{'), KeyModifiers::SHIFT, KeyEventState::NONE, &mut reporting());
        assert_eq!(out[0].sym, KeySym::Char('['));
        assert!(out[0].shift());
    }

    #[test]
    fn keypad_keys_keep_their_origin() {
        let out = press(KeyCode::Char('/'), KeyModifiers::NONE, KeyEventState::KEYPAD, &mut reporting());
        assert_eq!(out[0].sym, KeySym::Char('/'));
        assert_eq!(out[0].orig_sym, KeySym::Keypad('/'));
        assert_eq!(out[0].keypad_digit(), None);

        let out = press(KeyCode::Char('7'), KeyModifiers::ALT, KeyEventState::KEYPAD, &mut reporting());
        assert_eq!(out[0].keypad_digit(), Some(7));
    }

    #[test]
    fn presses_get_a_synthetic_release_without_reporting() {
        let out = press(KeyCode::F(5), KeyModifiers::NONE, KeyEventState::NONE, &mut InputState::default());
        assert_eq!(out.len(), 2);
        assert!(out[0].pressed());
        assert!(out[1].released());
        assert_eq!(out[1].sym, KeySym::F(5));
    }

    #[test]
    fn backtab_is_shift_tab() {
        let out = press(KeyCode::BackTab, KeyModifiers::NONE, KeyEventState::NONE, &mut reporting());
        assert_eq!(out[0].sym, KeySym::Tab);
        assert!(out[0].shift());
    }

    #[test]
    fn second_click_in_time_on_the_same_cell_is_a_double_click() {
        let mut state = InputState::default();
        let click = |state: &mut InputState, at: Instant, x: u16| {
            let ev = Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: x,
                row: 4,
                modifiers: KeyModifiers::NONE,
            });
            keys(translate(&ev, state, at)).remove(0).mouse
        };
        let t0 = Instant::now();
        assert_eq!(click(&mut state, t0, 12), MouseKind::Click);
        assert_eq!(click(&mut state, t0 + Duration::from_millis(200), 12), MouseKind::DoubleClick);
        assert_eq!(click(&mut state, t0 + Duration::from_millis(300), 12), MouseKind::Click);
        assert_eq!(click(&mut state, t0 + Duration::from_millis(900), 12), MouseKind::Click);
        assert_eq!(click(&mut state, t0 + Duration::from_millis(950), 13), MouseKind::Click);
    }
}
