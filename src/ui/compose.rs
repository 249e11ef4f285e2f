// Text composition: three small machines that turn modifier sequences into
// one typed character while a text entry has focus.
//
//   digraph      Ctrl tapped twice (released twice, nothing in between),
//                then two characters -> one glyph from the digraph table
//   unicode      Ctrl+Shift held, up to four hex digits, release either
//                modifier -> that codepoint, if CP437 has it
//   alt+numpad   Alt held, keypad digits, release Alt -> CP437 byte
//
// Every machine is fed every event. A key a machine does not expect moves it
// to Blocked (or Idle) without touching the other two. Digits are swallowed on
// press and counted on release so the release never leaks to a widget.
//
// `feed` is pure with respect to the rest of the app: the caller decides what
// to do with a replayed character and where to show the flash text.

use crate::shared::{KeyEvent, KeyMod};

use super::charset::{char_digraph, cp437_to_char, unicode_to_cp437};

const MAX_HEX_DIGITS: u32 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Digraph {
    #[default]
    Idle,
    Blocked,
    Tapped,
    Armed { first: Option<char> },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Accumulator {
    #[default]
    Idle,
    Blocked,
    Accumulating { value: u32, digits: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Swallow,
    Replay(char),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub outcome: Outcome,
    pub flash: Option<String>,
}

impl Step {
    fn pass(flash: Option<String>) -> Self {
        Self { outcome: Outcome::Pass, flash }
    }

    fn swallow(flash: Option<String>) -> Self {
        Self { outcome: Outcome::Swallow, flash }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Composer {
    pub digraph: Digraph,
    pub unicode: Accumulator,
    pub alt_numpad: Accumulator,
}

impl Composer {
    // focus left a text entry (or never was on one)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    pub fn feed(&mut self, k: &KeyEvent, classic: bool) -> Step {
        let mut flash = None;
        if let Some(step) = self.feed_digraph(k, classic, &mut flash) {
            return step;
        }
        if let Some(step) = self.feed_unicode(k, classic) {
            return step;
        }
        if let Some(step) = self.feed_alt_numpad(k, classic) {
            return step;
        }
        Step::pass(flash)
    }

    // ── Digraph ───────────────────────────────────────────────────

    fn feed_digraph(&mut self, k: &KeyEvent, classic: bool, flash: &mut Option<String>) -> Option<Step> {
        if !classic && k.sym.is_ctrl() {
            if k.released() {
                self.digraph = match self.digraph {
                    Digraph::Idle => Digraph::Tapped,
                    Digraph::Tapped => {
                        *flash = Some("Enter digraph:".into());
                        Digraph::Armed { first: None }
                    }
                    other => other,
                };
            }
            return None;
        }
        if k.sym.is_shift() {
            return None;
        }
        let typed = k.unicode.filter(|_| (k.modifiers - KeyMod::SHIFT).is_empty());
        let (Digraph::Armed { first }, Some(c)) = (self.digraph, typed) else {
            self.digraph = if k.pressed() { Digraph::Blocked } else { Digraph::Idle };
            return None;
        };
        if k.pressed() {
            return Some(Step::swallow(None));
        }
        let Some(a) = first else {
            self.digraph = Digraph::Armed { first: Some(c) };
            return Some(Step::swallow(Some(format!("Enter digraph: {c}"))));
        };
        self.digraph = Digraph::Idle;
        Some(match char_digraph(a, c) {
            Some(out) => {
                log::debug!("digraph {a}{c} -> {out}");
                Step { outcome: Outcome::Replay(out), flash: Some(format!("Enter digraph: {a}{c} -> {out}")) }
            }
            None => Step::swallow(Some(format!("Enter digraph: {a}{c} -> INVALID"))),
        })
    }

    // ── Ctrl+Shift unicode ────────────────────────────────────────

    fn feed_unicode(&mut self, k: &KeyEvent, classic: bool) -> Option<Step> {
        if k.sym.is_ctrl() || k.sym.is_shift() {
            if let Accumulator::Accumulating { value, .. } = self.unicode {
                if k.released() {
                    let step = match unicode_to_cp437(value).map(cp437_to_char) {
                        Some(out) => Step {
                            outcome: Outcome::Replay(out),
                            flash: Some(format!("Enter Unicode: U+{value:04X} -> {out}")),
                        },
                        None => Step::swallow(Some(format!("Enter Unicode: U+{value:04X} -> INVALID"))),
                    };
                    self.reset();
                    return Some(step);
                }
            }
            return None;
        }
        if !classic && k.ctrl() && k.shift() {
            let digits = match self.unicode {
                Accumulator::Blocked => return None,
                Accumulator::Idle => 0,
                Accumulator::Accumulating { digits, .. } => digits,
            };
            let Some(d) = k.hex_digit().filter(|_| digits < MAX_HEX_DIGITS) else {
                self.unicode = Accumulator::Blocked;
                return None;
            };
            if k.pressed() {
                return Some(Step::swallow(None));
            }
            let value = match self.unicode {
                Accumulator::Accumulating { value, .. } => value * 16 + d,
                _ => d,
            };
            self.unicode = Accumulator::Accumulating { value, digits: digits + 1 };
            self.digraph = Digraph::Idle;
            return Some(Step::swallow(Some(format!("Enter Unicode: U+{value:04X}"))));
        }
        self.unicode = Accumulator::Idle;
        None
    }

    // ── Alt+numpad ────────────────────────────────────────────────

    fn feed_alt_numpad(&mut self, k: &KeyEvent, classic: bool) -> Option<Step> {
        if k.sym.is_alt() {
            if let Accumulator::Accumulating { value, .. } = self.alt_numpad {
                if k.released() {
                    let byte = value as u8;
                    self.reset();
                    if byte == 0 {
                        return None;
                    }
                    let out = cp437_to_char(byte);
                    let flash = (!classic).then(|| format!("Enter DOS/ASCII: {byte} -> {out}"));
                    return Some(Step { outcome: Outcome::Replay(out), flash });
                }
            }
            return None;
        }
        if k.alt() && !k.ctrl() && !k.shift() {
            if self.alt_numpad == Accumulator::Blocked {
                return None;
            }
            let Some(d) = k.keypad_digit() else {
                self.alt_numpad = Accumulator::Blocked;
                return None;
            };
            if k.pressed() {
                return Some(Step::swallow(None));
            }
            let (value, digits) = match self.alt_numpad {
                Accumulator::Accumulating { value, digits } => ((value * 10 + d) % 256, digits + 1),
                _ => (d, 1),
            };
            self.alt_numpad = Accumulator::Accumulating { value, digits };
            let text = (!classic).then(|| format!("Enter DOS/ASCII: {value}"));
            return Some(Step::swallow(text));
        }
        self.alt_numpad = Accumulator::Idle;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{KeyState, KeySym};
    use proptest::prelude::*;

    fn ctrl_tap(c: &mut Composer) {
        c.feed(&KeyEvent::key(KeySym::LCtrl, KeyMod::CTRL, KeyState::Pressed), false);
        c.feed(&KeyEvent::key(KeySym::LCtrl, KeyMod::empty(), KeyState::Released), false);
    }

    fn type_char(c: &mut Composer, ch: char) -> (Step, Step) {
        let press = c.feed(&KeyEvent::character(ch, KeyMod::empty(), KeyState::Pressed), false);
        let release = c.feed(&KeyEvent::character(ch, KeyMod::empty(), KeyState::Released), false);
        (press, release)
    }

    #[test]
    fn double_ctrl_tap_then_two_chars_replays_the_digraph() {
        let mut c = Composer::default();
        ctrl_tap(&mut c);
        assert_eq!(c.digraph, Digraph::Tapped);
        ctrl_tap(&mut c);
        assert_eq!(c.digraph, Digraph::Armed { first: None });

        let (press, release) = type_char(&mut c, 'a');
        assert_eq!(press.outcome, Outcome::Swallow);
        assert_eq!(release.outcome, Outcome::Swallow);
        let (_, release) = type_char(&mut c, 'e');
        assert_eq!(release.outcome, Outcome::Replay('æ'));
        assert!(c.is_idle());
    }

    #[test]
    fn arming_ctrl_release_that_ends_a_unicode_sequence_shows_the_unicode_result() {
        let mut c = Composer {
            digraph: Digraph::Tapped,
            unicode: Accumulator::Accumulating { value: 0xE9, digits: 2 },
            ..Composer::default()
        };
        let step = c.feed(&KeyEvent::key(KeySym::LCtrl, KeyMod::SHIFT, KeyState::Released), false);
        assert_eq!(step.outcome, Outcome::Replay('é'));
        assert_eq!(step.flash.as_deref(), Some("Enter Unicode: U+00E9 -> é"));
        assert!(c.is_idle());
    }

    #[test]
    fn second_ctrl_release_flashes_the_digraph_prompt() {
        let mut c = Composer { digraph: Digraph::Tapped, ..Composer::default() };
        let step = c.feed(&KeyEvent::key(KeySym::LCtrl, KeyMod::empty(), KeyState::Released), false);
        assert_eq!(step.outcome, Outcome::Pass);
        assert_eq!(step.flash.as_deref(), Some("Enter digraph:"));
    }

    #[test]
    fn unknown_digraph_flashes_invalid() {
        let mut c = Composer::default();
        ctrl_tap(&mut c);
        ctrl_tap(&mut c);
        type_char(&mut c, 'q');
        let (_, release) = type_char(&mut c, 'q');
        assert_eq!(release.outcome, Outcome::Swallow);
        assert_eq!(release.flash.as_deref(), Some("Enter digraph: qq -> INVALID"));
    }

    #[test]
    fn classic_mode_never_arms_the_digraph() {
        let mut c = Composer::default();
        for _ in 0..2 {
            c.feed(&KeyEvent::key(KeySym::LCtrl, KeyMod::CTRL, KeyState::Pressed), true);
            c.feed(&KeyEvent::key(KeySym::LCtrl, KeyMod::empty(), KeyState::Released), true);
        }
        assert!(!matches!(c.digraph, Digraph::Armed { .. }));
    }

    #[test]
    fn ctrl_shift_hex_replays_on_modifier_release() {
        let mut c = Composer::default();
        let held = KeyMod::CTRL | KeyMod::SHIFT;
        for d in ['0', '0', 'e', '9'] {
            let press = KeyEvent::key(KeySym::Char(d), held, KeyState::Pressed);
            assert_eq!(c.feed(&press, false).outcome, Outcome::Swallow);
            let release = KeyEvent::key(KeySym::Char(d), held, KeyState::Released);
            c.feed(&release, false);
        }
        assert_eq!(c.unicode, Accumulator::Accumulating { value: 0xe9, digits: 4 });
        let step = c.feed(&KeyEvent::key(KeySym::LShift, KeyMod::CTRL, KeyState::Released), false);
        assert_eq!(step.outcome, Outcome::Replay('é'));
        assert!(c.is_idle());
    }

    #[test]
    fn fifth_hex_digit_blocks() {
        let mut c = Composer::default();
        c.unicode = Accumulator::Accumulating { value: 0x1234, digits: 4 };
        let k = KeyEvent::key(KeySym::Char('5'), KeyMod::CTRL | KeyMod::SHIFT, KeyState::Pressed);
        assert_eq!(c.feed(&k, false).outcome, Outcome::Pass);
        assert_eq!(c.unicode, Accumulator::Blocked);
    }

    #[test]
    fn codepoint_outside_cp437_is_invalid() {
        let mut c = Composer::default();
        c.unicode = Accumulator::Accumulating { value: 0x263a, digits: 4 };
        let step = c.feed(&KeyEvent::key(KeySym::LCtrl, KeyMod::SHIFT, KeyState::Released), false);
        assert_eq!(step.outcome, Outcome::Swallow);
        assert_eq!(step.flash.as_deref(), Some("Enter Unicode: U+263A -> INVALID"));
    }

    #[test]
    fn alt_numpad_builds_a_byte() {
        let mut c = Composer::default();
        for d in ['1', '3', '0'] {
            for state in [KeyState::Pressed, KeyState::Released] {
                let k = KeyEvent::key(KeySym::Char(d), KeyMod::ALT, state).with_orig(KeySym::Keypad(d));
                c.feed(&k, false);
            }
        }
        assert_eq!(c.alt_numpad, Accumulator::Accumulating { value: 130, digits: 3 });
        let step = c.feed(&KeyEvent::key(KeySym::LAlt, KeyMod::empty(), KeyState::Released), false);
        assert_eq!(step.outcome, Outcome::Replay('é'));
    }

    #[test]
    fn alt_with_top_row_digit_blocks() {
        let mut c = Composer::default();
        let k = KeyEvent::key(KeySym::Char('1'), KeyMod::ALT, KeyState::Pressed);
        assert_eq!(c.feed(&k, false).outcome, Outcome::Pass);
        assert_eq!(c.alt_numpad, Accumulator::Blocked);
    }

    fn arb_key() -> impl Strategy<Value = KeyEvent> {
        let sym = prop_oneof![
            Just(KeySym::Up),
            Just(KeySym::Enter),
            Just(KeySym::F(5)),
            Just(KeySym::Tab),
            (b'g'..=b'z').prop_map(|b| KeySym::Char(b as char)),
        ];
        let state = prop_oneof![Just(KeyState::Pressed), Just(KeyState::Released)];
        (sym, state).prop_map(|(sym, state)| KeyEvent::key(sym, KeyMod::empty(), state))
    }

    proptest! {
        // a plain non-text key never leaves an accumulator mid-sequence
        #[test]
        fn disqualifying_keys_reset_the_accumulators(value in 0u32..0xffff, digits in 1u32..4, k in arb_key()) {
            let mut c = Composer::default();
            c.unicode = Accumulator::Accumulating { value, digits };
            c.alt_numpad = Accumulator::Accumulating { value: value % 1000, digits };
            let step = c.feed(&k, false);
            prop_assert_eq!(step.outcome, Outcome::Pass);
            prop_assert_eq!(c.unicode, Accumulator::Idle);
            prop_assert_eq!(c.alt_numpad, Accumulator::Idle);
            let armed = matches!(c.digraph, Digraph::Armed { .. });
            prop_assert!(!armed);
        }

        #[test]
        fn modifier_chords_block_an_armed_digraph(ch in proptest::char::range('a', 'z')) {
            let mut c = Composer { digraph: Digraph::Armed { first: None }, ..Composer::default() };
            let k = KeyEvent::character(ch, KeyMod::CTRL, KeyState::Pressed);
            prop_assert_eq!(c.feed(&k, false).outcome, Outcome::Pass);
            prop_assert_eq!(c.digraph, Digraph::Blocked);
        }
    }
}
