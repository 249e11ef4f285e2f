// Types shared by every layer: the screen grid size, the closed set of page
// identifiers, and the key event record that the terminal layer produces
// and the dispatch pipeline consumes.
//
// The screen is a fixed 80x50 character grid. Every coordinate in the ui/
// modules (hot zones, header fields, dialog boxes) is in grid cells.
//
// Key events follow tracker conventions:
//   - `sym` is the symbolic key after remapping (keypad '/' arrives as '/'),
//   - `orig_sym` is what the hardware reported (keypad '/' stays Keypad('/')),
//   - `state` is Pressed or Released; most global shortcuts fire on one of
//     the two and swallow the other,
//   - mouse events reuse the same record with `mouse` set and x/y in cells,
//   - `is_synthetic` marks characters manufactured by the text composition
//     machines (digraph, ctrl+shift unicode, alt+numpad) and replayed.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub const SCREEN_WIDTH: u16 = 80;
pub const SCREEN_HEIGHT: u16 = 50;

pub const NUM_SAMPLES: usize = 99;
pub const NUM_INSTRUMENTS: usize = 99;
pub const MAX_CHANNELS: usize = 64;
pub const MAX_PATTERNS: usize = 200;

// orderlist markers
pub const ORDER_SKIP: u8 = 254; // "+++"
pub const ORDER_LAST: u8 = 255; // "---"

// ── Pages ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageId {
    Blank,
    Help,
    PatternEditor,
    SampleList,
    InstrumentListGeneral,
    InstrumentListVolume,
    InstrumentListPanning,
    InstrumentListPitch,
    Info,
    Preferences,
    Midi,
    MidiOutput,
    FontEdit,
    LoadModule,
    SaveModule,
    OrderListPanning,
    OrderListVolumes,
    SongVariables,
    PaletteEditor,
    Message,
    Log,
    LoadSample,
    LibrarySample,
    LoadInstrument,
    LibraryInstrument,
    About,
    Config,
}

impl PageId {
    // registration order; song_changed hooks run over this in reverse
    pub const ALL: [PageId; 27] = [
        PageId::Blank,
        PageId::Help,
        PageId::PatternEditor,
        PageId::SampleList,
        PageId::InstrumentListGeneral,
        PageId::InstrumentListVolume,
        PageId::InstrumentListPanning,
        PageId::InstrumentListPitch,
        PageId::Info,
        PageId::Preferences,
        PageId::Midi,
        PageId::MidiOutput,
        PageId::FontEdit,
        PageId::LoadModule,
        PageId::SaveModule,
        PageId::OrderListPanning,
        PageId::OrderListVolumes,
        PageId::SongVariables,
        PageId::PaletteEditor,
        PageId::Message,
        PageId::Log,
        PageId::LoadSample,
        PageId::LibrarySample,
        PageId::LoadInstrument,
        PageId::LibraryInstrument,
        PageId::About,
        PageId::Config,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_instrument_list(self) -> bool {
        matches!(
            self,
            PageId::InstrumentListGeneral
                | PageId::InstrumentListVolume
                | PageId::InstrumentListPanning
                | PageId::InstrumentListPitch
        )
    }

    // pages where the header always shows the sample slot, even in instrument mode
    pub fn shows_samples_only(self, classic: bool) -> bool {
        self.is_instrument_list()
            || self == PageId::SampleList
            || (!classic && matches!(self, PageId::OrderListPanning | PageId::OrderListVolumes))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HelpIndex {
    Global,
    PatternEditor,
    SampleList,
    InstrumentList,
    Info,
    OrderList,
    Message,
    Midi,
    Copyright,
}

// ── Keys ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeySym {
    None,
    Char(char), // always lowercase for letters, the typed glyph lives in `unicode`
    F(u8),
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    Enter,
    Escape,
    Backspace,
    Delete,
    Insert,
    ScrollLock,
    LCtrl,
    RCtrl,
    LShift,
    RShift,
    LAlt,
    RAlt,
    LMeta,
    RMeta,
    Keypad(char), // '0'..='9', '/', '*', '-', '+', '.', '\n'
}

impl KeySym {
    pub fn is_ctrl(self) -> bool {
        matches!(self, KeySym::LCtrl | KeySym::RCtrl)
    }

    pub fn is_shift(self) -> bool {
        matches!(self, KeySym::LShift | KeySym::RShift)
    }

    pub fn is_alt(self) -> bool {
        matches!(self, KeySym::LAlt | KeySym::RAlt | KeySym::LMeta | KeySym::RMeta)
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyMod: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

impl KeyMod {
    pub fn none(self) -> bool {
        self.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Pressed,
    Released,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MouseKind {
    #[default]
    None,
    Click,
    DoubleClick,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyEvent {
    pub sym: KeySym,
    pub orig_sym: KeySym,
    pub modifiers: KeyMod,
    pub unicode: Option<char>,
    pub state: KeyState,
    pub mouse: MouseKind,
    pub x: u16,
    pub y: u16,
    pub is_synthetic: bool,
}

impl Default for KeyEvent {
    fn default() -> Self {
        Self {
            sym: KeySym::None,
            orig_sym: KeySym::None,
            modifiers: KeyMod::empty(),
            unicode: None,
            state: KeyState::Pressed,
            mouse: MouseKind::None,
            x: 0,
            y: 0,
            is_synthetic: false,
        }
    }
}

impl KeyEvent {
    pub fn key(sym: KeySym, modifiers: KeyMod, state: KeyState) -> Self {
        Self { sym, orig_sym: sym, modifiers, state, ..Self::default() }
    }

    pub fn press(sym: KeySym) -> Self {
        Self::key(sym, KeyMod::empty(), KeyState::Pressed)
    }

    pub fn release(sym: KeySym) -> Self {
        Self::key(sym, KeyMod::empty(), KeyState::Released)
    }

    // a typed character; letters get a lowercase sym and keep the glyph
    pub fn character(c: char, modifiers: KeyMod, state: KeyState) -> Self {
        let sym = KeySym::Char(c.to_ascii_lowercase());
        Self { unicode: Some(c), ..Self::key(sym, modifiers, state) }
    }

    pub fn mouse(kind: MouseKind, x: u16, y: u16, state: KeyState) -> Self {
        Self { mouse: kind, x, y, state, ..Self::default() }
    }

    // what the composition machines replay
    pub fn synthetic(c: char) -> Self {
        Self { unicode: Some(c), is_synthetic: true, ..Self::default() }
    }

    pub fn with_orig(mut self, orig: KeySym) -> Self {
        self.orig_sym = orig;
        self
    }

    pub fn pressed(&self) -> bool {
        self.state == KeyState::Pressed
    }

    pub fn released(&self) -> bool {
        self.state == KeyState::Released
    }

    pub fn is_mouse(&self) -> bool {
        self.mouse != MouseKind::None
    }

    pub fn no_modifier(&self) -> bool {
        self.modifiers.none()
    }

    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(KeyMod::CTRL)
    }

    pub fn shift(&self) -> bool {
        self.modifiers.contains(KeyMod::SHIFT)
    }

    pub fn alt(&self) -> bool {
        self.modifiers.intersects(KeyMod::ALT | KeyMod::META)
    }

    // keypad digit regardless of modifiers, used by alt+numpad entry
    pub fn keypad_digit(&self) -> Option<u32> {
        match self.orig_sym {
            KeySym::Keypad(c) => c.to_digit(10),
            _ => None,
        }
    }

    // hex digit from the symbolic key, ignoring modifiers
    pub fn hex_digit(&self) -> Option<u32> {
        match self.sym {
            KeySym::Char(c) => c.to_digit(16),
            KeySym::Keypad(c) => c.to_digit(10),
            _ => None,
        }
    }
}
