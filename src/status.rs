// Process-wide ui status, owned by App. Initialized once at startup from
// the config and mutated for the rest of the run.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::shared::{HelpIndex, PageId};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct StatusFlags: u32 {
        const NEED_UPDATE = 1 << 0;
        const CLASSIC_MODE = 1 << 1;
        const DISKWRITER_ACTIVE = 1 << 2;
        const SONG_NEEDS_SAVE = 1 << 3;
        const SAMPLE_CHANGED = 1 << 4;
        const INSTRUMENT_CHANGED = 1 << 5;
        const CLIPPY_PASTE_BUFFER = 1 << 6;
        const INVERTED_PALETTE = 1 << 7;
        const STARTUP_FONTEDIT = 1 << 8;
    }
}

bitflags! {
    // empty = no overlay
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DialogType: u8 {
        const MENU = 1 << 0;
        const BOX = 1 << 1;
        const OK = (1 << 2) | Self::BOX.bits();
        const OK_CANCEL = (1 << 3) | Self::BOX.bits();
        const YES_NO = (1 << 4) | Self::BOX.bits();
        const CUSTOM = (1 << 5) | Self::BOX.bits();
    }
}

impl DialogType {
    pub const NONE: DialogType = DialogType::empty();

    pub fn is_none(self) -> bool {
        self.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeDisplay {
    Off,
    #[default]
    PlayElapsed,
    PlayClock,
    PlayOff,
    Elapsed,
    Clock,
    Absolute,
    Playback,
}

impl TimeDisplay {
    pub const ALL: [TimeDisplay; 8] = [
        TimeDisplay::Off,
        TimeDisplay::PlayElapsed,
        TimeDisplay::PlayClock,
        TimeDisplay::PlayOff,
        TimeDisplay::Elapsed,
        TimeDisplay::Clock,
        TimeDisplay::Absolute,
        TimeDisplay::Playback,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeDisplay::Off => "Off",
            TimeDisplay::PlayElapsed => "Playback / Elapsed",
            TimeDisplay::PlayClock => "Playback / Clock",
            TimeDisplay::PlayOff => "Playback / Off",
            TimeDisplay::Elapsed => "Elapsed",
            TimeDisplay::Clock => "Clock",
            TimeDisplay::Absolute => "Absolute",
            TimeDisplay::Playback => "Playback",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisStyle {
    Off,
    Memory,
    Oscilloscope,
    #[default]
    VuMeter,
}

impl VisStyle {
    pub const ALL: [VisStyle; 4] =
        [VisStyle::Off, VisStyle::Memory, VisStyle::Oscilloscope, VisStyle::VuMeter];

    pub fn next(self) -> Self {
        match self {
            VisStyle::Off => VisStyle::Memory,
            VisStyle::Memory => VisStyle::Oscilloscope,
            VisStyle::Oscilloscope => VisStyle::VuMeter,
            VisStyle::VuMeter => VisStyle::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hms {
    pub h: u32,
    pub m: u32,
    pub s: u32,
}

impl Hms {
    pub fn from_secs(secs: u64) -> Self {
        Self {
            h: (secs / 3600) as u32,
            m: ((secs / 60) % 60) as u32,
            s: (secs % 60) as u32,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Status {
    pub current_page: PageId,
    pub previous_page: PageId,
    pub current_help_index: HelpIndex,
    pub dialog_type: DialogType,
    pub flags: StatusFlags,
    pub time_display: TimeDisplay,
    pub vis_style: VisStyle,
    pub clock: Hms, // wall clock for TimeDisplay::Clock, set by the event loop
}

impl Default for Status {
    fn default() -> Self {
        Self {
            current_page: PageId::Blank,
            previous_page: PageId::Blank,
            current_help_index: HelpIndex::Global,
            dialog_type: DialogType::NONE,
            flags: StatusFlags::empty(),
            time_display: TimeDisplay::PlayElapsed,
            vis_style: VisStyle::VuMeter,
            clock: Hms::default(),
        }
    }
}

impl Status {
    pub fn classic(&self) -> bool {
        self.flags.contains(StatusFlags::CLASSIC_MODE)
    }

    pub fn headless(&self) -> bool {
        self.flags.contains(StatusFlags::DISKWRITER_ACTIVE)
    }

    pub fn need_update(&mut self) {
        self.flags.insert(StatusFlags::NEED_UPDATE);
    }

    // read-and-clear, used once per frame by the event loop
    pub fn take_update(&mut self) -> bool {
        let dirty = self.flags.contains(StatusFlags::NEED_UPDATE);
        self.flags.remove(StatusFlags::NEED_UPDATE);
        dirty
    }
}
