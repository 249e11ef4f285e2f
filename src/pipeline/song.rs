// The song data the ui reads and edits. Pattern *contents* are out of scope
// here; the core only needs how long each pattern is, what order the
// patterns play in, and the names in the sample/instrument slots.

use std::path::PathBuf;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::shared::{
    MAX_CHANNELS, MAX_PATTERNS, NUM_INSTRUMENTS, NUM_SAMPLES, ORDER_LAST, ORDER_SKIP,
};

pub const DEFAULT_ROWS: usize = 64;
pub const MAX_ROWS: usize = 200;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct KeepFlags: u8 {
        const KEEP_PATTERNS = 1 << 0;
        const KEEP_SAMPLES = 1 << 1;
        const KEEP_INSTRUMENTS = 1 << 2;
        const KEEP_ORDERLIST = 1 << 3;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSlot {
    pub name: String,
    pub length: usize, // frames
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSlot {
    pub name: String,
    pub sample: usize, // sample slot this instrument mostly maps to, 0 = none
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub rows: usize,
}

impl Default for Pattern {
    fn default() -> Self {
        Self { rows: DEFAULT_ROWS }
    }
}

// what the playback engine needs to walk the song
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SongLayout {
    pub orders: Vec<u8>,
    pub rows: Vec<usize>,
    pub speed: u8,
    pub tempo: u8,
    pub global_volume: u8,
}

impl SongLayout {
    pub fn rows_in(&self, pattern: usize) -> usize {
        self.rows.get(pattern).copied().unwrap_or(DEFAULT_ROWS)
    }

    // first playable order at or after `from`, None when the song ends first
    pub fn next_playable(&self, from: usize) -> Option<usize> {
        let mut order = from;
        while let Some(&p) = self.orders.get(order) {
            match p {
                ORDER_LAST => return None,
                ORDER_SKIP => order += 1,
                _ => return Some(order),
            }
        }
        None
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Song {
    pub title: String,
    #[serde(skip)]
    pub filename: Option<PathBuf>,
    pub initial_speed: u8,
    pub initial_tempo: u8,
    pub initial_global_volume: u8,
    pub orderlist: Vec<u8>,
    pub patterns: Vec<Pattern>,
    // slot 0 is the "no sample"/"no instrument" slot and is never shown
    pub samples: Vec<SampleSlot>,
    pub instruments: Vec<InstrumentSlot>,
    pub instrument_mode: bool,
    pub message: String,
    pub channel_mute: Vec<bool>,
    pub orderlist_locked: bool,
    pub row_highlight: u8,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            title: String::new(),
            filename: None,
            initial_speed: 6,
            initial_tempo: 125,
            initial_global_volume: 128,
            orderlist: vec![0, ORDER_LAST],
            patterns: vec![Pattern::default()],
            samples: vec![SampleSlot::default(); NUM_SAMPLES + 1],
            instruments: vec![InstrumentSlot::default(); NUM_INSTRUMENTS + 1],
            instrument_mode: false,
            message: String::new(),
            channel_mute: vec![false; MAX_CHANNELS],
            orderlist_locked: false,
            row_highlight: 16,
        }
    }
}

impl Song {
    pub fn new_song(&mut self, keep: KeepFlags) {
        let fresh = Song::default();
        if !keep.contains(KeepFlags::KEEP_PATTERNS) {
            self.patterns = fresh.patterns;
        }
        if !keep.contains(KeepFlags::KEEP_SAMPLES) {
            self.samples = fresh.samples;
        }
        if !keep.contains(KeepFlags::KEEP_INSTRUMENTS) {
            self.instruments = fresh.instruments;
            self.instrument_mode = false;
        }
        if !keep.contains(KeepFlags::KEEP_ORDERLIST) {
            self.orderlist = fresh.orderlist;
        }
        self.title.clear();
        self.message.clear();
        self.filename = None;
        self.channel_mute = fresh.channel_mute;
        self.orderlist_locked = false;
    }

    // bring hand-edited or older files back inside the ranges the editor keeps
    pub fn normalize(&mut self) {
        self.patterns.truncate(MAX_PATTERNS);
        if self.patterns.is_empty() {
            self.patterns.push(Pattern::default());
        }
        for p in &mut self.patterns {
            p.rows = p.rows.clamp(1, MAX_ROWS);
        }
        self.samples.resize_with(NUM_SAMPLES + 1, SampleSlot::default);
        self.instruments.resize_with(NUM_INSTRUMENTS + 1, InstrumentSlot::default);
        self.channel_mute.resize(MAX_CHANNELS, false);
        self.initial_speed = self.initial_speed.max(1);
        self.initial_tempo = self.initial_tempo.max(32);
        self.initial_global_volume = self.initial_global_volume.min(128);
    }

    pub fn layout(&self) -> SongLayout {
        SongLayout {
            orders: self.orderlist.clone(),
            rows: self.patterns.iter().map(|p| p.rows).collect(),
            speed: self.initial_speed,
            tempo: self.initial_tempo,
            global_volume: self.initial_global_volume,
        }
    }

    pub fn basename(&self) -> String {
        self.filename
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn rows_in_pattern(&self, pattern: usize) -> usize {
        self.patterns.get(pattern).map_or(DEFAULT_ROWS, |p| p.rows)
    }

    pub fn set_rows_in_pattern(&mut self, pattern: usize, rows: usize) {
        if pattern >= MAX_PATTERNS {
            return;
        }
        if self.patterns.len() <= pattern {
            self.patterns.resize(pattern + 1, Pattern::default());
        }
        self.patterns[pattern].rows = rows.clamp(1, MAX_ROWS);
    }

    pub fn num_patterns(&self) -> usize {
        self.patterns.len().saturating_sub(1)
    }

    pub fn num_orders(&self) -> usize {
        self.orderlist
            .iter()
            .position(|&o| o == ORDER_LAST)
            .unwrap_or(self.orderlist.len())
            .saturating_sub(1)
    }

    pub fn pattern_at_order(&self, order: usize) -> Option<usize> {
        match self.orderlist.get(order) {
            Some(&p) if (p as usize) < MAX_PATTERNS => Some(p as usize),
            _ => None,
        }
    }

    // prefers `hint` when it already plays `pattern`
    pub fn order_for_pattern(&self, pattern: usize, hint: Option<usize>) -> Option<usize> {
        if let Some(h) = hint {
            if self.pattern_at_order(h) == Some(pattern) {
                return Some(h);
            }
        }
        self.orderlist.iter().position(|&p| p as usize == pattern)
    }

    fn row_secs(&self) -> f64 {
        let tempo = self.initial_tempo.max(32) as f64;
        self.initial_speed.max(1) as f64 * 2.5 / tempo
    }

    // walks the orderlist; callers that poll this every frame should cache it
    pub fn length_to(&self, order: usize, row: usize) -> u64 {
        let row_secs = self.row_secs();
        let mut rows = 0usize;
        for &p in self.orderlist.iter().take(order) {
            match p {
                ORDER_LAST => break,
                ORDER_SKIP => continue,
                p => rows += self.rows_in_pattern(p as usize),
            }
        }
        ((rows + row) as f64 * row_secs) as u64
    }

    pub fn length(&self) -> u64 {
        self.length_to(self.orderlist.len(), 0)
    }

    pub fn position_at(&self, secs: u64) -> (usize, usize) {
        let row_secs = self.row_secs();
        let mut elapsed = 0.0;
        let mut last = (0, 0);
        for (order, &p) in self.orderlist.iter().enumerate() {
            match p {
                ORDER_LAST => break,
                ORDER_SKIP => continue,
                p => {
                    let rows = self.rows_in_pattern(p as usize);
                    let span = rows as f64 * row_secs;
                    if elapsed + span > secs as f64 {
                        let row = ((secs as f64 - elapsed) / row_secs) as usize;
                        return (order, row.min(rows.saturating_sub(1)));
                    }
                    elapsed += span;
                    last = (order, rows.saturating_sub(1));
                }
            }
        }
        last
    }

    pub fn sample_name(&self, n: usize) -> &str {
        self.samples.get(n).map_or("", |s| s.name.as_str())
    }

    pub fn instrument_name(&self, n: usize) -> &str {
        self.instruments.get(n).map_or("", |i| i.name.as_str())
    }

    pub fn instrument_for_sample(&self, sample: usize) -> Option<usize> {
        if sample == 0 {
            return None;
        }
        self.instruments.iter().skip(1).position(|i| i.sample == sample).map(|i| i + 1)
    }

    pub fn toggle_channel_mute(&mut self, channel: usize) -> bool {
        match self.channel_mute.get_mut(channel) {
            Some(m) => {
                *m = !*m;
                *m
            }
            None => false,
        }
    }

    pub fn toggle_orderlist_locked(&mut self) -> bool {
        self.orderlist_locked = !self.orderlist_locked;
        self.orderlist_locked
    }

    // (song bytes, sample bytes), rough numbers for the memory readout
    pub fn memory_usage(&self) -> (usize, usize) {
        let patterns: usize = self.patterns.iter().map(|p| p.rows * MAX_CHANNELS * 5).sum();
        let instruments = self.instruments.iter().filter(|i| !i.name.is_empty()).count() * 554;
        let samples = self.samples.iter().map(|s| s.length * 2).sum();
        (patterns + instruments + self.message.len(), samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_orders() -> Song {
        let mut song = Song::default();
        song.patterns = vec![Pattern { rows: 64 }, Pattern { rows: 32 }];
        song.orderlist = vec![0, ORDER_SKIP, 1, 0, ORDER_LAST];
        song
    }

    #[test]
    fn length_to_skips_markers() {
        let song = three_orders();
        // speed 6 tempo 125: one row is 0.12s
        assert_eq!(song.length_to(0, 0), 0);
        assert_eq!(song.length_to(2, 0), (64.0 * 0.12) as u64);
        assert_eq!(song.length_to(3, 10), ((64 + 32 + 10) as f64 * 0.12) as u64);
        assert_eq!(song.length(), ((64 + 32 + 64) as f64 * 0.12) as u64);
    }

    #[test]
    fn position_at_inverts_length_to() {
        let song = three_orders();
        let secs = song.length_to(2, 20);
        let (order, row) = song.position_at(secs);
        assert_eq!(order, 2);
        assert!(row <= 20 && row >= 19);
    }

    #[test]
    fn order_for_pattern_prefers_hint() {
        let song = three_orders();
        assert_eq!(song.order_for_pattern(0, Some(3)), Some(3));
        assert_eq!(song.order_for_pattern(0, None), Some(0));
        assert_eq!(song.order_for_pattern(7, None), None);
    }

    #[test]
    fn new_song_honours_keep_flags() {
        let mut song = three_orders();
        song.title = "demo".into();
        song.samples[1].name = "kick".into();
        song.new_song(KeepFlags::KEEP_SAMPLES);
        assert!(song.title.is_empty());
        assert_eq!(song.samples[1].name, "kick");
        assert_eq!(song.orderlist, vec![0, ORDER_LAST]);
        assert_eq!(song.patterns.len(), 1);
    }

    #[test]
    fn layout_finds_next_playable_order() {
        let layout = three_orders().layout();
        assert_eq!(layout.next_playable(1), Some(2));
        assert_eq!(layout.next_playable(4), None);
    }

    #[test]
    fn instrument_lookup_by_sample() {
        let mut song = Song::default();
        song.instruments[3].sample = 5;
        assert_eq!(song.instrument_for_sample(5), Some(3));
        assert_eq!(song.instrument_for_sample(0), None);
    }
}
