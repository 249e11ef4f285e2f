use bitflags::bitflags;

use crate::pipeline::song::SongLayout;

use super::frame::StereoFrame;
use super::voice::ClickVoice;

const MAX_CLICKS: usize = 4; // hard cap so we wont malloc in audio callback

pub const OUTPUT_CHANNELS: usize = 2;
pub const OUTPUT_BITS: u8 = 16;

bitflags! {
    // empty = stopped
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct PlayMode: u8 {
        const PLAYING = 1 << 0;
        const PATTERN_LOOP = 1 << 1;
        const SINGLE_STEP = 1 << 2;
    }
}

impl PlayMode {
    pub const STOPPED: PlayMode = PlayMode::empty();

    // what the time display and the live-value setters treat as "playing"
    pub fn is_playing(self) -> bool {
        self.intersects(PlayMode::PLAYING | PlayMode::PATTERN_LOOP)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub order: usize,
    pub pattern: usize,
    pub row: usize,
}

// Shared playback state. Lives behind the Playback mutex; the audio
// callback renders through it and the ui snapshots it.
pub struct Engine {
    sample_rate: u32,
    mode: PlayMode,
    pos: Position,
    tick: u32,
    samples_to_tick: f64,
    speed: u8,
    tempo: u8,
    global_volume: u8,
    elapsed_frames: u64,
    loops: u32,
    vu: (u8, u8),
    scope: Vec<i16>,
    layout: SongLayout,
    clicks: [ClickVoice; MAX_CLICKS],
}

impl Engine {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            mode: PlayMode::STOPPED,
            pos: Position::default(),
            tick: 0,
            samples_to_tick: 0.0,
            speed: 6,
            tempo: 125,
            global_volume: 128,
            elapsed_frames: 0,
            loops: 0,
            vu: (0, 0),
            scope: Vec::new(),
            layout: SongLayout::default(),
            clicks: [ClickVoice::SILENT; MAX_CLICKS],
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate.max(1);
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_frames / self.sample_rate as u64
    }

    // how many times playback wrapped back to the top of the song
    pub fn loops(&self) -> u32 {
        self.loops
    }

    pub fn vu(&self) -> (u8, u8) {
        self.vu
    }

    pub fn scope(&self) -> &[i16] {
        &self.scope
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn tempo(&self) -> u8 {
        self.tempo
    }

    pub fn global_volume(&self) -> u8 {
        self.global_volume
    }

    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed.clamp(1, 255) as u8;
    }

    pub fn set_tempo(&mut self, tempo: i32) {
        self.tempo = tempo.clamp(32, 255) as u8;
    }

    pub fn set_global_volume(&mut self, volume: i32) {
        self.global_volume = volume.clamp(0, 128) as u8;
    }

    pub fn set_layout(&mut self, layout: SongLayout) {
        self.layout = layout;
        if self.mode.is_empty() {
            self.reset_song_params();
        }
    }

    fn reset_song_params(&mut self) {
        self.set_speed(self.layout.speed as i32);
        self.set_tempo(self.layout.tempo as i32);
        self.set_global_volume(self.layout.global_volume as i32);
    }

    // ── Transport ─────────────────────────────────────────────────

    pub fn start_at(&mut self, order: usize, row: usize) {
        let Some(order) = self.layout.next_playable(order).or_else(|| self.layout.next_playable(0))
        else {
            self.stop();
            return;
        };
        let pattern = self.layout.orders[order] as usize;
        self.reset_song_params();
        self.pos = Position { order, pattern, row: row.min(self.layout.rows_in(pattern).saturating_sub(1)) };
        self.begin(PlayMode::PLAYING);
    }

    pub fn loop_pattern(&mut self, pattern: usize, row: usize) {
        self.reset_song_params();
        self.pos.pattern = pattern;
        self.pos.row = row.min(self.layout.rows_in(pattern).saturating_sub(1));
        self.begin(PlayMode::PATTERN_LOOP);
    }

    fn begin(&mut self, mode: PlayMode) {
        self.mode = mode;
        self.tick = 0;
        self.samples_to_tick = 0.0;
        self.elapsed_frames = 0;
        self.loops = 0;
    }

    pub fn stop(&mut self) {
        self.mode = PlayMode::STOPPED;
        self.tick = 0;
        self.vu = (0, 0);
        self.clicks = [ClickVoice::SILENT; MAX_CLICKS];
    }

    pub fn set_order(&mut self, order: usize) {
        if let Some(order) = self.layout.next_playable(order) {
            self.pos.order = order;
            if self.mode.contains(PlayMode::PLAYING) {
                self.pos.pattern = self.layout.orders[order] as usize;
                self.pos.row = 0;
                self.tick = 0;
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────

    pub fn render_block(&mut self, frames: &mut [StereoFrame]) {
        let samples_per_tick = self.sample_rate as f64 * 2.5 / self.tempo.max(32) as f64;
        for frame in frames.iter_mut() {
            *frame = StereoFrame::zero();
            if self.mode.is_empty() {
                continue;
            }
            if self.samples_to_tick <= 0.0 {
                self.process_tick();
                self.samples_to_tick += samples_per_tick;
            }
            self.samples_to_tick -= 1.0;
            let s: f32 = self.clicks.iter_mut().map(|v| v.next_sample()).sum();
            *frame = StereoFrame::mono(s);
        }
        if !self.mode.is_empty() {
            self.elapsed_frames += frames.len() as u64;
        }
        self.update_meters(frames);
    }

    fn process_tick(&mut self) {
        if self.mode.is_empty() {
            return;
        }
        if self.tick >= self.speed as u32 {
            self.tick = 0;
            self.advance_row();
            if self.mode.is_empty() {
                return;
            }
        }
        if self.tick == 0 {
            self.trigger_row();
        }
        self.tick += 1;
    }

    fn trigger_row(&mut self) {
        let gain = self.global_volume as f32 / 128.0;
        let accent = self.pos.row == 0;
        let slot = self.clicks.iter().position(|v| !v.alive).unwrap_or(0);
        self.clicks[slot] = ClickVoice::new(self.sample_rate as f32, accent, gain);
    }

    fn advance_row(&mut self) {
        self.pos.row += 1;
        if self.pos.row < self.layout.rows_in(self.pos.pattern) {
            return;
        }
        self.pos.row = 0;
        if self.mode.contains(PlayMode::PATTERN_LOOP) {
            return;
        }
        let next = match self.layout.next_playable(self.pos.order + 1) {
            Some(o) => Some(o),
            None => {
                self.loops += 1;
                self.layout.next_playable(0)
            }
        };
        match next {
            Some(order) => {
                self.pos.order = order;
                self.pos.pattern = self.layout.orders[order] as usize;
            }
            None => self.stop(),
        }
    }

    fn update_meters(&mut self, frames: &[StereoFrame]) {
        let (mut l, mut r) = (0.0f32, 0.0f32);
        self.scope.clear();
        for f in frames {
            l = l.max(f.left.abs());
            r = r.max(f.right.abs());
            self.scope.extend_from_slice(&f.to_i16());
        }
        let level = |x: f32| (x.min(1.0) * 63.0) as u8;
        self.vu = (level(l), level(r));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ORDER_LAST;

    const RATE: u32 = 1000;

    fn engine_with(orders: Vec<u8>, rows: Vec<usize>) -> Engine {
        let mut engine = Engine::new(RATE);
        engine.set_layout(SongLayout { orders, rows, speed: 1, tempo: 250, global_volume: 128 });
        engine
    }

    // speed 1, tempo 250 at 1kHz: one row every 10 frames
    fn run_rows(engine: &mut Engine, rows: usize) {
        let mut block = vec![StereoFrame::zero(); 10 * rows];
        engine.render_block(&mut block);
    }

    #[test]
    fn stopped_engine_renders_silence_and_keeps_position() {
        let mut engine = engine_with(vec![0, ORDER_LAST], vec![4]);
        run_rows(&mut engine, 3);
        assert_eq!(engine.position(), Position::default());
        assert_eq!(engine.vu(), (0, 0));
        assert_eq!(engine.elapsed_secs(), 0);
    }

    #[test]
    fn playback_walks_orders_and_wraps() {
        let mut engine = engine_with(vec![0, 1, ORDER_LAST], vec![2, 3]);
        engine.start_at(0, 0);
        assert_eq!(engine.mode(), PlayMode::PLAYING);
        run_rows(&mut engine, 2);
        assert_eq!(engine.position(), Position { order: 0, pattern: 0, row: 1 });
        run_rows(&mut engine, 1);
        assert_eq!(engine.position(), Position { order: 1, pattern: 1, row: 0 });
        run_rows(&mut engine, 3);
        assert_eq!(engine.position().order, 0);
        assert_eq!(engine.loops(), 1);
    }

    #[test]
    fn pattern_loop_stays_on_its_pattern() {
        let mut engine = engine_with(vec![0, 1, ORDER_LAST], vec![2, 3]);
        engine.loop_pattern(1, 0);
        run_rows(&mut engine, 7);
        assert_eq!(engine.position().pattern, 1);
        assert!(engine.mode().is_playing());
    }

    #[test]
    fn rows_produce_meter_levels() {
        let mut engine = engine_with(vec![0, ORDER_LAST], vec![8]);
        engine.start_at(0, 0);
        run_rows(&mut engine, 1);
        assert!(engine.vu().0 > 0);
        assert_eq!(engine.scope().len(), 10 * OUTPUT_CHANNELS);
    }

    #[test]
    fn start_on_empty_song_stops() {
        let mut engine = engine_with(vec![ORDER_LAST], vec![]);
        engine.start_at(0, 0);
        assert_eq!(engine.mode(), PlayMode::STOPPED);
    }

    #[test]
    fn live_values_are_clamped() {
        let mut engine = Engine::new(RATE);
        engine.set_speed(0);
        engine.set_tempo(999);
        engine.set_global_volume(-4);
        assert_eq!((engine.speed(), engine.tempo(), engine.global_volume()), (1, 255, 0));
    }
}
