use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

mod diskwriter;
mod engine;
mod frame;
mod voice;

pub use diskwriter::{DiskWriter, DiskWriterEvent};
pub use engine::{Engine, OUTPUT_BITS, OUTPUT_CHANNELS, PlayMode, Position};
pub use frame::StereoFrame;

use crate::pipeline::song::SongLayout;

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

// ui-side handle on the playback engine. Cloning shares the same engine.
// Every accessor takes the lock for as long as it takes to copy values out;
// callers must not draw while holding a guard from `lock()`.
#[derive(Clone)]
pub struct Playback {
    engine: Arc<Mutex<Engine>>,
}

impl Playback {
    pub fn new(sample_rate: u32) -> Self {
        Self { engine: Arc::new(Mutex::new(Engine::new(sample_rate))) }
    }

    // lock_audio; the guard going out of scope is unlock_audio
    pub fn lock(&self) -> MutexGuard<'_, Engine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mode(&self) -> PlayMode {
        self.lock().mode()
    }

    pub fn position(&self) -> Position {
        self.lock().position()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.lock().elapsed_secs()
    }

    pub fn vu(&self) -> (u8, u8) {
        self.lock().vu()
    }

    pub fn scope_snapshot(&self) -> Vec<i16> {
        self.lock().scope().to_vec()
    }

    pub fn speed(&self) -> u8 {
        self.lock().speed()
    }

    pub fn set_speed(&self, speed: i32) {
        self.lock().set_speed(speed);
    }

    pub fn tempo(&self) -> u8 {
        self.lock().tempo()
    }

    pub fn set_tempo(&self, tempo: i32) {
        self.lock().set_tempo(tempo);
    }

    pub fn global_volume(&self) -> u8 {
        self.lock().global_volume()
    }

    pub fn set_global_volume(&self, volume: i32) {
        self.lock().set_global_volume(volume);
    }

    pub fn set_layout(&self, layout: SongLayout) {
        self.lock().set_layout(layout);
    }

    pub fn start(&self) {
        self.start_at(0, 0);
    }

    pub fn start_at(&self, order: usize, row: usize) {
        log::debug!("playback start at order {order} row {row}");
        self.lock().start_at(order, row);
    }

    pub fn loop_pattern(&self, pattern: usize, row: usize) {
        log::debug!("playback loop pattern {pattern} from row {row}");
        self.lock().loop_pattern(pattern, row);
    }

    pub fn stop(&self) {
        self.lock().stop();
    }

    pub fn set_order(&self, order: usize) {
        self.lock().set_order(order);
    }

    // software clock for when there is no output device (and for tests)
    pub fn advance(&self, frames: usize) {
        let mut scratch = vec![StereoFrame::zero(); frames];
        self.lock().render_block(&mut scratch);
    }

    pub fn sample_rate(&self) -> u32 {
        self.lock().sample_rate()
    }
}

pub struct AudioHandle {
    _output_stream: cpal::Stream,
}

pub fn start_audio(playback: &Playback) -> anyhow::Result<AudioHandle> {
    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let config = device.default_output_config().context("no default output config")?;

    let channels = config.channels() as usize;
    let sample_rate = u32::from(config.sample_rate());
    playback.lock().set_sample_rate(sample_rate);

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let output_stream = build_output_stream_f32(&device, &config.into(), playback.clone(), channels)?;
            output_stream.play().context("failed to play output stream")?;
            log::info!("audio output running at {sample_rate} Hz, {channels} channels");
            Ok(AudioHandle { _output_stream: output_stream })
        }
        other => anyhow::bail!("unsupported sample format {other:?} (only f32 supported for now)"),
    }
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    playback: Playback,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let mut block: Vec<StereoFrame> = Vec::new();

    let err_fn = |err| log::error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            let n_frames = data.len() / channels.max(1);
            block.resize(n_frames, StereoFrame::zero());
            playback.lock().render_block(&mut block);

            for (out, frame) in data.chunks_mut(channels.max(1)).zip(block.iter()) {
                for (ch, sample) in out.iter_mut().enumerate() {
                    *sample = if ch % 2 == 0 { frame.left } else { frame.right };
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
