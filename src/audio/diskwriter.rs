// Renders the song once through into a wav file on a worker thread. The ui
// stays in headless mode while this runs and polls progress every frame.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};

use crate::pipeline::song::SongLayout;

use super::engine::{Engine, OUTPUT_BITS, OUTPUT_CHANNELS};
use super::frame::StereoFrame;
use super::DEFAULT_SAMPLE_RATE;

const BLOCK_FRAMES: usize = 1024;
const TAIL_SECS: u64 = 10; // safety margin past the computed song length

#[derive(Clone, Debug, PartialEq)]
pub enum DiskWriterEvent {
    Progress(u8),
    Finished(PathBuf),
    Failed(String),
}

pub struct DiskWriter {
    rx: Receiver<DiskWriterEvent>,
    worker: Option<JoinHandle<()>>,
}

impl DiskWriter {
    pub fn start(path: PathBuf, layout: SongLayout, length_secs: u64) -> Self {
        let (tx, rx) = crossbeam_channel::bounded::<DiskWriterEvent>(64);
        log::info!("disk writer started: {}", path.display());
        let worker = std::thread::spawn(move || {
            let event = match render_to_wav(&path, layout, length_secs, &tx) {
                Ok(()) => DiskWriterEvent::Finished(path),
                Err(e) => DiskWriterEvent::Failed(format!("{e:#}")),
            };
            let _ = tx.send(event);
        });
        Self { rx, worker: Some(worker) }
    }

    pub fn poll(&mut self) -> Option<DiskWriterEvent> {
        let event = self.rx.try_recv().ok()?;
        if !matches!(event, DiskWriterEvent::Progress(_)) {
            if let Some(worker) = self.worker.take() {
                let _ = worker.join();
            }
        }
        Some(event)
    }
}

fn render_to_wav(
    path: &Path,
    layout: SongLayout,
    length_secs: u64,
    tx: &Sender<DiskWriterEvent>,
) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: OUTPUT_CHANNELS as u16,
        sample_rate: DEFAULT_SAMPLE_RATE,
        bits_per_sample: OUTPUT_BITS as u16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("could not create {}", path.display()))?;

    let mut engine = Engine::new(DEFAULT_SAMPLE_RATE);
    engine.set_layout(layout);
    engine.start_at(0, 0);

    let expected = (length_secs.max(1) * DEFAULT_SAMPLE_RATE as u64) as usize;
    let cap = expected + (TAIL_SECS * DEFAULT_SAMPLE_RATE as u64) as usize;
    let mut block = vec![StereoFrame::zero(); BLOCK_FRAMES];
    let mut written = 0usize;
    let mut last_pct = 0u8;

    while engine.mode().is_playing() && engine.loops() == 0 && written < cap {
        engine.render_block(&mut block);
        for frame in &block {
            for s in frame.to_i16() {
                writer.write_sample(s)?;
            }
        }
        written += block.len();
        let pct = (written * 100 / expected).min(100) as u8;
        if pct != last_pct {
            last_pct = pct;
            let _ = tx.try_send(DiskWriterEvent::Progress(pct));
        }
    }
    writer.finalize().context("could not finish wav file")?;
    Ok(())
}
