// Row click: a short decaying sine, one per row so the meters have something to show.

#[derive(Clone, Copy, Debug)]
pub struct ClickVoice {
    phase: f32,
    phase_inc: f32,
    amp: f32,
    decay: f32,
    pub alive: bool,
}

impl ClickVoice {
    pub const SILENT: ClickVoice =
        ClickVoice { phase: 0.0, phase_inc: 0.0, amp: 0.0, decay: 1.0, alive: false };

    pub fn new(sample_rate: f32, accent: bool, gain: f32) -> Self {
        let freq = if accent { 1760.0 } else { 880.0 };
        Self {
            phase: 0.0,
            phase_inc: (std::f32::consts::TAU * freq) / sample_rate, // radians per sample
            amp: if accent { 0.3 } else { 0.15 } * gain,
            decay: 0.998,
            alive: true,
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        if !self.alive {
            return 0.0;
        }
        let out = self.amp * self.phase.sin();
        self.phase += self.phase_inc;
        if self.phase > std::f32::consts::TAU {
            self.phase -= std::f32::consts::TAU;
        }
        self.amp *= self.decay;
        if self.amp < 0.0005 {
            self.alive = false;
        }
        out
    }
}
