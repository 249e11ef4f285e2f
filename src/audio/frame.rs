// The smallest unit of audio; one stereo frame
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn mono(x: f32) -> Self {
        Self { left: x, right: x }
    }

    // interleaved 16-bit, what the scope buffer and the wav writer want
    pub fn to_i16(self) -> [i16; 2] {
        let conv = |x: f32| (x.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        [conv(self.left), conv(self.right)]
    }
}
