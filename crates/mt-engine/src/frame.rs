//! Stereo output frame.

/// One stereo frame of 16-bit output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub left: i16,
    pub right: i16,
}

impl Frame {
    pub const fn silence() -> Self {
        Self { left: 0, right: 0 }
    }

    /// Convert a normalized stereo pair, clamping to [-1, 1].
    pub fn from_f32(left: f32, right: f32) -> Self {
        Self {
            left: to_i16(left),
            right: to_i16(right),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.left == 0 && self.right == 0
    }

    /// Largest absolute amplitude of either side.
    pub fn peak(&self) -> u16 {
        self.left.unsigned_abs().max(self.right.unsigned_abs())
    }
}

fn to_i16(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * 32767.0) as i16
}
