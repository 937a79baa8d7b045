//! Sample definitions and PCM data.

use alloc::vec::Vec;
use core::ops::Range;
use arrayvec::ArrayString;

/// A sample slot from the module header plus its decoded PCM.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sample {
    /// Sample name (printable ASCII, trimmed)
    pub name: ArrayString<22>,
    /// Length in bytes (stored word count × 2)
    pub length: u32,
    /// Finetune nibble (0-15, 0 and 8 play untuned)
    pub finetune: u8,
    /// Default volume (0-64)
    pub volume: u8,
    /// Loop start in bytes
    pub loop_start: u32,
    /// Loop length in bytes (> 2 means looped)
    pub loop_length: u32,
    /// PCM normalized to [-1, 1), one value per byte of `length`
    pub data: Vec<f32>,
}

impl Sample {
    /// Create an empty sample slot.
    pub fn new(name: &str) -> Self {
        let mut sample = Self::default();
        let _ = sample.name.try_push_str(name);
        sample
    }

    /// Number of PCM frames.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// A sample with no audio must never be triggered.
    pub fn is_empty(&self) -> bool {
        self.length == 0 || self.data.is_empty()
    }

    /// Returns true if the header declares a loop.
    pub fn has_loop(&self) -> bool {
        self.loop_length > 2
    }

    /// Signed finetune in eighths of a semitone (-8..=7).
    pub fn finetune_offset(&self) -> i8 {
        let f = (self.finetune & 0x0F) as i8;
        if f <= 7 { f } else { f - 16 }
    }

    /// Loop bounds in frames, clamped to `[0, len)`.
    ///
    /// Returns `None` for unlooped samples and for loops that collapse
    /// to nothing after clamping.
    pub fn loop_range(&self) -> Option<Range<usize>> {
        if !self.has_loop() {
            return None;
        }
        let len = self.len();
        let start = (self.loop_start as usize).min(len);
        let end = (self.loop_start as usize + self.loop_length as usize).min(len);
        (end > start).then_some(start..end)
    }

    /// Decode unsigned file bytes as 8-bit two's complement PCM.
    pub fn decode_pcm(bytes: &[u8]) -> Vec<f32> {
        bytes.iter().map(|&b| pcm_value(b)).collect()
    }
}

/// Bytes >= 128 are negative amplitudes.
fn pcm_value(byte: u8) -> f32 {
    let signed = if byte < 128 { byte as i16 } else { byte as i16 - 256 };
    signed as f32 / 128.0
}
