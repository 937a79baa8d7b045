//! Period-to-frequency conversion and tick timing.

use core::time::Duration;

/// PAL Amiga clock in Hz.
pub const AMIGA_PAL_CLOCK: f64 = 7_093_789.2;

/// Pitch multiplier for a finetune nibble.
///
/// Each step is an eighth of a semitone (`2^(1/96)`). Nibbles 0-7 tune up,
/// 9-15 tune down as -7..-1, and 8 plays untuned.
pub fn tuning_factor(finetune: u8) -> f64 {
    let finetune = finetune & 0x0F;
    if finetune == 8 {
        return 1.0;
    }
    let offset = if finetune <= 7 { finetune as i8 } else { finetune as i8 - 16 };
    libm::pow(2.0, offset as f64 / 96.0)
}

/// Playback frequency in Hz for an Amiga period. Period 0 yields 0.
pub fn period_to_frequency(period: u16, finetune: u8) -> f64 {
    if period == 0 {
        return 0.0;
    }
    (AMIGA_PAL_CLOCK / (period as f64 * 2.0)) * tuning_factor(finetune)
}

/// Real-time length of one tick: `2.5 / tempo` seconds.
pub fn tick_duration(tempo: u8) -> Duration {
    Duration::from_secs_f64(2.5 / tempo.max(1) as f64)
}
