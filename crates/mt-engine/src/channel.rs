//! Per-channel playback state.

use alloc::vec::Vec;

/// Pan of even channels (0.0 = left, 1.0 = right).
pub const LEFT_PAN: f32 = 0.3;
/// Pan of odd channels.
pub const RIGHT_PAN: f32 = 0.7;

/// The most recent note that actually sounded on a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LastNote {
    pub sample: u8,
    pub period: u16,
}

/// Sequencer state for one channel. Written only by the sequencer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelState {
    /// Current 1-based sample number (0 = none yet)
    pub sample: u8,
    /// Current period (0 = none yet)
    pub period: u16,
    /// Current volume (0-64)
    pub volume: u8,
    /// Stereo position
    pub pan: f32,
    /// Effect command of the last processed row
    pub command: u8,
    /// Effect parameter of the last processed row
    pub param: u8,
    /// Last note triggered, for display
    pub last_note: Option<LastNote>,
}

impl ChannelState {
    /// Fresh state for channel `index`: silent, alternating left/right.
    pub fn new(index: usize) -> Self {
        Self {
            sample: 0,
            period: 0,
            volume: 0,
            pan: if index % 2 == 0 { LEFT_PAN } else { RIGHT_PAN },
            command: 0,
            param: 0,
            last_note: None,
        }
    }

    /// One fresh state per channel.
    pub fn for_channels(count: u8) -> Vec<ChannelState> {
        (0..count as usize).map(ChannelState::new).collect()
    }
}
