//! Transport and player state aggregates.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::time::Duration;

use mt_ir::{Song, DEFAULT_TEMPO, DEFAULT_TICKS_PER_ROW};

use crate::channel::ChannelState;
use crate::frequency::tick_duration;

/// Transport mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The logical clock: where playback is and how fast it moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportState {
    pub state: PlayState,
    /// Index into the pattern table (`< song_length`)
    pub position: usize,
    /// Row within the current pattern (`< 64`)
    pub row: usize,
    /// Tick within the current row (`< ticks_per_row`)
    pub tick: u8,
    /// Speed (>= 1)
    pub ticks_per_row: u8,
    /// Tempo in BPM
    pub tempo: u8,
    /// Set when a jump/break in the current row already chose the next row
    pub row_jumped: bool,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            state: PlayState::Stopped,
            position: 0,
            row: 0,
            tick: 0,
            ticks_per_row: DEFAULT_TICKS_PER_ROW,
            tempo: DEFAULT_TEMPO,
            row_jumped: false,
        }
    }
}

impl TransportState {
    /// Time until the next tick at the current tempo.
    pub fn tick_duration(&self) -> Duration {
        tick_duration(self.tempo)
    }

    /// Back to position 0, row 0, tick 0.
    pub fn rewind(&mut self) {
        self.position = 0;
        self.row = 0;
        self.tick = 0;
        self.row_jumped = false;
    }
}

/// Everything the sequencer reads and writes for one loaded song.
#[derive(Clone, Debug)]
pub struct PlayerState {
    pub song: Arc<Song>,
    pub channels: Vec<ChannelState>,
    pub transport: TransportState,
}

impl PlayerState {
    pub fn new(song: Arc<Song>) -> Self {
        let channels = ChannelState::for_channels(song.channel_count());
        Self {
            song,
            channels,
            transport: TransportState::default(),
        }
    }

    /// Owned copy of the mutable state, safe to hand to another thread.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            transport: self.transport,
            channels: self.channels.clone(),
        }
    }
}

/// Point-in-time copy of transport and channel state for readers.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    pub transport: TransportState,
    pub channels: Vec<ChannelState>,
}
