//! Pattern and note types.

use alloc::vec::Vec;
use crate::effects::Effect;

/// Every MOD pattern has exactly 64 rows.
pub const ROWS_PER_PATTERN: usize = 64;

/// A single pattern cell as stored in the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Note {
    /// Sample number (0 = keep current sample, 1-31 = explicit sample)
    pub sample: u8,
    /// Amiga period (0 = no new pitch)
    pub period: u16,
    /// Effect command nibble (0x0-0xF)
    pub command: u8,
    /// Effect parameter
    pub param: u8,
}

impl Note {
    /// Create an empty note.
    pub const fn empty() -> Self {
        Self { sample: 0, period: 0, command: 0, param: 0 }
    }

    /// Decoded effect for this note.
    pub fn effect(&self) -> Effect {
        Effect::parse(self.command, self.param)
    }

    /// Returns true if this note retriggers a sample.
    pub fn has_pitch(&self) -> bool {
        self.period != 0
    }

    /// Returns true if the cell is completely empty.
    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}

/// A 64-row grid of notes, stored row-major: `notes[row * channels + channel]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    /// Number of channels
    pub channels: u8,
    notes: Vec<Note>,
}

impl Pattern {
    /// Create a pattern with empty notes.
    pub fn new(channels: u8) -> Self {
        Self {
            channels,
            notes: alloc::vec![Note::empty(); ROWS_PER_PATTERN * channels as usize],
        }
    }

    /// Build a pattern from row-major notes. Returns `None` if the note
    /// count doesn't match 64 rows of `channels` cells.
    pub fn from_notes(channels: u8, notes: Vec<Note>) -> Option<Self> {
        if notes.len() != ROWS_PER_PATTERN * channels as usize {
            return None;
        }
        Some(Self { channels, notes })
    }

    /// Get a note. Out-of-range coordinates yield `None`.
    pub fn note(&self, row: usize, channel: usize) -> Option<&Note> {
        if row >= ROWS_PER_PATTERN || channel >= self.channels as usize {
            return None;
        }
        self.notes.get(row * self.channels as usize + channel)
    }

    /// Get a mutable note (used while decoding and in tests).
    pub fn note_mut(&mut self, row: usize, channel: usize) -> Option<&mut Note> {
        if row >= ROWS_PER_PATTERN || channel >= self.channels as usize {
            return None;
        }
        self.notes.get_mut(row * self.channels as usize + channel)
    }

    /// All notes in a row, in channel order.
    pub fn row(&self, row: usize) -> &[Note] {
        if row >= ROWS_PER_PATTERN {
            return &[];
        }
        let start = row * self.channels as usize;
        &self.notes[start..start + self.channels as usize]
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Note]> {
        self.notes.chunks(self.channels.max(1) as usize)
    }
}
