//! Song structure.

use alloc::string::String;
use alloc::vec::Vec;

use crate::format::FormatTag;
use crate::pattern::{Note, Pattern};
use crate::sample::Sample;

/// Default tempo in BPM.
pub const DEFAULT_TEMPO: u8 = 125;

/// Default speed (ticks per row).
pub const DEFAULT_TICKS_PER_ROW: u8 = 6;

/// Sample slots in a 31-instrument module.
pub const NUM_SAMPLES: usize = 31;

/// Maximum number of pattern-table entries.
pub const MAX_SONG_LENGTH: usize = 128;

/// A decoded module. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Song {
    /// Song title (falls back to the file name when blank)
    pub title: String,
    /// Format signature
    pub format: FormatTag,
    /// Pattern table: song position → pattern index
    pub pattern_table: Vec<u8>,
    /// Stored patterns, indexed by pattern number
    pub patterns: Vec<Pattern>,
    /// The 31 sample slots; sample number `n` lives at index `n - 1`
    pub samples: Vec<Sample>,
}

impl Song {
    /// Create an empty song with one blank pattern at position 0.
    pub fn new(title: &str, format: FormatTag) -> Self {
        Self {
            title: String::from(title),
            format,
            pattern_table: alloc::vec![0],
            patterns: alloc::vec![Pattern::new(format.channel_count())],
            samples: (0..NUM_SAMPLES).map(|_| Sample::default()).collect(),
        }
    }

    /// Number of playback channels (4, 6, or 8).
    pub fn channel_count(&self) -> u8 {
        self.format.channel_count()
    }

    /// Number of valid pattern-table entries.
    pub fn song_length(&self) -> usize {
        self.pattern_table.len()
    }

    /// Look up a sample by its 1-based tracker number.
    pub fn sample(&self, number: u8) -> Option<&Sample> {
        if number == 0 {
            return None;
        }
        self.samples.get(number as usize - 1)
    }

    /// Pattern played at a song position.
    pub fn pattern_at(&self, position: usize) -> Option<&Pattern> {
        let index = *self.pattern_table.get(position)?;
        self.patterns.get(index as usize)
    }

    /// The notes of one row at a song position.
    pub fn row_at(&self, position: usize, row: usize) -> &[Note] {
        self.pattern_at(position).map_or(&[][..], |p| p.row(row))
    }

    /// Samples worth listing: 1-based number paired with the sample.
    pub fn audible_samples(&self) -> impl Iterator<Item = (u8, &Sample)> {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, s)| s.length > 2)
            .map(|(i, s)| (i as u8 + 1, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_song() -> Song {
        let mut song = Song::new("test", FormatTag::MK);
        song.patterns.push(Pattern::new(4));
        song.pattern_table = vec![1, 0, 1];
        song.patterns[1].note_mut(3, 2).unwrap().period = 214;
        song.samples[0].length = 100;
        song.samples[0].data = vec![0.0; 100];
        song.samples[4].length = 2;
        song
    }

    #[test]
    fn new_song_has_31_empty_samples() {
        let song = Song::new("x", FormatTag::EightChn);
        assert_eq!(song.samples.len(), NUM_SAMPLES);
        assert_eq!(song.channel_count(), 8);
        assert_eq!(song.song_length(), 1);
        assert_eq!(song.patterns[0].channels, 8);
    }

    #[test]
    fn sample_numbers_are_one_based() {
        let song = make_test_song();
        assert!(song.sample(0).is_none());
        assert_eq!(song.sample(1).unwrap().length, 100);
        assert!(song.sample(31).is_some());
        assert!(song.sample(32).is_none());
    }

    #[test]
    fn rows_resolve_through_pattern_table() {
        let song = make_test_song();
        assert_eq!(song.row_at(0, 3)[2].period, 214);
        assert_eq!(song.row_at(1, 3)[2].period, 0);
        assert!(song.row_at(3, 0).is_empty());
    }

    #[test]
    fn audible_samples_skip_tiny_slots() {
        let song = make_test_song();
        let numbers: Vec<u8> = song.audible_samples().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![1]);
    }
}
