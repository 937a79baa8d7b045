//! Core IR types for the modtick MOD player.
//!
//! This crate defines the decoded song representation shared by the
//! format decoder, the playback engine, and any UI reading song data.
//! A `Song` is immutable once decoded.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod cell_format;
mod effects;
mod event;
mod format;
mod pattern;
mod period;
mod sample;
pub mod song;

pub use cell_format::{format_cell, format_effect, format_position, format_sample_number};
pub use effects::Effect;
pub use event::{EventSink, LoopRegion, PlaybackEvent};
pub use format::FormatTag;
pub use pattern::{Note, Pattern, ROWS_PER_PATTERN};
pub use period::{nearest_note_name, AMIGA_PERIODS, PERIOD_MAX, PERIOD_MIN};
pub use sample::Sample;
pub use song::{Song, DEFAULT_TEMPO, DEFAULT_TICKS_PER_ROW, MAX_SONG_LENGTH, NUM_SAMPLES};
