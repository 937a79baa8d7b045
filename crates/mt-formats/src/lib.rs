//! Format decoding for the modtick player.
//!
//! Turns a raw MOD buffer into an immutable [`mt_ir::Song`].

mod byte_reader;
mod error;
mod mod_format;

pub use byte_reader::ByteReader;
pub use error::FormatError;
pub use mod_format::{
    encode_cell, load_mod, parse_cell, pattern_stride, CELL_SIZE, FORMAT_TAG_OFFSET, HEADER_SIZE,
    PATTERN_TABLE_OFFSET, SAMPLE_RECORD_SIZE, SAMPLE_TABLE_OFFSET, SONG_LENGTH_OFFSET,
};
