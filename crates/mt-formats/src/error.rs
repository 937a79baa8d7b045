//! Decode error type.

/// Why a buffer could not be decoded. Any of these aborts the load.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Shorter than the fixed 1084-byte header
    #[error("buffer too short for a MOD header: {len} bytes (need 1084)")]
    TooShort { len: usize },

    /// A fixed-offset read ran past the end of the buffer
    #[error("read of {needed} bytes at offset {offset} exceeds buffer of {len} bytes")]
    UnexpectedEof { offset: usize, needed: usize, len: usize },

    /// Song length byte outside 1..=128
    #[error("invalid song length {0} (expected 1-128)")]
    InvalidSongLength(u8),

    /// Pattern data extends beyond the buffer
    #[error("pattern {pattern} at offset {offset} exceeds buffer of {len} bytes")]
    PatternOutOfBounds { pattern: usize, offset: usize, len: usize },

    /// Sample data starts beyond the buffer
    #[error("sample {sample} data at offset {offset} exceeds buffer of {len} bytes")]
    SampleOutOfBounds { sample: usize, offset: usize, len: usize },
}
