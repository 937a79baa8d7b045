//! Controller error type.

use mt_audio::AudioError;
use mt_formats::FormatError;

#[derive(thiserror::Error, Debug)]
pub enum MasterError {
    #[error("module decode failed: {0}")]
    Format(#[from] FormatError),
    #[error("audio output failed: {0}")]
    Audio(#[from] AudioError),
    #[error("WAV write failed: {0}")]
    Wav(#[from] hound::Error),
    #[error("no song loaded")]
    NoSong,
    #[error("audio thread exited before reporting its device")]
    OutputThread,
}
