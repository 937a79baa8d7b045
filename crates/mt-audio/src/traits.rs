//! Audio output trait and error types.

use mt_engine::Frame;

/// Error type for audio operations.
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("device init error: {0}")]
    DeviceInit(String),
    #[error("stream create error: {0}")]
    StreamCreate(String),
    #[error("playback error: {0}")]
    Playback(String),
    #[error("no audio output device available")]
    NoDevice,
}

/// A sink for rendered frames.
pub trait AudioOutput {
    fn sample_rate(&self) -> u32;

    /// Queue frames, blocking until all of them have been accepted.
    fn write(&mut self, frames: &[Frame]);

    fn start(&mut self) -> Result<(), AudioError>;

    fn stop(&mut self) -> Result<(), AudioError>;
}
