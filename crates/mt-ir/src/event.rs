//! Playback events sent from the sequencer to an audio renderer.

use alloc::vec::Vec;

/// Loop window of a triggered sample, in bytes, already clamped to the sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopRegion {
    pub start: u32,
    pub end: u32,
}

/// What the renderer should do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlaybackEvent {
    /// Start a sample from its beginning, replacing whatever the channel played
    NoteOn {
        channel: u8,
        /// 1-based sample number
        sample: u8,
        frequency: f64,
        /// 0-64
        volume: u8,
        /// 0.0 = left, 1.0 = right
        pan: f32,
        looping: Option<LoopRegion>,
    },
    /// Change the volume of the channel's current voice
    VolumeChange { channel: u8, volume: u8 },
    /// Silence the channel
    Stop { channel: u8 },
}

impl PlaybackEvent {
    /// The channel this event targets.
    pub fn channel(&self) -> u8 {
        match self {
            PlaybackEvent::NoteOn { channel, .. }
            | PlaybackEvent::VolumeChange { channel, .. }
            | PlaybackEvent::Stop { channel } => *channel,
        }
    }
}

/// Consumer of playback events (an audio renderer, a recorder, a test).
pub trait EventSink {
    fn handle(&mut self, event: PlaybackEvent);
}

impl EventSink for Vec<PlaybackEvent> {
    fn handle(&mut self, event: PlaybackEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn handle(&mut self, event: PlaybackEvent) {
        (**self).handle(event);
    }
}

/// Discards every event.
impl EventSink for () {
    fn handle(&mut self, _event: PlaybackEvent) {}
}
