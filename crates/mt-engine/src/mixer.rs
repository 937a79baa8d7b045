//! Reference renderer: plays triggered samples into stereo frames.

use alloc::sync::Arc;
use mt_ir::{EventSink, LoopRegion, PlaybackEvent, Song};

use crate::frame::Frame;

/// Channels the mixer can voice (the largest MOD layout).
const MAX_VOICES: usize = 8;

/// One sounding sample on a channel.
#[derive(Clone, Copy, Debug)]
struct Voice {
    /// 1-based sample number
    sample: u8,
    /// Fractional read position in frames
    position: f64,
    /// Frames advanced per output frame
    step: f64,
    volume: u8,
    pan: f32,
    looping: Option<LoopRegion>,
}

impl Voice {
    /// Move forward one output frame. Returns false once an unlooped voice
    /// runs off the end of its data.
    fn advance(&mut self, len: usize) -> bool {
        self.position += self.step;
        match self.looping {
            Some(region) if self.position >= region.end as f64 => {
                let start = region.start as f64;
                let span = region.end.saturating_sub(region.start).max(1) as f64;
                self.position = start + libm::fmod(self.position - start, span);
                true
            }
            Some(_) => true,
            None => self.position < len as f64,
        }
    }
}

/// Consumes playback events and renders the resulting voices.
///
/// Voices live in a fixed array so rendering and event handling never
/// allocate.
#[derive(Debug)]
pub struct Mixer {
    song: Option<Arc<Song>>,
    voices: [Option<Voice>; MAX_VOICES],
    sample_rate: u32,
    master_volume: f32,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            song: None,
            voices: [None; MAX_VOICES],
            sample_rate: sample_rate.max(1),
            master_volume: 1.0,
        }
    }

    /// Switch to a new song's sample bank. All voices are silenced.
    pub fn set_song(&mut self, song: Option<Arc<Song>>) {
        self.song = song;
        self.voices = [None; MAX_VOICES];
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Output gain, clamped to [0, 1].
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    /// Number of channels currently producing sound.
    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_some()).count()
    }

    /// Mix one output frame and advance every voice.
    pub fn render_frame(&mut self) -> Frame {
        let Some(song) = self.song.as_ref() else {
            return Frame::silence();
        };

        let mut left = 0.0f32;
        let mut right = 0.0f32;
        for slot in self.voices.iter_mut() {
            let Some(voice) = slot.as_mut() else {
                continue;
            };
            let Some(sample) = song.sample(voice.sample) else {
                *slot = None;
                continue;
            };
            let Some(&value) = sample.data.get(voice.position as usize) else {
                *slot = None;
                continue;
            };

            let value = value * voice.volume as f32 / 64.0;
            left += value * (1.0 - voice.pan);
            right += value * voice.pan;

            if !voice.advance(sample.data.len()) {
                *slot = None;
            }
        }

        Frame::from_f32(left * self.master_volume, right * self.master_volume)
    }

    /// Fill `out` with consecutive frames.
    pub fn render_into(&mut self, out: &mut [Frame]) {
        for frame in out.iter_mut() {
            *frame = self.render_frame();
        }
    }
}

impl EventSink for Mixer {
    fn handle(&mut self, event: PlaybackEvent) {
        let Some(slot) = self.voices.get_mut(event.channel() as usize) else {
            log::trace!("event for unvoiced channel {}", event.channel());
            return;
        };
        match event {
            PlaybackEvent::NoteOn {
                sample,
                frequency,
                volume,
                pan,
                looping,
                ..
            } => {
                *slot = Some(Voice {
                    sample,
                    position: 0.0,
                    step: frequency / self.sample_rate as f64,
                    volume,
                    pan,
                    // Empty or inverted regions play through unlooped.
                    looping: looping.filter(|r| r.end > r.start),
                });
            }
            PlaybackEvent::VolumeChange { volume, .. } => {
                if let Some(voice) = slot.as_mut() {
                    voice.volume = volume;
                }
            }
            PlaybackEvent::Stop { .. } => *slot = None,
        }
    }
}
