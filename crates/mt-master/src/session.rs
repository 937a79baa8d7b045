//! Transport plus renderer, driven by an audio-frame clock.

use std::sync::Arc;
use std::time::Duration;

use mt_engine::{Frame, Mixer, PlayState, PlayerSnapshot, Transport};
use mt_ir::Song;

use crate::error::MasterError;

/// Everything the render thread touches, kept behind one lock.
///
/// Time is the number of frames rendered so far, so ticks fall on exact
/// frame boundaries regardless of how the device schedules callbacks.
#[derive(Debug)]
pub struct Session {
    transport: Transport,
    mixer: Mixer,
    frames: u64,
}

impl Session {
    pub fn new(sample_rate: u32, master_volume: f32) -> Self {
        let mut mixer = Mixer::new(sample_rate);
        mixer.set_master_volume(master_volume);
        Self {
            transport: Transport::new(),
            mixer,
            frames: 0,
        }
    }

    /// Current position of the frame clock.
    pub fn now(&self) -> Duration {
        let rate = self.mixer.sample_rate() as u128;
        Duration::from_nanos((self.frames as u128 * 1_000_000_000 / rate) as u64)
    }

    pub fn sample_rate(&self) -> u32 {
        self.mixer.sample_rate()
    }

    /// Switch the output rate. Voices restart silent; the clock keeps its time.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        if sample_rate == self.mixer.sample_rate() {
            return;
        }
        let now = self.now();
        let volume = self.mixer.master_volume();
        self.mixer = Mixer::new(sample_rate);
        self.mixer.set_master_volume(volume);
        self.mixer.set_song(self.transport.song().cloned());
        self.frames = (now.as_nanos() * sample_rate as u128 / 1_000_000_000) as u64;
    }

    pub fn load(&mut self, data: &[u8], name: &str) -> Result<Arc<Song>, MasterError> {
        let song = self.transport.load(data, name, &mut self.mixer)?;
        self.mixer.set_song(Some(Arc::clone(&song)));
        Ok(song)
    }

    pub fn load_song(&mut self, song: Song) -> Arc<Song> {
        let song = self.transport.load_song(song, &mut self.mixer);
        self.mixer.set_song(Some(Arc::clone(&song)));
        song
    }

    pub fn play(&mut self) -> bool {
        let now = self.now();
        self.transport.play(now)
    }

    pub fn pause(&mut self) -> bool {
        self.transport.pause(&mut self.mixer)
    }

    pub fn stop(&mut self) -> bool {
        self.transport.stop(&mut self.mixer)
    }

    pub fn seek(&mut self, position: usize) -> usize {
        let now = self.now();
        self.transport.seek(position, now, &mut self.mixer)
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.mixer.set_master_volume(volume);
    }

    pub fn master_volume(&self) -> f32 {
        self.mixer.master_volume()
    }

    pub fn state(&self) -> PlayState {
        self.transport.state()
    }

    pub fn song(&self) -> Option<Arc<Song>> {
        self.transport.song().cloned()
    }

    pub fn snapshot(&self) -> Option<PlayerSnapshot> {
        self.transport.snapshot()
    }

    /// Render `out.len()` frames, running each tick on the frame it falls due.
    pub fn render(&mut self, out: &mut [Frame]) {
        for frame in out.iter_mut() {
            let now = self.now();
            self.transport.poll(now, &mut self.mixer);
            *frame = self.mixer.render_frame();
            self.frames += 1;
        }
    }
}
