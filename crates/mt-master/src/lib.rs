//! Headless controller for the modtick player.
//!
//! A [`Controller`] owns one [`Session`] (transport and mixer) behind a
//! mutex. The real-time output thread locks it once per block to render,
//! control calls lock it to change transport state, and readers take
//! owned [`PlayerSnapshot`]s, so nothing observes a half-applied tick.

mod config;
mod error;
mod session;
mod wav;

use mt_audio::{AudioError, AudioOutput, CpalOutput};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

pub use config::PlayerConfig;
pub use error::MasterError;
pub use session::Session;
pub use wav::{frames_to_wav, write_wav, write_wav_file};

// Re-export common types so callers don't need mt-ir/mt-engine directly.
pub use mt_engine::{ChannelState, Frame, PlayState, PlayerSnapshot, TransportState};
pub use mt_formats::FormatError;
pub use mt_ir::Song;

/// Loads songs and drives playback, offline or on the default device.
pub struct Controller {
    config: PlayerConfig,
    session: Arc<Mutex<Session>>,
    output: Option<OutputHandle>,
}

struct OutputHandle {
    stop_signal: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn new(config: PlayerConfig) -> Self {
        let session = Session::new(config.sample_rate, config.master_volume);
        Self {
            config,
            session: Arc::new(Mutex::new(session)),
            output: None,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    // --- Song management ---

    /// Decode and install a module. A failed decode keeps the previous song.
    pub fn load(&self, data: &[u8], name: &str) -> Result<Arc<Song>, MasterError> {
        let song = self.session.lock().load(data, name)?;
        tracing::info!(
            title = %song.title,
            format = song.format.label(),
            channels = song.channel_count(),
            positions = song.song_length(),
            "loaded module"
        );
        Ok(song)
    }

    pub fn load_song(&self, song: Song) -> Arc<Song> {
        self.session.lock().load_song(song)
    }

    pub fn song(&self) -> Option<Arc<Song>> {
        self.session.lock().song()
    }

    // --- Transport ---

    pub fn play(&self) -> bool {
        let changed = self.session.lock().play();
        tracing::debug!(changed, "play");
        changed
    }

    pub fn pause(&self) -> bool {
        let changed = self.session.lock().pause();
        tracing::debug!(changed, "pause");
        changed
    }

    pub fn stop(&self) -> bool {
        let changed = self.session.lock().stop();
        tracing::debug!(changed, "stop");
        changed
    }

    /// Jump to a pattern-table position; returns the clamped position.
    pub fn seek(&self, position: usize) -> usize {
        let landed = self.session.lock().seek(position);
        tracing::debug!(requested = position, landed, "seek");
        landed
    }

    pub fn set_master_volume(&self, volume: f32) {
        self.session.lock().set_master_volume(volume);
    }

    pub fn state(&self) -> PlayState {
        self.session.lock().state()
    }

    /// Owned copy of transport and channel state.
    pub fn snapshot(&self) -> Option<PlayerSnapshot> {
        self.session.lock().snapshot()
    }

    // --- Real-time output ---

    /// Open the default device and start the render thread.
    ///
    /// Returns the device sample rate. The session is re-timed to it.
    pub fn start_output(&mut self) -> Result<u32, MasterError> {
        self.stop_output();

        let stop_signal = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::channel();
        let session = Arc::clone(&self.session);
        let stop = Arc::clone(&stop_signal);
        let block_frames = self.config.block_frames.max(1);
        let buffer_ms = self.config.buffer_ms;

        let thread = std::thread::spawn(move || {
            audio_thread(session, stop, block_frames, buffer_ms, ready_tx);
        });
        self.output = Some(OutputHandle {
            stop_signal,
            thread: Some(thread),
        });

        match ready_rx.recv() {
            Ok(Ok(rate)) => {
                tracing::info!(sample_rate = rate, "audio output started");
                Ok(rate)
            }
            Ok(Err(e)) => {
                self.stop_output();
                Err(e.into())
            }
            Err(_) => {
                self.stop_output();
                Err(MasterError::OutputThread)
            }
        }
    }

    /// Stop the render thread and release the device.
    pub fn stop_output(&mut self) {
        if let Some(mut output) = self.output.take() {
            output.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = output.thread.take() {
                if handle.join().is_err() {
                    tracing::error!("audio thread panicked");
                }
            }
        }
    }

    pub fn is_output_running(&self) -> bool {
        self.output.is_some()
    }

    // --- Offline rendering ---

    /// Render `count` frames on the calling thread, advancing the same
    /// clock and transport the real-time thread would.
    pub fn render_frames(&self, count: usize) -> Vec<Frame> {
        let mut frames = vec![Frame::silence(); count];
        for block in frames.chunks_mut(self.config.block_frames.max(1)) {
            render_block(&self.session, block);
        }
        frames
    }

    /// Render `seconds` of audio and encode it as WAV bytes.
    pub fn render_to_wav(&self, seconds: f32) -> Result<Vec<u8>, MasterError> {
        let (frames, rate) = self.render_seconds(seconds)?;
        Ok(frames_to_wav(&frames, rate)?)
    }

    /// Render `seconds` of audio into a WAV file.
    pub fn render_to_wav_file(&self, path: &Path, seconds: f32) -> Result<usize, MasterError> {
        let (frames, rate) = self.render_seconds(seconds)?;
        write_wav_file(path, &frames, rate)?;
        tracing::info!(path = %path.display(), frames = frames.len(), "wrote WAV");
        Ok(frames.len())
    }

    fn render_seconds(&self, seconds: f32) -> Result<(Vec<Frame>, u32), MasterError> {
        if self.song().is_none() {
            return Err(MasterError::NoSong);
        }
        let rate = self.session.lock().sample_rate();
        let count = (seconds.max(0.0) as f64 * rate as f64) as usize;
        Ok((self.render_frames(count), rate))
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop_output();
    }
}

/// Render one block under the session lock.
fn render_block(session: &Mutex<Session>, block: &mut [Frame]) {
    let mut session = session.lock();
    #[cfg(feature = "alloc_check")]
    assert_no_alloc::assert_no_alloc(|| session.render(block));
    #[cfg(not(feature = "alloc_check"))]
    session.render(block);
}

/// Render one block and hand it to the output.
fn pump<O: AudioOutput>(output: &mut O, session: &Mutex<Session>, block: &mut [Frame]) {
    render_block(session, block);
    output.write(block);
}

fn audio_thread(
    session: Arc<Mutex<Session>>,
    stop_signal: Arc<AtomicBool>,
    block_frames: usize,
    buffer_ms: u32,
    ready: mpsc::Sender<Result<u32, AudioError>>,
) {
    let (mut output, consumer) = match CpalOutput::new(buffer_ms) {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };
    if let Err(e) = output.build_stream(consumer) {
        let _ = ready.send(Err(e));
        return;
    }
    if let Err(e) = output.start() {
        let _ = ready.send(Err(e));
        return;
    }

    let rate = output.sample_rate();
    session.lock().set_sample_rate(rate);
    let _ = ready.send(Ok(rate));

    let mut block = vec![Frame::silence(); block_frames];
    while !stop_signal.load(Ordering::Relaxed) {
        pump(&mut output, &session, &mut block);
    }

    // Let the ring buffer drain before the stream goes away.
    block.fill(Frame::silence());
    for _ in 0..(rate as usize / block_frames / 10).max(1) {
        output.write(&block);
    }
    if let Err(e) = output.stop() {
        tracing::warn!("stopping audio output: {}", e);
    }
    let underruns = output.underruns();
    if underruns > 0 {
        tracing::warn!(underruns, "audio output ran dry");
    }
}
