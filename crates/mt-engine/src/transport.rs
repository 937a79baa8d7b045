//! Play/pause/stop/seek state machine around the sequencer.

use alloc::sync::Arc;
use core::time::Duration;

use mt_ir::{EventSink, PlaybackEvent, Song};

use crate::channel::ChannelState;
use crate::scheduler::{ScheduledTick, TickScheduler, TickToken};
use crate::sequencer::advance_tick;
use crate::state::{PlayState, PlayerSnapshot, PlayerState, TransportState};

/// Owns the loaded song's player state and the single pending tick.
///
/// Nothing here reads a clock: callers pass `now` in, and either drive
/// ticks by polling ([`Transport::poll`]) or by firing the token of the
/// tick they were told to wait for ([`Transport::fire`]).
#[derive(Debug, Default)]
pub struct Transport {
    player: Option<PlayerState>,
    scheduler: TickScheduler,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a module and make it the current song.
    ///
    /// Playback is stopped first. On a decode error the previous song stays
    /// loaded (stopped, rewound) and the error is returned.
    #[cfg(feature = "std")]
    pub fn load<S: EventSink>(
        &mut self,
        data: &[u8],
        fallback_name: &str,
        sink: &mut S,
    ) -> Result<Arc<Song>, mt_formats::FormatError> {
        self.halt(sink);
        if let Some(player) = self.player.as_mut() {
            player.transport.state = PlayState::Stopped;
            player.transport.rewind();
        }
        let song = mt_formats::load_mod(data, fallback_name).map_err(|e| {
            log::warn!("load of '{}' failed: {}", fallback_name, e);
            e
        })?;
        Ok(self.load_song(song, sink))
    }

    /// Install an already decoded song, replacing any current one.
    pub fn load_song<S: EventSink>(&mut self, song: Song, sink: &mut S) -> Arc<Song> {
        self.halt(sink);
        let song = Arc::new(song);
        log::debug!(
            "loaded '{}': {} channels, {} positions",
            song.title,
            song.channel_count(),
            song.song_length()
        );
        self.player = Some(PlayerState::new(Arc::clone(&song)));
        song
    }

    /// Start or resume. The first tick is due at `now`.
    ///
    /// Returns false if nothing changed (already playing or no song).
    pub fn play(&mut self, now: Duration) -> bool {
        let Some(player) = self.player.as_mut() else {
            return false;
        };
        match player.transport.state {
            PlayState::Playing => return false,
            PlayState::Stopped => player.transport.tick = 0,
            PlayState::Paused => {}
        }
        player.transport.state = PlayState::Playing;
        self.scheduler.arm(now);
        true
    }

    /// Freeze at the current tick. Only valid while playing.
    pub fn pause<S: EventSink>(&mut self, sink: &mut S) -> bool {
        if self.state() != PlayState::Playing {
            return false;
        }
        self.halt(sink);
        self.set_state(PlayState::Paused);
        true
    }

    /// Stop and rewind to the start of the song.
    pub fn stop<S: EventSink>(&mut self, sink: &mut S) -> bool {
        if self.state() == PlayState::Stopped {
            return false;
        }
        self.halt(sink);
        if let Some(player) = self.player.as_mut() {
            player.transport.state = PlayState::Stopped;
            player.transport.rewind();
        }
        true
    }

    /// Jump to row 0 of a pattern-table position, clamped to the song.
    ///
    /// A playing transport keeps playing from the new position, with the
    /// next tick due at `now`. Returns the position actually chosen.
    pub fn seek<S: EventSink>(&mut self, position: usize, now: Duration, sink: &mut S) -> usize {
        let Some(player) = self.player.as_ref() else {
            return 0;
        };
        let was_playing = player.transport.state == PlayState::Playing;
        let last = player.song.song_length().saturating_sub(1);
        self.halt(sink);

        let Some(player) = self.player.as_mut() else {
            return 0;
        };
        let transport = &mut player.transport;
        transport.position = position.min(last);
        transport.row = 0;
        transport.tick = 0;
        transport.row_jumped = false;
        if was_playing {
            self.scheduler.arm(now);
        }
        transport.position
    }

    /// Run every tick due at or before `now`.
    ///
    /// Each tick re-arms the next one at its own deadline plus the tick
    /// length at the tempo in force after it ran, so timing does not drift
    /// with how late `poll` is called. Returns the number of ticks run.
    pub fn poll<S: EventSink>(&mut self, now: Duration, sink: &mut S) -> usize {
        let mut ran = 0;
        while let Some(tick) = self.scheduler.take_due(now) {
            match self.run_tick(sink) {
                Some(next) => {
                    self.scheduler.arm(tick.deadline + next);
                }
                None => break,
            }
            ran += 1;
        }
        ran
    }

    /// Run the tick named by `token`, if it is still the pending one.
    ///
    /// The following tick is armed relative to `now`. Stale or cancelled
    /// tokens do nothing and return false.
    pub fn fire<S: EventSink>(&mut self, token: TickToken, now: Duration, sink: &mut S) -> bool {
        if self.scheduler.claim(token).is_none() {
            return false;
        }
        match self.run_tick(sink) {
            Some(next) => {
                self.scheduler.arm(now + next);
                true
            }
            None => false,
        }
    }

    /// The pending tick, if playing.
    pub fn next_tick(&self) -> Option<ScheduledTick> {
        self.scheduler.pending()
    }

    pub fn state(&self) -> PlayState {
        self.player.as_ref().map_or(PlayState::Stopped, |p| p.transport.state)
    }

    pub fn song(&self) -> Option<&Arc<Song>> {
        self.player.as_ref().map(|p| &p.song)
    }

    pub fn player(&self) -> Option<&PlayerState> {
        self.player.as_ref()
    }

    pub fn transport(&self) -> Option<&TransportState> {
        self.player.as_ref().map(|p| &p.transport)
    }

    pub fn channels(&self) -> &[ChannelState] {
        self.player.as_ref().map_or(&[][..], |p| p.channels.as_slice())
    }

    pub fn snapshot(&self) -> Option<PlayerSnapshot> {
        self.player.as_ref().map(PlayerState::snapshot)
    }

    /// Advance one tick and forward its events. Returns the next tick length.
    fn run_tick<S: EventSink>(&mut self, sink: &mut S) -> Option<Duration> {
        let player = self.player.as_mut()?;
        if player.transport.state != PlayState::Playing {
            return None;
        }
        let events = advance_tick(&player.song, &mut player.transport, &mut player.channels);
        for event in events {
            sink.handle(event);
        }
        Some(player.transport.tick_duration())
    }

    /// Cancel the pending tick and silence every channel.
    fn halt<S: EventSink>(&mut self, sink: &mut S) {
        self.scheduler.cancel();
        if let Some(player) = self.player.as_ref() {
            for channel in 0..player.channels.len() {
                sink.handle(PlaybackEvent::Stop {
                    channel: channel as u8,
                });
            }
        }
    }

    fn set_state(&mut self, state: PlayState) {
        if let Some(player) = self.player.as_mut() {
            player.transport.state = state;
        }
    }
}
