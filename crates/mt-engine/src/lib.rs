//! Playback engine for the modtick player.
//!
//! The sequencer is a pure function over explicit state: [`advance_tick`]
//! takes the song, the transport, and the channel array, and returns the
//! events produced by that tick. [`Transport`] wraps it in the
//! play/pause/stop/seek state machine and owns the tick schedule.
//! [`Mixer`] is a reference renderer that turns events into frames.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod channel;
mod frame;
mod frequency;
mod mixer;
pub mod scheduler;
mod sequencer;
mod state;
mod transport;

pub use channel::{ChannelState, LastNote, LEFT_PAN, RIGHT_PAN};
pub use frame::Frame;
pub use frequency::{period_to_frequency, tick_duration, tuning_factor, AMIGA_PAL_CLOCK};
pub use mixer::Mixer;
pub use scheduler::{ScheduledTick, TickScheduler, TickToken};
pub use sequencer::{advance_tick, TickEvents, MAX_TICK_EVENTS};
pub use state::{PlayState, PlayerSnapshot, PlayerState, TransportState};
pub use transport::Transport;
