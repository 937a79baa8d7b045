//! Audio output backends for the modtick player.

mod buffer;
mod cpal_backend;
mod traits;

pub use buffer::BufferOutput;
pub use cpal_backend::{fill_interleaved, ring_capacity, CpalOutput};
pub use traits::{AudioError, AudioOutput};
