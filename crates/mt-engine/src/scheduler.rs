//! Cancellable tick schedule.
//!
//! The transport keeps at most one pending tick. Arming a new tick replaces
//! the previous one, and every arm hands out a fresh [`TickToken`], so a
//! timer that fires after its tick was cancelled or replaced presents a
//! stale token and is ignored.
//!
//! Time is a monotonic [`Duration`] since an arbitrary origin chosen by the
//! caller (an audio frame counter, `Instant::elapsed`, a test clock).

use core::time::Duration;

/// Identifies one armed tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

impl TickToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// A pending tick and the time it is due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTick {
    pub token: TickToken,
    pub deadline: Duration,
}

#[derive(Debug, Default)]
pub struct TickScheduler {
    generation: u64,
    pending: Option<ScheduledTick>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the next tick, replacing any pending one.
    pub fn arm(&mut self, deadline: Duration) -> TickToken {
        self.generation = self.generation.wrapping_add(1);
        let token = TickToken(self.generation);
        self.pending = Some(ScheduledTick { token, deadline });
        token
    }

    /// Drop the pending tick. Its token can never fire afterwards.
    pub fn cancel(&mut self) -> Option<ScheduledTick> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<ScheduledTick> {
        self.pending
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending tick if its deadline has passed.
    pub fn take_due(&mut self, now: Duration) -> Option<ScheduledTick> {
        match self.pending {
            Some(tick) if tick.deadline <= now => self.pending.take(),
            _ => None,
        }
    }

    /// Take the pending tick if `token` still names it.
    pub fn claim(&mut self, token: TickToken) -> Option<ScheduledTick> {
        match self.pending {
            Some(tick) if tick.token == token => self.pending.take(),
            _ => None,
        }
    }
}
