//! Rest countdown and screen wake-lock collaborators.
//!
//! The session owns one cancellable rest countdown. Its expiry only
//! affects the remaining-time value - never weights or indices - so the
//! trait is a thin clock seam the session polls. The wake lock is
//! best-effort: every failure is logged and swallowed.

use std::time::Instant;

/// Cancellable rest countdown owned by a session.
pub trait RestTimer {
    /// Start (or restart) the countdown at `seconds`.
    fn start(&mut self, seconds: u32);

    /// Cancel any active countdown.
    fn cancel(&mut self);

    /// Seconds left, or `None` when idle or expired.
    fn remaining(&self) -> Option<u32>;
}

/// Wall-clock countdown backed by a monotonic deadline.
#[derive(Debug, Default)]
pub struct SystemTimer {
    deadline: Option<Instant>,
}

impl SystemTimer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RestTimer for SystemTimer {
    fn start(&mut self, seconds: u32) {
        self.deadline = Some(Instant::now() + std::time::Duration::from_secs(u64::from(seconds)));
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    fn remaining(&self) -> Option<u32> {
        let deadline = self.deadline?;
        let left = deadline.saturating_duration_since(Instant::now()).as_secs();
        if left == 0 {
            None
        } else {
            Some(left as u32)
        }
    }
}

/// Deterministic countdown driven by explicit `tick` calls. Used in
/// tests, where wall-clock waits are unacceptable.
#[derive(Debug, Default)]
pub struct ManualTimer {
    remaining: Option<u32>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) {
        self.remaining = match self.remaining {
            Some(left) if left > 1 => Some(left - 1),
            _ => None,
        };
    }
}

impl RestTimer for ManualTimer {
    fn start(&mut self, seconds: u32) {
        self.remaining = (seconds > 0).then_some(seconds);
    }

    fn cancel(&mut self) {
        self.remaining = None;
    }

    fn remaining(&self) -> Option<u32> {
        self.remaining
    }
}

/// Best-effort screen wake lock. Acquisition and release must never
/// fail the caller; implementations log and carry on.
pub trait WakeLock {
    fn acquire(&mut self);
    fn release(&mut self);
}

/// Wake lock for environments with no screen to keep awake.
#[derive(Debug, Default)]
pub struct NoopWakeLock;

impl WakeLock for NoopWakeLock {
    fn acquire(&mut self) {
        tracing::debug!("wake lock requested (no-op)");
    }

    fn release(&mut self) {
        tracing::debug!("wake lock released (no-op)");
    }
}
