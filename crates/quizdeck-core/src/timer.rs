//! Countdown timer for timed sessions.
//!
//! The countdown has no clock of its own: whoever owns it calls [`Countdown::tick`]
//! once per elapsed second and reacts to [`TickOutcome::Expired`].

use std::fmt;

/// Seconds below which the remaining time is shown as urgent.
pub const URGENT_THRESHOLD_SECS: u32 = 60;

/// Result of advancing the countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is not running; nothing changed.
    Idle,
    /// Time remains.
    Running { remaining: u32 },
    /// Time ran out on this tick. The countdown has stopped itself.
    Expired,
}

/// A one-second-resolution countdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: Option<u32>,
    running: bool,
}

impl Countdown {
    /// A disarmed countdown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down from `seconds`. Zero leaves the countdown disarmed.
    pub fn arm(&mut self, seconds: u32) {
        if seconds == 0 {
            self.disarm();
            return;
        }
        self.remaining = Some(seconds);
        self.running = true;
    }

    /// Stop ticking, keeping the remaining time for display.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop ticking and forget the remaining time.
    pub fn disarm(&mut self) {
        self.running = false;
        self.remaining = None;
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        let remaining = self.remaining.unwrap_or(0).saturating_sub(1);
        self.remaining = Some(remaining);
        if remaining == 0 {
            self.running = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Running { remaining }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds left, or `None` for an untimed session.
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Whether less than a minute remains.
    pub fn is_urgent(&self) -> bool {
        self.remaining.is_some_and(|secs| secs < URGENT_THRESHOLD_SECS)
    }

    /// Remaining time as `m:ss`, or `None` for an untimed session.
    pub fn display(&self) -> Option<String> {
        self.remaining.map(format_clock)
    }
}

/// Format seconds as `m:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.remaining {
            Some(secs) => write!(f, "{}", format_clock(secs)),
            None => write!(f, "--:--"),
        }
    }
}
