//! Discussion countdown owned by a round.
//!
//! The countdown never reads a clock itself; an external source calls
//! `tick()` once per second. Once stopped it ignores every further tick.

use serde::{Deserialize, Serialize};

/// Below this many seconds the UI should flag the timer.
pub const LOW_TIME_SECS: u32 = 30;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerState {
    /// Created with the round; starts when the reveal completes.
    Idle,
    Running,
    /// Expired or stopped by an early vote. Terminal.
    Stopped,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Tick {
    Running { remaining_secs: u32 },
    /// This tick reached zero; the timer is now stopped.
    Expired,
    /// The timer was not running; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    duration_secs: u32,
    remaining_secs: u32,
    state: TimerState,
}

impl Countdown {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            state: TimerState::Idle,
        }
    }

    pub fn start(&mut self) {
        if self.state == TimerState::Idle {
            self.state = TimerState::Running;
        }
    }

    pub fn tick(&mut self) -> Tick {
        if self.state != TimerState::Running {
            return Tick::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = TimerState::Stopped;
            Tick::Expired
        } else {
            Tick::Running {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Stop the countdown. Returns `true` only for the call that actually
    /// stopped a running timer.
    pub fn stop(&mut self) -> bool {
        let was_running = self.state == TimerState::Running;
        self.state = TimerState::Stopped;
        was_running
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_low(&self) -> bool {
        self.remaining_secs < LOW_TIME_SECS
    }
}

/// `m:ss`, as shown on the play screen.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
