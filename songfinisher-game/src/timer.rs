//! Countdown clock for the active challenge.
//!
//! The timer owns no scheduling: callers feed it one `tick` per elapsed second.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Expired,
    Completed,
}

impl TimerState {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Expired => "expired",
            Self::Completed => "completed",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Expired | Self::Completed)
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `Idle -> Running -> {Expired, Completed}`; `reset` returns to `Idle` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChallengeTimer {
    state: TimerState,
    time_remaining: u32,
    limit: u32,
}

impl ChallengeTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TimerState::Idle,
            time_remaining: 0,
            limit: 0,
        }
    }

    /// Begin a countdown of `limit_secs`, replacing any countdown in progress.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `limit_secs` is zero; the timer is left unchanged.
    pub fn start(&mut self, limit_secs: u32) -> Result<(), GameError> {
        if limit_secs == 0 {
            return Err(GameError::InvalidArgument {
                field: "time limit",
                value: i64::from(limit_secs),
            });
        }
        self.state = TimerState::Running;
        self.limit = limit_secs;
        self.time_remaining = limit_secs;
        Ok(())
    }

    /// Advance one second. Does nothing unless running.
    pub fn tick(&mut self) -> TimerState {
        if self.state == TimerState::Running {
            self.time_remaining = self.time_remaining.saturating_sub(1);
            if self.time_remaining == 0 {
                self.state = TimerState::Expired;
            }
        }
        self.state
    }

    /// Stop a running countdown early, returning the seconds that were left.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` when the timer is not running.
    pub fn complete(&mut self) -> Result<u32, GameError> {
        if self.state != TimerState::Running {
            return Err(GameError::InvalidStateTransition {
                action: "complete",
                state: self.state,
            });
        }
        self.state = TimerState::Completed;
        Ok(self.time_remaining)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Add seconds to a running countdown, never past its limit.
    /// Returns the seconds actually granted.
    pub fn extend(&mut self, secs: u32) -> u32 {
        if self.state != TimerState::Running {
            return 0;
        }
        let before = self.time_remaining;
        self.time_remaining = before.saturating_add(secs).min(self.limit);
        self.time_remaining - before
    }

    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running)
    }

    #[must_use]
    pub const fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }
}
