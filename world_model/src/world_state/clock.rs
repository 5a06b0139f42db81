//! Simulated time: a 24-hour HHMM clock plus a monotonic elapsed-minute count.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};

/// Plot time tracking.
///
/// `time` is what rules compare against (`T < 1700`); `elapsed_minutes` is
/// what duration modifiers measure, and never rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    time: u32,
    elapsed_minutes: u32,
}

impl Clock {
    /// Create a clock starting at the given HHMM time.
    pub fn new(start: u32) -> Result<Self> {
        if start % 100 >= 60 || start > 2400 {
            return Err(WorldError::InvalidClock(start));
        }
        Ok(Self {
            time: start,
            elapsed_minutes: 0,
        })
    }

    /// Current HHMM time.
    pub fn time(&self) -> u32 {
        self.time
    }

    /// Minutes advanced since creation.
    pub fn elapsed_minutes(&self) -> u32 {
        self.elapsed_minutes
    }

    /// Get current hour.
    pub fn hour(&self) -> u32 {
        self.time / 100
    }

    /// Get current minute.
    pub fn minute(&self) -> u32 {
        self.time % 100
    }

    /// Advance time by given minutes.
    ///
    /// Minute overflow carries into the hour. An hour of 25 or more clamps the
    /// clock to 2400.
    pub fn advance(&mut self, minutes: u32) {
        self.elapsed_minutes += minutes;

        let total_minutes = self.minute() + minutes;
        let mut hour = self.hour() + total_minutes / 60;
        let mut minute = total_minutes % 60;

        if hour >= 25 {
            hour = 24;
            minute = 0;
        }
        self.time = hour * 100 + minute;
    }
}

impl std::fmt::Display for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}", self.time)
    }
}
