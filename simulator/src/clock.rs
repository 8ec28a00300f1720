//! Wall-clock source for the simulator.
//!
//! Reads local time through `chrono` and adds a user-controlled minute
//! offset, so minute changes can be triggered from the keyboard instead of
//! waiting for real time to pass.

use chrono::{Local, Timelike};
use roundy_common::ClockTime;

/// Local time plus a minute offset.
pub struct WallClock {
    offset_minutes: u32,
}

impl WallClock {
    pub const fn new() -> Self { Self { offset_minutes: 0 } }

    /// Current displayed time.
    pub fn now(&self) -> ClockTime {
        let local = Local::now();
        let base = ClockTime {
            hour: local.hour() as u8,
            minute: local.minute() as u8,
        };
        base.plus_minutes(self.offset_minutes)
    }

    /// Jump the displayed time forward.
    pub fn advance(
        &mut self,
        minutes: u32,
    ) {
        self.offset_minutes = (self.offset_minutes + minutes) % (24 * 60);
    }

    /// Minutes added to local time.
    #[inline]
    pub const fn offset_minutes(&self) -> u32 { self.offset_minutes }
}
