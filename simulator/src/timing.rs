//! Timing constants for the simulator.
//!
//! These constants use `std::time::Duration` which is not available in `no_std`
//! environments, so they are defined here rather than in the common crate.

use std::time::Duration;

/// Main loop poll interval. Short enough that 25 ms animation frames fire
/// close to their deadline.
pub const POLL_TIME: Duration = Duration::from_millis(4);

/// How often the wall clock is sampled for minute changes.
pub const CLOCK_POLL: Duration = Duration::from_millis(250);

/// Duration that popups remain visible on screen.
pub const POPUP_DURATION: Duration = Duration::from_millis(1500);
