//! Async tasks for the watchface firmware.
//!
//! - `minute`: Signals every wall-clock minute boundary

pub mod minute;

pub use minute::{MINUTE_TICK, minute_task};
