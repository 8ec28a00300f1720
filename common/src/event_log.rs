//! Driver event log.
//!
//! Ring buffer of short text lines describing what the animation driver
//! did, shown on the simulator's debug overlay. Lines are built without
//! `format!` so the log works on `no_std` targets.
//!
//! # Usage
//!
//! ```ignore
//! let mut log = EventLog::new();
//! let outcome = animator.on_clock(time, &mut timer, &mut surface);
//! log.push_tick(time, outcome);
//!
//! for line in log.iter() {
//!     println!("{}", line);
//! }
//! ```

use heapless::{Deque, String};

use crate::clock::ClockTime;
use crate::driver::{FrameOutcome, TickOutcome};

// =============================================================================
// Event Log Configuration
// =============================================================================

/// Maximum number of log lines to keep in the ring buffer.
pub const LOG_BUFFER_SIZE: usize = 8;

/// Maximum characters per log line (fits the 144 px debug page in ProFont 7).
pub const LOG_LINE_LENGTH: usize = 26;

/// One log line.
pub type LogLine = String<LOG_LINE_LENGTH>;

// =============================================================================
// Event Log Ring Buffer
// =============================================================================

/// Ring buffer for driver events.
///
/// Stores the last [`LOG_BUFFER_SIZE`] lines. Old lines are dropped when the
/// buffer is full. Per-frame events are collapsed: consecutive
/// `Running` frames update one line instead of filling the buffer.
pub struct EventLog {
    buffer: Deque<LogLine, LOG_BUFFER_SIZE>,
    frame_line_open: bool,
}

impl EventLog {
    /// Create a new empty event log.
    pub const fn new() -> Self {
        Self {
            buffer: Deque::new(),
            frame_line_open: false,
        }
    }

    /// Push a message, truncated to the line length.
    pub fn push(
        &mut self,
        msg: &str,
    ) {
        self.frame_line_open = false;
        self.push_line(truncate(msg));
    }

    /// Log a clock tick and what the driver made of it.
    pub fn push_tick(
        &mut self,
        time: ClockTime,
        outcome: TickOutcome,
    ) {
        let mut line = LogLine::new();
        line.push_str("tick ").ok();
        push_time(&mut line, time);
        line.push(' ').ok();
        line.push_str(tick_label(outcome)).ok();
        self.frame_line_open = false;
        self.push_line(line);
    }

    /// Log a frame callback.
    pub fn push_frame(
        &mut self,
        outcome: FrameOutcome,
    ) {
        let mut line = LogLine::new();
        match outcome {
            FrameOutcome::Running { frame } => {
                line.push_str("frame ").ok();
                push_u32(&mut line, u32::from(frame));
                if self.frame_line_open {
                    self.buffer.pop_back();
                }
                self.push_line(line);
                self.frame_line_open = true;
                return;
            }
            FrameOutcome::Finished => line.push_str("finished").ok(),
            FrameOutcome::Ignored => line.push_str("stray frame").ok(),
        };
        self.frame_line_open = false;
        self.push_line(line);
    }

    fn push_line(
        &mut self,
        line: LogLine,
    ) {
        // If full, remove oldest
        if self.buffer.is_full() {
            self.buffer.pop_front();
        }
        self.buffer.push_back(line).ok();
    }

    /// Iterate over log lines (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.buffer.iter().map(heapless::string::StringInner::as_str) }

    /// Get number of log entries.
    #[inline]
    pub const fn len(&self) -> usize { self.buffer.len() }

    /// Check if log is empty.
    #[inline]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }
}

impl Default for EventLog {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Short label for a tick outcome.
pub const fn tick_label(outcome: TickOutcome) -> &'static str {
    match outcome {
        TickOutcome::Unchanged => "unchanged",
        TickOutcome::Folded => "folded",
        TickOutcome::Started => "started",
    }
}

fn truncate(msg: &str) -> LogLine {
    let mut line = LogLine::new();
    for c in msg.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}

/// Push a u32 value to a heapless string (no format! macro).
pub fn push_u32<const N: usize>(
    s: &mut String<N>,
    mut val: u32,
) {
    if val == 0 {
        s.push('0').ok();
        return;
    }

    // Build digits in reverse
    let mut digits = [0u8; 10];
    let mut i = 0;
    while val > 0 {
        digits[i] = (val % 10) as u8;
        val /= 10;
        i += 1;
    }

    while i > 0 {
        i -= 1;
        s.push((b'0' + digits[i]) as char).ok();
    }
}

/// Push `HH:MM` to a heapless string.
pub fn push_time<const N: usize>(
    s: &mut String<N>,
    time: ClockTime,
) {
    for (i, value) in [time.hour, time.minute].into_iter().enumerate() {
        if i > 0 {
            s.push(':').ok();
        }
        s.push((b'0' + value / 10 % 10) as char).ok();
        s.push((b'0' + value % 10) as char).ok();
    }
}

// =============================================================================
// Tests
// =============================================================================
