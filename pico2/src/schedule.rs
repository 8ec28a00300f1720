//! Millisecond scheduling for the firmware main loop.
//!
//! - [`FrameDeadline`]: the animation frame timer as a single deadline
//! - [`MinuteClock`]: wall-clock time derived from uptime
//! - [`RedrawFlag`]: the render surface as a dirty bit
//!
//! All times are milliseconds of uptime. The binary converts to and from
//! `embassy_time::Instant` at the edges.

use roundy_common::{ClockTime, FrameTimer, Surface, TimerHandle};

const MS_PER_MINUTE: u64 = 60_000;

// =============================================================================
// Frame Deadline
// =============================================================================

/// One-shot frame timer holding at most one live deadline.
///
/// Registration is relative to the last [`Self::sync`] call, so the main loop
/// syncs the current uptime before handing the timer to the animator.
pub struct FrameDeadline {
    now_ms: u64,
    next_id: u32,
    live: Option<(TimerHandle, u64)>,
}

impl FrameDeadline {
    pub const fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            live: None,
        }
    }

    /// Set the uptime that new registrations are relative to.
    #[inline]
    pub fn sync(
        &mut self,
        now_ms: u64,
    ) {
        self.now_ms = now_ms;
    }

    /// Uptime at which the live timer fires.
    #[inline]
    pub fn deadline_ms(&self) -> Option<u64> { self.live.map(|(_, at)| at) }

    /// Consume the live timer if its deadline has passed.
    pub fn take_due(
        &mut self,
        now_ms: u64,
    ) -> Option<TimerHandle> {
        match self.live {
            Some((handle, at)) if now_ms >= at => {
                self.live = None;
                Some(handle)
            }
            _ => None,
        }
    }
}

impl Default for FrameDeadline {
    fn default() -> Self { Self::new() }
}

impl FrameTimer for FrameDeadline {
    fn register(
        &mut self,
        delay_ms: u32,
    ) -> TimerHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = TimerHandle(self.next_id);
        self.live = Some((handle, self.now_ms + u64::from(delay_ms)));
        handle
    }

    fn cancel(
        &mut self,
        handle: TimerHandle,
    ) {
        if matches!(self.live, Some((live, _)) if live == handle) {
            self.live = None;
        }
    }
}

// =============================================================================
// Minute Clock
// =============================================================================

/// Wall clock anchored at a boot time.
///
/// The board has no battery-backed clock, so time starts at `start` on boot
/// and advances with uptime.
#[derive(Clone, Copy, Debug)]
pub struct MinuteClock {
    start: ClockTime,
    offset_minutes: u32,
}

impl MinuteClock {
    pub const fn new(start: ClockTime) -> Self {
        Self {
            start,
            offset_minutes: 0,
        }
    }

    /// Time of day after `uptime_ms`.
    pub const fn now(
        &self,
        uptime_ms: u64,
    ) -> ClockTime {
        let elapsed = (uptime_ms / MS_PER_MINUTE) % (24 * 60);
        self.start.plus_minutes(elapsed as u32 + self.offset_minutes)
    }

    /// Milliseconds until the next minute boundary (never zero).
    pub const fn ms_until_next_minute(uptime_ms: u64) -> u64 { MS_PER_MINUTE - uptime_ms % MS_PER_MINUTE }

    /// Shift the clock forward by whole minutes.
    pub fn advance(
        &mut self,
        minutes: u32,
    ) {
        self.offset_minutes = (self.offset_minutes + minutes) % (24 * 60);
    }
}

// =============================================================================
// Redraw Flag
// =============================================================================

/// Dirty bit set by the animator and consumed by the render step.
pub struct RedrawFlag {
    dirty: bool,
}

impl RedrawFlag {
    /// Starts dirty so the first loop iteration paints the face.
    pub const fn new() -> Self { Self { dirty: true } }

    /// Return and clear the flag.
    #[inline]
    pub fn take(&mut self) -> bool { core::mem::take(&mut self.dirty) }
}

impl Default for RedrawFlag {
    fn default() -> Self { Self::new() }
}

impl Surface for RedrawFlag {
    fn mark_dirty(&mut self) { self.dirty = true; }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use roundy_common::{AnimationConfig, DisplayDigits, FaceAnimator, FrameOutcome, HourFormat, Phase};

    use super::*;

    fn time(
        hour: u8,
        minute: u8,
    ) -> ClockTime {
        ClockTime::new(hour, minute).unwrap()
    }

    #[test]
    fn test_deadline_relative_to_sync() {
        let mut timer = FrameDeadline::new();
        timer.sync(1000);
        let handle = timer.register(25);
        assert_eq!(timer.deadline_ms(), Some(1025));
        assert_eq!(timer.take_due(1024), None);
        assert_eq!(timer.take_due(1025), Some(handle));
        assert_eq!(timer.take_due(2000), None);
    }

    #[test]
    fn test_register_replaces_live_timer() {
        let mut timer = FrameDeadline::new();
        let first = timer.register(10);
        let second = timer.register(20);
        assert_ne!(first, second);
        assert_eq!(timer.deadline_ms(), Some(20));
    }

    #[test]
    fn test_stale_cancel_ignored() {
        let mut timer = FrameDeadline::new();
        let first = timer.register(10);
        let second = timer.register(20);
        timer.cancel(first);
        assert_eq!(timer.take_due(20), Some(second));
    }

    #[test]
    fn test_cancel_clears_deadline() {
        let mut timer = FrameDeadline::new();
        let handle = timer.register(10);
        timer.cancel(handle);
        assert_eq!(timer.deadline_ms(), None);
        assert_eq!(timer.take_due(100), None);
    }

    #[test]
    fn test_clock_advances_with_uptime() {
        let clock = MinuteClock::new(time(23, 58));
        assert_eq!(clock.now(0), time(23, 58));
        assert_eq!(clock.now(59_999), time(23, 58));
        assert_eq!(clock.now(60_000), time(23, 59));
        assert_eq!(clock.now(120_000), time(0, 0));
    }

    #[test]
    fn test_clock_offset() {
        let mut clock = MinuteClock::new(time(12, 0));
        clock.advance(5);
        assert_eq!(clock.now(0), time(12, 5));
        clock.advance(24 * 60);
        assert_eq!(clock.now(0), time(12, 5));
    }

    #[test]
    fn test_ms_until_next_minute() {
        assert_eq!(MinuteClock::ms_until_next_minute(0), 60_000);
        assert_eq!(MinuteClock::ms_until_next_minute(59_000), 1_000);
        assert_eq!(MinuteClock::ms_until_next_minute(60_001), 59_999);
    }

    #[test]
    fn test_redraw_flag_take() {
        let mut flag = RedrawFlag::new();
        assert!(flag.take());
        assert!(!flag.take());
        flag.mark_dirty();
        assert!(flag.take());
    }

    #[test]
    fn test_animator_runs_on_deadline_timer() {
        let config = AnimationConfig::new();
        let mut animator: FaceAnimator<SmallRng> = FaceAnimator::new(config, SmallRng::seed_from_u64(7));
        let mut timer = FrameDeadline::new();
        let mut surface = RedrawFlag::new();

        let digits = DisplayDigits::from_time(time(10, 42), HourFormat::TwentyFour);
        animator.start(digits, &mut timer, &mut surface);
        assert_eq!(animator.phase(), Phase::Running);

        let mut now = 0;
        let mut finished = false;
        for _ in 0..1000 {
            let Some(at) = timer.deadline_ms() else { break };
            now = at;
            timer.sync(now);
            if timer.take_due(now).is_some()
                && animator.on_frame(&mut timer, &mut surface) == FrameOutcome::Finished
            {
                finished = true;
                break;
            }
        }

        assert!(finished);
        assert_eq!(animator.phase(), Phase::Idle);
        assert_eq!(timer.deadline_ms(), None);
        assert!(now >= u64::from(config.total_frames) * u64::from(config.frame_interval_ms));
    }
}
