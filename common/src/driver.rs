//! Animation driver: the `Idle -> Running -> Idle` state machine.
//!
//! The driver owns the [`Session`], the random source and at most one
//! pending frame timer. Hosts feed it three kinds of events:
//!
//! - [`FaceAnimator::start`] once at startup (and for replays),
//! - [`FaceAnimator::on_clock`] whenever the clock source ticks,
//! - [`FaceAnimator::on_frame`] whenever the registered timer fires.
//!
//! Every call returns an outcome value so hosts can log what happened.
//!
//! # Timer Ownership
//!
//! The pending [`TimerHandle`] lives in the driver, never in a global.
//! Starting a new animation always cancels the pending timer first, so at
//! most one frame callback is ever outstanding.

use rand::Rng;

use crate::clock::{ClockTime, DisplayDigits, HourFormat};
use crate::config::{AnimationConfig, GRID_COLS, GRID_ROWS};
use crate::session::Session;
use crate::transition::RevealScope;

// =============================================================================
// Host Interfaces
// =============================================================================

/// Opaque handle of a registered frame timer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimerHandle(pub u32);

/// One-shot timer scheduler provided by the host.
pub trait FrameTimer {
    /// Fire once after `delay_ms` milliseconds.
    fn register(
        &mut self,
        delay_ms: u32,
    ) -> TimerHandle;

    /// Cancel a registered timer. Stale handles are ignored.
    fn cancel(
        &mut self,
        handle: TimerHandle,
    );
}

/// Render surface provided by the host.
pub trait Surface {
    /// Request a redraw of the face.
    fn mark_dirty(&mut self);
}

// =============================================================================
// Outcomes
// =============================================================================

/// Driver phase.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Running,
}

/// Result of [`FaceAnimator::start`] and [`FaceAnimator::on_clock`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    /// Digits did not change.
    Unchanged,
    /// New digits were merged into the running animation.
    Folded,
    /// A new animation was started (or snapped, for zero-length animations).
    Started,
}

/// Result of [`FaceAnimator::on_frame`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FrameOutcome {
    /// Frame applied, next frame scheduled. `frame` counts processed frames.
    Running { frame: u16 },
    /// Animation settled, driver is idle.
    Finished,
    /// Stray timer callback while idle.
    Ignored,
}

// =============================================================================
// Face Animator
// =============================================================================

/// Reveal animation driver for a `W`x`H` face.
pub struct FaceAnimator<R, const W: usize = GRID_COLS, const H: usize = GRID_ROWS> {
    session: Session<W, H>,
    rng: R,
    config: AnimationConfig,
    phase: Phase,
    pending: Option<TimerHandle>,
}

impl<R: Rng, const W: usize, const H: usize> FaceAnimator<R, W, H> {
    /// Idle driver with a settled blank face.
    pub fn new(
        config: AnimationConfig,
        rng: R,
    ) -> Self {
        Self {
            session: Session::new(),
            rng,
            config,
            phase: Phase::Idle,
            pending: None,
        }
    }

    /// Start a full reveal of `digits`.
    pub fn start(
        &mut self,
        digits: DisplayDigits,
        timer: &mut impl FrameTimer,
        surface: &mut impl Surface,
    ) -> TickOutcome {
        self.restart(digits, RevealScope::AllDigits, timer, surface);
        TickOutcome::Started
    }

    /// Handle a clock tick.
    pub fn on_clock(
        &mut self,
        time: ClockTime,
        timer: &mut impl FrameTimer,
        surface: &mut impl Surface,
    ) -> TickOutcome {
        let digits = DisplayDigits::from_time(time, self.config.hour_format);
        if digits == self.session.digits() {
            return TickOutcome::Unchanged;
        }

        match self.phase {
            Phase::Running => {
                self.session.fold_in(digits);
                surface.mark_dirty();
                TickOutcome::Folded
            }
            Phase::Idle => {
                self.restart(digits, self.config.tick_scope, timer, surface);
                TickOutcome::Started
            }
        }
    }

    /// Handle the registered frame timer firing.
    pub fn on_frame(
        &mut self,
        timer: &mut impl FrameTimer,
        surface: &mut impl Surface,
    ) -> FrameOutcome {
        if self.phase == Phase::Idle {
            return FrameOutcome::Ignored;
        }

        self.pending = None;
        self.session.step(&mut self.rng);
        surface.mark_dirty();

        if self.session.is_settled() {
            self.session.finish();
            self.phase = Phase::Idle;
            FrameOutcome::Finished
        } else {
            self.pending = Some(timer.register(self.config.frame_interval_ms));
            FrameOutcome::Running {
                frame: self.session.current_frame(),
            }
        }
    }

    /// Cancel any pending frame and snap to the final state.
    pub fn stop(
        &mut self,
        timer: &mut impl FrameTimer,
    ) {
        self.cancel_pending(timer);
        self.session.finish();
        self.phase = Phase::Idle;
    }

    fn restart(
        &mut self,
        digits: DisplayDigits,
        scope: RevealScope,
        timer: &mut impl FrameTimer,
        surface: &mut impl Surface,
    ) {
        self.cancel_pending(timer);

        let max_delay = self.config.effective_max_delay();
        self.session
            .begin(digits, scope, self.config.total_frames, max_delay, &mut self.rng);
        surface.mark_dirty();

        if self.session.is_animating() {
            self.pending = Some(timer.register(self.config.frame_interval_ms));
            self.phase = Phase::Running;
        } else {
            self.phase = Phase::Idle;
        }
    }

    fn cancel_pending(
        &mut self,
        timer: &mut impl FrameTimer,
    ) {
        if let Some(handle) = self.pending.take() {
            timer.cancel(handle);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub const fn session(&self) -> &Session<W, H> { &self.session }

    #[inline]
    pub const fn phase(&self) -> Phase { self.phase }

    #[inline]
    pub fn is_animating(&self) -> bool { self.phase == Phase::Running }

    #[inline]
    pub const fn config(&self) -> &AnimationConfig { &self.config }

    /// Handle of the outstanding frame timer, if any.
    #[inline]
    pub const fn pending(&self) -> Option<TimerHandle> { self.pending }

    /// Change the hour format. Takes effect on the next clock tick.
    #[inline]
    pub fn set_hour_format(
        &mut self,
        format: HourFormat,
    ) {
        self.config.hour_format = format;
    }

    /// Change which cells restart on idle clock ticks.
    #[inline]
    pub fn set_tick_scope(
        &mut self,
        scope: RevealScope,
    ) {
        self.config.tick_scope = scope;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::{ANIM_FRAME_MS, DIGIT_ANIM_STEPS, MAX_BRIGHTNESS};

    /// Timer that tracks the single live registration.
    #[derive(Default)]
    struct MockTimer {
        next_id: u32,
        live: Option<TimerHandle>,
        registered: u32,
        cancelled: u32,
        last_delay: u32,
    }

    impl FrameTimer for MockTimer {
        fn register(
            &mut self,
            delay_ms: u32,
        ) -> TimerHandle {
            assert!(self.live.is_none(), "second timer registered while one is live");
            self.next_id += 1;
            self.registered += 1;
            self.last_delay = delay_ms;
            let handle = TimerHandle(self.next_id);
            self.live = Some(handle);
            handle
        }

        fn cancel(
            &mut self,
            handle: TimerHandle,
        ) {
            if self.live == Some(handle) {
                self.live = None;
                self.cancelled += 1;
            }
        }
    }

    impl MockTimer {
        /// Simulate the live timer firing.
        fn fire(&mut self) -> bool { self.live.take().is_some() }
    }

    #[derive(Default)]
    struct MockSurface {
        dirty: u32,
    }

    impl Surface for MockSurface {
        fn mark_dirty(&mut self) { self.dirty += 1; }
    }

    fn animator(seed: u64) -> FaceAnimator<SmallRng> { FaceAnimator::new(AnimationConfig::new(), SmallRng::seed_from_u64(seed)) }

    fn time(hour: u8, minute: u8) -> ClockTime { ClockTime { hour, minute } }

    fn digits(hour: u8, minute: u8) -> DisplayDigits { DisplayDigits::from_time(time(hour, minute), HourFormat::TwentyFour) }

    /// Fire frames until the driver goes idle, returning the frame count.
    fn run_to_idle(
        anim: &mut FaceAnimator<SmallRng>,
        timer: &mut MockTimer,
        surface: &mut MockSurface,
    ) -> u16 {
        let start = anim.session().current_frame();
        let mut frames = 0;
        while timer.fire() {
            frames += 1;
            match anim.on_frame(timer, surface) {
                FrameOutcome::Running { frame } => assert_eq!(frame, start + frames),
                FrameOutcome::Finished => break,
                FrameOutcome::Ignored => panic!("frame ignored while running"),
            }
        }
        frames
    }

    #[test]
    fn test_start_registers_first_frame() {
        let mut anim = animator(1);
        let mut timer = MockTimer::default();
        let mut surface = MockSurface::default();

        assert_eq!(anim.phase(), Phase::Idle);
        assert_eq!(anim.start(digits(12, 34), &mut timer, &mut surface), TickOutcome::Started);
        assert_eq!(anim.phase(), Phase::Running);
        assert_eq!(timer.registered, 1);
        assert_eq!(timer.last_delay, ANIM_FRAME_MS);
        assert_eq!(surface.dirty, 1);
        assert!(anim.pending().is_some());
    }

    #[test]
    fn test_full_run_finishes_after_t_frames() {
        for seed in 0..16 {
            let mut anim = animator(seed);
            let mut timer = MockTimer::default();
            let mut surface = MockSurface::default();

            anim.start(digits(12, 34), &mut timer, &mut surface);
            let frames = run_to_idle(&mut anim, &mut timer, &mut surface);

            assert_eq!(frames, DIGIT_ANIM_STEPS, "seed {seed}");
            assert_eq!(anim.phase(), Phase::Idle);
            assert!(anim.pending().is_none());
            assert!(timer.live.is_none());
            assert_eq!(surface.dirty, u32::from(DIGIT_ANIM_STEPS) + 1);
        }
    }

    #[test]
    fn test_restart_cancels_pending_timer() {
        let mut anim = animator(2);
        let mut timer = MockTimer::default();
        let mut surface = MockSurface::default();

        anim.start(digits(12, 34), &mut timer, &mut surface);
        let first = anim.pending();
        anim.start(digits(12, 34), &mut timer, &mut surface);

        assert_eq!(timer.cancelled, 1);
        assert_eq!(timer.registered, 2);
        assert_ne!(anim.pending(), first);
        assert_eq!(anim.session().current_frame(), 0);
    }

    #[test]
    fn test_clock_tick_while_running_folds_in() {
        let mut anim = animator(3);
        let mut timer = MockTimer::default();
        let mut surface = MockSurface::default();

        anim.start(digits(12, 34), &mut timer, &mut surface);
        for _ in 0..4 {
            timer.fire();
            anim.on_frame(&mut timer, &mut surface);
        }
        let pending = anim.pending();

        assert_eq!(anim.on_clock(time(12, 35), &mut timer, &mut surface), TickOutcome::Folded);
        assert_eq!(anim.session().current_frame(), 4);
        assert_eq!(anim.pending(), pending);
        assert_eq!(timer.registered, 5);
        assert_eq!(timer.cancelled, 0);

        let remaining = run_to_idle(&mut anim, &mut timer, &mut surface);
        assert_eq!(remaining, DIGIT_ANIM_STEPS - 4);
        assert_eq!(anim.session().digits(), digits(12, 35));
    }

    #[test]
    fn test_clock_tick_while_idle_restarts() {
        let mut anim = animator(4);
        let mut timer = MockTimer::default();
        let mut surface = MockSurface::default();

        anim.start(digits(12, 34), &mut timer, &mut surface);
        run_to_idle(&mut anim, &mut timer, &mut surface);

        assert_eq!(anim.on_clock(time(12, 35), &mut timer, &mut surface), TickOutcome::Started);
        assert_eq!(anim.phase(), Phase::Running);
        assert_eq!(anim.session().current_frame(), 0);
    }

    #[test]
    fn test_unchanged_tick_is_noop() {
        let mut anim = animator(5);
        let mut timer = MockTimer::default();
        let mut surface = MockSurface::default();

        anim.start(digits(9, 15), &mut timer, &mut surface);
        run_to_idle(&mut anim, &mut timer, &mut surface);
        let dirty = surface.dirty;

        assert_eq!(anim.on_clock(time(9, 15), &mut timer, &mut surface), TickOutcome::Unchanged);
        assert_eq!(anim.phase(), Phase::Idle);
        assert_eq!(surface.dirty, dirty);
    }

    #[test]
    fn test_stray_frame_is_ignored() {
        let mut anim = animator(6);
        let mut timer = MockTimer::default();
        let mut surface = MockSurface::default();
        assert_eq!(anim.on_frame(&mut timer, &mut surface), FrameOutcome::Ignored);
        assert_eq!(timer.registered, 0);
    }

    #[test]
    fn test_zero_frames_snaps_without_timer() {
        let config = AnimationConfig {
            total_frames: 0,
            ..AnimationConfig::new()
        };
        let mut anim: FaceAnimator<SmallRng> = FaceAnimator::new(config, SmallRng::seed_from_u64(7));
        let mut timer = MockTimer::default();
        let mut surface = MockSurface::default();

        assert_eq!(anim.start(digits(12, 34), &mut timer, &mut surface), TickOutcome::Started);
        assert_eq!(anim.phase(), Phase::Idle);
        assert_eq!(timer.registered, 0);
        assert_eq!(surface.dirty, 1);
        assert!(anim.session().brightness().iter().flatten().any(|&b| b == MAX_BRIGHTNESS));
    }

    #[test]
    fn test_stop_cancels_and_settles() {
        let mut anim = animator(8);
        let mut timer = MockTimer::default();
        let mut surface = MockSurface::default();

        anim.start(digits(12, 34), &mut timer, &mut surface);
        timer.fire();
        anim.on_frame(&mut timer, &mut surface);
        anim.stop(&mut timer);

        assert_eq!(anim.phase(), Phase::Idle);
        assert_eq!(timer.cancelled, 1);
        assert!(timer.live.is_none());
        assert!(anim.session().is_settled());
    }

    #[test]
    fn test_hour_format_applies_on_next_tick() {
        let mut anim = animator(9);
        let mut timer = MockTimer::default();
        let mut surface = MockSurface::default();

        anim.start(digits(21, 5), &mut timer, &mut surface);
        run_to_idle(&mut anim, &mut timer, &mut surface);

        anim.set_hour_format(HourFormat::Twelve);
        assert_eq!(anim.on_clock(time(21, 5), &mut timer, &mut surface), TickOutcome::Started);
        assert_eq!(anim.session().digits(), DisplayDigits::from_time(time(21, 5), HourFormat::Twelve));
    }
}
