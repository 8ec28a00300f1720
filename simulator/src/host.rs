//! Host side of the animation driver: timer scheduler and render surface.

use std::time::{Duration, Instant};

use roundy_common::{FrameTimer, Surface, TimerHandle};

/// One-shot frame timer backed by `std::time::Instant`.
///
/// Holds at most one live deadline. The main loop polls [`Self::take_due`]
/// and forwards a fired timer to `FaceAnimator::on_frame`.
pub struct DeadlineTimer {
    next_id: u32,
    live: Option<(TimerHandle, Instant)>,
}

impl DeadlineTimer {
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            live: None,
        }
    }

    /// Consume the live timer if its deadline has passed.
    pub fn take_due(
        &mut self,
        now: Instant,
    ) -> Option<TimerHandle> {
        match self.live {
            Some((handle, deadline)) if now >= deadline => {
                self.live = None;
                Some(handle)
            }
            _ => None,
        }
    }
}

impl FrameTimer for DeadlineTimer {
    fn register(
        &mut self,
        delay_ms: u32,
    ) -> TimerHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = TimerHandle(self.next_id);
        self.live = Some((handle, Instant::now() + Duration::from_millis(u64::from(delay_ms))));
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

/// Redraw request flag for the simulator window.
pub struct DirtyFlag {
    dirty: bool,
}

impl DirtyFlag {
    pub const fn new() -> Self { Self { dirty: true } }

    /// Return and clear the flag.
    #[inline]
    pub fn take(&mut self) -> bool { std::mem::take(&mut self.dirty) }
}

impl Surface for DirtyFlag {
    fn mark_dirty(&mut self) { self.dirty = true; }
}
