//! Per-cell animation state.
//!
//! A [`Session`] owns every per-cell array of the face (struct of arrays,
//! indexed `[row][col]`) plus the frame counter. It is created once at
//! startup and reused for every reveal:
//!
//! ```text
//! begin()   - recompose glyphs, draw delays, reset ramp (animation start)
//! fold_in() - swap digits while running, keep frame counter and delays
//! step()    - advance one frame (the only per-frame mutator)
//! finish()  - snap to the settled final state
//! ```
//!
//! Rendering only reads a session, through [`Session::level`].

use rand::Rng;

use crate::clock::DisplayDigits;
use crate::compositor::{CellGrid, Mask, Placement, compose_mask, distance_map};
use crate::config::{GRID_COLS, GRID_ROWS, MAX_BRIGHTNESS};
use crate::delay::assign_delays;
use crate::halo::{advance_halo, envelope};
use crate::ramp::{advance_cell, is_behind};
use crate::transition::{RevealScope, advance_fade, reveal_region, seed_fades};

/// Reveal animation state for a `W`x`H` grid.
#[derive(Clone, Debug)]
pub struct Session<const W: usize = GRID_COLS, const H: usize = GRID_ROWS> {
    placement: Placement,
    active: Mask<W, H>,
    brightness: CellGrid<u8, W, H>,
    distance: CellGrid<u8, W, H>,
    delay: CellGrid<u8, W, H>,
    halo: CellGrid<u8, W, H>,
    fade: CellGrid<u8, W, H>,
    current_frame: u16,
    total_frames: u16,
    is_animating: bool,
    digits: DisplayDigits,
    previous: DisplayDigits,
}

impl<const W: usize, const H: usize> Session<W, H> {
    /// Settled session showing blank digits, layout centered on the grid.
    pub fn new() -> Self { Self::with_placement(Placement::centered::<W, H>()) }

    /// Settled session showing blank digits at a custom placement.
    pub fn with_placement(placement: Placement) -> Self {
        let digits = DisplayDigits::BLANK;
        let active = compose_mask(&digits, placement);
        let mut session = Self {
            placement,
            active,
            brightness: [[0; W]; H],
            distance: distance_map(&active),
            delay: [[0; W]; H],
            halo: [[0; W]; H],
            fade: [[0; W]; H],
            current_frame: 0,
            total_frames: 0,
            is_animating: false,
            digits,
            previous: digits,
        };
        session.finish();
        session
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Start a reveal of `digits` lasting `total_frames` frames.
    ///
    /// Cells in the reveal region start dark with a random delay in
    /// `0..=max_delay`; other active cells start settled. Cells leaving the
    /// glyph start fading. A zero-length animation snaps straight to the
    /// final state.
    pub fn begin<R: Rng + ?Sized>(
        &mut self,
        digits: DisplayDigits,
        scope: RevealScope,
        total_frames: u16,
        max_delay: u8,
        rng: &mut R,
    ) {
        let old_active = self.active;
        let active = compose_mask(&digits, self.placement);
        let region = reveal_region(scope, &self.digits, &digits, &active, self.placement);

        seed_fades(&old_active, &active, &self.brightness, &mut self.fade);
        assign_delays(&region, &mut self.delay, max_delay, rng);

        for r in 0..H {
            for c in 0..W {
                self.brightness[r][c] = if active[r][c] && !region[r][c] { MAX_BRIGHTNESS } else { 0 };
            }
        }

        self.previous = self.digits;
        self.digits = digits;
        self.active = active;
        self.distance = distance_map(&active);
        self.halo = [[0; W]; H];
        self.current_frame = 0;
        self.total_frames = total_frames;
        self.is_animating = true;

        if total_frames == 0 {
            self.finish();
        }
    }

    /// Swap in new digits without restarting the running animation.
    ///
    /// Newly active cells start ramping from the current frame. Cells that
    /// leave the glyph go dark. Cells active before and after keep their
    /// delay and brightness.
    pub fn fold_in(
        &mut self,
        digits: DisplayDigits,
    ) {
        let active = compose_mask(&digits, self.placement);
        let start = u8::try_from(self.current_frame).unwrap_or(u8::MAX);

        for r in 0..H {
            for c in 0..W {
                match (self.active[r][c], active[r][c]) {
                    (false, true) => {
                        self.delay[r][c] = start;
                        self.brightness[r][c] = 0;
                        self.halo[r][c] = 0;
                        self.fade[r][c] = 0;
                    }
                    (true, false) => {
                        self.brightness[r][c] = 0;
                        self.delay[r][c] = 0;
                    }
                    _ => {}
                }
            }
        }

        self.previous = self.digits;
        self.digits = digits;
        self.active = active;
        self.distance = distance_map(&active);
    }

    /// Advance one frame. Does nothing when no animation is running.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) {
        if !self.is_animating {
            return;
        }

        let frame = self.current_frame;
        let total = self.total_frames;
        let last_frame = frame as u32 + 1 >= total as u32;
        let intensity = envelope(frame, total);

        for r in 0..H {
            for c in 0..W {
                if self.active[r][c] {
                    self.brightness[r][c] = advance_cell(self.brightness[r][c], frame, self.delay[r][c], total, rng);
                    self.halo[r][c] = 0;
                    self.fade[r][c] = 0;
                } else if last_frame {
                    self.halo[r][c] = 0;
                    self.fade[r][c] = 0;
                } else {
                    self.halo[r][c] = advance_halo(self.halo[r][c], self.distance[r][c], intensity, rng);
                    self.fade[r][c] = advance_fade(self.fade[r][c]);
                }
            }
        }

        self.current_frame = self.current_frame.saturating_add(1);
    }

    /// Snap to the final state: glyph fully lit, nothing else, not animating.
    pub fn finish(&mut self) {
        for r in 0..H {
            for c in 0..W {
                self.brightness[r][c] = if self.active[r][c] { MAX_BRIGHTNESS } else { 0 };
            }
        }
        self.halo = [[0; W]; H];
        self.fade = [[0; W]; H];
        self.current_frame = self.current_frame.max(self.total_frames);
        self.is_animating = false;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether the animation has run its length with every active cell at
    /// target and no halo or fade left on screen.
    pub fn is_settled(&self) -> bool {
        if self.current_frame < self.total_frames {
            return false;
        }
        for r in 0..H {
            for c in 0..W {
                if self.halo[r][c] != 0 || self.fade[r][c] != 0 {
                    return false;
                }
                if self.active[r][c]
                    && is_behind(self.brightness[r][c], self.current_frame, self.delay[r][c], self.total_frames)
                {
                    return false;
                }
            }
        }
        true
    }

    /// Display level (0..=MAX_BRIGHTNESS) of a cell: brightness on the
    /// glyph, fade or halo elsewhere.
    #[inline]
    pub fn level(
        &self,
        row: usize,
        col: usize,
    ) -> u8 {
        self.brightness[row][col].max(self.fade[row][col]).max(self.halo[row][col])
    }

    /// Number of cells currently lit at any level.
    pub fn lit_cells(&self) -> u32 {
        let mut count = 0;
        for r in 0..H {
            for c in 0..W {
                if self.level(r, c) > 0 {
                    count += 1;
                }
            }
        }
        count
    }

    #[inline]
    pub const fn placement(&self) -> Placement { self.placement }

    #[inline]
    pub const fn active(&self) -> &Mask<W, H> { &self.active }

    #[inline]
    pub const fn brightness(&self) -> &CellGrid<u8, W, H> { &self.brightness }

    #[inline]
    pub const fn distance(&self) -> &CellGrid<u8, W, H> { &self.distance }

    #[inline]
    pub const fn delay(&self) -> &CellGrid<u8, W, H> { &self.delay }

    #[inline]
    pub const fn halo(&self) -> &CellGrid<u8, W, H> { &self.halo }

    #[inline]
    pub const fn fade(&self) -> &CellGrid<u8, W, H> { &self.fade }

    #[inline]
    pub const fn current_frame(&self) -> u16 { self.current_frame }

    #[inline]
    pub const fn total_frames(&self) -> u16 { self.total_frames }

    #[inline]
    pub const fn is_animating(&self) -> bool { self.is_animating }

    #[inline]
    pub const fn digits(&self) -> DisplayDigits { self.digits }

    #[inline]
    pub const fn previous(&self) -> DisplayDigits { self.previous }
}

impl<const W: usize, const H: usize> Default for Session<W, H> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================
