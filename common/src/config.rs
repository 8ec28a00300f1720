//! Grid, layout and animation configuration.
//!
//! All tuning values are compile-time constants with validation assertions.
//! A misordered threshold table or a layout that no longer fits the grid
//! fails compilation.
//!
//! The runtime-adjustable subset lives in [`AnimationConfig`], which hosts
//! construct once and hand to the [`FaceAnimator`](crate::driver::FaceAnimator).

use core::fmt;

use crate::clock::HourFormat;
use crate::transition::RevealScope;

// =============================================================================
// Grid Configuration
// =============================================================================

/// Number of cell columns in the matrix.
pub const GRID_COLS: usize = 36;

/// Number of cell rows in the matrix.
pub const GRID_ROWS: usize = 42;

/// Default pixel size of one cell (36x42 cells = 144x168 px face).
pub const CELL_SIZE: u32 = 4;

// =============================================================================
// Glyph Layout
// =============================================================================

/// Width of a digit glyph in cells.
pub const DIGIT_WIDTH: usize = 6;

/// Height of every glyph in cells.
pub const DIGIT_HEIGHT: usize = 12;

/// Width of the colon glyph in cells.
pub const COLON_WIDTH: usize = 2;

/// Empty columns between neighbouring symbols.
pub const DIGIT_SPACING: usize = 1;

/// Number of digit slots (HH MM).
pub const DIGIT_COUNT: usize = 4;

/// Total width of `H H : M M` including spacing.
pub const LAYOUT_WIDTH: usize = DIGIT_WIDTH * DIGIT_COUNT + COLON_WIDTH + DIGIT_SPACING * DIGIT_COUNT;

/// Left column of the first digit (layout centered horizontally).
pub const DIGIT_START_COL: usize = (GRID_COLS - LAYOUT_WIDTH) / 2;

/// Top row of all glyphs (layout centered vertically).
pub const DIGIT_START_ROW: usize = (GRID_ROWS - DIGIT_HEIGHT) / 2;

const _: () = assert!(LAYOUT_WIDTH <= GRID_COLS);
const _: () = assert!(DIGIT_HEIGHT <= GRID_ROWS);
const _: () = assert!(DIGIT_WIDTH <= 8, "glyph rows are stored as u8 bitmasks");
// Manhattan distances must stay below the u8 sentinel.
const _: () = assert!(GRID_COLS + GRID_ROWS < u8::MAX as usize);

// =============================================================================
// Brightness Ramp
// =============================================================================

/// Highest brightness level of a lit cell (levels: off, low, mid, full).
pub const MAX_BRIGHTNESS: u8 = 3;

/// Percent-complete thresholds at which the target level becomes 1, 2 and 3.
pub const RAMP_THRESHOLDS: [u8; MAX_BRIGHTNESS as usize] = [30, 60, 85];

/// Base chance (percent) of stepping one level when behind target.
pub const BASE_STEP_CHANCE: u8 = 25;

/// Extra chance (percent) per level of deficit.
pub const STEP_CHANCE_PER_LEVEL: u8 = 20;

/// Upper clamp for the per-frame step chance (percent).
pub const STEP_CHANCE_MAX: u8 = 95;

const _: () = assert!(RAMP_THRESHOLDS[0] < RAMP_THRESHOLDS[1]);
const _: () = assert!(RAMP_THRESHOLDS[1] < RAMP_THRESHOLDS[2]);
const _: () = assert!(RAMP_THRESHOLDS[2] <= 100);
const _: () = assert!(BASE_STEP_CHANCE <= STEP_CHANCE_MAX);
const _: () = assert!(STEP_CHANCE_MAX <= 100);

// =============================================================================
// Reveal Timing
// =============================================================================

/// Number of frames in one reveal animation.
pub const DIGIT_ANIM_STEPS: u16 = 16;

/// Delay between animation frames in milliseconds.
pub const ANIM_FRAME_MS: u32 = 25;

/// Largest random start delay (frames) of an active cell.
pub const MAX_DELAY: u8 = 5;

const _: () = assert!((MAX_DELAY as u16) + 2 <= DIGIT_ANIM_STEPS);

// =============================================================================
// Halo / Sparkle
// =============================================================================

/// Highest halo level (rendered with the low and mid colours).
pub const HALO_MAX: u8 = 2;

/// Halos only spawn within this Manhattan distance of the glyph.
pub const HALO_RADIUS: u8 = 3;

/// Spawn chance (percent) at distance 1 and peak envelope intensity.
pub const HALO_SPAWN_CHANCE: u8 = 10;

/// Upper clamp for the spawn chance (percent).
///
/// With the current tuning the chance peaks at `HALO_SPAWN_CHANCE` (distance
/// 1, full intensity), so the clamp only binds if the constants are retuned.
pub const HALO_SPAWN_CHANCE_MAX: u8 = 50;

/// Chance (percent) that a lit halo goes dark on a given frame.
pub const HALO_FADE_CHANCE: u8 = 33;

const _: () = assert!(HALO_MAX < MAX_BRIGHTNESS);
const _: () = assert!(HALO_RADIUS > 0);
const _: () = assert!(HALO_SPAWN_CHANCE <= HALO_SPAWN_CHANCE_MAX);
const _: () = assert!(HALO_SPAWN_CHANCE_MAX <= 100);
const _: () = assert!(HALO_FADE_CHANCE <= 100);

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Invalid runtime configuration.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConfigError {
    /// Frame interval of zero would spin the host timer.
    ZeroFrameInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::ZeroFrameInterval => f.write_str("frame interval must be at least 1 ms"),
        }
    }
}

/// Runtime animation settings.
///
/// A `total_frames` of 0 or 1 is valid and degrades to an immediate
/// snap to full brightness without halos.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AnimationConfig {
    /// Frames per reveal animation.
    pub total_frames: u16,
    /// Milliseconds between frames.
    pub frame_interval_ms: u32,
    /// Largest per-cell start delay in frames.
    pub max_delay: u8,
    /// 12h or 24h hour digits.
    pub hour_format: HourFormat,
    /// Which cells restart when the minute changes while idle.
    pub tick_scope: RevealScope,
}

impl AnimationConfig {
    /// Default settings from the compile-time constants.
    pub const fn new() -> Self {
        Self {
            total_frames: DIGIT_ANIM_STEPS,
            frame_interval_ms: ANIM_FRAME_MS,
            max_delay: MAX_DELAY,
            hour_format: HourFormat::TwentyFour,
            tick_scope: RevealScope::AllDigits,
        }
    }

    /// Check settings that cannot degrade gracefully.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::ZeroFrameInterval);
        }
        Ok(())
    }

    /// Delay bound actually used for an animation of this length.
    ///
    /// Clamped so the forced final frames never precede a cell's delay.
    pub const fn effective_max_delay(&self) -> u8 {
        let limit = self.total_frames.saturating_sub(2);
        if (self.max_delay as u16) < limit {
            self.max_delay
        } else {
            limit as u8
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================
