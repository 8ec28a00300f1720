//! Glyph-to-glyph transitions.
//!
//! When the displayed digits change, two things decide what the face looks
//! like during the next reveal:
//!
//! - the [`RevealScope`] selects which active cells restart from dark, and
//! - cells that belonged to the old glyph but not the new one fade out over
//!   a few frames instead of vanishing at once.

use crate::clock::DisplayDigits;
use crate::compositor::{CellGrid, Mask, Placement, slot_mask};
use crate::config::{DIGIT_COUNT, MAX_BRIGHTNESS};

/// Level a cell of the previous glyph starts fading from.
pub const FADE_START: u8 = MAX_BRIGHTNESS - 1;

/// Which active cells restart their ramp when a reveal begins.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RevealScope {
    /// Every active cell starts dark.
    #[default]
    AllDigits,
    /// Only cells inside slots whose symbol changed start dark; the rest
    /// stay at full brightness.
    ChangedDigits,
}

impl RevealScope {
    /// Switch between the two scopes.
    #[inline]
    pub const fn toggle(self) -> Self {
        match self {
            Self::AllDigits => Self::ChangedDigits,
            Self::ChangedDigits => Self::AllDigits,
        }
    }
}

/// Cells that ramp up from dark for this reveal.
pub fn reveal_region<const W: usize, const H: usize>(
    scope: RevealScope,
    previous: &DisplayDigits,
    next: &DisplayDigits,
    active: &Mask<W, H>,
    placement: Placement,
) -> Mask<W, H> {
    match scope {
        RevealScope::AllDigits => *active,
        RevealScope::ChangedDigits => {
            let changed = previous.changed_slots(next);
            let mut region = [[false; W]; H];
            for slot in (0..DIGIT_COUNT).filter(|&s| changed & (1 << s) != 0) {
                let cells: Mask<W, H> = slot_mask(slot, placement);
                for (region_row, (cell_row, active_row)) in region.iter_mut().zip(cells.iter().zip(active.iter())) {
                    for (r, (&c, &a)) in region_row.iter_mut().zip(cell_row.iter().zip(active_row.iter())) {
                        *r |= c && a;
                    }
                }
            }
            region
        }
    }
}

/// Start fades on cells that leave the glyph.
///
/// A cell gets a fade when it was active in `old` and is inactive in `new`.
/// The fade starts at [`FADE_START`] or the cell's current brightness,
/// whichever is lower. All other fades are cleared.
pub fn seed_fades<const W: usize, const H: usize>(
    old: &Mask<W, H>,
    new: &Mask<W, H>,
    brightness: &CellGrid<u8, W, H>,
    fade: &mut CellGrid<u8, W, H>,
) {
    for r in 0..H {
        for c in 0..W {
            fade[r][c] = if old[r][c] && !new[r][c] {
                brightness[r][c].min(FADE_START)
            } else {
                0
            };
        }
    }
}

/// Fade level after one frame.
#[inline]
pub const fn advance_fade(level: u8) -> u8 { level.saturating_sub(1) }
