//! Digit mask compositor.
//!
//! Lays out `H H : M M` left to right with fixed spacing, producing:
//! - the **active mask**: union of all glyph bitmaps over the grid, and
//! - the **distance map**: Manhattan distance from every cell to the nearest
//!   active cell (0 on active cells).
//!
//! Both are pure functions of their inputs.
//!
//! # Distance Transform
//!
//! Instead of an all-pairs scan the distance map uses the classic two-pass
//! L1 transform: a forward sweep propagates distances from the top-left and
//! a backward sweep from the bottom-right. On an obstacle-free 4-connected
//! grid this yields exactly the minimum Manhattan distance.

use crate::config::{DIGIT_COUNT, DIGIT_HEIGHT, DIGIT_SPACING, LAYOUT_WIDTH};
use crate::clock::DisplayDigits;
use crate::glyphs::Symbol;

/// Per-cell storage, indexed `[row][col]`.
pub type CellGrid<T, const W: usize, const H: usize> = [[T; W]; H];

/// Active-cell mask.
pub type Mask<const W: usize, const H: usize> = CellGrid<bool, W, H>;

/// Distance of a cell when the grid has no active cells at all.
pub const DISTANCE_UNSET: u8 = u8::MAX;

/// Symbols per layout row: four digits plus the colon.
pub const LAYOUT_SLOTS: usize = DIGIT_COUNT + 1;

/// Layout slot holding the colon.
pub const COLON_SLOT: usize = 2;

/// Layout slot index of each digit slot.
pub const DIGIT_LAYOUT_SLOTS: [usize; DIGIT_COUNT] = [0, 1, 3, 4];

/// Top-left cell of the layout.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Placement {
    pub start_col: i32,
    pub start_row: i32,
}

impl Placement {
    /// Layout centered on a `W`x`H` grid.
    pub const fn centered<const W: usize, const H: usize>() -> Self {
        Self {
            start_col: (W as i32 - LAYOUT_WIDTH as i32) / 2,
            start_row: (H as i32 - DIGIT_HEIGHT as i32) / 2,
        }
    }
}

/// Symbols in layout order, colon inserted.
pub const fn layout_symbols(digits: &DisplayDigits) -> [Symbol; LAYOUT_SLOTS] {
    let d = digits.0;
    [d[0], d[1], Symbol::Colon, d[2], d[3]]
}

/// Left column of each layout slot.
pub const fn slot_columns(placement: Placement) -> [i32; LAYOUT_SLOTS] {
    let symbols = layout_symbols(&DisplayDigits::BLANK);
    let mut cols = [0i32; LAYOUT_SLOTS];
    let mut col = placement.start_col;
    let mut i = 0;
    while i < LAYOUT_SLOTS {
        cols[i] = col;
        col += (symbols[i].width() + DIGIT_SPACING) as i32;
        i += 1;
    }
    cols
}

#[inline]
fn cell_index<const W: usize, const H: usize>(
    row: i32,
    col: i32,
) -> Option<(usize, usize)> {
    if row < 0 || col < 0 || row as usize >= H || col as usize >= W {
        None
    } else {
        Some((row as usize, col as usize))
    }
}

/// Active mask for the given digits. Blank and invalid digits contribute
/// nothing; cells outside the grid are clipped.
pub fn compose_mask<const W: usize, const H: usize>(
    digits: &DisplayDigits,
    placement: Placement,
) -> Mask<W, H> {
    let mut mask = [[false; W]; H];
    let columns = slot_columns(placement);

    for (symbol, left) in layout_symbols(digits).iter().zip(columns) {
        let Some(glyph) = symbol.glyph() else {
            continue;
        };
        for row in 0..DIGIT_HEIGHT {
            if glyph.rows[row] == 0 {
                continue;
            }
            for col in 0..glyph.width as usize {
                if !glyph.is_lit(row, col) {
                    continue;
                }
                if let Some((r, c)) = cell_index::<W, H>(placement.start_row + row as i32, left + col as i32) {
                    mask[r][c] = true;
                }
            }
        }
    }

    mask
}

/// Rectangle covered by digit slot `slot` (0-3), whatever it shows.
pub fn slot_mask<const W: usize, const H: usize>(
    slot: usize,
    placement: Placement,
) -> Mask<W, H> {
    let mut mask = [[false; W]; H];
    let Some(&layout_slot) = DIGIT_LAYOUT_SLOTS.get(slot) else {
        return mask;
    };
    let left = slot_columns(placement)[layout_slot];
    let width = layout_symbols(&DisplayDigits::BLANK)[layout_slot].width();

    for row in 0..DIGIT_HEIGHT {
        for col in 0..width {
            if let Some((r, c)) = cell_index::<W, H>(placement.start_row + row as i32, left + col as i32) {
                mask[r][c] = true;
            }
        }
    }
    mask
}

/// Whether any cell of the mask is set.
pub fn any_active<const W: usize, const H: usize>(mask: &Mask<W, H>) -> bool {
    mask.iter().any(|row| row.iter().any(|&a| a))
}

/// Manhattan distance from each cell to the nearest active cell.
///
/// Returns [`DISTANCE_UNSET`] everywhere if the mask is empty. Distances
/// saturate one below the sentinel.
pub fn distance_map<const W: usize, const H: usize>(mask: &Mask<W, H>) -> CellGrid<u8, W, H> {
    if !any_active(mask) {
        return [[DISTANCE_UNSET; W]; H];
    }

    const FAR: u16 = u16::MAX / 2;
    let mut dist = [[FAR; W]; H];

    // Forward sweep: top-left to bottom-right
    for r in 0..H {
        for c in 0..W {
            if mask[r][c] {
                dist[r][c] = 0;
                continue;
            }
            let mut best = dist[r][c];
            if r > 0 {
                best = best.min(dist[r - 1][c] + 1);
            }
            if c > 0 {
                best = best.min(dist[r][c - 1] + 1);
            }
            dist[r][c] = best;
        }
    }

    // Backward sweep: bottom-right to top-left
    for r in (0..H).rev() {
        for c in (0..W).rev() {
            let mut best = dist[r][c];
            if r + 1 < H {
                best = best.min(dist[r + 1][c] + 1);
            }
            if c + 1 < W {
                best = best.min(dist[r][c + 1] + 1);
            }
            dist[r][c] = best;
        }
    }

    let mut out = [[0u8; W]; H];
    for r in 0..H {
        for c in 0..W {
            out[r][c] = dist[r][c].min(u16::from(DISTANCE_UNSET - 1)) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ClockTime, HourFormat};
    use crate::config::{DIGIT_START_COL, DIGIT_START_ROW, GRID_COLS, GRID_ROWS};

    type FullMask = Mask<GRID_COLS, GRID_ROWS>;

    fn digits_1234() -> DisplayDigits {
        DisplayDigits::from_time(ClockTime { hour: 12, minute: 34 }, HourFormat::TwentyFour)
    }

    fn brute_force<const W: usize, const H: usize>(mask: &Mask<W, H>) -> CellGrid<u8, W, H> {
        let mut out = [[DISTANCE_UNSET; W]; H];
        for r in 0..H {
            for c in 0..W {
                for ar in 0..H {
                    for ac in 0..W {
                        if mask[ar][ac] {
                            let d = (r.abs_diff(ar) + c.abs_diff(ac)) as u8;
                            out[r][c] = out[r][c].min(d);
                        }
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_centered_placement_matches_constants() {
        let p = Placement::centered::<GRID_COLS, GRID_ROWS>();
        assert_eq!(p.start_col, DIGIT_START_COL as i32);
        assert_eq!(p.start_row, DIGIT_START_ROW as i32);
    }

    #[test]
    fn test_slot_columns_spacing() {
        let cols = slot_columns(Placement { start_col: 0, start_row: 0 });
        assert_eq!(cols, [0, 7, 14, 17, 24]);
    }

    #[test]
    fn test_distance_two_row_example() {
        let mut mask: Mask<2, 2> = [[false; 2]; 2];
        mask[0][0] = true;
        let dist = distance_map(&mask);
        assert_eq!(dist[0][0], 0);
        assert_eq!(dist[0][1], 1);
        assert_eq!(dist[1][0], 1);
        assert_eq!(dist[1][1], 2);
    }

    #[test]
    fn test_distance_matches_brute_force() {
        let placement = Placement::centered::<GRID_COLS, GRID_ROWS>();
        let mask: FullMask = compose_mask(&digits_1234(), placement);
        assert_eq!(distance_map(&mask), brute_force(&mask));
    }

    #[test]
    fn test_empty_mask_is_unset() {
        let mask: Mask<5, 3> = [[false; 5]; 3];
        let dist = distance_map(&mask);
        assert!(dist.iter().flatten().all(|&d| d == DISTANCE_UNSET));
    }

    #[test]
    fn test_compose_is_idempotent() {
        let placement = Placement::centered::<GRID_COLS, GRID_ROWS>();
        let a: FullMask = compose_mask(&digits_1234(), placement);
        let b: FullMask = compose_mask(&digits_1234(), placement);
        assert_eq!(a, b);
        assert_eq!(distance_map(&a), distance_map(&b));
    }

    #[test]
    fn test_colon_always_present() {
        let placement = Placement::centered::<GRID_COLS, GRID_ROWS>();
        let mask: FullMask = compose_mask(&DisplayDigits::BLANK, placement);
        let lit = mask.iter().flatten().filter(|&&a| a).count();
        assert_eq!(lit, 8);
        let colon_col = slot_columns(placement)[COLON_SLOT] as usize;
        assert!(mask[DIGIT_START_ROW + 3][colon_col]);
    }

    #[test]
    fn test_invalid_digit_is_skipped() {
        let placement = Placement::centered::<GRID_COLS, GRID_ROWS>();
        let invalid = DisplayDigits([Symbol::Digit(42), Symbol::Blank, Symbol::Blank, Symbol::Blank]);
        let a: FullMask = compose_mask(&invalid, placement);
        let b: FullMask = compose_mask(&DisplayDigits::BLANK, placement);
        assert_eq!(a, b);
    }

    #[test]
    fn test_mask_clipped_to_small_grid() {
        // Grid narrower than the layout: must not panic
        let mask: Mask<10, 4> = compose_mask(&digits_1234(), Placement::centered::<10, 4>());
        assert!(any_active(&mask));
    }

    #[test]
    fn test_slot_mask_covers_digit_rectangle() {
        let placement = Placement::centered::<GRID_COLS, GRID_ROWS>();
        let slot: FullMask = slot_mask(3, placement);
        let lit = slot.iter().flatten().filter(|&&a| a).count();
        assert_eq!(lit, 6 * 12);

        let left = slot_columns(placement)[4] as usize;
        assert!(slot[DIGIT_START_ROW][left]);
        assert!(!slot[DIGIT_START_ROW][left - 1]);

        let none: FullMask = slot_mask(7, placement);
        assert!(!any_active(&none));
    }
}
