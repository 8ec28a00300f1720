//! Static glyph bitmaps for the LED-matrix digits.
//!
//! Each glyph is [`DIGIT_HEIGHT`] rows tall. Rows are stored as `u8`
//! bitmasks where bit `c` is column `c` (leftmost column is bit 0). Strokes
//! are two cells thick everywhere.
//!
//! The tables are written as ASCII art (`#` lit, `.` dark) and packed at
//! compile time.

use crate::config::{COLON_WIDTH, DIGIT_HEIGHT, DIGIT_WIDTH};

/// Immutable glyph bitmap.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Glyph {
    /// Width in cells.
    pub width: u8,
    /// Row bitmasks, bit `c` = column `c`.
    pub rows: [u8; DIGIT_HEIGHT],
}

impl Glyph {
    /// Whether the glyph pixel at (`row`, `col`) is lit.
    #[inline]
    pub const fn is_lit(
        &self,
        row: usize,
        col: usize,
    ) -> bool {
        row < DIGIT_HEIGHT && col < self.width as usize && self.rows[row] & (1 << col) != 0
    }

    /// Number of lit pixels.
    pub const fn lit_count(&self) -> u32 {
        let mut count = 0;
        let mut row = 0;
        while row < DIGIT_HEIGHT {
            count += self.rows[row].count_ones();
            row += 1;
        }
        count
    }
}

/// What a layout slot shows.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Symbol {
    /// Decimal digit. Values above 9 are representable but draw nothing.
    Digit(u8),
    /// Suppressed slot (leading hour digit in 12h mode).
    #[default]
    Blank,
    /// Hour/minute separator, always drawn.
    Colon,
}

impl Symbol {
    /// Glyph for this symbol, or `None` for blank and out-of-range digits.
    pub fn glyph(self) -> Option<&'static Glyph> {
        match self {
            Self::Digit(d) if d <= 9 => Some(&DIGIT_GLYPHS[d as usize]),
            Self::Digit(_) | Self::Blank => None,
            Self::Colon => Some(&COLON_GLYPH),
        }
    }

    /// Layout width in cells. Blank and invalid digits still reserve a slot.
    pub const fn width(self) -> usize {
        match self {
            Self::Colon => COLON_WIDTH,
            Self::Digit(_) | Self::Blank => DIGIT_WIDTH,
        }
    }
}

// =============================================================================
// Glyph Packing
// =============================================================================

const fn pack<const N: usize>(art: [&[u8; N]; DIGIT_HEIGHT]) -> Glyph {
    let mut rows = [0u8; DIGIT_HEIGHT];
    let mut r = 0;
    while r < DIGIT_HEIGHT {
        let mut c = 0;
        while c < N {
            if art[r][c] == b'#' {
                rows[r] |= 1 << c;
            }
            c += 1;
        }
        r += 1;
    }
    Glyph { width: N as u8, rows }
}

// =============================================================================
// Glyph Tables
// =============================================================================

/// Digits 0 to 9, 6x12 cells.
pub static DIGIT_GLYPHS: [Glyph; 10] = [
    pack([
        b"######", b"######", b"##..##", b"##..##", b"##..##", b"##..##",
        b"##..##", b"##..##", b"##..##", b"##..##", b"######", b"######",
    ]),
    pack([
        b"....##", b"....##", b"..####", b"..####", b"....##", b"....##",
        b"....##", b"....##", b"....##", b"....##", b"....##", b"....##",
    ]),
    pack([
        b"######", b"######", b"....##", b"....##", b"....##", b"######",
        b"######", b"##....", b"##....", b"##....", b"######", b"######",
    ]),
    pack([
        b"######", b"######", b"....##", b"....##", b"....##", b"######",
        b"######", b"....##", b"....##", b"....##", b"######", b"######",
    ]),
    pack([
        b"##..##", b"##..##", b"##..##", b"##..##", b"##..##", b"######",
        b"######", b"....##", b"....##", b"....##", b"....##", b"....##",
    ]),
    pack([
        b"######", b"######", b"##....", b"##....", b"##....", b"######",
        b"######", b"....##", b"....##", b"....##", b"######", b"######",
    ]),
    pack([
        b"######", b"######", b"##....", b"##....", b"##....", b"######",
        b"######", b"##..##", b"##..##", b"##..##", b"######", b"######",
    ]),
    pack([
        b"######", b"######", b"....##", b"....##", b"....##", b"....##",
        b"....##", b"....##", b"....##", b"....##", b"....##", b"....##",
    ]),
    pack([
        b"######", b"######", b"##..##", b"##..##", b"##..##", b"######",
        b"######", b"##..##", b"##..##", b"##..##", b"######", b"######",
    ]),
    pack([
        b"######", b"######", b"##..##", b"##..##", b"##..##", b"######",
        b"######", b"....##", b"....##", b"....##", b"######", b"######",
    ]),
];

/// Colon, 2x12 cells: two 2x2 dots.
pub static COLON_GLYPH: Glyph = pack([
    b"..", b"..", b"..", b"##", b"##", b"..",
    b"..", b"##", b"##", b"..", b"..", b"..",
]);

const _: () = assert!(DIGIT_WIDTH == 6);
const _: () = assert!(COLON_WIDTH == 2);
