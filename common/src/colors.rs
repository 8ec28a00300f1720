//! Cell colours and palettes.
//!
//! A lit cell shows one of four grey levels (off, low, mid, full). The
//! levels come from a 24-bit table `0x000000, 0x555555, 0xAAAAAA, 0xFFFFFF`
//! truncated to Rgb565:
//!
//! | Level | Rgb888 | Rgb565 (r, g, b) |
//! |-------|--------|------------------|
//! | 0 | `0x000000` | (0, 0, 0) |
//! | 1 | `0x555555` | (10, 21, 10) |
//! | 2 | `0xAAAAAA` | (21, 42, 21) |
//! | 3 | `0xFFFFFF` | (31, 63, 31) |
//!
//! [`Palette::Light`] reads the same table backwards, giving black digits
//! on a white face.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

use crate::config::MAX_BRIGHTNESS;

// =============================================================================
// Level Colors
// =============================================================================

/// Pure black (0, 0, 0).
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white (31, 63, 31).
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// `0x555555`: first ramp step, dim halo.
pub const LEVEL_LOW: Rgb565 = Rgb565::new(10, 21, 10);

/// `0xAAAAAA`: second ramp step, bright halo, light-mode grid lines.
pub const LEVEL_MID: Rgb565 = Rgb565::new(21, 42, 21);

/// Grid lines on the dark face (`0x555555`, same as the low level).
pub const GRID_DARK: Rgb565 = LEVEL_LOW;

/// Brightness level to colour, dark face.
pub const LEVEL_COLORS: [Rgb565; MAX_BRIGHTNESS as usize + 1] = [BLACK, LEVEL_LOW, LEVEL_MID, WHITE];

// =============================================================================
// Palette
// =============================================================================

/// Face colour scheme.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Palette {
    /// White digits on black.
    #[default]
    Dark,
    /// Black digits on white.
    Light,
}

impl Palette {
    /// Colour of a cell at `level`. Levels above the maximum clamp to full.
    pub const fn level_color(
        self,
        level: u8,
    ) -> Rgb565 {
        let level = (if level > MAX_BRIGHTNESS { MAX_BRIGHTNESS } else { level }) as usize;
        match self {
            Self::Dark => LEVEL_COLORS[level],
            Self::Light => LEVEL_COLORS[MAX_BRIGHTNESS as usize - level],
        }
    }

    /// Face background (level 0).
    #[inline]
    pub const fn background(self) -> Rgb565 { self.level_color(0) }

    /// Cell outline colour.
    pub const fn grid(self) -> Rgb565 {
        match self {
            Self::Dark => GRID_DARK,
            Self::Light => LEVEL_MID,
        }
    }

    /// Switch between dark and light.
    #[inline]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}
