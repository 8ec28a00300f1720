//! Popup state management with time-based expiration.
//!
//! Each popup variant holds its start time for expiration checking. Popups
//! announce keyboard toggles and are drawn over the face.

use std::time::Instant;

use roundy_common::{CellStyle, HourFormat, Palette, RevealScope};

use crate::timing::POPUP_DURATION;

/// Active popup with its start time.
#[derive(Clone, Copy, Debug)]
pub enum Popup {
    /// Hour format switched.
    Format(HourFormat, Instant),
    /// Palette switched.
    Palette(Palette, Instant),
    /// Tick reveal scope switched.
    Scope(RevealScope, Instant),
    /// Cell style switched.
    Style(CellStyle, Instant),
}

impl Popup {
    /// Get the start time of this popup.
    #[inline]
    pub const fn start_time(&self) -> Instant {
        match self {
            Self::Format(_, t) | Self::Palette(_, t) | Self::Scope(_, t) | Self::Style(_, t) => *t,
        }
    }

    /// Check if this popup has expired.
    #[inline]
    pub fn is_expired(&self) -> bool { self.start_time().elapsed() >= POPUP_DURATION }

    /// Text shown in the popup.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Format(HourFormat::TwentyFour, _) => "24H",
            Self::Format(HourFormat::Twelve, _) => "12H",
            Self::Palette(Palette::Dark, _) => "DARK",
            Self::Palette(Palette::Light, _) => "LIGHT",
            Self::Scope(RevealScope::AllDigits, _) => "ALL DIGITS",
            Self::Scope(RevealScope::ChangedDigits, _) => "CHANGED",
            Self::Style(CellStyle::Square, _) => "SQUARE",
            Self::Style(CellStyle::Diagonal, _) => "DIAGONAL",
        }
    }
}
