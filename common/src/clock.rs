//! Wall-clock time to display digits.
//!
//! The clock source (simulator or firmware) delivers a [`ClockTime`] once a
//! minute. [`DisplayDigits::from_time`] turns it into the four digit slots
//! shown on the face; the colon is implicit and always drawn.

use crate::config::DIGIT_COUNT;
use crate::glyphs::Symbol;

/// Hour/minute as delivered by the clock source.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ClockTime {
    /// Hour, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
}

impl ClockTime {
    /// Create a time, returning `None` for out-of-range fields.
    pub const fn new(
        hour: u8,
        minute: u8,
    ) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Minutes since midnight.
    #[inline]
    pub const fn minute_of_day(self) -> u16 { self.hour as u16 * 60 + self.minute as u16 }

    /// Time `minutes` later, wrapping at midnight.
    pub const fn plus_minutes(
        self,
        minutes: u32,
    ) -> Self {
        let total = (self.minute_of_day() as u32 + minutes) % (24 * 60);
        Self {
            hour: (total / 60) as u8,
            minute: (total % 60) as u8,
        }
    }
}

/// Hour digit style.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum HourFormat {
    /// 00-23 with a leading zero.
    #[default]
    TwentyFour,
    /// 1-12 with the leading digit blanked below 10.
    Twelve,
}

impl HourFormat {
    /// Switch between 12h and 24h.
    #[inline]
    pub const fn toggle(self) -> Self {
        match self {
            Self::TwentyFour => Self::Twelve,
            Self::Twelve => Self::TwentyFour,
        }
    }
}

/// The four digit slots `H H M M` (colon excluded).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DisplayDigits(pub [Symbol; DIGIT_COUNT]);

impl DisplayDigits {
    /// All slots blank. Used before the first clock tick.
    pub const BLANK: Self = Self([Symbol::Blank; DIGIT_COUNT]);

    /// Digits for a time in the given format.
    ///
    /// Out-of-range fields are passed through as invalid digits, which the
    /// compositor skips.
    pub const fn from_time(
        time: ClockTime,
        format: HourFormat,
    ) -> Self {
        let mut hour = time.hour;
        if let HourFormat::Twelve = format {
            hour %= 12;
            if hour == 0 {
                hour = 12;
            }
        }

        let leading = if matches!(format, HourFormat::Twelve) && hour < 10 {
            Symbol::Blank
        } else {
            Symbol::Digit(hour / 10)
        };

        Self([
            leading,
            Symbol::Digit(hour % 10),
            Symbol::Digit(time.minute / 10),
            Symbol::Digit(time.minute % 10),
        ])
    }

    /// Symbol in digit slot `slot` (0-3).
    #[inline]
    pub const fn slot(
        &self,
        slot: usize,
    ) -> Symbol {
        self.0[slot]
    }

    /// Bitmask of slots whose symbol differs from `other` (bit 0 = first hour digit).
    pub fn changed_slots(
        &self,
        other: &Self,
    ) -> u8 {
        let mut mask = 0;
        for (i, (a, b)) in self.0.iter().zip(other.0.iter()).enumerate() {
            if a != b {
                mask |= 1 << i;
            }
        }
        mask
    }
}
