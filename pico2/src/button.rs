//! Button debouncing for the Display Pack buttons.
//!
//! Buttons are active-low. A state change is only accepted when the previous
//! accepted change is at least [`DEBOUNCE_MS`] old, so contact bounce never
//! produces a second press.

/// Debounce window in milliseconds.
pub const DEBOUNCE_MS: u64 = 50;

/// Press edge detector for one button.
pub struct Debounce {
    pressed: bool,
    last_change_ms: Option<u64>,
}

impl Debounce {
    pub const fn new() -> Self {
        Self {
            pressed: false,
            last_change_ms: None,
        }
    }

    /// Feed the current pin level. Returns `true` on an accepted press edge.
    pub fn update(
        &mut self,
        is_low: bool,
        now_ms: u64,
    ) -> bool {
        if is_low == self.pressed {
            return false;
        }
        if let Some(last) = self.last_change_ms
            && now_ms.saturating_sub(last) < DEBOUNCE_MS
        {
            return false;
        }

        self.pressed = is_low;
        self.last_change_ms = Some(now_ms);
        is_low
    }
}

impl Default for Debounce {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================
