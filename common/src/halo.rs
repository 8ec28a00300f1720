//! Halo sparkles around the glyph boundary.
//!
//! While a reveal runs, inactive cells close to the glyph may light up
//! briefly. The spawn chance falls off linearly with Manhattan distance and
//! follows a triangular envelope over the animation: quiet at the start,
//! busiest halfway through, quiet again at the end.

use rand::Rng;

use crate::compositor::DISTANCE_UNSET;
use crate::config::{HALO_FADE_CHANCE, HALO_MAX, HALO_RADIUS, HALO_SPAWN_CHANCE, HALO_SPAWN_CHANCE_MAX};
use crate::ramp::roll;

/// Envelope intensity (0-100) at `frame` of a `total` frame animation.
///
/// Peaks at `total / 2`. Animations shorter than two frames have no halo.
pub const fn envelope(
    frame: u16,
    total: u16,
) -> u8 {
    if total < 2 || frame >= total {
        return 0;
    }

    let frame = frame as u32;
    let total = total as u32;
    let mid = total / 2;

    let intensity = if frame <= mid {
        frame * 100 / mid
    } else {
        (total - frame) * 100 / (total - mid)
    };
    intensity as u8
}

/// Spawn chance (percent) for a dark cell at `distance` from the glyph.
pub const fn spawn_chance(
    distance: u8,
    intensity: u8,
) -> u8 {
    if distance == 0 || distance == DISTANCE_UNSET || distance > HALO_RADIUS {
        return 0;
    }

    let falloff = (HALO_RADIUS + 1 - distance) as u32;
    let chance = HALO_SPAWN_CHANCE as u32 * falloff * intensity as u32 / (HALO_RADIUS as u32 * 100);
    if chance > HALO_SPAWN_CHANCE_MAX as u32 {
        HALO_SPAWN_CHANCE_MAX
    } else {
        chance as u8
    }
}

/// Halo level of an inactive cell after one frame.
pub fn advance_halo<R: Rng + ?Sized>(
    level: u8,
    distance: u8,
    intensity: u8,
    rng: &mut R,
) -> u8 {
    if level == 0 {
        return if roll(rng, spawn_chance(distance, intensity)) { 1 } else { 0 };
    }

    if roll(rng, HALO_FADE_CHANCE) {
        0
    } else if level < HALO_MAX {
        level + 1
    } else {
        HALO_MAX
    }
}
