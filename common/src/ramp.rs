//! Brightness ramp state machine for active cells.
//!
//! Every active cell climbs from 0 to [`MAX_BRIGHTNESS`] over one reveal
//! animation. Each frame:
//!
//! ```text
//! frame < delay               -> wait
//! percent  = (step + 1) * 100 / max(total - delay, 1)
//! target   = thresholds passed by percent (0..=MAX)
//! target <= brightness        -> hold
//! otherwise                   -> +1 level with chance BASE + deficit * STEP
//! frame + 2 >= total          -> snap to MAX
//! ```
//!
//! A cell never skips a level in one frame; a larger deficit only raises the
//! chance of stepping at all. The snap on the last two frames bounds the
//! animation length regardless of random variance.

use rand::Rng;

use crate::config::{BASE_STEP_CHANCE, MAX_BRIGHTNESS, RAMP_THRESHOLDS, STEP_CHANCE_MAX, STEP_CHANCE_PER_LEVEL};

/// Percent of the cell's own ramp completed after `frame`, or `None` while
/// the cell is still waiting out its delay.
pub const fn percent_complete(
    frame: u16,
    delay: u8,
    total: u16,
) -> Option<u8> {
    let delay = delay as u16;
    if frame < delay {
        return None;
    }

    let effective_total = if total > delay { total - delay } else { 1 };
    let mut effective_step = frame - delay;
    if effective_step > effective_total - 1 {
        effective_step = effective_total - 1;
    }

    let percent = (effective_step as u32 + 1) * 100 / effective_total as u32;
    Some(percent as u8)
}

/// Brightness level a cell should have reached at `percent`.
pub const fn target_level(percent: u8) -> u8 {
    let mut level = 0;
    while level < RAMP_THRESHOLDS.len() && percent >= RAMP_THRESHOLDS[level] {
        level += 1;
    }
    level as u8
}

/// Chance (percent) of stepping one level when `deficit` levels behind.
pub const fn step_chance(deficit: u8) -> u8 {
    let chance = BASE_STEP_CHANCE as u32 + deficit as u32 * STEP_CHANCE_PER_LEVEL as u32;
    if chance > STEP_CHANCE_MAX as u32 {
        STEP_CHANCE_MAX
    } else {
        chance as u8
    }
}

/// Whether `frame` is one of the forced final frames.
#[inline]
pub const fn is_final_frame(
    frame: u16,
    total: u16,
) -> bool {
    frame as u32 + 2 >= total as u32
}

/// Roll a `chance` percent event.
#[inline]
pub fn roll<R: Rng + ?Sized>(
    rng: &mut R,
    chance: u8,
) -> bool {
    chance > 0 && rng.random_range(0..100u8) < chance
}

/// Brightness of an active cell after processing `frame`.
pub fn advance_cell<R: Rng + ?Sized>(
    brightness: u8,
    frame: u16,
    delay: u8,
    total: u16,
    rng: &mut R,
) -> u8 {
    if is_final_frame(frame, total) {
        return MAX_BRIGHTNESS;
    }

    let Some(percent) = percent_complete(frame, delay, total) else {
        return brightness;
    };

    let target = target_level(percent);
    if target <= brightness {
        return brightness;
    }

    if roll(rng, step_chance(target - brightness)) {
        brightness + 1
    } else {
        brightness
    }
}

/// Whether a cell is still below the level it should have at `frame`.
///
/// Once the final frames are reached every active cell is expected at
/// [`MAX_BRIGHTNESS`].
pub const fn is_behind(
    brightness: u8,
    frame: u16,
    delay: u8,
    total: u16,
) -> bool {
    if frame >= total {
        return brightness < MAX_BRIGHTNESS;
    }
    match percent_complete(frame, delay, total) {
        Some(percent) => brightness < target_level(percent),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_percent_waits_for_delay() {
        assert_eq!(percent_complete(2, 3, 16), None);
        assert_eq!(percent_complete(3, 3, 16), Some(7)); // 1 * 100 / 13
    }

    #[test]
    fn test_percent_reaches_100_on_last_frame() {
        assert_eq!(percent_complete(15, 0, 16), Some(100));
        assert_eq!(percent_complete(40, 0, 16), Some(100));
        assert_eq!(percent_complete(15, 5, 16), Some(100));
    }

    #[test]
    fn test_percent_degenerate_totals() {
        assert_eq!(percent_complete(0, 0, 0), Some(100));
        assert_eq!(percent_complete(0, 0, 1), Some(100));
        // delay beyond the animation: effective total clamps to 1
        assert_eq!(percent_complete(20, 20, 16), Some(100));
    }

    #[test]
    fn test_target_level_bands() {
        assert_eq!(target_level(0), 0);
        assert_eq!(target_level(29), 0);
        assert_eq!(target_level(30), 1);
        assert_eq!(target_level(59), 1);
        assert_eq!(target_level(60), 2);
        assert_eq!(target_level(84), 2);
        assert_eq!(target_level(85), MAX_BRIGHTNESS);
        assert_eq!(target_level(100), MAX_BRIGHTNESS);
    }

    #[test]
    fn test_step_chance_grows_and_clamps() {
        assert_eq!(step_chance(0), 25);
        assert_eq!(step_chance(1), 45);
        assert_eq!(step_chance(3), 85);
        assert_eq!(step_chance(10), STEP_CHANCE_MAX);
    }

    #[test]
    fn test_final_frames() {
        assert!(!is_final_frame(13, 16));
        assert!(is_final_frame(14, 16));
        assert!(is_final_frame(15, 16));
        assert!(is_final_frame(0, 1));
        assert!(is_final_frame(0, 0));
    }

    #[test]
    fn test_advance_never_skips_levels() {
        let mut rng = SmallRng::seed_from_u64(11);
        for seed_frame in 0..14 {
            for start in 0..MAX_BRIGHTNESS {
                let next = advance_cell(start, seed_frame, 0, 16, &mut rng);
                assert!(next == start || next == start + 1);
            }
        }
    }

    #[test]
    fn test_advance_holds_while_delayed() {
        let mut rng = SmallRng::seed_from_u64(5);
        for frame in 0..5 {
            assert_eq!(advance_cell(0, frame, 5, 16, &mut rng), 0);
        }
    }

    #[test]
    fn test_advance_snaps_on_final_frames() {
        let mut rng = SmallRng::seed_from_u64(5);
        assert_eq!(advance_cell(0, 14, 5, 16, &mut rng), MAX_BRIGHTNESS);
        assert_eq!(advance_cell(1, 15, 0, 16, &mut rng), MAX_BRIGHTNESS);
    }

    #[test]
    fn test_advance_holds_when_caught_up() {
        let mut rng = SmallRng::seed_from_u64(5);
        // frame 0, delay 0: percent 6 -> target 0
        assert_eq!(advance_cell(0, 0, 0, 16, &mut rng), 0);
        // already at 2 while target is 1
        assert_eq!(advance_cell(2, 5, 0, 16, &mut rng), 2);
    }

    #[test]
    fn test_roll_extremes() {
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..100 {
            assert!(!roll(&mut rng, 0));
            assert!(roll(&mut rng, 100));
        }
    }

    #[test]
    fn test_is_behind() {
        assert!(!is_behind(0, 0, 0, 16));
        assert!(is_behind(0, 15, 0, 16));
        assert!(!is_behind(3, 15, 0, 16));
        assert!(is_behind(2, 16, 0, 16));
        assert!(!is_behind(0, 2, 4, 16));
    }
}
