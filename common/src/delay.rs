//! Per-cell start delay assignment.
//!
//! Each active cell waits a random number of frames before it starts to
//! brighten, so the glyph fills in with a staggered flicker rather than in
//! lockstep. Delays are drawn once per animation start and stay fixed until
//! the next start.

use rand::Rng;

use crate::compositor::{CellGrid, Mask};

/// Draw an independent delay in `0..=max_delay` for every active cell.
/// Inactive cells get 0.
pub fn assign_delays<R, const W: usize, const H: usize>(
    active: &Mask<W, H>,
    delays: &mut CellGrid<u8, W, H>,
    max_delay: u8,
    rng: &mut R,
) where
    R: Rng + ?Sized,
{
    for (active_row, delay_row) in active.iter().zip(delays.iter_mut()) {
        for (&is_active, delay) in active_row.iter().zip(delay_row.iter_mut()) {
            *delay = if is_active { rng.random_range(0..=max_delay) } else { 0 };
        }
    }
}
