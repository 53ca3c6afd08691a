//! Rush mode curve: how many tiles to clear, how many burn at once, and the
//! level time budget.

use crate::shared;

/// Grid side length, from the shared stage bands.
pub fn grid_size_for_level(level: u32) -> usize {
    shared::grid_size_for_level(level)
}

/// Total tiles to clear in a level. Scales with the grid side plus a slow
/// level ramp, capped at two tiles per row.
pub fn matching_cards_for_level(level: u32, grid: usize) -> usize {
    (grid + level.max(1) as usize / 20).min(grid * 2)
}

/// Maximum tiles burning simultaneously.
pub fn max_active_for_level(level: u32) -> usize {
    match level.max(1) {
        0..=20 => 1,
        21..=60 => 2,
        61..=120 => 3,
        _ => 4,
    }
}

/// Level time budget in seconds: a per-tile allowance, a concurrency bonus,
/// and a shrinking slack term with a floor.
pub fn level_time_for_level(level: u32, matches: usize, max_active: usize) -> f64 {
    let slack = (5.0 - 0.02 * f64::from(level.max(1))).max(2.0);
    matches as f64 * 1.8 + max_active as f64 * 1.2 + slack
}
