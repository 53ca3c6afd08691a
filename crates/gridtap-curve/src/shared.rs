//! Band-based curve shared by the target-set modes (Rush, Force, Recall).
//!
//! Levels are split into stages, each with a fixed grid size. Within a
//! stage, difficulty ramps with the fractional progress through the stage's
//! level range, so the jump to a bigger grid lands at a gentle density and
//! tightens from there.

use gridtap_core::constants::MAX_LEVEL;

/// Base density of targets at the start of a stage (fraction of the board).
const DENSITY_BASE: f64 = 0.35;

/// Extra density gained across a full stage.
const DENSITY_RANGE: f64 = 0.60;

/// Grid side length for a level.
pub fn grid_size_for_level(level: u32) -> usize {
    match level.max(1) {
        0..=9 => 2,
        10..=33 => 3,
        34..=78 => 4,
        79..=150 => 5,
        _ => 6,
    }
}

/// Inclusive level range of the stage containing `level`.
pub fn band_for_level(level: u32) -> (u32, u32) {
    match level.max(1) {
        0..=9 => (1, 9),
        10..=33 => (10, 33),
        34..=78 => (34, 78),
        79..=150 => (79, 150),
        _ => (151, MAX_LEVEL),
    }
}

/// Fractional progress through the current stage, in `[0, 1]`.
pub fn stage_progress_for_level(level: u32) -> f64 {
    let level = level.max(1);
    let (start, end) = band_for_level(level);
    if level >= end {
        return 1.0;
    }
    f64::from(level - start) / f64::from(end - start)
}

/// Number of target cards for a level on a board of `area` cells.
pub fn matching_cards_for_level(level: u32, area: usize) -> usize {
    let progress = stage_progress_for_level(level);
    let raw = (area as f64 * (DENSITY_BASE + DENSITY_RANGE * progress)).round() as usize;
    raw.clamp(1, area)
}
