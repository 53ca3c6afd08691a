//! Sequence mode curve: grid growth, sequence length with a sinusoidal
//! wobble, and rounds per level.

/// Grid side length. Sequence grows its board faster than the target-set
/// modes since each round only flashes a handful of cards.
pub fn grid_size_for_level(level: u32) -> usize {
    let level = level.max(1);
    if level < 10 {
        2
    } else if level < 25 {
        3
    } else if level < 75 {
        4
    } else if level < 150 {
        5
    } else {
        6
    }
}

/// Sequence length for a level. A slow linear ramp plus a sine wobble keeps
/// consecutive levels from feeling identical, damped and offset by the grid
/// so the length stays tappable on small boards.
pub fn length_for_level(level: u32) -> usize {
    let level = level.max(1);
    let grid = grid_size_for_level(level);
    let l = f64::from(level);
    let raw = (3.0 + (l - 1.0) * 0.1 + (l * 0.25).sin() * 2.5) * 0.6 + (grid as f64 - 1.0);
    let cap = (grid * 2).min(10) as i64;
    (raw.round() as i64).clamp(2, cap) as usize
}

/// Rounds a level takes to clear.
pub fn rounds_for_grid(grid: usize) -> u32 {
    grid.min(4) as u32
}
