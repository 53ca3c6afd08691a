//! Endless mode curve. Endless levels are run-local (they reset every run),
//! so the ramp is much steeper than the persisted modes.

/// Grid side length for a run-local level.
pub fn grid_size_for_level(level: u32) -> usize {
    let level = level.max(1);
    if level < 2 {
        2
    } else if level < 8 {
        3
    } else if level < 14 {
        4
    } else if level < 24 {
        5
    } else {
        6
    }
}

/// Targets flashed per round: one more every other level, capped.
pub fn matching_cards_for_level(level: u32) -> usize {
    ((1 + (level.max(1) - 1) / 2) as usize).min(15)
}
