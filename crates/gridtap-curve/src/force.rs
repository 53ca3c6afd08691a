//! Force mode curve: required tile counts, taps per tile, and concurrency.

/// Fraction of the board that must be worn down, ramping 40% → 80%.
pub fn required_tiles_for_level(level: u32, area: usize) -> usize {
    let fraction = (0.4 + 0.003 * f64::from(level.max(1))).min(0.8);
    ((area as f64 * fraction) as usize).max(1)
}

/// Taps each tile takes before it resolves.
pub fn taps_for_level(level: u32) -> u32 {
    (2 + level.max(1) / 15).min(8)
}

/// Maximum tiles live at once.
pub fn max_active_for_level(level: u32) -> usize {
    match level.max(1) {
        0..=20 => 1,
        21..=60 => 2,
        61..=120 => 3,
        _ => 4,
    }
}
