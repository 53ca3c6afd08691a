//! Recall mode curve: sequence size and the chunking that keeps long
//! sequences learnable.

use crate::shared;

/// Grid side length, from the shared stage bands.
pub fn grid_size_for_level(level: u32) -> usize {
    shared::grid_size_for_level(level)
}

/// Total cards in the recall sequence for a level.
pub fn sequence_cards_for_level(level: u32, area: usize) -> usize {
    shared::matching_cards_for_level(level, area)
}

/// Longest run of distinct cards sampled at once. Sequences longer than a
/// chunk are built from several independent samples, so indices may repeat
/// across chunk boundaries.
pub fn chunk_length_for_grid(grid: usize) -> usize {
    (grid + 3).min(9)
}
