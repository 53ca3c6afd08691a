//! The five mode engines behind one host-facing trait.

use gridtap_core::grid::Grid;
use gridtap_core::state::ModeView;
use rand::Rng;

mod endless;
mod force;
mod recall;
mod rush;
mod sequence;

pub use endless::{EndlessConfig, EndlessMode};
pub use force::{ForceConfig, ForceMode};
pub use recall::{RecallConfig, RecallMode};
pub use rush::{RushConfig, RushMode};
pub use sequence::{SequenceConfig, SequenceMode};

/// One headless mode engine, driven by a host at the fixed tick rate.
///
/// Taps outside the rules (wrong phase, out of range, already resolved)
/// are silent no-ops; the engines log them at trace level.
pub trait GameMode {
    /// Begin a run from stored progress (or a fresh run for Endless).
    fn start_game(&mut self);

    /// Tear down and restart the current level. Cancels every pending
    /// deferred action before touching state.
    fn reset_game(&mut self);

    /// Forward a player tap on the card at `index`.
    fn tap_card(&mut self, index: usize);

    /// Advance engine time by one tick.
    fn tick(&mut self);

    /// Current observable state.
    fn view(&self) -> ModeView;
}

/// Pick a uniformly random spawnable cell: not currently active, not yet
/// resolved. Returns `None` when every cell is taken.
pub(crate) fn pick_spawn_index(
    rng: &mut impl Rng,
    grid: &Grid,
    is_active: impl Fn(usize) -> bool,
) -> Option<usize> {
    let eligible: Vec<usize> = (0..grid.area())
        .filter(|&i| {
            !is_active(i)
                && grid
                    .card(i)
                    .map(|card| !card.is_resolved)
                    .unwrap_or(false)
        })
        .collect();
    if eligible.is_empty() {
        return None;
    }
    Some(eligible[rng.gen_range(0..eligible.len())])
}

/// Deduct one life, saturating at zero. Returns true when the run is over.
pub(crate) fn lose_life(lives: &mut u32) -> bool {
    *lives = lives.saturating_sub(1);
    *lives == 0
}
