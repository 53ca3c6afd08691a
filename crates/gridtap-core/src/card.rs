//! Per-cell card state.

use serde::{Deserialize, Serialize};

/// One grid cell, as the host renders it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Must be interacted with to progress the current round.
    pub is_target: bool,
    pub is_face_up: bool,
    /// Matched/cleared. A resolved card never re-activates within a round.
    pub is_resolved: bool,
    /// Countdown remaining in seconds; zero when inert.
    pub remaining_time: f64,
    /// Taps still required (multi-tap modes only).
    pub remaining_taps: u32,
}

impl Card {
    /// Back to the inert state the round started with.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Invariant: a nonzero tap counter only appears on target cards.
    pub fn is_consistent(&self) -> bool {
        self.remaining_taps == 0 || self.is_target
    }
}
