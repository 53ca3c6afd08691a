//! Fundamental timing types.

use serde::{Deserialize, Serialize};

/// Engine time tracking at the fixed tick rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickClock {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed engine time in seconds.
    pub elapsed_secs: f64,
}

impl TickClock {
    /// Seconds per tick at the fixed tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}
