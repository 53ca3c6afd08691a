//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

/// The five challenge modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeId {
    /// Ordered recall of a flashed permutation, several rounds per level.
    #[default]
    Sequence,
    /// Timed whack-a-tile against tile fuses and a level clock.
    Rush,
    /// Endurance tiles that take several taps to wear down.
    Force,
    /// Growing reproducible sequences with a shrinking preview.
    Recall,
    /// Continuous scoring with decay; no terminal level.
    Endless,
}

/// Mode engine lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnginePhase {
    /// Constructed, not yet started.
    #[default]
    Idle,
    /// Targets are being flashed; memory modes only.
    Previewing,
    /// Accepting taps (or running tile timers).
    Active,
    /// Round resolved; delayed flip-backs / advance pause in flight.
    Resolving,
    /// Level cleared; advance pause in flight.
    LevelCleared,
    /// Lives exhausted. Terminal until the next start/reset.
    GameOver,
}

impl EnginePhase {
    /// The one terminal phase. Everything else keeps the engine live.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver)
    }
}
