//! Mode view — the complete observable state a host renders each tick.

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::enums::{EnginePhase, ModeId};
use crate::types::TickClock;

/// Everything the host needs to draw one mode engine. Fields a mode does not
/// use stay at their zero values (e.g. `score` outside Endless, the level
/// timer outside Rush).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModeView {
    pub mode: ModeId,
    pub phase: EnginePhase,
    pub clock: TickClock,
    pub cards: Vec<Card>,
    pub grid_size: usize,
    pub can_tap: bool,
    pub lives: u32,
    pub score: u32,
    pub level: u32,
    /// 1-based round (or repetition) within the level.
    pub round: u32,
    pub total_rounds: u32,
    /// Current preview step in seconds, for modes that flash targets.
    pub preview_secs: f64,
    pub targets_remaining: usize,
    /// Level time budget; zero when the mode has no level clock.
    pub level_time_total: f64,
    pub level_time_remaining: f64,
    pub is_level_cleared: bool,
    pub is_game_over: bool,
}
