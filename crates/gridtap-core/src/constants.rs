//! Engine constants and default tuning parameters.
//!
//! Per-mode tunables live in each engine's config struct; the values here
//! are the defaults those configs start from.

/// Engine tick rate (Hz).
pub const TICK_RATE: u32 = 20;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Lives at the start of every level (and of an endless run).
pub const STARTING_LIVES: u32 = 3;

/// Highest persisted level for the level-based modes.
pub const MAX_LEVEL: u32 = 250;

// --- Sequence mode ---

/// Seconds each flashed card stays face-up during the sequence preview.
pub const SEQUENCE_PREVIEW_STEP_SECS: f64 = 0.5;

/// Seconds between flip-backs after a cleared sequence round.
pub const SEQUENCE_FLIP_BACK_STEP_SECS: f64 = 0.3;

// --- Rush mode ---

/// Countdown on each activated rush tile.
pub const RUSH_TILE_LIFETIME_SECS: f64 = 1.0;

// --- Force mode ---

/// Tile lifetime granted per required tap.
pub const FORCE_SECS_PER_TAP: f64 = 1.0;

// --- Recall mode ---

/// Sequence repetitions per recall level.
pub const RECALL_REPETITIONS: u32 = 3;

/// Preview step at the start of a recall level.
pub const RECALL_PREVIEW_START_SECS: f64 = 0.6;

/// Preview shrink per completed repetition.
pub const RECALL_PREVIEW_SHRINK_SECS: f64 = 0.1;

/// Previews never shrink below this.
pub const PREVIEW_FLOOR_SECS: f64 = 0.2;

// --- Endless mode ---

/// Local level cap for endless runs.
pub const ENDLESS_MAX_LEVEL: u32 = 30;

/// Flash duration for endless targets.
pub const ENDLESS_PREVIEW_SECS: f64 = 0.5;

/// Delay before the endless flash begins.
pub const ENDLESS_PREVIEW_DELAY_SECS: f64 = 0.1;

/// How long a wrongly tapped card stays shown before re-hiding.
pub const ENDLESS_WRONG_TAP_REHIDE_SECS: f64 = 0.4;

/// Pause between a cleared endless round and the next one.
pub const ENDLESS_ROUND_PAUSE_SECS: f64 = 1.5;

/// Score multiplier applied once per decay interval.
pub const ENDLESS_DECAY_FACTOR: f64 = 0.95;

/// Seconds between score decay steps.
pub const ENDLESS_DECAY_INTERVAL_SECS: f64 = 1.0;

// --- Shared ---

/// Pause before a level advance takes effect.
pub const LEVEL_ADVANCE_PAUSE_SECS: f64 = 1.0;
