//! Player progress: per-mode persisted levels and the endless high score.
//!
//! The engines only see the [`ProgressStore`] trait; hosts decide where the
//! data actually lives. [`MemoryProgress`] is the in-memory implementation
//! and serializes to JSON so a host can stash it wherever it likes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gridtap_core::constants::MAX_LEVEL;
use gridtap_core::enums::ModeId;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("failed to encode progress: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode progress: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Where the engines read and write player progress.
///
/// Levels are 1-based and capped at [`MAX_LEVEL`]; implementations must
/// return at least 1 for any mode, even one never played.
pub trait ProgressStore {
    /// Current level for a mode (1 if never played).
    fn current_level(&self, mode: ModeId) -> u32;

    /// Advance a mode by one level, saturating at [`MAX_LEVEL`].
    fn increment_level(&mut self, mode: ModeId);

    /// Best endless score recorded so far.
    fn high_score(&self, mode: ModeId) -> u32;

    /// Record a new best score. Implementations keep the maximum.
    fn set_high_score(&mut self, mode: ModeId, score: u32);
}

/// In-memory progress, JSON-serializable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryProgress {
    levels: HashMap<ModeId, u32>,
    high_scores: HashMap<ModeId, u32>,
}

impl MemoryProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a mode's level directly, clamped to `[1, MAX_LEVEL]`.
    pub fn set_level(&mut self, mode: ModeId, level: u32) {
        self.levels.insert(mode, level.clamp(1, MAX_LEVEL));
    }

    pub fn to_json(&self) -> Result<String, ProgressError> {
        serde_json::to_string(self).map_err(ProgressError::Encode)
    }

    pub fn from_json(json: &str) -> Result<Self, ProgressError> {
        serde_json::from_str(json).map_err(ProgressError::Decode)
    }
}

impl ProgressStore for MemoryProgress {
    fn current_level(&self, mode: ModeId) -> u32 {
        self.levels.get(&mode).copied().unwrap_or(1).max(1)
    }

    fn increment_level(&mut self, mode: ModeId) {
        let next = (self.current_level(mode) + 1).min(MAX_LEVEL);
        log::debug!("progress: {mode:?} -> level {next}");
        self.levels.insert(mode, next);
    }

    fn high_score(&self, mode: ModeId) -> u32 {
        self.high_scores.get(&mode).copied().unwrap_or(0)
    }

    fn set_high_score(&mut self, mode: ModeId, score: u32) {
        let entry = self.high_scores.entry(mode).or_insert(0);
        if score > *entry {
            log::debug!("progress: {mode:?} high score {} -> {score}", *entry);
            *entry = score;
        }
    }
}

/// Shared handle to one [`MemoryProgress`], for hosts that run several mode
/// engines against the same save.
#[derive(Debug, Clone, Default)]
pub struct SharedProgress(Rc<RefCell<MemoryProgress>>);

impl SharedProgress {
    pub fn new(progress: MemoryProgress) -> Self {
        Self(Rc::new(RefCell::new(progress)))
    }

    pub fn snapshot(&self) -> MemoryProgress {
        self.0.borrow().clone()
    }
}

impl ProgressStore for SharedProgress {
    fn current_level(&self, mode: ModeId) -> u32 {
        self.0.borrow().current_level(mode)
    }

    fn increment_level(&mut self, mode: ModeId) {
        self.0.borrow_mut().increment_level(mode);
    }

    fn high_score(&self, mode: ModeId) -> u32 {
        self.0.borrow().high_score(mode)
    }

    fn set_high_score(&mut self, mode: ModeId, score: u32) {
        self.0.borrow_mut().set_high_score(mode, score);
    }
}
