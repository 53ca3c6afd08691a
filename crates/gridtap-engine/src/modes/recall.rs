//! Recall mode: one sequence per level, replayed over several repetitions
//! with the preview shrinking each time. Long sequences are sampled in
//! chunks, so an index may repeat across chunk boundaries.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use gridtap_core::constants::{
    LEVEL_ADVANCE_PAUSE_SECS, MAX_LEVEL, PREVIEW_FLOOR_SECS, RECALL_PREVIEW_SHRINK_SECS,
    RECALL_PREVIEW_START_SECS, RECALL_REPETITIONS, STARTING_LIVES,
};
use gridtap_core::enums::{EnginePhase, ModeId};
use gridtap_core::grid::Grid;
use gridtap_core::state::ModeView;
use gridtap_core::types::TickClock;
use gridtap_curve::recall as curve;
use gridtap_progress::ProgressStore;

use crate::deferred::DeferredQueue;
use crate::modes::{lose_life, GameMode};

#[derive(Debug, Clone)]
pub struct RecallConfig {
    pub seed: u64,
    /// Preview step on the first repetition of a level.
    pub preview_start_secs: f64,
    /// Preview shrink per completed repetition.
    pub preview_shrink_secs: f64,
    pub preview_floor_secs: f64,
    pub advance_pause_secs: f64,
    pub repetitions: u32,
    pub max_level: u32,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            preview_start_secs: RECALL_PREVIEW_START_SECS,
            preview_shrink_secs: RECALL_PREVIEW_SHRINK_SECS,
            preview_floor_secs: PREVIEW_FLOOR_SECS,
            advance_pause_secs: LEVEL_ADVANCE_PAUSE_SECS,
            repetitions: RECALL_REPETITIONS,
            max_level: MAX_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum RecallAction {
    FlipUp(usize),
    FlipDown(usize),
    EnableTaps,
    NextRepetition,
    NextLevel,
}

pub struct RecallMode<P: ProgressStore> {
    config: RecallConfig,
    progress: P,
    rng: ChaCha8Rng,
    clock: TickClock,
    deferred: DeferredQueue<RecallAction>,
    grid: Grid,
    sequence: Vec<usize>,
    cursor: usize,
    preview_secs: f64,
    repetitions_left: u32,
    phase: EnginePhase,
    can_tap: bool,
    lives: u32,
    level: u32,
    level_cleared: bool,
    game_over: bool,
}

impl<P: ProgressStore> RecallMode<P> {
    pub fn new(config: RecallConfig, progress: P) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            progress,
            rng,
            clock: TickClock::default(),
            deferred: DeferredQueue::new(),
            grid: Grid::build(2),
            sequence: Vec::new(),
            cursor: 0,
            preview_secs: RECALL_PREVIEW_START_SECS,
            repetitions_left: 0,
            phase: EnginePhase::Idle,
            can_tap: false,
            lives: 0,
            level: 1,
            level_cleared: false,
            game_over: false,
        }
    }

    /// The level's ordered target indices, constant across repetitions.
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    fn setup_level(&mut self) {
        self.deferred.cancel_all();
        self.lives = STARTING_LIVES;
        self.preview_secs = self.config.preview_start_secs;
        self.repetitions_left = self.config.repetitions;
        self.level_cleared = false;
        self.game_over = false;
        self.grid = Grid::build(curve::grid_size_for_level(self.level));

        // One sequence per level, sampled chunk by chunk.
        let total = curve::sequence_cards_for_level(self.level, self.grid.area());
        let chunk = curve::chunk_length_for_grid(self.grid.size());
        self.sequence.clear();
        let mut remaining = total;
        while remaining > 0 {
            let take = chunk.min(remaining);
            self.sequence
                .extend(self.grid.choose_sequence(&mut self.rng, take));
            remaining -= take;
        }
        log::debug!(
            "recall: level {} sequence {} over {} repetitions",
            self.level,
            self.sequence.len(),
            self.repetitions_left
        );
        self.start_repetition();
    }

    fn start_repetition(&mut self) {
        self.cursor = 0;
        self.grid.reset_round();
        let targets: BTreeSet<usize> = self.sequence.iter().copied().collect();
        self.grid.apply_targets(&targets);

        self.phase = EnginePhase::Previewing;
        self.can_tap = false;
        let step = self.preview_secs;
        for (slot, &index) in self.sequence.iter().enumerate() {
            let at = slot as f64 * step;
            self.deferred.schedule(at, RecallAction::FlipUp(index));
            self.deferred
                .schedule(at + step, RecallAction::FlipDown(index));
        }
        self.deferred
            .schedule(self.sequence.len() as f64 * step, RecallAction::EnableTaps);
    }

    fn finish_repetition(&mut self) {
        self.can_tap = false;
        self.phase = EnginePhase::Resolving;
        for &index in &self.sequence {
            if let Some(card) = self.grid.card_mut(index) {
                card.is_resolved = true;
            }
        }
        self.repetitions_left -= 1;
        self.preview_secs =
            (self.preview_secs - self.config.preview_shrink_secs).max(self.config.preview_floor_secs);

        if self.repetitions_left == 0 {
            self.level_cleared = true;
            self.phase = EnginePhase::LevelCleared;
            if self.level < self.config.max_level {
                self.progress.increment_level(ModeId::Recall);
            }
            self.deferred
                .schedule(self.config.advance_pause_secs, RecallAction::NextLevel);
        } else {
            self.deferred
                .schedule(self.config.advance_pause_secs, RecallAction::NextRepetition);
        }
    }

    fn enter_game_over(&mut self) {
        self.deferred.cancel_all();
        self.game_over = true;
        self.can_tap = false;
        self.phase = EnginePhase::GameOver;
        log::debug!("recall: game over at level {}", self.level);
    }

    fn apply(&mut self, action: RecallAction) {
        match action {
            RecallAction::FlipUp(index) => {
                if let Some(card) = self.grid.card_mut(index) {
                    card.is_face_up = true;
                }
            }
            RecallAction::FlipDown(index) => {
                if let Some(card) = self.grid.card_mut(index) {
                    card.is_face_up = false;
                }
            }
            RecallAction::EnableTaps => {
                self.phase = EnginePhase::Active;
                self.can_tap = true;
            }
            RecallAction::NextRepetition => self.start_repetition(),
            RecallAction::NextLevel => {
                self.level = self.progress.current_level(ModeId::Recall);
                self.setup_level();
            }
        }
    }
}

impl<P: ProgressStore> GameMode for RecallMode<P> {
    fn start_game(&mut self) {
        self.level = self.progress.current_level(ModeId::Recall);
        self.clock = TickClock::default();
        self.setup_level();
    }

    fn reset_game(&mut self) {
        self.level = self.progress.current_level(ModeId::Recall);
        self.setup_level();
    }

    fn tap_card(&mut self, index: usize) {
        if !self.can_tap {
            log::trace!("recall: tap {index} ignored, taps disabled");
            return;
        }
        if self.grid.card(index).is_none() {
            log::trace!("recall: tap {index} out of range");
            return;
        }

        let expected = self.sequence[self.cursor];
        if index == expected {
            // Not resolved here: a card repeated across chunks must stay
            // tappable for its later slots.
            if let Some(card) = self.grid.card_mut(index) {
                card.is_face_up = true;
            }
            self.cursor += 1;
            if self.cursor == self.sequence.len() {
                self.finish_repetition();
            }
        } else if lose_life(&mut self.lives) {
            self.enter_game_over();
        } else {
            log::trace!("recall: wrong tap {index}, expected {expected}");
        }
    }

    fn tick(&mut self) {
        self.clock.advance();
        let actions = self.deferred.tick();
        for action in actions {
            self.apply(action);
        }
    }

    fn view(&self) -> ModeView {
        let done = self.config.repetitions - self.repetitions_left;
        ModeView {
            mode: ModeId::Recall,
            phase: self.phase,
            clock: self.clock,
            cards: self.grid.cards().to_vec(),
            grid_size: self.grid.size(),
            can_tap: self.can_tap,
            lives: self.lives,
            score: 0,
            level: self.level,
            round: (done + 1).min(self.config.repetitions),
            total_rounds: self.config.repetitions,
            preview_secs: self.preview_secs,
            targets_remaining: self.sequence.len().saturating_sub(self.cursor),
            level_time_total: 0.0,
            level_time_remaining: 0.0,
            is_level_cleared: self.level_cleared,
            is_game_over: self.game_over,
        }
    }
}
