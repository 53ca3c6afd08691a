//! Sequence mode: a permutation of cards is flashed one at a time, then
//! tapped back in order. Several rounds clear a level.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use gridtap_core::constants::{
    LEVEL_ADVANCE_PAUSE_SECS, MAX_LEVEL, SEQUENCE_FLIP_BACK_STEP_SECS, SEQUENCE_PREVIEW_STEP_SECS,
    STARTING_LIVES,
};
use gridtap_core::enums::{EnginePhase, ModeId};
use gridtap_core::grid::Grid;
use gridtap_core::state::ModeView;
use gridtap_core::types::TickClock;
use gridtap_curve::sequence as curve;
use gridtap_progress::ProgressStore;

use crate::deferred::DeferredQueue;
use crate::modes::{lose_life, GameMode};

#[derive(Debug, Clone)]
pub struct SequenceConfig {
    pub seed: u64,
    /// Seconds each flashed card stays face-up.
    pub preview_step_secs: f64,
    /// Seconds between flip-backs after a cleared round.
    pub flip_back_step_secs: f64,
    pub advance_pause_secs: f64,
    pub max_level: u32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            preview_step_secs: SEQUENCE_PREVIEW_STEP_SECS,
            flip_back_step_secs: SEQUENCE_FLIP_BACK_STEP_SECS,
            advance_pause_secs: LEVEL_ADVANCE_PAUSE_SECS,
            max_level: MAX_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SequenceAction {
    FlipUp(usize),
    FlipDown(usize),
    EnableTaps,
    NextRound,
    NextLevel,
}

pub struct SequenceMode<P: ProgressStore> {
    config: SequenceConfig,
    progress: P,
    rng: ChaCha8Rng,
    clock: TickClock,
    deferred: DeferredQueue<SequenceAction>,
    grid: Grid,
    sequence: Vec<usize>,
    cursor: usize,
    phase: EnginePhase,
    can_tap: bool,
    lives: u32,
    level: u32,
    round: u32,
    total_rounds: u32,
    level_cleared: bool,
    game_over: bool,
}

impl<P: ProgressStore> SequenceMode<P> {
    pub fn new(config: SequenceConfig, progress: P) -> Self {
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
            phase: EnginePhase::Idle,
            can_tap: false,
            lives: 0,
            level: 1,
            round: 1,
            total_rounds: 1,
            level_cleared: false,
            game_over: false,
        }
    }

    /// The current round's ordered target indices.
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    fn setup_level(&mut self) {
        self.deferred.cancel_all();
        self.lives = STARTING_LIVES;
        self.round = 1;
        self.level_cleared = false;
        self.game_over = false;
        self.grid = Grid::build(curve::grid_size_for_level(self.level));
        self.total_rounds = curve::rounds_for_grid(self.grid.size());
        self.start_round();
    }

    fn start_round(&mut self) {
        self.cursor = 0;
        self.grid.reset_round();
        let len = curve::length_for_level(self.level);
        self.sequence = self.grid.choose_sequence(&mut self.rng, len);
        let targets: BTreeSet<usize> = self.sequence.iter().copied().collect();
        self.grid.apply_targets(&targets);

        self.phase = EnginePhase::Previewing;
        self.can_tap = false;
        let step = self.config.preview_step_secs;
        for (slot, &index) in self.sequence.iter().enumerate() {
            let at = slot as f64 * step;
            self.deferred.schedule(at, SequenceAction::FlipUp(index));
            self.deferred
                .schedule(at + step, SequenceAction::FlipDown(index));
        }
        self.deferred
            .schedule(self.sequence.len() as f64 * step, SequenceAction::EnableTaps);
        log::debug!(
            "sequence: level {} round {}/{} length {}",
            self.level,
            self.round,
            self.total_rounds,
            self.sequence.len()
        );
    }

    fn finish_round(&mut self) {
        self.can_tap = false;
        self.phase = EnginePhase::Resolving;
        let step = self.config.flip_back_step_secs;
        let sequence = self.sequence.clone();
        for (slot, &index) in sequence.iter().enumerate() {
            self.deferred
                .schedule((slot + 1) as f64 * step, SequenceAction::FlipDown(index));
        }
        let flip_backs_done = sequence.len() as f64 * step;

        let level_done = self.round == self.total_rounds;
        self.round += 1;
        if level_done {
            self.level_cleared = true;
            self.phase = EnginePhase::LevelCleared;
            if self.level < self.config.max_level {
                self.progress.increment_level(ModeId::Sequence);
            }
            self.deferred.schedule(
                flip_backs_done + self.config.advance_pause_secs,
                SequenceAction::NextLevel,
            );
        } else {
            // One extra flip step of quiet between the last flip-back and
            // the next round's preview.
            self.deferred
                .schedule(flip_backs_done + step, SequenceAction::NextRound);
        }
    }

    fn enter_game_over(&mut self) {
        self.deferred.cancel_all();
        self.game_over = true;
        self.can_tap = false;
        self.phase = EnginePhase::GameOver;
        log::debug!("sequence: game over at level {}", self.level);
    }

    fn apply(&mut self, action: SequenceAction) {
        match action {
            SequenceAction::FlipUp(index) => {
                if let Some(card) = self.grid.card_mut(index) {
                    card.is_face_up = true;
                }
            }
            SequenceAction::FlipDown(index) => {
                if let Some(card) = self.grid.card_mut(index) {
                    card.is_face_up = false;
                }
            }
            SequenceAction::EnableTaps => {
                self.phase = EnginePhase::Active;
                self.can_tap = true;
            }
            SequenceAction::NextRound => self.start_round(),
            SequenceAction::NextLevel => {
                self.level = self.progress.current_level(ModeId::Sequence);
                self.setup_level();
            }
        }
    }
}

impl<P: ProgressStore> GameMode for SequenceMode<P> {
    fn start_game(&mut self) {
        self.level = self.progress.current_level(ModeId::Sequence);
        self.clock = TickClock::default();
        self.setup_level();
    }

    fn reset_game(&mut self) {
        self.level = self.progress.current_level(ModeId::Sequence);
        self.setup_level();
    }

    fn tap_card(&mut self, index: usize) {
        if !self.can_tap {
            log::trace!("sequence: tap {index} ignored, taps disabled");
            return;
        }
        let Some(card) = self.grid.card(index) else {
            log::trace!("sequence: tap {index} out of range");
            return;
        };
        if card.is_resolved {
            log::trace!("sequence: tap {index} ignored, already resolved");
            return;
        }

        let expected = self.sequence[self.cursor];
        if index == expected {
            if let Some(card) = self.grid.card_mut(index) {
                card.is_resolved = true;
                card.is_face_up = true;
            }
            self.cursor += 1;
            if self.cursor == self.sequence.len() {
                self.finish_round();
            }
        } else if lose_life(&mut self.lives) {
            self.enter_game_over();
        } else {
            log::trace!("sequence: wrong tap {index}, expected {expected}");
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
        ModeView {
            mode: ModeId::Sequence,
            phase: self.phase,
            clock: self.clock,
            cards: self.grid.cards().to_vec(),
            grid_size: self.grid.size(),
            can_tap: self.can_tap,
            lives: self.lives,
            score: 0,
            level: self.level,
            round: self.round,
            total_rounds: self.total_rounds,
            preview_secs: self.config.preview_step_secs,
            targets_remaining: self.sequence.len().saturating_sub(self.cursor),
            level_time_total: 0.0,
            level_time_remaining: 0.0,
            is_level_cleared: self.level_cleared,
            is_game_over: self.game_over,
        }
    }
}
