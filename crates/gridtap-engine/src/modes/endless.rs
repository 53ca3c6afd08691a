//! Endless mode: rounds of flashed targets with a decaying score and no
//! terminal level. Progress is run-local; only the high score persists.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use gridtap_core::constants::{
    DT, ENDLESS_DECAY_FACTOR, ENDLESS_DECAY_INTERVAL_SECS, ENDLESS_MAX_LEVEL,
    ENDLESS_PREVIEW_DELAY_SECS, ENDLESS_PREVIEW_SECS, ENDLESS_ROUND_PAUSE_SECS,
    ENDLESS_WRONG_TAP_REHIDE_SECS, STARTING_LIVES,
};
use gridtap_core::enums::{EnginePhase, ModeId};
use gridtap_core::grid::Grid;
use gridtap_core::state::ModeView;
use gridtap_core::types::TickClock;
use gridtap_curve::endless as curve;
use gridtap_progress::ProgressStore;

use crate::deferred::DeferredQueue;
use crate::modes::{lose_life, GameMode};

#[derive(Debug, Clone)]
pub struct EndlessConfig {
    pub seed: u64,
    /// How long targets stay flashed.
    pub preview_secs: f64,
    /// Delay before the flash begins.
    pub preview_delay_secs: f64,
    /// How long a wrong tap stays shown before re-hiding.
    pub wrong_tap_rehide_secs: f64,
    pub round_pause_secs: f64,
    /// Multiplier applied to the score once per decay interval.
    pub decay_factor: f64,
    pub decay_interval_secs: f64,
    pub max_level: u32,
}

impl Default for EndlessConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            preview_secs: ENDLESS_PREVIEW_SECS,
            preview_delay_secs: ENDLESS_PREVIEW_DELAY_SECS,
            wrong_tap_rehide_secs: ENDLESS_WRONG_TAP_REHIDE_SECS,
            round_pause_secs: ENDLESS_ROUND_PAUSE_SECS,
            decay_factor: ENDLESS_DECAY_FACTOR,
            decay_interval_secs: ENDLESS_DECAY_INTERVAL_SECS,
            max_level: ENDLESS_MAX_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum EndlessAction {
    ShowTargets,
    HideAll,
    RehideWrong(usize),
    NextRound,
}

pub struct EndlessMode<P: ProgressStore> {
    config: EndlessConfig,
    progress: P,
    rng: ChaCha8Rng,
    clock: TickClock,
    deferred: DeferredQueue<EndlessAction>,
    grid: Grid,
    targets: BTreeSet<usize>,
    last_round_targets: BTreeSet<usize>,
    matching_count: usize,
    score: u32,
    decay_acc: f64,
    phase: EnginePhase,
    can_tap: bool,
    lives: u32,
    level: u32,
    round_cleared: bool,
    game_over: bool,
}

impl<P: ProgressStore> EndlessMode<P> {
    pub fn new(config: EndlessConfig, progress: P) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            progress,
            rng,
            clock: TickClock::default(),
            deferred: DeferredQueue::new(),
            grid: Grid::build(2),
            targets: BTreeSet::new(),
            last_round_targets: BTreeSet::new(),
            matching_count: 0,
            score: 0,
            decay_acc: 0.0,
            phase: EnginePhase::Idle,
            can_tap: false,
            lives: 0,
            level: 1,
            round_cleared: false,
            game_over: false,
        }
    }

    pub fn targets(&self) -> &BTreeSet<usize> {
        &self.targets
    }

    fn start_run(&mut self) {
        self.deferred.cancel_all();
        self.lives = STARTING_LIVES;
        self.level = 1;
        self.score = 0;
        self.decay_acc = 0.0;
        self.last_round_targets.clear();
        self.game_over = false;
        self.start_round();
    }

    fn start_round(&mut self) {
        self.deferred.cancel_all();
        self.round_cleared = false;
        self.grid = Grid::build(curve::grid_size_for_level(self.level));
        self.matching_count = curve::matching_cards_for_level(self.level);
        self.targets =
            self.grid
                .choose_targets(&mut self.rng, self.matching_count, &self.last_round_targets);
        self.grid.apply_targets(&self.targets);
        self.last_round_targets = self.targets.clone();

        self.phase = EnginePhase::Previewing;
        // Taps count even during the flash; quick hands are rewarded.
        self.can_tap = true;
        self.deferred
            .schedule(self.config.preview_delay_secs, EndlessAction::ShowTargets);
        self.deferred.schedule(
            self.config.preview_delay_secs + self.config.preview_secs,
            EndlessAction::HideAll,
        );
        log::debug!(
            "endless: level {} flashing {} targets",
            self.level,
            self.matching_count
        );
    }

    fn finish_round(&mut self) {
        // A clear mid-flash leaves ShowTargets/HideAll pending; drop them.
        self.deferred.cancel_all();
        self.can_tap = false;
        self.round_cleared = true;
        self.phase = EnginePhase::Resolving;
        let per_round = (10.0 / self.config.preview_secs).floor() as u32;
        self.score += self.level * self.matching_count as u32 * per_round;
        self.deferred
            .schedule(self.config.round_pause_secs, EndlessAction::NextRound);
        log::debug!("endless: round cleared, score {}", self.score);
    }

    fn enter_game_over(&mut self) {
        self.deferred.cancel_all();
        self.game_over = true;
        self.can_tap = false;
        self.phase = EnginePhase::GameOver;
        self.progress.set_high_score(ModeId::Endless, self.score);
        log::debug!("endless: game over, final score {}", self.score);
    }

    fn apply(&mut self, action: EndlessAction) {
        match action {
            EndlessAction::ShowTargets => {
                let grid = &mut self.grid;
                for &index in &self.targets {
                    if let Some(card) = grid.card_mut(index) {
                        if !card.is_resolved {
                            card.is_face_up = true;
                        }
                    }
                }
            }
            EndlessAction::HideAll => {
                for index in 0..self.grid.area() {
                    if let Some(card) = self.grid.card_mut(index) {
                        if !card.is_resolved {
                            card.is_face_up = false;
                        }
                    }
                }
                self.phase = EnginePhase::Active;
                self.can_tap = !self.game_over && !self.round_cleared;
            }
            EndlessAction::RehideWrong(index) => {
                if let Some(card) = self.grid.card_mut(index) {
                    card.is_face_up = false;
                }
                self.can_tap = !self.game_over && !self.round_cleared;
            }
            EndlessAction::NextRound => {
                self.level = (self.level + 1).min(self.config.max_level);
                self.start_round();
            }
        }
    }
}

impl<P: ProgressStore> GameMode for EndlessMode<P> {
    fn start_game(&mut self) {
        self.clock = TickClock::default();
        self.start_run();
    }

    fn reset_game(&mut self) {
        self.start_run();
    }

    fn tap_card(&mut self, index: usize) {
        if !self.can_tap {
            log::trace!("endless: tap {index} ignored, taps disabled");
            return;
        }
        let Some(card) = self.grid.card(index) else {
            log::trace!("endless: tap {index} out of range");
            return;
        };
        if card.is_resolved {
            log::trace!("endless: tap {index} ignored, already resolved");
            return;
        }

        if card.is_target {
            if let Some(card) = self.grid.card_mut(index) {
                card.is_face_up = true;
                card.is_resolved = true;
            }
            if self.grid.unresolved_targets() == 0 {
                self.finish_round();
            }
        } else {
            if let Some(card) = self.grid.card_mut(index) {
                card.is_face_up = true;
            }
            // Taps pause until the wrong card flips back over.
            self.can_tap = false;
            if lose_life(&mut self.lives) {
                self.enter_game_over();
            } else {
                self.deferred.schedule(
                    self.config.wrong_tap_rehide_secs,
                    EndlessAction::RehideWrong(index),
                );
            }
        }
    }

    fn tick(&mut self) {
        self.clock.advance();
        let actions = self.deferred.tick();
        for action in actions {
            self.apply(action);
        }

        // Decay runs from game start until game over, straight through
        // round pauses and previews.
        if self.lives > 0 && !self.game_over {
            self.decay_acc += DT;
            while self.decay_acc >= self.config.decay_interval_secs {
                self.decay_acc -= self.config.decay_interval_secs;
                self.score = (f64::from(self.score) * self.config.decay_factor).floor() as u32;
            }
        }
    }

    fn view(&self) -> ModeView {
        ModeView {
            mode: ModeId::Endless,
            phase: self.phase,
            clock: self.clock,
            cards: self.grid.cards().to_vec(),
            grid_size: self.grid.size(),
            can_tap: self.can_tap,
            lives: self.lives,
            score: self.score,
            level: self.level,
            round: 1,
            total_rounds: 1,
            preview_secs: self.config.preview_secs,
            targets_remaining: self.grid.unresolved_targets(),
            level_time_total: 0.0,
            level_time_remaining: 0.0,
            is_level_cleared: self.round_cleared,
            is_game_over: self.game_over,
        }
    }
}
