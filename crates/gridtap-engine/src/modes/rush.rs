//! Rush mode: tiles light up with a one-second fuse and must be tapped
//! before they burn out, against a per-level clock.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use gridtap_core::constants::{
    LEVEL_ADVANCE_PAUSE_SECS, MAX_LEVEL, RUSH_TILE_LIFETIME_SECS, STARTING_LIVES,
};
use gridtap_core::enums::{EnginePhase, ModeId};
use gridtap_core::grid::Grid;
use gridtap_core::state::ModeView;
use gridtap_core::types::TickClock;
use gridtap_curve::rush as curve;
use gridtap_progress::ProgressStore;

use crate::deferred::DeferredQueue;
use crate::modes::{lose_life, pick_spawn_index, GameMode};
use crate::scheduler::{TickEvent, TickScheduler};

#[derive(Debug, Clone)]
pub struct RushConfig {
    pub seed: u64,
    /// Fuse on each lit tile.
    pub tile_lifetime_secs: f64,
    pub advance_pause_secs: f64,
    pub max_level: u32,
}

impl Default for RushConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tile_lifetime_secs: RUSH_TILE_LIFETIME_SECS,
            advance_pause_secs: LEVEL_ADVANCE_PAUSE_SECS,
            max_level: MAX_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum RushAction {
    NextLevel,
}

pub struct RushMode<P: ProgressStore> {
    config: RushConfig,
    progress: P,
    rng: ChaCha8Rng,
    clock: TickClock,
    deferred: DeferredQueue<RushAction>,
    scheduler: TickScheduler,
    grid: Grid,
    targets_total: usize,
    targets_remaining: usize,
    level_time_total: f64,
    phase: EnginePhase,
    can_tap: bool,
    lives: u32,
    level: u32,
    level_cleared: bool,
    game_over: bool,
}

impl<P: ProgressStore> RushMode<P> {
    pub fn new(config: RushConfig, progress: P) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            progress,
            rng,
            clock: TickClock::default(),
            deferred: DeferredQueue::new(),
            scheduler: TickScheduler::new(),
            grid: Grid::build(2),
            targets_total: 0,
            targets_remaining: 0,
            level_time_total: 0.0,
            phase: EnginePhase::Idle,
            can_tap: false,
            lives: 0,
            level: 1,
            level_cleared: false,
            game_over: false,
        }
    }

    fn setup_level(&mut self) {
        self.deferred.cancel_all();
        self.scheduler.stop();
        self.lives = STARTING_LIVES;
        self.level_cleared = false;
        self.game_over = false;
        self.grid = Grid::build(curve::grid_size_for_level(self.level));
        self.targets_total = curve::matching_cards_for_level(self.level, self.grid.size());
        self.targets_remaining = self.targets_total;
        let max_active = curve::max_active_for_level(self.level);
        self.level_time_total =
            curve::level_time_for_level(self.level, self.targets_total, max_active);
        self.scheduler.start(Some(self.level_time_total));
        self.phase = EnginePhase::Active;
        self.can_tap = true;
        log::debug!(
            "rush: level {} targets {} budget {:.1}s",
            self.level,
            self.targets_total,
            self.level_time_total
        );
    }

    fn finish_level(&mut self) {
        self.can_tap = false;
        self.scheduler.stop();
        self.phase = EnginePhase::LevelCleared;
        self.level_cleared = true;
        if self.level < self.config.max_level {
            self.progress.increment_level(ModeId::Rush);
        }
        self.deferred
            .schedule(self.config.advance_pause_secs, RushAction::NextLevel);
        log::debug!("rush: level {} cleared", self.level);
    }

    fn enter_game_over(&mut self) {
        self.deferred.cancel_all();
        self.scheduler.stop();
        self.game_over = true;
        self.can_tap = false;
        self.phase = EnginePhase::GameOver;
        log::debug!("rush: game over at level {}", self.level);
    }

    /// Light tiles up to the concurrency cap, never more than remain to be
    /// cleared.
    fn spawn_step(&mut self) {
        let cap = curve::max_active_for_level(self.level).min(self.targets_remaining);
        while self.scheduler.active_count() < cap {
            let scheduler = &self.scheduler;
            let Some(index) =
                pick_spawn_index(&mut self.rng, &self.grid, |i| scheduler.is_tile_active(i))
            else {
                break;
            };
            self.scheduler
                .activate_tile(index, self.config.tile_lifetime_secs);
            if let Some(card) = self.grid.card_mut(index) {
                card.is_target = true;
                card.is_face_up = true;
                card.remaining_time = self.config.tile_lifetime_secs;
            }
        }
    }

    /// Copy scheduler countdowns onto the cards the host sees.
    fn mirror_timers(&mut self) {
        let grid = &mut self.grid;
        for (index, remaining) in self.scheduler.active_tiles() {
            if let Some(card) = grid.card_mut(index) {
                card.remaining_time = remaining;
            }
        }
    }
}

impl<P: ProgressStore> GameMode for RushMode<P> {
    fn start_game(&mut self) {
        self.level = self.progress.current_level(ModeId::Rush);
        self.clock = TickClock::default();
        self.setup_level();
    }

    fn reset_game(&mut self) {
        self.level = self.progress.current_level(ModeId::Rush);
        self.setup_level();
    }

    fn tap_card(&mut self, index: usize) {
        if !self.can_tap {
            log::trace!("rush: tap {index} ignored, taps disabled");
            return;
        }
        let Some(card) = self.grid.card(index) else {
            log::trace!("rush: tap {index} out of range");
            return;
        };
        if card.is_resolved {
            log::trace!("rush: tap {index} ignored, already resolved");
            return;
        }

        if self.scheduler.is_tile_active(index) {
            self.scheduler.deactivate_tile(index);
            if let Some(card) = self.grid.card_mut(index) {
                card.is_resolved = true;
                card.remaining_time = 0.0;
            }
            self.targets_remaining -= 1;
            if self.targets_remaining == 0 {
                self.finish_level();
            }
        } else if lose_life(&mut self.lives) {
            self.enter_game_over();
        } else {
            log::trace!("rush: tap {index} hit an unlit tile");
        }
    }

    fn tick(&mut self) {
        self.clock.advance();
        let actions = self.deferred.tick();
        for action in actions {
            match action {
                RushAction::NextLevel => {
                    self.level = self.progress.current_level(ModeId::Rush);
                    self.setup_level();
                }
            }
        }
        if !self.can_tap {
            return;
        }

        for event in self.scheduler.tick() {
            match event {
                TickEvent::TileExpired(index) => {
                    if let Some(card) = self.grid.card_mut(index) {
                        card.is_target = false;
                        card.is_face_up = false;
                        card.remaining_time = 0.0;
                    }
                    log::trace!("rush: tile {index} burned out");
                    if lose_life(&mut self.lives) {
                        self.enter_game_over();
                        return;
                    }
                }
                TickEvent::LevelTimeout => {
                    log::debug!("rush: level clock ran out");
                    self.enter_game_over();
                    return;
                }
            }
        }
        self.spawn_step();
        self.mirror_timers();
    }

    fn view(&self) -> ModeView {
        ModeView {
            mode: ModeId::Rush,
            phase: self.phase,
            clock: self.clock,
            cards: self.grid.cards().to_vec(),
            grid_size: self.grid.size(),
            can_tap: self.can_tap,
            lives: self.lives,
            score: 0,
            level: self.level,
            round: 1,
            total_rounds: 1,
            preview_secs: 0.0,
            targets_remaining: self.targets_remaining,
            level_time_total: self.level_time_total,
            level_time_remaining: self.scheduler.level_remaining().unwrap_or(0.0),
            is_level_cleared: self.level_cleared,
            is_game_over: self.game_over,
        }
    }
}
