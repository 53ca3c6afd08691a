//! Force mode: tiles light up with a multi-tap endurance counter and a
//! matching fuse. A tile that burns out costs nothing but the progress
//! already hammered into it; wrong taps cost lives.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use gridtap_core::constants::{FORCE_SECS_PER_TAP, LEVEL_ADVANCE_PAUSE_SECS, MAX_LEVEL, STARTING_LIVES};
use gridtap_core::enums::{EnginePhase, ModeId};
use gridtap_core::grid::Grid;
use gridtap_core::state::ModeView;
use gridtap_core::types::TickClock;
use gridtap_curve::force as curve;
use gridtap_curve::shared;
use gridtap_progress::ProgressStore;

use crate::deferred::DeferredQueue;
use crate::modes::{lose_life, pick_spawn_index, GameMode};
use crate::scheduler::{TickEvent, TickScheduler};

#[derive(Debug, Clone)]
pub struct ForceConfig {
    pub seed: u64,
    /// Fuse granted per required tap.
    pub secs_per_tap: f64,
    pub advance_pause_secs: f64,
    pub max_level: u32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            secs_per_tap: FORCE_SECS_PER_TAP,
            advance_pause_secs: LEVEL_ADVANCE_PAUSE_SECS,
            max_level: MAX_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ForceAction {
    NextLevel,
}

pub struct ForceMode<P: ProgressStore> {
    config: ForceConfig,
    progress: P,
    rng: ChaCha8Rng,
    clock: TickClock,
    deferred: DeferredQueue<ForceAction>,
    scheduler: TickScheduler,
    grid: Grid,
    required_total: usize,
    required_remaining: usize,
    taps_per_tile: u32,
    phase: EnginePhase,
    can_tap: bool,
    lives: u32,
    level: u32,
    level_cleared: bool,
    game_over: bool,
}

impl<P: ProgressStore> ForceMode<P> {
    pub fn new(config: ForceConfig, progress: P) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            progress,
            rng,
            clock: TickClock::default(),
            deferred: DeferredQueue::new(),
            scheduler: TickScheduler::new(),
            grid: Grid::build(2),
            required_total: 0,
            required_remaining: 0,
            taps_per_tile: 0,
            phase: EnginePhase::Idle,
            can_tap: false,
            lives: 0,
            level: 1,
            level_cleared: false,
            game_over: false,
        }
    }

    pub fn taps_per_tile(&self) -> u32 {
        self.taps_per_tile
    }

    fn setup_level(&mut self) {
        self.deferred.cancel_all();
        self.scheduler.stop();
        self.lives = STARTING_LIVES;
        self.level_cleared = false;
        self.game_over = false;
        self.grid = Grid::build(shared::grid_size_for_level(self.level));
        self.required_total = curve::required_tiles_for_level(self.level, self.grid.area());
        self.required_remaining = self.required_total;
        self.taps_per_tile = curve::taps_for_level(self.level);
        self.scheduler.start(None);
        self.phase = EnginePhase::Active;
        self.can_tap = true;
        log::debug!(
            "force: level {} tiles {} taps/tile {}",
            self.level,
            self.required_total,
            self.taps_per_tile
        );
    }

    fn finish_level(&mut self) {
        self.can_tap = false;
        self.scheduler.stop();
        self.phase = EnginePhase::LevelCleared;
        self.level_cleared = true;
        if self.level < self.config.max_level {
            self.progress.increment_level(ModeId::Force);
        }
        self.deferred
            .schedule(self.config.advance_pause_secs, ForceAction::NextLevel);
        log::debug!("force: level {} cleared", self.level);
    }

    fn enter_game_over(&mut self) {
        self.deferred.cancel_all();
        self.scheduler.stop();
        self.game_over = true;
        self.can_tap = false;
        self.phase = EnginePhase::GameOver;
        log::debug!("force: game over at level {}", self.level);
    }

    fn spawn_step(&mut self) {
        let cap = curve::max_active_for_level(self.level).min(self.required_remaining);
        let lifetime = f64::from(self.taps_per_tile) * self.config.secs_per_tap;
        while self.scheduler.active_count() < cap {
            let scheduler = &self.scheduler;
            let Some(index) =
                pick_spawn_index(&mut self.rng, &self.grid, |i| scheduler.is_tile_active(i))
            else {
                break;
            };
            self.scheduler.activate_tile(index, lifetime);
            if let Some(card) = self.grid.card_mut(index) {
                card.is_target = true;
                card.is_face_up = true;
                card.remaining_time = lifetime;
                card.remaining_taps = self.taps_per_tile;
            }
        }
    }

    fn mirror_timers(&mut self) {
        let grid = &mut self.grid;
        for (index, remaining) in self.scheduler.active_tiles() {
            if let Some(card) = grid.card_mut(index) {
                card.remaining_time = remaining;
            }
        }
    }
}

impl<P: ProgressStore> GameMode for ForceMode<P> {
    fn start_game(&mut self) {
        self.level = self.progress.current_level(ModeId::Force);
        self.clock = TickClock::default();
        self.setup_level();
    }

    fn reset_game(&mut self) {
        self.level = self.progress.current_level(ModeId::Force);
        self.setup_level();
    }

    fn tap_card(&mut self, index: usize) {
        if !self.can_tap {
            log::trace!("force: tap {index} ignored, taps disabled");
            return;
        }
        let Some(card) = self.grid.card(index) else {
            log::trace!("force: tap {index} out of range");
            return;
        };
        if card.is_resolved {
            log::trace!("force: tap {index} ignored, already resolved");
            return;
        }

        if self.scheduler.is_tile_active(index) {
            let worn_down = match self.grid.card_mut(index) {
                Some(card) => {
                    card.remaining_taps = card.remaining_taps.saturating_sub(1);
                    card.remaining_taps == 0
                }
                None => false,
            };
            if worn_down {
                self.scheduler.deactivate_tile(index);
                if let Some(card) = self.grid.card_mut(index) {
                    card.is_resolved = true;
                    card.remaining_time = 0.0;
                }
                self.required_remaining -= 1;
                if self.required_remaining == 0 {
                    self.finish_level();
                }
            }
        } else if lose_life(&mut self.lives) {
            self.enter_game_over();
        } else {
            log::trace!("force: tap {index} hit an unlit tile");
        }
    }

    fn tick(&mut self) {
        self.clock.advance();
        let actions = self.deferred.tick();
        for action in actions {
            match action {
                ForceAction::NextLevel => {
                    self.level = self.progress.current_level(ModeId::Force);
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
                    // Burn-out just retires the tile; a fresh one spawns in
                    // its place with the tap counter reset.
                    if let Some(card) = self.grid.card_mut(index) {
                        card.is_target = false;
                        card.is_face_up = false;
                        card.remaining_time = 0.0;
                        card.remaining_taps = 0;
                    }
                    log::trace!("force: tile {index} burned out");
                }
                TickEvent::LevelTimeout => {}
            }
        }
        self.spawn_step();
        self.mirror_timers();
    }

    fn view(&self) -> ModeView {
        ModeView {
            mode: ModeId::Force,
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
            targets_remaining: self.required_remaining,
            level_time_total: 0.0,
            level_time_remaining: 0.0,
            is_level_cleared: self.level_cleared,
            is_game_over: self.game_over,
        }
    }
}
