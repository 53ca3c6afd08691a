//! Per-tile countdowns and the optional level clock.
//!
//! The scheduler is pure bookkeeping: the owning engine calls [`tick`]
//! once per engine tick and reacts to the returned events. Tile timers
//! live in a `BTreeMap` so expiry events come out in ascending index
//! order regardless of activation order.
//!
//! [`tick`]: TickScheduler::tick

use std::collections::BTreeMap;

use gridtap_core::constants::DT;

/// What came due this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// A tile's countdown hit zero without being cleared.
    TileExpired(usize),
    /// The level clock ran out.
    LevelTimeout,
}

/// Countdown bookkeeping for one mode engine.
#[derive(Debug, Default)]
pub struct TickScheduler {
    tile_timers: BTreeMap<usize, f64>,
    level_timer: Option<f64>,
    running: bool,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a level: clears all tile timers, arms the level clock if one
    /// is given, and starts ticking.
    pub fn start(&mut self, level_time: Option<f64>) {
        self.tile_timers.clear();
        self.level_timer = level_time;
        self.running = true;
    }

    /// Stop ticking. Idempotent; timers keep their values but no longer
    /// advance or fire.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn activate_tile(&mut self, index: usize, lifetime_secs: f64) {
        self.tile_timers.insert(index, lifetime_secs);
    }

    pub fn deactivate_tile(&mut self, index: usize) {
        self.tile_timers.remove(&index);
    }

    pub fn is_tile_active(&self, index: usize) -> bool {
        self.tile_timers.contains_key(&index)
    }

    pub fn active_count(&self) -> usize {
        self.tile_timers.len()
    }

    pub fn tile_remaining(&self, index: usize) -> Option<f64> {
        self.tile_timers.get(&index).copied()
    }

    /// Active tiles with their remaining time, ascending by index.
    pub fn active_tiles(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.tile_timers.iter().map(|(&i, &t)| (i, t))
    }

    pub fn level_remaining(&self) -> Option<f64> {
        self.level_timer
    }

    /// Advance all countdowns by one tick. Tile expiries are reported in
    /// ascending index order, then the level timeout if the clock ran out.
    /// Does nothing when stopped.
    pub fn tick(&mut self) -> Vec<TickEvent> {
        if !self.running {
            return Vec::new();
        }
        let mut events = Vec::new();

        for timer in self.tile_timers.values_mut() {
            *timer -= DT;
        }
        let expired: Vec<usize> = self
            .tile_timers
            .iter()
            .filter(|(_, &t)| t <= 1e-9)
            .map(|(&i, _)| i)
            .collect();
        for index in expired {
            self.tile_timers.remove(&index);
            events.push(TickEvent::TileExpired(index));
        }

        if let Some(timer) = self.level_timer.as_mut() {
            *timer -= DT;
            if *timer <= 1e-9 {
                self.level_timer = None;
                events.push(TickEvent::LevelTimeout);
            }
        }
        events
    }
}
