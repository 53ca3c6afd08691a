//! The five headless mode engines and their tick-driven plumbing.
//!
//! Engines are pure state machines: the host calls [`GameMode::tick`] at
//! the fixed tick rate (see `gridtap_core::constants::TICK_RATE`) and
//! forwards taps to [`GameMode::tap_card`]. Nothing here spawns threads or
//! reads wall-clock time, so two engines with the same seed and the same
//! call sequence produce identical views.

pub mod deferred;
pub mod modes;
pub mod scheduler;

pub use modes::{
    EndlessConfig, EndlessMode, ForceConfig, ForceMode, GameMode, RecallConfig, RecallMode,
    RushConfig, RushMode, SequenceConfig, SequenceMode,
};

#[cfg(test)]
mod tests;
