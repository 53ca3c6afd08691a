//! Difficulty curves: pure functions from level to tuning parameters.
//!
//! Every function here is total and deterministic. Levels are 1-based;
//! inputs below 1 are clamped up so a bad caller cannot produce a
//! degenerate board.

pub mod endless;
pub mod force;
pub mod recall;
pub mod rush;
pub mod sequence;
pub mod shared;
