//! Core types and definitions for the gridtap engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! cards, the grid model, enums, constants, and the observable mode view.
//! It has no dependency on any runtime framework.

pub mod card;
pub mod constants;
pub mod enums;
pub mod grid;
pub mod state;
pub mod types;
