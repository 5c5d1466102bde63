//! Core types and definitions for the battle voting flow.
//!
//! This crate defines the vocabulary shared across the other crates:
//! the reaction catalog, battle descriptors, tallies, commands, events,
//! snapshots, configuration, and errors. It has no runtime or timer logic.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod reactions;
pub mod state;
pub mod types;

pub use error::BattleError;
