//! Voting engine for head-to-head battles.
//!
//! Owns one session's selection, tally and lifecycle, applies host commands,
//! and fires the auto-close timer. Time is passed in by the caller, so the
//! engine is deterministic and needs no runtime.

pub mod engine;
pub mod timer;

pub use battle_core as core;
pub use engine::{FlowPhase, VotingEngine};
