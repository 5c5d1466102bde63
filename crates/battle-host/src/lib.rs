//! Host runner for battle voting sessions.
//!
//! Runs one `VotingEngine` per session on its own thread, drives the
//! auto-close timer from the wall clock, and forwards events to the host
//! over a channel.

pub mod session_loop;
pub mod state;

pub use battle_core as core;
pub use session_loop::{spawn_session, SessionHandle};
