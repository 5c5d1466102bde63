//! Messages exchanged between a host and its session thread.

use battle_core::commands::VoteCommand;
use battle_core::error::BattleError;
use battle_core::events::VoteEvent;

/// Commands sent from the host to the session thread.
#[derive(Debug)]
pub enum SessionCommand {
    /// A vote command to forward to the engine.
    Vote(VoteCommand),
    /// Dispose the session and stop the thread.
    Shutdown,
}

/// What the session thread reports back: an engine event, or an
/// integration error from a command the host sent.
pub type SessionOutput = Result<VoteEvent, BattleError>;
