//! Error type shared by every crate in the workspace.

/// Integration and configuration errors.
///
/// Guarded no-op commands (submitting without a participant, anything after
/// commit) are not errors and never produce one of these.
#[derive(thiserror::Error, Debug)]
pub enum BattleError {
    #[error("unknown reaction id: {0}")]
    UnknownReaction(String),
    #[error("unknown participant id: {0}")]
    UnknownParticipant(String),
    #[error("a battle needs exactly 2 participants, got {0}")]
    ParticipantCount(usize),
    #[error("score {score} cannot take {points} more points")]
    TallyOverflow { score: u32, points: u32 },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session has already ended")]
    SessionEnded,
}
