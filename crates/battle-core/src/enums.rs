//! Enumeration types used throughout the voting flow.

use serde::{Deserialize, Serialize};

/// Which of the two participants a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The opposing participant.
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Lifecycle phase of a voting session, without any attached state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseKind {
    /// No participant chosen yet.
    #[default]
    Idle,
    /// A participant is chosen; the vote can be submitted.
    ParticipantChosen,
    /// The vote is counted and the confirmation is showing.
    Committed,
    /// The close signal has been emitted to the host.
    Closed,
    /// The host tore the session down before it closed.
    Disposed,
}

impl PhaseKind {
    /// Whether the session still accepts selection and submit commands.
    pub fn accepts_input(self) -> bool {
        matches!(self, PhaseKind::Idle | PhaseKind::ParticipantChosen)
    }

    /// Whether no further transitions can happen.
    pub fn is_terminal(self) -> bool {
        matches!(self, PhaseKind::Closed | PhaseKind::Disposed)
    }
}
