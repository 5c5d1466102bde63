//! Session snapshot: everything a host needs to draw the battle view.

use serde::Serialize;

use crate::enums::PhaseKind;
use crate::types::{Participant, Percentages, SelectionState, VoteTally};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleSnapshot {
    pub participant_a: Participant,
    pub participant_b: Participant,
    pub prize_label: String,
    pub countdown_label: String,
    pub phase: PhaseKind,
    pub selection: SelectionState,
    pub tally: VoteTally,
    pub percentages: Percentages,
    /// Time left before the close signal, only while committed.
    pub close_remaining_ms: Option<u64>,
}
