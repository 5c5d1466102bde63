//! Events emitted by a voting session for the host to observe.

use serde::Serialize;

use crate::enums::Side;
use crate::reactions::ReactionKind;
use crate::types::{Percentages, SelectionState, VoteTally};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum VoteEvent {
    /// The participant or reaction choice changed.
    SelectionChanged { selection: SelectionState },
    /// The single vote for this session was counted.
    VoteCommitted {
        tally: VoteTally,
        percentages: Percentages,
        participant: Side,
        reaction: ReactionKind,
    },
    /// The confirmation delay elapsed; the host should leave the battle view.
    CloseRequested,
}
