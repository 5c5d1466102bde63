//! Static catalog of weighted reactions a voter can attach to a vote.

use serde::Serialize;

use crate::error::BattleError;

/// A catalog entry. The weight is the number of tally points a vote adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionKind {
    pub id: &'static str,
    pub display_weight: u32,
}

/// All reactions, in display order. The first entry is the default.
pub static REACTIONS: [ReactionKind; 5] = [
    ReactionKind {
        id: "fire",
        display_weight: 3,
    },
    ReactionKind {
        id: "clap",
        display_weight: 1,
    },
    ReactionKind {
        id: "heart",
        display_weight: 2,
    },
    ReactionKind {
        id: "star",
        display_weight: 4,
    },
    ReactionKind {
        id: "crown",
        display_weight: 5,
    },
];

/// Reaction preselected when a session starts.
pub fn default_reaction() -> ReactionKind {
    REACTIONS[0]
}

/// Look up a reaction by id.
pub fn lookup(id: &str) -> Result<ReactionKind, BattleError> {
    REACTIONS
        .iter()
        .find(|r| r.id == id)
        .copied()
        .ok_or_else(|| BattleError::UnknownReaction(id.to_string()))
}

/// Largest weight in the catalog, the most a single vote can add.
pub fn max_weight() -> u32 {
    REACTIONS
        .iter()
        .map(|r| r.display_weight)
        .max()
        .unwrap_or(0)
}

/// Iterate the catalog in display order.
pub fn all() -> impl Iterator<Item = &'static ReactionKind> {
    REACTIONS.iter()
}
