//! Host commands sent to a voting session.
//!
//! Commands can be applied immediately or queued for the next tick.

use serde::{Deserialize, Serialize};

/// All actions a host can request from a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VoteCommand {
    /// Pick (or re-pick) the participant the vote goes to.
    SelectParticipant { participant_id: String },
    /// Pick (or re-pick) the reaction attached to the vote.
    SelectReaction { reaction_id: String },
    /// Cast the vote. Ignored without a participant or after commit.
    SubmitVote,
    /// Tear the session down, cancelling any pending close.
    Dispose,
}
