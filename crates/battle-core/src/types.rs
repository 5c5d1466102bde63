//! Battle descriptors, tallies and selection state.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::Side;
use crate::error::BattleError;
use crate::reactions::{self, ReactionKind};

/// One of the two competitors in a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub display_label: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, display_label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_label: display_label.into(),
        }
    }
}

/// Read-only description of a battle, supplied by the host.
///
/// Serialized as a `participants` list; deserializing rejects any list that
/// does not hold exactly two entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DescriptorRecord", into = "DescriptorRecord")]
pub struct BattleDescriptor {
    participant_a: Participant,
    participant_b: Participant,
    pub prize_label: String,
    pub countdown_label: String,
}

/// Wire form of [`BattleDescriptor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DescriptorRecord {
    participants: Vec<Participant>,
    prize_label: String,
    countdown_label: String,
}

impl BattleDescriptor {
    /// Build a descriptor from a participant list, which must hold exactly two entries.
    pub fn new(
        participants: Vec<Participant>,
        prize_label: impl Into<String>,
        countdown_label: impl Into<String>,
    ) -> Result<Self, BattleError> {
        let count = participants.len();
        let [participant_a, participant_b]: [Participant; PARTICIPANTS_PER_BATTLE] = participants
            .try_into()
            .map_err(|_| BattleError::ParticipantCount(count))?;
        Ok(Self {
            participant_a,
            participant_b,
            prize_label: prize_label.into(),
            countdown_label: countdown_label.into(),
        })
    }

    /// Parse a descriptor from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, BattleError> {
        let record: DescriptorRecord = serde_json::from_str(json)?;
        Self::try_from(record)
    }

    pub fn participant(&self, side: Side) -> &Participant {
        match side {
            Side::A => &self.participant_a,
            Side::B => &self.participant_b,
        }
    }

    /// Resolve a participant id to its side.
    pub fn side_of(&self, participant_id: &str) -> Result<Side, BattleError> {
        if self.participant_a.id == participant_id {
            Ok(Side::A)
        } else if self.participant_b.id == participant_id {
            Ok(Side::B)
        } else {
            Err(BattleError::UnknownParticipant(participant_id.to_string()))
        }
    }
}

impl TryFrom<DescriptorRecord> for BattleDescriptor {
    type Error = BattleError;

    fn try_from(record: DescriptorRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.participants,
            record.prize_label,
            record.countdown_label,
        )
    }
}

impl From<BattleDescriptor> for DescriptorRecord {
    fn from(descriptor: BattleDescriptor) -> Self {
        Self {
            participants: vec![descriptor.participant_a, descriptor.participant_b],
            prize_label: descriptor.prize_label,
            countdown_label: descriptor.countdown_label,
        }
    }
}

/// Running per-participant score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub score_a: u32,
    pub score_b: u32,
}

impl Default for VoteTally {
    fn default() -> Self {
        Self {
            score_a: DEFAULT_SCORE_A,
            score_b: DEFAULT_SCORE_B,
        }
    }
}

impl VoteTally {
    pub fn new(score_a: u32, score_b: u32) -> Self {
        Self { score_a, score_b }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::A => self.score_a,
            Side::B => self.score_b,
        }
    }

    /// Add `points` to one side. Leaves the tally untouched on overflow.
    pub fn add(&mut self, side: Side, points: u32) -> Result<(), BattleError> {
        let score = match side {
            Side::A => &mut self.score_a,
            Side::B => &mut self.score_b,
        };
        let current = *score;
        *score = current
            .checked_add(points)
            .ok_or(BattleError::TallyOverflow {
                score: current,
                points,
            })?;
        Ok(())
    }

    /// Check that either side can take the heaviest reaction.
    pub fn ensure_headroom(&self) -> Result<(), BattleError> {
        let points = reactions::max_weight();
        for score in [self.score_a, self.score_b] {
            if score.checked_add(points).is_none() {
                return Err(BattleError::TallyOverflow { score, points });
            }
        }
        Ok(())
    }

    pub fn total(&self) -> u64 {
        u64::from(self.score_a) + u64::from(self.score_b)
    }

    /// Rounded share of the total for one side, 0 when the tally is empty.
    ///
    /// Halves round up. The two sides may sum to 99 or 101.
    pub fn percentage(&self, side: Side) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        let score = u64::from(self.score(side));
        ((200 * score + total) / (2 * total)) as u32
    }

    pub fn percentages(&self) -> Percentages {
        Percentages {
            a: self.percentage(Side::A),
            b: self.percentage(Side::B),
        }
    }
}

/// Display percentages derived from a [`VoteTally`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentages {
    pub a: u32,
    pub b: u32,
}

/// What the voter has picked so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub participant: Option<Side>,
    pub reaction: ReactionKind,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            participant: None,
            reaction: reactions::default_reaction(),
        }
    }
}
