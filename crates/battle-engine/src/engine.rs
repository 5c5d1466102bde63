//! Voting engine: the state machine behind one battle viewing session.
//!
//! `VotingEngine` owns the selection, tally and lifecycle of a single
//! session. Host commands are applied directly or queued for the next tick.
//! Commands that a disabled control would swallow (submitting with no
//! participant, anything after commit) are guarded no-ops, not errors.
//! Completely headless: time is passed in, enabling deterministic testing.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use battle_core::commands::VoteCommand;
use battle_core::config::SessionConfig;
use battle_core::enums::{PhaseKind, Side};
use battle_core::error::BattleError;
use battle_core::events::VoteEvent;
use battle_core::reactions;
use battle_core::state::BattleSnapshot;
use battle_core::types::{BattleDescriptor, Percentages, SelectionState, VoteTally};

use crate::timer::CloseTimer;

/// Lifecycle of a session. The committed phase owns the close timer, so
/// leaving it for any reason cancels the timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowPhase {
    Idle,
    ParticipantChosen,
    Committed { timer: CloseTimer },
    Closed,
    Disposed,
}

impl FlowPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            FlowPhase::Idle => PhaseKind::Idle,
            FlowPhase::ParticipantChosen => PhaseKind::ParticipantChosen,
            FlowPhase::Committed { .. } => PhaseKind::Committed,
            FlowPhase::Closed => PhaseKind::Closed,
            FlowPhase::Disposed => PhaseKind::Disposed,
        }
    }
}

/// The voting engine for one battle session.
pub struct VotingEngine {
    descriptor: BattleDescriptor,
    tally: VoteTally,
    percentages: Percentages,
    selection: SelectionState,
    phase: FlowPhase,
    close_delay: Duration,
    command_queue: VecDeque<VoteCommand>,
    events: Vec<VoteEvent>,
}

impl VotingEngine {
    /// Create a session for `descriptor`. Fails if the starting tally has no
    /// room for the heaviest reaction.
    pub fn new(
        descriptor: BattleDescriptor,
        config: SessionConfig,
    ) -> Result<Self, BattleError> {
        config.validate()?;
        let tally = config.starting_tally();
        Ok(Self {
            descriptor,
            tally,
            percentages: tally.percentages(),
            selection: SelectionState::default(),
            phase: FlowPhase::Idle,
            close_delay: config.close_delay(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
        })
    }

    /// Queue a command for processing at the next tick.
    pub fn queue_command(&mut self, command: VoteCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = VoteCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply a command immediately.
    pub fn apply(&mut self, command: VoteCommand) -> Result<(), BattleError> {
        self.apply_at(command, Instant::now())
    }

    pub fn apply_at(&mut self, command: VoteCommand, now: Instant) -> Result<(), BattleError> {
        match command {
            VoteCommand::SelectParticipant { participant_id } => {
                self.select_participant(&participant_id)
            }
            VoteCommand::SelectReaction { reaction_id } => self.select_reaction(&reaction_id),
            VoteCommand::SubmitVote => {
                self.submit_vote_at(now);
                Ok(())
            }
            VoteCommand::Dispose => {
                self.dispose();
                Ok(())
            }
        }
    }

    /// Pick the participant the vote goes to. Re-picking overwrites.
    pub fn select_participant(&mut self, participant_id: &str) -> Result<(), BattleError> {
        if !self.accepts_input("select_participant") {
            return Ok(());
        }
        let side = self.descriptor.side_of(participant_id).inspect_err(|err| {
            warn!(%err, "participant selection rejected");
        })?;

        self.selection.participant = Some(side);
        self.phase = FlowPhase::ParticipantChosen;
        debug!(?side, participant_id, "participant selected");
        self.events.push(VoteEvent::SelectionChanged {
            selection: self.selection,
        });
        Ok(())
    }

    /// Pick the reaction attached to the vote. No tally effect until submit.
    pub fn select_reaction(&mut self, reaction_id: &str) -> Result<(), BattleError> {
        if !self.accepts_input("select_reaction") {
            return Ok(());
        }
        let reaction = reactions::lookup(reaction_id).inspect_err(|err| {
            warn!(%err, "reaction selection rejected");
        })?;

        self.selection.reaction = reaction;
        debug!(reaction = reaction.id, "reaction selected");
        self.events.push(VoteEvent::SelectionChanged {
            selection: self.selection,
        });
        Ok(())
    }

    /// Cast the session's single vote.
    pub fn submit_vote(&mut self) {
        self.submit_vote_at(Instant::now());
    }

    pub fn submit_vote_at(&mut self, now: Instant) {
        if !self.accepts_input("submit_vote") {
            return;
        }
        let Some(side) = self.selection.participant else {
            debug!("submit_vote ignored: no participant chosen");
            return;
        };

        let reaction = self.selection.reaction;
        if let Err(err) = self.tally.add(side, reaction.display_weight) {
            warn!(%err, "vote not counted");
            return;
        }
        self.percentages = self.tally.percentages();
        self.phase = FlowPhase::Committed {
            timer: CloseTimer::arm(now, self.close_delay),
        };
        info!(
            ?side,
            reaction = reaction.id,
            score_a = self.tally.score_a,
            score_b = self.tally.score_b,
            "vote committed"
        );
        self.events.push(VoteEvent::VoteCommitted {
            tally: self.tally,
            percentages: self.percentages,
            participant: side,
            reaction,
        });
    }

    /// Tear the session down. Cancels a pending close; idempotent.
    pub fn dispose(&mut self) {
        if self.phase.kind().is_terminal() {
            return;
        }
        if matches!(self.phase, FlowPhase::Committed { .. }) {
            debug!("dispose cancelled pending close");
        }
        self.phase = FlowPhase::Disposed;
        self.command_queue.clear();
        info!("session disposed");
    }

    /// Fire the close timer if it is due. Returns true on the transition.
    pub fn poll_close(&mut self, now: Instant) -> bool {
        let FlowPhase::Committed { timer } = &self.phase else {
            return false;
        };
        if !timer.is_due(now) {
            return false;
        }
        self.phase = FlowPhase::Closed;
        info!("close requested");
        self.events.push(VoteEvent::CloseRequested);
        true
    }

    /// Process queued commands, fire the timer, and return the snapshot.
    pub fn tick(&mut self) -> BattleSnapshot {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> BattleSnapshot {
        self.process_commands(now);
        self.poll_close(now);
        self.snapshot_at(now)
    }

    /// Drain the events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<VoteEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot_at(&self, now: Instant) -> BattleSnapshot {
        BattleSnapshot {
            participant_a: self.descriptor.participant(Side::A).clone(),
            participant_b: self.descriptor.participant(Side::B).clone(),
            prize_label: self.descriptor.prize_label.clone(),
            countdown_label: self.descriptor.countdown_label.clone(),
            phase: self.phase.kind(),
            selection: self.selection,
            tally: self.tally,
            percentages: self.percentages,
            close_remaining_ms: self
                .close_remaining(now)
                .map(|d| d.as_millis() as u64),
        }
    }

    /// Time until the close signal, only while committed.
    pub fn close_remaining(&self, now: Instant) -> Option<Duration> {
        match &self.phase {
            FlowPhase::Committed { timer } => Some(timer.remaining(now)),
            _ => None,
        }
    }

    pub fn phase(&self) -> &FlowPhase {
        &self.phase
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    /// Whether the session has reached a terminal phase.
    pub fn is_finished(&self) -> bool {
        self.phase.kind().is_terminal()
    }

    pub fn tally(&self) -> VoteTally {
        self.tally
    }

    pub fn percentages(&self) -> Percentages {
        self.percentages
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn descriptor(&self) -> &BattleDescriptor {
        &self.descriptor
    }

    /// Number of commands waiting for the next tick.
    #[cfg(test)]
    pub fn queued_commands(&self) -> usize {
        self.command_queue.len()
    }

    /// Process all queued commands. Integration errors are logged and dropped.
    fn process_commands(&mut self, now: Instant) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.apply_at(command, now) {
                warn!(%err, "queued command dropped");
            }
        }
    }

    /// Guard shared by every user command.
    fn accepts_input(&self, command: &str) -> bool {
        let phase = self.phase.kind();
        if phase.accepts_input() {
            return true;
        }
        debug!(command, ?phase, "command ignored");
        false
    }
}
