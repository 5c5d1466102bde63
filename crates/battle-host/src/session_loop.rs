//! Session thread: runs one voting engine and fires its close timer.
//!
//! Commands arrive via an `mpsc` channel. The thread blocks on that channel,
//! bounded by the close deadline while a vote is committed, so the timer
//! fires on time without polling. Events go back over a second channel and
//! the latest snapshot is stored in shared state for synchronous reads.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use battle_core::commands::VoteCommand;
use battle_core::config::SessionConfig;
use battle_core::error::BattleError;
use battle_core::events::VoteEvent;
use battle_core::state::BattleSnapshot;
use battle_core::types::BattleDescriptor;
use battle_engine::VotingEngine;

use crate::state::{SessionCommand, SessionOutput};

/// Host-side handle to a running session. Dropping it disposes the session.
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
    output_rx: mpsc::Receiver<SessionOutput>,
    latest_snapshot: Arc<Mutex<Option<BattleSnapshot>>>,
    thread: Option<JoinHandle<()>>,
}

/// Start a session thread for `descriptor`.
pub fn spawn_session(
    descriptor: BattleDescriptor,
    config: SessionConfig,
) -> Result<SessionHandle, BattleError> {
    let (command_tx, command_rx) = mpsc::channel::<SessionCommand>();
    let (output_tx, output_rx) = mpsc::channel::<SessionOutput>();
    let latest_snapshot = Arc::new(Mutex::new(None));

    let engine = VotingEngine::new(descriptor, config)?;
    let shared = Arc::clone(&latest_snapshot);
    let thread = std::thread::Builder::new()
        .name("battle-session".into())
        .spawn(move || run_session(engine, output_tx, command_rx, &shared))?;

    Ok(SessionHandle {
        command_tx,
        output_rx,
        latest_snapshot,
        thread: Some(thread),
    })
}

impl SessionHandle {
    /// Forward a command to the session.
    pub fn send(&self, command: VoteCommand) -> Result<(), BattleError> {
        self.command_tx
            .send(SessionCommand::Vote(command))
            .map_err(|_| BattleError::SessionEnded)
    }

    /// Wait up to `timeout` for the next output. `None` on timeout or once
    /// the session has ended and every output was read.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SessionOutput> {
        self.output_rx.recv_timeout(timeout).ok()
    }

    /// Block until the session requests to close, handing each event to
    /// `on_event`. There is no timeout: the close delay bounds the wait.
    /// Errors reported by the session are returned as-is; the session
    /// ending without a close request is `SessionEnded`.
    pub fn wait_for_close(
        &self,
        mut on_event: impl FnMut(&VoteEvent) -> Result<(), BattleError>,
    ) -> Result<(), BattleError> {
        loop {
            let event = self
                .output_rx
                .recv()
                .map_err(|_| BattleError::SessionEnded)??;
            on_event(&event)?;
            if matches!(event, VoteEvent::CloseRequested) {
                return Ok(());
            }
        }
    }

    /// Receiver for session outputs.
    pub fn outputs(&self) -> &mpsc::Receiver<SessionOutput> {
        &self.output_rx
    }

    /// The snapshot taken after the last processed command or timer check.
    pub fn latest_snapshot(&self) -> Option<BattleSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }

    /// Dispose the session and wait for its thread to finish.
    pub fn dispose(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        // The thread may already have exited after closing.
        let _ = self.command_tx.send(SessionCommand::Shutdown);
        let _ = thread.join();
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The session loop. Runs until the engine reaches a terminal phase.
///
/// `command_rx` is declared last so it is dropped first: once the output
/// channel disconnects, sends from the host fail too.
fn run_session(
    mut engine: VotingEngine,
    output_tx: mpsc::Sender<SessionOutput>,
    command_rx: mpsc::Receiver<SessionCommand>,
    latest_snapshot: &Mutex<Option<BattleSnapshot>>,
) {
    info!(
        prize = %engine.descriptor().prize_label,
        "battle session started"
    );

    loop {
        // 1. Wait for a command, or for the close deadline while committed
        let received = match engine.close_remaining(Instant::now()) {
            Some(wait) => command_rx.recv_timeout(wait),
            None => command_rx
                .recv()
                .map_err(|_| RecvTimeoutError::Disconnected),
        };

        // 2. Apply it
        match received {
            Ok(SessionCommand::Vote(command)) => {
                if let Err(err) = engine.apply(command) {
                    if output_tx.send(Err(err)).is_err() {
                        engine.dispose();
                    }
                }
            }
            Ok(SessionCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                engine.dispose();
            }
            Err(RecvTimeoutError::Timeout) => {}
        }

        // 3. Fire the timer if due and publish
        let snapshot = engine.tick();
        for event in engine.take_events() {
            if output_tx.send(Ok(event)).is_err() {
                debug!("host stopped listening");
                engine.dispose();
                break;
            }
        }
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if engine.is_finished() {
            info!(phase = ?engine.phase_kind(), "battle session ended");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::enums::{PhaseKind, Side};
    use battle_core::types::{Participant, VoteTally};

    const WAIT: Duration = Duration::from_secs(5);

    fn descriptor() -> BattleDescriptor {
        BattleDescriptor::new(
            vec![Participant::new("A", "Ava"), Participant::new("B", "Ben")],
            "Golden mic",
            "02:00:00",
        )
        .unwrap()
    }

    fn config(close_delay_ms: u64) -> SessionConfig {
        SessionConfig {
            close_delay_ms,
            ..Default::default()
        }
    }

    /// Read outputs until the session thread hangs up.
    fn drain(handle: &SessionHandle) -> Vec<SessionOutput> {
        let mut outputs = Vec::new();
        while let Ok(output) = handle.outputs().recv_timeout(WAIT) {
            outputs.push(output);
        }
        outputs
    }

    fn vote_for_a_with_crown(handle: &SessionHandle) {
        handle
            .send(VoteCommand::SelectParticipant {
                participant_id: "A".into(),
            })
            .unwrap();
        handle
            .send(VoteCommand::SelectReaction {
                reaction_id: "crown".into(),
            })
            .unwrap();
        handle.send(VoteCommand::SubmitVote).unwrap();
    }

    #[test]
    fn test_vote_then_close_after_delay() {
        let handle = spawn_session(descriptor(), config(50)).unwrap();
        let start = Instant::now();
        vote_for_a_with_crown(&handle);

        let events: Vec<VoteEvent> = drain(&handle).into_iter().map(Result::unwrap).collect();
        assert!(start.elapsed() >= Duration::from_millis(50));

        let committed = events.iter().find_map(|e| match e {
            VoteEvent::VoteCommitted {
                tally, participant, ..
            } => Some((*tally, *participant)),
            _ => None,
        });
        assert_eq!(committed, Some((VoteTally::new(50, 55), Side::A)));

        let closes = events
            .iter()
            .filter(|e| matches!(e, VoteEvent::CloseRequested))
            .count();
        assert_eq!(closes, 1);
        assert!(matches!(events.last(), Some(VoteEvent::CloseRequested)));

        let snapshot = handle.latest_snapshot().unwrap();
        assert_eq!(snapshot.phase, PhaseKind::Closed);
    }

    #[test]
    fn test_dispose_command_cancels_close() {
        let handle = spawn_session(descriptor(), config(200)).unwrap();
        vote_for_a_with_crown(&handle);
        handle.send(VoteCommand::Dispose).unwrap();

        let outputs = drain(&handle);
        assert!(outputs
            .iter()
            .any(|o| matches!(o, Ok(VoteEvent::VoteCommitted { .. }))));
        assert!(!outputs
            .iter()
            .any(|o| matches!(o, Ok(VoteEvent::CloseRequested))));
        assert_eq!(
            handle.latest_snapshot().map(|s| s.phase),
            Some(PhaseKind::Disposed)
        );
    }

    #[test]
    fn test_unknown_reaction_reported_and_session_survives() {
        let handle = spawn_session(descriptor(), config(20)).unwrap();
        handle
            .send(VoteCommand::SelectReaction {
                reaction_id: "unicorn".into(),
            })
            .unwrap();

        let first = handle.recv_timeout(WAIT).unwrap();
        assert!(matches!(first, Err(BattleError::UnknownReaction(_))));

        vote_for_a_with_crown(&handle);
        let outputs = drain(&handle);
        assert!(matches!(outputs.last(), Some(Ok(VoteEvent::CloseRequested))));
    }

    #[test]
    fn test_send_after_close_fails() {
        let handle = spawn_session(descriptor(), config(10)).unwrap();
        vote_for_a_with_crown(&handle);
        drain(&handle);

        let mut result = Ok(());
        for _ in 0..100 {
            result = handle.send(VoteCommand::SubmitVote);
            if result.is_err() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(matches!(result, Err(BattleError::SessionEnded)));
    }

    #[test]
    fn test_wait_for_close_outlasts_close_delay() {
        let handle = spawn_session(descriptor(), config(300)).unwrap();
        let start = Instant::now();
        vote_for_a_with_crown(&handle);

        let mut seen = Vec::new();
        handle
            .wait_for_close(|event| {
                seen.push(event.clone());
                Ok(())
            })
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(300));
        assert!(matches!(seen.last(), Some(VoteEvent::CloseRequested)));
        assert!(seen
            .iter()
            .any(|e| matches!(e, VoteEvent::VoteCommitted { .. })));
    }

    #[test]
    fn test_wait_for_close_reports_session_errors() {
        let handle = spawn_session(descriptor(), SessionConfig::default()).unwrap();
        handle
            .send(VoteCommand::SelectParticipant {
                participant_id: "nobody".into(),
            })
            .unwrap();
        let err = handle.wait_for_close(|_| Ok(())).unwrap_err();
        assert!(matches!(err, BattleError::UnknownParticipant(_)));
    }

    #[test]
    fn test_wait_for_close_after_dispose_is_session_ended() {
        let handle = spawn_session(descriptor(), config(10_000)).unwrap();
        vote_for_a_with_crown(&handle);
        handle.send(VoteCommand::Dispose).unwrap();
        let err = handle.wait_for_close(|_| Ok(())).unwrap_err();
        assert!(matches!(err, BattleError::SessionEnded));
    }

    #[test]
    fn test_spawn_rejects_tally_without_headroom() {
        let config = SessionConfig {
            starting_tally: Some(VoteTally::new(0, u32::MAX)),
            ..Default::default()
        };
        assert!(matches!(
            spawn_session(descriptor(), config),
            Err(BattleError::TallyOverflow { .. })
        ));
    }

    #[test]
    fn test_drop_handle_stops_idle_session() {
        let handle = spawn_session(descriptor(), SessionConfig::default()).unwrap();
        handle
            .send(VoteCommand::SelectParticipant {
                participant_id: "B".into(),
            })
            .unwrap();
        assert!(matches!(
            handle.recv_timeout(WAIT),
            Some(Ok(VoteEvent::SelectionChanged { .. }))
        ));
        // Joins the thread; would hang if the session ignored shutdown.
        handle.dispose();
    }
}
