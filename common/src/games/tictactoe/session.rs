use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use crate::games::{GameBroadcaster, SessionRng};
use crate::{error, log};
use super::bot_controller::{calculate_minimax_move, compute_computer_move};
use super::commands::{GameCommand, GameEvent, GameSnapshot};
use super::game_state::{PendingComputerMove, TicTacToeGameState};
use super::settings::TicTacToeSettings;
use super::types::{Difficulty, RoundResult};

const COMMAND_BUFFER: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub events: Vec<GameEvent>,
    pub snapshot: GameSnapshot,
}

#[derive(Clone)]
pub struct TicTacToeSessionHandle {
    commands: mpsc::Sender<GameCommand>,
}

impl TicTacToeSessionHandle {
    pub async fn send(&self, command: GameCommand) -> Result<(), String> {
        self.commands
            .send(command)
            .await
            .map_err(|_| "Game session has ended".to_string())
    }
}

#[derive(Debug)]
enum ScheduledAction {
    ComputerMove(PendingComputerMove),
    RoundReset { round_generation: u64 },
}

#[derive(Debug)]
struct Scheduled {
    action: ScheduledAction,
    deadline: Instant,
}

/// Drives one interactive game: applies UI commands, plays the computer after
/// its thinking delay and clears finished rounds after the result pause.
///
/// All state lives in the session task. A scheduled action is replaced
/// whenever the state changes, and computer moves are re-checked against the
/// board they were computed for before being committed.
pub struct TicTacToeSession;

impl TicTacToeSession {
    pub fn spawn(
        session_id: String,
        settings: TicTacToeSettings,
        rng: SessionRng,
        broadcaster: impl GameBroadcaster,
    ) -> (TicTacToeSessionHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let join_handle = tokio::spawn(Self::run(session_id, settings, rng, rx, broadcaster));
        (TicTacToeSessionHandle { commands: tx }, join_handle)
    }

    pub async fn run(
        session_id: String,
        settings: TicTacToeSettings,
        mut rng: SessionRng,
        mut commands: mpsc::Receiver<GameCommand>,
        broadcaster: impl GameBroadcaster,
    ) {
        log!("[session:{}] started with seed {}", session_id, rng.seed());

        let mut state = TicTacToeGameState::new(&settings);
        let mut scheduled = schedule_next(&state, &settings);
        publish(&broadcaster, &state, Vec::new()).await;

        loop {
            let deadline = scheduled.as_ref().map(|s| s.deadline);

            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    let events = state.handle_command(command);
                    if events.is_empty() {
                        continue;
                    }
                    log_round_end(&session_id, &events);
                    scheduled = schedule_next(&state, &settings);
                    publish(&broadcaster, &state, events).await;
                }
                _ = wait_for(deadline) => {
                    let Some(due) = scheduled.take() else {
                        continue;
                    };
                    let events = run_action(&session_id, &mut state, due.action, &mut rng).await;
                    scheduled = schedule_next(&state, &settings);
                    if events.is_empty() {
                        continue;
                    }
                    log_round_end(&session_id, &events);
                    publish(&broadcaster, &state, events).await;
                }
            }
        }

        log!("[session:{}] ended", session_id);
    }
}

fn schedule_next(state: &TicTacToeGameState, settings: &TicTacToeSettings) -> Option<Scheduled> {
    if let Some(pending) = state.prepare_computer_move() {
        return Some(Scheduled {
            deadline: Instant::now() + settings.think_delay(pending.difficulty),
            action: ScheduledAction::ComputerMove(pending),
        });
    }

    if state.match_winner().is_none()
        && let Some(pause) = settings.result_pause(&state.result())
    {
        return Some(Scheduled {
            deadline: Instant::now() + pause,
            action: ScheduledAction::RoundReset {
                round_generation: state.round_generation(),
            },
        });
    }

    None
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn run_action(
    session_id: &str,
    state: &mut TicTacToeGameState,
    action: ScheduledAction,
    rng: &mut SessionRng,
) -> Vec<GameEvent> {
    match action {
        ScheduledAction::ComputerMove(pending) => {
            let Some(index) = compute_pending_move(session_id, &pending, rng).await else {
                return Vec::new();
            };
            let events = state.apply_computer_move(&pending, index);
            if events.is_empty() {
                log!("[session:{}] discarded stale computer move at {}", session_id, index);
            }
            events
        }
        ScheduledAction::RoundReset { round_generation } => {
            if state.round_generation() != round_generation {
                return Vec::new();
            }
            state.reset_round(true)
        }
    }
}

async fn compute_pending_move(
    session_id: &str,
    pending: &PendingComputerMove,
    rng: &mut SessionRng,
) -> Option<usize> {
    match pending.difficulty {
        Difficulty::Easy => {
            compute_computer_move(&pending.board, pending.player, Difficulty::Easy, rng)
        }
        Difficulty::Unbeatable => {
            let board = pending.board;
            let player = pending.player;
            match tokio::task::spawn_blocking(move || calculate_minimax_move(&board, player)).await
            {
                Ok(index) => index,
                Err(e) => {
                    error!("[session:{}] minimax task failed: {}", session_id, e);
                    None
                }
            }
        }
    }
}

fn log_round_end(session_id: &str, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::RoundResultChanged {
                result: RoundResult::Won { player, line },
            } => log!("[session:{}] round won by {} on {:?}", session_id, player, line),
            GameEvent::RoundResultChanged {
                result: RoundResult::Draw,
            } => log!("[session:{}] round drawn", session_id),
            GameEvent::MatchWinnerDeclared { player } => {
                log!("[session:{}] match won by {}", session_id, player)
            }
            _ => {}
        }
    }
}

async fn publish(
    broadcaster: &impl GameBroadcaster,
    state: &TicTacToeGameState,
    events: Vec<GameEvent>,
) {
    let update = SessionUpdate {
        events,
        snapshot: state.snapshot(),
    };
    broadcaster.broadcast_update(update).await;
}
