use super::board::Board;
use super::commands::{GameCommand, GameEvent, GameSnapshot};
use super::match_score::MatchScore;
use super::settings::TicTacToeSettings;
use super::types::{Difficulty, Mode, Player, RoundResult};
use super::win_detector::evaluate_result;

/// The computer always plays O.
pub const COMPUTER_PLAYER: Player = Player::O;

/// Board snapshot taken when a computer move is scheduled. The move is only
/// committed if the engine still matches it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingComputerMove {
    pub round_generation: u64,
    pub board: Board,
    pub player: Player,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone)]
pub struct TicTacToeGameState {
    board: Board,
    current_player: Player,
    mode: Mode,
    difficulty: Difficulty,
    starting_player: Player,
    result: RoundResult,
    score: Option<MatchScore>,
    round_generation: u64,
}

impl TicTacToeGameState {
    pub fn new(settings: &TicTacToeSettings) -> Self {
        let score = settings
            .match_tracking
            .then(|| MatchScore::new(settings.win_threshold));

        Self {
            board: Board::new(),
            current_player: settings.starting_player,
            mode: settings.mode,
            difficulty: settings.difficulty,
            starting_player: settings.starting_player,
            result: RoundResult::InProgress,
            score,
            round_generation: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn starting_player(&self) -> Player {
        self.starting_player
    }

    pub fn result(&self) -> RoundResult {
        self.result
    }

    pub fn score(&self) -> Option<MatchScore> {
        self.score
    }

    pub fn match_winner(&self) -> Option<Player> {
        self.score.and_then(|score| score.winner())
    }

    pub fn round_generation(&self) -> u64 {
        self.round_generation
    }

    pub fn is_round_active(&self) -> bool {
        !self.result.is_finished() && self.match_winner().is_none()
    }

    pub fn is_computer_turn(&self) -> bool {
        self.mode == Mode::HumanVsComputer && self.current_player == COMPUTER_PLAYER
    }

    pub fn handle_command(&mut self, command: GameCommand) -> Vec<GameEvent> {
        match command {
            GameCommand::SelectCell { index } => self.apply_move(index),
            GameCommand::SetMode { mode } => self.set_mode(mode),
            GameCommand::SetDifficulty { difficulty } => self.set_difficulty(difficulty),
            GameCommand::SetStartingPlayer { player } => self.set_starting_player(player),
            GameCommand::RestartRound => self.reset_round(true),
            GameCommand::RestartMatch => self.reset_round(false),
        }
    }

    /// Human move. Returns no events and leaves the board untouched when the
    /// move is not allowed.
    pub fn apply_move(&mut self, index: usize) -> Vec<GameEvent> {
        if self.is_computer_turn() {
            return Vec::new();
        }
        self.place_current(index)
    }

    /// Snapshot for a computer move, if the computer is the one to move.
    pub fn prepare_computer_move(&self) -> Option<PendingComputerMove> {
        if !self.is_round_active() || !self.is_computer_turn() || self.board.is_full() {
            return None;
        }
        Some(PendingComputerMove {
            round_generation: self.round_generation,
            board: self.board,
            player: self.current_player,
            difficulty: self.difficulty,
        })
    }

    /// Commits a computed move. A move computed for a board that has since
    /// been reset or changed is discarded.
    pub fn apply_computer_move(
        &mut self,
        pending: &PendingComputerMove,
        index: usize,
    ) -> Vec<GameEvent> {
        if pending.round_generation != self.round_generation
            || pending.board != self.board
            || pending.player != self.current_player
            || !self.is_computer_turn()
        {
            return Vec::new();
        }
        self.place_current(index)
    }

    pub fn set_mode(&mut self, mode: Mode) -> Vec<GameEvent> {
        if self.mode == mode {
            return Vec::new();
        }
        self.mode = mode;
        self.reset_round(true)
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Vec<GameEvent> {
        if self.difficulty == difficulty {
            return Vec::new();
        }
        self.difficulty = difficulty;
        self.reset_round(true)
    }

    pub fn set_starting_player(&mut self, player: Player) -> Vec<GameEvent> {
        if self.starting_player == player {
            return Vec::new();
        }
        self.starting_player = player;
        self.reset_round(true)
    }

    pub fn reset_round(&mut self, keep_score: bool) -> Vec<GameEvent> {
        let was_finished = self.result.is_finished();
        self.board = Board::new();
        self.current_player = self.starting_player;
        self.result = RoundResult::InProgress;
        self.round_generation += 1;

        let mut events = vec![
            GameEvent::BoardReset {
                starting_player: self.starting_player,
            },
            GameEvent::TurnChanged {
                player: self.current_player,
            },
        ];

        if was_finished {
            events.push(GameEvent::RoundResultChanged {
                result: RoundResult::InProgress,
            });
        }

        if !keep_score && let Some(score) = self.score.as_mut() {
            score.reset();
            events.push(GameEvent::ScoreChanged { score: *score });
        }

        events
    }

    pub fn status_text(&self) -> String {
        if let Some(winner) = self.match_winner() {
            return format!("Match Winner: {}", winner);
        }
        match self.result {
            RoundResult::Won { player, .. } => format!("Winner: {}", player),
            RoundResult::Draw => "Draw!".to_string(),
            RoundResult::InProgress => match self.mode {
                Mode::HumanVsComputer if self.current_player == COMPUTER_PLAYER => {
                    format!("Computer thinking ({})", COMPUTER_PLAYER)
                }
                Mode::HumanVsComputer => format!("Your turn ({})", self.current_player),
                Mode::HumanVsHuman => format!("Turn: {}", self.current_player),
            },
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board,
            current_player: self.current_player,
            mode: self.mode,
            difficulty: self.difficulty,
            starting_player: self.starting_player,
            result: self.result,
            score: self.score,
            match_winner: self.match_winner(),
            computer_to_move: self.prepare_computer_move().is_some(),
            round_generation: self.round_generation,
            status: self.status_text(),
        }
    }

    fn place_current(&mut self, index: usize) -> Vec<GameEvent> {
        if !self.is_round_active() {
            return Vec::new();
        }

        let player = self.current_player;
        if !self.board.place(index, player) {
            return Vec::new();
        }

        self.current_player = player.opponent();
        self.result = evaluate_result(&self.board);

        let mut events = vec![
            GameEvent::CellMarked { index, player },
            GameEvent::TurnChanged {
                player: self.current_player,
            },
        ];

        if self.result.is_finished() {
            events.push(GameEvent::RoundResultChanged {
                result: self.result,
            });
        }

        if let (Some(winner), Some(score)) = (self.result.winner(), self.score.as_mut())
            && score.record_win(winner)
        {
            events.push(GameEvent::ScoreChanged { score: *score });
            if let Some(match_winner) = score.winner() {
                events.push(GameEvent::MatchWinnerDeclared {
                    player: match_winner,
                });
            }
        }

        events
    }
}
