//! State-change notifications sent to observers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Team};
use crate::game::GameState;

/// Where a match stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Board dealt, no clue yet.
    Starting,
    /// A spymaster is working on a clue.
    Thinking,
    /// A guesser is working through a clue.
    Guessing,
    /// Held between turns by the match control.
    Paused,
    /// Finished normally: win, draw or stop.
    Ended,
    /// Terminated by an error.
    Aborted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Starting => "STARTING",
            Phase::Thinking => "THINKING",
            Phase::Guessing => "GUESSING",
            Phase::Paused => "PAUSED",
            Phase::Ended => "ENDED",
            Phase::Aborted => "ABORTED",
        };
        f.write_str(s)
    }
}

/// A card as spectators see it: everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSnapshot {
    /// Card text.
    pub text: String,
    /// Card team.
    pub team: Team,
    /// Whether it was guessed.
    pub revealed: bool,
}

/// Copies every card of `board`.
pub fn board_snapshot(board: &Board) -> Vec<CardSnapshot> {
    board
        .cards()
        .iter()
        .map(|c| CardSnapshot {
            text: c.text().to_string(),
            team: c.team(),
            revealed: c.is_revealed(),
        })
        .collect()
}

/// Everything a transport or visualization layer needs to render one state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Which match of a series this is, starting at 1.
    pub match_number: usize,
    /// Current phase.
    pub phase: Phase,
    /// Team to play.
    pub current_team: Team,
    /// Full board.
    pub board: Vec<CardSnapshot>,
    /// Human-readable description of what just happened.
    pub last_action: String,
    /// Reasoning attached to the last action, if any.
    pub last_reasoning: Option<String>,
    /// Clues given so far.
    pub turn_count: usize,
    /// Red cards still face down.
    pub remaining_red: usize,
    /// Blue cards still face down.
    pub remaining_blue: usize,
    /// Winner, once known.
    pub winner: Option<Team>,
    /// Whether the match is held by its control handle.
    pub paused: bool,
}

impl MatchEvent {
    /// Captures `game` in the given phase.
    pub fn capture(
        match_number: usize,
        phase: Phase,
        game: &GameState,
        last_action: impl Into<String>,
    ) -> Self {
        let board = game.board();
        MatchEvent {
            match_number,
            phase,
            current_team: game.current_team(),
            board: board_snapshot(board),
            last_action: last_action.into(),
            last_reasoning: None,
            turn_count: game.turn_history().len(),
            remaining_red: board.remaining_count(Team::Red),
            remaining_blue: board.remaining_count(Team::Blue),
            winner: game.winner(),
            paused: phase == Phase::Paused,
        }
    }

    /// Attaches reasoning.
    pub fn with_reasoning(mut self, reasoning: Option<String>) -> Self {
        self.last_reasoning = reasoning;
        self
    }

    /// JSON encoding for transports.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
