//! Error types shared by the board, the game state machine and the match loop.
//!
//! Failures of the external players are carried as [`GameError::Provider`]; everything
//! else is raised by the engine itself.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Team, BOARD_SIZE};

/// The two AI roles of a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Sees every card team and gives clues.
    Spymaster,
    /// Sees only card texts and guesses.
    Guesser,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Spymaster => write!(f, "spymaster"),
            Role::Guesser => write!(f, "guesser"),
        }
    }
}

/// Errors raised while building a board or driving a game.
#[derive(Debug, Error)]
pub enum GameError {
    /// Fewer than [`BOARD_SIZE`] unique words were supplied.
    #[error("vocabulary holds {found} unique words, at least {} are required", BOARD_SIZE)]
    InsufficientVocabulary {
        /// Number of unique, non-blank words found.
        found: usize,
    },

    /// A hand-built board does not respect the board rules.
    #[error("invalid board layout: {0}")]
    InvalidLayout(String),

    /// No card carries this text.
    #[error("'{0}' is not on the board")]
    WordNotFound(String),

    /// The card was revealed by an earlier guess.
    #[error("'{0}' has already been revealed")]
    AlreadyRevealed(String),

    /// A guess could not be mapped to an unrevealed card.
    #[error(transparent)]
    InvalidGuess(#[from] InvalidGuess),

    /// A mutator was called after the game ended.
    #[error("the game is over")]
    GameOver,

    /// A guess was applied before a clue was recorded for the current turn.
    #[error("no clue has been given for the current turn")]
    NoActiveClue,

    /// A clue or guess provider failed.
    #[error("{team} {role} failed: {message}")]
    Provider {
        /// Which role failed.
        role: Role,
        /// Team the provider was playing for.
        team: Team,
        /// Rendered error chain.
        message: String,
    },
}

impl GameError {
    pub(crate) fn provider(role: Role, team: Team, err: anyhow::Error) -> Self {
        GameError::Provider {
            role,
            team,
            message: format!("{err:#}"),
        }
    }
}

/// Why a raw guess was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidGuessReason {
    /// Nothing left after trimming.
    Empty,
    /// Matches no unrevealed card.
    NotOnBoard,
    /// Matches a card that is already face up.
    AlreadyRevealed,
    /// Matches several unrevealed cards once punctuation is ignored.
    Ambiguous,
}

impl fmt::Display for InvalidGuessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvalidGuessReason::Empty => "the guess is empty",
            InvalidGuessReason::NotOnBoard => "no unrevealed card matches",
            InvalidGuessReason::AlreadyRevealed => "that card is already revealed",
            InvalidGuessReason::Ambiguous => "several cards match",
        };
        f.write_str(s)
    }
}

/// A guess that does not name exactly one unrevealed card.
///
/// Carries the words that were still guessable so the rejection can be fed back to the
/// guesser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid guess '{raw_text}': {reason}")]
pub struct InvalidGuess {
    /// The untouched text returned by the guesser.
    pub raw_text: String,
    /// Unrevealed card texts at the time of the guess, in board order.
    pub visible_board: Vec<String>,
    /// What went wrong.
    pub reason: InvalidGuessReason,
}

impl InvalidGuess {
    /// Message suitable for re-prompting the guesser.
    pub fn feedback(&self) -> String {
        format!(
            "{self}. Choose a word exactly from the visible board: {}",
            self.visible_board.join(", ")
        )
    }
}
