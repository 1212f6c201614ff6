//! Turn ownership, clue recording, guess resolution and win detection.
//!
//! [`GameState`] is mutated only through [`GameState::record_clue`],
//! [`GameState::apply_guess`] and [`GameState::end_turn`]. Once the game is over every
//! mutator fails with [`GameError::GameOver`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{Board, Team};
use crate::error::GameError;

/// A spymaster's hint: one word and how many cards it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    /// The hint word.
    pub word: String,
    /// Number of related cards. Zero is a legal clue.
    pub number: u32,
    /// Optional explanation, shown to spectators only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl Clue {
    /// A clue without reasoning.
    pub fn new(word: impl Into<String>, number: u32) -> Self {
        Clue {
            word: word.into(),
            number,
            reasoning: None,
        }
    }

    /// Attaches the spymaster's reasoning.
    pub fn with_reasoning(self, reasoning: impl Into<String>) -> Self {
        Clue {
            reasoning: Some(reasoning.into()),
            ..self
        }
    }

    /// Guesses allowed for this clue: one more than its number.
    pub fn max_guesses(&self) -> u32 {
        self.number.saturating_add(1)
    }

    /// True when the clue word is itself a card on `board`, ignoring case.
    pub fn conflicts_with(&self, board: &Board) -> bool {
        board.find(self.word.trim()).is_some()
    }
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.word, self.number)
    }
}

/// One clue and the guesses made for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Team that gave the clue.
    pub team: Team,
    /// The clue as given.
    pub clue: Clue,
    /// Canonical card texts, in guessing order.
    pub guesses: Vec<String>,
}

/// What a single guess revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuessOutcome {
    /// One of the guessing team's own cards.
    Correct,
    /// A bystander.
    Neutral,
    /// A card of the opposing team.
    Opponent,
    /// The assassin; the guessing team loses.
    Assassin,
}

impl GuessOutcome {
    /// True for outcomes that hand the turn over without ending the game by themselves:
    /// a neutral card or an opposing card.
    pub fn is_wrong_team(self) -> bool {
        matches!(self, GuessOutcome::Neutral | GuessOutcome::Opponent)
    }
}

impl fmt::Display for GuessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GuessOutcome::Correct => "correct",
            GuessOutcome::Neutral => "neutral",
            GuessOutcome::Opponent => "opponent",
            GuessOutcome::Assassin => "assassin",
        };
        f.write_str(s)
    }
}

/// Result of [`GameState::apply_guess`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessResult {
    /// Whether the same team may guess again.
    pub continue_turn: bool,
    /// What the card was.
    pub outcome: GuessOutcome,
    /// Canonical text of the revealed card.
    pub word: String,
}

impl GuessResult {
    /// One-line description for logs and spectators.
    pub fn describe(&self, guessing_team: Team, winner: Option<Team>) -> String {
        match (self.outcome, winner) {
            (GuessOutcome::Assassin, Some(w)) => format!("ASSASSIN! {w} team wins!"),
            (_, Some(w)) => format!("All words found! {w} team wins!"),
            (GuessOutcome::Correct, None) => {
                format!("Correct! {} was {guessing_team}", self.word)
            }
            (GuessOutcome::Opponent, None) => match guessing_team.opponent() {
                Some(other) => format!("{} was {other}. Turn ends.", self.word),
                None => format!("{} was the other team's. Turn ends.", self.word),
            },
            (_, None) => format!("{} was {}. Turn ends.", self.word, self.outcome),
        }
    }
}

/// Snapshot of the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    /// Team to play.
    pub current_team: Team,
    /// Red cards still face down.
    pub remaining_red: usize,
    /// Blue cards still face down.
    pub remaining_blue: usize,
    /// Revealed words in board order.
    pub revealed_words: Vec<String>,
    /// Number of clues given so far.
    pub turn_count: usize,
    /// Whether the game has ended.
    pub game_over: bool,
    /// Winning team, if any.
    pub winner: Option<Team>,
}

/// Full state of one game.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current_team: Team,
    starting_team: Team,
    turn_history: Vec<TurnRecord>,
    clue_given: bool,
    game_over: bool,
    winner: Option<Team>,
}

impl GameState {
    /// Builds a board from `vocabulary` and starts a game on it.
    ///
    /// # Errors
    /// [`GameError::InsufficientVocabulary`] when fewer than 25 unique words are supplied.
    pub fn new<S: AsRef<str>>(vocabulary: &[S], seed: Option<u64>) -> Result<Self, GameError> {
        Ok(Self::from_board(Board::build(vocabulary, seed)?))
    }

    /// Starts a game on a prepared board; the nine-card team plays first.
    pub fn from_board(board: Board) -> Self {
        let starting_team = board.starting_team();
        GameState {
            board,
            current_team: starting_team,
            starting_team,
            turn_history: vec![],
            clue_given: false,
            game_over: false,
            winner: None,
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Team to play. Always red or blue.
    pub fn current_team(&self) -> Team {
        self.current_team
    }

    /// Team that played first.
    pub fn starting_team(&self) -> Team {
        self.starting_team
    }

    /// Every clue given so far, oldest first.
    pub fn turn_history(&self) -> &[TurnRecord] {
        &self.turn_history
    }

    /// Whether the game has ended. Never goes back to false.
    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Winning team, set at most once.
    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    /// Unrevealed words of `team`, in board order.
    pub fn remaining(&self, team: Team) -> Vec<&str> {
        self.board.remaining(team)
    }

    /// Opens a turn for the current team.
    ///
    /// The clue content is not checked here.
    ///
    /// # Errors
    /// [`GameError::GameOver`] after termination.
    pub fn record_clue(&mut self, clue: Clue) -> Result<(), GameError> {
        self.ensure_running()?;
        debug!(team = %self.current_team, %clue, "clue recorded");
        self.turn_history.push(TurnRecord {
            team: self.current_team,
            clue,
            guesses: vec![],
        });
        self.clue_given = true;
        Ok(())
    }

    /// Reveals `text` for the current team and resolves the outcome.
    ///
    /// Rules, first match wins:
    /// 1. assassin: the other team wins, the turn ends;
    /// 2. own card: the turn continues, unless it was the team's last card, which wins;
    /// 3. anything else ends the turn, even when it reveals the opponent's last card.
    ///
    /// # Errors
    /// [`GameError::GameOver`], [`GameError::NoActiveClue`], and the board errors
    /// [`GameError::WordNotFound`] / [`GameError::AlreadyRevealed`].
    pub fn apply_guess(&mut self, text: &str) -> Result<GuessResult, GameError> {
        self.ensure_running()?;
        if !self.clue_given {
            return Err(GameError::NoActiveClue);
        }

        let guessing_team = self.current_team;
        let card = self.board.reveal(text)?;
        let word = card.text().to_string();
        let card_team = card.team();

        if let Some(record) = self.turn_history.last_mut() {
            record.guesses.push(word.clone());
        }

        let (continue_turn, outcome) = if card_team == Team::Assassin {
            self.finish(guessing_team.opponent());
            (false, GuessOutcome::Assassin)
        } else if card_team == guessing_team {
            if self.board.remaining_count(guessing_team) == 0 {
                self.finish(Some(guessing_team));
                (false, GuessOutcome::Correct)
            } else {
                (true, GuessOutcome::Correct)
            }
        } else if card_team == Team::Neutral {
            (false, GuessOutcome::Neutral)
        } else {
            (false, GuessOutcome::Opponent)
        };

        debug!(team = %guessing_team, %word, %outcome, continue_turn, "guess applied");
        Ok(GuessResult {
            continue_turn,
            outcome,
            word,
        })
    }

    /// Hands the turn to the other team.
    ///
    /// # Errors
    /// [`GameError::GameOver`] after termination.
    pub fn end_turn(&mut self) -> Result<(), GameError> {
        self.ensure_running()?;
        if let Some(next) = self.current_team.opponent() {
            self.current_team = next;
        }
        self.clue_given = false;
        Ok(())
    }

    /// Scoreboard snapshot.
    pub fn stats(&self) -> GameStats {
        GameStats {
            current_team: self.current_team,
            remaining_red: self.board.remaining_count(Team::Red),
            remaining_blue: self.board.remaining_count(Team::Blue),
            revealed_words: self.board.revealed().into_iter().map(String::from).collect(),
            turn_count: self.turn_history.len(),
            game_over: self.game_over,
            winner: self.winner,
        }
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if self.game_over {
            Err(GameError::GameOver)
        } else {
            Ok(())
        }
    }

    fn finish(&mut self, winner: Option<Team>) {
        self.game_over = true;
        if self.winner.is_none() {
            self.winner = winner;
        }
        info!(winner = ?self.winner, "game over");
    }
}
