//! The 25-card board: team assignment, reveal tracking and role-specific views.
//!
//! A board is built once per game, either by sampling a vocabulary ([`Board::build`]) or
//! from an explicit layout ([`Board::from_cards`]). Afterwards the only mutation is
//! [`Board::reveal`], which flips a card face up exactly once.

use std::collections::HashSet;
use std::fmt;

use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::GameError;

/// Number of cards on a board.
pub const BOARD_SIZE: usize = 25;
/// Cards per row when the board is displayed as a grid.
pub const GRID_WIDTH: usize = 5;

const STARTING_TEAM_CARDS: usize = 9;
const OTHER_TEAM_CARDS: usize = 8;
const NEUTRAL_CARDS: usize = 7;
const ASSASSIN_CARDS: usize = 1;

/// Card affiliation. Only [`Team::Red`] and [`Team::Blue`] ever play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// First friendly team.
    Red,
    /// Second friendly team.
    Blue,
    /// Bystander cards, ending the turn when guessed.
    Neutral,
    /// The single card that loses the game for whoever guesses it.
    Assassin,
}

impl Team {
    /// The two teams that take turns.
    pub const PLAYING: [Team; 2] = [Team::Red, Team::Blue];

    /// The opposing friendly team, or `None` for neutral and assassin.
    pub fn opponent(self) -> Option<Team> {
        match self {
            Team::Red => Some(Team::Blue),
            Team::Blue => Some(Team::Red),
            Team::Neutral | Team::Assassin => None,
        }
    }

    /// True for red and blue.
    pub fn is_playing(self) -> bool {
        matches!(self, Team::Red | Team::Blue)
    }

    /// Upper-case initial used in spymaster grids.
    pub fn initial(self) -> char {
        match self {
            Team::Red => 'R',
            Team::Blue => 'B',
            Team::Neutral => 'N',
            Team::Assassin => 'A',
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Team::Red => "red",
            Team::Blue => "blue",
            Team::Neutral => "neutral",
            Team::Assassin => "assassin",
        };
        f.write_str(s)
    }
}

/// One word on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    text: String,
    team: Team,
    revealed: bool,
}

impl Card {
    /// A face-down card.
    pub fn new(text: impl Into<String>, team: Team) -> Self {
        Card {
            text: text.into(),
            team,
            revealed: false,
        }
    }

    /// Canonical text, as sampled from the vocabulary.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Hidden affiliation.
    pub fn team(&self) -> Team {
        self.team
    }

    /// True once guessed.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
}

/// The ordered set of 25 cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
    starting_team: Team,
}

impl Board {
    /// Samples 25 distinct words and deals the 9/8/7/1 team labels over them.
    ///
    /// Blank entries and duplicates (ignoring case and surrounding whitespace) are dropped
    /// first. With `seed` set the board, including which team starts, is reproducible.
    ///
    /// # Errors
    /// [`GameError::InsufficientVocabulary`] when fewer than 25 unique words remain.
    pub fn build<S: AsRef<str>>(vocabulary: &[S], seed: Option<u64>) -> Result<Board, GameError> {
        let words = unique_words(vocabulary);
        if words.len() < BOARD_SIZE {
            return Err(GameError::InsufficientVocabulary { found: words.len() });
        }

        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };

        let picked = index::sample(&mut rng, words.len(), BOARD_SIZE);
        let starting_team = if rng.random_bool(0.5) {
            Team::Red
        } else {
            Team::Blue
        };
        let mut labels = label_distribution(starting_team);
        labels.shuffle(&mut rng);

        let cards = picked
            .into_iter()
            .zip(labels)
            .map(|(i, team)| Card::new(words[i], team))
            .collect::<Vec<_>>();

        debug!(?seed, %starting_team, "board built");
        Ok(Board {
            cards,
            starting_team,
        })
    }

    /// Builds a board from an explicit layout, e.g. to replay a recorded game.
    ///
    /// The team holding nine cards starts.
    ///
    /// # Errors
    /// [`GameError::InvalidLayout`] when the card count, the team distribution or text
    /// uniqueness is wrong, or when a card is already revealed.
    pub fn from_cards(cards: Vec<Card>) -> Result<Board, GameError> {
        if cards.len() != BOARD_SIZE {
            return Err(GameError::InvalidLayout(format!(
                "expected {BOARD_SIZE} cards, got {}",
                cards.len()
            )));
        }

        let mut seen = HashSet::new();
        for card in &cards {
            if card.text.trim().is_empty() {
                return Err(GameError::InvalidLayout("blank card text".to_string()));
            }
            if !seen.insert(card.text.to_lowercase()) {
                return Err(GameError::InvalidLayout(format!(
                    "'{}' appears more than once",
                    card.text
                )));
            }
            if card.revealed {
                return Err(GameError::InvalidLayout(format!(
                    "'{}' is already revealed",
                    card.text
                )));
            }
        }

        let count = |team: Team| cards.iter().filter(|c| c.team == team).count();
        let (red, blue) = (count(Team::Red), count(Team::Blue));
        let starting_team = match (red, blue) {
            (STARTING_TEAM_CARDS, OTHER_TEAM_CARDS) => Team::Red,
            (OTHER_TEAM_CARDS, STARTING_TEAM_CARDS) => Team::Blue,
            _ => {
                return Err(GameError::InvalidLayout(format!(
                    "red/blue split must be 9/8, got {red}/{blue}"
                )))
            }
        };
        if count(Team::Neutral) != NEUTRAL_CARDS || count(Team::Assassin) != ASSASSIN_CARDS {
            return Err(GameError::InvalidLayout(
                "expected 7 neutral cards and 1 assassin".to_string(),
            ));
        }

        Ok(Board {
            cards,
            starting_team,
        })
    }

    /// The team dealt nine cards.
    pub fn starting_team(&self) -> Team {
        self.starting_team
    }

    /// All cards in board order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Unrevealed card texts of `team`, in board order.
    pub fn remaining(&self, team: Team) -> Vec<&str> {
        self.cards
            .iter()
            .filter(|c| c.team == team && !c.revealed)
            .map(|c| c.text.as_str())
            .collect()
    }

    /// Number of unrevealed cards of `team`.
    pub fn remaining_count(&self, team: Team) -> usize {
        self.cards
            .iter()
            .filter(|c| c.team == team && !c.revealed)
            .count()
    }

    /// Every unrevealed card text, in board order.
    pub fn unrevealed(&self) -> Vec<&str> {
        self.cards
            .iter()
            .filter(|c| !c.revealed)
            .map(|c| c.text.as_str())
            .collect()
    }

    /// Every revealed card text, in board order.
    pub fn revealed(&self) -> Vec<&str> {
        self.cards
            .iter()
            .filter(|c| c.revealed)
            .map(|c| c.text.as_str())
            .collect()
    }

    /// Looks up a card by text, ignoring case.
    pub fn find(&self, text: &str) -> Option<&Card> {
        let lowered = text.to_lowercase();
        self.cards.iter().find(|c| c.text.to_lowercase() == lowered)
    }

    /// Turns the card matching `text` (ignoring case) face up and returns it.
    ///
    /// Not idempotent: revealing the same word twice is an error.
    ///
    /// # Errors
    /// [`GameError::WordNotFound`] or [`GameError::AlreadyRevealed`].
    pub fn reveal(&mut self, text: &str) -> Result<&Card, GameError> {
        let lowered = text.to_lowercase();
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.text.to_lowercase() == lowered)
            .ok_or_else(|| GameError::WordNotFound(text.to_string()))?;

        if card.revealed {
            return Err(GameError::AlreadyRevealed(card.text.clone()));
        }
        card.revealed = true;
        trace!(word = %card.text, team = %card.team, "card revealed");
        Ok(card)
    }

    /// What a spymaster may see: every card with its team.
    pub fn spymaster_view(&self) -> SpymasterView<'_> {
        SpymasterView { board: self }
    }

    /// What a guesser may see: texts, and teams of revealed cards only.
    pub fn guesser_view(&self) -> GuesserView<'_> {
        GuesserView { board: self }
    }

    /// The board as a 5x5 grid of display strings.
    ///
    /// Revealed cards end with `✓`. In spymaster mode unrevealed cards carry their team
    /// initial, e.g. `OCEAN[R]`.
    pub fn grid(&self, spymaster: bool) -> Vec<Vec<String>> {
        self.cards
            .chunks(GRID_WIDTH)
            .map(|row| {
                row.iter()
                    .map(|card| {
                        if card.revealed {
                            format!("{}✓", card.text)
                        } else if spymaster {
                            format!("{}[{}]", card.text, card.team.initial())
                        } else {
                            card.text.clone()
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid(false) {
            writeln!(f, "{}", row.join(" | "))?;
        }
        Ok(())
    }
}

/// Full-knowledge view handed to clue providers.
#[derive(Debug, Clone, Copy)]
pub struct SpymasterView<'a> {
    board: &'a Board,
}

impl<'a> SpymasterView<'a> {
    /// Every card, team included.
    pub fn cards(&self) -> &'a [Card] {
        &self.board.cards
    }

    /// Unrevealed words of `team`.
    pub fn remaining(&self, team: Team) -> Vec<&'a str> {
        self.board.remaining(team)
    }

    /// Grid with team initials.
    pub fn grid(&self) -> Vec<Vec<String>> {
        self.board.grid(true)
    }
}

/// A card as a guesser sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleCard<'a> {
    /// Card text.
    pub text: &'a str,
    /// Whether the card is face up.
    pub revealed: bool,
    /// Known only once revealed.
    pub team: Option<Team>,
}

/// Restricted view handed to guess providers.
#[derive(Debug, Clone, Copy)]
pub struct GuesserView<'a> {
    board: &'a Board,
}

impl<'a> GuesserView<'a> {
    /// All cards, hiding the team of face-down ones.
    pub fn cards(&self) -> Vec<VisibleCard<'a>> {
        self.board
            .cards
            .iter()
            .map(|c| VisibleCard {
                text: &c.text,
                revealed: c.revealed,
                team: c.revealed.then_some(c.team),
            })
            .collect()
    }

    /// Words that can still be guessed.
    pub fn unrevealed(&self) -> Vec<&'a str> {
        self.board.unrevealed()
    }

    /// Grid without team information.
    pub fn grid(&self) -> Vec<Vec<String>> {
        self.board.grid(false)
    }
}

fn label_distribution(starting_team: Team) -> Vec<Team> {
    let other_team = starting_team.opponent().unwrap_or(Team::Blue);
    let mut labels = Vec::with_capacity(BOARD_SIZE);
    labels.extend(std::iter::repeat(starting_team).take(STARTING_TEAM_CARDS));
    labels.extend(std::iter::repeat(other_team).take(OTHER_TEAM_CARDS));
    labels.extend(std::iter::repeat(Team::Neutral).take(NEUTRAL_CARDS));
    labels.extend(std::iter::repeat(Team::Assassin).take(ASSASSIN_CARDS));
    labels
}

fn unique_words<S: AsRef<str>>(vocabulary: &[S]) -> Vec<&str> {
    let mut seen = HashSet::new();
    vocabulary
        .iter()
        .map(|w| w.as_ref().trim())
        .filter(|w| !w.is_empty() && seen.insert(w.to_lowercase()))
        .collect()
}

/// Red starts; cards are `RED0..RED8`, `BLUE0..BLUE7`, `NEUTRAL0..NEUTRAL6`, `ASSASSIN`.
#[cfg(test)]
pub(crate) fn fixed_board() -> Board {
    let mut cards = Vec::new();
    for i in 0..9 {
        cards.push(Card::new(format!("RED{i}"), Team::Red));
    }
    for i in 0..8 {
        cards.push(Card::new(format!("BLUE{i}"), Team::Blue));
    }
    for i in 0..7 {
        cards.push(Card::new(format!("NEUTRAL{i}"), Team::Neutral));
    }
    cards.push(Card::new("ASSASSIN", Team::Assassin));
    Board::from_cards(cards).unwrap()
}
