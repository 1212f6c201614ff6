//! Traits the host implements to plug players and spectators into the engine.
//!
//! - [`ClueProvider`]: a spymaster, usually backed by a language model.
//! - [`GuessProvider`]: a guesser; its raw text is validated by the engine.
//! - [`Observer`]: receives a [`MatchEvent`] after every state change.
//! - [`MatchFactory`]: builds players, observers and vocabulary for each match of an arena.
//!
//! Providers are untrusted: any error they return aborts the match, and any text they
//! return is checked before it touches the game.

use crate::board::{GuesserView, SpymasterView, Team};
use crate::error::InvalidGuess;
use crate::event::MatchEvent;
use crate::game::Clue;
use crate::match_log::MatchLog;
use crate::vocabulary::{words, Theme};

/// What a spymaster is given.
#[derive(Debug, Clone, Copy)]
pub struct ClueRequest<'a> {
    /// Team the clue is for.
    pub team: Team,
    /// Full board, teams included.
    pub board: SpymasterView<'a>,
    /// Shared conversation so far.
    pub log: &'a MatchLog,
}

/// What a guesser is given.
#[derive(Debug, Clone, Copy)]
pub struct GuessRequest<'a> {
    /// Team guessing.
    pub team: Team,
    /// Board without hidden teams.
    pub board: GuesserView<'a>,
    /// Clue being answered.
    pub clue: &'a Clue,
    /// Guesses still allowed for this clue, this one included.
    pub guesses_left: u32,
    /// 1 for a first try, then 2, 3... after rejections.
    pub attempt: u32,
    /// Why the previous attempt was refused.
    pub rejection: Option<&'a InvalidGuess>,
    /// Shared conversation so far.
    pub log: &'a MatchLog,
}

/// A spymaster.
pub trait ClueProvider {
    /// Display name used in the match log.
    fn name(&self) -> &str {
        "Spymaster"
    }

    /// Produces a clue for `request.team`.
    ///
    /// # Errors
    /// Any error aborts the match; the engine never retries a clue.
    fn get_clue(&mut self, request: &ClueRequest<'_>) -> anyhow::Result<Clue>;
}

/// A guesser.
pub trait GuessProvider {
    /// Display name used in the match log.
    fn name(&self) -> &str {
        "Guesser"
    }

    /// Returns the raw text of one guess. Called again with
    /// [`GuessRequest::rejection`] set when the previous text was invalid.
    ///
    /// # Errors
    /// Any error aborts the match.
    fn get_guess(&mut self, request: &GuessRequest<'_>) -> anyhow::Result<String>;
}

/// A spectator of state changes.
///
/// Errors and panics are caught and logged by the engine; they never affect the game.
pub trait Observer {
    /// Called in registration order after each state change.
    fn notify(&mut self, event: &MatchEvent) -> anyhow::Result<()>;
}

impl<F: FnMut(&MatchEvent)> Observer for F {
    fn notify(&mut self, event: &MatchEvent) -> anyhow::Result<()> {
        self(event);
        Ok(())
    }
}

/// The two roles of one team.
pub struct TeamPlayers {
    /// Gives clues.
    pub spymaster: Box<dyn ClueProvider + Send>,
    /// Answers them.
    pub guesser: Box<dyn GuessProvider + Send>,
}

impl TeamPlayers {
    /// Boxes both roles.
    pub fn new(
        spymaster: impl ClueProvider + Send + 'static,
        guesser: impl GuessProvider + Send + 'static,
    ) -> Self {
        TeamPlayers {
            spymaster: Box::new(spymaster),
            guesser: Box::new(guesser),
        }
    }
}

/// Everyone playing one match.
pub struct MatchPlayers {
    /// Red team.
    pub red: TeamPlayers,
    /// Blue team.
    pub blue: TeamPlayers,
}

impl MatchPlayers {
    /// Players of `team`, `None` for neutral and assassin.
    pub fn team_mut(&mut self, team: Team) -> Option<&mut TeamPlayers> {
        match team {
            Team::Red => Some(&mut self.red),
            Team::Blue => Some(&mut self.blue),
            Team::Neutral | Team::Assassin => None,
        }
    }

    /// `"<red spymaster> vs <blue spymaster>"`.
    pub fn describe(&self) -> String {
        format!(
            "Red Team: {} vs Blue Team: {}",
            self.red.spymaster.name(),
            self.blue.spymaster.name()
        )
    }
}

/// What an arena needs to set up each match.
pub trait MatchFactory {
    /// Fresh players for match `match_number` (starting at 1).
    ///
    /// # Errors
    /// The match is skipped and counted as aborted.
    fn players(&self, match_number: usize) -> anyhow::Result<MatchPlayers>;

    /// Observers for match `match_number`. None by default.
    fn observers(&self, _match_number: usize) -> Vec<Box<dyn Observer + Send>> {
        Vec::new()
    }

    /// Words the board of match `match_number` is drawn from. The default theme by
    /// default.
    fn vocabulary(&self, _match_number: usize) -> Vec<String> {
        words(Theme::Default).iter().map(|w| w.to_string()).collect()
    }
}
