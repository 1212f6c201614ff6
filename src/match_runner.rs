//! Runs a whole match: turns until a winner, the turn cap, or a stop request.
//!
//! ```text
//! STARTING -> (THINKING -> GUESSING)* -> ENDED
//!                                     \-> ABORTED (provider error)
//! ```
//!
//! A [`MatchRunner`] owns the game, the players, the observers and the match log. It is
//! the only writer of all of them; providers get read-only views.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{debug, error, info, instrument};

use crate::board::Team;
use crate::configuration::Configuration;
use crate::control::{MatchControl, Resume};
use crate::error::GameError;
use crate::event::{MatchEvent, Phase};
use crate::game::GameState;
use crate::game_interface::{MatchPlayers, Observer};
use crate::match_log::MatchLog;
use crate::observers::{ConsoleObserver, ObserverSet};
use crate::turn_orchestrator::TurnOrchestrator;

/// How a match that was not aborted ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "team", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// A team won.
    Won(Team),
    /// The turn cap was reached first.
    Draw,
    /// Stopped through the [`MatchControl`].
    Stopped,
}

impl MatchOutcome {
    /// The winning team, if any.
    pub fn winner(self) -> Option<Team> {
        match self {
            MatchOutcome::Won(team) => Some(team),
            MatchOutcome::Draw | MatchOutcome::Stopped => None,
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::Won(team) => write!(f, "{team} wins"),
            MatchOutcome::Draw => f.write_str("draw"),
            MatchOutcome::Stopped => f.write_str("stopped"),
        }
    }
}

/// Serializable record of a finished match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Which match of a series this was.
    pub match_number: usize,
    /// When it ended, RFC 3339 in UTC.
    pub timestamp: String,
    /// How it ended.
    pub outcome: MatchOutcome,
    /// Same as `outcome.winner()`.
    pub winner: Option<Team>,
    /// Clues recorded.
    pub turn_count: usize,
    /// Turns run, refused clues included.
    pub turns_played: usize,
    /// Red cards left face down.
    pub remaining_red: usize,
    /// Blue cards left face down.
    pub remaining_blue: usize,
}

impl MatchSummary {
    /// JSON encoding for external storage.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Owns and runs one match.
pub struct MatchRunner {
    game: GameState,
    players: MatchPlayers,
    observers: ObserverSet,
    log: MatchLog,
    control: MatchControl,
    config: Configuration,
    match_number: usize,
    turns_played: usize,
}

impl MatchRunner {
    /// Prepares a match on `game`. Verbose configurations print progress to stdout.
    pub fn new(game: GameState, players: MatchPlayers, config: Configuration) -> Self {
        let mut observers = ObserverSet::new();
        if config.verbose {
            observers.push(ConsoleObserver);
        }
        MatchRunner {
            game,
            players,
            observers,
            log: MatchLog::new(),
            control: MatchControl::new(),
            config,
            match_number: 1,
            turns_played: 0,
        }
    }

    /// Registers an observer after the existing ones.
    pub fn with_observer(mut self, observer: impl Observer + Send + 'static) -> Self {
        self.observers.push(observer);
        self
    }

    /// Registers boxed observers after the existing ones.
    pub fn with_observers(mut self, observers: Vec<Box<dyn Observer + Send>>) -> Self {
        for observer in observers {
            self.observers.push_boxed(observer);
        }
        self
    }

    /// Shares `control` with this match instead of a private one.
    pub fn with_control(mut self, control: MatchControl) -> Self {
        self.control = control;
        self
    }

    /// Number of the match within a series, starting at 1.
    pub fn with_match_number(mut self, match_number: usize) -> Self {
        self.match_number = match_number;
        self
    }

    /// A handle to stop or pause this match from another thread.
    pub fn control(&self) -> MatchControl {
        self.control.clone()
    }

    /// The game, in whatever state the match left it.
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// The match conversation.
    pub fn log(&self) -> &MatchLog {
        &self.log
    }

    /// Turns run so far.
    pub fn turns_played(&self) -> usize {
        self.turns_played
    }

    /// Plays until the game ends, `max_turns` turns were run, or a stop request.
    ///
    /// Emits `Starting`, then the turn events, then `Ended` (or `Aborted`).
    ///
    /// # Errors
    /// A provider failure aborts the match: an `Aborted` event carrying the reason is
    /// emitted and the error returned. [`game`](Self::game) and [`log`](Self::log) keep
    /// the state reached.
    #[instrument(skip_all, fields(match_number = self.match_number))]
    pub fn run(&mut self) -> Result<MatchSummary, GameError> {
        let intro = format!(
            "Game {} starting! {}. {} team goes first.",
            self.match_number,
            self.players.describe(),
            self.game.starting_team()
        );
        info!(starting_team = %self.game.starting_team(), "match starting");
        self.log.system(intro.as_str());
        self.notify(Phase::Starting, intro);

        match self.play() {
            Ok(outcome) => {
                let message = match outcome {
                    MatchOutcome::Won(team) => format!("Game over! {team} team wins!"),
                    MatchOutcome::Draw => format!(
                        "Turn limit of {} reached. The game is a draw.",
                        self.config.max_turns
                    ),
                    MatchOutcome::Stopped => "Game stopped.".to_string(),
                };
                info!(%outcome, turns = self.turns_played, "match ended");
                self.log.system(message.as_str());
                self.notify(Phase::Ended, message);
                Ok(self.summary(outcome))
            }
            Err(err) => {
                let reason = format!("Game aborted: {err}");
                error!(%err, turns = self.turns_played, "match aborted");
                self.log.system(reason.as_str());
                self.notify(Phase::Aborted, reason);
                Err(err)
            }
        }
    }

    fn play(&mut self) -> Result<MatchOutcome, GameError> {
        loop {
            if self.game.is_over() {
                return Ok(match self.game.winner() {
                    Some(team) => MatchOutcome::Won(team),
                    None => MatchOutcome::Draw,
                });
            }
            if self.control.is_stopped() {
                return Ok(MatchOutcome::Stopped);
            }
            if self.control.is_paused() {
                self.notify(Phase::Paused, "Game paused");
                if self.control.wait_while_paused() == Resume::Stop {
                    return Ok(MatchOutcome::Stopped);
                }
                debug!("resumed");
            }
            if self.turns_played >= self.config.max_turns {
                return Ok(MatchOutcome::Draw);
            }

            self.turns_played += 1;
            TurnOrchestrator::new(
                &mut self.game,
                &mut self.log,
                &mut self.observers,
                &self.config,
            )
            .with_match_number(self.match_number)
            .play_turn(&mut self.players)?;
        }
    }

    fn summary(&self, outcome: MatchOutcome) -> MatchSummary {
        let board = self.game.board();
        MatchSummary {
            match_number: self.match_number,
            timestamp: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
            outcome,
            winner: outcome.winner(),
            turn_count: self.game.turn_history().len(),
            turns_played: self.turns_played,
            remaining_red: board.remaining_count(Team::Red),
            remaining_blue: board.remaining_count(Team::Blue),
        }
    }

    fn notify(&mut self, phase: Phase, action: impl Into<String>) {
        let event = MatchEvent::capture(self.match_number, phase, &self.game, action);
        self.observers.notify(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fixed_board;
    use crate::game::Clue;
    use crate::game_interface::{
        ClueProvider, ClueRequest, GuessProvider, GuessRequest, TeamPlayers,
    };

    /// Always clues 0 and guesses a neutral card, so nobody ever wins.
    struct Stalling;

    impl ClueProvider for Stalling {
        fn get_clue(&mut self, _request: &ClueRequest<'_>) -> anyhow::Result<Clue> {
            Ok(Clue::new("NOTHING", 0))
        }
    }

    impl GuessProvider for Stalling {
        fn get_guess(&mut self, request: &GuessRequest<'_>) -> anyhow::Result<String> {
            let card = request
                .board
                .unrevealed()
                .into_iter()
                .find(|w| w.starts_with("NEUTRAL"));
            // once neutrals run out, keep answering nonsense
            Ok(card.unwrap_or("???").to_string())
        }
    }

    fn stalling_players() -> MatchPlayers {
        MatchPlayers {
            red: TeamPlayers::new(Stalling, Stalling),
            blue: TeamPlayers::new(Stalling, Stalling),
        }
    }

    #[test]
    fn turn_cap_is_a_draw() {
        let config = Configuration::new().with_max_turns(10);
        let mut runner =
            MatchRunner::new(GameState::from_board(fixed_board()), stalling_players(), config);
        let summary = runner.run().unwrap();

        assert_eq!(summary.outcome, MatchOutcome::Draw);
        assert_eq!(summary.winner, None);
        assert_eq!(summary.turns_played, 10);
        assert_eq!(summary.turn_count, 10);
        assert!(!runner.game().is_over());
        assert!(runner
            .log()
            .last_public_message()
            .unwrap()
            .contains("draw"));
    }

    #[test]
    fn stop_before_start_ends_without_turns() {
        let mut runner = MatchRunner::new(
            GameState::from_board(fixed_board()),
            stalling_players(),
            Configuration::new(),
        );
        runner.control().stop();
        let summary = runner.run().unwrap();

        assert_eq!(summary.outcome, MatchOutcome::Stopped);
        assert_eq!(summary.turns_played, 0);
        assert_eq!(summary.remaining_red, 9);
    }

    #[test]
    fn summary_serializes_outcome() {
        let summary = MatchSummary {
            match_number: 3,
            timestamp: "2025-01-01T00:00:00Z".to_string(),
            outcome: MatchOutcome::Won(Team::Blue),
            winner: Some(Team::Blue),
            turn_count: 4,
            turns_played: 4,
            remaining_red: 2,
            remaining_blue: 0,
        };
        let json = summary.to_json().unwrap();
        assert!(json.contains(r#""outcome":{"kind":"won","team":"blue"}"#));
        assert!(json.contains(r#""winner":"blue""#));
        assert_eq!(MatchOutcome::Draw.to_string(), "draw");
    }
}
