//! Drives one team's turn: clue, guesses, validation and retries.
//!
//! Providers are the only fallible external calls. A provider error aborts the turn and
//! is returned as [`GameError::Provider`]; an unusable guess is re-requested up to
//! [`Configuration::guess_attempts`] times, after which the turn simply ends.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::board::Team;
use crate::configuration::Configuration;
use crate::error::{GameError, InvalidGuess, Role};
use crate::event::{MatchEvent, Phase};
use crate::game::{Clue, GameState, GuessOutcome};
use crate::game_interface::{ClueRequest, GuessProvider, GuessRequest, MatchPlayers};
use crate::guess_validator::validate_guess;
use crate::match_log::MatchLog;
use crate::observers::ObserverSet;

/// System message logged when a guesser runs out of attempts.
pub const NO_VALID_GUESS: &str = "Guesser failed to provide a valid board word. Turn ends.";

/// Why a turn stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnEnd {
    /// Every allowed guess was correct.
    GuessesExhausted,
    /// A neutral or opponent card was revealed.
    WrongGuess,
    /// The guesser never produced a usable word.
    NoValidGuess,
    /// The clue was a board word and strict clues are enabled.
    ClueRefused,
    /// The game ended during the turn.
    GameOver,
}

/// What happened during a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Team that played.
    pub team: Team,
    /// Clue given, even if refused.
    pub clue: Clue,
    /// Revealed cards, in order.
    pub guesses: Vec<(String, GuessOutcome)>,
    /// Why the turn stopped.
    pub end: TurnEnd,
}

/// Plays turns against a game it borrows from the match loop.
pub struct TurnOrchestrator<'a> {
    game: &'a mut GameState,
    log: &'a mut MatchLog,
    observers: &'a mut ObserverSet,
    config: &'a Configuration,
    match_number: usize,
}

impl<'a> TurnOrchestrator<'a> {
    /// Borrows everything a turn mutates.
    pub fn new(
        game: &'a mut GameState,
        log: &'a mut MatchLog,
        observers: &'a mut ObserverSet,
        config: &'a Configuration,
    ) -> Self {
        TurnOrchestrator {
            game,
            log,
            observers,
            config,
            match_number: 1,
        }
    }

    /// Match number put in events.
    pub fn with_match_number(mut self, match_number: usize) -> Self {
        self.match_number = match_number;
        self
    }

    /// Plays one full turn for the current team.
    ///
    /// Unless the game ended, the turn is handed to the other team afterwards, whatever
    /// the reason the turn stopped.
    ///
    /// # Errors
    /// [`GameError::Provider`] when a provider fails, [`GameError::GameOver`] when the
    /// game had already ended.
    #[instrument(skip_all, fields(match_number = self.match_number, team = %self.game.current_team()))]
    pub fn play_turn(&mut self, players: &mut MatchPlayers) -> Result<TurnReport, GameError> {
        if self.game.is_over() {
            return Err(GameError::GameOver);
        }
        let team = self.game.current_team();
        let players = match team {
            Team::Blue => &mut players.blue,
            _ => &mut players.red,
        };
        let spymaster = players.spymaster.name().to_string();

        self.notify(
            Phase::Thinking,
            format!("{team} spymaster is thinking..."),
            None,
        );
        let clue = players
            .spymaster
            .get_clue(&ClueRequest {
                team,
                board: self.game.board().spymaster_view(),
                log: &*self.log,
            })
            .map_err(|e| GameError::provider(Role::Spymaster, team, e))?;

        if self.config.strict_clues && clue.conflicts_with(self.game.board()) {
            let message = format!(
                "Clue '{}' is a word on the board and was refused. {team} team loses its turn.",
                clue.word
            );
            warn!(%clue, "clue refused");
            self.log.system(message.as_str());
            self.game.end_turn()?;
            self.notify(Phase::Thinking, message, None);
            return Ok(TurnReport {
                team,
                clue,
                guesses: vec![],
                end: TurnEnd::ClueRefused,
            });
        }

        if let Some(reasoning) = &clue.reasoning {
            self.log.think(&spymaster, team, reasoning.as_str());
        }
        self.log.say(&spymaster, team, format!("Clue: {clue}"));
        self.game.record_clue(clue.clone())?;
        info!(%clue, "clue given");
        self.notify(
            Phase::Guessing,
            format!("{team} spymaster gives clue: {clue}"),
            clue.reasoning.clone(),
        );

        let guesser = players.guesser.as_mut();
        let max_guesses = clue.max_guesses();
        let mut guesses = vec![];
        let mut end = TurnEnd::GuessesExhausted;
        for used in 0..max_guesses {
            let Some(word) = self.request_valid_guess(&mut *guesser, team, &clue, max_guesses - used)?
            else {
                self.log.system(NO_VALID_GUESS);
                self.notify(Phase::Guessing, NO_VALID_GUESS, None);
                end = TurnEnd::NoValidGuess;
                break;
            };

            self.log.say(guesser.name(), team, format!("I guess: {word}"));
            let result = self.game.apply_guess(&word)?;
            let description = result.describe(team, self.game.winner());
            self.log.system(description.as_str());
            self.notify(Phase::Guessing, description, None);
            guesses.push((result.word, result.outcome));

            if !result.continue_turn {
                end = if self.game.is_over() {
                    TurnEnd::GameOver
                } else {
                    TurnEnd::WrongGuess
                };
                break;
            }
        }

        if !self.game.is_over() {
            self.game.end_turn()?;
        }
        debug!(?end, guesses = guesses.len(), "turn over");
        Ok(TurnReport {
            team,
            clue,
            guesses,
            end,
        })
    }

    /// Asks for a guess until one resolves to an unrevealed card, at most
    /// `guess_attempts` times. `None` when every attempt was invalid.
    fn request_valid_guess(
        &mut self,
        guesser: &mut (dyn GuessProvider + Send),
        team: Team,
        clue: &Clue,
        guesses_left: u32,
    ) -> Result<Option<String>, GameError> {
        let attempts = self.config.guess_attempts.max(1);
        let mut rejection: Option<InvalidGuess> = None;
        for attempt in 1..=attempts {
            let raw = guesser
                .get_guess(&GuessRequest {
                    team,
                    board: self.game.board().guesser_view(),
                    clue,
                    guesses_left,
                    attempt,
                    rejection: rejection.as_ref(),
                    log: &*self.log,
                })
                .map_err(|e| GameError::provider(Role::Guesser, team, e))?;

            match validate_guess(&raw, self.game.board()) {
                Ok(word) => return Ok(Some(word)),
                Err(invalid) => {
                    debug!(attempt, %invalid, "invalid guess");
                    self.log.system(format!(
                        "Invalid guess attempt ({attempt}/{attempts}): {}",
                        invalid.feedback()
                    ));
                    rejection = Some(invalid);
                }
            }
        }
        warn!(attempts, "no valid guess");
        Ok(None)
    }

    fn notify(&mut self, phase: Phase, action: impl Into<String>, reasoning: Option<String>) {
        let event = MatchEvent::capture(self.match_number, phase, &*self.game, action)
            .with_reasoning(reasoning);
        self.observers.notify(&event);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use anyhow::anyhow;

    use super::*;
    use crate::board::fixed_board;
    use crate::game_interface::{ClueProvider, TeamPlayers};

    struct Spymaster(VecDeque<Clue>);

    impl ClueProvider for Spymaster {
        fn get_clue(&mut self, _request: &ClueRequest<'_>) -> anyhow::Result<Clue> {
            self.0.pop_front().ok_or_else(|| anyhow!("out of clues"))
        }
    }

    #[derive(Default)]
    struct Guesser {
        replies: VecDeque<&'static str>,
        calls: usize,
        saw_rejection: bool,
    }

    impl GuessProvider for Guesser {
        fn get_guess(&mut self, request: &GuessRequest<'_>) -> anyhow::Result<String> {
            self.calls += 1;
            self.saw_rejection |= request.rejection.is_some();
            Ok(self.replies.pop_front().unwrap_or("NOT A CARD").to_string())
        }
    }

    fn players(clue: Clue, replies: &[&'static str]) -> MatchPlayers {
        let red = TeamPlayers::new(
            Spymaster(VecDeque::from([clue])),
            Guesser {
                replies: replies.iter().copied().collect(),
                ..Guesser::default()
            },
        );
        let blue = TeamPlayers::new(Spymaster(VecDeque::new()), Guesser::default());
        MatchPlayers { red, blue }
    }

    fn play(
        game: &mut GameState,
        players: &mut MatchPlayers,
        config: Configuration,
    ) -> (Result<TurnReport, GameError>, MatchLog) {
        let mut log = MatchLog::new();
        let mut observers = ObserverSet::new();
        let report = TurnOrchestrator::new(game, &mut log, &mut observers, &config)
            .play_turn(players);
        (report, log)
    }

    #[test]
    fn stops_after_number_plus_one() {
        let mut game = GameState::from_board(fixed_board());
        let mut players = players(Clue::new("COLOUR", 1), &["RED0", "red1", "RED2"]);
        let (report, _) = play(&mut game, &mut players, Configuration::new());
        let report = report.unwrap();

        assert_eq!(report.end, TurnEnd::GuessesExhausted);
        assert_eq!(report.guesses.len(), 2);
        assert_eq!(game.turn_history()[0].guesses, vec!["RED0", "RED1"]);
        assert_eq!(game.current_team(), Team::Blue);
    }

    #[test]
    fn wrong_guess_ends_turn() {
        let mut game = GameState::from_board(fixed_board());
        let mut players = players(Clue::new("COLOUR", 3), &["NEUTRAL0", "RED0"]);
        let (report, log) = play(&mut game, &mut players, Configuration::new());
        let report = report.unwrap();

        assert_eq!(report.end, TurnEnd::WrongGuess);
        assert_eq!(report.guesses, vec![("NEUTRAL0".to_string(), GuessOutcome::Neutral)]);
        assert_eq!(game.current_team(), Team::Blue);
        assert_eq!(log.last_public_message(), Some("NEUTRAL0 was neutral. Turn ends."));
    }

    #[test]
    fn invalid_guesses_are_retried_then_forfeit() {
        let mut game = GameState::from_board(fixed_board());
        let mut players = players(Clue::new("COLOUR", 0), &["ocean", "", "RED 0?"]);
        let (report, log) = play(&mut game, &mut players, Configuration::new());

        // "RED 0?" is letters-only ambiguous with every RED card
        assert_eq!(report.unwrap().end, TurnEnd::NoValidGuess);
        assert_eq!(log.last_public_message(), Some(NO_VALID_GUESS));
        assert!(log
            .public()
            .any(|e| e.message.starts_with("Invalid guess attempt (3/3)")));
        assert_eq!(game.turn_history()[0].guesses.len(), 0);
        assert_eq!(game.current_team(), Team::Blue);
        assert!(!game.is_over());
    }

    #[test]
    fn retry_recovers() {
        let mut game = GameState::from_board(fixed_board());
        let mut players = players(Clue::new("COLOUR", 0), &["nope", "Red4"]);
        let (report, _) = play(&mut game, &mut players, Configuration::new());

        assert_eq!(
            report.unwrap().guesses,
            vec![("RED4".to_string(), GuessOutcome::Correct)]
        );
    }

    #[test]
    fn attempts_follow_configuration() {
        let mut game = GameState::from_board(fixed_board());
        let mut players = players(Clue::new("COLOUR", 0), &[]);
        let config = Configuration::new().with_guess_attempts(5);
        let (_, log) = play(&mut game, &mut players, config);
        assert_eq!(
            log.public()
                .filter(|e| e.message.starts_with("Invalid guess attempt"))
                .count(),
            5
        );
    }

    #[test]
    fn strict_mode_refuses_board_word() {
        let mut game = GameState::from_board(fixed_board());
        let mut players = players(Clue::new("red3", 2), &["RED0"]);
        let config = Configuration::new().with_strict_clues(true);
        let (report, _) = play(&mut game, &mut players, config);

        assert_eq!(report.unwrap().end, TurnEnd::ClueRefused);
        assert!(game.turn_history().is_empty());
        assert_eq!(game.current_team(), Team::Blue);
    }

    #[test]
    fn assassin_ends_game_without_end_turn() {
        let mut game = GameState::from_board(fixed_board());
        let mut players = players(Clue::new("DANGER", 2), &["RED0", "assassin"]);
        let (report, _) = play(&mut game, &mut players, Configuration::new());

        assert_eq!(report.unwrap().end, TurnEnd::GameOver);
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Team::Blue));
        assert_eq!(game.current_team(), Team::Red);
    }

    #[test]
    fn clue_failure_is_a_provider_error() {
        let mut game = GameState::from_board(fixed_board());
        game.end_turn().unwrap();
        let mut players = players(Clue::new("UNUSED", 1), &[]);
        let (report, _) = play(&mut game, &mut players, Configuration::new());

        match report {
            Err(GameError::Provider { role, team, message }) => {
                assert_eq!(role, Role::Spymaster);
                assert_eq!(team, Team::Blue);
                assert_eq!(message, "out of clues");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(game.turn_history().is_empty());
    }
}
