//! Series of matches, one after the other or several at once.
//!
//! Each match is fully independent: its own [`GameState`], players, observers and log,
//! built from a [`MatchFactory`] on the calling thread and then moved to a worker
//! thread. Results come back over a channel. The only thing matches share is the
//! arena's [`MatchControl`].
//!
//! ```no_run
//! use codenames_arena::prelude::*;
//!
//! struct Factory;
//!
//! impl MatchFactory for Factory {
//!     fn players(&self, _match_number: usize) -> anyhow::Result<MatchPlayers> {
//!         unimplemented!("wire language model clients here")
//!     }
//! }
//!
//! let config = Configuration::from_env().with_parallel_matches(4);
//! let arena = Arena::new(Factory, config);
//! let report = arena.run(20).unwrap();
//! println!("red {} / blue {} / draws {}", report.red_wins, report.blue_wins, report.draws);
//! report.save_history("codenames_history.json").unwrap();
//! ```

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::thread;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, trace, warn};

use crate::board::Team;
use crate::configuration::Configuration;
use crate::control::MatchControl;
use crate::game::GameState;
use crate::game_interface::MatchFactory;
use crate::logger::init_logger;
use crate::match_runner::{MatchOutcome, MatchRunner, MatchSummary};
use crate::observers::panic_message;

/// A match that produced no summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFailure {
    /// Which match.
    pub match_number: usize,
    /// Human-readable reason.
    pub reason: String,
}

/// Results of [`Arena::run`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArenaReport {
    /// Most recent summaries, in completion order, at most `history_limit`.
    pub history: VecDeque<MatchSummary>,
    /// Matches that produced a summary.
    pub total_games: usize,
    /// Red wins.
    pub red_wins: usize,
    /// Blue wins.
    pub blue_wins: usize,
    /// Matches that hit the turn cap.
    pub draws: usize,
    /// Matches ended through the control handle.
    pub stopped: usize,
    /// Matches that failed to set up or were aborted by an error.
    pub aborted: usize,
    /// Why each aborted match failed.
    pub failures: Vec<MatchFailure>,
}

#[derive(Serialize)]
struct HistoryFile<'a> {
    total_games: usize,
    history: &'a VecDeque<MatchSummary>,
}

impl ArenaReport {
    fn record(&mut self, match_number: usize, result: Result<MatchSummary, String>, limit: usize) {
        match result {
            Ok(summary) => {
                self.total_games += 1;
                match summary.outcome {
                    MatchOutcome::Won(Team::Red) => self.red_wins += 1,
                    MatchOutcome::Won(_) => self.blue_wins += 1,
                    MatchOutcome::Draw => self.draws += 1,
                    MatchOutcome::Stopped => self.stopped += 1,
                }
                self.history.push_back(summary);
                while self.history.len() > limit {
                    self.history.pop_front();
                }
            }
            Err(reason) => {
                warn!(match_number, %reason, "match aborted");
                self.aborted += 1;
                self.failures.push(MatchFailure {
                    match_number,
                    reason,
                });
            }
        }
    }

    /// Writes `{ "total_games": .., "history": [..] }` as pretty JSON.
    ///
    /// # Errors
    /// Fails if the file cannot be written.
    pub fn save_history(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&HistoryFile {
            total_games: self.total_games,
            history: &self.history,
        })?;
        std::fs::write(path, json)
            .with_context(|| format!("writing match history to {}", path.display()))
    }
}

type WorkerResult = (usize, Result<MatchSummary, String>);

/// Runs series of matches built by a [`MatchFactory`].
pub struct Arena<F: MatchFactory> {
    factory: F,
    config: Configuration,
    control: MatchControl,
}

impl<F: MatchFactory> Arena<F> {
    /// Creates an arena. Installs the file logger when logging is enabled.
    #[instrument(skip_all)]
    pub fn new(factory: F, config: Configuration) -> Self {
        if config.log {
            if let Err(e) = init_logger() {
                eprintln!("codenames: logging disabled: {e:#}");
            }
        }
        trace!(?config);

        Arena {
            factory,
            config,
            control: MatchControl::new(),
        }
    }

    /// Handle stopping or pausing every match of this arena. Once stopped, no new match
    /// is started.
    pub fn control(&self) -> MatchControl {
        self.control.clone()
    }

    /// Plays `num_matches` matches, at most `parallel_matches` at a time.
    ///
    /// Matches that cannot be set up or that abort are counted in
    /// [`ArenaReport::aborted`]; the series goes on.
    ///
    /// # Errors
    /// Fails if a worker thread cannot be spawned or disappears.
    #[instrument(skip_all, fields(num_matches = num_matches))]
    pub fn run(&self, num_matches: usize) -> anyhow::Result<ArenaReport> {
        let (tx_result, rx_result) = mpsc::channel();
        let mut report = ArenaReport::default();
        let mut next = 1;
        let mut running = 0;

        loop {
            while running < self.config.parallel_matches
                && next <= num_matches
                && !self.control.is_stopped()
            {
                let match_number = next;
                next += 1;
                match self.prepare(match_number) {
                    Ok(runner) => {
                        Self::launch(match_number, runner, tx_result.clone())?;
                        running += 1;
                    }
                    Err(e) => {
                        let reason = format!("{e:#}");
                        report.record(match_number, Err(reason), self.config.history_limit);
                    }
                }
            }
            if running == 0 {
                break;
            }

            // not finished <=> match running <=> result to receive
            let (match_number, result) = rx_result
                .recv()
                .context("match workers disconnected")?;
            running -= 1;
            report.record(match_number, result, self.config.history_limit);
        }

        info!(
            total = report.total_games,
            red = report.red_wins,
            blue = report.blue_wins,
            draws = report.draws,
            aborted = report.aborted,
            "arena finished"
        );
        Ok(report)
    }

    fn prepare(&self, match_number: usize) -> anyhow::Result<MatchRunner> {
        let players = self
            .factory
            .players(match_number)
            .with_context(|| format!("building players for match {match_number}"))?;
        let vocabulary = self.factory.vocabulary(match_number);
        let seed = self
            .config
            .seed
            .map(|seed| seed.wrapping_add(match_number as u64 - 1));
        let game = GameState::new(&vocabulary, seed)
            .with_context(|| format!("building board for match {match_number}"))?;

        Ok(MatchRunner::new(game, players, self.config)
            .with_observers(self.factory.observers(match_number))
            .with_control(self.control.clone())
            .with_match_number(match_number))
    }

    fn launch(
        match_number: usize,
        mut runner: MatchRunner,
        tx_result: Sender<WorkerResult>,
    ) -> anyhow::Result<()> {
        thread::Builder::new()
            .name(format!("match-{match_number}"))
            .spawn(move || {
                let result = match catch_unwind(AssertUnwindSafe(|| runner.run())) {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(payload) => Err(format!(
                        "match panicked: {}",
                        panic_message(payload.as_ref())
                    )),
                };
                // the arena only stops listening once every worker reported
                let _ = tx_result.send((match_number, result));
            })
            .with_context(|| format!("spawning thread for match {match_number}"))?;
        Ok(())
    }
}
