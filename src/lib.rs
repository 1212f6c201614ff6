//! # Codenames Arena
//!
//! A game engine for Codenames matches played entirely by AI agents, with play-by-play
//! state broadcast to spectators.
//!
//! It provides:
//! - The board model and the game rules ([`board`], [`game`])
//! - Validation of untrusted guesser output ([`guess_validator`]) and strict decoding of
//!   raw AI replies ([`decode`])
//! - One-turn orchestration with bounded retries ([`turn_orchestrator`])
//! - The match loop with a turn cap, stop / pause / resume and spectator events
//!   ([`match_runner`], [`control`], [`event`], [`observers`])
//! - Series of matches on worker threads with aggregated results ([`arena`])
//!
//! Language models, prompts and transports stay outside of this crate. They are plugged in
//! through the [`ClueProvider`](game_interface::ClueProvider),
//! [`GuessProvider`](game_interface::GuessProvider) and [`Observer`](game_interface::Observer)
//! traits. Providers are untrusted: a provider error aborts the match, an unusable guess is
//! re-requested a bounded number of times.
//!
//! # Documentation Overview
//!
//! - For the rules, see [`GameState::apply_guess`](game::GameState::apply_guess).
//! - For implementing players and spectators, see the [`game_interface`] module.
//! - For configuring turn caps, retries, logging and parallelism, see
//!   [`Configuration`](crate::configuration::Configuration).
//! - For running many matches and saving their history, see [`Arena`](arena::Arena).
//!
//! # Usage Example
//!
//! A single match between two (very naive) scripted teams:
//!
//! ```
//! use codenames_arena::prelude::*;
//!
//! /// Hints at every remaining card at once.
//! struct Greedy;
//!
//! impl ClueProvider for Greedy {
//!     fn get_clue(&mut self, request: &ClueRequest<'_>) -> anyhow::Result<Clue> {
//!         let count = request.board.remaining(request.team).len() as u32;
//!         Ok(Clue::new("EVERYTHING", count))
//!     }
//! }
//!
//! /// Picks the first face-down card.
//! struct First;
//!
//! impl GuessProvider for First {
//!     fn get_guess(&mut self, request: &GuessRequest<'_>) -> anyhow::Result<String> {
//!         Ok(request.board.unrevealed()[0].to_string())
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     let vocabulary = words(Theme::Classic);
//!     let game = GameState::new(vocabulary, Some(42))?;
//!     let players = MatchPlayers {
//!         red: TeamPlayers::new(Greedy, First),
//!         blue: TeamPlayers::new(Greedy, First),
//!     };
//!
//!     let mut runner = MatchRunner::new(game, players, Configuration::new())
//!         .with_observer(|event: &MatchEvent| println!("{}: {}", event.phase, event.last_action));
//!     let summary = runner.run()?;
//!
//!     assert!(summary.winner.is_some() || summary.outcome == MatchOutcome::Draw);
//!     println!("{}", summary.to_json()?);
//!     Ok(())
//! }
//! ```
#![warn(missing_docs)]

pub use anyhow;
pub mod arena;
pub mod board;
pub mod configuration;
pub mod control;
pub mod decode;
pub mod error;
pub mod event;
pub mod game;
pub mod game_interface;
pub mod guess_validator;
pub mod logger;
pub mod match_log;
pub mod match_runner;
pub mod observers;
pub mod turn_orchestrator;
pub mod vocabulary;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use codenames_arena::prelude::*;
/// ```
///
/// Includes:
/// - [`Configuration`](crate::configuration::Configuration)
/// - [`MatchRunner`](crate::match_runner::MatchRunner) and [`Arena`](crate::arena::Arena)
/// - the provider, observer and factory traits with their request types
/// - the game types and built-in vocabularies
pub mod prelude {
    pub use crate::arena::{Arena, ArenaReport};
    pub use crate::board::{Board, Team};
    pub use crate::configuration::Configuration;
    pub use crate::control::MatchControl;
    pub use crate::error::GameError;
    pub use crate::event::{MatchEvent, Phase};
    pub use crate::game::{Clue, GameState, GuessOutcome};
    pub use crate::game_interface::{
        ClueProvider, ClueRequest, GuessProvider, GuessRequest, MatchFactory, MatchPlayers,
        Observer, TeamPlayers,
    };
    pub use crate::match_runner::{MatchOutcome, MatchRunner, MatchSummary};
    pub use crate::observers::{ChannelObserver, ConsoleObserver};
    pub use crate::vocabulary::{words, Theme};
}
