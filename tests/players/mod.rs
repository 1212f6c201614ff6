//! Scripted players and recording observers shared by the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail};
use codenames_arena::prelude::*;
use codenames_arena::vocabulary;
use tracing::{Level, Metadata};
use tracing_subscriber::{
    fmt,
    layer::{Context, Filter, SubscriberExt},
    Layer, Registry,
};

struct CustomLevelFilter;
impl<S> Filter<S> for CustomLevelFilter {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        meta.level() <= &Level::DEBUG
    }
}

pub fn init_debug_logger() {
    let format = tracing_subscriber::fmt::format()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_thread_names(true)
        .with_target(false);

    let reg = Registry::default().with(
        fmt::layer()
            .event_format(format)
            .with_filter(CustomLevelFilter),
    );

    let _ = tracing::subscriber::set_global_default(reg);
}

/// The first 25 words of the default theme.
pub fn small_vocabulary() -> Vec<String> {
    vocabulary::words(Theme::Default)
        .iter()
        .take(25)
        .map(|w| w.to_string())
        .collect()
}

/// Cards of `team` on the board, in board order.
pub fn cards_of(game: &GameState, team: Team) -> Vec<String> {
    game.board()
        .cards()
        .iter()
        .filter(|c| c.team() == team)
        .map(|c| c.text().to_string())
        .collect()
}

/// Players for `team` and its opponent, in the right slots.
pub fn seat(team: Team, players: TeamPlayers, opponents: TeamPlayers) -> MatchPlayers {
    match team {
        Team::Blue => MatchPlayers {
            red: opponents,
            blue: players,
        },
        _ => MatchPlayers {
            red: players,
            blue: opponents,
        },
    }
}

/// Gives clues from a list, then fails, or repeats one clue forever.
pub struct ScriptedSpymaster {
    clues: VecDeque<Clue>,
    repeat: Option<Clue>,
}

impl ScriptedSpymaster {
    pub fn new(clues: impl IntoIterator<Item = Clue>) -> Self {
        ScriptedSpymaster {
            clues: clues.into_iter().collect(),
            repeat: None,
        }
    }

    pub fn repeating(clue: Clue) -> Self {
        ScriptedSpymaster {
            clues: VecDeque::new(),
            repeat: Some(clue),
        }
    }
}

impl ClueProvider for ScriptedSpymaster {
    fn name(&self) -> &str {
        "Scripted spymaster"
    }

    fn get_clue(&mut self, _request: &ClueRequest<'_>) -> anyhow::Result<Clue> {
        match (self.clues.pop_front(), &self.repeat) {
            (Some(clue), _) => Ok(clue),
            (None, Some(clue)) => Ok(clue.clone()),
            (None, None) => bail!("no more clues"),
        }
    }
}

/// Every call fails.
pub struct FailingSpymaster(pub &'static str);

impl ClueProvider for FailingSpymaster {
    fn get_clue(&mut self, _request: &ClueRequest<'_>) -> anyhow::Result<Clue> {
        Err(anyhow!(self.0).context("requesting clue"))
    }
}

/// What a [`ScriptedGuesser`] was asked.
#[derive(Debug, Default)]
pub struct GuessCalls {
    pub attempts: Vec<u32>,
    pub rejections: Vec<String>,
}

/// Replies from a list, then fails, or keeps replying a fallback text.
pub struct ScriptedGuesser {
    replies: VecDeque<String>,
    fallback: Option<String>,
    calls: Arc<Mutex<GuessCalls>>,
}

impl ScriptedGuesser {
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        ScriptedGuesser {
            replies: replies.into_iter().map(Into::into).collect(),
            fallback: None,
            calls: Arc::default(),
        }
    }

    /// Always replies `text`.
    pub fn always(text: &str) -> Self {
        ScriptedGuesser::new(Vec::<String>::new()).or_reply(text)
    }

    /// Replies `text` once the script is exhausted.
    pub fn or_reply(mut self, text: &str) -> Self {
        self.fallback = Some(text.to_string());
        self
    }

    /// Shared view of every call made.
    pub fn calls(&self) -> Arc<Mutex<GuessCalls>> {
        self.calls.clone()
    }
}

impl GuessProvider for ScriptedGuesser {
    fn name(&self) -> &str {
        "Scripted guesser"
    }

    fn get_guess(&mut self, request: &GuessRequest<'_>) -> anyhow::Result<String> {
        let mut calls = self.calls.lock().unwrap();
        calls.attempts.push(request.attempt);
        if let Some(rejection) = request.rejection {
            calls.rejections.push(rejection.feedback());
        }
        match (self.replies.pop_front(), &self.fallback) {
            (Some(reply), _) => Ok(reply),
            (None, Some(reply)) => Ok(reply.clone()),
            (None, None) => bail!("no more guesses"),
        }
    }
}

/// A team whose spymaster whispers the answers to its guesser.
///
/// Clues every remaining card at once, so the team that starts wins on its first turn.
pub fn telepathic_team() -> TeamPlayers {
    let channel = Arc::new(Mutex::new(VecDeque::new()));
    TeamPlayers::new(Whisperer(channel.clone()), Listener(channel))
}

struct Whisperer(Arc<Mutex<VecDeque<String>>>);

impl ClueProvider for Whisperer {
    fn get_clue(&mut self, request: &ClueRequest<'_>) -> anyhow::Result<Clue> {
        let remaining = request.board.remaining(request.team);
        let mut channel = self.0.lock().unwrap();
        channel.clear();
        channel.extend(remaining.iter().map(|w| w.to_string()));
        Ok(Clue::new("TELEPATHY", remaining.len() as u32))
    }
}

struct Listener(Arc<Mutex<VecDeque<String>>>);

impl GuessProvider for Listener {
    fn get_guess(&mut self, _request: &GuessRequest<'_>) -> anyhow::Result<String> {
        self.0
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("nothing was whispered"))
    }
}

/// A team that never reveals anything: zero clues and unusable guesses.
pub fn idle_team() -> TeamPlayers {
    TeamPlayers::new(
        ScriptedSpymaster::repeating(Clue::new("PASS", 0)),
        ScriptedGuesser::always("???"),
    )
}

/// Keeps a copy of every event.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<MatchEvent>>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<MatchEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn phases(&self) -> Vec<Phase> {
        self.events().iter().map(|e| e.phase).collect()
    }
}

impl Observer for Recorder {
    fn notify(&mut self, event: &MatchEvent) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

pub struct FailingObserver;

impl Observer for FailingObserver {
    fn notify(&mut self, _event: &MatchEvent) -> anyhow::Result<()> {
        bail!("websocket closed")
    }
}

pub struct PanickingObserver;

impl Observer for PanickingObserver {
    fn notify(&mut self, event: &MatchEvent) -> anyhow::Result<()> {
        panic!("cannot render {}", event.phase)
    }
}
