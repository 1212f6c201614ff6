//! Append-only record of what was said during a match.
//!
//! The match loop is the only writer. Players receive `&MatchLog` and read the public
//! entries as shared context; private entries (spymaster reasoning) are for spectators.

use serde::{Deserialize, Serialize};

use crate::board::Team;

/// Speaker name used for engine messages.
pub const SYSTEM_SPEAKER: &str = "System";

/// One line of the match conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Who spoke.
    pub speaker: String,
    /// The speaker's team, `None` for the engine.
    pub team: Option<Team>,
    /// What was said.
    pub message: String,
    /// Hidden from players.
    pub private: bool,
}

/// The conversation of one match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchLog {
    entries: Vec<LogEntry>,
}

impl MatchLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn say(&mut self, speaker: &str, team: Team, message: impl Into<String>) {
        self.push(speaker, Some(team), message.into(), false);
    }

    pub(crate) fn think(&mut self, speaker: &str, team: Team, message: impl Into<String>) {
        self.push(speaker, Some(team), message.into(), true);
    }

    pub(crate) fn system(&mut self, message: impl Into<String>) {
        self.push(SYSTEM_SPEAKER, None, message.into(), false);
    }

    fn push(&mut self, speaker: &str, team: Option<Team>, message: String, private: bool) {
        self.entries.push(LogEntry {
            speaker: speaker.to_string(),
            team,
            message,
            private,
        });
    }

    /// Every entry, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries players may see.
    pub fn public(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter().filter(|e| !e.private)
    }

    /// Most recent public message.
    pub fn last_public_message(&self) -> Option<&str> {
        self.public().last().map(|e| e.message.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was logged yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
