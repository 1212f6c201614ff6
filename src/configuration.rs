//! Config for the match engine behaviors
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional. Flags are case-insensitive, set the value to `"true"` to enable
//! one. Numbers that fail to parse fall back to the default.
//!
//! - `CODENAMES_VERBOSE`: Print match progress to stdout (default: `false`)
//! - `CODENAMES_LOG`: Enable logging to a file (default: `false`)
//! - `CODENAMES_MAX_TURNS`: Turns played before a match is declared a draw (default: `30`)
//! - `CODENAMES_GUESS_ATTEMPTS`: Attempts a guesser gets to produce a valid word (default: `3`)
//! - `CODENAMES_STRICT_CLUES`: Refuse clues equal to a board word (default: `false`)
//! - `CODENAMES_SEED`: Seed for board generation (default: unset, random boards)
//! - `CODENAMES_PARALLEL_MATCHES`: Matches an arena runs at once (default: `1`)
//! - `CODENAMES_HISTORY_LIMIT`: Match summaries an arena keeps (default: `100`)

use std::str::FromStr;

/// Configuration for the match engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) max_turns: usize,
    pub(crate) guess_attempts: u32,
    pub(crate) strict_clues: bool,
    pub(crate) seed: Option<u64>,
    pub(crate) parallel_matches: usize,
    pub(crate) history_limit: usize,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Nothing is printed to stdout.
    /// - Logging to file is disabled.
    /// - A match is a draw after 30 turns.
    /// - A guesser gets 3 attempts per guess.
    /// - Clues are accepted as given.
    /// - Boards are random.
    /// - Arenas run one match at a time and keep the last 100 summaries.
    pub fn new() -> Self {
        Self {
            verbose: false,
            log: false,
            max_turns: 30,
            guess_attempts: 3,
            strict_clues: false,
            seed: None,
            parallel_matches: 1,
            history_limit: 100,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// See the [module documentation](self) for the recognized variables. Any other value
    /// (including unset) results in the default value for that field.
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn get_env_number<T: FromStr>(var: &str) -> Option<T> {
            std::env::var(var).ok()?.trim().parse().ok()
        }

        let defaults = Self::new();
        Self {
            verbose: get_env_flag("CODENAMES_VERBOSE", defaults.verbose),
            log: get_env_flag("CODENAMES_LOG", defaults.log),
            max_turns: get_env_number("CODENAMES_MAX_TURNS").unwrap_or(defaults.max_turns),
            guess_attempts: get_env_number("CODENAMES_GUESS_ATTEMPTS")
                .map(|n: u32| n.max(1))
                .unwrap_or(defaults.guess_attempts),
            strict_clues: get_env_flag("CODENAMES_STRICT_CLUES", defaults.strict_clues),
            seed: get_env_number("CODENAMES_SEED"),
            parallel_matches: get_env_number("CODENAMES_PARALLEL_MATCHES")
                .map(|n: usize| n.max(1))
                .unwrap_or(defaults.parallel_matches),
            history_limit: get_env_number("CODENAMES_HISTORY_LIMIT")
                .unwrap_or(defaults.history_limit),
        }
    }

    /// Enable or disable progress output on stdout.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Number of turns after which a match without winner is a draw.
    pub fn with_max_turns(mut self, value: usize) -> Self {
        self.max_turns = value;
        self
    }

    /// Attempts a guesser gets before its turn is forfeited. At least 1.
    pub fn with_guess_attempts(mut self, value: u32) -> Self {
        self.guess_attempts = value.max(1);
        self
    }

    /// Enable or disable refusal of clues that are a board word.
    pub fn with_strict_clues(mut self, value: bool) -> Self {
        self.strict_clues = value;
        self
    }

    /// Seed used for board generation.
    ///
    /// In an arena, match `n` uses `seed + n - 1` so that boards differ between matches.
    pub fn with_seed(mut self, value: Option<u64>) -> Self {
        self.seed = value;
        self
    }

    /// Number of matches an arena runs at once. At least 1.
    pub fn with_parallel_matches(mut self, value: usize) -> Self {
        self.parallel_matches = value.max(1);
        self
    }

    /// Number of match summaries an arena keeps.
    pub fn with_history_limit(mut self, value: usize) -> Self {
        self.history_limit = value;
        self
    }

    /// Turn cap.
    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Attempts per guess.
    pub fn guess_attempts(&self) -> u32 {
        self.guess_attempts
    }

    /// Board seed.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
