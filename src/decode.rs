//! Strict decoding of raw AI replies into clues and guesses.
//!
//! A reply must be exactly one JSON object, optionally wrapped in a single markdown code
//! fence. There is no guessing from loose prose: anything else is a [`DecodeError`],
//! which providers should surface as a failure so the engine's retry policy applies.
//!
//! ```
//! use codenames_arena::decode::{decode_clue, decode_guess};
//!
//! let clue = decode_clue(r#"{"clue": "OCEAN", "number": 2, "reasoning": "water"}"#).unwrap();
//! assert_eq!(clue.word, "OCEAN");
//! assert_eq!(clue.number, 2);
//!
//! let guess = decode_guess("```json\n{\"guess\": \"WAVE\"}\n```").unwrap();
//! assert_eq!(guess.guess, "WAVE");
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::game::Clue;

/// Why a reply could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Nothing but whitespace.
    #[error("reply is empty")]
    Empty,
    /// Not a single well-formed JSON object.
    #[error("reply is not a single JSON object: {0}")]
    NotJson(String),
    /// A required field is absent.
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    /// A field is present but unusable.
    #[error("field '{field}' is invalid: {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// A decoded guesser reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessReply {
    /// The guessed word, trimmed but otherwise untouched. Still needs validation against
    /// the board.
    pub guess: String,
    /// Optional explanation.
    pub reasoning: Option<String>,
}

#[derive(Deserialize)]
struct RawClue {
    #[serde(alias = "clue", alias = "clue_word")]
    word: Option<String>,
    #[serde(alias = "clue_number")]
    number: Option<i64>,
    reasoning: Option<String>,
}

#[derive(Deserialize)]
struct RawGuess {
    #[serde(alias = "word")]
    guess: Option<String>,
    reasoning: Option<String>,
}

/// Decodes a spymaster reply.
///
/// Accepted keys: `clue` / `word` / `clue_word`, `number` / `clue_number` and an
/// optional `reasoning`. The clue word must be a single token and the number a
/// non-negative integer.
///
/// # Errors
/// See [`DecodeError`].
pub fn decode_clue(raw: &str) -> Result<Clue, DecodeError> {
    let parsed: RawClue = parse_object(raw)?;

    let word = parsed.word.ok_or(DecodeError::MissingField("clue"))?;
    let word = word.trim();
    if word.is_empty() {
        return Err(DecodeError::InvalidField {
            field: "clue",
            reason: "empty".to_string(),
        });
    }
    if word.split_whitespace().count() > 1 {
        return Err(DecodeError::InvalidField {
            field: "clue",
            reason: format!("'{word}' is more than one word"),
        });
    }

    let number = parsed.number.ok_or(DecodeError::MissingField("number"))?;
    let number = u32::try_from(number).map_err(|_| DecodeError::InvalidField {
        field: "number",
        reason: format!("{number} is not a valid count"),
    })?;

    let clue = Clue::new(word, number);
    Ok(match non_blank(parsed.reasoning) {
        Some(reasoning) => clue.with_reasoning(reasoning),
        None => clue,
    })
}

/// Decodes a guesser reply.
///
/// Accepted keys: `guess` / `word` and an optional `reasoning`.
///
/// # Errors
/// See [`DecodeError`].
pub fn decode_guess(raw: &str) -> Result<GuessReply, DecodeError> {
    let parsed: RawGuess = parse_object(raw)?;
    let guess = parsed.guess.ok_or(DecodeError::MissingField("guess"))?;
    let guess = guess.trim();
    if guess.is_empty() {
        return Err(DecodeError::InvalidField {
            field: "guess",
            reason: "empty".to_string(),
        });
    }
    Ok(GuessReply {
        guess: guess.to_string(),
        reasoning: non_blank(parsed.reasoning),
    })
}

fn parse_object<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<T, DecodeError> {
    let body = strip_fence(raw.trim())?;
    if body.is_empty() {
        return Err(DecodeError::Empty);
    }
    if !body.starts_with('{') {
        return Err(DecodeError::NotJson("expected '{'".to_string()));
    }
    serde_json::from_str(body).map_err(|e| DecodeError::NotJson(e.to_string()))
}

fn strip_fence(text: &str) -> Result<&str, DecodeError> {
    let Some(rest) = text.strip_prefix("```") else {
        return Ok(text);
    };
    // drop the info string, e.g. "json"
    let (_, body) = rest.split_once('\n').unwrap_or(("", rest));
    body.trim_end()
        .strip_suffix("```")
        .map(str::trim)
        .ok_or_else(|| DecodeError::NotJson("unterminated code fence".to_string()))
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
