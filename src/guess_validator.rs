//! Maps the free text returned by a guesser to exactly one unrevealed card.
//!
//! Matching order, first hit wins:
//! 1. case-insensitive exact match of the trimmed text against unrevealed card texts;
//! 2. letters-only comparison (punctuation, digits and spaces dropped on both sides),
//!    accepted only when a single unrevealed card matches.
//!
//! Anything else is an [`InvalidGuess`]. Retrying is up to the caller.

use crate::board::Board;
use crate::error::{InvalidGuess, InvalidGuessReason};

/// Resolves `raw` to the canonical text of an unrevealed card on `board`.
///
/// Never mutates the board.
///
/// # Errors
/// [`InvalidGuess`] when the text is empty, names no unrevealed card, names a revealed
/// card, or is ambiguous.
pub fn validate_guess(raw: &str, board: &Board) -> Result<String, InvalidGuess> {
    let unrevealed = board.unrevealed();
    let reject = |reason| InvalidGuess {
        raw_text: raw.to_string(),
        visible_board: unrevealed.iter().map(|w| w.to_string()).collect(),
        reason,
    };

    let lowered = raw.trim().to_lowercase();
    if let Some(word) = unrevealed.iter().find(|w| w.to_lowercase() == lowered) {
        return Ok(word.to_string());
    }

    let letters = letters_only(raw);
    if letters.is_empty() {
        return Err(reject(InvalidGuessReason::Empty));
    }

    let mut matches = unrevealed.iter().filter(|w| letters_only(w) == letters);
    match (matches.next(), matches.next()) {
        (Some(word), None) => Ok(word.to_string()),
        (Some(_), Some(_)) => Err(reject(InvalidGuessReason::Ambiguous)),
        (None, _) => {
            let revealed = board
                .revealed()
                .into_iter()
                .any(|w| w.to_lowercase() == lowered || letters_only(w) == letters);
            if revealed {
                Err(reject(InvalidGuessReason::AlreadyRevealed))
            } else {
                Err(reject(InvalidGuessReason::NotOnBoard))
            }
        }
    }
}

fn letters_only(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}
