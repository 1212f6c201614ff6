//! Built-in word lists.
//!
//! Every list holds at least 25 unique upper-case words, so any of them can seed a board.

use std::collections::HashSet;

use rand::seq::IndexedRandom;
use rand::Rng;

/// Which built-in list to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Tech and AI terms mixed with evocative nature, mythology and object words.
    #[default]
    Default,
    /// Words from the original board game.
    Classic,
    /// Computing vocabulary.
    Tech,
}

const DEFAULT_WORDS: &[&str] = &[
    // tech
    "ALGORITHM", "NETWORK", "MEMORY", "PATTERN", "SIGNAL", "TOKEN", "MATRIX", "VECTOR",
    "BRIDGE", "LAYER", "MODEL", "DREAM", "ECHO", "MIRROR", "SHADOW", "LIGHT", "MACHINE",
    // nature
    "OCEAN", "FOREST", "MOUNTAIN", "RIVER", "CLOUD", "STORM", "FIRE", "ICE", "WAVE", "TIDE",
    "CURRENT", "FLOW", "STREAM", "CASCADE", "POOL", "DEPTH", "GARDEN", "TREE", "FLOWER",
    "ROOT", "SEED", "BLOOM", "THORN", "VINE",
    // objects
    "KEY", "LOCK", "DOOR", "WINDOW", "WALL", "TOWER", "CASTLE", "THRONE", "THREAD", "WEAVE",
    "FABRIC", "TAPESTRY", "KNOT", "LOOP", "SPIRAL",
    // abstract
    "HEART", "MIND", "SOUL", "SPIRIT", "VISION", "VOICE", "SONG", "DANCE", "TIME", "SPACE",
    "DIMENSION", "PORTAL", "GATEWAY", "PASSAGE", "JOURNEY", "PATH",
    // materials
    "GOLD", "SILVER", "DIAMOND", "CRYSTAL", "STONE", "METAL", "GLASS", "WIRE",
    // knowledge
    "BOOK", "PAGE", "WORD", "LETTER", "CODE", "CIPHER", "SECRET", "TRUTH", "DELIGHT",
    "TORMENT",
    // sky
    "STAR", "MOON", "SUN", "PLANET", "GALAXY", "UNIVERSE", "COSMOS", "VOID", "DIVINE",
    // creatures
    "SEAHORSE", "BASILISK", "DRAGON", "PHOENIX", "WOLF", "TIGER", "FOX", "OCTOPUS", "MERMAID",
    "UNICORN", "RAVEN",
    // artifacts
    "SWORD", "SHIELD", "ARROW", "BOW", "STAFF", "WAND", "ORB", "CROWN",
];

const CLASSIC_WORDS: &[&str] = &[
    "AFRICA", "AGENT", "AIR", "ALIEN", "ALPS", "AMAZON", "AMBULANCE", "AMERICA", "ANGEL",
    "ANTARCTICA", "APPLE", "ARM", "ATLANTIS", "AUSTRALIA", "AZTEC", "BACK", "BALL", "BAND",
    "BANK", "BAR", "BARK", "BAT", "BATTERY", "BEACH", "BEAR", "BEAT", "BED", "BEIJING", "BELL",
    "BELT", "BERLIN", "BERMUDA", "BERRY", "BILL", "BLOCK", "BOARD", "BOLT", "BOMB", "BOND",
    "BOOM", "BOOT", "BOTTLE", "BOW", "BOX", "BRIDGE", "BRUSH", "BUCK", "BUFFALO", "BUG",
    "BUGLE",
];

const TECH_WORDS: &[&str] = &[
    "API", "ALGORITHM", "BINARY", "BLOCKCHAIN", "BROWSER", "CACHE", "CIRCUIT", "CLOUD",
    "COMPILER", "CPU", "DATABASE", "DEBUG", "DOWNLOAD", "ENCRYPTION", "FIREWALL", "FRAMEWORK",
    "GITHUB", "HARDWARE", "HASHTAG", "HTML", "INTERFACE", "JAVASCRIPT", "KERNEL", "LAPTOP",
    "MACHINE", "NETWORK", "OPERATING", "PASSWORD", "PROTOCOL", "PYTHON", "QUANTUM",
    "RECURSION", "ROUTER", "SERVER", "SOFTWARE", "SYNTAX", "TERMINAL", "THREAD", "TOKEN",
    "VIRTUAL",
];

/// The word list for `theme`.
pub fn words(theme: Theme) -> &'static [&'static str] {
    match theme {
        Theme::Default => DEFAULT_WORDS,
        Theme::Classic => CLASSIC_WORDS,
        Theme::Tech => TECH_WORDS,
    }
}

/// A blend of tech and classic words, sized like the default list.
///
/// Roughly `tech_ratio` of the words come from the tech list, the rest from the classic
/// list; the result is topped up from the default list. Words never repeat.
pub fn mixed_words<R: Rng + ?Sized>(tech_ratio: f64, rng: &mut R) -> Vec<String> {
    let target = DEFAULT_WORDS.len();
    let tech_count = (target as f64 * tech_ratio.clamp(0.0, 1.0)) as usize;
    let classic_count = target - tech_count;

    let mut seen = HashSet::new();
    let mut mixed = Vec::with_capacity(target);
    let picks = TECH_WORDS
        .choose_multiple(rng, tech_count.min(TECH_WORDS.len()))
        .chain(CLASSIC_WORDS.choose_multiple(rng, classic_count.min(CLASSIC_WORDS.len())))
        .copied()
        .collect::<Vec<_>>();
    for word in picks {
        if seen.insert(word) {
            mixed.push(word.to_string());
        }
    }

    let missing = target.saturating_sub(mixed.len());
    let remaining = DEFAULT_WORDS
        .iter()
        .filter(|w| !seen.contains(*w))
        .copied()
        .collect::<Vec<_>>();
    mixed.extend(
        remaining
            .choose_multiple(rng, missing)
            .map(|w| w.to_string()),
    );
    mixed
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::board::BOARD_SIZE;

    #[test]
    fn every_theme_fills_a_board() {
        for theme in [Theme::Default, Theme::Classic, Theme::Tech] {
            let list = words(theme);
            let unique = list.iter().collect::<HashSet<_>>();
            assert_eq!(unique.len(), list.len(), "{theme:?} has duplicates");
            assert!(list.len() >= BOARD_SIZE);
            assert!(list.iter().all(|w| w.chars().all(|c| c.is_ascii_uppercase())));
        }
    }

    #[test]
    fn mixed_words_are_unique_and_sized() {
        let mut rng = StdRng::seed_from_u64(3);
        for ratio in [0.0, 0.3, 1.0] {
            let mixed = mixed_words(ratio, &mut rng);
            let unique = mixed.iter().collect::<HashSet<_>>();
            assert_eq!(unique.len(), mixed.len());
            assert_eq!(mixed.len(), DEFAULT_WORDS.len());
        }
    }
}
