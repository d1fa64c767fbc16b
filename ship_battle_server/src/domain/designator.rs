// Two-word scanner callsigns, unique within a match.

use super::errors::GameError;
use rand::Rng;
use rand::seq::SliceRandom;

const ADJECTIVES: [&str; 21] = [
    "red", "blue", "green", "pink", "grey", "wild", "lost", "big", "dusty", "long", "little",
    "old", "bad", "high", "cold", "lucky", "crazy", "open", "mad", "wide", "early",
];

const NOUNS: [&str; 23] = [
    "fox", "dog", "cat", "fly", "crow", "pig", "eye", "night", "light", "ranger", "tale", "rail",
    "flight", "year", "lake", "alpha", "beta", "gamma", "delta", "iota", "lambda", "omega",
    "sigma",
];

/// Largest number of ships that can get distinct designators.
pub fn capacity() -> usize {
    ADJECTIVES.len().min(NOUNS.len())
}

/// Draws `count` distinct designators. Neither word repeats within a match.
pub fn assign<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Vec<String>, GameError> {
    if count > capacity() {
        return Err(GameError::DesignatorsExhausted {
            requested: count,
            available: capacity(),
        });
    }
    let mut first = ADJECTIVES;
    let mut second = NOUNS;
    first.shuffle(rng);
    second.shuffle(rng);
    Ok(first
        .iter()
        .zip(second.iter())
        .take(count)
        .map(|(a, b)| format!("{a} {b}"))
        .collect())
}
