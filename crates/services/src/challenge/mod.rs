//! Challenge sources: the pools that hand a session its next question.
//!
//! Sources are mode-specific data, not game logic. Each is generic over
//! `R: Rng` so callers can inject a seeded `StdRng` when they need
//! reproducible draws.

mod clue;
mod guardian;
mod tiles;
mod unscramble;

use realm_core::model::{Challenge, GameMode};

pub use clue::ClueSource;
pub use guardian::{GUARDIAN_NAMES, GuardianSource};
pub use tiles::{BUILT_IN_WORDS, REFILL_TILES, STARTING_TILES, TileSource};
pub use unscramble::{Land, UnscrambleSource};

/// Supplies challenges for one kind of game.
pub trait ChallengeSource {
    /// The record-backed mode this source serves. `None` for side modes that
    /// never read stored records.
    fn mode(&self) -> Option<GameMode>;

    /// Next challenge for `level`, or `None` when the pool is empty.
    fn next(&mut self, level: u32) -> Option<Challenge>;

    /// Whether `answer` beats `challenge`.
    fn judge(&self, challenge: &Challenge, answer: &str) -> bool {
        challenge.is_correct(answer)
    }
}
