use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use realm_core::model::{Challenge, ChallengeKind, GameMode, ModeDetails, WordRecord};

use super::ChallengeSource;

/// Rack a forge run starts with.
pub const STARTING_TILES: [&str; 6] = ["un", "re", "help", "play", "ful", "ing"];

/// Tiles added when the rack runs low.
pub const REFILL_TILES: [&str; 3] = ["re", "play", "ing"];

/// Words the forge accepts out of the box, with the tiles that build them.
pub const BUILT_IN_WORDS: [(&str, &[&str]); 5] = [
    ("unhelpful", &["un", "help", "ful"]),
    ("replaying", &["re", "play", "ing"]),
    ("helpful", &["help", "ful"]),
    ("rehelp", &["re", "help"]),
    ("ungrateful", &["un", "grate", "ful"]),
];

/// Word forging: affix and root tiles that combine into accepted words.
///
/// Every accepted word is a correct answer to every forge challenge, so the
/// player may forge something other than the word the challenge was built
/// around.
pub struct TileSource<R> {
    rng: R,
    words: BTreeMap<String, Vec<String>>,
}

impl<R: Rng> TileSource<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        let words = BUILT_IN_WORDS
            .iter()
            .map(|(word, parts)| {
                (
                    (*word).to_string(),
                    parts.iter().map(|p| (*p).to_string()).collect(),
                )
            })
            .collect();
        Self { rng, words }
    }

    /// Accept the combined words of stored wordsmith records.
    #[must_use]
    pub fn with_records(mut self, records: Vec<WordRecord>) -> Self {
        for record in records {
            if let ModeDetails::Wordsmith {
                combined_word,
                component_words,
            } = record.details
            {
                self.words
                    .insert(combined_word.to_lowercase(), component_words);
            }
        }
        self
    }

    /// Whether `word` is forgeable, ignoring case and surrounding space.
    #[must_use]
    pub fn accepts(&self, word: &str) -> bool {
        self.words.contains_key(&word.trim().to_lowercase())
    }

    /// Accepted words in alphabetical order.
    pub fn accepted(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }

    /// Every distinct tile that appears in an accepted word.
    fn tile_pool(&self) -> Vec<&str> {
        let mut pool: Vec<&str> = self.words.values().flatten().map(String::as_str).collect();
        pool.sort_unstable();
        pool.dedup();
        pool
    }
}

impl<R: Rng> ChallengeSource for TileSource<R> {
    fn mode(&self) -> Option<GameMode> {
        Some(GameMode::Wordsmith)
    }

    /// Picks a target word and deals its tiles plus one stray tile per level,
    /// capped at three strays.
    fn next(&mut self, level: u32) -> Option<Challenge> {
        let words: Vec<&String> = self.words.keys().collect();
        let target = (*words.choose(&mut self.rng)?).clone();
        let mut tiles = self.words.get(&target).cloned().unwrap_or_default();

        let strays = usize::try_from(level.min(3)).unwrap_or(3);
        let pool: Vec<String> = self
            .tile_pool()
            .into_iter()
            .filter(|t| !tiles.iter().any(|own| own == t))
            .map(str::to_string)
            .collect();
        tiles.extend(pool.choose_multiple(&mut self.rng, strays).cloned());
        tiles.shuffle(&mut self.rng);

        Some(
            Challenge::new(
                ChallengeKind::Forge,
                "Combine the tiles into an ancient word",
                tiles,
                target,
            )
            .with_title("The Cauldron"),
        )
    }

    fn judge(&self, challenge: &Challenge, answer: &str) -> bool {
        challenge.is_correct(answer) || self.accepts(answer)
    }
}
