use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use realm_core::model::{Challenge, ChallengeKind, GameMode};

use super::ChallengeSource;

/// Themed lands of the word quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Land {
    Science,
    Literature,
    History,
}

struct Entry {
    word: &'static str,
    hints: [&'static str; 2],
}

const SCIENCE: [Entry; 2] = [
    Entry {
        word: "HYPOTHESIS",
        hints: ["A proposed explanation", "Scientific method step"],
    },
    Entry {
        word: "MOLECULE",
        hints: ["Atoms bonded together", "Smallest unit of a compound"],
    },
];

const LITERATURE: [Entry; 2] = [
    Entry {
        word: "METAPHOR",
        hints: ["A figure of speech", "Says one thing is another"],
    },
    Entry {
        word: "NARRATOR",
        hints: ["Tells the story", "First or third person"],
    },
];

const HISTORY: [Entry; 2] = [
    Entry {
        word: "DYNASTY",
        hints: ["A line of rulers", "Passed down in a family"],
    },
    Entry {
        word: "REVOLUTION",
        hints: ["An overthrow of government", "1789 in France"],
    },
];

impl Land {
    pub const ALL: [Land; 3] = [Land::Science, Land::Literature, Land::History];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Land::Science => "Science Land",
            Land::Literature => "Literature Land",
            Land::History => "History Land",
        }
    }

    #[must_use]
    pub fn theme(self) -> &'static str {
        match self {
            Land::Science => "Scientific vocabulary",
            Land::Literature => "Literary vocabulary",
            Land::History => "Historical vocabulary",
        }
    }

    fn entries(self) -> &'static [Entry] {
        match self {
            Land::Science => &SCIENCE,
            Land::Literature => &LITERATURE,
            Land::History => &HISTORY,
        }
    }
}

/// Quest puzzles: a land's word with its letters shuffled.
pub struct UnscrambleSource<R> {
    rng: R,
    land: Land,
}

impl<R: Rng> UnscrambleSource<R> {
    #[must_use]
    pub fn new(land: Land, rng: R) -> Self {
        Self { rng, land }
    }

    #[must_use]
    pub fn land(&self) -> Land {
        self.land
    }

    /// Shuffle `word` until it differs from the original. Words whose letters
    /// are all the same come back unchanged.
    fn scramble(&mut self, word: &str) -> String {
        let mut letters: Vec<char> = word.chars().collect();
        if letters.windows(2).all(|pair| pair[0] == pair[1]) {
            return word.to_string();
        }
        loop {
            letters.shuffle(&mut self.rng);
            let scrambled: String = letters.iter().collect();
            if scrambled != word {
                return scrambled;
            }
        }
    }
}

impl<R: Rng> ChallengeSource for UnscrambleSource<R> {
    fn mode(&self) -> Option<GameMode> {
        None
    }

    fn next(&mut self, _level: u32) -> Option<Challenge> {
        let entry = self.land.entries().choose(&mut self.rng)?;
        let scrambled = self.scramble(entry.word);
        Some(
            Challenge::new(ChallengeKind::Unscramble, scrambled, Vec::new(), entry.word)
                .with_title(self.land.name())
                .with_hints(entry.hints.iter().map(|h| (*h).to_string()).collect()),
        )
    }
}
