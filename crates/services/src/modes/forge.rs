use rand::Rng;
use realm_core::model::Challenge;
use realm_core::progression::Outcome;

use crate::challenge::{REFILL_TILES, STARTING_TILES, TileSource};

/// Cauldron words shorter than this many characters are never judged wrong.
pub const MIN_JUDGED_LEN: usize = 4;

/// What the cauldron made of its tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForgeCheck {
    Accepted(String),
    Rejected(String),
    Pending,
}

impl ForgeCheck {
    /// The attempt to record, if the cauldron reached a verdict.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            ForgeCheck::Accepted(_) => Some(Outcome::Correct),
            ForgeCheck::Rejected(_) => Some(Outcome::Incorrect),
            ForgeCheck::Pending => None,
        }
    }
}

/// Tile rack and cauldron of the wordsmith mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forge {
    rack: Vec<String>,
    cauldron: Vec<String>,
}

impl Default for Forge {
    fn default() -> Self {
        Self::new()
    }
}

impl Forge {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rack: STARTING_TILES.iter().map(|t| (*t).to_string()).collect(),
            cauldron: Vec::new(),
        }
    }

    /// Put the tiles dealt by `challenge` on the rack.
    ///
    /// Tiles already held on the rack or in the cauldron are not duplicated,
    /// so dealing the same challenge twice changes nothing.
    pub fn deal(&mut self, challenge: &Challenge) {
        let mut held: Vec<&str> = self
            .rack
            .iter()
            .chain(&self.cauldron)
            .map(String::as_str)
            .collect();
        let mut dealt = Vec::new();
        for tile in &challenge.options {
            match held.iter().position(|t| t == tile) {
                Some(slot) => {
                    held.swap_remove(slot);
                }
                None => dealt.push(tile.clone()),
            }
        }
        self.rack.extend(dealt);
    }

    #[must_use]
    pub fn rack(&self) -> &[String] {
        &self.rack
    }

    #[must_use]
    pub fn cauldron(&self) -> &[String] {
        &self.cauldron
    }

    #[must_use]
    pub fn word(&self) -> String {
        self.cauldron.concat()
    }

    /// Move rack tile `index` into the cauldron and check the word.
    ///
    /// An accepted word consumes its tiles and tops the rack up when fewer
    /// than four remain. A rejected word stays in the cauldron. Returns `None`
    /// for an index outside the rack.
    pub fn add<R: Rng>(&mut self, index: usize, tiles: &TileSource<R>) -> Option<ForgeCheck> {
        if index >= self.rack.len() {
            return None;
        }
        let tile = self.rack.remove(index);
        self.cauldron.push(tile);

        let word = self.word();
        if tiles.accepts(&word) {
            self.cauldron.clear();
            if self.rack.len() < 4 {
                self.rack
                    .extend(REFILL_TILES.iter().map(|t| (*t).to_string()));
            }
            return Some(ForgeCheck::Accepted(word));
        }
        if word.chars().count() >= MIN_JUDGED_LEN {
            return Some(ForgeCheck::Rejected(word));
        }
        Some(ForgeCheck::Pending)
    }

    /// Return cauldron tile `index` to the end of the rack.
    pub fn take_back(&mut self, index: usize) -> bool {
        if index >= self.cauldron.len() {
            return false;
        }
        let tile = self.cauldron.remove(index);
        self.rack.push(tile);
        true
    }

    /// Slot of `tile` on the rack, if present.
    #[must_use]
    pub fn find(&self, tile: &str) -> Option<usize> {
        self.rack.iter().position(|t| t == tile)
    }
}
