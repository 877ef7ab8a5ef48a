use serde::{Deserialize, Serialize};

use super::config::ProgressionConfig;

/// Session outcome. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Active,
    Won,
    Lost,
}

impl Status {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Active)
    }
}

/// Progress of one game session.
///
/// Owned by exactly one session and only replaced through
/// [`apply`](super::apply); a restart builds a fresh value with [`new`](Self::new).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub(crate) score: u32,
    pub(crate) combo: u32,
    pub(crate) level: u32,
    pub(crate) lives: Option<u32>,
    pub(crate) status: Status,
}

impl ProgressionState {
    /// Fresh state at the mode's start level with full lives.
    #[must_use]
    pub fn new(config: &ProgressionConfig) -> Self {
        Self {
            score: 0,
            combo: 0,
            level: config.start_level(),
            lives: config.starting_lives(),
            status: Status::Active,
        }
    }

    /// Rebuild a state from its parts, e.g. to resume a saved session.
    #[must_use]
    pub fn from_parts(
        score: u32,
        combo: u32,
        level: u32,
        lives: Option<u32>,
        status: Status,
    ) -> Self {
        Self {
            score,
            combo,
            level,
            lives,
            status,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn combo(&self) -> u32 {
        self.combo
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn lives(&self) -> Option<u32> {
        self.lives
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_follows_config() {
        let tower = ProgressionState::new(&ProgressionConfig::tower());
        assert_eq!(tower.level(), 1);
        assert_eq!(tower.lives(), Some(3));
        assert!(tower.is_active());

        let forge = ProgressionState::new(&ProgressionConfig::wordsmith());
        assert_eq!(forge.lives(), None);
        assert_eq!(forge.score(), 0);
    }

    #[test]
    fn only_active_is_non_terminal() {
        assert!(!Status::Active.is_terminal());
        assert!(Status::Won.is_terminal());
        assert!(Status::Lost.is_terminal());
    }
}
