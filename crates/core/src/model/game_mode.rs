use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseModeError {
    #[error("unknown game mode: {0}")]
    GameMode(String),
    #[error("unknown obstacle type: {0}")]
    Obstacle(String),
}

/// Game modes that carry administered content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Realm of WordSmiths: forge words from affix and root tiles.
    Wordsmith,
    /// Mystic Forest: grid walk with obstacles and fill-in-the-blank clues.
    Forest,
    /// Tower of Trials: one guardian challenge per floor.
    Tower,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Wordsmith, GameMode::Forest, GameMode::Tower];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Wordsmith => "wordsmith",
            GameMode::Forest => "forest",
            GameMode::Tower => "tower",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            GameMode::Wordsmith => "Realm of WordSmiths",
            GameMode::Forest => "Mystic Forest",
            GameMode::Tower => "Tower of Trials",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wordsmith" => Ok(GameMode::Wordsmith),
            "forest" => Ok(GameMode::Forest),
            "tower" => Ok(GameMode::Tower),
            other => Err(ParseModeError::GameMode(other.to_string())),
        }
    }
}

/// What a forest cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleType {
    Tree,
    Trap,
    Powerup,
    Monster,
}

impl ObstacleType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ObstacleType::Tree => "tree",
            ObstacleType::Trap => "trap",
            ObstacleType::Powerup => "powerup",
            ObstacleType::Monster => "monster",
        }
    }
}

impl fmt::Display for ObstacleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObstacleType {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tree" => Ok(ObstacleType::Tree),
            "trap" => Ok(ObstacleType::Trap),
            "powerup" => Ok(ObstacleType::Powerup),
            "monster" => Ok(ObstacleType::Monster),
            other => Err(ParseModeError::Obstacle(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_parse_case_insensitively() {
        assert_eq!("Tower".parse::<GameMode>().unwrap(), GameMode::Tower);
        assert_eq!(" forest ".parse::<GameMode>().unwrap(), GameMode::Forest);
        assert!("arena".parse::<GameMode>().is_err());
    }

    #[test]
    fn mode_strings_match_storage_encoding() {
        for mode in GameMode::ALL {
            assert_eq!(mode.as_str().parse::<GameMode>().unwrap(), mode);
        }
    }

    #[test]
    fn obstacle_rejects_unknown() {
        let err = "lava".parse::<ObstacleType>().unwrap_err();
        assert_eq!(err, ParseModeError::Obstacle("lava".into()));
    }
}
