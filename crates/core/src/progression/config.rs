use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("start level must be >= 1")]
    ZeroStartLevel,

    #[error("score per level must be > 0")]
    ZeroLevelThreshold,

    #[error("max level ({max}) must be >= start level ({start})")]
    MaxBelowStart { start: u32, max: u32 },

    #[error("reset floor must be between 1 and the max level, got {0}")]
    ResetFloorOutOfRange(u32),

    #[error("life-limited modes must start with at least one life")]
    NoStartingLives,

    #[error("time limit must be non-zero")]
    ZeroTimeLimit,
}

//
// ─── RULES ─────────────────────────────────────────────────────────────────────
//

/// Points for a correct attempt before the combo bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsRule {
    Flat(u32),
    /// `floor(base * (1 + level / 10))`.
    LevelScaled(u32),
}

impl PointsRule {
    #[must_use]
    pub fn base_points(self, level: u32) -> u32 {
        match self {
            PointsRule::Flat(base) => base,
            PointsRule::LevelScaled(base) => {
                let scaled = u64::from(base) * (10 + u64::from(level)) / 10;
                u32::try_from(scaled).unwrap_or(u32::MAX)
            }
        }
    }
}

/// When a correct attempt advances the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelUpRule {
    /// Every correct attempt climbs one floor.
    EveryCorrect,
    /// Level `L` is left once the cumulative score reaches `L * n`.
    ScorePerLevel(u32),
}

impl LevelUpRule {
    #[must_use]
    pub fn threshold(self, level: u32) -> Option<u64> {
        match self {
            LevelUpRule::EveryCorrect => None,
            LevelUpRule::ScorePerLevel(n) => Some(u64::from(level) * u64::from(n)),
        }
    }

    #[must_use]
    pub fn crossed(self, level: u32, score: u32) -> bool {
        self.threshold(level)
            .is_none_or(|threshold| u64::from(score) >= threshold)
    }
}

/// What an incorrect attempt does beyond resetting the combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Level is kept; only lives (if any) are charged.
    KeepLevel,
    /// Back to floor `n` whenever the session survives the miss.
    ResetToFloor(u32),
    /// Any miss ends the session.
    EndSession,
}

/// How an expired countdown ends an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    Lose,
    /// Won when the score is at least `n`, lost otherwise.
    WinAtScore(u32),
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Mode parameters for the progression engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionConfig {
    points: PointsRule,
    combo_bonus_per_streak: u32,
    combo_bonus_cap: u32,
    level_up: LevelUpRule,
    start_level: u32,
    max_level: Option<u32>,
    starting_lives: Option<u32>,
    failure: FailurePolicy,
    timer_expiry: ExpiryPolicy,
    time_limit: Option<Duration>,
}

impl ProgressionConfig {
    pub const DEFAULT_COMBO_BONUS_CAP: u32 = 5;
    pub const DEFAULT_COMBO_BONUS_PER_STREAK: u32 = 2;

    #[must_use]
    pub fn builder() -> ProgressionConfigBuilder {
        ProgressionConfigBuilder::default()
    }

    /// Tile forging: flat 10 points, a level every 50 points, a 60 second run.
    #[must_use]
    pub fn wordsmith() -> Self {
        Self {
            points: PointsRule::Flat(10),
            level_up: LevelUpRule::ScorePerLevel(50),
            timer_expiry: ExpiryPolicy::WinAtScore(0),
            time_limit: Some(Duration::from_secs(60)),
            ..Self::base()
        }
    }

    /// Grid walk: flat 10 points per clue, a level every 50 points, three lives.
    #[must_use]
    pub fn forest() -> Self {
        Self {
            points: PointsRule::Flat(10),
            level_up: LevelUpRule::ScorePerLevel(50),
            starting_lives: Some(3),
            ..Self::base()
        }
    }

    /// Guardian tower: level-scaled points, one floor per win, floor 100 is the
    /// top, three lives, and every miss sends the player back to floor 1.
    #[must_use]
    pub fn tower() -> Self {
        Self {
            points: PointsRule::LevelScaled(10),
            level_up: LevelUpRule::EveryCorrect,
            max_level: Some(100),
            starting_lives: Some(3),
            failure: FailurePolicy::ResetToFloor(1),
            ..Self::base()
        }
    }

    /// Clash rounds: flat 10 points, score-only, a 30 second round.
    #[must_use]
    pub fn clash() -> Self {
        Self {
            points: PointsRule::Flat(10),
            level_up: LevelUpRule::ScorePerLevel(50),
            timer_expiry: ExpiryPolicy::WinAtScore(0),
            time_limit: Some(Duration::from_secs(30)),
            ..Self::base()
        }
    }

    /// Quest lands: flat 10 points per unscrambled word, no lives, no timer.
    #[must_use]
    pub fn quest() -> Self {
        Self::base()
    }

    fn base() -> Self {
        Self {
            points: PointsRule::Flat(10),
            combo_bonus_per_streak: Self::DEFAULT_COMBO_BONUS_PER_STREAK,
            combo_bonus_cap: Self::DEFAULT_COMBO_BONUS_CAP,
            level_up: LevelUpRule::EveryCorrect,
            start_level: 1,
            max_level: None,
            starting_lives: None,
            failure: FailurePolicy::KeepLevel,
            timer_expiry: ExpiryPolicy::Lose,
            time_limit: None,
        }
    }

    #[must_use]
    pub fn points(&self) -> PointsRule {
        self.points
    }

    #[must_use]
    pub fn combo_bonus_per_streak(&self) -> u32 {
        self.combo_bonus_per_streak
    }

    #[must_use]
    pub fn combo_bonus_cap(&self) -> u32 {
        self.combo_bonus_cap
    }

    #[must_use]
    pub fn level_up(&self) -> LevelUpRule {
        self.level_up
    }

    #[must_use]
    pub fn start_level(&self) -> u32 {
        self.start_level
    }

    #[must_use]
    pub fn max_level(&self) -> Option<u32> {
        self.max_level
    }

    #[must_use]
    pub fn starting_lives(&self) -> Option<u32> {
        self.starting_lives
    }

    #[must_use]
    pub fn lives_enabled(&self) -> bool {
        self.starting_lives.is_some()
    }

    #[must_use]
    pub fn failure(&self) -> FailurePolicy {
        self.failure
    }

    #[must_use]
    pub fn timer_expiry(&self) -> ExpiryPolicy {
        self.timer_expiry
    }

    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Bonus added on top of the base points for the current streak.
    #[must_use]
    pub fn combo_bonus(&self, combo: u32) -> u32 {
        combo
            .min(self.combo_bonus_cap)
            .saturating_mul(self.combo_bonus_per_streak)
    }
}

/// Builder for custom engine configurations, starting from the plain defaults.
#[derive(Debug, Clone)]
pub struct ProgressionConfigBuilder {
    config: ProgressionConfig,
}

impl Default for ProgressionConfigBuilder {
    fn default() -> Self {
        Self {
            config: ProgressionConfig::base(),
        }
    }
}

impl ProgressionConfigBuilder {
    #[must_use]
    pub fn points(mut self, points: PointsRule) -> Self {
        self.config.points = points;
        self
    }

    #[must_use]
    pub fn combo_bonus(mut self, per_streak: u32, cap: u32) -> Self {
        self.config.combo_bonus_per_streak = per_streak;
        self.config.combo_bonus_cap = cap;
        self
    }

    #[must_use]
    pub fn level_up(mut self, rule: LevelUpRule) -> Self {
        self.config.level_up = rule;
        self
    }

    #[must_use]
    pub fn start_level(mut self, level: u32) -> Self {
        self.config.start_level = level;
        self
    }

    #[must_use]
    pub fn max_level(mut self, max: Option<u32>) -> Self {
        self.config.max_level = max;
        self
    }

    #[must_use]
    pub fn lives(mut self, lives: Option<u32>) -> Self {
        self.config.starting_lives = lives;
        self
    }

    #[must_use]
    pub fn failure(mut self, policy: FailurePolicy) -> Self {
        self.config.failure = policy;
        self
    }

    #[must_use]
    pub fn timer_expiry(mut self, policy: ExpiryPolicy) -> Self {
        self.config.timer_expiry = policy;
        self
    }

    #[must_use]
    pub fn time_limit(mut self, limit: Option<Duration>) -> Self {
        self.config.time_limit = limit;
        self
    }

    /// Finish the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for configurations the engine cannot run.
    pub fn build(self) -> Result<ProgressionConfig, ConfigError> {
        let c = self.config;
        if c.start_level == 0 {
            return Err(ConfigError::ZeroStartLevel);
        }
        if c.level_up == LevelUpRule::ScorePerLevel(0) {
            return Err(ConfigError::ZeroLevelThreshold);
        }
        if let Some(max) = c.max_level.filter(|max| *max < c.start_level) {
            return Err(ConfigError::MaxBelowStart {
                start: c.start_level,
                max,
            });
        }
        if let FailurePolicy::ResetToFloor(floor) = c.failure {
            if floor == 0 || c.max_level.is_some_and(|max| floor > max) {
                return Err(ConfigError::ResetFloorOutOfRange(floor));
            }
        }
        if c.starting_lives == Some(0) {
            return Err(ConfigError::NoStartingLives);
        }
        if c.time_limit.is_some_and(|limit| limit.is_zero()) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        Ok(c)
    }
}
