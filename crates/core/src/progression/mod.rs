//! Score, combo, level and lives bookkeeping shared by every game mode.
//!
//! A session owns one [`ProgressionState`]. Every change to it goes through
//! [`apply`], which takes the current state and an [`Event`] and returns the
//! replacement state together with the [`Effects`] the presenter should show.

mod config;
mod engine;
mod state;
mod timer;

pub use config::{
    ConfigError, ExpiryPolicy, FailurePolicy, LevelUpRule, PointsRule, ProgressionConfig,
    ProgressionConfigBuilder,
};
pub use engine::{Effects, Event, Outcome, apply, apply_attempt};
pub use state::{ProgressionState, Status};
pub use timer::Countdown;
