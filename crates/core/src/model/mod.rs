mod auth;
mod challenge;
mod game_mode;
mod ids;
mod record;

pub use auth::{AuthSession, ParseRoleError, Role};
pub use challenge::{Challenge, ChallengeKind};
pub use game_mode::{GameMode, ObstacleType, ParseModeError};
pub use ids::{ParseIdError, RecordId, UserId};
pub use record::{
    DRAFT_OPTION_SLOTS, MAX_FLOOR, MIN_FLOOR, ModeDetails, NewWordRecord, RecordError, WordDraft,
    WordRecord,
};
