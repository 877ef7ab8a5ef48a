//! Interactive runners layered over a game session: the forge's tile
//! cauldron, the forest grid, clash matches and quest lands.

mod clash;
mod forest;
mod forge;
mod quest;

pub use clash::{ClashMatch, ClashPlayer, MatchKind};
pub use forest::{Direction, ForestRun, GRID_SIZE, Obstacle, POWERUP_POINTS, Position, Step};
pub use forge::{Forge, ForgeCheck, MIN_JUDGED_LEN};
pub use quest::QuestLand;
