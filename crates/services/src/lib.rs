#![forbid(unsafe_code)]

pub mod admin;
pub mod app_services;
pub mod challenge;
pub mod config;
pub mod error;
pub mod game_session;
pub mod modes;

pub use realm_core::Clock;

pub use admin::{AdminPanel, AdminService, Banner, Navigation};
pub use app_services::AppServices;
pub use challenge::ChallengeSource;
pub use config::BackendConfig;
pub use error::{AdminError, AppServicesError, AuthError, BackendConfigError, ClashError};
pub use game_session::{AttemptResult, GameSession, GameSummary};
