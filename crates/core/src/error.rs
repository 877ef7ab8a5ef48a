use thiserror::Error;

use crate::model::{ParseIdError, ParseModeError, ParseRoleError, RecordError};
use crate::progression::ConfigError;

/// Umbrella error for callers that want a single core error type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mode(#[from] ParseModeError),
    #[error(transparent)]
    Role(#[from] ParseRoleError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
}
