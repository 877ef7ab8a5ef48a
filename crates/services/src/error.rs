//! Shared error types for the services crate.

use thiserror::Error;

use realm_core::model::{ParseIdError, RecordError, Role};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::modes::MatchKind;

/// Why the current user may not administer content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("sign in to manage content")]
    SignedOut,
    #[error("admin access required (current role: {role})")]
    NotAdmin { role: Role },
}

/// Errors emitted by `AdminService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminError {
    #[error(transparent)]
    Validation(#[from] RecordError),
    #[error(transparent)]
    Store(#[from] StorageError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("a submission is already in progress")]
    SubmissionInFlight,
}

/// Errors emitted when setting up a clash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ClashError {
    #[error("{count} players cannot play a {kind:?} match")]
    PlayerCount { kind: MatchKind, count: usize },
    #[error("clash rounds need a time limit")]
    Untimed,
}

/// Errors emitted while reading backend settings from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendConfigError {
    #[error("{present} is set but {missing} is not")]
    Incomplete {
        present: &'static str,
        missing: &'static str,
    },
    #[error("invalid REALM_USER_ID: {0}")]
    UserId(#[from] ParseIdError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] BackendConfigError),
}
