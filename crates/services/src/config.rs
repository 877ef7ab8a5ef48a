//! Backend selection from environment variables.

use realm_core::model::UserId;
use storage::hosted::HostedConfig;

use crate::error::BackendConfigError;

pub const DB_URL_VAR: &str = "REALM_DB_URL";
pub const USER_ID_VAR: &str = "REALM_USER_ID";
pub const BACKEND_URL_VAR: &str = "REALM_BACKEND_URL";
pub const BACKEND_KEY_VAR: &str = "REALM_BACKEND_KEY";
pub const ACCESS_TOKEN_VAR: &str = "REALM_ACCESS_TOKEN";

pub const DEFAULT_DB_URL: &str = "sqlite:realm.sqlite3";

/// Where content, profiles and sessions live.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// Local database; the signed-in user is whoever `user` names.
    Sqlite {
        db_url: String,
        user: Option<UserId>,
    },
    Hosted(HostedConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Sqlite {
            db_url: DEFAULT_DB_URL.to_string(),
            user: None,
        }
    }
}

impl BackendConfig {
    /// Read the process environment.
    ///
    /// # Errors
    ///
    /// Returns `BackendConfigError` when only half of the hosted settings are
    /// present or `REALM_USER_ID` is not a UUID.
    pub fn from_env() -> Result<Self, BackendConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`. Blank values count as unset.
    ///
    /// A hosted backend is chosen when both `REALM_BACKEND_URL` and
    /// `REALM_BACKEND_KEY` are present; otherwise `SQLite` is used.
    ///
    /// # Errors
    ///
    /// See [`BackendConfig::from_env`].
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, BackendConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        match (get(BACKEND_URL_VAR), get(BACKEND_KEY_VAR)) {
            (Some(base_url), Some(api_key)) => {
                return Ok(BackendConfig::Hosted(HostedConfig {
                    base_url,
                    api_key,
                    access_token: get(ACCESS_TOKEN_VAR),
                }));
            }
            (Some(_), None) => {
                return Err(BackendConfigError::Incomplete {
                    present: BACKEND_URL_VAR,
                    missing: BACKEND_KEY_VAR,
                });
            }
            (None, Some(_)) => {
                return Err(BackendConfigError::Incomplete {
                    present: BACKEND_KEY_VAR,
                    missing: BACKEND_URL_VAR,
                });
            }
            (None, None) => {}
        }

        let user = get(USER_ID_VAR)
            .map(|raw| raw.parse::<UserId>())
            .transpose()?;
        Ok(BackendConfig::Sqlite {
            db_url: get(DB_URL_VAR).unwrap_or_else(|| DEFAULT_DB_URL.to_string()),
            user,
        })
    }

    /// Override the database URL. Hosted settings are left alone.
    #[must_use]
    pub fn with_db_url(mut self, url: impl Into<String>) -> Self {
        if let BackendConfig::Sqlite { db_url, .. } = &mut self {
            *db_url = url.into();
        }
        self
    }

    /// Override the signed-in local user. Hosted settings are left alone.
    #[must_use]
    pub fn with_user(mut self, id: UserId) -> Self {
        if let BackendConfig::Sqlite { user, .. } = &mut self {
            *user = Some(id);
        }
        self
    }
}
