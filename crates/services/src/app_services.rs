use std::sync::Arc;

use storage::repository::{InMemoryRepository, Storage};

use crate::admin::{AdminPanel, AdminService};
use crate::config::BackendConfig;
use crate::error::AppServicesError;

/// Assembles app-facing services over the configured backend.
///
/// Gameplay never goes through here; only content administration reaches
/// the store.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    admin: Arc<AdminService>,
}

impl AppServices {
    /// Build services for `config`, connecting and migrating `SQLite` when it
    /// is the selected backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn from_config(config: BackendConfig) -> Result<Self, AppServicesError> {
        let storage = match config {
            BackendConfig::Sqlite { db_url, user } => {
                tracing::debug!(%db_url, signed_in = user.is_some(), "using sqlite backend");
                Storage::sqlite(&db_url, user).await?
            }
            BackendConfig::Hosted(hosted) => {
                tracing::debug!(base_url = %hosted.base_url, "using hosted backend");
                Storage::hosted(hosted)
            }
        };
        Ok(Self::from_storage(storage))
    }

    /// Build services backed by the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` for invalid settings or storage failures.
    pub async fn from_env() -> Result<Self, AppServicesError> {
        Self::from_config(BackendConfig::from_env()?).await
    }

    #[must_use]
    pub fn in_memory(repo: InMemoryRepository) -> Self {
        Self::from_storage(Storage::from_in_memory(repo))
    }

    #[must_use]
    pub fn from_storage(storage: Storage) -> Self {
        let admin = Arc::new(AdminService::from_storage(&storage));
        Self { storage, admin }
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn admin(&self) -> Arc<AdminService> {
        Arc::clone(&self.admin)
    }

    #[must_use]
    pub fn admin_panel(&self) -> AdminPanel {
        AdminPanel::new(self.admin())
    }
}
