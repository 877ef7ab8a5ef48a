use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use realm_core::model::{AuthSession, GameMode, RecordId, Role, UserId, WordDraft, WordRecord};
use storage::repository::{AuthProvider, ContentStore, ProfileRepository, Storage};

use crate::error::{AdminError, AuthError};

/// Admin-only access to the content store.
///
/// Every call checks the signed-in session first. Writes hold an in-flight
/// flag, so a second submit or delete made before the first resolves fails
/// with `SubmissionInFlight` instead of reaching the store.
pub struct AdminService {
    content: Arc<dyn ContentStore>,
    profiles: Arc<dyn ProfileRepository>,
    auth: Arc<dyn AuthProvider>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when dropped, whether the write succeeded or not.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AdminService {
    #[must_use]
    pub fn new(
        content: Arc<dyn ContentStore>,
        profiles: Arc<dyn ProfileRepository>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            content,
            profiles,
            auth,
            in_flight: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(
            Arc::clone(&storage.content),
            Arc::clone(&storage.profiles),
            Arc::clone(&storage.auth),
        )
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Resolve the current session and require the admin role.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Auth` when signed out or not an admin, and
    /// `AdminError::Store` when the session cannot be read.
    pub async fn authorize(&self) -> Result<AuthSession, AdminError> {
        let Some(session) = self.auth.current_session().await? else {
            return Err(AuthError::SignedOut.into());
        };
        if !session.is_admin() {
            tracing::warn!(user = %session.user_id, role = %session.role, "admin access denied");
            return Err(AuthError::NotAdmin { role: session.role }.into());
        }
        Ok(session)
    }

    /// Records for `mode`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AdminError` for authorization or storage failures.
    pub async fn list(&self, mode: GameMode) -> Result<Vec<WordRecord>, AdminError> {
        self.authorize().await?;
        Ok(self.content.list_by_mode(mode).await?)
    }

    /// Validate `draft` for `mode` and store it.
    ///
    /// Validation runs locally; an invalid draft never reaches the store.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::SubmissionInFlight` while another write is
    /// pending, `AdminError::Validation` for invalid drafts, and
    /// `AdminError::Auth` or `AdminError::Store` otherwise.
    pub async fn submit(&self, mode: GameMode, draft: &WordDraft) -> Result<WordRecord, AdminError> {
        let _guard = self.begin()?;
        let session = self.authorize().await?;
        let record = draft.validate(mode)?;
        let stored = self.content.insert(record).await.inspect_err(|e| {
            tracing::error!(error = %e, %mode, "failed to store word record");
        })?;
        tracing::info!(id = %stored.id, %mode, user = %session.user_id, "word record added");
        Ok(stored)
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::SubmissionInFlight` while another write is
    /// pending, and `AdminError::Auth` or `AdminError::Store` otherwise.
    pub async fn delete(&self, id: RecordId) -> Result<(), AdminError> {
        let _guard = self.begin()?;
        let session = self.authorize().await?;
        self.content.delete(id).await.inspect_err(|e| {
            tracing::error!(error = %e, %id, "failed to delete word record");
        })?;
        tracing::info!(%id, user = %session.user_id, "word record deleted");
        Ok(())
    }

    /// Set another user's role.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Auth` unless an admin is signed in, and
    /// `AdminError::Store` when the profile cannot be written.
    pub async fn grant(&self, user: UserId, role: Role) -> Result<(), AdminError> {
        let _guard = self.begin()?;
        let session = self.authorize().await?;
        self.profiles.set_role(user, role).await?;
        tracing::info!(%user, %role, by = %session.user_id, "role granted");
        Ok(())
    }

    fn begin(&self) -> Result<InFlight<'_>, AdminError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AdminError::SubmissionInFlight);
        }
        Ok(InFlight(&self.in_flight))
    }
}
