use async_trait::async_trait;
use realm_core::Clock;
use realm_core::model::{AuthSession, GameMode, NewWordRecord, RecordId, Role, UserId, WordRecord};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("backend rejected request ({status}): {message}")]
    Backend { status: u16, message: String },
}

/// Word and challenge records, reached only by content administration.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Records of one mode, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the records cannot be read.
    async fn list_by_mode(&self, mode: GameMode) -> Result<Vec<WordRecord>, StorageError>;

    /// Store a validated record and return it with its assigned id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn insert(&self, record: NewWordRecord) -> Result<WordRecord, StorageError>;

    /// Delete a record by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no such record exists, or other storage errors.
    async fn delete(&self, id: RecordId) -> Result<(), StorageError>;
}

/// User profile roles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Role stored for `user`, if a profile exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be read.
    async fn role_for(&self, user: UserId) -> Result<Option<Role>, StorageError>;

    /// Create or update the profile role for `user`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be stored.
    async fn set_role(&self, user: UserId, role: Role) -> Result<(), StorageError>;
}

/// Source of the currently signed-in user.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The active session, or `None` when nobody is signed in.
    ///
    /// A user without a profile is treated as a plain `Role::User`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session or profile lookup fails.
    async fn current_session(&self) -> Result<Option<AuthSession>, StorageError>;
}

/// Session for a locally known user id, with the role read from profiles.
#[derive(Clone)]
pub struct ProfileSessionAuth {
    profiles: Arc<dyn ProfileRepository>,
    user: Option<UserId>,
}

impl ProfileSessionAuth {
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileRepository>, user: Option<UserId>) -> Self {
        Self { profiles, user }
    }
}

#[async_trait]
impl AuthProvider for ProfileSessionAuth {
    async fn current_session(&self) -> Result<Option<AuthSession>, StorageError> {
        let Some(user) = self.user else {
            return Ok(None);
        };
        let role = self.profiles.role_for(user).await?.unwrap_or(Role::User);
        Ok(Some(AuthSession::new(user, role)))
    }
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    clock: Clock,
    words: Arc<Mutex<Vec<WordRecord>>>,
    profiles: Arc<Mutex<HashMap<UserId, Role>>>,
    signed_in: Arc<Mutex<Option<UserId>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Sign `user` in; subsequent `current_session` calls report them.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the session lock is poisoned.
    pub fn sign_in(&self, user: UserId) -> Result<(), StorageError> {
        let mut guard = self
            .signed_in
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(user);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the session lock is poisoned.
    pub fn sign_out(&self) -> Result<(), StorageError> {
        let mut guard = self
            .signed_in
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[async_trait]
impl ContentStore for InMemoryRepository {
    async fn list_by_mode(&self, mode: GameMode) -> Result<Vec<WordRecord>, StorageError> {
        let guard = self
            .words
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        // Later inserts come first among equal timestamps.
        let mut found: Vec<WordRecord> = guard
            .iter()
            .rev()
            .filter(|r| r.mode() == mode)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn insert(&self, record: NewWordRecord) -> Result<WordRecord, StorageError> {
        let stored = record.into_record(RecordId::generate(), self.clock.now());
        let mut guard = self
            .words
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: RecordId) -> Result<(), StorageError> {
        let mut guard = self
            .words
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let before = guard.len();
        guard.retain(|r| r.id != id);
        if guard.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn role_for(&self, user: UserId) -> Result<Option<Role>, StorageError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&user).copied())
    }

    async fn set_role(&self, user: UserId, role: Role) -> Result<(), StorageError> {
        let mut guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(user, role);
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for InMemoryRepository {
    async fn current_session(&self) -> Result<Option<AuthSession>, StorageError> {
        let user = *self
            .signed_in
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let Some(user) = user else {
            return Ok(None);
        };
        let role = self.role_for(user).await?.unwrap_or(Role::User);
        Ok(Some(AuthSession::new(user, role)))
    }
}

/// Content, profile and auth backends behind trait objects, built once at
/// start-up and handed to services.
#[derive(Clone)]
pub struct Storage {
    pub content: Arc<dyn ContentStore>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub auth: Arc<dyn AuthProvider>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let content: Arc<dyn ContentStore> = Arc::new(repo.clone());
        let profiles: Arc<dyn ProfileRepository> = Arc::new(repo.clone());
        let auth: Arc<dyn AuthProvider> = Arc::new(repo);
        Self {
            content,
            profiles,
            auth,
        }
    }
}
