//! Hosted backend-as-a-service adapter.
//!
//! Talks to a PostgREST-style data API (`/rest/v1/<table>`) and a token
//! based auth API (`/auth/v1/user`). Requests carry the project `apikey`
//! header plus a bearer token: the signed-in user's access token when one is
//! configured, the project key otherwise.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use realm_core::model::{
    AuthSession, GameMode, ModeDetails, NewWordRecord, ObstacleType, RecordId, Role, UserId,
    WordRecord,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use std::sync::Arc;

use crate::repository::{AuthProvider, ContentStore, ProfileRepository, Storage, StorageError};

#[derive(Clone, Debug)]
pub struct HostedConfig {
    pub base_url: String,
    pub api_key: String,
    pub access_token: Option<String>,
}

#[derive(Clone)]
pub struct HostedBackend {
    client: Client,
    config: HostedConfig,
}

impl HostedBackend {
    #[must_use]
    pub fn new(config: HostedConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base())
    }

    fn auth_url(&self) -> String {
        format!("{}/auth/v1/user", self.base())
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let token = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.api_key);
        self.client
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(token)
    }
}

impl Storage {
    /// Routes content, profiles and auth through one hosted project.
    #[must_use]
    pub fn hosted(config: HostedConfig) -> Self {
        let backend = Arc::new(HostedBackend::new(config));
        let content: Arc<dyn ContentStore> = backend.clone();
        let profiles: Arc<dyn ProfileRepository> = backend.clone();
        let auth: Arc<dyn AuthProvider> = backend;
        Self {
            content,
            profiles,
            auth,
        }
    }
}

fn transport(e: reqwest::Error) -> StorageError {
    if e.is_decode() {
        StorageError::Serialization(e.to_string())
    } else {
        StorageError::Connection(e.to_string())
    }
}

async fn check(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), %message, "hosted backend rejected request");
    Err(match status {
        StatusCode::NOT_FOUND => StorageError::NotFound,
        StatusCode::CONFLICT => StorageError::Conflict,
        _ => StorageError::Backend {
            status: status.as_u16(),
            message,
        },
    })
}

//
// ─── ROWS ──────────────────────────────────────────────────────────────────────
//

/// Wire shape of a `words` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct WordRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    word: String,
    definition: String,
    game_mode: GameMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    combined_word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component_words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    obstacle_type: Option<ObstacleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    floor_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl WordRow {
    fn from_new(record: &NewWordRecord) -> Self {
        let mut row = Self {
            id: None,
            word: record.word.clone(),
            definition: record.definition.clone(),
            game_mode: record.mode(),
            combined_word: None,
            component_words: None,
            obstacle_type: None,
            floor_number: None,
            options: None,
            correct_answer: None,
            created_at: None,
        };
        match &record.details {
            ModeDetails::Wordsmith {
                combined_word,
                component_words,
            } => {
                row.combined_word = Some(combined_word.clone());
                row.component_words = Some(component_words.clone());
            }
            ModeDetails::Forest { obstacle_type } => row.obstacle_type = Some(*obstacle_type),
            ModeDetails::Tower {
                floor_number,
                options,
                correct_answer,
            } => {
                row.floor_number = Some(*floor_number);
                row.options = Some(options.clone());
                row.correct_answer = Some(correct_answer.clone());
            }
        }
        row
    }

    fn into_record(self) -> Result<WordRecord, StorageError> {
        fn missing(field: &str) -> StorageError {
            StorageError::Serialization(format!("missing {field}"))
        }

        let details = match self.game_mode {
            GameMode::Wordsmith => ModeDetails::Wordsmith {
                combined_word: self.combined_word.ok_or_else(|| missing("combined_word"))?,
                component_words: self
                    .component_words
                    .ok_or_else(|| missing("component_words"))?,
            },
            GameMode::Forest => ModeDetails::Forest {
                obstacle_type: self.obstacle_type.ok_or_else(|| missing("obstacle_type"))?,
            },
            GameMode::Tower => ModeDetails::Tower {
                floor_number: self.floor_number.ok_or_else(|| missing("floor_number"))?,
                options: self.options.ok_or_else(|| missing("options"))?,
                correct_answer: self.correct_answer.ok_or_else(|| missing("correct_answer"))?,
            },
        };

        Ok(WordRecord {
            id: self.id.ok_or_else(|| missing("id"))?,
            word: self.word,
            definition: self.definition,
            details,
            created_at: self.created_at.ok_or_else(|| missing("created_at"))?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RoleRow {
    role: String,
}

#[derive(Debug, Serialize)]
struct ProfileRow {
    id: UserId,
    role: Role,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: UserId,
}

//
// ─── TRAITS ────────────────────────────────────────────────────────────────────
//

#[async_trait]
impl ContentStore for HostedBackend {
    async fn list_by_mode(&self, mode: GameMode) -> Result<Vec<WordRecord>, StorageError> {
        let response = self
            .request(Method::GET, self.rest_url("words"))
            .query(&[
                ("select", "*".to_string()),
                ("game_mode", format!("eq.{mode}")),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await
            .map_err(transport)?;
        let rows: Vec<WordRow> = check(response).await?.json().await.map_err(transport)?;
        rows.into_iter().map(WordRow::into_record).collect()
    }

    async fn insert(&self, record: NewWordRecord) -> Result<WordRecord, StorageError> {
        let response = self
            .request(Method::POST, self.rest_url("words"))
            .header("Prefer", "return=representation")
            .json(&[WordRow::from_new(&record)])
            .send()
            .await
            .map_err(transport)?;
        let rows: Vec<WordRow> = check(response).await?.json().await.map_err(transport)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StorageError::Serialization("insert returned no rows".into()))?
            .into_record()
    }

    async fn delete(&self, id: RecordId) -> Result<(), StorageError> {
        let response = self
            .request(Method::DELETE, self.rest_url("words"))
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(transport)?;
        let deleted: Vec<serde_json::Value> =
            check(response).await?.json().await.map_err(transport)?;
        if deleted.is_empty() {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for HostedBackend {
    async fn role_for(&self, user: UserId) -> Result<Option<Role>, StorageError> {
        let response = self
            .request(Method::GET, self.rest_url("profiles"))
            .query(&[("select", "role".to_string()), ("id", format!("eq.{user}"))])
            .send()
            .await
            .map_err(transport)?;
        let rows: Vec<RoleRow> = check(response).await?.json().await.map_err(transport)?;
        rows.into_iter()
            .next()
            .map(|row| {
                row.role
                    .parse::<Role>()
                    .map_err(|e| StorageError::Serialization(e.to_string()))
            })
            .transpose()
    }

    async fn set_role(&self, user: UserId, role: Role) -> Result<(), StorageError> {
        let response = self
            .request(Method::POST, self.rest_url("profiles"))
            .header("Prefer", "resolution=merge-duplicates")
            .json(&[ProfileRow { id: user, role }])
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for HostedBackend {
    async fn current_session(&self) -> Result<Option<AuthSession>, StorageError> {
        if self.config.access_token.is_none() {
            return Ok(None);
        }
        let response = self
            .request(Method::GET, self.auth_url())
            .send()
            .await
            .map_err(transport)?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::info!("access token rejected; treating as signed out");
            return Ok(None);
        }
        let user: AuthUser = check(response).await?.json().await.map_err(transport)?;
        let role = self.role_for(user.id).await?.unwrap_or(Role::User);
        Ok(Some(AuthSession::new(user.id, role)))
    }
}
