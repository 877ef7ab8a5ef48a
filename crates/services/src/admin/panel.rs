use std::sync::Arc;

use realm_core::model::{GameMode, RecordError, RecordId, WordDraft, WordRecord};

use super::AdminService;
use crate::error::AdminError;

/// Status line shown above the admin form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    /// A failed store call; the form is intact and the action can be retried.
    Error(String),
    Validation(String),
}

impl Banner {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Banner::Success(text) | Banner::Error(text) | Banner::Validation(text) => text,
        }
    }
}

/// Where the panel wants the user to go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    SignIn,
}

/// Presenter state for the content administration screen.
pub struct AdminPanel {
    service: Arc<AdminService>,
    mode: GameMode,
    records: Vec<WordRecord>,
    draft: WordDraft,
    banner: Option<Banner>,
    navigation: Option<Navigation>,
}

impl AdminPanel {
    #[must_use]
    pub fn new(service: Arc<AdminService>) -> Self {
        Self {
            service,
            mode: GameMode::Wordsmith,
            records: Vec::new(),
            draft: WordDraft::default(),
            banner: None,
            navigation: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn records(&self) -> &[WordRecord] {
        &self.records
    }

    #[must_use]
    pub fn draft(&self) -> &WordDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut WordDraft {
        &mut self.draft
    }

    #[must_use]
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    #[must_use]
    pub fn navigation(&self) -> Option<Navigation> {
        self.navigation
    }

    /// Load records for the selected mode. Any store round trip that succeeds
    /// clears a pending sign-in redirect.
    pub async fn refresh(&mut self) {
        match self.service.list(self.mode).await {
            Ok(records) => {
                self.records = records;
                self.navigation = None;
            }
            Err(err) => self.fail(err, "Error loading words. Please try again."),
        }
    }

    /// Switch modes, clear the form and reload.
    pub async fn select_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.draft = WordDraft::default();
        self.banner = None;
        self.navigation = None;
        self.records.clear();
        self.refresh().await;
    }

    /// Submit the draft for the selected mode.
    ///
    /// On success the new record is listed first and the form resets. On any
    /// failure the form is kept as typed.
    pub async fn submit(&mut self) {
        match self.service.submit(self.mode, &self.draft).await {
            Ok(record) => {
                self.records.insert(0, record);
                self.draft = WordDraft::default();
                self.navigation = None;
                self.banner = Some(Banner::Success("Word added successfully!".into()));
            }
            Err(err) => self.fail(err, "Error adding word. Please try again."),
        }
    }

    /// Delete a record; it leaves the list only once the store confirms.
    pub async fn delete(&mut self, id: RecordId) {
        match self.service.delete(id).await {
            Ok(()) => {
                self.records.retain(|r| r.id != id);
                self.navigation = None;
                self.banner = Some(Banner::Success("Word deleted successfully!".into()));
            }
            Err(err) => self.fail(err, "Error deleting word. Please try again."),
        }
    }

    fn fail(&mut self, err: AdminError, retry: &str) {
        self.banner = Some(match err {
            AdminError::Validation(e) => Banner::Validation(validation_message(&e).into()),
            AdminError::Auth(e) => {
                self.navigation = Some(Navigation::SignIn);
                Banner::Error(e.to_string())
            }
            AdminError::SubmissionInFlight => {
                Banner::Error("A submission is already in progress.".into())
            }
            other => {
                tracing::warn!(error = %other, mode = %self.mode, "admin action failed");
                Banner::Error(retry.into())
            }
        });
    }
}

fn validation_message(err: &RecordError) -> &'static str {
    match err {
        RecordError::MissingField { .. } => "Please fill in all required fields",
        RecordError::MissingComponents => "Please add component words",
        RecordError::MissingObstacle => "Please select an obstacle type",
        RecordError::MissingFloor => "Please specify the floor number",
        RecordError::FloorOutOfRange(_) => "Floor number must be between 1 and 100",
        RecordError::MissingOptions => "Please add answer options and select the correct answer",
        RecordError::CorrectAnswerNotInOptions(_) => {
            "The correct answer must be one of the options"
        }
        _ => "Please check the form",
    }
}
