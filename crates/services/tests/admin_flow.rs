use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use realm_core::model::{
    GameMode, NewWordRecord, ObstacleType, RecordId, Role, UserId, WordDraft, WordRecord,
};
use services::{AdminPanel, AdminService, Banner, Navigation};
use storage::repository::{ContentStore, InMemoryRepository, ProfileRepository, StorageError};

/// Counts every call that reaches the store; optionally fails them all.
struct CountingStore {
    inner: InMemoryRepository,
    calls: AtomicUsize,
    fail: bool,
}

impl CountingStore {
    fn new(inner: InMemoryRepository, fail: bool) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            fail,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StorageError::Connection("backend unreachable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for CountingStore {
    async fn list_by_mode(&self, mode: GameMode) -> Result<Vec<WordRecord>, StorageError> {
        self.hit()?;
        self.inner.list_by_mode(mode).await
    }

    async fn insert(&self, record: NewWordRecord) -> Result<WordRecord, StorageError> {
        self.hit()?;
        self.inner.insert(record).await
    }

    async fn delete(&self, id: RecordId) -> Result<(), StorageError> {
        self.hit()?;
        self.inner.delete(id).await
    }
}

async fn admin_repo() -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    let user = UserId::generate();
    repo.set_role(user, Role::Admin).await.unwrap();
    repo.sign_in(user).unwrap();
    repo
}

fn panel_over(repo: &InMemoryRepository, store: Arc<CountingStore>) -> AdminPanel {
    let service = AdminService::new(store, Arc::new(repo.clone()), Arc::new(repo.clone()));
    AdminPanel::new(Arc::new(service))
}

#[tokio::test]
async fn invalid_wordsmith_draft_never_reaches_the_store() {
    let repo = admin_repo().await;
    let store = Arc::new(CountingStore::new(repo.clone(), false));
    let mut panel = panel_over(&repo, Arc::clone(&store));

    panel.select_mode(GameMode::Wordsmith).await;
    let calls_after_load = store.calls();

    *panel.draft_mut() = WordDraft::new("unhelpful", "not helpful");
    panel.submit().await;

    assert_eq!(store.calls(), calls_after_load);
    assert_eq!(
        panel.banner(),
        Some(&Banner::Validation("Please add component words".into()))
    );
    assert_eq!(panel.draft().word, "unhelpful");
    assert!(panel.records().is_empty());
}

#[tokio::test]
async fn successful_submit_prepends_and_resets_the_form() {
    let repo = admin_repo().await;
    let store = Arc::new(CountingStore::new(repo.clone(), false));
    let mut panel = panel_over(&repo, Arc::clone(&store));
    panel.select_mode(GameMode::Forest).await;

    for word in ["oak", "snare"] {
        *panel.draft_mut() = WordDraft::new(word, "forest word").with_obstacle(ObstacleType::Trap);
        panel.submit().await;
    }

    let words: Vec<_> = panel.records().iter().map(|r| r.word.as_str()).collect();
    assert_eq!(words, ["snare", "oak"]);
    assert_eq!(panel.draft(), &WordDraft::default());
    assert_eq!(panel.banner().map(Banner::text), Some("Word added successfully!"));
}

#[tokio::test]
async fn store_failures_keep_the_form_for_retry() {
    let repo = admin_repo().await;
    let store = Arc::new(CountingStore::new(repo.clone(), true));
    let mut panel = panel_over(&repo, Arc::clone(&store));

    let draft = WordDraft::new("ephemeral", "short-lived").with_tower(
        1,
        &["temporary", "eternal"],
        "temporary",
    );
    *panel.draft_mut() = draft.clone();
    panel.select_mode(GameMode::Tower).await;
    *panel.draft_mut() = draft.clone();
    panel.submit().await;

    assert_eq!(
        panel.banner(),
        Some(&Banner::Error("Error adding word. Please try again.".into()))
    );
    assert_eq!(panel.draft(), &draft);
    assert_eq!(panel.navigation(), None);
    assert_eq!(store.calls(), 2);
}

#[tokio::test]
async fn deletes_wait_for_the_store() {
    let repo = admin_repo().await;
    let store = Arc::new(CountingStore::new(repo.clone(), false));
    let mut panel = panel_over(&repo, Arc::clone(&store));
    panel.select_mode(GameMode::Forest).await;
    *panel.draft_mut() = WordDraft::new("grove", "small wood").with_obstacle(ObstacleType::Tree);
    panel.submit().await;
    let id = panel.records()[0].id;

    panel.delete(RecordId::generate()).await;
    assert_eq!(panel.records().len(), 1);
    assert!(matches!(panel.banner(), Some(Banner::Error(_))));

    panel.delete(id).await;
    assert!(panel.records().is_empty());
    assert_eq!(panel.banner().map(Banner::text), Some("Word deleted successfully!"));
}

#[tokio::test]
async fn non_admins_are_sent_to_sign_in() {
    let repo = InMemoryRepository::new();
    let user = UserId::generate();
    repo.sign_in(user).unwrap();
    let store = Arc::new(CountingStore::new(repo.clone(), false));
    let mut panel = panel_over(&repo, Arc::clone(&store));

    panel.select_mode(GameMode::Tower).await;

    assert_eq!(panel.navigation(), Some(Navigation::SignIn));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn sign_in_redirect_clears_once_access_is_granted() {
    let repo = InMemoryRepository::new();
    let user = UserId::generate();
    repo.sign_in(user).unwrap();
    let store = Arc::new(CountingStore::new(repo.clone(), false));
    let mut panel = panel_over(&repo, Arc::clone(&store));

    panel.refresh().await;
    assert_eq!(panel.navigation(), Some(Navigation::SignIn));

    repo.set_role(user, Role::Admin).await.unwrap();
    panel.refresh().await;
    assert_eq!(panel.navigation(), None);

    repo.set_role(user, Role::User).await.unwrap();
    panel.select_mode(GameMode::Forest).await;
    assert_eq!(panel.navigation(), Some(Navigation::SignIn));

    repo.set_role(user, Role::Admin).await.unwrap();
    *panel.draft_mut() =
        WordDraft::new("thicket", "dense growth").with_obstacle(ObstacleType::Tree);
    panel.submit().await;
    assert_eq!(panel.navigation(), None);
    assert_eq!(panel.banner().map(Banner::text), Some("Word added successfully!"));
}
