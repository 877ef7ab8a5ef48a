use chrono::Duration;
use realm_core::Clock;
use realm_core::model::{
    AuthSession, GameMode, ModeDetails, ObstacleType, RecordId, Role, UserId, WordDraft,
};
use realm_core::time::fixed_now;
use storage::repository::{AuthProvider, ContentStore, ProfileRepository, Storage, StorageError};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_lists_newest_first_per_mode() {
    let repo = connect("memdb_list_order").await;
    let base = fixed_now();

    for (offset, word) in [(0, "oak"), (2, "pine"), (1, "elm")] {
        let record = WordDraft::new(word, "a tree")
            .with_obstacle(ObstacleType::Tree)
            .validate(GameMode::Forest)
            .unwrap();
        repo.clone()
            .with_clock(Clock::fixed(base + Duration::minutes(offset)))
            .insert(record)
            .await
            .unwrap();
    }
    let tower = WordDraft::new("ephemeral", "short-lived")
        .with_tower(4, &["temporary", "eternal"], "temporary")
        .validate(GameMode::Tower)
        .unwrap();
    repo.insert(tower).await.unwrap();

    let forest = repo.list_by_mode(GameMode::Forest).await.unwrap();
    let words: Vec<_> = forest.iter().map(|r| r.word.as_str()).collect();
    assert_eq!(words, ["pine", "elm", "oak"]);

    let towers = repo.list_by_mode(GameMode::Tower).await.unwrap();
    assert_eq!(towers.len(), 1);
    assert_eq!(
        towers[0].details,
        ModeDetails::Tower {
            floor_number: 4,
            options: vec!["temporary".into(), "eternal".into()],
            correct_answer: "temporary".into(),
        }
    );

    assert!(repo.list_by_mode(GameMode::Wordsmith).await.unwrap().is_empty());
}

#[tokio::test]
async fn sqlite_round_trips_wordsmith_components() {
    let repo = connect("memdb_wordsmith").await.with_clock(Clock::fixed(fixed_now()));
    let record = WordDraft::new("unhelpful", "not helpful")
        .with_components("un, help, ful")
        .validate(GameMode::Wordsmith)
        .unwrap();

    let stored = repo.insert(record).await.unwrap();
    assert_eq!(stored.created_at, fixed_now());

    let listed = repo.list_by_mode(GameMode::Wordsmith).await.unwrap();
    assert_eq!(listed, vec![stored]);
}

#[tokio::test]
async fn sqlite_delete_removes_once() {
    let repo = connect("memdb_delete").await;
    let record = WordDraft::new("snare", "a trap")
        .with_obstacle(ObstacleType::Trap)
        .validate(GameMode::Forest)
        .unwrap();
    let stored = repo.insert(record).await.unwrap();

    repo.delete(stored.id).await.unwrap();
    assert!(repo.list_by_mode(GameMode::Forest).await.unwrap().is_empty());

    let err = repo.delete(stored.id).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
    let err = repo.delete(RecordId::generate()).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_profiles_upsert_roles() {
    let repo = connect("memdb_profiles").await;
    let user = UserId::generate();

    assert_eq!(repo.role_for(user).await.unwrap(), None);
    repo.set_role(user, Role::AdminPending).await.unwrap();
    assert_eq!(repo.role_for(user).await.unwrap(), Some(Role::AdminPending));
    repo.set_role(user, Role::Admin).await.unwrap();
    assert_eq!(repo.role_for(user).await.unwrap(), Some(Role::Admin));
}

#[tokio::test]
async fn sqlite_storage_resolves_session_from_profiles() {
    let url = "sqlite:file:memdb_session?mode=memory&cache=shared";
    let admin = UserId::generate();

    let signed_out = Storage::sqlite(url, None).await.unwrap();
    assert_eq!(signed_out.auth.current_session().await.unwrap(), None);

    let storage = Storage::sqlite(url, Some(admin)).await.unwrap();
    assert_eq!(
        storage.auth.current_session().await.unwrap(),
        Some(AuthSession::new(admin, Role::User))
    );

    storage.profiles.set_role(admin, Role::Admin).await.unwrap();
    let session = storage.auth.current_session().await.unwrap().unwrap();
    assert!(session.is_admin());
}
