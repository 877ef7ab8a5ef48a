use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use realm_core::model::{GameMode, RecordId, WordDraft};
use realm_core::progression::{Outcome, ProgressionConfig, Status};
use realm_core::time::fixed_now;
use services::GameSession;
use services::challenge::{ClueSource, GuardianSource, TileSource};
use services::modes::{Direction, ForestRun, Forge, ForgeCheck};

#[test]
fn tower_climb_and_fall() {
    let mut session = GameSession::new(
        ProgressionConfig::tower(),
        GuardianSource::new(StdRng::seed_from_u64(42)),
    );

    let answer = session.challenge().unwrap().correct_answer.clone();
    let result = session.answer(&answer).unwrap();
    assert_eq!(result.effects.points_awarded, 11);
    assert_eq!(session.state().level(), 2);
    assert!(session.challenge().unwrap().title.starts_with("Level 2 "));

    let result = session.answer("not an option").unwrap();
    assert!(result.effects.floor_reset);
    assert_eq!(session.state().level(), 1);
    assert_eq!(session.state().lives(), Some(2));
    assert_eq!(session.state().score(), 11);

    session.answer("wrong").unwrap();
    session.answer("wrong").unwrap();
    assert_eq!(session.summary().status, Status::Lost);
    assert_eq!(session.answer(&answer), None);
}

fn forge_word<S: services::ChallengeSource>(
    session: &mut GameSession<S>,
    forge: &mut Forge,
    tiles: &[&str],
    source: &TileSource<StdRng>,
) -> ForgeCheck {
    let mut last = ForgeCheck::Pending;
    for tile in tiles {
        let index = forge.find(tile).unwrap();
        last = forge.add(index, source).unwrap();
        if let Some(outcome) = last.outcome() {
            session.record(outcome);
        }
    }
    last
}

#[test]
fn forge_feeds_the_wordsmith_session() {
    let tiles = TileSource::new(StdRng::seed_from_u64(1));
    let mut session = GameSession::new(
        ProgressionConfig::wordsmith(),
        TileSource::new(StdRng::seed_from_u64(1)),
    );

    let check = forge_word(&mut session, &mut Forge::new(), &["re", "un"], &tiles);
    assert_eq!(check, ForgeCheck::Rejected("reun".into()));
    assert_eq!(session.summary().attempts, 1);
    assert_eq!(session.state().score(), 0);

    let check = forge_word(&mut session, &mut Forge::new(), &["un", "help", "ful"], &tiles);
    assert_eq!(check, ForgeCheck::Accepted("unhelpful".into()));

    let summary = session.summary();
    assert_eq!(summary.attempts, 3);
    assert_eq!(summary.correct, 1);
    assert_eq!(summary.score, 10);
    assert_eq!(session.state().combo(), 1);

    let expired = session.tick(Duration::from_secs(60)).unwrap();
    assert!(expired.won);
    assert_eq!(session.summary().status, Status::Won);
}

#[test]
fn stored_words_are_dealt_and_forged() {
    let record = WordDraft::new("misread", "read wrongly")
        .with_components("mis, read")
        .validate(GameMode::Wordsmith)
        .unwrap()
        .into_record(RecordId::generate(), fixed_now());
    let mut session = GameSession::new(
        ProgressionConfig::wordsmith(),
        TileSource::new(StdRng::seed_from_u64(3)).with_records(vec![record]),
    );
    for _ in 0..200 {
        if session.challenge().unwrap().correct_answer == "misread" {
            break;
        }
        session.restart();
    }
    let challenge = session.challenge().unwrap().clone();
    assert_eq!(challenge.correct_answer, "misread");

    let mut forge = Forge::new();
    assert_eq!(forge.find("mis"), None);
    forge.deal(&challenge);

    let mut last = ForgeCheck::Pending;
    for tile in ["mis", "read"] {
        let index = forge.find(tile).unwrap();
        last = forge.add(index, session.source()).unwrap();
        if let Some(outcome) = last.outcome() {
            session.record(outcome);
        }
    }
    assert_eq!(last, ForgeCheck::Accepted("misread".into()));
    assert_eq!(session.state().score(), 10);
    assert_eq!(session.summary().correct, 1);

    let next = session.challenge().unwrap().clone();
    forge.deal(&next);
    for tile in &next.options {
        assert!(forge.rack().contains(tile) || forge.cauldron().contains(tile));
    }
}

#[test]
fn forest_walk_uses_bonus_hazard_and_clue() {
    let mut session = GameSession::new(
        ProgressionConfig::forest(),
        ClueSource::new(StdRng::seed_from_u64(5)),
    );
    let mut forest = ForestRun::new(StdRng::seed_from_u64(5));

    let path = [
        Direction::Down,
        Direction::Down,
        Direction::Right,
        Direction::Right,
        Direction::Right,
        Direction::Right,
    ];
    let mut reached_clue = false;
    for direction in path {
        let step = forest.step(direction).unwrap();
        if let Some(event) = step.event {
            session.apply_event(event);
        }
        reached_clue |= step.at_clue;
    }
    assert!(reached_clue);
    assert_eq!(session.state().lives(), Some(2));
    assert_eq!(session.state().score(), 5);

    let answer = session.challenge().unwrap().correct_answer.clone();
    assert_eq!(session.answer(&answer).unwrap().outcome, Outcome::Correct);
    forest.clue_solved();
    assert_eq!(session.state().score(), 15);
    assert_eq!(session.state().combo(), 1);
}
