use super::config::{ExpiryPolicy, FailurePolicy, ProgressionConfig};
use super::state::{ProgressionState, Status};

/// Verdict on a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl From<bool> for Outcome {
    fn from(correct: bool) -> Self {
        if correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        }
    }
}

/// Discrete inputs to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Attempt(Outcome),
    /// Score granted outside an attempt (forest powerups). Combo is untouched.
    Bonus { points: u32 },
    /// Damage taken outside an attempt (forest traps and monsters).
    Hazard,
    TimerExpired,
}

/// What changed as the result of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Effects {
    pub points_awarded: u32,
    pub leveled_up: bool,
    pub won: bool,
    pub combo_reset: bool,
    pub lives_lost: bool,
    pub lost: bool,
    pub floor_reset: bool,
    pub expired: bool,
    /// The session was already over; nothing changed.
    pub ignored: bool,
}

impl Effects {
    #[must_use]
    pub fn ended(&self) -> bool {
        self.won || self.lost
    }
}

/// Shorthand for `apply(state, Event::Attempt(outcome), config)`.
#[must_use]
pub fn apply_attempt(
    state: &ProgressionState,
    outcome: Outcome,
    config: &ProgressionConfig,
) -> (ProgressionState, Effects) {
    apply(state, Event::Attempt(outcome), config)
}

/// Compute the state that follows `event`.
///
/// The input is never modified. Terminal states come back unchanged with
/// `Effects::ignored` set.
#[must_use]
pub fn apply(
    state: &ProgressionState,
    event: Event,
    config: &ProgressionConfig,
) -> (ProgressionState, Effects) {
    let mut next = *state;
    let mut effects = Effects::default();

    if state.status.is_terminal() {
        effects.ignored = true;
        return (next, effects);
    }

    match event {
        Event::Attempt(Outcome::Correct) => on_correct(&mut next, &mut effects, config),
        Event::Attempt(Outcome::Incorrect) => on_incorrect(&mut next, &mut effects, config),
        Event::Bonus { points } => {
            next.score = next.score.saturating_add(points);
            effects.points_awarded = points;
        }
        Event::Hazard => lose_life(&mut next, &mut effects),
        Event::TimerExpired => {
            effects.expired = true;
            let won = match config.timer_expiry() {
                ExpiryPolicy::Lose => false,
                ExpiryPolicy::WinAtScore(min) => next.score >= min,
            };
            if won {
                next.status = Status::Won;
                effects.won = true;
            } else {
                next.status = Status::Lost;
                effects.lost = true;
            }
        }
    }

    (next, effects)
}

fn on_correct(next: &mut ProgressionState, effects: &mut Effects, config: &ProgressionConfig) {
    let points = config
        .points()
        .base_points(next.level)
        .saturating_add(config.combo_bonus(next.combo));
    next.score = next.score.saturating_add(points);
    next.combo = next.combo.saturating_add(1);
    effects.points_awarded = points;

    // Beating the challenge of the top level ends the run.
    if config.max_level() == Some(next.level) {
        next.status = Status::Won;
        effects.won = true;
        return;
    }

    if config.level_up().crossed(next.level, next.score) {
        next.level = next.level.saturating_add(1);
        effects.leveled_up = true;
    }
}

fn on_incorrect(next: &mut ProgressionState, effects: &mut Effects, config: &ProgressionConfig) {
    next.combo = 0;
    effects.combo_reset = true;

    lose_life(next, effects);
    if next.status.is_terminal() {
        return;
    }

    match config.failure() {
        FailurePolicy::KeepLevel => {}
        FailurePolicy::ResetToFloor(floor) => {
            next.level = floor;
            effects.floor_reset = true;
        }
        FailurePolicy::EndSession => {
            next.status = Status::Lost;
            effects.lost = true;
        }
    }
}

fn lose_life(next: &mut ProgressionState, effects: &mut Effects) {
    let Some(lives) = next.lives else {
        return;
    };
    let remaining = lives.saturating_sub(1);
    next.lives = Some(remaining);
    effects.lives_lost = true;
    if remaining == 0 {
        next.status = Status::Lost;
        effects.lost = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::{LevelUpRule, PointsRule};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn run(
        config: &ProgressionConfig,
        outcomes: &[Outcome],
    ) -> (ProgressionState, Vec<Effects>) {
        let mut state = ProgressionState::new(config);
        let mut all = Vec::new();
        for outcome in outcomes {
            let (next, effects) = apply_attempt(&state, *outcome, config);
            state = next;
            all.push(effects);
        }
        (state, all)
    }

    fn random_outcomes(seed: u64, len: usize) -> Vec<Outcome> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| Outcome::from(rng.random_bool(0.7))).collect()
    }

    fn all_presets() -> Vec<ProgressionConfig> {
        vec![
            ProgressionConfig::wordsmith(),
            ProgressionConfig::forest(),
            ProgressionConfig::tower(),
            ProgressionConfig::clash(),
        ]
    }

    #[test]
    fn tower_scenario_climbs_then_falls_back() {
        let config = ProgressionConfig::tower();
        let start = ProgressionState::new(&config);

        let (after_win, effects) = apply_attempt(&start, Outcome::Correct, &config);
        assert_eq!(effects.points_awarded, 11);
        assert!(effects.leveled_up);
        assert_eq!(after_win.score(), 11);
        assert_eq!(after_win.combo(), 1);
        assert_eq!(after_win.level(), 2);

        let (after_miss, effects) = apply_attempt(&after_win, Outcome::Incorrect, &config);
        assert!(effects.combo_reset && effects.lives_lost && effects.floor_reset);
        assert!(!effects.lost);
        assert_eq!(after_miss.lives(), Some(2));
        assert_eq!(after_miss.combo(), 0);
        assert_eq!(after_miss.level(), 1);
        assert_eq!(after_miss.score(), 11);
    }

    #[test]
    fn last_life_loses_and_later_events_are_ignored() {
        let config = ProgressionConfig::forest();
        let state = ProgressionState::from_parts(40, 2, 1, Some(1), Status::Active);

        let (lost, effects) = apply_attempt(&state, Outcome::Incorrect, &config);
        assert!(effects.lost);
        assert_eq!(lost.lives(), Some(0));
        assert_eq!(lost.status(), Status::Lost);

        for event in [
            Event::Attempt(Outcome::Correct),
            Event::Attempt(Outcome::Incorrect),
            Event::Bonus { points: 5 },
            Event::Hazard,
            Event::TimerExpired,
        ] {
            let (after, effects) = apply(&lost, event, &config);
            assert!(effects.ignored);
            assert_eq!(after, lost);
        }
    }

    #[test]
    fn losing_the_last_life_keeps_the_floor() {
        let config = ProgressionConfig::tower();
        let state = ProgressionState::from_parts(100, 0, 9, Some(1), Status::Active);
        let (after, effects) = apply_attempt(&state, Outcome::Incorrect, &config);
        assert!(effects.lost);
        assert!(!effects.floor_reset);
        assert_eq!(after.level(), 9);
    }

    #[test]
    fn combo_bonus_grows_then_caps() {
        let config = ProgressionConfig::forest();
        let (_, effects) = run(&config, &[Outcome::Correct; 8]);
        let points: Vec<u32> = effects.iter().map(|e| e.points_awarded).collect();
        assert_eq!(points, vec![10, 12, 14, 16, 18, 20, 20, 20]);
    }

    #[test]
    fn combo_counts_every_correct_attempt_past_the_cap() {
        let config = ProgressionConfig::wordsmith();
        let (state, _) = run(&config, &[Outcome::Correct; 12]);
        assert_eq!(state.combo(), 12);
    }

    #[test]
    fn score_threshold_levels_once_per_attempt() {
        let config = ProgressionConfig::builder()
            .points(PointsRule::Flat(500))
            .level_up(LevelUpRule::ScorePerLevel(50))
            .build()
            .unwrap();
        let (state, effects) = run(&config, &[Outcome::Correct]);
        assert!(effects[0].leveled_up);
        assert_eq!(state.level(), 2);
    }

    #[test]
    fn wordsmith_levels_at_fifty_points() {
        let config = ProgressionConfig::wordsmith();
        // 10 + 12 + 14 = 36, then +16 = 52 crosses 1 * 50.
        let (state, effects) = run(&config, &[Outcome::Correct; 4]);
        assert!(!effects[2].leveled_up);
        assert!(effects[3].leveled_up);
        assert_eq!(state.score(), 52);
        assert_eq!(state.level(), 2);
    }

    #[test]
    fn beating_the_top_floor_wins() {
        let config = ProgressionConfig::tower();
        let state = ProgressionState::from_parts(0, 0, 99, Some(3), Status::Active);

        let (top, effects) = apply_attempt(&state, Outcome::Correct, &config);
        assert_eq!(top.level(), 100);
        assert!(!effects.won);

        let (won, effects) = apply_attempt(&top, Outcome::Correct, &config);
        assert!(effects.won);
        assert_eq!(won.status(), Status::Won);
        assert_eq!(won.level(), 100);
    }

    #[test]
    fn end_session_policy_loses_on_first_miss() {
        let config = ProgressionConfig::builder()
            .failure(FailurePolicy::EndSession)
            .build()
            .unwrap();
        let (state, effects) = run(&config, &[Outcome::Correct, Outcome::Incorrect]);
        assert!(effects[1].lost);
        assert_eq!(state.status(), Status::Lost);
    }

    #[test]
    fn keep_level_without_lives_only_resets_combo() {
        let config = ProgressionConfig::wordsmith();
        let (state, effects) = run(&config, &[Outcome::Correct, Outcome::Incorrect]);
        assert!(effects[1].combo_reset);
        assert!(!effects[1].lives_lost);
        assert!(state.is_active());
        assert_eq!(state.score(), 10);
    }

    #[test]
    fn bonus_and_hazard_leave_combo_alone() {
        let config = ProgressionConfig::forest();
        let state = ProgressionState::from_parts(20, 3, 1, Some(3), Status::Active);

        let (boosted, effects) = apply(&state, Event::Bonus { points: 5 }, &config);
        assert_eq!(effects.points_awarded, 5);
        assert_eq!(boosted.score(), 25);
        assert_eq!(boosted.combo(), 3);

        let (hurt, effects) = apply(&boosted, Event::Hazard, &config);
        assert!(effects.lives_lost);
        assert_eq!(hurt.lives(), Some(2));
        assert_eq!(hurt.combo(), 3);
    }

    #[test]
    fn hazard_without_lives_is_harmless() {
        let config = ProgressionConfig::wordsmith();
        let state = ProgressionState::new(&config);
        let (after, effects) = apply(&state, Event::Hazard, &config);
        assert_eq!(after, state);
        assert_eq!(effects, Effects::default());
    }

    #[test]
    fn timer_expiry_follows_policy() {
        let forge = ProgressionConfig::wordsmith();
        let (after, effects) = apply(&ProgressionState::new(&forge), Event::TimerExpired, &forge);
        assert!(effects.expired && effects.won);
        assert_eq!(after.status(), Status::Won);

        let strict = ProgressionConfig::builder()
            .timer_expiry(ExpiryPolicy::WinAtScore(100))
            .build()
            .unwrap();
        let (after, effects) =
            apply(&ProgressionState::new(&strict), Event::TimerExpired, &strict);
        assert!(effects.lost);
        assert_eq!(after.status(), Status::Lost);

        let tower = ProgressionConfig::tower();
        let (after, _) = apply(&ProgressionState::new(&tower), Event::TimerExpired, &tower);
        assert_eq!(after.status(), Status::Lost);
    }

    #[test]
    fn apply_is_pure() {
        let config = ProgressionConfig::tower();
        let state = ProgressionState::from_parts(30, 2, 4, Some(2), Status::Active);
        let snapshot = state;
        let first = apply_attempt(&state, Outcome::Incorrect, &config);
        let second = apply_attempt(&state, Outcome::Incorrect, &config);
        assert_eq!(first, second);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn random_sequences_keep_invariants() {
        for config in all_presets() {
            for seed in 0..32 {
                let mut state = ProgressionState::new(&config);
                let mut streak = 0_u32;
                for outcome in random_outcomes(seed, 60) {
                    let before = state;
                    let (next, effects) = apply_attempt(&state, outcome, &config);

                    assert!(next.score() >= before.score());
                    if before.status().is_terminal() {
                        assert!(effects.ignored);
                        assert_eq!(next, before);
                        continue;
                    }
                    match outcome {
                        Outcome::Correct => {
                            streak += 1;
                            assert_eq!(next.combo(), streak);
                        }
                        Outcome::Incorrect => {
                            streak = 0;
                            assert_eq!(next.combo(), 0);
                        }
                    }
                    state = next;
                }
            }
        }
    }
}
