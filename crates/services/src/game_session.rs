use std::time::Duration;

use realm_core::model::Challenge;
use realm_core::progression::{
    Countdown, Effects, Event, Outcome, ProgressionConfig, ProgressionState, Status, apply,
};
use serde::Serialize;

use crate::challenge::ChallengeSource;

/// Result of answering the current challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptResult {
    pub outcome: Outcome,
    pub correct_answer: String,
    pub effects: Effects,
}

/// Snapshot of a session for end screens and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub score: u32,
    pub level: u32,
    pub highest_level: u32,
    pub lives: Option<u32>,
    pub attempts: u32,
    pub correct: u32,
    pub status: Status,
}

/// One play-through: a progression state, the challenge on screen and an
/// optional countdown.
///
/// All transitions go through [`apply`]. Once the state is terminal, answers
/// and ticks are ignored and the countdown is cancelled.
pub struct GameSession<S> {
    config: ProgressionConfig,
    state: ProgressionState,
    source: S,
    current: Option<Challenge>,
    countdown: Option<Countdown>,
    attempts: u32,
    correct: u32,
    highest_level: u32,
}

impl<S: ChallengeSource> GameSession<S> {
    #[must_use]
    pub fn new(config: ProgressionConfig, mut source: S) -> Self {
        let state = ProgressionState::new(&config);
        let current = source.next(state.level());
        let countdown = config.time_limit().map(Countdown::new);
        Self {
            highest_level: state.level(),
            config,
            state,
            source,
            current,
            countdown,
            attempts: 0,
            correct: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    #[must_use]
    pub fn challenge(&self) -> Option<&Challenge> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.status().is_terminal()
    }

    /// Judge `answer` against the current challenge and apply the attempt.
    ///
    /// Returns `None` when the session is over or no challenge is pending.
    pub fn answer(&mut self, answer: &str) -> Option<AttemptResult> {
        if self.is_over() {
            return None;
        }
        let challenge = self.current.as_ref()?;
        let outcome = Outcome::from(self.source.judge(challenge, answer));
        let correct_answer = challenge.correct_answer.clone();
        let effects = self.record(outcome);
        Some(AttemptResult {
            outcome,
            correct_answer,
            effects,
        })
    }

    /// Apply an attempt judged elsewhere, such as a forge cauldron.
    ///
    /// A new challenge is drawn after a correct attempt or when a miss moved
    /// the level.
    pub fn record(&mut self, outcome: Outcome) -> Effects {
        let level_before = self.state.level();
        let effects = self.apply_event(Event::Attempt(outcome));
        if effects.ignored {
            return effects;
        }

        self.attempts += 1;
        if outcome == Outcome::Correct {
            self.correct += 1;
        }
        if !self.is_over() && (outcome == Outcome::Correct || self.state.level() != level_before)
        {
            self.current = self.source.next(self.state.level());
        }
        effects
    }

    /// Advance the countdown. Returns the effects of expiry when it fires.
    pub fn tick(&mut self, elapsed: Duration) -> Option<Effects> {
        if self.is_over() {
            return None;
        }
        let event = self.countdown.as_mut()?.tick(elapsed)?;
        Some(self.apply_event(event))
    }

    /// Feed any engine event, such as forest bonuses and hazards.
    pub fn apply_event(&mut self, event: Event) -> Effects {
        let (next, effects) = apply(&self.state, event, &self.config);
        self.state = next;
        self.highest_level = self.highest_level.max(next.level());

        if effects.ended() {
            if let Some(countdown) = self.countdown.as_mut() {
                countdown.cancel();
            }
            tracing::info!(
                score = next.score(),
                level = next.level(),
                status = ?next.status(),
                "game session ended"
            );
        }
        effects
    }

    /// Start over with a fresh state, countdown and challenge.
    pub fn restart(&mut self) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.cancel();
        }
        self.state = ProgressionState::new(&self.config);
        self.countdown = self.config.time_limit().map(Countdown::new);
        self.current = self.source.next(self.state.level());
        self.attempts = 0;
        self.correct = 0;
        self.highest_level = self.state.level();
    }

    #[must_use]
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.state.score(),
            level: self.state.level(),
            highest_level: self.highest_level,
            lives: self.state.lives(),
            attempts: self.attempts,
            correct: self.correct,
            status: self.state.status(),
        }
    }
}
