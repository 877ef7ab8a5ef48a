use std::time::Duration;

use realm_core::model::Challenge;
use realm_core::progression::{
    Countdown, Event, Outcome, ProgressionConfig, ProgressionState, apply,
};

use crate::challenge::ChallengeSource;
use crate::error::ClashError;
use crate::game_session::AttemptResult;

/// How players are grouped in a clash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    OneVsOne,
    Team,
    FreeForAll,
}

impl MatchKind {
    fn accepts(self, players: usize) -> bool {
        match self {
            MatchKind::OneVsOne => players == 2,
            MatchKind::Team => players >= 2 && players % 2 == 0,
            MatchKind::FreeForAll => players >= 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClashPlayer {
    pub name: String,
    /// Team index for team matches.
    pub team: Option<usize>,
    state: ProgressionState,
}

impl ClashPlayer {
    #[must_use]
    pub fn score(&self) -> u32 {
        self.state.score()
    }

    /// Consecutive correct answers.
    #[must_use]
    pub fn streak(&self) -> u32 {
        self.state.combo()
    }

    #[must_use]
    pub fn state(&self) -> &ProgressionState {
        &self.state
    }
}

/// A timed round where every player races to answer the shared challenge.
///
/// The first correct answer scores and brings up the next challenge. A miss
/// only breaks that player's streak.
pub struct ClashMatch<S> {
    kind: MatchKind,
    config: ProgressionConfig,
    players: Vec<ClashPlayer>,
    source: S,
    current: Option<Challenge>,
    countdown: Countdown,
}

impl<S: ChallengeSource> ClashMatch<S> {
    /// # Errors
    ///
    /// Returns `ClashError::PlayerCount` when `names` does not fit `kind`.
    pub fn new(kind: MatchKind, names: &[&str], source: S) -> Result<Self, ClashError> {
        Self::with_config(kind, names, source, ProgressionConfig::clash())
    }

    /// # Errors
    ///
    /// Returns `ClashError::PlayerCount` when `names` does not fit `kind`, and
    /// `ClashError::Untimed` when `config` has no round length.
    pub fn with_config(
        kind: MatchKind,
        names: &[&str],
        mut source: S,
        config: ProgressionConfig,
    ) -> Result<Self, ClashError> {
        if !kind.accepts(names.len()) {
            return Err(ClashError::PlayerCount {
                kind,
                count: names.len(),
            });
        }
        let limit = config.time_limit().ok_or(ClashError::Untimed)?;
        let players = names
            .iter()
            .enumerate()
            .map(|(i, name)| ClashPlayer {
                name: (*name).to_string(),
                team: (kind == MatchKind::Team).then_some(i % 2),
                state: ProgressionState::new(&config),
            })
            .collect();
        let current = source.next(config.start_level());
        Ok(Self {
            kind,
            config,
            players,
            source,
            current,
            countdown: Countdown::new(limit),
        })
    }

    #[must_use]
    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    #[must_use]
    pub fn players(&self) -> &[ClashPlayer] {
        &self.players
    }

    #[must_use]
    pub fn challenge(&self) -> Option<&Challenge> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        !self.countdown.is_running()
    }

    /// Answer the shared challenge as `player`.
    ///
    /// Returns `None` once the round is over, for an unknown player, or when
    /// no challenge is pending.
    pub fn answer(&mut self, player: usize, answer: &str) -> Option<AttemptResult> {
        if self.is_over() {
            return None;
        }
        let challenge = self.current.as_ref()?;
        let outcome = Outcome::from(self.source.judge(challenge, answer));
        let correct_answer = challenge.correct_answer.clone();

        let slot = self.players.get_mut(player)?;
        let (next, effects) = apply(&slot.state, Event::Attempt(outcome), &self.config);
        slot.state = next;

        if outcome == Outcome::Correct {
            self.current = self.source.next(next.level());
        }
        Some(AttemptResult {
            outcome,
            correct_answer,
            effects,
        })
    }

    /// Advance the round clock. Returns `true` on the tick that ends the round.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let Some(event) = self.countdown.tick(elapsed) else {
            return false;
        };
        for player in &mut self.players {
            player.state = apply(&player.state, event, &self.config).0;
        }
        tracing::info!(kind = ?self.kind, leader = ?self.leader().map(|p| &p.name), "clash round over");
        true
    }

    /// The single highest scorer, or `None` on a tie for first.
    #[must_use]
    pub fn leader(&self) -> Option<&ClashPlayer> {
        let top = self.players.iter().map(ClashPlayer::score).max()?;
        let mut leaders = self.players.iter().filter(|p| p.score() == top);
        let leader = leaders.next()?;
        leaders.next().is_none().then_some(leader)
    }

    /// Summed score per team, indexed by team. Empty outside team matches.
    #[must_use]
    pub fn team_scores(&self) -> Vec<u32> {
        let mut totals = Vec::new();
        for player in &self.players {
            let Some(team) = player.team else {
                continue;
            };
            if totals.len() <= team {
                totals.resize(team + 1, 0);
            }
            totals[team] += player.score();
        }
        totals
    }

    /// Start a new round with fresh scores.
    pub fn rematch(&mut self) {
        for player in &mut self.players {
            player.state = ProgressionState::new(&self.config);
        }
        self.countdown = Countdown::new(self.countdown.limit());
        self.current = self.source.next(self.config.start_level());
    }
}
