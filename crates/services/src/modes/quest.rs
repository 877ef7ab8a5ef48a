use rand::Rng;
use realm_core::model::Challenge;
use realm_core::progression::ProgressionConfig;

use crate::challenge::{Land, UnscrambleSource};
use crate::game_session::{AttemptResult, GameSession};

/// One land of the word quest. Only Science Land starts unlocked.
pub struct QuestLand<R> {
    session: GameSession<UnscrambleSource<R>>,
    unlocked: bool,
}

impl<R: Rng> QuestLand<R> {
    #[must_use]
    pub fn new(land: Land, rng: R) -> Self {
        Self {
            session: GameSession::new(ProgressionConfig::quest(), UnscrambleSource::new(land, rng)),
            unlocked: land == Land::Science,
        }
    }

    #[must_use]
    pub fn land(&self) -> Land {
        self.session.source().land()
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn unlock(&mut self) {
        self.unlocked = true;
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.session.state().score()
    }

    /// The scrambled word to solve. Locked lands show nothing.
    #[must_use]
    pub fn challenge(&self) -> Option<&Challenge> {
        if !self.unlocked {
            return None;
        }
        self.session.challenge()
    }

    pub fn answer(&mut self, answer: &str) -> Option<AttemptResult> {
        if !self.unlocked {
            return None;
        }
        self.session.answer(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use realm_core::progression::Outcome;

    #[test]
    fn science_land_is_open_from_the_start() {
        let mut land = QuestLand::new(Land::Science, StdRng::seed_from_u64(1));
        assert!(land.is_unlocked());
        assert_eq!(land.land().name(), "Science Land");

        let answer = land.challenge().unwrap().correct_answer.to_lowercase();
        let result = land.answer(&answer).unwrap();
        assert_eq!(result.outcome, Outcome::Correct);
        assert_eq!(land.score(), 10);
        assert!(land.challenge().is_some());
    }

    #[test]
    fn locked_lands_refuse_answers_until_unlocked() {
        let mut land = QuestLand::new(Land::History, StdRng::seed_from_u64(1));
        assert!(land.challenge().is_none());
        assert_eq!(land.answer("DYNASTY"), None);

        land.unlock();
        let result = land.answer("not a word").unwrap();
        assert_eq!(result.outcome, Outcome::Incorrect);
        assert_eq!(land.score(), 0);
    }
}
