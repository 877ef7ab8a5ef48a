use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use realm_core::model::{Challenge, ChallengeKind, GameMode, WordRecord};

use super::ChallengeSource;

struct Clue {
    sentence: &'static str,
    missing: &'static str,
    options: [&'static str; 4],
}

const CLUES: [Clue; 1] = [Clue {
    sentence: "The detective found a crucial _____ at the crime scene.",
    missing: "evidence",
    options: ["evidence", "proof", "clue", "sign"],
}];

const DECOYS: [&str; 4] = ["proof", "clue", "sign", "riddle"];

/// Forest clues: fill-in-the-blank sentences.
///
/// Stored forest records become "which word fits this definition" clues, with
/// other stored words (or stock decoys) as the wrong options.
pub struct ClueSource<R> {
    rng: R,
    records: Vec<WordRecord>,
}

impl<R: Rng> ClueSource<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_records(mut self, records: Vec<WordRecord>) -> Self {
        self.records
            .extend(records.into_iter().filter(|r| r.mode() == GameMode::Forest));
        self
    }

    fn from_record(&mut self, index: usize) -> Option<Challenge> {
        let record = self.records.get(index)?;
        let mut options = vec![record.word.clone()];
        let others = self
            .records
            .iter()
            .map(|r| r.word.as_str())
            .chain(DECOYS)
            .filter(|w| !w.eq_ignore_ascii_case(&record.word));
        for word in others {
            if options.len() == 4 {
                break;
            }
            if !options.iter().any(|o| o == word) {
                options.push(word.to_string());
            }
        }
        let challenge = Challenge::new(
            ChallengeKind::FillBlank,
            format!("_____: {}", record.definition),
            Vec::new(),
            record.word.clone(),
        )
        .with_title("Forest clue");

        options.shuffle(&mut self.rng);
        Some(Challenge {
            options,
            ..challenge
        })
    }
}

impl<R: Rng> ChallengeSource for ClueSource<R> {
    fn mode(&self) -> Option<GameMode> {
        Some(GameMode::Forest)
    }

    fn next(&mut self, _level: u32) -> Option<Challenge> {
        let pool = CLUES.len() + self.records.len();
        let pick = self.rng.random_range(0..pool);
        if pick >= CLUES.len() {
            return self.from_record(pick - CLUES.len());
        }

        let clue = CLUES.choose(&mut self.rng)?;
        Some(
            Challenge::new(
                ChallengeKind::FillBlank,
                clue.sentence,
                clue.options.iter().map(|o| (*o).to_string()).collect(),
                clue.missing,
            )
            .with_title("Forest clue"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use realm_core::model::{ObstacleType, RecordId, WordDraft};
    use realm_core::time::fixed_now;

    fn forest(word: &str, definition: &str) -> WordRecord {
        WordDraft::new(word, definition)
            .with_obstacle(ObstacleType::Trap)
            .validate(GameMode::Forest)
            .unwrap()
            .into_record(RecordId::generate(), fixed_now())
    }

    #[test]
    fn built_in_clue_asks_for_evidence() {
        let mut source = ClueSource::new(StdRng::seed_from_u64(3));
        let clue = source.next(1).unwrap();
        assert_eq!(clue.correct_answer, "evidence");
        assert!(clue.prompt.contains("_____"));
        assert!(clue.is_correct("evidence"));
        assert!(!clue.is_correct("proof"));
    }

    #[test]
    fn record_clues_offer_four_distinct_options() {
        let mut source = ClueSource::new(StdRng::seed_from_u64(11))
            .with_records(vec![forest("snare", "A trap for animals"), forest("grove", "Small wood")]);

        let mut saw_record = false;
        for _ in 0..30 {
            let clue = source.next(1).unwrap();
            assert_eq!(clue.options.len(), 4);
            assert!(clue.options.contains(&clue.correct_answer));
            let mut unique = clue.options.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), 4);
            if clue.correct_answer == "snare" {
                saw_record = true;
                assert_eq!(clue.prompt, "_____: A trap for animals");
            }
        }
        assert!(saw_record);
    }
}
