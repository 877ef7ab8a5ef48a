use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use realm_core::model::{Challenge, ChallengeKind, GameMode, ModeDetails, WordRecord};

use super::ChallengeSource;

pub const GUARDIAN_NAMES: [&str; 5] = [
    "Word Keeper",
    "Lexicon Guardian",
    "Vocabulary Sentinel",
    "Language Warden",
    "Dictionary Master",
];

struct Riddle {
    word: &'static str,
    correct: &'static str,
    options: [&'static str; 4],
}

const RIDDLES: [Riddle; 3] = [
    Riddle {
        word: "ephemeral",
        correct: "temporary",
        options: ["temporary", "eternal", "powerful", "meaningful"],
    },
    Riddle {
        word: "ubiquitous",
        correct: "omnipresent",
        options: ["omnipresent", "rare", "unique", "special"],
    },
    Riddle {
        word: "surreptitious",
        correct: "secretive",
        options: ["secretive", "obvious", "loud", "bold"],
    },
];

/// Tower guardians: one synonym challenge per floor.
///
/// Stored tower records assigned to the requested floor win over the built-in
/// riddles. Record options are shuffled; built-in options keep their order.
pub struct GuardianSource<R> {
    rng: R,
    records: Vec<WordRecord>,
}

impl<R: Rng> GuardianSource<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            records: Vec::new(),
        }
    }

    /// Add stored records. Records for other modes are ignored.
    #[must_use]
    pub fn with_records(mut self, records: Vec<WordRecord>) -> Self {
        self.records
            .extend(records.into_iter().filter(|r| r.mode() == GameMode::Tower));
        self
    }
}

impl<R: Rng> ChallengeSource for GuardianSource<R> {
    fn mode(&self) -> Option<GameMode> {
        Some(GameMode::Tower)
    }

    fn next(&mut self, floor: u32) -> Option<Challenge> {
        let name = GUARDIAN_NAMES.choose(&mut self.rng)?;
        let title = format!("Level {floor} {name}");

        let on_floor: Vec<&WordRecord> = self
            .records
            .iter()
            .filter(|r| {
                matches!(r.details, ModeDetails::Tower { floor_number, .. } if floor_number == floor)
            })
            .collect();

        if let Some(record) = on_floor.choose(&mut self.rng) {
            if let ModeDetails::Tower {
                options,
                correct_answer,
                ..
            } = &record.details
            {
                let mut options = options.clone();
                options.shuffle(&mut self.rng);
                return Some(
                    Challenge::new(ChallengeKind::Synonym, &record.word, options, correct_answer)
                        .with_title(title)
                        .with_hints(vec![record.definition.clone()]),
                );
            }
        }

        let riddle = RIDDLES.choose(&mut self.rng)?;
        Some(
            Challenge::new(
                ChallengeKind::Synonym,
                riddle.word,
                riddle.options.iter().map(|o| (*o).to_string()).collect(),
                riddle.correct,
            )
            .with_title(title),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use realm_core::model::{RecordId, WordDraft};
    use realm_core::time::fixed_now;

    fn tower_record(word: &str, floor: u32, correct: &str) -> WordRecord {
        WordDraft::new(word, "meaning")
            .with_tower(floor, &[correct, "wrong", "other"], correct)
            .validate(GameMode::Tower)
            .unwrap()
            .into_record(RecordId::generate(), fixed_now())
    }

    #[test]
    fn built_in_guardians_are_named_for_the_floor() {
        let mut source = GuardianSource::new(StdRng::seed_from_u64(7));
        for floor in [1, 12, 100] {
            let challenge = source.next(floor).unwrap();
            let prefix = format!("Level {floor} ");
            assert!(challenge.title.starts_with(&prefix));
            let name = &challenge.title[prefix.len()..];
            assert!(GUARDIAN_NAMES.contains(&name));
            assert_eq!(challenge.options.len(), 4);
            assert!(challenge.options.contains(&challenge.correct_answer));
        }
    }

    #[test]
    fn records_on_the_floor_are_preferred() {
        let mut source = GuardianSource::new(StdRng::seed_from_u64(1))
            .with_records(vec![tower_record("lucid", 3, "clear")]);

        for _ in 0..10 {
            let challenge = source.next(3).unwrap();
            assert_eq!(challenge.prompt, "lucid");
            assert_eq!(challenge.correct_answer, "clear");
            assert_eq!(challenge.hints, vec!["meaning".to_string()]);
        }

        let elsewhere = source.next(4).unwrap();
        assert_ne!(elsewhere.prompt, "lucid");
    }
}
