use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::game_mode::{GameMode, ObstacleType};
use crate::model::ids::RecordId;

/// Lowest and highest floor a tower challenge may be placed on.
pub const MIN_FLOOR: u32 = 1;
pub const MAX_FLOOR: u32 = 100;

/// Number of blank option slots a fresh tower form offers.
pub const DRAFT_OPTION_SLOTS: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Local validation failures of the administration form.
///
/// These are reported inline and never reach the content store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("please fill in all required fields ({field} is empty)")]
    MissingField { field: &'static str },

    #[error("please add component words")]
    MissingComponents,

    #[error("please select an obstacle type")]
    MissingObstacle,

    #[error("please specify the floor number")]
    MissingFloor,

    #[error("floor number must be between 1 and 100, got {0}")]
    FloorOutOfRange(u32),

    #[error("please add answer options and select the correct answer")]
    MissingOptions,

    #[error("correct answer {0:?} is not one of the options")]
    CorrectAnswerNotInOptions(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Mode-specific payload of a word record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game_mode", rename_all = "lowercase")]
pub enum ModeDetails {
    Wordsmith {
        combined_word: String,
        component_words: Vec<String>,
    },
    Forest {
        obstacle_type: ObstacleType,
    },
    Tower {
        floor_number: u32,
        options: Vec<String>,
        correct_answer: String,
    },
}

impl ModeDetails {
    #[must_use]
    pub fn mode(&self) -> GameMode {
        match self {
            ModeDetails::Wordsmith { .. } => GameMode::Wordsmith,
            ModeDetails::Forest { .. } => GameMode::Forest,
            ModeDetails::Tower { .. } => GameMode::Tower,
        }
    }
}

/// A validated record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWordRecord {
    pub word: String,
    pub definition: String,
    pub details: ModeDetails,
}

impl NewWordRecord {
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.details.mode()
    }

    /// Attach store-assigned identity, producing the persisted shape.
    #[must_use]
    pub fn into_record(self, id: RecordId, created_at: DateTime<Utc>) -> WordRecord {
        WordRecord {
            id,
            word: self.word,
            definition: self.definition,
            details: self.details,
            created_at,
        }
    }
}

/// A stored word/challenge record.
///
/// Serializes flat, with the mode columns next to the common ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: RecordId,
    pub word: String,
    pub definition: String,
    #[serde(flatten)]
    pub details: ModeDetails,
    pub created_at: DateTime<Utc>,
}

impl WordRecord {
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.details.mode()
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Raw administration form input, kept intact across failed submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDraft {
    pub word: String,
    pub definition: String,
    pub component_words: Vec<String>,
    pub obstacle_type: Option<ObstacleType>,
    pub floor_number: Option<u32>,
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
}

impl Default for WordDraft {
    fn default() -> Self {
        Self {
            word: String::new(),
            definition: String::new(),
            component_words: Vec::new(),
            obstacle_type: None,
            floor_number: None,
            options: vec![String::new(); DRAFT_OPTION_SLOTS],
            correct_answer: None,
        }
    }
}

impl WordDraft {
    #[must_use]
    pub fn new(word: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
            ..Self::default()
        }
    }

    /// Replace component words from comma-separated input ("I, DONT").
    pub fn set_components_from_input(&mut self, input: &str) {
        self.component_words = split_components(input);
    }

    #[must_use]
    pub fn with_components(mut self, input: &str) -> Self {
        self.set_components_from_input(input);
        self
    }

    #[must_use]
    pub fn with_obstacle(mut self, obstacle: ObstacleType) -> Self {
        self.obstacle_type = Some(obstacle);
        self
    }

    #[must_use]
    pub fn with_tower(
        mut self,
        floor_number: u32,
        options: &[&str],
        correct_answer: impl Into<String>,
    ) -> Self {
        self.floor_number = Some(floor_number);
        self.options = options.iter().map(|o| (*o).to_string()).collect();
        self.correct_answer = Some(correct_answer.into());
        self
    }

    /// Validate the draft for `mode` and normalize it into a storable record.
    ///
    /// Wordsmith drafts store the entered word as `combined_word` and the first
    /// component as `word`. Tower options are trimmed, blanks dropped and
    /// duplicates removed in entry order.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` describing the first missing or invalid field.
    pub fn validate(&self, mode: GameMode) -> Result<NewWordRecord, RecordError> {
        let word = self.word.trim();
        let definition = self.definition.trim();
        if word.is_empty() {
            return Err(RecordError::MissingField { field: "word" });
        }
        if definition.is_empty() {
            return Err(RecordError::MissingField { field: "definition" });
        }

        let (word, details) = match mode {
            GameMode::Wordsmith => {
                let components: Vec<String> = self
                    .component_words
                    .iter()
                    .map(|c| c.trim())
                    .filter(|c| !c.is_empty())
                    .map(ToString::to_string)
                    .collect();
                let Some(first) = components.first().cloned() else {
                    return Err(RecordError::MissingComponents);
                };
                (
                    first,
                    ModeDetails::Wordsmith {
                        combined_word: word.to_string(),
                        component_words: components,
                    },
                )
            }
            GameMode::Forest => {
                let obstacle_type = self.obstacle_type.ok_or(RecordError::MissingObstacle)?;
                (word.to_string(), ModeDetails::Forest { obstacle_type })
            }
            GameMode::Tower => {
                let floor_number = self.floor_number.ok_or(RecordError::MissingFloor)?;
                if !(MIN_FLOOR..=MAX_FLOOR).contains(&floor_number) {
                    return Err(RecordError::FloorOutOfRange(floor_number));
                }
                let options = clean_options(&self.options);
                let correct = self
                    .correct_answer
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty());
                let (false, Some(correct)) = (options.is_empty(), correct) else {
                    return Err(RecordError::MissingOptions);
                };
                if !options.iter().any(|o| o == correct) {
                    return Err(RecordError::CorrectAnswerNotInOptions(correct.to_string()));
                }
                (
                    word.to_string(),
                    ModeDetails::Tower {
                        floor_number,
                        options,
                        correct_answer: correct.to_string(),
                    },
                )
            }
        };

        Ok(NewWordRecord {
            word,
            definition: definition.to_string(),
            details,
        })
    }
}

fn split_components(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn clean_options(options: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(options.len());
    for option in options.iter().map(|o| o.trim()).filter(|o| !o.is_empty()) {
        if !out.iter().any(|seen| seen == option) {
            out.push(option.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn wordsmith_moves_entered_word_into_combined_word() {
        let draft = WordDraft::new("IDONT", "I do not").with_components(" I, DONT ,, ");
        let record = draft.validate(GameMode::Wordsmith).unwrap();
        assert_eq!(record.word, "I");
        assert_eq!(
            record.details,
            ModeDetails::Wordsmith {
                combined_word: "IDONT".into(),
                component_words: vec!["I".into(), "DONT".into()],
            }
        );
    }

    #[test]
    fn records_serialize_flat() {
        let record = WordDraft::new("snare", "a trap")
            .with_obstacle(ObstacleType::Trap)
            .validate(GameMode::Forest)
            .unwrap()
            .into_record(RecordId::generate(), fixed_now());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["game_mode"], "forest");
        assert_eq!(json["obstacle_type"], "trap");
        assert_eq!(json["created_at"], "2023-11-14T22:13:20Z");

        let back: WordRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn wordsmith_without_components_is_rejected() {
        let draft = WordDraft::new("unhelpful", "not helpful");
        assert_eq!(
            draft.validate(GameMode::Wordsmith),
            Err(RecordError::MissingComponents)
        );
    }

    #[test]
    fn missing_definition_is_reported_first() {
        let draft = WordDraft::new("oak", "  ").with_obstacle(ObstacleType::Tree);
        assert_eq!(
            draft.validate(GameMode::Forest),
            Err(RecordError::MissingField { field: "definition" })
        );
    }

    #[test]
    fn forest_requires_obstacle() {
        let draft = WordDraft::new("evidence", "proof");
        assert_eq!(draft.validate(GameMode::Forest), Err(RecordError::MissingObstacle));
    }

    #[test]
    fn tower_options_are_cleaned_and_deduplicated() {
        let draft = WordDraft::new("ephemeral", "short-lived").with_tower(
            3,
            &["temporary", "", " eternal ", "temporary"],
            "temporary",
        );
        let record = draft.validate(GameMode::Tower).unwrap();
        match record.details {
            ModeDetails::Tower {
                floor_number,
                options,
                correct_answer,
            } => {
                assert_eq!(floor_number, 3);
                assert_eq!(options, vec!["temporary".to_string(), "eternal".to_string()]);
                assert_eq!(correct_answer, "temporary");
            }
            other => panic!("unexpected details: {other:?}"),
        }
    }

    #[test]
    fn tower_rejects_out_of_range_floor() {
        let draft = WordDraft::new("w", "d").with_tower(101, &["a"], "a");
        assert_eq!(draft.validate(GameMode::Tower), Err(RecordError::FloorOutOfRange(101)));
    }

    #[test]
    fn tower_rejects_blank_options_and_foreign_answer() {
        let blank = WordDraft::new("w", "d").with_tower(1, &["", " "], "a");
        assert_eq!(blank.validate(GameMode::Tower), Err(RecordError::MissingOptions));

        let foreign = WordDraft::new("w", "d").with_tower(1, &["a", "b"], "c");
        assert_eq!(
            foreign.validate(GameMode::Tower),
            Err(RecordError::CorrectAnswerNotInOptions("c".into()))
        );
    }

    #[test]
    fn new_record_gains_identity() {
        let record = WordDraft::new("oak", "a tree")
            .with_obstacle(ObstacleType::Tree)
            .validate(GameMode::Forest)
            .unwrap();
        let id = RecordId::generate();
        let stored = record.into_record(id, fixed_now());
        assert_eq!(stored.id, id);
        assert_eq!(stored.mode(), GameMode::Forest);
        assert_eq!(stored.created_at, fixed_now());
    }

    #[test]
    fn default_draft_offers_four_option_slots() {
        assert_eq!(WordDraft::default().options.len(), DRAFT_OPTION_SLOTS);
    }
}
