use chrono::{DateTime, Utc};
use realm_core::model::{GameMode, ModeDetails, ObstacleType, RecordId, WordRecord};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Flattened, nullable columns for one row of `words`.
pub(crate) struct DetailColumns {
    pub game_mode: &'static str,
    pub combined_word: Option<String>,
    pub component_words: Option<String>,
    pub obstacle_type: Option<&'static str>,
    pub floor_number: Option<i64>,
    pub options: Option<String>,
    pub correct_answer: Option<String>,
}

impl DetailColumns {
    pub(crate) fn from_details(details: &ModeDetails) -> Result<Self, StorageError> {
        let mut cols = Self {
            game_mode: details.mode().as_str(),
            combined_word: None,
            component_words: None,
            obstacle_type: None,
            floor_number: None,
            options: None,
            correct_answer: None,
        };
        match details {
            ModeDetails::Wordsmith {
                combined_word,
                component_words,
            } => {
                cols.combined_word = Some(combined_word.clone());
                cols.component_words = Some(serde_json::to_string(component_words).map_err(ser)?);
            }
            ModeDetails::Forest { obstacle_type } => {
                cols.obstacle_type = Some(obstacle_type.as_str());
            }
            ModeDetails::Tower {
                floor_number,
                options,
                correct_answer,
            } => {
                cols.floor_number = Some(i64::from(*floor_number));
                cols.options = Some(serde_json::to_string(options).map_err(ser)?);
                cols.correct_answer = Some(correct_answer.clone());
            }
        }
        Ok(cols)
    }
}

fn required<T>(value: Option<T>, column: &'static str) -> Result<T, StorageError> {
    value.ok_or_else(|| StorageError::Serialization(format!("missing {column}")))
}

fn json_list(raw: Option<String>, column: &'static str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(&required(raw, column)?).map_err(ser)
}

pub(crate) fn map_word_row(row: &SqliteRow) -> Result<WordRecord, StorageError> {
    let id: RecordId = row
        .try_get::<String, _>("id")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let mode: GameMode = row
        .try_get::<String, _>("game_mode")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(ser)?;

    let details = match mode {
        GameMode::Wordsmith => ModeDetails::Wordsmith {
            combined_word: required(row.try_get("combined_word").map_err(ser)?, "combined_word")?,
            component_words: json_list(
                row.try_get("component_words").map_err(ser)?,
                "component_words",
            )?,
        },
        GameMode::Forest => {
            let raw: String =
                required(row.try_get("obstacle_type").map_err(ser)?, "obstacle_type")?;
            ModeDetails::Forest {
                obstacle_type: raw.parse::<ObstacleType>().map_err(ser)?,
            }
        }
        GameMode::Tower => {
            let floor: i64 = required(row.try_get("floor_number").map_err(ser)?, "floor_number")?;
            ModeDetails::Tower {
                floor_number: u32::try_from(floor)
                    .map_err(|_| StorageError::Serialization(format!("invalid floor: {floor}")))?,
                options: json_list(row.try_get("options").map_err(ser)?, "options")?,
                correct_answer: required(
                    row.try_get("correct_answer").map_err(ser)?,
                    "correct_answer",
                )?,
            }
        }
    };

    Ok(WordRecord {
        id,
        word: row.try_get("word").map_err(ser)?,
        definition: row.try_get("definition").map_err(ser)?,
        details,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wordsmith_components_are_encoded_as_json() {
        let cols = DetailColumns::from_details(&ModeDetails::Wordsmith {
            combined_word: "unhelpful".into(),
            component_words: vec!["un".into(), "help".into(), "ful".into()],
        })
        .unwrap();
        assert_eq!(cols.game_mode, "wordsmith");
        assert_eq!(cols.component_words.as_deref(), Some(r#"["un","help","ful"]"#));
        assert!(cols.floor_number.is_none());
    }

    #[test]
    fn tower_columns_carry_floor_and_answer() {
        let cols = DetailColumns::from_details(&ModeDetails::Tower {
            floor_number: 7,
            options: vec!["a".into(), "b".into()],
            correct_answer: "b".into(),
        })
        .unwrap();
        assert_eq!(cols.floor_number, Some(7));
        assert_eq!(cols.correct_answer.as_deref(), Some("b"));
        assert!(cols.obstacle_type.is_none());
    }
}
