use realm_core::model::{GameMode, NewWordRecord, RecordId, WordRecord};

use super::SqliteRepository;
use super::mapping::{DetailColumns, map_word_row};
use crate::repository::{ContentStore, StorageError};

#[async_trait::async_trait]
impl ContentStore for SqliteRepository {
    async fn list_by_mode(&self, mode: GameMode) -> Result<Vec<WordRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT
                id, word, definition, game_mode, combined_word, component_words,
                obstacle_type, floor_number, options, correct_answer, created_at
            FROM words
            WHERE game_mode = ?1
            ORDER BY created_at DESC, rowid DESC
            ",
        )
        .bind(mode.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut words = Vec::with_capacity(rows.len());
        for row in rows {
            words.push(map_word_row(&row)?);
        }
        Ok(words)
    }

    async fn insert(&self, record: NewWordRecord) -> Result<WordRecord, StorageError> {
        let stored = record.into_record(RecordId::generate(), self.clock.now());
        let cols = DetailColumns::from_details(&stored.details)?;

        sqlx::query(
            r"
            INSERT INTO words (
                id, word, definition, game_mode, combined_word, component_words,
                obstacle_type, floor_number, options, correct_answer, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ",
        )
        .bind(stored.id.to_string())
        .bind(stored.word.clone())
        .bind(stored.definition.clone())
        .bind(cols.game_mode)
        .bind(cols.combined_word)
        .bind(cols.component_words)
        .bind(cols.obstacle_type)
        .bind(cols.floor_number)
        .bind(cols.options)
        .bind(cols.correct_answer)
        .bind(stored.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
            other => StorageError::Connection(other.to_string()),
        })?;

        tracing::debug!(id = %stored.id, mode = %stored.mode(), "inserted word record");
        Ok(stored)
    }

    async fn delete(&self, id: RecordId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM words WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
