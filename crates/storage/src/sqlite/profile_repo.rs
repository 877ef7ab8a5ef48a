use realm_core::model::{Role, UserId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::ser;
use crate::repository::{ProfileRepository, StorageError};

#[async_trait::async_trait]
impl ProfileRepository for SqliteRepository {
    async fn role_for(&self, user: UserId) -> Result<Option<Role>, StorageError> {
        let row = sqlx::query("SELECT role FROM profiles WHERE id = ?1")
            .bind(user.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.map(|row| {
            row.try_get::<String, _>("role")
                .map_err(ser)?
                .parse::<Role>()
                .map_err(ser)
        })
        .transpose()
    }

    async fn set_role(&self, user: UserId, role: Role) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO profiles (id, role, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                role = excluded.role,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user.to_string())
        .bind(role.as_str())
        .bind(self.clock.now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
