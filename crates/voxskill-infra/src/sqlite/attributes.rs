//! SQLite persistent attribute store.
//!
//! Implements `PersistenceAdapter` from `voxskill-core`. Each user's
//! attributes are one JSON object stored as text.

use chrono::Utc;
use serde_json::Value;
use sqlx::Row;

use voxskill_core::persistence::{Attributes, PersistenceAdapter};
use voxskill_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `PersistenceAdapter`.
pub struct SqlitePersistenceAdapter {
    pool: DatabasePool,
}

impl SqlitePersistenceAdapter {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn parse_attributes(user_id: &str, raw: &str) -> Result<Attributes, RepositoryError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(RepositoryError::Query(format!(
            "attributes for {user_id} are not a JSON object: {other}"
        ))),
        Err(e) => Err(RepositoryError::Query(format!(
            "invalid JSON attributes for {user_id}: {e}"
        ))),
    }
}

impl PersistenceAdapter for SqlitePersistenceAdapter {
    async fn get_attributes(&self, user_id: &str) -> Result<Option<Attributes>, RepositoryError> {
        let row = sqlx::query("SELECT attributes FROM skill_user_attributes WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let raw: String = row
                    .try_get("attributes")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                parse_attributes(user_id, &raw).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn save_attributes(
        &self,
        user_id: &str,
        attributes: &Attributes,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let raw = serde_json::to_string(attributes)
            .map_err(|e| RepositoryError::Query(format!("failed to serialize attributes: {e}")))?;

        sqlx::query(
            r#"INSERT INTO skill_user_attributes (user_id, attributes, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (user_id) DO UPDATE SET attributes = excluded.attributes, updated_at = excluded.updated_at"#,
        )
        .bind(user_id)
        .bind(&raw)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tracing::debug!(user_id, "saved persistent attributes");
        Ok(())
    }
}
