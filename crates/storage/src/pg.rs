use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::error::StoreError;
use crate::models::EntityKind;
use crate::store::{EntityStore, Row};

const UPSERT_ENTITY: &str = r#"
    INSERT INTO entities (entity_type, id, data)
    VALUES ($1, $2, $3)
    ON CONFLICT (entity_type, id) DO UPDATE
    SET data = EXCLUDED.data, updated_at = NOW()
"#;

/// PostgreSQL-backed entity store over the `entities` table.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl EntityStore for PgStore {
    async fn load_raw(&self, kind: EntityKind, id: &str) -> Result<Option<Value>, StoreError> {
        let row: Option<(Json<Value>,)> =
            sqlx::query_as("SELECT data FROM entities WHERE entity_type = $1 AND id = $2")
                .bind(kind.as_str())
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(Json(data),)| data))
    }

    async fn save_raw(&self, kind: EntityKind, id: &str, data: Value) -> Result<(), StoreError> {
        sqlx::query(UPSERT_ENTITY)
            .bind(kind.as_str())
            .bind(id)
            .bind(Json(data))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All rows in one transaction. A dropped future rolls it back.
    async fn save_all_raw(&self, rows: Vec<Row>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for (kind, id, data) in rows {
            sqlx::query(UPSERT_ENTITY)
                .bind(kind.as_str())
                .bind(id)
                .bind(Json(data))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
