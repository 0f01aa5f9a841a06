use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{BatchOp, Document, DocumentStore, StoreChange, StoreError, StoreResult, WriteBatch};

/// Durable backend: one JSONB row per document. Change events are
/// broadcast in-process after a successful write, mirroring the memory
/// backend, so subscription behavior is identical in both deployments.
pub struct PgStore {
    pool: PgPool,
    changes: broadcast::Sender<StoreChange>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        let (changes, _) = broadcast::channel(256);
        Self { pool, changes }
    }

    /// Create the backing table when it does not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT        NOT NULL,
                id         TEXT        NOT NULL,
                data       JSONB       NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn notify(&self, collection: &str) {
        let _ = self.changes.send(StoreChange {
            collection: collection.to_string(),
        });
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn add(&self, collection: &str, data: Value) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(&data)
            .execute(&self.pool)
            .await?;
        self.notify(collection);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let row: Option<(Value,)> =
            sqlx::query_as("SELECT data FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(data,)| Document {
            id: id.to_string(),
            data,
        }))
    }

    async fn update(&self, collection: &str, id: &str, data: Value) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE documents SET data = $3 WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .bind(&data)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        self.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            self.notify(collection);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let rows: Vec<(String, Value)> = sqlx::query_as(
            "SELECT id, data FROM documents WHERE collection = $1 ORDER BY created_at ASC",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, data)| Document { id, data })
            .collect())
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        let ops = batch.into_ops();
        let mut tx = self.pool.begin().await?;

        let mut touched = Vec::new();
        for op in &ops {
            match op {
                BatchOp::Update {
                    collection,
                    id,
                    data,
                } => {
                    let result = sqlx::query(
                        "UPDATE documents SET data = $3 WHERE collection = $1 AND id = $2",
                    )
                    .bind(collection)
                    .bind(id)
                    .bind(data)
                    .execute(&mut *tx)
                    .await?;
                    if result.rows_affected() == 0 {
                        // Dropping the transaction rolls everything back.
                        return Err(StoreError::not_found(collection, id));
                    }
                    touched.push(collection.clone());
                }
                BatchOp::Delete { collection, id } => {
                    sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
                        .bind(collection)
                        .bind(id)
                        .execute(&mut *tx)
                        .await?;
                    touched.push(collection.clone());
                }
            }
        }
        tx.commit().await?;

        touched.sort();
        touched.dedup();
        for collection in touched {
            self.notify(&collection);
        }
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}
