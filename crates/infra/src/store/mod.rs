use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Collection names used by the registry. Kept in one place so the
/// backends and the registries never drift apart.
pub mod collections {
    pub const PLAYERS: &str = "players";
    pub const CLUBS: &str = "clubs";
    pub const TOURNAMENTS: &str = "tournaments";
    pub const HISTORY: &str = "history";
    pub const USERS: &str = "users";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("document serialization failed")]
    Serde(#[from] serde_json::Error),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

/// A stored document together with its store-assigned id.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn parse<T: DeserializeOwned>(&self) -> StoreResult<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

/// Change notification emitted after every successful write, carrying the
/// touched collection. Subscribers re-read the collection on receipt;
/// dropping the receiver detaches the listener.
#[derive(Debug, Clone)]
pub struct StoreChange {
    pub collection: String,
}

#[derive(Debug)]
enum BatchOp {
    Update {
        collection: String,
        id: String,
        data: Value,
    },
    Delete {
        collection: String,
        id: String,
    },
}

/// Queued multi-document write, applied atomically by
/// [`DocumentStore::commit`].
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, collection: &str, id: &str, data: Value) {
        self.ops.push(BatchOp::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            data,
        });
    }

    pub fn delete(&mut self, collection: &str, id: &str) {
        self.ops.push(BatchOp::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}

/// Document store with live change notification. Single documents use
/// last-writer-wins semantics; only [`commit`](DocumentStore::commit)
/// provides multi-document atomicity.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return its store-assigned id.
    async fn add(&self, collection: &str, data: Value) -> StoreResult<String>;

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Full-document overwrite. Errors with `NotFound` when the document
    /// does not exist.
    async fn update(&self, collection: &str, id: &str, data: Value) -> StoreResult<()>;

    /// Idempotent delete.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Apply a queued batch atomically: either every op lands or none do.
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()>;

    /// Subscribe to the change feed.
    fn changes(&self) -> broadcast::Receiver<StoreChange>;
}
