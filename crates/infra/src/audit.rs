use std::sync::Arc;

use chrono::Utc;

use crate::models::HistoryEntry;
use crate::store::{collections, DocumentStore, StoreResult};

/// Writer for the append-only audit log ("history"). Appends are best
/// effort: a domain write may succeed while its audit append fails, and
/// the caller still reports success.
#[derive(Clone)]
pub struct AuditLog {
    store: Arc<dyn DocumentStore>,
}

impl AuditLog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Append one record. `action` must be a past-tense sentence starting
    /// with the verb, e.g. "added new player, Jane Doe.".
    pub async fn append(&self, user: Option<&str>, action: impl Into<String>) {
        let entry = HistoryEntry {
            created_at: Utc::now(),
            user: user.map(str::to_string),
            action: action.into(),
        };
        let value = match serde_json::to_value(&entry) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%error, "audit record could not be serialized");
                return;
            }
        };
        if let Err(error) = self.store.add(collections::HISTORY, value).await {
            tracing::warn!(%error, action = %entry.action, "audit append failed");
        }
    }

    /// Records ordered newest first for display.
    pub async fn entries(&self) -> StoreResult<Vec<(String, HistoryEntry)>> {
        let docs = self.store.list(collections::HISTORY).await?;
        let mut entries = Vec::with_capacity(docs.len());
        for doc in docs {
            entries.push((doc.id.clone(), doc.parse::<HistoryEntry>()?));
        }
        entries.sort_by(|(_, a), (_, b)| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}
