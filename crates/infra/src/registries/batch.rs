use std::sync::Arc;

use chrono::Utc;

use crate::audit::AuditLog;
use crate::models::{Level, Player};
use crate::ops::{apply_batch_level, DomainError};
use crate::store::{collections, DocumentStore, StoreError, WriteBatch};

/// Applies one level to a selection of players in a single atomic batch.
/// The only multi-document atomicity in the system: on commit failure no
/// player changes, though per-player audit records written ahead of the
/// commit are retained (the audit log is not transactional).
#[derive(Clone)]
pub struct BatchLeveller {
    store: Arc<dyn DocumentStore>,
    audit: AuditLog,
}

impl BatchLeveller {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let audit = AuditLog::new(store.clone());
        Self { store, audit }
    }

    /// Returns the number of players updated. Empty input is a no-op;
    /// duplicate ids are collapsed to their first occurrence.
    pub async fn set_level(
        &self,
        player_ids: &[String],
        new_level: Option<Level>,
        actor: &str,
    ) -> Result<usize, DomainError> {
        let mut seen = Vec::new();
        for id in player_ids {
            if !seen.contains(id) {
                seen.push(id.clone());
            }
        }
        if seen.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut batch = WriteBatch::new();
        let mut sentences = Vec::new();
        for id in &seen {
            // Stale selections may reference deleted players; skip them.
            let Some(doc) = self.store.get(collections::PLAYERS, id).await? else {
                continue;
            };
            let player: Player = doc.parse()?;
            let (updated, sentence) = apply_batch_level(&player, new_level, now, actor);
            batch.update(
                collections::PLAYERS,
                id,
                serde_json::to_value(&updated).map_err(StoreError::from)?,
            );
            sentences.push(sentence);
        }
        if batch.is_empty() {
            return Ok(0);
        }

        let updated = batch.len();
        for sentence in sentences {
            self.audit.append(Some(actor), sentence).await;
        }
        self.store.commit(batch).await?;
        self.audit
            .append(
                Some(actor),
                format!(
                    "batch updated of {updated} players levels to {}",
                    new_level.map(Level::as_str).unwrap_or("")
                ),
            )
            .await;
        Ok(updated)
    }
}
