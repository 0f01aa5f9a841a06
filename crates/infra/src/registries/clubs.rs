use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;

use crate::audit::AuditLog;
use crate::models::Club;
use crate::ops::{validate_club_name, DomainError};
use crate::store::{collections, DocumentStore, StoreChange, StoreError, StoreResult};

#[derive(Clone)]
pub struct ClubRegistry {
    store: Arc<dyn DocumentStore>,
    audit: AuditLog,
}

impl ClubRegistry {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let audit = AuditLog::new(store.clone());
        Self { store, audit }
    }

    pub async fn create(&self, name: &str, actor: &str) -> Result<String, DomainError> {
        validate_club_name(name)?;
        let club = Club {
            name: name.to_string(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&club).map_err(StoreError::from)?;
        let id = self.store.add(collections::CLUBS, value).await?;
        self.audit
            .append(Some(actor), format!("added new club, {name}."))
            .await;
        Ok(id)
    }

    pub async fn update(&self, id: &str, name: &str, actor: &str) -> Result<(), DomainError> {
        validate_club_name(name)?;
        let current = self.get(id).await?;
        let club = Club {
            name: name.to_string(),
            created_at: current.created_at,
        };
        let value = serde_json::to_value(&club).map_err(StoreError::from)?;
        self.store.update(collections::CLUBS, id, value).await?;
        self.audit
            .append(Some(actor), format!("updated details of club, {name}."))
            .await;
        Ok(())
    }

    /// Delete without referential cleanup: players keep naming the club.
    pub async fn remove(&self, id: &str, actor: &str) -> Result<(), DomainError> {
        let current = self.get(id).await?;
        self.store.delete(collections::CLUBS, id).await?;
        self.audit
            .append(Some(actor), format!("deleted club, {}.", current.name))
            .await;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Club, DomainError> {
        let doc = self
            .store
            .get(collections::CLUBS, id)
            .await?
            .ok_or_else(|| StoreError::not_found(collections::CLUBS, id))?;
        Ok(doc.parse()?)
    }

    /// Snapshot ordered by name ascending, as every club picker shows it.
    pub async fn list(&self) -> StoreResult<Vec<(String, Club)>> {
        let docs = self.store.list(collections::CLUBS).await?;
        let mut clubs = Vec::with_capacity(docs.len());
        for doc in docs {
            clubs.push((doc.id.clone(), doc.parse::<Club>()?));
        }
        clubs.sort_by(|(_, a), (_, b)| a.name.cmp(&b.name));
        Ok(clubs)
    }

    pub fn watch(&self) -> broadcast::Receiver<StoreChange> {
        self.store.changes()
    }
}
