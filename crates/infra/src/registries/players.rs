use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;

use crate::audit::AuditLog;
use crate::models::{Level, Player, TournamentJoined};
use crate::ops::{
    self, apply_level_change, edited_player, new_player, validate_player, DomainError, PlayerInput,
};
use crate::registries::{ClubRegistry, PartnerLinkKeeper};
use crate::store::{collections, DocumentStore, StoreChange, StoreError, StoreResult};

#[derive(Clone)]
pub struct PlayerRegistry {
    store: Arc<dyn DocumentStore>,
    audit: AuditLog,
}

impl PlayerRegistry {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let audit = AuditLog::new(store.clone());
        Self { store, audit }
    }

    /// Create a player. When the named club is not in the club snapshot it
    /// is created first (with its own audit record); the player document
    /// then lands with a single creation-time level update.
    pub async fn create(&self, input: PlayerInput, actor: &str) -> Result<String, DomainError> {
        validate_player(&input.personal_details)?;

        if !input.club.is_empty() {
            let clubs = ClubRegistry::new(self.store.clone());
            let known = clubs.list().await?;
            if !known.iter().any(|(_, club)| club.name == input.club) {
                clubs.create(&input.club, actor).await?;
            }
        }

        let player = new_player(input, Utc::now(), actor);
        let full_name = player.personal_details.full_name();
        let value = serde_json::to_value(&player).map_err(StoreError::from)?;
        let id = self.store.add(collections::PLAYERS, value).await?;
        self.audit
            .append(Some(actor), format!("added new player, {full_name}."))
            .await;
        Ok(id)
    }

    /// Full-document overwrite of the form-editable fields; level history
    /// and creation time are carried over. Last writer wins.
    pub async fn update(&self, id: &str, input: PlayerInput, actor: &str) -> Result<(), DomainError> {
        validate_player(&input.personal_details)?;
        let current = self.get(id).await?;
        let updated = edited_player(&current, input);
        let full_name = updated.personal_details.full_name();
        let value = serde_json::to_value(&updated).map_err(StoreError::from)?;
        self.store.update(collections::PLAYERS, id, value).await?;
        self.audit
            .append(
                Some(actor),
                format!("updated details of player, {full_name}."),
            )
            .await;
        Ok(())
    }

    /// Delete the player. Other players' participations are left alone,
    /// dangling `partner_id` references included.
    pub async fn remove(&self, id: &str, actor: &str) -> Result<(), DomainError> {
        let current = self.get(id).await?;
        self.store.delete(collections::PLAYERS, id).await?;
        self.audit
            .append(
                Some(actor),
                format!("deleted player, {}", current.personal_details.full_name()),
            )
            .await;
        Ok(())
    }

    /// Append a level update and move the current level. Returns `false`
    /// without writing anything when the level is unchanged.
    pub async fn change_level(
        &self,
        id: &str,
        new_level: Option<Level>,
        actor: &str,
    ) -> Result<bool, DomainError> {
        let current = self.get(id).await?;
        let Some((updated, sentence)) = apply_level_change(&current, new_level, Utc::now(), actor)
        else {
            return Ok(false);
        };
        let value = serde_json::to_value(&updated).map_err(StoreError::from)?;
        self.store.update(collections::PLAYERS, id, value).await?;
        self.audit.append(Some(actor), sentence).await;
        Ok(true)
    }

    pub async fn add_participation(
        &self,
        id: &str,
        participation: TournamentJoined,
        actor: &str,
    ) -> Result<(), DomainError> {
        PartnerLinkKeeper::new(self.store.clone())
            .add_participation(id, participation, actor)
            .await
    }

    pub async fn remove_participation(
        &self,
        id: &str,
        index: usize,
        actor: &str,
    ) -> Result<(), DomainError> {
        PartnerLinkKeeper::new(self.store.clone())
            .remove_participation(id, index, actor)
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Player, DomainError> {
        let doc = self
            .store
            .get(collections::PLAYERS, id)
            .await?
            .ok_or_else(|| StoreError::not_found(collections::PLAYERS, id))?;
        Ok(doc.parse()?)
    }

    pub async fn list(&self) -> StoreResult<Vec<(String, Player)>> {
        let docs = self.store.list(collections::PLAYERS).await?;
        let mut players = Vec::with_capacity(docs.len());
        for doc in docs {
            players.push((doc.id.clone(), doc.parse::<Player>()?));
        }
        Ok(players)
    }

    /// Doubles-partner candidates for the picker.
    pub async fn partner_candidates(
        &self,
        self_id: &str,
        event: &str,
    ) -> StoreResult<Vec<(String, Player)>> {
        let players = self.list().await?;
        Ok(ops::partner_candidates(&players, self_id, event)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn watch(&self) -> broadcast::Receiver<StoreChange> {
        self.store.changes()
    }
}
