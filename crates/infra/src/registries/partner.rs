use std::sync::Arc;

use crate::audit::AuditLog;
use crate::models::{Player, TournamentJoined};
use crate::ops::{
    self, mirror_entry, remove_mirror, DomainError, ValidationErrors,
};
use crate::store::{collections, DocumentStore, StoreError};

/// Keeps doubles-partner participations symmetric across the two player
/// documents. The partner side is written first; when it fails the
/// player's own write still proceeds, so a broken link is possible and
/// tolerated (the failure is logged).
#[derive(Clone)]
pub struct PartnerLinkKeeper {
    store: Arc<dyn DocumentStore>,
    audit: AuditLog,
}

impl PartnerLinkKeeper {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let audit = AuditLog::new(store.clone());
        Self { store, audit }
    }

    pub async fn add_participation(
        &self,
        self_id: &str,
        participation: TournamentJoined,
        actor: &str,
    ) -> Result<(), DomainError> {
        let player = self.load(self_id).await?;
        if player.has_event(&participation.event) {
            return Err(DomainError::DuplicateEvent(participation.event));
        }

        if let Some(partner_id) = participation.partner_id.clone() {
            if partner_id == self_id {
                let mut errors = ValidationErrors::new();
                errors.push("partner_id", "A player cannot partner themselves.");
                return Err(DomainError::Validation(errors));
            }
            let partner = self.load(&partner_id).await?;
            if partner.has_event(&participation.event) {
                return Err(DomainError::DuplicateEvent(participation.event));
            }

            let mirror = mirror_entry(&participation, self_id);
            if let Err(error) = self.write_mirror(&partner_id, &partner, mirror, actor).await {
                let error = DomainError::PartnerLink(Box::new(error));
                tracing::warn!(%error, %partner_id, "participation stored without partner mirror");
            }
        }

        let updated = ops::add_participation(&player, participation)?;
        self.write_player(self_id, &updated).await?;
        self.audit
            .append(
                Some(actor),
                format!(
                    "updated tournament history of {}.",
                    updated.personal_details.full_name()
                ),
            )
            .await;
        Ok(())
    }

    pub async fn remove_participation(
        &self,
        self_id: &str,
        index: usize,
        actor: &str,
    ) -> Result<(), DomainError> {
        let player = self.load(self_id).await?;
        let (updated, removed) = ops::remove_participation(&player, index)?;

        if let Some(partner_id) = removed.partner_id.as_deref() {
            if let Err(error) = self
                .unlink_partner(partner_id, &removed.event, self_id, actor)
                .await
            {
                let error = DomainError::PartnerLink(Box::new(error));
                tracing::warn!(%error, %partner_id, "partner mirror was not removed");
            }
        }

        self.write_player(self_id, &updated).await?;
        self.audit
            .append(
                Some(actor),
                format!(
                    "updated tournament history of {}.",
                    updated.personal_details.full_name()
                ),
            )
            .await;
        Ok(())
    }

    async fn write_mirror(
        &self,
        partner_id: &str,
        partner: &Player,
        mirror: TournamentJoined,
        actor: &str,
    ) -> Result<(), DomainError> {
        let updated = ops::add_participation(partner, mirror)?;
        self.write_player(partner_id, &updated).await?;
        self.audit
            .append(
                Some(actor),
                format!(
                    "updated tournament history of {}.",
                    updated.personal_details.full_name()
                ),
            )
            .await;
        Ok(())
    }

    async fn unlink_partner(
        &self,
        partner_id: &str,
        event: &str,
        self_id: &str,
        actor: &str,
    ) -> Result<(), DomainError> {
        // A deleted partner leaves a dangling reference; nothing to do.
        let Some(doc) = self.store.get(collections::PLAYERS, partner_id).await? else {
            return Ok(());
        };
        let partner: Player = doc.parse()?;
        let Some(updated) = remove_mirror(&partner, event, self_id) else {
            return Ok(());
        };
        self.write_player(partner_id, &updated).await?;
        self.audit
            .append(
                Some(actor),
                format!(
                    "updated tournament history of player, {}.",
                    updated.personal_details.full_name()
                ),
            )
            .await;
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Player, DomainError> {
        let doc = self
            .store
            .get(collections::PLAYERS, id)
            .await?
            .ok_or_else(|| StoreError::not_found(collections::PLAYERS, id))?;
        Ok(doc.parse()?)
    }

    async fn write_player(&self, id: &str, player: &Player) -> Result<(), DomainError> {
        let value = serde_json::to_value(player).map_err(StoreError::from)?;
        self.store.update(collections::PLAYERS, id, value).await?;
        Ok(())
    }
}
