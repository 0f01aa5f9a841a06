use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::audit::AuditLog;
use crate::models::{Location, Tournament, TournamentEvent};
use crate::ops::{
    parse_events, validate_tournament, DomainError, EventRowInput, ValidationErrors,
};
use crate::store::{collections, DocumentStore, StoreChange, StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct TournamentInput {
    pub name: String,
    pub organizer: String,
    pub location: Location,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub events: Vec<EventRowInput>,
}

#[derive(Clone)]
pub struct TournamentRegistry {
    store: Arc<dyn DocumentStore>,
    audit: AuditLog,
}

impl TournamentRegistry {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let audit = AuditLog::new(store.clone());
        Self { store, audit }
    }

    pub async fn create(&self, input: TournamentInput, actor: &str) -> Result<String, DomainError> {
        let (name, events) = Self::validate(&input)?;
        let tournament = Tournament {
            name: name.clone(),
            organizer: input.organizer,
            location: input.location,
            start: input.start,
            end: input.end,
            events,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&tournament).map_err(StoreError::from)?;
        let id = self.store.add(collections::TOURNAMENTS, value).await?;
        self.audit
            .append(Some(actor), format!("added new tournament, {name}."))
            .await;
        Ok(id)
    }

    pub async fn update(
        &self,
        id: &str,
        input: TournamentInput,
        actor: &str,
    ) -> Result<(), DomainError> {
        let (name, events) = Self::validate(&input)?;
        let current = self.get(id).await?;
        let tournament = Tournament {
            name: name.clone(),
            organizer: input.organizer,
            location: input.location,
            start: input.start,
            end: input.end,
            events,
            created_at: current.created_at,
        };
        let value = serde_json::to_value(&tournament).map_err(StoreError::from)?;
        self.store.update(collections::TOURNAMENTS, id, value).await?;
        self.audit
            .append(
                Some(actor),
                format!("updated details of tournament, {name}."),
            )
            .await;
        Ok(())
    }

    /// Delete by id. Participations keep referencing the tournament by
    /// name and are not rewritten.
    pub async fn remove(&self, id: &str, actor: &str) -> Result<(), DomainError> {
        let current = self.get(id).await?;
        self.store.delete(collections::TOURNAMENTS, id).await?;
        self.audit
            .append(Some(actor), format!("deleted tournament, {}.", current.name))
            .await;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Tournament, DomainError> {
        let doc = self
            .store
            .get(collections::TOURNAMENTS, id)
            .await?
            .ok_or_else(|| StoreError::not_found(collections::TOURNAMENTS, id))?;
        Ok(doc.parse()?)
    }

    pub async fn list(&self) -> StoreResult<Vec<(String, Tournament)>> {
        let docs = self.store.list(collections::TOURNAMENTS).await?;
        let mut tournaments = Vec::with_capacity(docs.len());
        for doc in docs {
            tournaments.push((doc.id.clone(), doc.parse::<Tournament>()?));
        }
        tournaments.sort_by(|(_, a), (_, b)| a.name.cmp(&b.name));
        Ok(tournaments)
    }

    pub fn watch(&self) -> broadcast::Receiver<StoreChange> {
        self.store.changes()
    }

    /// Collect field errors from the detail fields and the event rows in
    /// one pass so the form can highlight everything at once.
    fn validate(input: &TournamentInput) -> Result<(String, Vec<TournamentEvent>), DomainError> {
        let mut errors = ValidationErrors::new();
        if let Err(DomainError::Validation(detail_errors)) = validate_tournament(
            &input.name,
            &input.organizer,
            &input.location,
            input.start,
            input.end,
        ) {
            errors.merge(detail_errors);
        }
        let events = match parse_events(&input.events) {
            Ok(events) => events,
            Err(DomainError::Validation(event_errors)) => {
                errors.merge(event_errors);
                Vec::new()
            }
            Err(other) => return Err(other),
        };
        errors.into_result()?;
        Ok((input.name.clone(), events))
    }
}
