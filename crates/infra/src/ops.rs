//! Pure domain mutations. Every registry operation is planned here as a
//! function of `(current document, input, clock, actor)` so the invariants
//! are testable without a store or a running server.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    level_label, parse_level, EventCount, EventGender, Gender, Level, LevelUpdate, Location,
    PersonalDetails, Player, PlayerDetails, PlayerHistory, Tournament, TournamentEvent,
    TournamentJoined,
};
use crate::store::StoreError;

pub const REQUIRED: &str = "This field is required.";

/// Per-field validation failures, keyed by the dotted field path the forms
/// have always used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, REQUIRED);
        }
    }

    pub fn push(&mut self, field: &str, message: &str) {
        self.fields.insert(field.to_string(), message.to_string());
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        self.fields.extend(other.fields);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("player already holds a participation for event {0:?}")]
    DuplicateEvent(String),

    #[error("no participation at index {0}")]
    BadIndex(usize),

    #[error("partner side of the participation could not be updated")]
    PartnerLink(#[source] Box<DomainError>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Payload for player create/update. The level only participates on
/// create; edits change levels through the history dialog instead.
#[derive(Debug, Clone)]
pub struct PlayerInput {
    pub personal_details: PersonalDetails,
    pub club: String,
    pub level: Option<Level>,
}

pub fn validate_player(details: &PersonalDetails) -> Result<(), DomainError> {
    let mut errors = ValidationErrors::new();
    errors.require("personal_details.first_name", &details.first_name);
    errors.require("personal_details.last_name", &details.last_name);
    if details.is_international {
        errors.require(
            "personal_details.international_address.address",
            &details.international_address.address,
        );
        errors.require(
            "personal_details.international_address.country",
            &details.international_address.country,
        );
    } else {
        errors.require(
            "personal_details.birth_address.address",
            &details.birth_address.address,
        );
        errors.require(
            "personal_details.birth_address.province",
            &details.birth_address.province,
        );
    }
    errors.into_result()
}

/// Blank out whichever address subtree is not active. Both subtrees stay
/// present on the document; the inactive one holds empty fields.
pub fn normalize_addresses(details: &mut PersonalDetails) {
    if details.is_international {
        details.birth_address = Default::default();
    } else {
        details.international_address = Default::default();
    }
}

/// Build the document for a brand-new player. The level history starts
/// with exactly one entry recording the creation-time level.
pub fn new_player(input: PlayerInput, now: DateTime<Utc>, actor: &str) -> Player {
    let mut personal_details = input.personal_details;
    normalize_addresses(&mut personal_details);
    Player {
        personal_details,
        player_details: PlayerDetails {
            club: input.club,
            level: input.level,
            id: String::new(),
        },
        history: PlayerHistory {
            level_updates: vec![LevelUpdate {
                date: now,
                leveller: actor.to_string(),
                new_level: input.level,
            }],
            tournaments_joined: Vec::new(),
        },
        created_at: now,
    }
}

/// Apply edits from the player form, keeping history and creation time.
pub fn edited_player(current: &Player, input: PlayerInput) -> Player {
    let mut personal_details = input.personal_details;
    normalize_addresses(&mut personal_details);
    Player {
        personal_details,
        player_details: PlayerDetails {
            club: input.club,
            ..current.player_details.clone()
        },
        history: current.history.clone(),
        created_at: current.created_at,
    }
}

/// Plan a level change. Returns `None` when the new level equals the
/// current one: the history records changes, not re-selections.
pub fn apply_level_change(
    player: &Player,
    new_level: Option<Level>,
    now: DateTime<Utc>,
    actor: &str,
) -> Option<(Player, String)> {
    let prev = player.current_level();
    if prev == new_level {
        return None;
    }

    let mut updated = player.clone();
    updated.history.level_updates.push(LevelUpdate {
        date: now,
        leveller: actor.to_string(),
        new_level,
    });
    updated.player_details.level = new_level;

    let sentence = level_change_sentence(&updated.personal_details, prev, new_level);
    Some((updated, sentence))
}

/// Plan the batch variant: the entry is appended unconditionally and the
/// audit sentence describes the transition from the replaced level.
pub fn apply_batch_level(
    player: &Player,
    new_level: Option<Level>,
    now: DateTime<Utc>,
    actor: &str,
) -> (Player, String) {
    let prev = player.current_level();
    let mut updated = player.clone();
    updated.history.level_updates.push(LevelUpdate {
        date: now,
        leveller: actor.to_string(),
        new_level,
    });
    updated.player_details.level = new_level;

    let sentence = level_change_sentence(&updated.personal_details, prev, new_level);
    (updated, sentence)
}

pub fn level_change_sentence(
    details: &PersonalDetails,
    prev: Option<Level>,
    new_level: Option<Level>,
) -> String {
    format!(
        "updated player level of {} from {} to {}.",
        details.full_name(),
        level_label(prev),
        level_label(new_level),
    )
}

/// Append a participation, enforcing at most one per event.
pub fn add_participation(
    player: &Player,
    participation: TournamentJoined,
) -> Result<Player, DomainError> {
    if player.has_event(&participation.event) {
        return Err(DomainError::DuplicateEvent(participation.event));
    }
    let mut updated = player.clone();
    updated.history.tournaments_joined.push(participation);
    Ok(updated)
}

/// The partner's copy of a participation: same tournament, event and
/// standing, pointing back at the originating player.
pub fn mirror_entry(participation: &TournamentJoined, self_id: &str) -> TournamentJoined {
    TournamentJoined {
        tournament: participation.tournament.clone(),
        event: participation.event.clone(),
        standing: participation.standing,
        partner_id: Some(self_id.to_string()),
    }
}

/// Remove the participation at `index`, returning the removed entry so the
/// caller can unlink the partner side.
pub fn remove_participation(
    player: &Player,
    index: usize,
) -> Result<(Player, TournamentJoined), DomainError> {
    if index >= player.history.tournaments_joined.len() {
        return Err(DomainError::BadIndex(index));
    }
    let mut updated = player.clone();
    let removed = updated.history.tournaments_joined.remove(index);
    Ok((updated, removed))
}

/// Drop the partner's mirror of a removed participation, located by event
/// and back-reference. `None` when no mirror exists (already unlinked).
pub fn remove_mirror(partner: &Player, event: &str, self_id: &str) -> Option<Player> {
    let index = partner
        .history
        .tournaments_joined
        .iter()
        .position(|joined| {
            joined.event == event && joined.partner_id.as_deref() == Some(self_id)
        })?;
    let mut updated = partner.clone();
    updated.history.tournaments_joined.remove(index);
    Some(updated)
}

/// Events of a tournament a player of the given gender may enter.
pub fn eligible_events(tournament: &Tournament, gender: Gender) -> Vec<TournamentEvent> {
    tournament
        .events
        .iter()
        .filter(|event| event.gender.admits(gender))
        .cloned()
        .collect()
}

/// Doubles-partner candidates for `(self_id, event)`: everyone except
/// self, players already holding the event, and players already taken as
/// someone's partner for it. Sorted by last name for the picker.
pub fn partner_candidates<'a>(
    players: &'a [(String, Player)],
    self_id: &str,
    event: &str,
) -> Vec<&'a (String, Player)> {
    let mut candidates: Vec<&(String, Player)> = players
        .iter()
        .filter(|(id, player)| {
            if id == self_id || player.has_event(event) {
                return false;
            }
            let taken = players.iter().any(|(_, other)| {
                other
                    .history
                    .tournaments_joined
                    .iter()
                    .any(|joined| {
                        joined.event == event && joined.partner_id.as_deref() == Some(id.as_str())
                    })
            });
            !taken
        })
        .collect();
    candidates.sort_by(|(_, a), (_, b)| {
        a.personal_details
            .last_name
            .cmp(&b.personal_details.last_name)
    });
    candidates
}

/// Raw event row from the tournament form. All-blank rows are elided;
/// partially-filled rows must be complete.
#[derive(Debug, Clone, Default)]
pub struct EventRowInput {
    pub name: String,
    pub gender: String,
    pub count: String,
    pub level: String,
}

impl EventRowInput {
    fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.gender.is_empty()
            && self.count.is_empty()
            && self.level.is_empty()
    }
}

pub fn parse_events(rows: &[EventRowInput]) -> Result<Vec<TournamentEvent>, DomainError> {
    let mut errors = ValidationErrors::new();
    let mut events = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        if row.is_blank() {
            continue;
        }
        errors.require(&format!("event.name[{index}]"), &row.name);
        let gender = match row.gender.parse::<EventGender>() {
            Ok(gender) => Some(gender),
            Err(_) => {
                errors.push(&format!("event.gender[{index}]"), REQUIRED);
                None
            }
        };
        let count = match row.count.parse::<EventCount>() {
            Ok(count) => Some(count),
            Err(_) => {
                errors.push(&format!("event.count[{index}]"), REQUIRED);
                None
            }
        };
        let level = match parse_level(&row.level) {
            Ok(Some(level)) => Some(level),
            _ => {
                errors.push(&format!("event.level[{index}]"), REQUIRED);
                None
            }
        };
        if let (Some(gender), Some(count), Some(level)) = (gender, count, level) {
            events.push(TournamentEvent {
                name: row.name.clone(),
                gender,
                count,
                level: Some(level),
            });
        }
    }

    errors.into_result()?;
    Ok(events)
}

pub fn validate_tournament(
    name: &str,
    organizer: &str,
    location: &Location,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), DomainError> {
    let mut errors = ValidationErrors::new();
    errors.require("name", name);
    errors.require("organizer", organizer);
    errors.require("location.address", &location.address);
    errors.require("location.province", &location.province);
    if start > end {
        errors.push("end", "End date must not be earlier than the start date.");
    }
    errors.into_result()
}

pub fn validate_club_name(name: &str) -> Result<(), DomainError> {
    let mut errors = ValidationErrors::new();
    errors.require("name", name);
    errors.into_result()
}
