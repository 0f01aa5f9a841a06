use async_graphql::{InputObject, SimpleObject, ID};
use chrono::{DateTime, Utc};

use infra::models::{
    self, level_label, parse_level, Club, HistoryEntry, Player, Tournament, TournamentJoined,
};
use infra::ops::{DomainError, EventRowInput, PlayerInput, ValidationErrors, REQUIRED};
use infra::registries::TournamentInput;

#[derive(SimpleObject, Clone)]
pub struct BirthAddress {
    pub address: String,
    pub barangay: String,
    pub municipality: String,
    pub province: String,
}

#[derive(SimpleObject, Clone)]
pub struct InternationalAddress {
    pub address: String,
    pub country: String,
}

#[derive(SimpleObject, Clone)]
pub struct PersonalDetails {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: DateTime<Utc>,
    pub email: String,
    pub contact_no: String,
    pub is_international: bool,
    pub birth_address: BirthAddress,
    pub international_address: InternationalAddress,
}

#[derive(SimpleObject, Clone)]
pub struct PlayerDetails {
    pub club: String,
    /// Level token; empty when unassigned.
    pub level: String,
    /// Display form: the token or "Unassigned".
    pub level_label: String,
}

#[derive(SimpleObject, Clone)]
pub struct LevelUpdate {
    pub date: DateTime<Utc>,
    pub leveller: String,
    pub new_level: String,
}

#[derive(SimpleObject, Clone)]
pub struct Participation {
    pub tournament: String,
    pub event: String,
    pub standing: String,
    pub partner_id: Option<ID>,
}

#[derive(SimpleObject, Clone)]
pub struct PlayerHistory {
    pub level_updates: Vec<LevelUpdate>,
    pub tournaments_joined: Vec<Participation>,
}

#[derive(SimpleObject, Clone)]
pub struct PlayerView {
    pub id: ID,
    pub personal_details: PersonalDetails,
    pub player_details: PlayerDetails,
    pub history: PlayerHistory,
    pub created_at: DateTime<Utc>,
}

impl PlayerView {
    pub fn from_doc(id: String, player: Player) -> Self {
        let details = player.personal_details;
        Self {
            id: id.into(),
            personal_details: PersonalDetails {
                first_name: details.first_name,
                middle_name: details.middle_name,
                last_name: details.last_name,
                gender: details.gender.to_string(),
                birth_date: details.birth_date,
                email: details.email,
                contact_no: details.contact_no,
                is_international: details.is_international,
                birth_address: BirthAddress {
                    address: details.birth_address.address,
                    barangay: details.birth_address.barangay,
                    municipality: details.birth_address.municipality,
                    province: details.birth_address.province,
                },
                international_address: InternationalAddress {
                    address: details.international_address.address,
                    country: details.international_address.country,
                },
            },
            player_details: PlayerDetails {
                club: player.player_details.club,
                level: player
                    .player_details
                    .level
                    .map(|level| level.as_str().to_string())
                    .unwrap_or_default(),
                level_label: level_label(player.player_details.level).to_string(),
            },
            history: PlayerHistory {
                level_updates: player
                    .history
                    .level_updates
                    .into_iter()
                    .map(|update| LevelUpdate {
                        date: update.date,
                        leveller: update.leveller,
                        new_level: update
                            .new_level
                            .map(|level| level.as_str().to_string())
                            .unwrap_or_default(),
                    })
                    .collect(),
                tournaments_joined: player
                    .history
                    .tournaments_joined
                    .into_iter()
                    .map(Participation::from)
                    .collect(),
            },
            created_at: player.created_at,
        }
    }
}

impl From<TournamentJoined> for Participation {
    fn from(joined: TournamentJoined) -> Self {
        Self {
            tournament: joined.tournament,
            event: joined.event,
            standing: joined.standing.to_string(),
            partner_id: joined.partner_id.map(ID::from),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct ClubView {
    pub id: ID,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl ClubView {
    pub fn from_doc(id: String, club: Club) -> Self {
        Self {
            id: id.into(),
            name: club.name,
            created_at: club.created_at,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Location {
    pub address: String,
    pub barangay: String,
    pub municipality: String,
    pub province: String,
}

#[derive(SimpleObject, Clone)]
pub struct EventView {
    pub name: String,
    pub gender: String,
    pub count: String,
    pub level: String,
}

impl From<models::TournamentEvent> for EventView {
    fn from(event: models::TournamentEvent) -> Self {
        Self {
            name: event.name,
            gender: event.gender.to_string(),
            count: event.count.to_string(),
            level: event
                .level
                .map(|level| level.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct TournamentView {
    pub id: ID,
    pub name: String,
    pub organizer: String,
    pub location: Location,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub events: Vec<EventView>,
    pub created_at: DateTime<Utc>,
}

impl TournamentView {
    pub fn from_doc(id: String, tournament: Tournament) -> Self {
        Self {
            id: id.into(),
            name: tournament.name,
            organizer: tournament.organizer,
            location: Location {
                address: tournament.location.address,
                barangay: tournament.location.barangay,
                municipality: tournament.location.municipality,
                province: tournament.location.province,
            },
            start: tournament.start,
            end: tournament.end,
            events: tournament.events.into_iter().map(EventView::from).collect(),
            created_at: tournament.created_at,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct HistoryEntryView {
    pub id: ID,
    pub created_at: DateTime<Utc>,
    pub user: Option<String>,
    pub action: String,
    /// "{user} {action}", the way the history page renders a row.
    pub description: String,
}

impl HistoryEntryView {
    pub fn from_doc(id: String, entry: HistoryEntry) -> Self {
        let description = match &entry.user {
            Some(user) => format!("{} {}", user, entry.action),
            None => entry.action.clone(),
        };
        Self {
            id: id.into(),
            created_at: entry.created_at,
            user: entry.user,
            action: entry.action,
            description,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct PlayerStatsView {
    pub with_level: f64,
    pub with_club: f64,
    pub with_participation: f64,
}

#[derive(SimpleObject, Clone)]
pub struct DashboardView {
    pub months: Vec<String>,
    pub player_count: i64,
    pub club_count: i64,
    pub tournament_count: i64,
    pub stats: PlayerStatsView,
    pub ongoing: Vec<TournamentView>,
    pub upcoming: Option<TournamentView>,
}

#[derive(SimpleObject, Clone)]
pub struct OptionsView {
    pub levels: Vec<String>,
    pub standings: Vec<String>,
    pub genders: Vec<String>,
    pub event_genders: Vec<String>,
    pub event_counts: Vec<String>,
}

#[derive(SimpleObject, Clone)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub display_name: String,
}

#[derive(SimpleObject, Clone)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(InputObject)]
pub struct BirthAddressInput {
    #[graphql(default)]
    pub address: String,
    #[graphql(default)]
    pub barangay: String,
    #[graphql(default)]
    pub municipality: String,
    #[graphql(default)]
    pub province: String,
}

#[derive(InputObject)]
pub struct InternationalAddressInput {
    #[graphql(default)]
    pub address: String,
    #[graphql(default)]
    pub country: String,
}

#[derive(InputObject)]
pub struct PersonalDetailsInput {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub gender: String,
    pub birth_date: DateTime<Utc>,
    pub email: Option<String>,
    pub contact_no: Option<String>,
    #[graphql(default)]
    pub is_international: bool,
    pub birth_address: Option<BirthAddressInput>,
    pub international_address: Option<InternationalAddressInput>,
}

#[derive(InputObject)]
pub struct PlayerDetailsInput {
    pub club: Option<String>,
    /// Level token; empty or absent means "Unassigned".
    pub level: Option<String>,
}

#[derive(InputObject)]
pub struct PlayerFormInput {
    pub personal_details: PersonalDetailsInput,
    pub player_details: PlayerDetailsInput,
}

impl PlayerFormInput {
    pub fn into_domain(self) -> Result<PlayerInput, DomainError> {
        let mut errors = ValidationErrors::new();

        let gender = match self.personal_details.gender.parse::<models::Gender>() {
            Ok(gender) => Some(gender),
            Err(_) => {
                errors.push("personal_details.gender", REQUIRED);
                None
            }
        };
        let level = match parse_level(self.player_details.level.as_deref().unwrap_or("")) {
            Ok(level) => level,
            Err(_) => {
                errors.push("player_details.level", REQUIRED);
                None
            }
        };
        errors.into_result()?;

        let birth_address = self.personal_details.birth_address.unwrap_or_else(|| {
            BirthAddressInput {
                address: String::new(),
                barangay: String::new(),
                municipality: String::new(),
                province: String::new(),
            }
        });
        let international_address = self
            .personal_details
            .international_address
            .unwrap_or_else(|| InternationalAddressInput {
                address: String::new(),
                country: String::new(),
            });

        Ok(PlayerInput {
            personal_details: models::PersonalDetails {
                first_name: self.personal_details.first_name,
                middle_name: self.personal_details.middle_name.unwrap_or_default(),
                last_name: self.personal_details.last_name,
                gender: gender.expect("validated above"),
                birth_date: self.personal_details.birth_date,
                email: self.personal_details.email.unwrap_or_default(),
                contact_no: self.personal_details.contact_no.unwrap_or_default(),
                is_international: self.personal_details.is_international,
                birth_address: models::BirthAddress {
                    address: birth_address.address,
                    barangay: birth_address.barangay,
                    municipality: birth_address.municipality,
                    province: birth_address.province,
                },
                international_address: models::InternationalAddress {
                    address: international_address.address,
                    country: international_address.country,
                },
            },
            club: self.player_details.club.unwrap_or_default(),
            level,
        })
    }
}

#[derive(InputObject)]
pub struct ParticipationInput {
    pub tournament: String,
    pub event: String,
    pub standing: String,
    pub partner_id: Option<ID>,
}

impl ParticipationInput {
    pub fn into_domain(self) -> Result<TournamentJoined, DomainError> {
        let mut errors = ValidationErrors::new();
        errors.require("tournament", &self.tournament);
        errors.require("event", &self.event);
        let standing = match self.standing.parse::<models::Standing>() {
            Ok(standing) => Some(standing),
            Err(_) => {
                errors.push("standing", REQUIRED);
                None
            }
        };
        errors.into_result()?;

        Ok(TournamentJoined {
            tournament: self.tournament,
            event: self.event,
            standing: standing.expect("validated above"),
            partner_id: self.partner_id.map(|id| id.0).filter(|id| !id.is_empty()),
        })
    }
}

#[derive(InputObject)]
pub struct LocationInput {
    #[graphql(default)]
    pub address: String,
    #[graphql(default)]
    pub barangay: String,
    #[graphql(default)]
    pub municipality: String,
    #[graphql(default)]
    pub province: String,
}

#[derive(InputObject, Default)]
pub struct EventRowGql {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub count: Option<String>,
    pub level: Option<String>,
}

#[derive(InputObject)]
pub struct TournamentFormInput {
    pub name: String,
    pub organizer: String,
    pub location: LocationInput,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[graphql(default)]
    pub events: Vec<EventRowGql>,
}

impl TournamentFormInput {
    pub fn into_domain(self) -> TournamentInput {
        TournamentInput {
            name: self.name,
            organizer: self.organizer,
            location: models::Location {
                address: self.location.address,
                barangay: self.location.barangay,
                municipality: self.location.municipality,
                province: self.location.province,
            },
            start: self.start,
            end: self.end,
            events: self
                .events
                .into_iter()
                .map(|row| EventRowInput {
                    name: row.name.unwrap_or_default(),
                    gender: row.gender.unwrap_or_default(),
                    count: row.count.unwrap_or_default(),
                    level: row.level.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

#[derive(InputObject)]
pub struct RegisterInput {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

#[derive(InputObject)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(InputObject)]
pub struct ChangePasswordInput {
    /// Reauthentication credentials, checked before the change.
    pub email: String,
    pub password: String,
    pub new_password: String,
}
