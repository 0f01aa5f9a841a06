use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Player gender as stored on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(UnknownToken::new("gender", s)),
        }
    }
}

/// Gender restriction of a tournament event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventGender {
    #[serde(rename = "male")]
    Male,
    #[serde(rename = "female")]
    Female,
    #[serde(rename = "mixed")]
    Mixed,
    #[serde(rename = "non-gender")]
    NonGender,
}

impl EventGender {
    pub const fn as_str(self) -> &'static str {
        match self {
            EventGender::Male => "male",
            EventGender::Female => "female",
            EventGender::Mixed => "mixed",
            EventGender::NonGender => "non-gender",
        }
    }

    /// Whether a player of the given gender may enter this event.
    pub fn admits(self, gender: Gender) -> bool {
        match self {
            EventGender::Male => gender == Gender::Male,
            EventGender::Female => gender == Gender::Female,
            EventGender::Mixed | EventGender::NonGender => true,
        }
    }
}

impl fmt::Display for EventGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventGender {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(EventGender::Male),
            "female" => Ok(EventGender::Female),
            "mixed" => Ok(EventGender::Mixed),
            "non-gender" => Ok(EventGender::NonGender),
            _ => Err(UnknownToken::new("event gender", s)),
        }
    }
}

/// Singles or doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCount {
    Singles,
    Doubles,
}

impl EventCount {
    pub const fn as_str(self) -> &'static str {
        match self {
            EventCount::Singles => "singles",
            EventCount::Doubles => "doubles",
        }
    }
}

impl fmt::Display for EventCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCount {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "singles" => Ok(EventCount::Singles),
            "doubles" => Ok(EventCount::Doubles),
            _ => Err(UnknownToken::new("event count", s)),
        }
    }
}

/// Outcome bracket a player reached in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standing {
    #[serde(rename = "Elimination")]
    Elimination,
    #[serde(rename = "Semi-Finalist")]
    SemiFinalist,
    #[serde(rename = "Finalist")]
    Finalist,
    #[serde(rename = "Champion")]
    Champion,
}

impl Standing {
    pub const ALL: [Standing; 4] = [
        Standing::Elimination,
        Standing::SemiFinalist,
        Standing::Finalist,
        Standing::Champion,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Standing::Elimination => "Elimination",
            Standing::SemiFinalist => "Semi-Finalist",
            Standing::Finalist => "Finalist",
            Standing::Champion => "Champion",
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Standing {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Standing::ALL
            .into_iter()
            .find(|standing| standing.as_str() == s)
            .ok_or_else(|| UnknownToken::new("standing", s))
    }
}

/// Player level: {Low, High} x {A..G}. The absence of a level
/// ("Unassigned") is modeled as `Option<Level>::None` and stored as an
/// empty string, which is how the registry has always encoded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "Low A")]
    LowA,
    #[serde(rename = "High A")]
    HighA,
    #[serde(rename = "Low B")]
    LowB,
    #[serde(rename = "High B")]
    HighB,
    #[serde(rename = "Low C")]
    LowC,
    #[serde(rename = "High C")]
    HighC,
    #[serde(rename = "Low D")]
    LowD,
    #[serde(rename = "High D")]
    HighD,
    #[serde(rename = "Low E")]
    LowE,
    #[serde(rename = "High E")]
    HighE,
    #[serde(rename = "Low F")]
    LowF,
    #[serde(rename = "High F")]
    HighF,
    #[serde(rename = "Low G")]
    LowG,
    #[serde(rename = "High G")]
    HighG,
}

impl Level {
    /// Display order used by every level picker.
    pub const ALL: [Level; 14] = [
        Level::LowA,
        Level::HighA,
        Level::LowB,
        Level::HighB,
        Level::LowC,
        Level::HighC,
        Level::LowD,
        Level::HighD,
        Level::LowE,
        Level::HighE,
        Level::LowF,
        Level::HighF,
        Level::LowG,
        Level::HighG,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Level::LowA => "Low A",
            Level::HighA => "High A",
            Level::LowB => "Low B",
            Level::HighB => "High B",
            Level::LowC => "Low C",
            Level::HighC => "High C",
            Level::LowD => "Low D",
            Level::HighD => "High D",
            Level::LowE => "Low E",
            Level::HighE => "High E",
            Level::LowF => "Low F",
            Level::HighF => "High F",
            Level::LowG => "Low G",
            Level::HighG => "High G",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownToken::new("level", s))
    }
}

/// Human-readable form of an optional level; "Unassigned" when empty.
pub fn level_label(level: Option<Level>) -> &'static str {
    level.map(Level::as_str).unwrap_or("Unassigned")
}

/// Parse a level picker token: the empty string means "Unassigned".
pub fn parse_level(s: &str) -> Result<Option<Level>, UnknownToken> {
    if s.is_empty() {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownToken {
    pub kind: &'static str,
    pub token: String,
}

impl UnknownToken {
    fn new(kind: &'static str, token: &str) -> Self {
        Self {
            kind,
            token: token.to_string(),
        }
    }
}

impl fmt::Display for UnknownToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.token)
    }
}

impl std::error::Error for UnknownToken {}

/// Serialize `Option<Level>` as its token, `None` as `""`.
pub mod level_string {
    use super::Level;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        level: &Option<Level>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(level.map(Level::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Level>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_level(&raw).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthAddress {
    pub address: String,
    pub barangay: String,
    pub municipality: String,
    pub province: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternationalAddress {
    pub address: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_date: DateTime<Utc>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact_no: String,
    pub is_international: bool,
    #[serde(default)]
    pub birth_address: BirthAddress,
    #[serde(default)]
    pub international_address: InternationalAddress,
}

impl PersonalDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerDetails {
    #[serde(default)]
    pub club: String,
    #[serde(with = "level_string", default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUpdate {
    pub date: DateTime<Utc>,
    pub leveller: String,
    #[serde(with = "level_string", default)]
    pub new_level: Option<Level>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentJoined {
    pub tournament: String,
    pub event: String,
    pub standing: Standing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerHistory {
    #[serde(default)]
    pub level_updates: Vec<LevelUpdate>,
    #[serde(default)]
    pub tournaments_joined: Vec<TournamentJoined>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub personal_details: PersonalDetails,
    pub player_details: PlayerDetails,
    pub history: PlayerHistory,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Current level, defined as the tail of the level history.
    pub fn current_level(&self) -> Option<Level> {
        self.history
            .level_updates
            .last()
            .and_then(|update| update.new_level)
    }

    pub fn has_event(&self, event: &str) -> bool {
        self.history
            .tournaments_joined
            .iter()
            .any(|joined| joined.event == event)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub barangay: String,
    pub municipality: String,
    pub province: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentEvent {
    pub name: String,
    pub gender: EventGender,
    pub count: EventCount,
    #[serde(with = "level_string", default)]
    pub level: Option<Level>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub name: String,
    pub organizer: String,
    pub location: Location,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub events: Vec<TournamentEvent>,
    pub created_at: DateTime<Utc>,
}

/// One line of the append-only audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub created_at: DateTime<Utc>,
    pub user: Option<String>,
    pub action: String,
}

/// A stored identity-provider account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_tokens_round_trip() {
        for level in Level::ALL {
            assert_eq!(level.as_str().parse::<Level>().unwrap(), level);
        }
        assert_eq!(parse_level("").unwrap(), None);
        assert!(parse_level("Mid B").is_err());
    }

    #[test]
    fn unassigned_level_serializes_as_empty_string() {
        let details = PlayerDetails::default();
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["level"], "");

        let parsed: PlayerDetails = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.level, None);
    }

    #[test]
    fn event_gender_admits_mixed_and_non_gender() {
        assert!(EventGender::Mixed.admits(Gender::Male));
        assert!(EventGender::NonGender.admits(Gender::Female));
        assert!(!EventGender::Male.admits(Gender::Female));
    }

    #[test]
    fn standing_uses_hyphenated_semi_finalist() {
        assert_eq!(
            serde_json::to_value(Standing::SemiFinalist).unwrap(),
            "Semi-Finalist"
        );
    }
}
