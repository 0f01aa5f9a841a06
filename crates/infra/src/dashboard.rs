//! Read-side derivation over the live snapshots. Everything here is a
//! pure function of its inputs and the supplied clock so the outputs are
//! reproducible.

use chrono::{DateTime, Utc};

use crate::models::{Club, Player, Tournament};

/// Month facet label, e.g. "March 2024".
pub fn month_label(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%B %Y").to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    /// Percent of players with an assigned level.
    pub with_level: f64,
    /// Percent of players in a club.
    pub with_club: f64,
    /// Percent of players with at least one participation.
    pub with_participation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Distinct month labels across all three collections, in first-seen
    /// order, for the facet picker.
    pub months: Vec<String>,
    pub player_count: usize,
    pub club_count: usize,
    pub tournament_count: usize,
    pub stats: PlayerStats,
    pub ongoing: Vec<(String, Tournament)>,
    pub upcoming: Option<(String, Tournament)>,
}

fn percent(part: usize, total: usize) -> f64 {
    // An empty registry reads as 0%, not NaN.
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn matches_facet(timestamp: DateTime<Utc>, facet: Option<&str>) -> bool {
    match facet {
        None => true,
        Some(month) => month_label(timestamp) == month,
    }
}

/// Derive the dashboard. `facet` is a month label from [`month_label`];
/// `None` means "All". Counters respect the facet; the statistics panel
/// and the tournament panels always cover the full snapshots.
pub fn derive(
    players: &[(String, Player)],
    clubs: &[(String, Club)],
    tournaments: &[(String, Tournament)],
    now: DateTime<Utc>,
    facet: Option<&str>,
) -> Dashboard {
    let mut months: Vec<String> = Vec::new();
    let mut push_month = |label: String| {
        if !months.contains(&label) {
            months.push(label);
        }
    };
    for (_, player) in players {
        push_month(month_label(player.created_at));
    }
    for (_, club) in clubs {
        push_month(month_label(club.created_at));
    }
    for (_, tournament) in tournaments {
        push_month(month_label(tournament.start));
    }

    let player_count = players
        .iter()
        .filter(|(_, player)| matches_facet(player.created_at, facet))
        .count();
    let club_count = clubs
        .iter()
        .filter(|(_, club)| matches_facet(club.created_at, facet))
        .count();
    let tournament_count = tournaments
        .iter()
        .filter(|(_, tournament)| matches_facet(tournament.start, facet))
        .count();

    let total = players.len();
    let stats = PlayerStats {
        with_level: percent(
            players
                .iter()
                .filter(|(_, player)| player.player_details.level.is_some())
                .count(),
            total,
        ),
        with_club: percent(
            players
                .iter()
                .filter(|(_, player)| !player.player_details.club.is_empty())
                .count(),
            total,
        ),
        with_participation: percent(
            players
                .iter()
                .filter(|(_, player)| !player.history.tournaments_joined.is_empty())
                .count(),
            total,
        ),
    };

    let ongoing: Vec<(String, Tournament)> = tournaments
        .iter()
        .filter(|(_, tournament)| tournament.start <= now && now <= tournament.end)
        .cloned()
        .collect();

    let upcoming = tournaments
        .iter()
        .filter(|(_, tournament)| tournament.start > now)
        .min_by_key(|(_, tournament)| tournament.start)
        .cloned();

    Dashboard {
        months,
        player_count,
        club_count,
        tournament_count,
        stats,
        ongoing,
        upcoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;
    use chrono::Duration;

    fn tournament(name: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Tournament {
        Tournament {
            name: name.to_string(),
            organizer: "org".to_string(),
            location: Location::default(),
            start,
            end,
            events: Vec::new(),
            created_at: start,
        }
    }

    #[test]
    fn ongoing_and_upcoming_selection() {
        let now: DateTime<Utc> = "2024-05-15T12:00:00Z".parse().unwrap();
        let t1 = tournament("T1", now - Duration::days(2), now + Duration::days(2));
        let t2 = tournament("T2", now + Duration::days(5), now + Duration::days(6));
        let t3 = tournament("T3", now - Duration::days(10), now - Duration::days(9));
        let tournaments = vec![
            ("1".to_string(), t1),
            ("2".to_string(), t2),
            ("3".to_string(), t3),
        ];

        let dashboard = derive(&[], &[], &tournaments, now, None);
        let ongoing: Vec<&str> = dashboard
            .ongoing
            .iter()
            .map(|(_, t)| t.name.as_str())
            .collect();
        assert_eq!(ongoing, vec!["T1"]);
        assert_eq!(dashboard.upcoming.unwrap().1.name, "T2");
    }

    #[test]
    fn no_players_means_zero_percent() {
        let now = Utc::now();
        let dashboard = derive(&[], &[], &[], now, None);
        assert_eq!(dashboard.stats.with_level, 0.0);
        assert_eq!(dashboard.stats.with_club, 0.0);
        assert_eq!(dashboard.stats.with_participation, 0.0);
    }

    #[test]
    fn facet_filters_tournaments_by_start_month() {
        let now: DateTime<Utc> = "2024-05-15T12:00:00Z".parse().unwrap();
        let may = tournament("May", now, now + Duration::days(1));
        let june = tournament(
            "June",
            "2024-06-02T00:00:00Z".parse().unwrap(),
            "2024-06-03T00:00:00Z".parse().unwrap(),
        );
        let tournaments = vec![("1".to_string(), may), ("2".to_string(), june)];

        let dashboard = derive(&[], &[], &tournaments, now, Some("June 2024"));
        assert_eq!(dashboard.tournament_count, 1);
        assert_eq!(dashboard.months, vec!["May 2024", "June 2024"]);
    }
}
