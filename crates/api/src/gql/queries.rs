use async_graphql::{Context, Object, Result, ID};
use chrono::{DateTime, Utc};

use infra::models::Gender;
use infra::{dashboard, ops, refdata};

use crate::gql::types::{
    ClubView, DashboardView, EventView, HistoryEntryView, OptionsView, PlayerStatsView,
    PlayerView, TournamentView,
};
use crate::gql::{domain_error, gql_error};
use crate::state::AppState;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Simple ping to test the API.
    async fn hello(&self) -> String {
        "Hello, badminton registry!".to_string()
    }

    /// Current server time (UTC), example of returning chrono types.
    async fn server_time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn players(&self, ctx: &Context<'_>) -> Result<Vec<PlayerView>> {
        let state = ctx.data::<AppState>()?;
        let players = state.players().list().await.map_err(|e| gql_error(e.into()))?;
        Ok(players
            .into_iter()
            .map(|(id, player)| PlayerView::from_doc(id, player))
            .collect())
    }

    async fn player(&self, ctx: &Context<'_>, id: ID) -> Result<PlayerView> {
        let state = ctx.data::<AppState>()?;
        let player = state.players().get(&id).await.map_err(domain_error)?;
        Ok(PlayerView::from_doc(id.to_string(), player))
    }

    async fn clubs(&self, ctx: &Context<'_>) -> Result<Vec<ClubView>> {
        let state = ctx.data::<AppState>()?;
        let clubs = state.clubs().list().await.map_err(|e| gql_error(e.into()))?;
        Ok(clubs
            .into_iter()
            .map(|(id, club)| ClubView::from_doc(id, club))
            .collect())
    }

    async fn tournaments(&self, ctx: &Context<'_>) -> Result<Vec<TournamentView>> {
        let state = ctx.data::<AppState>()?;
        let tournaments = state
            .tournaments()
            .list()
            .await
            .map_err(|e| gql_error(e.into()))?;
        Ok(tournaments
            .into_iter()
            .map(|(id, tournament)| TournamentView::from_doc(id, tournament))
            .collect())
    }

    /// Audit log, newest first.
    async fn history(&self, ctx: &Context<'_>) -> Result<Vec<HistoryEntryView>> {
        let state = ctx.data::<AppState>()?;
        let entries = state.audit().entries().await.map_err(|e| gql_error(e.into()))?;
        Ok(entries
            .into_iter()
            .map(|(id, entry)| HistoryEntryView::from_doc(id, entry))
            .collect())
    }

    /// Derived dashboard. `month` is a facet label such as "March 2024";
    /// absent means "All".
    async fn dashboard(&self, ctx: &Context<'_>, month: Option<String>) -> Result<DashboardView> {
        let state = ctx.data::<AppState>()?;
        let players = state.players().list().await.map_err(|e| gql_error(e.into()))?;
        let clubs = state.clubs().list().await.map_err(|e| gql_error(e.into()))?;
        let tournaments = state
            .tournaments()
            .list()
            .await
            .map_err(|e| gql_error(e.into()))?;

        let facet = month.as_deref().filter(|label| !label.is_empty());
        let derived = dashboard::derive(&players, &clubs, &tournaments, Utc::now(), facet);

        Ok(DashboardView {
            months: derived.months,
            player_count: derived.player_count as i64,
            club_count: derived.club_count as i64,
            tournament_count: derived.tournament_count as i64,
            stats: PlayerStatsView {
                with_level: derived.stats.with_level,
                with_club: derived.stats.with_club,
                with_participation: derived.stats.with_participation,
            },
            ongoing: derived
                .ongoing
                .into_iter()
                .map(|(id, tournament)| TournamentView::from_doc(id, tournament))
                .collect(),
            upcoming: derived
                .upcoming
                .map(|(id, tournament)| TournamentView::from_doc(id, tournament)),
        })
    }

    /// Closed option lists for the pickers.
    async fn options(&self) -> OptionsView {
        OptionsView {
            levels: refdata::levels().iter().map(|s| s.to_string()).collect(),
            standings: refdata::standings().iter().map(|s| s.to_string()).collect(),
            genders: vec!["male".to_string(), "female".to_string()],
            event_genders: vec![
                "male".to_string(),
                "female".to_string(),
                "mixed".to_string(),
                "non-gender".to_string(),
            ],
            event_counts: vec!["singles".to_string(), "doubles".to_string()],
        }
    }

    async fn provinces(&self) -> Vec<String> {
        refdata::ReferenceData::global().provinces().to_vec()
    }

    async fn municipalities(&self, province: String) -> Vec<String> {
        refdata::ReferenceData::global()
            .municipalities_of(&province)
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    async fn barangays(&self, municipality: String) -> Vec<String> {
        refdata::ReferenceData::global()
            .barangays_of(&municipality)
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    async fn countries(&self) -> Vec<String> {
        refdata::ReferenceData::global().countries().to_vec()
    }

    /// Events of a tournament the player may enter, by gender rule.
    async fn eligible_events(
        &self,
        ctx: &Context<'_>,
        player_id: ID,
        tournament_id: ID,
    ) -> Result<Vec<EventView>> {
        let state = ctx.data::<AppState>()?;
        let player = state.players().get(&player_id).await.map_err(domain_error)?;
        let tournament = state
            .tournaments()
            .get(&tournament_id)
            .await
            .map_err(domain_error)?;
        let gender: Gender = player.personal_details.gender;
        Ok(ops::eligible_events(&tournament, gender)
            .into_iter()
            .map(EventView::from)
            .collect())
    }

    /// Doubles-partner candidates for the picker: excludes the player,
    /// holders of the event, and players already taken for it.
    async fn partner_candidates(
        &self,
        ctx: &Context<'_>,
        player_id: ID,
        event: String,
    ) -> Result<Vec<PlayerView>> {
        let state = ctx.data::<AppState>()?;
        let candidates = state
            .players()
            .partner_candidates(&player_id, &event)
            .await
            .map_err(|e| gql_error(e.into()))?;
        Ok(candidates
            .into_iter()
            .map(|(id, player)| PlayerView::from_doc(id, player))
            .collect())
    }
}
