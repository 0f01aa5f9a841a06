use async_graphql::{Context, Object, Result, ID};

use crate::auth::Claims;
use crate::gql::types::{
    AuthPayload, ChangePasswordInput, LoginInput, ParticipationInput, PlayerFormInput,
    RegisterInput, TournamentFormInput, User,
};
use crate::gql::{domain_error, gql_error};
use crate::state::AppState;

pub struct MutationRoot;

fn claims<'a>(ctx: &'a Context<'_>) -> Result<&'a Claims> {
    ctx.data::<Claims>()
        .map_err(|_| async_graphql::Error::new("Authentication required"))
}

#[Object]
impl MutationRoot {
    // --- identity -------------------------------------------------------

    async fn register(&self, ctx: &Context<'_>, input: RegisterInput) -> Result<AuthPayload> {
        let state = ctx.data::<AppState>()?;
        let user = state
            .identity()
            .sign_up(&input.display_name, &input.email, &input.password)
            .await
            .map_err(gql_error)?;
        Ok(AuthPayload {
            token: user.token.clone(),
            user: User {
                id: user.id.into(),
                email: user.email,
                display_name: user.display_name,
            },
        })
    }

    async fn login(&self, ctx: &Context<'_>, input: LoginInput) -> Result<AuthPayload> {
        let state = ctx.data::<AppState>()?;
        let user = state
            .identity()
            .sign_in(&input.email, &input.password)
            .await
            .map_err(gql_error)?;
        Ok(AuthPayload {
            token: user.token.clone(),
            user: User {
                id: user.id.into(),
                email: user.email,
                display_name: user.display_name,
            },
        })
    }

    async fn logout(&self, ctx: &Context<'_>) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let actor = ctx.data::<Claims>().ok().map(|claims| claims.name.clone());
        state.identity().sign_out(actor.as_deref()).await;
        Ok(true)
    }

    /// Reauthenticate with email + password, then set the new password.
    async fn change_password(
        &self,
        ctx: &Context<'_>,
        input: ChangePasswordInput,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        let identity = state.identity();
        identity
            .reauthenticate(&input.email, &input.password)
            .await
            .map_err(gql_error)?;
        identity
            .change_password(&claims.sub, &input.new_password)
            .await
            .map_err(gql_error)?;
        Ok(true)
    }

    // --- players --------------------------------------------------------

    async fn create_player(&self, ctx: &Context<'_>, input: PlayerFormInput) -> Result<ID> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        let input = input.into_domain().map_err(domain_error)?;
        let id = state
            .players()
            .create(input, &claims.name)
            .await
            .map_err(domain_error)?;
        Ok(id.into())
    }

    async fn update_player(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: PlayerFormInput,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        let input = input.into_domain().map_err(domain_error)?;
        state
            .players()
            .update(&id, input, &claims.name)
            .await
            .map_err(domain_error)?;
        Ok(true)
    }

    async fn remove_player(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        state
            .players()
            .remove(&id, &claims.name)
            .await
            .map_err(domain_error)?;
        Ok(true)
    }

    /// Returns whether anything changed; re-selecting the current level
    /// writes and audits nothing.
    async fn change_player_level(
        &self,
        ctx: &Context<'_>,
        id: ID,
        level: Option<String>,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        let level = infra::models::parse_level(level.as_deref().unwrap_or(""))
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        let changed = state
            .players()
            .change_level(&id, level, &claims.name)
            .await
            .map_err(domain_error)?;
        Ok(changed)
    }

    async fn add_participation(
        &self,
        ctx: &Context<'_>,
        player_id: ID,
        input: ParticipationInput,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        let participation = input.into_domain().map_err(domain_error)?;
        state
            .players()
            .add_participation(&player_id, participation, &claims.name)
            .await
            .map_err(domain_error)?;
        Ok(true)
    }

    async fn remove_participation(
        &self,
        ctx: &Context<'_>,
        player_id: ID,
        index: u32,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        state
            .players()
            .remove_participation(&player_id, index as usize, &claims.name)
            .await
            .map_err(domain_error)?;
        Ok(true)
    }

    /// Atomic batch level update; returns how many players changed.
    async fn batch_set_level(
        &self,
        ctx: &Context<'_>,
        player_ids: Vec<ID>,
        level: Option<String>,
    ) -> Result<i64> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        let level = infra::models::parse_level(level.as_deref().unwrap_or(""))
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        let ids: Vec<String> = player_ids.into_iter().map(|id| id.0).collect();
        let updated = state
            .batch_leveller()
            .set_level(&ids, level, &claims.name)
            .await
            .map_err(domain_error)?;
        Ok(updated as i64)
    }

    // --- clubs ----------------------------------------------------------

    async fn create_club(&self, ctx: &Context<'_>, name: String) -> Result<ID> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        let id = state
            .clubs()
            .create(&name, &claims.name)
            .await
            .map_err(domain_error)?;
        Ok(id.into())
    }

    async fn update_club(&self, ctx: &Context<'_>, id: ID, name: String) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        state
            .clubs()
            .update(&id, &name, &claims.name)
            .await
            .map_err(domain_error)?;
        Ok(true)
    }

    async fn remove_club(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        state
            .clubs()
            .remove(&id, &claims.name)
            .await
            .map_err(domain_error)?;
        Ok(true)
    }

    // --- tournaments ----------------------------------------------------

    async fn create_tournament(
        &self,
        ctx: &Context<'_>,
        input: TournamentFormInput,
    ) -> Result<ID> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        let id = state
            .tournaments()
            .create(input.into_domain(), &claims.name)
            .await
            .map_err(domain_error)?;
        Ok(id.into())
    }

    async fn update_tournament(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: TournamentFormInput,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        state
            .tournaments()
            .update(&id, input.into_domain(), &claims.name)
            .await
            .map_err(domain_error)?;
        Ok(true)
    }

    async fn remove_tournament(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let claims = claims(ctx)?;
        state
            .tournaments()
            .remove(&id, &claims.name)
            .await
            .map_err(domain_error)?;
        Ok(true)
    }
}
