use async_graphql::{Context, Result, Subscription};
use futures_util::{future, stream, Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use infra::store::collections;

use crate::gql::types::{ClubView, HistoryEntryView, PlayerView, TournamentView};
use crate::state::AppState;

pub struct SubscriptionRoot;

/// One tick now, then one per change to `collection`. The receiver is
/// dropped with the stream, which detaches the listener.
fn collection_ticks(state: &AppState, collection: &'static str) -> impl Stream<Item = ()> {
    let changes = BroadcastStream::new(state.store.changes())
        .filter_map(|change| future::ready(change.ok()))
        .filter_map(move |change| {
            future::ready((change.collection == collection).then_some(()))
        });
    stream::once(future::ready(())).chain(changes)
}

#[Subscription]
impl SubscriptionRoot {
    /// Live player snapshots: the current list, re-emitted on every
    /// change to the players collection.
    async fn players(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Vec<PlayerView>>> {
        let state = ctx.data::<AppState>()?.clone();
        Ok(collection_ticks(&state, collections::PLAYERS).then(move |_| {
            let state = state.clone();
            async move {
                match state.players().list().await {
                    Ok(players) => players
                        .into_iter()
                        .map(|(id, player)| PlayerView::from_doc(id, player))
                        .collect(),
                    Err(error) => {
                        tracing::warn!(%error, "players snapshot failed");
                        Vec::new()
                    }
                }
            }
        }))
    }

    async fn clubs(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Vec<ClubView>>> {
        let state = ctx.data::<AppState>()?.clone();
        Ok(collection_ticks(&state, collections::CLUBS).then(move |_| {
            let state = state.clone();
            async move {
                match state.clubs().list().await {
                    Ok(clubs) => clubs
                        .into_iter()
                        .map(|(id, club)| ClubView::from_doc(id, club))
                        .collect(),
                    Err(error) => {
                        tracing::warn!(%error, "clubs snapshot failed");
                        Vec::new()
                    }
                }
            }
        }))
    }

    async fn tournaments(
        &self,
        ctx: &Context<'_>,
    ) -> Result<impl Stream<Item = Vec<TournamentView>>> {
        let state = ctx.data::<AppState>()?.clone();
        Ok(collection_ticks(&state, collections::TOURNAMENTS).then(move |_| {
            let state = state.clone();
            async move {
                match state.tournaments().list().await {
                    Ok(tournaments) => tournaments
                        .into_iter()
                        .map(|(id, tournament)| TournamentView::from_doc(id, tournament))
                        .collect(),
                    Err(error) => {
                        tracing::warn!(%error, "tournaments snapshot failed");
                        Vec::new()
                    }
                }
            }
        }))
    }

    /// Live audit log, newest first.
    async fn history(
        &self,
        ctx: &Context<'_>,
    ) -> Result<impl Stream<Item = Vec<HistoryEntryView>>> {
        let state = ctx.data::<AppState>()?.clone();
        Ok(collection_ticks(&state, collections::HISTORY).then(move |_| {
            let state = state.clone();
            async move {
                match state.audit().entries().await {
                    Ok(entries) => entries
                        .into_iter()
                        .map(|(id, entry)| HistoryEntryView::from_doc(id, entry))
                        .collect(),
                    Err(error) => {
                        tracing::warn!(%error, "history snapshot failed");
                        Vec::new()
                    }
                }
            }
        }))
    }
}
