use std::time::Duration;

use async_graphql_axum::{GraphQLRequest, GraphQLResponse, GraphQLSubscription};
use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::middleware::claims_from_headers;
use crate::error::AppError;
use crate::gql::AppSchema;
use crate::state::AppState;

/// Build the Axum router with health endpoint and GraphQL.
pub fn build_router(state: AppState, schema: AppSchema) -> Router {
    let gql_ws = GraphQLSubscription::new(schema.clone());

    Router::new()
        // Simple liveness check; also proves store connectivity.
        .route("/health", get(health))
        // graphql post & subscription
        .route("/graphql", post(graphql).get_service(gql_ws))
        .layer(Extension(schema))
        // App state (store, identity, registries)
        .with_state(state)
        // Useful default middlewares
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive()) // tighten later
}

/// GraphQL over POST. A valid bearer token puts the actor's claims into
/// the request context; anonymous requests still reach the read side.
async fn graphql(
    State(state): State<AppState>,
    Extension(schema): Extension<AppSchema>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(claims) = claims_from_headers(state.jwt_service(), &headers) {
        request = request.data(claims);
    }
    schema.execute(request).await.into()
}

/// Liveness + quick store probe.
async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.store.list(infra::store::collections::CLUBS).await?;
    Ok("ok")
}
