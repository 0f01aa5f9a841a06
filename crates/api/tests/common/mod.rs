use std::sync::Arc;

use async_graphql::{Request, Variables};
use serde_json::json;

use api::auth::Claims;
use api::gql::AppSchema;
use api::AppState;
use infra::store::MemoryStore;

/// Fresh state over the in-memory store; every test gets its own world.
pub fn setup_test_state() -> AppState {
    let store = Arc::new(MemoryStore::new());
    AppState::new(store).expect("Failed to create AppState")
}

/// Helper function to execute GraphQL queries and mutations
pub async fn execute_graphql(
    schema: &AppSchema,
    query: &str,
    variables: Option<Variables>,
    auth_claims: Option<Claims>,
) -> async_graphql::Response {
    let mut request = Request::new(query);

    if let Some(vars) = variables {
        request = request.variables(vars);
    }

    if let Some(claims) = auth_claims {
        request = request.data(claims);
    }

    schema.execute(request).await
}

/// Claims for the standing test operator, bypassing the login flow.
pub fn admin_claims() -> Claims {
    Claims {
        sub: "test-admin".to_string(),
        email: "admin@example.com".to_string(),
        name: "admin".to_string(),
        iat: chrono::Utc::now().timestamp(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
    }
}

/// Create a test player through the API and return its id.
#[allow(dead_code)]
pub async fn create_test_player(
    schema: &AppSchema,
    first_name: &str,
    last_name: &str,
    club: &str,
    level: &str,
) -> String {
    let mutation = r#"
        mutation CreatePlayer($input: PlayerFormInput!) {
            createPlayer(input: $input)
        }
    "#;

    let variables = Variables::from_json(json!({
        "input": {
            "personalDetails": {
                "firstName": first_name,
                "lastName": last_name,
                "gender": "female",
                "birthDate": "2000-01-01T00:00:00Z",
                "isInternational": false,
                "birthAddress": { "address": "1 St", "province": "Cebu" }
            },
            "playerDetails": { "club": club, "level": level }
        }
    }));

    let response = execute_graphql(schema, mutation, Some(variables), Some(admin_claims())).await;
    assert!(
        response.errors.is_empty(),
        "createPlayer should succeed: {:?}",
        response.errors
    );
    let data = response.data.into_json().unwrap();
    data["createPlayer"].as_str().unwrap().to_string()
}

/// Create a test tournament with one doubles and one singles event.
#[allow(dead_code)]
pub async fn create_test_tournament(
    schema: &AppSchema,
    name: &str,
    start: &str,
    end: &str,
) -> String {
    let mutation = r#"
        mutation CreateTournament($input: TournamentFormInput!) {
            createTournament(input: $input)
        }
    "#;

    let variables = Variables::from_json(json!({
        "input": {
            "name": name,
            "organizer": "Test Org",
            "location": { "address": "Civic Center", "province": "Cebu" },
            "start": start,
            "end": end,
            "events": [
                { "name": "WD-B", "gender": "female", "count": "doubles", "level": "Low B" },
                { "name": "MS-A", "gender": "male", "count": "singles", "level": "Low A" }
            ]
        }
    }));

    let response = execute_graphql(schema, mutation, Some(variables), Some(admin_claims())).await;
    assert!(
        response.errors.is_empty(),
        "createTournament should succeed: {:?}",
        response.errors
    );
    let data = response.data.into_json().unwrap();
    data["createTournament"].as_str().unwrap().to_string()
}

/// All audit log action sentences, newest first.
#[allow(dead_code)]
pub async fn audit_actions(schema: &AppSchema) -> Vec<String> {
    let response = execute_graphql(schema, "query { history { action } }", None, None).await;
    assert!(
        response.errors.is_empty(),
        "history query should succeed: {:?}",
        response.errors
    );
    let data = response.data.into_json().unwrap();
    data["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["action"].as_str().unwrap().to_string())
        .collect()
}
