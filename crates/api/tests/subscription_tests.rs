mod common;

use api::gql::build_schema;
use async_graphql::Request;
use common::*;
use futures_util::StreamExt;

#[tokio::test]
async fn test_clubs_subscription_emits_snapshots_on_change() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    let mut stream = schema.execute_stream(Request::new(
        "subscription { clubs { name } }",
    ));

    // Initial snapshot: empty.
    let response = stream.next().await.unwrap();
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert!(data["clubs"].as_array().unwrap().is_empty());

    let response = execute_graphql(
        &schema,
        r#"mutation { createClub(name: "Smash") }"#,
        None,
        Some(admin_claims()),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    // The write wakes the subscription with a fresh snapshot. The club
    // create also appends an audit record, so more than one tick may
    // arrive; wait for the one that carries the club.
    loop {
        let response = stream.next().await.expect("subscription stays open");
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        let clubs = data["clubs"].as_array().unwrap().clone();
        if !clubs.is_empty() {
            assert_eq!(clubs[0]["name"], "Smash");
            break;
        }
    }
}

#[tokio::test]
async fn test_players_subscription_sees_new_players() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    let mut stream = schema.execute_stream(Request::new(
        "subscription { players { personalDetails { firstName } } }",
    ));

    let response = stream.next().await.unwrap();
    let data = response.data.into_json().unwrap();
    assert!(data["players"].as_array().unwrap().is_empty());

    create_test_player(&schema, "Ana", "Cruz", "", "").await;

    loop {
        let response = stream.next().await.expect("subscription stays open");
        let data = response.data.into_json().unwrap();
        let players = data["players"].as_array().unwrap().clone();
        if !players.is_empty() {
            assert_eq!(players[0]["personalDetails"]["firstName"], "Ana");
            break;
        }
    }
}
