mod common;

use api::gql::build_schema;
use async_graphql::Variables;
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_create_tournament_elides_blank_event_rows() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    let mutation = r#"
        mutation CreateTournament($input: TournamentFormInput!) {
            createTournament(input: $input)
        }
    "#;
    let variables = Variables::from_json(json!({
        "input": {
            "name": "Cebu Open 2024",
            "organizer": "Cebu Smashers",
            "location": { "address": "Civic Center", "province": "Cebu" },
            "start": "2024-06-08T00:00:00Z",
            "end": "2024-06-10T00:00:00Z",
            "events": [
                { "name": "WD-B", "gender": "female", "count": "doubles", "level": "Low B" },
                { "name": "", "gender": "", "count": "", "level": "" }
            ]
        }
    }));

    let response = execute_graphql(&schema, mutation, Some(variables), Some(admin_claims())).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    let id = data["createTournament"].as_str().unwrap();

    let response = execute_graphql(
        &schema,
        r#"
            query GetTournaments {
                tournaments {
                    id
                    name
                    events { name gender count level }
                }
            }
        "#,
        None,
        None,
    )
    .await;
    let data = response.data.into_json().unwrap();
    let tournaments = data["tournaments"].as_array().unwrap();
    assert_eq!(tournaments.len(), 1);
    assert_eq!(tournaments[0]["id"], id);
    let events = tournaments[0]["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["name"], "WD-B");
    assert_eq!(events[0]["gender"], "female");

    let actions = audit_actions(&schema).await;
    assert!(actions.contains(&"added new tournament, Cebu Open 2024.".to_string()));
}

#[tokio::test]
async fn test_tournament_validation_collects_all_fields() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    let mutation = r#"
        mutation CreateTournament($input: TournamentFormInput!) {
            createTournament(input: $input)
        }
    "#;
    // Name and organizer blank, dates inverted, and a half-filled event.
    let variables = Variables::from_json(json!({
        "input": {
            "name": "",
            "organizer": " ",
            "location": { "address": "", "province": "" },
            "start": "2024-06-10T00:00:00Z",
            "end": "2024-06-08T00:00:00Z",
            "events": [
                { "name": "WD-B" }
            ]
        }
    }));

    let response = execute_graphql(&schema, mutation, Some(variables), Some(admin_claims())).await;
    assert_eq!(response.errors.len(), 1);
    let error = serde_json::to_value(&response.errors[0]).unwrap();
    for field in [
        "name",
        "organizer",
        "location.address",
        "location.province",
        "end",
        "event.gender[0]",
        "event.count[0]",
        "event.level[0]",
    ] {
        assert!(
            error["extensions"][field].is_string(),
            "missing field {field}"
        );
    }

    assert!(audit_actions(&schema).await.is_empty());
}

#[tokio::test]
async fn test_tournament_update_and_remove_audit() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    let id = create_test_tournament(
        &schema,
        "Cebu Open 2024",
        "2024-06-08T00:00:00Z",
        "2024-06-10T00:00:00Z",
    )
    .await;

    let mutation = r#"
        mutation UpdateTournament($id: ID!, $input: TournamentFormInput!) {
            updateTournament(id: $id, input: $input)
        }
    "#;
    let variables = Variables::from_json(json!({
        "id": id,
        "input": {
            "name": "Cebu Invitational 2024",
            "organizer": "Cebu Smashers",
            "location": { "address": "Civic Center", "province": "Cebu" },
            "start": "2024-06-08T00:00:00Z",
            "end": "2024-06-11T00:00:00Z",
            "events": []
        }
    }));
    let response = execute_graphql(&schema, mutation, Some(variables), Some(admin_claims())).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let response = execute_graphql(
        &schema,
        r#"mutation RemoveTournament($id: ID!) { removeTournament(id: $id) }"#,
        Some(Variables::from_json(json!({ "id": id }))),
        Some(admin_claims()),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let actions = audit_actions(&schema).await;
    assert!(actions.contains(&"updated details of tournament, Cebu Invitational 2024.".to_string()));
    assert!(actions.contains(&"deleted tournament, Cebu Invitational 2024.".to_string()));
}

#[tokio::test]
async fn test_eligible_events_follow_the_gender_rule() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    // Ana is female; the tournament offers WD-B (female) and MS-A (male).
    let player_id = create_test_player(&schema, "Ana", "Cruz", "", "").await;
    let tournament_id = create_test_tournament(
        &schema,
        "Cebu Open 2024",
        "2024-06-08T00:00:00Z",
        "2024-06-10T00:00:00Z",
    )
    .await;

    let response = execute_graphql(
        &schema,
        r#"
            query Eligible($playerId: ID!, $tournamentId: ID!) {
                eligibleEvents(playerId: $playerId, tournamentId: $tournamentId) {
                    name
                }
            }
        "#,
        Some(Variables::from_json(json!({
            "playerId": player_id,
            "tournamentId": tournament_id
        }))),
        None,
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    let names: Vec<&str> = data["eligibleEvents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|event| event["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["WD-B"]);
}
