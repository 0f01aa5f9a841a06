mod common;

use api::gql::build_schema;
use async_graphql::Variables;
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_club_crud_and_ordering() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    for name in ["Smash", "Drive", "Net Kings"] {
        let response = execute_graphql(
            &schema,
            r#"mutation CreateClub($name: String!) { createClub(name: $name) }"#,
            Some(Variables::from_json(json!({ "name": name }))),
            Some(admin_claims()),
        )
        .await;
        assert!(
            response.errors.is_empty(),
            "createClub should succeed: {:?}",
            response.errors
        );
    }

    let response = execute_graphql(&schema, "query { clubs { id name } }", None, None).await;
    assert!(response.errors.is_empty());
    let data = response.data.into_json().unwrap();
    let names: Vec<&str> = data["clubs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|club| club["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Drive", "Net Kings", "Smash"]);

    let actions = audit_actions(&schema).await;
    assert!(actions.contains(&"added new club, Smash.".to_string()));
}

#[tokio::test]
async fn test_club_update_and_remove_audit() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    let response = execute_graphql(
        &schema,
        r#"mutation { createClub(name: "Smash") }"#,
        None,
        Some(admin_claims()),
    )
    .await;
    let data = response.data.into_json().unwrap();
    let id = data["createClub"].as_str().unwrap().to_string();

    let response = execute_graphql(
        &schema,
        r#"mutation UpdateClub($id: ID!) { updateClub(id: $id, name: "Smashers") }"#,
        Some(Variables::from_json(json!({ "id": id }))),
        Some(admin_claims()),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let response = execute_graphql(
        &schema,
        r#"mutation RemoveClub($id: ID!) { removeClub(id: $id) }"#,
        Some(Variables::from_json(json!({ "id": id }))),
        Some(admin_claims()),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let actions = audit_actions(&schema).await;
    assert!(actions.contains(&"updated details of club, Smashers.".to_string()));
    assert!(actions.contains(&"deleted club, Smashers.".to_string()));

    let response = execute_graphql(&schema, "query { clubs { id } }", None, None).await;
    let data = response.data.into_json().unwrap();
    assert!(data["clubs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_club_name_is_rejected_per_field() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    let response = execute_graphql(
        &schema,
        r#"mutation { createClub(name: "   ") }"#,
        None,
        Some(admin_claims()),
    )
    .await;
    assert_eq!(response.errors.len(), 1);
    let error = serde_json::to_value(&response.errors[0]).unwrap();
    assert_eq!(error["extensions"]["name"], "This field is required.");

    // Nothing written, nothing audited.
    assert!(audit_actions(&schema).await.is_empty());
}

#[tokio::test]
async fn test_club_mutations_require_auth() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    let response = execute_graphql(
        &schema,
        r#"mutation { createClub(name: "Smash") }"#,
        None,
        None,
    )
    .await;
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "Authentication required");
}
