mod common;

use api::gql::build_schema;
use async_graphql::Variables;
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_batch_level_update_of_three_players() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    let p1 = create_test_player(&schema, "Ana", "Cruz", "", "Low A").await;
    let p2 = create_test_player(&schema, "Bea", "Reyes", "", "High A").await;
    let p3 = create_test_player(&schema, "Cara", "Uy", "", "").await;

    let before = audit_actions(&schema).await.len();

    let response = execute_graphql(
        &schema,
        r#"
            mutation Batch($ids: [ID!]!, $level: String) {
                batchSetLevel(playerIds: $ids, level: $level)
            }
        "#,
        Some(Variables::from_json(
            json!({ "ids": [p1, p2, p3], "level": "Low B" }),
        )),
        Some(admin_claims()),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["batchSetLevel"], 3);

    let response = execute_graphql(
        &schema,
        r#"
            query {
                players {
                    playerDetails { level }
                    history { levelUpdates { newLevel } }
                }
            }
        "#,
        None,
        None,
    )
    .await;
    let data = response.data.into_json().unwrap();
    for player in data["players"].as_array().unwrap() {
        assert_eq!(player["playerDetails"]["level"], "Low B");
        let updates = player["history"]["levelUpdates"].as_array().unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates.last().unwrap()["newLevel"], "Low B");
    }

    // Three per-player transitions plus the summary record.
    let actions = audit_actions(&schema).await;
    assert_eq!(actions.len(), before + 4);
    assert!(actions.contains(&"updated player level of Ana Cruz from Low A to Low B.".to_string()));
    assert!(
        actions.contains(&"updated player level of Bea Reyes from High A to Low B.".to_string())
    );
    assert!(
        actions.contains(&"updated player level of Cara Uy from Unassigned to Low B.".to_string())
    );
    assert!(actions.contains(&"batch updated of 3 players levels to Low B".to_string()));
}

#[tokio::test]
async fn test_batch_deduplicates_and_empty_is_a_no_op() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    let p1 = create_test_player(&schema, "Ana", "Cruz", "", "").await;
    let before = audit_actions(&schema).await.len();

    let response = execute_graphql(
        &schema,
        r#"
            mutation Batch($ids: [ID!]!, $level: String) {
                batchSetLevel(playerIds: $ids, level: $level)
            }
        "#,
        Some(Variables::from_json(
            json!({ "ids": [p1, p1, p1], "level": "Low C" }),
        )),
        Some(admin_claims()),
    )
    .await;
    let data = response.data.into_json().unwrap();
    assert_eq!(data["batchSetLevel"], 1);
    assert!(audit_actions(&schema)
        .await
        .contains(&"batch updated of 1 players levels to Low C".to_string()));

    let after_first = audit_actions(&schema).await.len();
    assert_eq!(after_first, before + 2);

    let response = execute_graphql(
        &schema,
        r#"
            mutation {
                batchSetLevel(playerIds: [], level: "Low C")
            }
        "#,
        None,
        Some(admin_claims()),
    )
    .await;
    let data = response.data.into_json().unwrap();
    assert_eq!(data["batchSetLevel"], 0);
    assert_eq!(audit_actions(&schema).await.len(), after_first);
}
