mod common;

use api::gql::build_schema;
use async_graphql::Variables;
use chrono::{Duration, SecondsFormat, Utc};
use common::*;
use serde_json::json;

fn iso(offset_days: i64) -> String {
    (Utc::now() + Duration::days(offset_days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[tokio::test]
async fn test_ongoing_and_upcoming_selection() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    // T1 runs now, T2 starts in 5 days, T3 is long over.
    create_test_tournament(&schema, "T1", &iso(-2), &iso(2)).await;
    create_test_tournament(&schema, "T2", &iso(5), &iso(6)).await;
    create_test_tournament(&schema, "T3", &iso(-10), &iso(-9)).await;

    let response = execute_graphql(
        &schema,
        r#"
            query {
                dashboard {
                    tournamentCount
                    ongoing { name }
                    upcoming { name }
                }
            }
        "#,
        None,
        None,
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    let dashboard = &data["dashboard"];

    assert_eq!(dashboard["tournamentCount"], 3);
    let ongoing: Vec<&str> = dashboard["ongoing"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(ongoing, vec!["T1"]);
    assert_eq!(dashboard["upcoming"]["name"], "T2");
}

#[tokio::test]
async fn test_player_statistics_percentages() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    // Two players: one levelled and in a club, one with neither.
    create_test_player(&schema, "Ana", "Cruz", "Smash", "Low B").await;
    create_test_player(&schema, "Bea", "Reyes", "", "").await;

    let response = execute_graphql(
        &schema,
        r#"
            query {
                dashboard {
                    playerCount
                    clubCount
                    stats { withLevel withClub withParticipation }
                }
            }
        "#,
        None,
        None,
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    let dashboard = &data["dashboard"];
    assert_eq!(dashboard["playerCount"], 2);
    assert_eq!(dashboard["clubCount"], 1);
    assert_eq!(dashboard["stats"]["withLevel"], 50.0);
    assert_eq!(dashboard["stats"]["withClub"], 50.0);
    assert_eq!(dashboard["stats"]["withParticipation"], 0.0);
}

#[tokio::test]
async fn test_empty_registry_renders_zero_percent() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    let response = execute_graphql(
        &schema,
        r#"
            query {
                dashboard {
                    playerCount
                    stats { withLevel withClub withParticipation }
                }
            }
        "#,
        None,
        None,
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    let dashboard = &data["dashboard"];
    assert_eq!(dashboard["playerCount"], 0);
    assert_eq!(dashboard["stats"]["withLevel"], 0.0);
    assert_eq!(dashboard["stats"]["withClub"], 0.0);
    assert_eq!(dashboard["stats"]["withParticipation"], 0.0);
}

#[tokio::test]
async fn test_month_facet_filters_counters() {
    let state = setup_test_state();
    let schema = build_schema(state.clone());

    create_test_player(&schema, "Ana", "Cruz", "", "").await;
    let this_month = Utc::now().format("%B %Y").to_string();

    let response = execute_graphql(
        &schema,
        r#"
            query Dashboard($month: String) {
                dashboard(month: $month) {
                    months
                    playerCount
                }
            }
        "#,
        Some(Variables::from_json(json!({ "month": this_month }))),
        None,
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["dashboard"]["playerCount"], 1);
    assert!(data["dashboard"]["months"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m.as_str() == Some(this_month.as_str())));

    // A month nobody touched counts nothing.
    let response = execute_graphql(
        &schema,
        r#"
            query {
                dashboard(month: "January 1970") {
                    playerCount
                }
            }
        "#,
        None,
        None,
    )
    .await;
    let data = response.data.into_json().unwrap();
    assert_eq!(data["dashboard"]["playerCount"], 0);
}
