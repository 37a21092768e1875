use super::models::{EXPIRY_WINDOW_DAYS, is_critical, is_expiring_soon};
use crate::config::test_helpers::setup_test_app;
use crate::test_helpers::{
    create_test_reagent, create_test_reagent_with_params, decimal_of, get_json, post_movement,
    send_json,
};
use axum::http::StatusCode;
use chrono::{Duration, NaiveDate, Utc};
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use uuid::Uuid;

fn d(value: i64) -> Decimal {
    Decimal::from(value)
}

fn contains_id(list: &Value, id: &str) -> bool {
    list.as_array()
        .is_some_and(|items| items.iter().any(|item| item["id"] == id))
}

#[rstest]
#[case::below_threshold(d(50), d(100), true)]
#[case::at_threshold(d(100), d(100), true)]
#[case::above_threshold(d(101), d(100), false)]
#[case::empty_with_zero_threshold(d(0), d(0), true)]
#[case::negative_stock(d(-3), d(0), true)]
#[case::fractional(Decimal::new(1001, 1), d(100), false)]
fn test_is_critical(#[case] on_hand: Decimal, #[case] min_threshold: Decimal, #[case] expected: bool) {
    assert_eq!(is_critical(on_hand, min_threshold), expected);
    // Repeated evaluation is stable
    assert_eq!(is_critical(on_hand, min_threshold), expected);
}

#[rstest]
#[case::in_fifteen_days(Some(15), true)]
#[case::today(Some(0), true)]
#[case::window_edge(Some(EXPIRY_WINDOW_DAYS), true)]
#[case::just_outside(Some(EXPIRY_WINDOW_DAYS + 1), false)]
#[case::in_forty_five_days(Some(45), false)]
#[case::already_expired(Some(-1), false)]
#[case::no_expiry(None, false)]
fn test_is_expiring_soon(#[case] days_ahead: Option<i64>, #[case] expected: bool) {
    let reference = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let expiry = days_ahead.map(|days| reference + Duration::days(days));
    assert_eq!(is_expiring_soon(expiry, reference), expected);
}

#[tokio::test]
async fn test_reagent_crud_operations() {
    let app = setup_test_app().await;
    let name = format!("PBS {}", Uuid::new_v4());

    let (reagent_id, created) = create_test_reagent_with_params(&app, &name, "1000", "100", None)
        .await
        .unwrap();
    assert_eq!(created["name"], name);
    assert_eq!(created["category"], "chemical");
    assert_eq!(decimal_of(&created["on_hand"]), d(1000));
    assert_eq!(created["is_critical"], false);
    assert_eq!(created["is_expiring_soon"], false);

    let (status, fetched) = get_json(&app, &format!("/api/reagents/{reagent_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], reagent_id);

    let (status, updated) = send_json(
        &app,
        "PUT",
        &format!("/api/reagents/{reagent_id}"),
        Some(json!({"min_threshold": "2000", "external_link": "https://supplier.example/pbs"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Failed to update reagent: {updated:?}");
    assert_eq!(decimal_of(&updated["min_threshold"]), d(2000));
    assert_eq!(updated["is_critical"], true);

    let (status, list) = get_json(&app, "/api/reagents").await;
    assert_eq!(status, StatusCode::OK);
    assert!(contains_id(&list, &reagent_id));

    let (status, _) = send_json(&app, "DELETE", &format!("/api/reagents/{reagent_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get_json(&app, &format!("/api/reagents/{reagent_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_fbs_below_threshold_is_critical() {
    let app = setup_test_app().await;
    let (reagent_id, created) = create_test_reagent_with_params(&app, "FBS", "50", "100", None)
        .await
        .unwrap();
    assert_eq!(created["is_critical"], true);

    let (status, critical) = get_json(&app, "/api/reagents/critical").await;
    assert_eq!(status, StatusCode::OK);
    assert!(contains_id(&critical, &reagent_id));
}

#[tokio::test]
async fn test_stock_cannot_be_edited_directly() {
    let app = setup_test_app().await;
    let (reagent_id, _) = create_test_reagent_with_params(&app, "Locked", "10", "0", None)
        .await
        .unwrap();

    let (_, updated) = send_json(
        &app,
        "PUT",
        &format!("/api/reagents/{reagent_id}"),
        Some(json!({"on_hand": "9999", "name": "Renamed"})),
    )
    .await;

    let (_, fetched) = get_json(&app, &format!("/api/reagents/{reagent_id}")).await;
    assert_eq!(decimal_of(&fetched["on_hand"]), d(10), "on_hand changed via update: {updated:?}");
}

#[rstest]
#[case::negative_stock("-1", "0", "on_hand")]
#[case::negative_threshold("1", "-1", "min_threshold")]
#[case::sub_cent_threshold("1", "0.005", "min_threshold")]
#[tokio::test]
async fn test_create_rejects_invalid_amounts(
    #[case] on_hand: &str,
    #[case] min_threshold: &str,
    #[case] field: &str,
) {
    let app = setup_test_app().await;
    let name = format!("Invalid amounts {}", Uuid::new_v4());

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/reagents",
        Some(json!({
            "name": name,
            "category": "chemical",
            "on_hand": on_hand,
            "min_threshold": min_threshold,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "Unexpected response: {body:?}");
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains(field));

    let (_, list) = get_json(&app, "/api/reagents").await;
    assert!(
        !list
            .as_array()
            .unwrap()
            .iter()
            .any(|item| item["name"] == name.as_str())
    );
}

#[tokio::test]
async fn test_update_rejects_negative_threshold() {
    let app = setup_test_app().await;
    let (reagent_id, _) = create_test_reagent(&app).await.unwrap();
    let uri = format!("/api/reagents/{reagent_id}");

    let (status, body) =
        send_json(&app, "PUT", &uri, Some(json!({"min_threshold": "-10"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "Unexpected response: {body:?}");
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("min_threshold"));

    let (status, _) = send_json(&app, "PUT", &uri, Some(json!({"min_threshold": null}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, fetched) = get_json(&app, &uri).await;
    assert_eq!(decimal_of(&fetched["min_threshold"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_expiry_flags_and_expiring_listing() {
    let app = setup_test_app().await;
    let today = Utc::now().date_naive();
    let soon = (today + Duration::days(15)).to_string();
    let later = (today + Duration::days(45)).to_string();

    let (soon_id, soon_body) = create_test_reagent_with_params(&app, "Soon", "5", "0", Some(&soon))
        .await
        .unwrap();
    let (later_id, later_body) =
        create_test_reagent_with_params(&app, "Later", "5", "0", Some(&later))
            .await
            .unwrap();
    let (never_id, never_body) = create_test_reagent_with_params(&app, "Never", "5", "0", None)
        .await
        .unwrap();

    assert_eq!(soon_body["is_expiring_soon"], true);
    assert_eq!(later_body["is_expiring_soon"], false);
    assert_eq!(never_body["is_expiring_soon"], false);

    let (status, expiring) = get_json(&app, "/api/reagents/expiring").await;
    assert_eq!(status, StatusCode::OK);
    assert!(contains_id(&expiring, &soon_id));
    assert!(!contains_id(&expiring, &later_id));
    assert!(!contains_id(&expiring, &never_id));
    assert!(
        expiring
            .as_array()
            .unwrap()
            .iter()
            .all(|item| item["is_expiring_soon"] == true)
    );
}

#[tokio::test]
async fn test_active_listing_tracks_stock() {
    let app = setup_test_app().await;
    let (stocked_id, _) = create_test_reagent_with_params(&app, "Stocked", "3", "0", None)
        .await
        .unwrap();
    let (empty_id, _) = create_test_reagent(&app).await.unwrap();

    let (status, active) = get_json(&app, "/api/reagents/active").await;
    assert_eq!(status, StatusCode::OK);
    assert!(contains_id(&active, &stocked_id));
    assert!(!contains_id(&active, &empty_id));

    let (status, _) = post_movement(&app, &stocked_id, "3", "out", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, active) = get_json(&app, "/api/reagents/active").await;
    assert!(!contains_id(&active, &stocked_id));
}

#[tokio::test]
async fn test_reagent_movement_history_route() {
    let app = setup_test_app().await;
    let (reagent_id, _) = create_test_reagent_with_params(&app, "History", "10", "0", None)
        .await
        .unwrap();
    post_movement(&app, &reagent_id, "4", "out", None).await;

    let (status, history) = get_json(&app, &format!("/api/reagents/{reagent_id}/movements")).await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|m| m["reagent_id"] == reagent_id.as_str()));

    let (status, _) = get_json(&app, &format!("/api/reagents/{}/movements", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
