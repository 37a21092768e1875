use super::models::CalendarQuery;
use super::services;
use crate::config::test_helpers::{setup_test_app, setup_test_app_with_db};
use crate::test_helpers::{create_test_user, get_json, send_json};
use axum::http::StatusCode;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

fn at(day: u32, hour: u32) -> String {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0)
        .unwrap()
        .to_rfc3339()
}

async fn create_event(app: &axum::Router, payload: Value) -> (StatusCode, Value) {
    send_json(app, "POST", "/api/calendar_events", Some(payload)).await
}

async fn event_with(
    app: &axum::Router,
    subject: &str,
    start: String,
    organizer_id: Option<&str>,
    participant_ids: &[&str],
) -> String {
    let (status, body) = create_event(
        app,
        json!({
            "subject": subject,
            "start_datetime": start,
            "organizer_id": organizer_id,
            "participant_ids": participant_ids,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create event: {body:?}");
    body["id"].as_str().unwrap().to_string()
}

fn subjects(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .filter_map(|event| event["subject"].as_str())
        .collect()
}

#[tokio::test]
async fn test_calendar_event_crud_operations() {
    let app = setup_test_app().await;
    let (organizer, _) = create_test_user(&app, "employee").await.unwrap();
    let (guest, _) = create_test_user(&app, "employee").await.unwrap();

    let (status, created) = create_event(
        &app,
        json!({
            "subject": "Lab meeting",
            "start_datetime": at(10, 9),
            "end_datetime": at(10, 10),
            "organizer_id": organizer,
            "location": "Room 2.14",
            "participant_ids": [guest, guest],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create event: {created:?}");
    assert_eq!(created["location"], "Room 2.14");
    assert_eq!(created["participant_ids"], json!([guest]));

    let uri = format!("/api/calendar_events/{}", created["id"].as_str().unwrap());
    let (status, updated) =
        send_json(&app, "PUT", &uri, Some(json!({"subject": "Journal club"}))).await;
    assert_eq!(status, StatusCode::OK, "Failed to update event: {updated:?}");
    assert_eq!(updated["subject"], "Journal club");
    assert_eq!(updated["participant_ids"], json!([guest]));

    let (status, fetched) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["organizer_id"], organizer);
    assert_eq!(fetched["participant_ids"], json!([guest]));

    let (status, _) = send_json(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_calendar_event_validation() {
    let app = setup_test_app().await;

    let (status, body) = create_event(
        &app,
        json!({"subject": " ", "start_datetime": at(10, 9), "participant_ids": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("subject"));

    let (status, body) = create_event(
        &app,
        json!({
            "subject": "Backwards",
            "start_datetime": at(10, 9),
            "end_datetime": at(10, 8),
            "participant_ids": [],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("end_datetime"));

    let id = event_with(&app, "Seminar", at(12, 14), None, &[]).await;
    let uri = format!("/api/calendar_events/{id}");

    // The existing start is checked against a new end
    let (status, _) = send_json(&app, "PUT", &uri, Some(json!({"end_datetime": at(12, 13)}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send_json(&app, "PUT", &uri, Some(json!({"end_datetime": at(12, 15)}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send_json(&app, "PUT", &uri, Some(json!({"start_datetime": at(12, 16)}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_calendar_references_must_exist() {
    let app = setup_test_app().await;
    let missing = Uuid::new_v4();

    let (status, _) = create_event(
        &app,
        json!({"subject": "Ghost host", "start_datetime": at(5, 9), "organizer_id": missing, "participant_ids": []}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = create_event(
        &app,
        json!({"subject": "Ghost guest", "start_datetime": at(5, 9), "participant_ids": [missing]}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = get_json(&app, "/api/calendar_events").await;
    let listed = subjects(&list);
    assert!(!listed.contains(&"Ghost host"));
    assert!(!listed.contains(&"Ghost guest"));
}

#[tokio::test]
async fn test_date_filters_include_the_whole_end_day() {
    let (app, db) = setup_test_app_with_db().await;
    event_with(&app, "Before", at(1, 23), None, &[]).await;
    event_with(&app, "Early", at(2, 0), None, &[]).await;
    event_with(&app, "Late", at(3, 23), None, &[]).await;
    event_with(&app, "After", at(4, 0), None, &[]).await;

    let (status, list) = get_json(
        &app,
        "/api/calendar_events?start_date=2025-03-02&end_date=2025-03-03",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subjects(&list), vec!["Early", "Late"]);

    let (_, from) = get_json(&app, "/api/calendar_events?start_date=2025-03-03").await;
    assert!(subjects(&from).starts_with(&["Late", "After"]));

    let query = CalendarQuery {
        end_date: NaiveDate::from_ymd_opt(2025, 3, 1),
        start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
        ..CalendarQuery::default()
    };
    let first_day = services::list_events(&db, &query).await.unwrap();
    assert_eq!(first_day.len(), 1);
    assert_eq!(first_day[0].subject, "Before");

    let page = CalendarQuery {
        start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
        end_date: NaiveDate::from_ymd_opt(2025, 3, 4),
        limit: Some(2),
        offset: Some(1),
        ..CalendarQuery::default()
    };
    let page = services::list_events(&db, &page).await.unwrap();
    let page: Vec<&str> = page.iter().map(|event| event.subject.as_str()).collect();
    assert_eq!(page, vec!["Early", "Late"]);
}

#[tokio::test]
async fn test_user_filter_matches_organizer_or_participant() {
    let app = setup_test_app().await;
    let (alice, _) = create_test_user(&app, "employee").await.unwrap();
    let (bob, _) = create_test_user(&app, "employee").await.unwrap();

    event_with(&app, "Hosted", at(20, 9), Some(&alice), &[]).await;
    event_with(&app, "Invited", at(20, 10), Some(&bob), &[&alice]).await;
    event_with(&app, "Unrelated", at(20, 11), Some(&bob), &[]).await;

    let (status, list) = get_json(&app, &format!("/api/calendar_events?user_id={alice}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subjects(&list), vec!["Hosted", "Invited"]);
    let invited = &list.as_array().unwrap()[1];
    assert_eq!(invited["participant_ids"], json!([alice]));
}

#[tokio::test]
async fn test_replacing_participants() {
    let app = setup_test_app().await;
    let (first, _) = create_test_user(&app, "employee").await.unwrap();
    let (second, _) = create_test_user(&app, "employee").await.unwrap();
    let id = event_with(&app, "Microscope booking", at(15, 8), None, &[&first]).await;
    let uri = format!("/api/calendar_events/{id}/participants");

    let (status, event) = send_json(&app, "PUT", &uri, Some(json!({"user_ids": [second]}))).await;
    assert_eq!(status, StatusCode::OK, "Failed to replace participants: {event:?}");
    assert_eq!(event["participant_ids"], json!([second]));

    // A missing user leaves the current list in place
    let (status, _) = send_json(
        &app,
        "PUT",
        &uri,
        Some(json!({"user_ids": [first, Uuid::new_v4()]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, event) = get_json(&app, &format!("/api/calendar_events/{id}")).await;
    assert_eq!(event["participant_ids"], json!([second]));

    let (status, event) = send_json(&app, "PUT", &uri, Some(json!({"user_ids": []}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(event["participant_ids"].as_array().unwrap().is_empty());

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/calendar_events/{}/participants", Uuid::new_v4()),
        Some(json!({"user_ids": []})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_users_updates_events() {
    let app = setup_test_app().await;
    let (organizer, _) = create_test_user(&app, "employee").await.unwrap();
    let (guest, _) = create_test_user(&app, "employee").await.unwrap();
    let id = event_with(&app, "Safety training", at(25, 9), Some(&organizer), &[&guest]).await;

    for user in [&organizer, &guest] {
        let (status, _) = send_json(&app, "DELETE", &format!("/api/users/{user}"), None).await;
        assert!(status.is_success(), "Delete failed with {status}");
    }

    let (status, event) = get_json(&app, &format!("/api/calendar_events/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(event["organizer_id"].is_null());
    assert!(event["participant_ids"].as_array().unwrap().is_empty());
}
