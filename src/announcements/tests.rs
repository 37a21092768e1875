use crate::config::test_helpers::setup_test_app;
use crate::test_helpers::{create_test_user, get_json, send_json};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

async fn create_announcement(
    app: &axum::Router,
    title: &str,
    is_pinned: bool,
    days_ago: i64,
) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/announcements",
        Some(json!({"title": title, "text": "Details follow.", "is_pinned": is_pinned})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create announcement: {body:?}");
    let id = body["id"].as_str().unwrap().to_string();

    let published_at = (Utc::now() - Duration::days(days_ago)).to_rfc3339();
    let (status, body) = send_json(
        app,
        "PUT",
        &format!("/api/announcements/{id}"),
        Some(json!({"published_at": published_at})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Failed to backdate announcement: {body:?}");
    id
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_feed_lists_pinned_first_then_newest() {
    let app = setup_test_app().await;
    let old_pinned = create_announcement(&app, "Safety rules", true, 30).await;
    let recent = create_announcement(&app, "Seminar today", false, 0).await;
    let older = create_announcement(&app, "Freezer defrost", false, 5).await;

    let (status, feed) = get_json(&app, "/api/announcements/feed").await;
    assert_eq!(status, StatusCode::OK);
    let feed_ids = ids(&feed);
    let position = |id: &str| feed_ids.iter().position(|candidate| candidate == id).unwrap();
    assert!(position(&old_pinned) < position(&recent));
    assert!(position(&recent) < position(&older));

    let (status, pinned) = get_json(&app, "/api/announcements/pinned").await;
    assert_eq!(status, StatusCode::OK);
    let pinned_ids = ids(&pinned);
    assert!(pinned_ids.contains(&old_pinned));
    assert!(!pinned_ids.contains(&recent));
}

#[tokio::test]
async fn test_deleting_author_keeps_announcement() {
    let app = setup_test_app().await;
    let (user_id, _) = create_test_user(&app, "lab_head").await.unwrap();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/announcements",
        Some(json!({
            "title": "New centrifuge",
            "text": "Booking opens Monday.",
            "is_pinned": false,
            "author_id": user_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    send_json(&app, "DELETE", &format!("/api/users/{user_id}"), None).await;

    let (status, fetched) = get_json(&app, &format!("/api/announcements/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(fetched["author_id"].is_null());
}
