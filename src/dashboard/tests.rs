use super::services::WIDGET_SIZE;
use crate::config::test_helpers::setup_test_app;
use crate::test_helpers::{
    create_test_reagent_with_params, create_test_task, create_test_user, get_json, post_movement,
    send_json,
};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_dashboard_widgets() {
    let app = setup_test_app().await;
    let (user_id, _) = create_test_user(&app, "employee").await.unwrap();
    let (other_id, _) = create_test_user(&app, "employee").await.unwrap();

    let expiry = (Utc::now().date_naive() + Duration::days(10)).to_string();
    let (critical_id, _) = create_test_reagent_with_params(&app, "FBS", "50", "100", None)
        .await
        .unwrap();
    let (expiring_id, _) =
        create_test_reagent_with_params(&app, "Antibody X", "500", "1", Some(&expiry))
            .await
            .unwrap();

    let past = (Utc::now() - Duration::days(1)).to_rfc3339();
    let (mine, _) = create_test_task(&app, "Mine", "new", Some(&past), Some(&user_id))
        .await
        .unwrap();
    let (theirs, _) = create_test_task(&app, "Theirs", "new", None, Some(&other_id))
        .await
        .unwrap();
    create_test_task(&app, "Finished", "done", None, Some(&user_id))
        .await
        .unwrap();

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/announcements",
        Some(json!({"title": "Welcome", "text": "Hello lab", "is_pinned": true})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, dashboard) = get_json(&app, &format!("/api/dashboard?user_id={user_id}")).await;
    assert_eq!(status, StatusCode::OK, "Dashboard failed: {dashboard:?}");

    assert!(dashboard["reagent_count"].as_u64().unwrap() >= 2);
    assert!(dashboard["open_task_count"].as_u64().unwrap() >= 2);
    assert!(dashboard["overdue_task_count"].as_u64().unwrap() >= 1);

    let critical = dashboard["critical_reagents"].as_array().unwrap();
    assert!(critical.len() as u64 <= WIDGET_SIZE);
    assert!(critical.iter().any(|r| r["id"] == critical_id.as_str()));

    let expiring = dashboard["expiring_reagents"].as_array().unwrap();
    assert!(expiring.iter().any(|r| r["id"] == expiring_id.as_str()));

    let user_tasks = dashboard["user_tasks"].as_array().unwrap();
    assert!(user_tasks.iter().any(|t| t["id"] == mine.as_str()));
    assert!(!user_tasks.iter().any(|t| t["id"] == theirs.as_str()));
    assert!(user_tasks.iter().all(|t| t["status"] != "done"));

    let announcements = dashboard["latest_announcements"].as_array().unwrap();
    assert!(!announcements.is_empty());
    assert!(announcements.len() as u64 <= WIDGET_SIZE);
}

#[tokio::test]
async fn test_dashboard_without_user() {
    let app = setup_test_app().await;

    let (status, dashboard) = get_json(&app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert!(dashboard["user_tasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_dashboard_unknown_user() {
    let app = setup_test_app().await;

    let (status, _) = get_json(&app, &format!("/api/dashboard?user_id={}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_counts_are_scoped_to_the_user() {
    let app = setup_test_app().await;
    let (user_id, _) = create_test_user(&app, "employee").await.unwrap();
    let (other_id, _) = create_test_user(&app, "employee").await.unwrap();
    let past = (Utc::now() - Duration::days(1)).to_rfc3339();

    for (title, status, deadline) in [
        ("Overdue new", "new", Some(past.as_str())),
        ("Pending", "new", None),
        ("Overdue running", "in_progress", Some(past.as_str())),
        ("Closed late", "done", Some(past.as_str())),
    ] {
        create_test_task(&app, title, status, deadline, Some(&user_id))
            .await
            .unwrap();
    }
    create_test_task(&app, "Someone else's", "new", Some(&past), Some(&other_id))
        .await
        .unwrap();

    let (status, mine) = get_json(&app, &format!("/api/dashboard?user_id={user_id}")).await;
    assert_eq!(status, StatusCode::OK, "Dashboard failed: {mine:?}");
    assert_eq!(mine["total_tasks"], 4);
    assert_eq!(mine["pending_tasks"], 2);
    assert_eq!(mine["overdue_task_count"], 2);

    let (_, lab) = get_json(&app, "/api/dashboard").await;
    assert!(lab["overdue_task_count"].as_u64().unwrap() >= 3);
    assert_eq!(lab["total_tasks"], 0);
    assert_eq!(lab["pending_tasks"], 0);
}

#[tokio::test]
async fn test_dashboard_search() {
    let app = setup_test_app().await;
    let token = format!("zebrafish{}", &Uuid::new_v4().simple().to_string()[..8]);

    let (reagent_id, _) =
        create_test_reagent_with_params(&app, &format!("{token} medium"), "1", "0", None)
            .await
            .unwrap();
    let (task_id, _) = create_test_task(&app, &format!("Feed {token}"), "new", None, None)
        .await
        .unwrap();
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/announcements",
        Some(json!({
            "title": "Facility",
            "text": format!("The {} tanks move", token.to_uppercase()),
            "is_pinned": false
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, dashboard) = get_json(&app, &format!("/api/dashboard?q={token}")).await;
    assert_eq!(status, StatusCode::OK, "Dashboard failed: {dashboard:?}");
    let search = &dashboard["search"];
    assert_eq!(search["query"], token.as_str());
    assert!(search["reagents"].as_array().unwrap().iter().any(|r| r["id"] == reagent_id.as_str()));
    assert!(search["tasks"].as_array().unwrap().iter().any(|t| t["id"] == task_id.as_str()));
    assert_eq!(search["announcements_count"], 1);
    assert_eq!(search["announcements_exist"], true);

    let (_, unmatched) = get_json(&app, "/api/dashboard?q=nothingmatchesthis").await;
    assert!(unmatched["search"]["reagents"].as_array().unwrap().is_empty());
    assert!(unmatched["search"]["tasks"].as_array().unwrap().is_empty());
    assert_eq!(unmatched["search"]["announcements_exist"], false);

    let (_, blank) = get_json(&app, "/api/dashboard?q=%20%20").await;
    assert!(blank["search"].is_null());
    let (_, absent) = get_json(&app, "/api/dashboard").await;
    assert!(absent["search"].is_null());
}

#[tokio::test]
async fn test_movement_stats_and_active_cultures() {
    let app = setup_test_app().await;
    let (reagent_id, _) = create_test_reagent_with_params(&app, "Stats buffer", "10", "0", None)
        .await
        .unwrap();
    let (status, _) = post_movement(&app, &reagent_id, "4", "out", None).await;
    assert_eq!(status, StatusCode::CREATED);

    for (name, culture_status) in [("HeLa", "active"), ("HEK293", "frozen")] {
        let (status, body) = send_json(
            &app,
            "POST",
            "/api/cultures",
            Some(json!({"name": name, "status": culture_status})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "Failed to create culture: {body:?}");
    }

    let (status, dashboard) = get_json(&app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert!(dashboard["active_cultures"].as_u64().unwrap() >= 1);

    let stats = dashboard["movements_stats"].as_array().unwrap();
    let total_of = |movement_type: &str| {
        stats
            .iter()
            .find(|stat| stat["movement_type"] == movement_type)
            .and_then(|stat| stat["total"].as_i64())
            .unwrap_or(0)
    };
    assert!(total_of("in") >= 1);
    assert!(total_of("out") >= 1);
}
