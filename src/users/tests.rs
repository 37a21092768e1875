use crate::config::test_helpers::setup_test_app;
use crate::test_helpers::{create_test_user, get_json, send_json};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_user_crud_operations() {
    let app = setup_test_app().await;

    let (user_id, created) = create_test_user(&app, "lab_head").await.unwrap();
    assert_eq!(created["role"], "lab_head");
    assert!(created["created_at"].is_string());

    let (status, fetched) = get_json(&app, &format!("/api/users/{user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["username"], created["username"]);

    let (status, updated) = send_json(
        &app,
        "PUT",
        &format!("/api/users/{user_id}"),
        Some(json!({"role": "sysadmin", "first_name": "Ada"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Failed to update user: {updated:?}");
    assert_eq!(updated["role"], "sysadmin");
    assert_eq!(updated["first_name"], "Ada");

    let (status, list) = get_json(&app, "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        list.as_array()
            .unwrap()
            .iter()
            .any(|user| user["id"] == user_id.as_str())
    );

    let (status, _) = send_json(&app, "DELETE", &format!("/api/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get_json(&app, &format!("/api/users/{user_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_rejects_unknown_role() {
    let app = setup_test_app().await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/users",
        Some(json!({"username": format!("intruder_{}", Uuid::new_v4().simple()), "role": "overlord"})),
    )
    .await;
    assert!(status.is_client_error(), "Unknown role accepted with {status}");
}

#[tokio::test]
async fn test_usernames_are_unique() {
    let app = setup_test_app().await;
    let (_, created) = create_test_user(&app, "employee").await.unwrap();

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/users",
        Some(json!({"username": created["username"], "role": "employee"})),
    )
    .await;
    assert!(!status.is_success(), "Duplicate username accepted with {status}");
}
