use crate::config::test_helpers::setup_test_app;
use crate::test_helpers::{create_test_task, create_test_user, get_json, send_json};
use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

async fn post_comment(
    app: &axum::Router,
    task_id: &str,
    text: &str,
    user_id: Option<&str>,
) -> (StatusCode, Value) {
    let mut payload = json!({"task_id": task_id, "text": text});
    if let Some(user) = user_id {
        payload["user_id"] = json!(user);
    }
    send_json(app, "POST", "/api/task_comments", Some(payload)).await
}

#[tokio::test]
async fn test_comment_crud_operations() {
    let app = setup_test_app().await;
    let (task_id, _) = create_test_task(&app, "Order tips", "new", None, None).await.unwrap();
    let (user_id, _) = create_test_user(&app, "employee").await.unwrap();

    let (status, created) = post_comment(&app, &task_id, "Asked the supplier", Some(&user_id)).await;
    assert_eq!(status, StatusCode::CREATED, "Failed to comment: {created:?}");
    assert_eq!(created["task_id"], task_id);
    assert_eq!(created["user_id"], user_id);
    assert!(created["date"].is_string());

    let uri = format!("/api/task_comments/{}", created["id"].as_str().unwrap());
    let (status, updated) =
        send_json(&app, "PUT", &uri, Some(json!({"text": "Supplier confirmed"}))).await;
    assert_eq!(status, StatusCode::OK, "Failed to edit comment: {updated:?}");
    assert_eq!(updated["text"], "Supplier confirmed");
    assert_eq!(updated["date"], created["date"]);

    let (status, body) = send_json(&app, "PUT", &uri, Some(json!({"text": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "Unexpected response: {body:?}");

    let (status, _) = send_json(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_validation_and_references() {
    let app = setup_test_app().await;
    let (task_id, _) = create_test_task(&app, "Autoclave", "new", None, None).await.unwrap();

    let (status, body) = post_comment(&app, &task_id, "", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("text"));

    let (status, _) = post_comment(&app, &Uuid::new_v4().to_string(), "Hello", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let missing_user = Uuid::new_v4().to_string();
    let (status, _) = post_comment(&app, &task_id, "Hello", Some(&missing_user)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_comments_route_lists_oldest_first() {
    let app = setup_test_app().await;
    let (task_id, _) = create_test_task(&app, "Inventory", "new", None, None).await.unwrap();
    let (other_task, _) = create_test_task(&app, "Other", "new", None, None).await.unwrap();

    for text in ["First", "Second", "Third"] {
        let (status, _) = post_comment(&app, &task_id, text, None).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    post_comment(&app, &other_task, "Elsewhere", None).await;

    let (status, comments) = get_json(&app, &format!("/api/tasks/{task_id}/comments")).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = comments
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["text"].as_str())
        .collect();
    assert_eq!(texts, vec!["First", "Second", "Third"]);

    let (status, _) = get_json(&app, &format!("/api/tasks/{}/comments", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments_follow_task_and_author_deletion() {
    let app = setup_test_app().await;
    let (task_id, _) = create_test_task(&app, "Cleanup", "new", None, None).await.unwrap();
    let (user_id, _) = create_test_user(&app, "employee").await.unwrap();

    let (_, comment) = post_comment(&app, &task_id, "Done by me", Some(&user_id)).await;
    let uri = format!("/api/task_comments/{}", comment["id"].as_str().unwrap());

    let (status, _) = send_json(&app, "DELETE", &format!("/api/users/{user_id}"), None).await;
    assert!(status.is_success(), "Delete failed with {status}");
    let (_, kept) = get_json(&app, &uri).await;
    assert!(kept["user_id"].is_null());

    let (status, _) = send_json(&app, "DELETE", &format!("/api/tasks/{task_id}"), None).await;
    assert!(status.is_success(), "Delete failed with {status}");
    let (status, _) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
