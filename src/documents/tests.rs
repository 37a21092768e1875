use crate::config::test_helpers::setup_test_app;
use crate::test_helpers::{create_test_user, get_json, send_json};
use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_template_crud_operations() {
    let app = setup_test_app().await;
    let (uploader, _) = create_test_user(&app, "employee").await.unwrap();

    let (status, created) = send_json(
        &app,
        "POST",
        "/api/document_templates",
        Some(json!({
            "name": "Biosafety checklist",
            "file_url": "https://files.lab.example.org/templates/biosafety.docx",
            "uploaded_by_id": uploader,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to register template: {created:?}");
    assert_eq!(created["description"], "");
    assert_eq!(created["uploaded_by_id"], uploader);
    assert!(created["uploaded_at"].is_string());

    let uri = format!("/api/document_templates/{}", created["id"].as_str().unwrap());
    let (status, updated) = send_json(
        &app,
        "PUT",
        &uri,
        Some(json!({"description": "Yearly revision", "file_url": "https://files.lab.example.org/templates/biosafety-v2.docx"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Failed to update template: {updated:?}");
    assert_eq!(updated["description"], "Yearly revision");
    assert!(updated["file_url"].as_str().unwrap().ends_with("biosafety-v2.docx"));
    assert_eq!(updated["uploaded_at"], created["uploaded_at"]);

    let (status, list) = get_json(&app, "/api/document_templates").await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().iter().any(|t| t["name"] == "Biosafety checklist"));

    let (status, _) = send_json(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case::blank_name(" ", "https://files.lab.example.org/a.pdf", "name")]
#[case::blank_file_url("Order form", "", "file_url")]
#[tokio::test]
async fn test_blank_fields_are_rejected(
    #[case] name: &str,
    #[case] file_url: &str,
    #[case] field: &str,
) {
    let app = setup_test_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/document_templates",
        Some(json!({"name": name, "file_url": file_url})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "Unexpected response: {body:?}");
    assert!(body["error"]["message"].as_str().unwrap().contains(field));

    let (status, created) = send_json(
        &app,
        "POST",
        "/api/document_templates",
        Some(json!({"name": "Valid", "file_url": "https://files.lab.example.org/valid.pdf"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/document_templates/{}", created["id"].as_str().unwrap());
    let (status, _) = send_json(&app, "PUT", &uri, Some(json!({field: " "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_uploader_must_exist_and_may_leave() {
    let app = setup_test_app().await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/document_templates",
        Some(json!({
            "name": "Orphan",
            "file_url": "https://files.lab.example.org/orphan.pdf",
            "uploaded_by_id": Uuid::new_v4(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (uploader, _) = create_test_user(&app, "employee").await.unwrap();
    let (_, created) = send_json(
        &app,
        "POST",
        "/api/document_templates",
        Some(json!({
            "name": "Kept",
            "file_url": "https://files.lab.example.org/kept.pdf",
            "uploaded_by_id": uploader,
        })),
    )
    .await;
    let uri = format!("/api/document_templates/{}", created["id"].as_str().unwrap());

    let (status, _) = send_json(&app, "DELETE", &format!("/api/users/{uploader}"), None).await;
    assert!(status.is_success(), "Delete failed with {status}");
    let (status, template) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(template["uploaded_by_id"].is_null());
}
