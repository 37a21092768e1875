use super::models::{HealthCheck, PageParams, UIConfiguration};
use crate::config::Config;
use crate::config::test_helpers::setup_test_app;
use crate::test_helpers::extract_response_body;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

#[test]
fn test_ui_configuration_from_config() {
    let config = Config::for_tests();
    let ui = UIConfiguration::from_config(&config);

    assert_eq!(ui.client_id, "test-ui");
    assert_eq!(ui.realm, "test-realm");
    assert_eq!(ui.deployment, "test");

    let json = serde_json::to_string(&ui).unwrap();
    assert!(json.contains("clientId"), "client id is exposed in camelCase");
}

#[test]
fn test_health_check_deserialization() {
    let health: HealthCheck = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
    assert_eq!(health.status, "ok");
}

#[test]
fn test_page_params_clamp() {
    let params = PageParams {
        limit: None,
        offset: None,
    };
    assert_eq!(params.limit(), PageParams::DEFAULT_LIMIT);
    assert_eq!(params.offset(), 0);

    let params = PageParams {
        limit: Some(50_000),
        offset: Some(20),
    };
    assert_eq!(params.limit(), PageParams::MAX_LIMIT);
    assert_eq!(params.offset(), 20);

    let params = PageParams {
        limit: Some(0),
        offset: None,
    };
    assert_eq!(params.limit(), 1);
}

#[tokio::test]
async fn test_healthz_reports_ok() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_ui_config_endpoint() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/config")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["realm"], "test-realm");
    assert_eq!(body["deployment"], "test");
}
