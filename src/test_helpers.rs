/// Shared helpers for driving the API in tests.
///
/// The builders create entities through the HTTP surface so they pass through the same
/// hooks as real clients: users first, then reagents (with their opening movement) and tasks.
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;
use uuid::Uuid;

/// Extract response body as JSON for testing
pub async fn extract_response_body(response: axum::response::Response) -> (StatusCode, Value) {
    use axum::body::to_bytes;

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| json!({"error": "Invalid JSON response"}));
    (status, body)
}

/// Send a request with an optional JSON body and decode the JSON response
pub async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    extract_response_body(response).await
}

pub async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    send_json(app, "GET", uri, None).await
}

/// Decimals serialize as strings by default; accept numbers too
pub fn decimal_of(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("Expected a decimal, got {other}"),
    }
}

/// Create a test user with a unique username and the given role
pub async fn create_test_user(app: &axum::Router, role: &str) -> Result<(String, Value), String> {
    let suffix = Uuid::new_v4().simple().to_string();
    let payload = json!({
        "username": format!("user_{}", &suffix[..12]),
        "email": format!("{}@lab.example.org", &suffix[..12]),
        "first_name": "Test",
        "last_name": "User",
        "role": role
    });

    let (status, body) = send_json(app, "POST", "/api/users", Some(payload)).await;
    if status == StatusCode::CREATED {
        let user_id = body["id"].as_str().unwrap().to_string();
        Ok((user_id, body))
    } else {
        Err(format!("Failed to create user: Status {status}, Body: {body}"))
    }
}

/// Create a test reagent with default parameters and no stock
pub async fn create_test_reagent(app: &axum::Router) -> Result<(String, Value), String> {
    create_test_reagent_with_params(
        app,
        &format!("Test Reagent {}", Uuid::new_v4()),
        "0",
        "0",
        None,
    )
    .await
}

/// Create a test reagent; `on_hand` is booked as its opening balance
pub async fn create_test_reagent_with_params(
    app: &axum::Router,
    name: &str,
    on_hand: &str,
    min_threshold: &str,
    expiry_date: Option<&str>,
) -> Result<(String, Value), String> {
    let mut payload = json!({
        "name": name,
        "category": "chemical",
        "on_hand": on_hand,
        "min_threshold": min_threshold,
    });
    if let Some(expiry) = expiry_date {
        payload["expiry_date"] = json!(expiry);
    }

    let (status, body) = send_json(app, "POST", "/api/reagents", Some(payload)).await;
    if status == StatusCode::CREATED {
        let reagent_id = body["id"].as_str().unwrap().to_string();
        Ok((reagent_id, body))
    } else {
        Err(format!("Failed to create reagent: Status {status}, Body: {body}"))
    }
}

/// Record a movement through the API, returning the raw response
pub async fn post_movement(
    app: &axum::Router,
    reagent_id: &str,
    quantity: &str,
    movement_type: &str,
    user_id: Option<&str>,
) -> (StatusCode, Value) {
    let mut payload = json!({
        "reagent_id": reagent_id,
        "quantity": quantity,
        "movement_type": movement_type,
    });
    if let Some(user) = user_id {
        payload["user_id"] = json!(user);
    }
    send_json(app, "POST", "/api/reagent_movements", Some(payload)).await
}

/// Create a task; `deadline` is an RFC 3339 timestamp
pub async fn create_test_task(
    app: &axum::Router,
    title: &str,
    status: &str,
    deadline: Option<&str>,
    assignee_id: Option<&str>,
) -> Result<(String, Value), String> {
    let mut payload = json!({
        "title": title,
        "description": "Created by the test suite",
        "status": status,
        "priority": "normal",
    });
    if let Some(deadline) = deadline {
        payload["deadline"] = json!(deadline);
    }
    if let Some(assignee) = assignee_id {
        payload["assignee_id"] = json!(assignee);
    }

    let (status, body) = send_json(app, "POST", "/api/tasks", Some(payload)).await;
    if status == StatusCode::CREATED {
        let task_id = body["id"].as_str().unwrap().to_string();
        Ok((task_id, body))
    } else {
        Err(format!("Failed to create task: Status {status}, Body: {body}"))
    }
}
