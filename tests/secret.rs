mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

// Kept as the only test in this binary: it clears SECRET, which is
// process-wide.
#[tokio::test]
async fn test_login_without_secret_returns_500() {
    let base = common::spawn_app_without_secret().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/login", base))
        .json(&json!({
            "username": "admin",
            "password": "Secret15"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response
        .json::<Value>()
        .await
        .expect("Failed to parse login response JSON");
    assert_eq!(body["error"].as_str(), Some("Internal server error"));
}
