#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database};
use serde_json::{json, Value};
use std::sync::Arc;

use storefront::{create_api_router, primary_setup, setup_schema};

/// Serves the app on an ephemeral port with its own in-memory database
/// and returns the base url. The single-connection pool keeps every
/// request on the same in-memory SQLite instance.
pub async fn spawn_app() -> String {
    std::env::set_var("SECRET", "integration-test-secret");
    serve_app().await
}

/// Like `spawn_app` but without a signing key configured. Env vars are
/// process-wide, so callers must live in their own test binary.
pub async fn spawn_app_without_secret() -> String {
    std::env::remove_var("SECRET");
    serve_app().await
}

async fn serve_app() -> String {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory database");
    setup_schema(&db).await;

    let shared_db = Arc::new(db);
    primary_setup(shared_db.clone()).await;

    let app = create_api_router(shared_db);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    format!("http://{}", addr)
}

pub async fn login(client: &reqwest::Client, base: &str, username: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/login", base))
        .json(&json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body = response
        .json::<Value>()
        .await
        .expect("Failed to parse login response JSON");

    body["token"]
        .as_str()
        .expect("Token not found in login response")
        .to_owned()
}

pub async fn admin_token(client: &reqwest::Client, base: &str) -> String {
    login(client, base, "admin", "Secret15").await
}

pub async fn user_token(client: &reqwest::Client, base: &str) -> String {
    login(client, base, "user", "Secret15").await
}

pub async fn create_collection(
    client: &reqwest::Client,
    base: &str,
    token: &str,
    title: &str,
) -> i64 {
    let response = client
        .post(format!("{}/api/collections", base))
        .bearer_auth(token)
        .json(&json!({ "title": title }))
        .send()
        .await
        .expect("Failed to send create collection request");

    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let body = response
        .json::<Value>()
        .await
        .expect("Failed to parse create collection response JSON");
    body["id"].as_i64().expect("Collection id missing")
}

pub async fn create_product(
    client: &reqwest::Client,
    base: &str,
    token: &str,
    collection_id: i64,
    title: &str,
    unit_price: f64,
) -> i64 {
    let response = client
        .post(format!("{}/api/products", base))
        .bearer_auth(token)
        .json(&json!({
            "title": title,
            "slug": title.to_lowercase().replace(' ', "-"),
            "description": format!("{} description", title),
            "unit_price": unit_price,
            "inventory": 100,
            "collection_id": collection_id
        }))
        .send()
        .await
        .expect("Failed to send create product request");

    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let body = response
        .json::<Value>()
        .await
        .expect("Failed to parse create product response JSON");
    body["id"].as_i64().expect("Product id missing")
}

pub async fn create_cart(client: &reqwest::Client, base: &str) -> String {
    let response = client
        .post(format!("{}/api/carts", base))
        .send()
        .await
        .expect("Failed to send create cart request");

    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let body = response
        .json::<Value>()
        .await
        .expect("Failed to parse create cart response JSON");
    body["id"].as_str().expect("Cart id missing").to_owned()
}

pub async fn add_cart_item(
    client: &reqwest::Client,
    base: &str,
    cart_id: &str,
    product_id: i64,
    quantity: i64,
) -> Value {
    let response = client
        .post(format!("{}/api/carts/{}/items", base, cart_id))
        .json(&json!({
            "product_id": product_id,
            "quantity": quantity
        }))
        .send()
        .await
        .expect("Failed to send add cart item request");

    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    response
        .json::<Value>()
        .await
        .expect("Failed to parse add cart item response JSON")
}

pub fn approx_eq(value: f64, expected: f64) -> bool {
    (value - expected).abs() < 1e-9
}
