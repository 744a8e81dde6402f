mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_and_get_cart() {
    let base = common::spawn_app().await;
    let client = reqwest::Client::new();

    let cart_id = common::create_cart(&client, &base).await;

    let response = client
        .get(format!("{}/api/carts/{}", base, cart_id))
        .send()
        .await
        .expect("Failed to send get cart request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = response
        .json::<Value>()
        .await
        .expect("Failed to parse get cart response JSON");
    assert_eq!(body["id"].as_str(), Some(cart_id.as_str()));
    assert_eq!(body["items"].as_array().expect("Expected items").len(), 0);
    assert!(common::approx_eq(
        body["total_price"].as_f64().expect("total_price missing"),
        0.0
    ));
}

#[tokio::test]
async fn test_adding_same_product_twice_merges_quantities() {
    let base = common::spawn_app().await;
    let client = reqwest::Client::new();
    let token = common::admin_token(&client, &base).await;

    let collection_id = common::create_collection(&client, &base, &token, "Beverages").await;
    let product_id =
        common::create_product(&client, &base, &token, collection_id, "Espresso", 4.0).await;

    let cart_id = common::create_cart(&client, &base).await;
    common::add_cart_item(&client, &base, &cart_id, product_id, 2).await;
    let merged = common::add_cart_item(&client, &base, &cart_id, product_id, 3).await;

    assert_eq!(merged["quantity"].as_i64(), Some(5));

    let body = client
        .get(format!("{}/api/carts/{}", base, cart_id))
        .send()
        .await
        .expect("Failed to send get cart request")
        .json::<Value>()
        .await
        .expect("Failed to parse get cart response JSON");

    let items = body["items"].as_array().expect("Expected items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"].as_i64(), Some(5));
    assert!(common::approx_eq(
        items[0]["total_price"].as_f64().expect("total_price missing"),
        20.0
    ));
    assert!(common::approx_eq(
        body["total_price"].as_f64().expect("total_price missing"),
        20.0
    ));
}

#[tokio::test]
async fn test_add_unknown_product_rejected() {
    let base = common::spawn_app().await;
    let client = reqwest::Client::new();

    let cart_id = common::create_cart(&client, &base).await;

    let response = client
        .post(format!("{}/api/carts/{}/items", base, cart_id))
        .json(&json!({
            "product_id": 9999,
            "quantity": 1
        }))
        .send()
        .await
        .expect("Failed to send add cart item request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response
        .json::<Value>()
        .await
        .expect("Failed to parse add cart item response JSON");
    assert_eq!(
        body["error"].as_str(),
        Some("No product with the given ID was found.")
    );
}

#[tokio::test]
async fn test_add_item_rejects_zero_quantity() {
    let base = common::spawn_app().await;
    let client = reqwest::Client::new();
    let token = common::admin_token(&client, &base).await;

    let collection_id = common::create_collection(&client, &base, &token, "Beverages").await;
    let product_id =
        common::create_product(&client, &base, &token, collection_id, "Mocha", 4.0).await;

    let cart_id = common::create_cart(&client, &base).await;

    let response = client
        .post(format!("{}/api/carts/{}/items", base, cart_id))
        .json(&json!({
            "product_id": product_id,
            "quantity": 0
        }))
        .send()
        .await
        .expect("Failed to send add cart item request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_and_delete_cart_item() {
    let base = common::spawn_app().await;
    let client = reqwest::Client::new();
    let token = common::admin_token(&client, &base).await;

    let collection_id = common::create_collection(&client, &base, &token, "Beverages").await;
    let product_id =
        common::create_product(&client, &base, &token, collection_id, "Latte", 5.0).await;

    let cart_id = common::create_cart(&client, &base).await;
    let item = common::add_cart_item(&client, &base, &cart_id, product_id, 1).await;
    let item_id = item["id"].as_i64().expect("Cart item id missing");

    let patch_response = client
        .patch(format!("{}/api/carts/{}/items/{}", base, cart_id, item_id))
        .json(&json!({ "quantity": 7 }))
        .send()
        .await
        .expect("Failed to send patch cart item request");
    assert_eq!(patch_response.status(), StatusCode::OK);

    let item_body = client
        .get(format!("{}/api/carts/{}/items/{}", base, cart_id, item_id))
        .send()
        .await
        .expect("Failed to send get cart item request")
        .json::<Value>()
        .await
        .expect("Failed to parse get cart item response JSON");
    assert_eq!(item_body["quantity"].as_i64(), Some(7));

    let delete_response = client
        .delete(format!("{}/api/carts/{}/items/{}", base, cart_id, item_id))
        .send()
        .await
        .expect("Failed to send delete cart item request");
    assert_eq!(delete_response.status(), StatusCode::OK);

    let items = client
        .get(format!("{}/api/carts/{}/items", base, cart_id))
        .send()
        .await
        .expect("Failed to send list cart items request")
        .json::<Value>()
        .await
        .expect("Failed to parse list cart items response JSON");
    assert_eq!(items.as_array().expect("Expected items").len(), 0);
}

#[tokio::test]
async fn test_delete_cart() {
    let base = common::spawn_app().await;
    let client = reqwest::Client::new();

    let cart_id = common::create_cart(&client, &base).await;

    let delete_response = client
        .delete(format!("{}/api/carts/{}", base, cart_id))
        .send()
        .await
        .expect("Failed to send delete cart request");
    assert_eq!(delete_response.status(), StatusCode::OK);

    let get_response = client
        .get(format!("{}/api/carts/{}", base, cart_id))
        .send()
        .await
        .expect("Failed to send get cart request");
    assert_eq!(get_response.status(), StatusCode::NOT_FOUND);
}
