mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
async fn test_place_order_snapshots_prices_and_deletes_cart() {
    let base = common::spawn_app().await;
    let client = reqwest::Client::new();
    let admin = common::admin_token(&client, &base).await;

    let collection_id = common::create_collection(&client, &base, &admin, "Beverages").await;
    let coffee = common::create_product(&client, &base, &admin, collection_id, "Coffee", 10.0).await;
    let tea = common::create_product(&client, &base, &admin, collection_id, "Tea", 20.0).await;

    let cart_id = common::create_cart(&client, &base).await;
    common::add_cart_item(&client, &base, &cart_id, coffee, 1).await;
    common::add_cart_item(&client, &base, &cart_id, tea, 2).await;

    let user = common::user_token(&client, &base).await;
    let order_response = client
        .post(format!("{}/api/orders", base))
        .bearer_auth(&user)
        .json(&json!({ "cart_id": cart_id }))
        .send()
        .await
        .expect("Failed to send create order request");

    assert_eq!(order_response.status(), StatusCode::CREATED);

    let order = order_response
        .json::<Value>()
        .await
        .expect("Failed to parse create order response JSON");
    assert_eq!(order["payment_status"].as_str(), Some("P"));

    let items = order["items"].as_array().expect("Expected order items");
    assert_eq!(items.len(), 2);
    assert!(common::approx_eq(
        items[0]["unit_price"].as_f64().expect("unit_price missing"),
        10.0
    ));
    assert!(common::approx_eq(
        items[1]["unit_price"].as_f64().expect("unit_price missing"),
        20.0
    ));
    assert_eq!(items[1]["quantity"].as_i64(), Some(2));

    // The cart is consumed by the order.
    let cart_response = client
        .get(format!("{}/api/carts/{}", base, cart_id))
        .send()
        .await
        .expect("Failed to send get cart request");
    assert_eq!(cart_response.status(), StatusCode::NOT_FOUND);

    // A later price change must not leak into the placed order.
    let patch_response = client
        .patch(format!("{}/api/products/{}", base, coffee))
        .bearer_auth(&admin)
        .json(&json!({ "unit_price": 99.0 }))
        .send()
        .await
        .expect("Failed to send patch product request");
    assert_eq!(patch_response.status(), StatusCode::OK);

    let order_id = order["id"].as_i64().expect("Order id missing");
    let reread = client
        .get(format!("{}/api/orders/{}", base, order_id))
        .bearer_auth(&user)
        .send()
        .await
        .expect("Failed to send get order request")
        .json::<Value>()
        .await
        .expect("Failed to parse get order response JSON");
    assert!(common::approx_eq(
        reread["items"][0]["unit_price"]
            .as_f64()
            .expect("unit_price missing"),
        10.0
    ));
}

#[tokio::test]
async fn test_delete_product_referenced_by_order_rejected() {
    let base = common::spawn_app().await;
    let client = reqwest::Client::new();
    let admin = common::admin_token(&client, &base).await;

    let collection_id = common::create_collection(&client, &base, &admin, "Beverages").await;
    let product_id =
        common::create_product(&client, &base, &admin, collection_id, "Coffee", 10.0).await;

    let cart_id = common::create_cart(&client, &base).await;
    common::add_cart_item(&client, &base, &cart_id, product_id, 1).await;

    let user = common::user_token(&client, &base).await;
    let order_response = client
        .post(format!("{}/api/orders", base))
        .bearer_auth(&user)
        .json(&json!({ "cart_id": cart_id }))
        .send()
        .await
        .expect("Failed to send create order request");
    assert_eq!(order_response.status(), StatusCode::CREATED);

    let delete_response = client
        .delete(format!("{}/api/products/{}", base, product_id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send delete product request");

    assert_eq!(delete_response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let body = delete_response
        .json::<Value>()
        .await
        .expect("Failed to parse delete product response JSON");
    assert_eq!(
        body["error"].as_str(),
        Some("Product cannot be deleted because it is associated with an order item.")
    );
}

#[tokio::test]
async fn test_orders_are_scoped_to_their_customer() {
    let base = common::spawn_app().await;
    let client = reqwest::Client::new();
    let admin = common::admin_token(&client, &base).await;

    let collection_id = common::create_collection(&client, &base, &admin, "Beverages").await;
    let product_id =
        common::create_product(&client, &base, &admin, collection_id, "Coffee", 10.0).await;

    let cart_id = common::create_cart(&client, &base).await;
    common::add_cart_item(&client, &base, &cart_id, product_id, 1).await;

    let user = common::user_token(&client, &base).await;
    let order = client
        .post(format!("{}/api/orders", base))
        .bearer_auth(&user)
        .json(&json!({ "cart_id": cart_id }))
        .send()
        .await
        .expect("Failed to send create order request")
        .json::<Value>()
        .await
        .expect("Failed to parse create order response JSON");
    let order_id = order["id"].as_i64().expect("Order id missing");

    // Another customer sees neither the list entry nor the detail.
    let register_response = client
        .post(format!("{}/register", base))
        .json(&json!({
            "username": "stranger",
            "password": "LongEnough1"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(register_response.status(), StatusCode::CREATED);
    let stranger = common::login(&client, &base, "stranger", "LongEnough1").await;

    let list = client
        .get(format!("{}/api/orders", base))
        .bearer_auth(&stranger)
        .send()
        .await
        .expect("Failed to send list orders request")
        .json::<Value>()
        .await
        .expect("Failed to parse list orders response JSON");
    assert_eq!(list.as_array().expect("Expected an array").len(), 0);

    let detail = client
        .get(format!("{}/api/orders/{}", base, order_id))
        .bearer_auth(&stranger)
        .send()
        .await
        .expect("Failed to send get order request");
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);

    // Admin sees everything.
    let admin_list = client
        .get(format!("{}/api/orders", base))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send list orders request")
        .json::<Value>()
        .await
        .expect("Failed to parse list orders response JSON");
    assert_eq!(admin_list.as_array().expect("Expected an array").len(), 1);
}

#[tokio::test]
async fn test_create_order_requires_authentication() {
    let base = common::spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/orders", base))
        .json(&json!({ "cart_id": Uuid::new_v4() }))
        .send()
        .await
        .expect("Failed to send create order request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_order_rejects_unknown_or_empty_cart() {
    let base = common::spawn_app().await;
    let client = reqwest::Client::new();
    let user = common::user_token(&client, &base).await;

    let unknown = client
        .post(format!("{}/api/orders", base))
        .bearer_auth(&user)
        .json(&json!({ "cart_id": Uuid::new_v4() }))
        .send()
        .await
        .expect("Failed to send create order request");
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

    let body = unknown
        .json::<Value>()
        .await
        .expect("Failed to parse create order response JSON");
    assert_eq!(
        body["error"].as_str(),
        Some("No cart with the given ID was found.")
    );

    let cart_id = common::create_cart(&client, &base).await;
    let empty = client
        .post(format!("{}/api/orders", base))
        .bearer_auth(&user)
        .json(&json!({ "cart_id": cart_id }))
        .send()
        .await
        .expect("Failed to send create order request");
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let body = empty
        .json::<Value>()
        .await
        .expect("Failed to parse create order response JSON");
    assert_eq!(body["error"].as_str(), Some("The cart is empty."));
}

#[tokio::test]
async fn test_admin_updates_payment_status() {
    let base = common::spawn_app().await;
    let client = reqwest::Client::new();
    let admin = common::admin_token(&client, &base).await;

    let collection_id = common::create_collection(&client, &base, &admin, "Beverages").await;
    let product_id =
        common::create_product(&client, &base, &admin, collection_id, "Coffee", 10.0).await;

    let cart_id = common::create_cart(&client, &base).await;
    common::add_cart_item(&client, &base, &cart_id, product_id, 1).await;

    let user = common::user_token(&client, &base).await;
    let order = client
        .post(format!("{}/api/orders", base))
        .bearer_auth(&user)
        .json(&json!({ "cart_id": cart_id }))
        .send()
        .await
        .expect("Failed to send create order request")
        .json::<Value>()
        .await
        .expect("Failed to parse create order response JSON");
    let order_id = order["id"].as_i64().expect("Order id missing");

    let forbidden = client
        .patch(format!("{}/api/orders/{}", base, order_id))
        .bearer_auth(&user)
        .json(&json!({ "payment_status": "C" }))
        .send()
        .await
        .expect("Failed to send patch order request");
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let patched = client
        .patch(format!("{}/api/orders/{}", base, order_id))
        .bearer_auth(&admin)
        .json(&json!({ "payment_status": "C" }))
        .send()
        .await
        .expect("Failed to send patch order request");
    assert_eq!(patched.status(), StatusCode::OK);

    let body = patched
        .json::<Value>()
        .await
        .expect("Failed to parse patch order response JSON");
    assert_eq!(body["payment_status"].as_str(), Some("C"));
}
