//! Integration tests for cart admission control and checkout.
//!
//! These tests require a running API server and database; they skip
//! themselves unless `LOTUS_API_URL` is set. See the crate README.

use reqwest::{Client, StatusCode, multipart};
use serde_json::{Value, json};

use lotus_integration_tests::{api_base_url, client, unique_email};

/// Create a product with the given stock via the admin multipart endpoint.
async fn create_product(client: &Client, base: &str, stock: i32) -> i64 {
    let form = multipart::Form::new()
        .text("name", format!("Test Product {}", uuid::Uuid::new_v4()))
        .text("price", "25.00")
        .text("stock", stock.to_string());

    let resp = client
        .post(format!("{base}/api/products"))
        .multipart(form)
        .send()
        .await
        .expect("create product failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("product response not JSON");
    body["id"].as_i64().expect("product id missing")
}

/// Register a throwaway user and return their id.
async fn register_user(client: &Client, base: &str) -> i64 {
    let resp = client
        .post(format!("{base}/api/register"))
        .json(&json!({
            "name": "Cart Tester",
            "email": unique_email("cart"),
            "password": "a long enough password",
        }))
        .send()
        .await
        .expect("register failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("register response not JSON");
    body["id"].as_i64().expect("user id missing")
}

/// Fetch a product's live stock.
async fn live_stock(client: &Client, base: &str, product_id: i64) -> i64 {
    let resp = client
        .get(format!("{base}/api/products/{product_id}"))
        .send()
        .await
        .expect("get product failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("product response not JSON");
    body["stock"].as_i64().expect("stock missing")
}

/// The scenario from the design notes: stock 5, add 3, adding 3 more is
/// rejected without mutation, checkout of 3 commits and clears the cart.
#[tokio::test]
async fn admission_control_and_checkout_scenario() {
    let Some(base) = api_base_url() else {
        return;
    };
    let client = client();

    let product_id = create_product(&client, &base, 5).await;
    let user_id = register_user(&client, &base).await;

    // Add 3 of 5: accepted.
    let resp = client
        .post(format!("{base}/api/cart"))
        .json(&json!({ "user_id": user_id, "product_id": product_id, "quantity": 3 }))
        .send()
        .await
        .expect("cart add failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // 3 more would make 6 > 5: rejected, carrying the live numbers.
    let resp = client
        .post(format!("{base}/api/cart"))
        .json(&json!({ "user_id": user_id, "product_id": product_id, "quantity": 3 }))
        .send()
        .await
        .expect("cart add failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["available"], 5);
    assert_eq!(body["in_cart"], 3);

    // The rejection must not have mutated the cart.
    let resp = client
        .get(format!("{base}/api/cart/{user_id}"))
        .send()
        .await
        .expect("cart read failed");
    let cart: Value = resp.json().await.expect("cart not JSON");
    let lines = cart.as_array().expect("cart is not an array");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 3);

    // Checkout the 3 units.
    let resp = client
        .post(format!("{base}/api/checkout"))
        .json(&json!({
            "user_id": user_id,
            "customer_name": "Cart Tester",
            "customer_phone": "0900000002",
            "customer_address": "12 Test Lane",
            "items": [{ "product_id": product_id, "quantity": 3, "price": "25.00" }],
            "total": "75.00",
        }))
        .send()
        .await
        .expect("checkout failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("checkout response not JSON");
    assert!(body["order_id"].as_i64().is_some());

    // Stock reconciled and cart emptied.
    assert_eq!(live_stock(&client, &base, product_id).await, 2);

    let resp = client
        .get(format!("{base}/api/cart/{user_id}"))
        .send()
        .await
        .expect("cart read failed");
    let cart: Value = resp.json().await.expect("cart not JSON");
    assert_eq!(cart.as_array().map(Vec::len), Some(0));
}

/// A checkout exceeding live stock commits nothing at all.
#[tokio::test]
async fn oversized_checkout_is_all_or_nothing() {
    let Some(base) = api_base_url() else {
        return;
    };
    let client = client();

    let plentiful = create_product(&client, &base, 10).await;
    let scarce = create_product(&client, &base, 1).await;
    let user_id = register_user(&client, &base).await;

    let resp = client
        .post(format!("{base}/api/checkout"))
        .json(&json!({
            "user_id": user_id,
            "customer_name": "Greedy Tester",
            "customer_phone": "0900000003",
            "customer_address": "13 Test Lane",
            "items": [
                { "product_id": plentiful, "quantity": 2, "price": "25.00" },
                { "product_id": scarce, "quantity": 2, "price": "25.00" },
            ],
            "total": "100.00",
        }))
        .send()
        .await
        .expect("checkout failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The first line's decrement must have been rolled back with the rest.
    assert_eq!(live_stock(&client, &base, plentiful).await, 10);
    assert_eq!(live_stock(&client, &base, scarce).await, 1);

    // No order was recorded for this user.
    let resp = client
        .get(format!("{base}/api/orders"))
        .send()
        .await
        .expect("orders read failed");
    let orders: Value = resp.json().await.expect("orders not JSON");
    let mine = orders
        .as_array()
        .expect("orders is not an array")
        .iter()
        .filter(|order| order["user_id"] == user_id)
        .count();
    assert_eq!(mine, 0);
}

/// Setting a cart row to zero removes it.
#[tokio::test]
async fn zero_quantity_removes_the_cart_row() {
    let Some(base) = api_base_url() else {
        return;
    };
    let client = client();

    let product_id = create_product(&client, &base, 4).await;
    let user_id = register_user(&client, &base).await;

    let resp = client
        .post(format!("{base}/api/cart"))
        .json(&json!({ "user_id": user_id, "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("cart add failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let line: Value = resp.json().await.expect("cart line not JSON");
    let line_id = line["id"].as_i64().expect("cart line id missing");

    let resp = client
        .put(format!("{base}/api/cart/{line_id}"))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("cart update failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/api/cart/{user_id}"))
        .send()
        .await
        .expect("cart read failed");
    let cart: Value = resp.json().await.expect("cart not JSON");
    assert_eq!(cart.as_array().map(Vec::len), Some(0));
}
