//! Integration tests for registration and login.
//!
//! These tests require a running API server and database; they skip
//! themselves unless `LOTUS_API_URL` is set. See the crate README.

use reqwest::StatusCode;
use serde_json::{Value, json};

use lotus_integration_tests::{api_base_url, client, unique_email};

#[tokio::test]
async fn register_then_login_roundtrip() {
    let Some(base) = api_base_url() else {
        return;
    };
    let client = client();

    let email = unique_email("roundtrip");
    let resp = client
        .post(format!("{base}/api/register"))
        .json(&json!({
            "name": "Test Customer",
            "email": email,
            "password": "a long enough password",
            "phone": "0900000001",
        }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("register response not JSON");
    assert_eq!(body["email"], email.as_str());
    // The stored password must never be retrievable in any form.
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let resp = client
        .post(format!("{base}/api/login"))
        .json(&json!({ "email": email, "password": "a long enough password" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("login response not JSON");
    assert_eq!(body["email"], email.as_str());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let Some(base) = api_base_url() else {
        return;
    };
    let client = client();

    let email = unique_email("duplicate");
    let payload = json!({
        "name": "First",
        "email": email,
        "password": "a long enough password",
    });

    let resp = client
        .post(format!("{base}/api/register"))
        .json(&payload)
        .send()
        .await
        .expect("first register failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base}/api/register"))
        .json(&payload)
        .send()
        .await
        .expect("second register failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let Some(base) = api_base_url() else {
        return;
    };
    let client = client();

    let email = unique_email("enumeration");
    client
        .post(format!("{base}/api/register"))
        .json(&json!({
            "name": "Target",
            "email": email,
            "password": "a long enough password",
        }))
        .send()
        .await
        .expect("register failed");

    let wrong_password = client
        .post(format!("{base}/api/login"))
        .json(&json!({ "email": email, "password": "wrong password here" }))
        .send()
        .await
        .expect("login failed");

    let unknown_email = client
        .post(format!("{base}/api/login"))
        .json(&json!({
            "email": unique_email("nobody"),
            "password": "wrong password here",
        }))
        .send()
        .await
        .expect("login failed");

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a: Value = wrong_password.json().await.expect("not JSON");
    let b: Value = unknown_email.json().await.expect("not JSON");
    assert_eq!(a, b, "login failures must not reveal whether the account exists");
}
