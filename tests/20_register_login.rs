mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_then_login_round_trip() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let id = common::register(&client, &server.base_url, "roundtrip@example.com").await?;

    let res = client
        .post(format!("{}/auth", server.base_url))
        .json(&json!({ "email": "roundtrip@example.com", "password": "hunter22" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    let token = body["data"]["token"].as_str().expect("token");
    assert!(body["data"]["expiresIn"].as_i64().unwrap() > 0);
    assert_eq!(body["data"]["user"]["email"], "roundtrip@example.com");
    // The password hash never appears on the wire
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert!(body["data"]["user"].get("password_hash").is_none());

    // The issued token carries the id and mask embedded at creation
    let res = client
        .get(format!("{}/auth/whoami", server.base_url))
        .header("Authorization", common::bearer(token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["permissionFlags"], 1);
    assert_eq!(body["data"]["permissions"][0], "FREE");

    Ok(())
}

#[tokio::test]
async fn register_validates_body_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/users", server.base_url))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["email"], "Email is required");
    assert_eq!(body["field_errors"]["password"], "Password is required");

    let res = client
        .post(format!("{}/users", server.base_url))
        .json(&json!({ "email": "not-an-email", "password": "abc" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["field_errors"]["email"], "Invalid email format");
    assert!(body["field_errors"]["password"]
        .as_str()
        .unwrap()
        .contains("at least 5"));

    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicate_email() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    common::register(&client, &server.base_url, "dup@example.com").await?;

    let res = client
        .post(format!("{}/users", server.base_url))
        .json(&json!({ "email": "dup@example.com", "password": "hunter22" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "User email already exists");

    Ok(())
}

#[tokio::test]
async fn registration_ignores_requested_flags() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // A mask in the registration body must not carry over
    let res = client
        .post(format!("{}/users", server.base_url))
        .json(&json!({
            "email": "sneaky@example.com",
            "password": "hunter22",
            "permissionFlags": 7
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let token = common::login(&client, &server.base_url, "sneaky@example.com").await?;
    let res = client
        .get(format!("{}/auth/whoami", server.base_url))
        .header("Authorization", common::bearer(&token))
        .send()
        .await?;

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["permissionFlags"], 1);

    Ok(())
}

#[tokio::test]
async fn login_with_wrong_credentials_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    common::register(&client, &server.base_url, "locked@example.com").await?;

    for payload in [
        json!({ "email": "locked@example.com", "password": "wrong-password" }),
        json!({ "email": "nobody@example.com", "password": "hunter22" }),
    ] {
        let res = client
            .post(format!("{}/auth", server.base_url))
            .json(&payload)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["message"], "Invalid email and/or password");
        assert!(body.get("data").is_none());
    }

    // Missing fields report as field errors, not a credential failure
    let res = client
        .post(format!("{}/auth", server.base_url))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    Ok(())
}
