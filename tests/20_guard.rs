//! Guard behavior that is observable without a database or identity
//! provider: requests with no credentials must be rejected locally, before
//! any external call is attempted.

mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn admin_routes_reject_missing_session() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/admin/create-user", server.base_url))
        .json(&serde_json::json!({ "email": "a@b.com", "password": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "Unauthorized");

    let res = client
        .delete(format!("{}/api/admin/delete-user", server.base_url))
        .json(&serde_json::json!({ "id": "00000000-0000-0000-0000-000000000000" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn admin_routes_reject_garbage_session_cookie() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/admin/update-user", server.base_url))
        .header("cookie", "studio_session=not-a-jwt")
        .json(&serde_json::json!({ "id": "00000000-0000-0000-0000-000000000000" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn vendor_routes_reject_missing_bearer() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/vendors", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "Unauthorized");
    Ok(())
}

#[tokio::test]
async fn job_routes_reject_missing_bearer() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/jobs", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
