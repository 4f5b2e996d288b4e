mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use study_planner_api::cli::client::{ApiClient, RemoteError};

#[tokio::test]
async fn register_login_and_save_over_http() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::new();
    let credentials = json!({ "username": "alice", "password": "pw123" });

    let res = client
        .post(format!("{}/api/register", server.base_url))
        .json(&credentials)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let token_a = res.json::<Value>().await?["token"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/api/login", server.base_url))
        .json(&credentials)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let token_b = res.json::<Value>().await?["token"].as_str().unwrap().to_string();
    assert!(!token_a.is_empty() && !token_b.is_empty());

    let res = client
        .get(format!("{}/api/sections", server.base_url))
        .bearer_auth(&token_b)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([]));

    let plan = json!([{ "id": 1, "title": "T", "tasks": [] }]);
    let res = client
        .post(format!("{}/api/sections", server.base_url))
        .bearer_auth(&token_b)
        .json(&plan)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Saved with token B, visible with token A: both name the same user
    let res = client
        .get(format!("{}/api/sections", server.base_url))
        .bearer_auth(&token_a)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, plan);

    Ok(())
}

#[tokio::test]
async fn cli_client_talks_to_server() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let api = ApiClient::new(&server.base_url)?;

    assert_eq!(api.health().await?["status"], "ok");

    let token = api.register("carol", "pw789").await?;
    assert!(api.get_sections(&token).await?.is_empty());

    let err = api.register("carol", "pw789").await.unwrap_err();
    let remote = err.downcast_ref::<RemoteError>().expect("remote error");
    assert_eq!(remote.status, StatusCode::BAD_REQUEST);
    assert_eq!(remote.code.as_deref(), Some("DUPLICATE_USERNAME"));

    let err = api.get_sections("garbage").await.unwrap_err();
    let remote = err.downcast_ref::<RemoteError>().expect("remote error");
    assert_eq!(remote.status, StatusCode::FORBIDDEN);

    Ok(())
}
