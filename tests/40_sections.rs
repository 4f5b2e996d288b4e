mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn new_user_has_no_sections() {
    let app = common::test_app();
    let token = app.token_for("alice", "pw123").await;

    let (status, body) = app.send(Method::GET, "/api/sections", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn saved_sections_come_back_unchanged() {
    let app = common::test_app();
    let token = app.token_for("alice", "pw123").await;
    let plan = json!([
        {
            "id": 1,
            "title": "Math",
            "tasks": [{ "id": 1, "text": "Read ch.1", "completed": false, "notes": "" }]
        }
    ]);

    let (status, body) = app
        .send(Method::POST, "/api/sections", Some(&token), Some(plan.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Sections saved successfully");

    let (status, body) = app.send(Method::GET, "/api/sections", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, plan);
}

#[tokio::test]
async fn save_replaces_whole_list_and_keeps_order() {
    let app = common::test_app();
    let token = app.token_for("alice", "pw123").await;

    let first = json!([
        { "id": 1, "title": "Math", "tasks": [] },
        { "id": 2, "title": "Art", "tasks": [] }
    ]);
    app.send(Method::POST, "/api/sections", Some(&token), Some(first))
        .await;

    // Ids need not be unique or sorted; they are stored as given
    let second = json!([
        { "id": 9, "title": "History", "tasks": [] },
        { "id": 3, "title": "Biology", "tasks": [
            { "id": 2, "text": "Cells", "completed": true, "notes": "lab" },
            { "id": 2, "text": "Genes", "completed": false, "notes": "" }
        ] }
    ]);
    let (status, _) = app
        .send(Method::POST, "/api/sections", Some(&token), Some(second.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.send(Method::GET, "/api/sections", Some(&token), None).await;
    assert_eq!(body, second);
}

#[tokio::test]
async fn omitted_task_fields_take_defaults() {
    let app = common::test_app();
    let token = app.token_for("alice", "pw123").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/sections",
            Some(&token),
            Some(json!([
                { "id": 1, "title": "Empty" },
                { "id": 2, "title": "Math", "tasks": [{ "id": 1, "text": "Read" }] }
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.send(Method::GET, "/api/sections", Some(&token), None).await;
    assert_eq!(
        body,
        json!([
            { "id": 1, "title": "Empty", "tasks": [] },
            { "id": 2, "title": "Math", "tasks": [
                { "id": 1, "text": "Read", "completed": false, "notes": "" }
            ] }
        ])
    );
}

#[tokio::test]
async fn invalid_sections_body_is_rejected() {
    let app = common::test_app();
    let token = app.token_for("alice", "pw123").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/sections",
            Some(&token),
            Some(json!({ "sections": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/sections",
            Some(&token),
            Some(json!([{ "id": 1, "tasks": [] }])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was overwritten
    let (_, body) = app.send(Method::GET, "/api/sections", Some(&token), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn users_do_not_see_each_other() {
    let app = common::test_app();
    let alice = app.token_for("alice", "pw123").await;
    let bob = app.token_for("bob", "pw456").await;

    app.send(
        Method::POST,
        "/api/sections",
        Some(&alice),
        Some(json!([{ "id": 1, "title": "Alice only", "tasks": [] }])),
    )
    .await;

    let (_, body) = app.send(Method::GET, "/api/sections", Some(&bob), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn vanished_user_is_not_found() {
    let app = common::test_app();
    let token = app.token_for("alice", "pw123").await;
    let user_id = app.state.tokens.verify(&token).unwrap().user_id;
    app.store.remove(user_id).await.expect("user existed");

    let (status, body) = app.send(Method::GET, "/api/sections", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, _) = app
        .send(Method::POST, "/api/sections", Some(&token), Some(json!([])))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
