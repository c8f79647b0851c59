//! Router-level tests for the todo HTTP surface.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use todo_list_core::model::{Stats, TodoItem};
use todo_list_testing::test_clock;
use todo_list_web::{ErrorResponse, CORRELATION_ID_HEADER};
use todo_store::api::DeleteResponse;
use todo_store::{build_router, TodoStore};

fn server() -> TestServer {
    TestServer::new(build_router(TodoStore::new(test_clock()), "")).unwrap()
}

async fn add(server: &TestServer, title: &str) -> TodoItem {
    let response = server.post("/todos/add").json(&json!({ "title": title })).await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn add_list_delete_scenario() {
    let server = server();

    let created = add(&server, "Buy milk").await;
    assert_eq!(created.id.get(), 1);
    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.description, "");

    let items: Vec<TodoItem> = server.get("/todos").await.json();
    assert_eq!(items, vec![created]);

    let response = server
        .delete("/todos/delete")
        .add_query_param("id", 1)
        .await;
    response.assert_status_ok();
    let body: DeleteResponse = response.json();
    assert_eq!(body.deleted, 1);

    let items: Vec<TodoItem> = server.get("/todos").await.json();
    assert!(items.is_empty());
}

#[tokio::test]
async fn empty_title_is_422_and_list_unchanged() {
    let server = server();

    let response = server.post("/todos/add").json(&json!({ "title": "" })).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = response.json();
    assert_eq!(error.code, "VALIDATION_ERROR");

    let items: Vec<TodoItem> = server.get("/todos").await.json();
    assert!(items.is_empty());
}

#[tokio::test]
async fn malformed_body_is_400() {
    let server = server();

    let response = server
        .post("/todos/add")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error: ErrorResponse = response.json();
    assert_eq!(error.code, "BAD_REQUEST");
}

#[tokio::test]
async fn add_accepts_description() {
    let server = server();

    let response = server
        .post("/todos/add")
        .json(&json!({ "title": "Read", "description": "Clean Code" }))
        .await;

    let item: TodoItem = response.json();
    assert_eq!(item.description, "Clean Code");
    assert!(!item.checked);
}

#[tokio::test]
async fn delete_missing_id_is_success() {
    let server = server();
    add(&server, "keep").await;

    let response = server
        .delete("/todos/delete")
        .add_query_param("id", 42)
        .await;

    response.assert_status_ok();
    let body: DeleteResponse = response.json();
    assert_eq!(body.deleted, 0);

    let items: Vec<TodoItem> = server.get("/todos").await.json();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn delete_by_title_is_exact() {
    let server = server();
    add(&server, "Walk dog").await;

    let partial: DeleteResponse = server
        .delete("/todos/delete")
        .add_query_param("title", "Walk")
        .await
        .json();
    assert_eq!(partial.deleted, 0);

    let exact: DeleteResponse = server
        .delete("/todos/delete")
        .add_query_param("title", "Walk dog")
        .await
        .json();
    assert_eq!(exact.deleted, 1);
}

#[tokio::test]
async fn delete_with_padded_title_removes_trimmed_todo() {
    let server = server();
    let stored = add(&server, " Buy milk ").await;
    assert_eq!(stored.title, "Buy milk");

    let body: DeleteResponse = server
        .delete("/todos/delete")
        .add_query_param("title", " Buy milk ")
        .await
        .json();

    assert_eq!(body.deleted, 1);
    let items: Vec<TodoItem> = server.get("/todos").await.json();
    assert!(items.is_empty());
}

#[tokio::test]
async fn blank_title_criterion_is_400() {
    let server = server();
    add(&server, "a").await;
    add(&server, "b").await;

    let response = server.get("/todos/search").add_query_param("title", "").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let error: ErrorResponse = response.json();
    assert_eq!(error.code, "BAD_REQUEST");

    server
        .delete("/todos/delete")
        .add_query_param("title", "  ")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let items: Vec<TodoItem> = server.get("/todos").await.json();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn delete_and_search_need_exactly_one_param() {
    let server = server();

    server
        .delete("/todos/delete")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/todos/search")
        .add_query_param("id", 1)
        .add_query_param("title", "x")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/todos/search")
        .add_query_param("id", "abc")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_by_id_and_title() {
    let server = server();
    add(&server, "Buy milk").await;
    let dog = add(&server, "Walk dog").await;

    let by_id: Vec<TodoItem> = server
        .get("/todos/search")
        .add_query_param("id", dog.id.get())
        .await
        .json();
    assert_eq!(by_id, vec![dog]);

    let by_title: Vec<TodoItem> = server
        .get("/todos/search")
        .add_query_param("title", "MILK")
        .await
        .json();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].title, "Buy milk");

    let none: Vec<TodoItem> = server
        .get("/todos/search")
        .add_query_param("title", "cat")
        .await
        .json();
    assert!(none.is_empty());
}

#[tokio::test]
async fn toggle_then_list_and_stats() {
    let server = server();
    let item = add(&server, "a").await;
    add(&server, "b").await;

    let response = server
        .put(&format!("/todos/update/{}", item.id))
        .json(&json!({ "checked": true }))
        .await;
    response.assert_status_ok();
    let updated: TodoItem = response.json();
    assert!(updated.checked);
    assert!(updated.updated_at.is_some());

    let items: Vec<TodoItem> = server.get("/todos").await.json();
    assert!(items[0].checked);

    let stats: Stats = server.get("/todos/stats").await.json();
    assert_eq!(stats, Stats { total: 2, completed: 1 });
}

#[tokio::test]
async fn update_accepts_legacy_is_checked_key() {
    let server = server();
    let item = add(&server, "a").await;

    let updated: TodoItem = server
        .put(&format!("/todos/update/{}", item.id))
        .json(&json!({ "isChecked": true }))
        .await
        .json();

    assert!(updated.checked);
}

#[tokio::test]
async fn update_unknown_id_is_404() {
    let server = server();

    let response = server
        .put("/todos/update/9")
        .json(&json!({ "checked": true }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let error: ErrorResponse = response.json();
    assert_eq!(error.code, "NOT_FOUND");
    assert_eq!(error.message, "Todo with id 9 not found");
}

#[tokio::test]
async fn update_blank_title_is_422() {
    let server = server();
    let item = add(&server, "a").await;

    server
        .put(&format!("/todos/update/{}", item.id))
        .json(&json!({ "title": "  " }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_non_numeric_id_is_400() {
    server()
        .put("/todos/update/abc")
        .json(&json!({ "checked": true }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ids_never_reused() {
    let server = server();
    add(&server, "a").await;
    let b = add(&server, "b").await;

    server
        .delete("/todos/delete")
        .add_query_param("id", b.id.get())
        .await
        .assert_status_ok();

    let c = add(&server, "c").await;
    assert_eq!(c.id.get(), 3);
}

#[tokio::test]
async fn health_and_correlation_header() {
    let server = server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("ok");
    assert!(!response.header(CORRELATION_ID_HEADER).is_empty());
}

#[tokio::test]
async fn prefix_mounts_todo_routes() {
    let server =
        TestServer::new(build_router(TodoStore::new(test_clock()), "/api")).unwrap();

    let items: Value = server.get("/api/todos").await.json();
    assert_eq!(items, json!([]));

    server.get("/todos").await.assert_status_not_found();
    server.get("/health").await.assert_status_ok();
}
