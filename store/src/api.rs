//! HTTP handlers for the todo routes.
//!
//! Handlers translate between HTTP and [`TodoStore`] calls. Domain errors
//! become JSON error bodies through [`AppError`]; malformed requests
//! (unparseable JSON, bad query strings, non-numeric ids) are a 400.

use crate::store::TodoStore;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use todo_list_core::model::{NewTodo, Stats, TodoId, TodoItem, TodoQuery, TodoUpdate};
use todo_list_web::{AppError, WebResult};

/// `?id=` / `?title=` parameters for delete and search
///
/// `id` is kept as a string so a non-numeric value is reported with a
/// readable message instead of a generic deserializer error.
#[derive(Debug, Default, Deserialize)]
pub struct SelectParams {
    /// Record id
    pub id: Option<String>,
    /// Record title
    pub title: Option<String>,
}

impl SelectParams {
    /// Turns the parameters into a query; exactly one must be present
    ///
    /// # Errors
    ///
    /// 400 when neither or both are given, or `id` is not a number.
    pub fn into_query(self) -> WebResult<TodoQuery> {
        let id = self
            .id
            .map(|raw| {
                raw.parse::<TodoId>()
                    .map_err(|_| AppError::bad_request(format!("Invalid todo id: {raw:?}")))
            })
            .transpose()?;

        TodoQuery::from_params(id, self.title).map_err(|e| AppError::bad_request(e.to_string()))
    }
}

/// Body returned by the delete route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Human-readable confirmation
    pub message: String,
    /// Number of todos removed
    pub deleted: usize,
}

fn count(operation: &'static str) {
    metrics::counter!("todo_store_requests_total", "operation" => operation).increment(1);
}

/// `GET /todos`
pub async fn list_todos(State(store): State<TodoStore>) -> Json<Vec<TodoItem>> {
    count("list");
    Json(store.list().await)
}

/// `POST /todos/add`
///
/// # Errors
///
/// 400 for a malformed body, 422 for an invalid title.
pub async fn add_todo(
    State(store): State<TodoStore>,
    payload: Result<Json<NewTodo>, JsonRejection>,
) -> WebResult<(StatusCode, Json<TodoItem>)> {
    count("add");
    let Json(new) = payload?;
    let item = store.add(new).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `DELETE /todos/delete?id=` or `?title=`
///
/// Deleting nothing is still a success with `deleted: 0`.
///
/// # Errors
///
/// 400 when the parameters do not name exactly one criterion.
pub async fn delete_todos(
    State(store): State<TodoStore>,
    params: Result<Query<SelectParams>, QueryRejection>,
) -> WebResult<Json<DeleteResponse>> {
    count("delete");
    let Query(params) = params?;
    let query = params.into_query()?;

    let deleted = store.delete(&query).await;
    let message = if deleted == 0 {
        format!("No todo matched {query}")
    } else {
        format!("Deleted {deleted} todo(s) matching {query}")
    };

    Ok(Json(DeleteResponse { message, deleted }))
}

/// `GET /todos/search?id=` or `?title=`
///
/// # Errors
///
/// 400 when the parameters do not name exactly one criterion.
pub async fn search_todos(
    State(store): State<TodoStore>,
    params: Result<Query<SelectParams>, QueryRejection>,
) -> WebResult<Json<Vec<TodoItem>>> {
    count("search");
    let Query(params) = params?;
    let query = params.into_query()?;
    Ok(Json(store.search(&query).await))
}

/// `PUT /todos/update/:id`
///
/// # Errors
///
/// 400 for a bad id or body, 404 for an unknown id, 422 for an invalid title.
pub async fn update_todo(
    State(store): State<TodoStore>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<TodoUpdate>, JsonRejection>,
) -> WebResult<Json<TodoItem>> {
    count("update");
    let Path(id) = id?;
    let Json(update) = payload?;
    let item = store.update_by_id(TodoId::new(id), update).await?;
    Ok(Json(item))
}

/// `GET /todos/stats`
pub async fn todo_stats(State(store): State<TodoStore>) -> Json<Stats> {
    count("stats");
    Json(store.stats().await)
}
