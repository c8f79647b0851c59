//! Access to the todo store over HTTP.
//!
//! [`TodoApi`] is the seam the view reducer talks through; [`HttpTodoApi`]
//! is the real implementation and tests substitute their own.

use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use todo_list_core::model::{NewTodo, Stats, TodoId, TodoItem, TodoQuery, TodoUpdate};

/// Confirmation returned by a delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReceipt {
    /// Message from the store
    pub message: String,
    /// Number of todos removed
    pub deleted: usize,
}

/// Operations the client needs from the store
#[async_trait]
pub trait TodoApi: Send + Sync {
    /// Full collection
    async fn list(&self) -> Result<Vec<TodoItem>, ClientError>;

    /// Create a todo
    async fn add(&self, new: NewTodo) -> Result<TodoItem, ClientError>;

    /// Delete the todo with `id`
    async fn delete_by_id(&self, id: TodoId) -> Result<DeleteReceipt, ClientError>;

    /// Delete every todo titled exactly `title`
    async fn delete_by_title(&self, title: &str) -> Result<DeleteReceipt, ClientError>;

    /// Todos selected by `query`
    async fn search(&self, query: &TodoQuery) -> Result<Vec<TodoItem>, ClientError>;

    /// Change fields of the todo with `id`
    async fn update(&self, id: TodoId, update: TodoUpdate) -> Result<TodoItem, ClientError>;

    /// Totals over the collection
    async fn stats(&self) -> Result<Stats, ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// reqwest-backed [`TodoApi`]
#[derive(Clone, Debug)]
pub struct HttpTodoApi {
    client: Client,
    base_url: String,
}

impl HttpTodoApi {
    /// Client for the store at `base_url` (including any route prefix)
    ///
    /// Every request fails with [`ClientError::Transport`] after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn delete(&self, query: &TodoQuery) -> Result<DeleteReceipt, ClientError> {
        let response = self
            .client
            .delete(self.url("/todos/delete"))
            .query(&[query.as_param()])
            .send()
            .await?;
        decode(response).await
    }
}

/// Body of a success response, or the store's error as [`ClientError::Rejected`]
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();

    if status.is_success() {
        return response.json::<T>().await.map_err(ClientError::from);
    }

    let body = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody { code, message }) => (code, message),
        Err(_) => (format!("HTTP_{}", status.as_u16()), body),
    };

    tracing::debug!(status = status.as_u16(), %code, %message, "Store rejected request");
    Err(ClientError::Rejected {
        status: status.as_u16(),
        code,
        message,
    })
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list(&self) -> Result<Vec<TodoItem>, ClientError> {
        let response = self.client.get(self.url("/todos")).send().await?;
        decode(response).await
    }

    async fn add(&self, new: NewTodo) -> Result<TodoItem, ClientError> {
        let response = self
            .client
            .post(self.url("/todos/add"))
            .json(&new)
            .send()
            .await?;
        decode(response).await
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<DeleteReceipt, ClientError> {
        self.delete(&TodoQuery::Id(id)).await
    }

    async fn delete_by_title(&self, title: &str) -> Result<DeleteReceipt, ClientError> {
        self.delete(&TodoQuery::Title(title.to_string())).await
    }

    async fn search(&self, query: &TodoQuery) -> Result<Vec<TodoItem>, ClientError> {
        let response = self
            .client
            .get(self.url("/todos/search"))
            .query(&[query.as_param()])
            .send()
            .await?;
        decode(response).await
    }

    async fn update(&self, id: TodoId, update: TodoUpdate) -> Result<TodoItem, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/todos/update/{id}")))
            .json(&update)
            .send()
            .await?;
        decode(response).await
    }

    async fn stats(&self) -> Result<Stats, ClientError> {
        let response = self.client.get(self.url("/todos/stats")).send().await?;
        decode(response).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn item_json(id: u64, title: &str, checked: bool) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "description": "",
            "checked": checked,
            "created_at": "2025-01-01T00:00:00Z"
        })
    }

    async fn api(server: &MockServer) -> HttpTodoApi {
        HttpTodoApi::new(format!("{}/", server.uri()), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn list_decodes_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([item_json(1, "Buy milk", false)])),
            )
            .mount(&server)
            .await;

        let items = api(&server).await.list().await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Buy milk");
    }

    #[tokio::test]
    async fn legacy_is_checked_key_is_read() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 4,
                "title": "Old",
                "isChecked": true,
                "created_at": "2025-01-01T00:00:00Z"
            }])))
            .mount(&server)
            .await;

        let items = api(&server).await.list().await.unwrap();

        assert!(items[0].checked);
        assert_eq!(items[0].description, "");
    }

    #[tokio::test]
    async fn add_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/todos/add"))
            .and(body_json(json!({ "title": "Buy milk", "description": "" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(item_json(1, "Buy milk", false)))
            .expect(1)
            .mount(&server)
            .await;

        let item = api(&server).await.add(NewTodo::new("Buy milk")).await.unwrap();

        assert_eq!(item.id, TodoId::new(1));
    }

    #[tokio::test]
    async fn delete_and_search_use_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/todos/delete"))
            .and(query_param("id", "3"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "message": "ok", "deleted": 1 })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/todos/search"))
            .and(query_param("title", "milk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let api = api(&server).await;
        assert_eq!(api.delete_by_id(TodoId::new(3)).await.unwrap().deleted, 1);
        assert!(api
            .search(&TodoQuery::Title("milk".into()))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn error_body_becomes_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/todos/update/9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": "NOT_FOUND",
                "message": "Todo with id 9 not found"
            })))
            .mount(&server)
            .await;

        let err = api(&server)
            .await
            .update(TodoId::new(9), TodoUpdate::checked(true))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ClientError::Rejected {
                status: 404,
                code: "NOT_FOUND".into(),
                message: "Todo with id 9 not found".into(),
            }
        );
    }

    #[tokio::test]
    async fn plain_error_body_keeps_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos/stats"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = api(&server).await.stats().await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Rejected { status: 502, ref code, .. } if code == "HTTP_502"
        ));
    }

    #[tokio::test]
    async fn garbage_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = api(&server).await.list().await.unwrap_err();

        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn slow_store_times_out_as_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let api = HttpTodoApi::new(server.uri(), Duration::from_millis(50)).unwrap();
        let err = api.list().await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn unreachable_store_is_transport() {
        let api = HttpTodoApi::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        let err = api.list().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
