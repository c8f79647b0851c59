//! Router assembly and the serve loop.

use crate::api;
use crate::config::Config;
use crate::store::TodoStore;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::future::IntoFuture;
use std::time::Duration;
use tokio::net::TcpListener;
use todo_list_web::{correlation_id_layer, handlers::health_check};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the complete Axum router.
///
/// The todo routes are nested under `prefix` (empty mounts them at the
/// root); `/health` always stays at the root.
pub fn build_router(store: TodoStore, prefix: &str) -> Router {
    let todo_routes = Router::new()
        .route("/todos", get(api::list_todos))
        .route("/todos/add", post(api::add_todo))
        .route("/todos/delete", delete(api::delete_todos))
        .route("/todos/search", get(api::search_todos))
        .route("/todos/update/:id", put(api::update_todo))
        .route("/todos/stats", get(api::todo_stats));

    let router = Router::new().route("/health", get(health_check));
    let router = if prefix.is_empty() {
        router.merge(todo_routes)
    } else {
        router.nest(prefix, todo_routes)
    };

    router
        .with_state(store)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(correlation_id_layer())
}

/// Serve `store` on `listener` until `shutdown` resolves.
///
/// In-flight requests get `config.shutdown_timeout` to finish once the
/// signal fires.
///
/// # Errors
///
/// Returns an error if the server fails or does not drain in time.
pub async fn serve<F>(
    listener: TcpListener,
    store: TodoStore,
    config: &Config,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = build_router(store, &config.api_prefix);
    let timeout = config.shutdown_timeout;
    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown.await;
        tracing::info!("Shutdown signal received, draining requests");
        let _ = signalled_tx.send(());
    })
    .into_future();

    tokio::select! {
        result = server => result.map_err(anyhow::Error::from),
        () = drain_deadline(signalled_rx, timeout) => {
            anyhow::bail!("Timed out after {timeout:?} waiting for requests to finish")
        }
    }
}

/// Resolves `timeout` after the shutdown signal; never resolves without one.
async fn drain_deadline(signalled: tokio::sync::oneshot::Receiver<()>, timeout: Duration) {
    if signalled.await.is_ok() {
        tokio::time::sleep(timeout).await;
    } else {
        std::future::pending::<()>().await;
    }
}
