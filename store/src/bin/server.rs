//! Todo store server.
//!
//! # Usage
//!
//! ```bash
//! TODO_PORT=8080 TODO_SEED_DEMO=true cargo run --bin todo-store
//! ```

use anyhow::Context;
use todo_store::{demo_todos, serve, Config, TodoStore};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todo_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let addr = config.bind_addr()?;
    tracing::info!(
        %addr,
        prefix = %config.api_prefix,
        seed_demo = config.seed_demo,
        "Configuration loaded"
    );

    let store = TodoStore::default();
    if config.seed_demo {
        let seeded = store.seed(demo_todos()).await;
        tracing::info!(count = seeded.len(), "Demo todos loaded");
    }

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Todo store listening");

    serve(listener, store, &config, async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    })
    .await?;

    tracing::info!("Todo store stopped");
    Ok(())
}
