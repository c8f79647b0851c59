//! `todo`: command line client for the todo store.
//!
//! ```bash
//! TODO_API_URL=http://localhost:8080 todo add "Buy milk"
//! todo list
//! ```

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use todo_client::cli::{execute, Cli};
use todo_client::view::{TodoViewEnvironment, TodoViewReducer, TodoViewState};
use todo_client::{Config, HttpTodoApi};
use todo_list_runtime::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,todo_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    tracing::debug!(api_url = %config.api_url, "Configuration loaded");

    let api = HttpTodoApi::new(config.api_url.clone(), config.request_timeout)?;
    let env = TodoViewEnvironment::new(Arc::new(api), config.notice_ttl);
    let store = Store::new(TodoViewState::default(), TodoViewReducer::new(), env);

    // A mutation is two round trips (the call and the refresh).
    let wait = config.request_timeout * 2 + std::time::Duration::from_secs(1);
    let output = execute(&store, &cli.command, wait).await?;
    print!("{output}");

    Ok(())
}
