//! # Todo Store
//!
//! The authoritative holder of the todo collection, exposed over HTTP.
//!
//! - [`list::TodoList`]: the owned collection and its never-reused id counter
//! - [`store::TodoStore`]: cloneable, lock-protected handle injected into the router
//! - [`api`]: axum handlers for `/todos/...`
//! - [`server`]: router assembly and graceful serving
//! - [`config`]: environment-driven configuration
//!
//! ```ignore
//! use todo_store::{build_router, TodoStore};
//!
//! let app = build_router(TodoStore::default(), "/api");
//! axum::serve(listener, app).await?;
//! ```

pub mod api;
pub mod config;
pub mod list;
pub mod server;
pub mod store;

pub use config::{Config, ConfigError};
pub use list::TodoList;
pub use server::{build_router, serve};
pub use store::{demo_todos, TodoStore};
