//! # Todo Client
//!
//! Talks to the todo store over HTTP and keeps a local, refresh-after-mutation
//! view of the collection.
//!
//! - [`api`]: the [`TodoApi`] trait and its reqwest implementation
//! - [`view`]: view state, actions and reducer
//! - [`cli`]: the `todo` command line, driving the view through a
//!   [`todo_list_runtime::Store`]
//!
//! ```ignore
//! let api = HttpTodoApi::new("http://localhost:8080", Duration::from_secs(10))?;
//! let env = TodoViewEnvironment::new(Arc::new(api), Some(Duration::from_secs(3)));
//! let store = Store::new(TodoViewState::default(), TodoViewReducer::new(), env);
//!
//! store
//!     .send_and_wait_for(TodoViewAction::Refresh, TodoViewAction::is_settled, timeout)
//!     .await?;
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod view;

pub use api::{DeleteReceipt, HttpTodoApi, TodoApi};
pub use config::{Config, ConfigError};
pub use error::ClientError;
