//! The `todo` command line.
//!
//! Each command is one user interaction with the view store: it dispatches
//! the matching action, waits until the interaction settles and renders the
//! resulting view state.

use crate::view::{
    TodoViewAction, TodoViewEnvironment, TodoViewReducer, TodoViewState, ViewMode, ViewStatus,
};
use clap::{Args, Parser, Subcommand};
use std::fmt::Write as _;
use std::time::Duration;
use todo_list_core::model::{TodoId, TodoQuery};
use todo_list_runtime::{Store, StoreError};

/// Store type the CLI drives
pub type ViewStore = Store<TodoViewState, TodoViewAction, TodoViewEnvironment, TodoViewReducer>;

/// Command line for the todo store
#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Manage todos on a todo store")]
pub struct Cli {
    /// Store base URL (overrides `TODO_API_URL`)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show all todos
    List,
    /// Add a todo
    Add {
        /// Title
        title: String,
        /// Optional description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Delete a todo by id
    Delete {
        /// Todo id
        id: u64,
    },
    /// Delete every todo with exactly this title
    DeleteTitle {
        /// Title to match
        title: String,
    },
    /// Flip a todo between done and not done
    Toggle {
        /// Todo id
        id: u64,
    },
    /// Rename a todo
    Edit {
        /// Todo id
        id: u64,
        /// New title
        title: String,
    },
    /// Search by id or title
    Search(SearchArgs),
    /// Show how many todos are done
    Stats,
}

/// Search criterion; exactly one is required
#[derive(Debug, Clone, PartialEq, Eq, Args)]
#[group(required = true, multiple = false)]
pub struct SearchArgs {
    /// Todo id
    #[arg(long)]
    pub id: Option<u64>,
    /// Part of a title, any case
    #[arg(long)]
    pub title: Option<String>,
}

impl SearchArgs {
    /// The criterion as a query
    #[must_use]
    pub fn query(&self) -> TodoQuery {
        match (&self.id, &self.title) {
            (Some(id), _) => TodoQuery::Id(TodoId::new(*id)),
            (None, title) => TodoQuery::Title(title.clone().unwrap_or_default()),
        }
    }
}

impl Command {
    /// Action that carries out this command
    #[must_use]
    pub fn action(&self) -> TodoViewAction {
        match self {
            Self::List => TodoViewAction::Refresh,
            Self::Stats => TodoViewAction::RefreshStats,
            Self::Add { title, description } => TodoViewAction::SubmitAdd {
                title: title.clone(),
                description: description.clone(),
            },
            Self::Delete { id } => TodoViewAction::SubmitDelete { id: TodoId::new(*id) },
            Self::DeleteTitle { title } => TodoViewAction::SubmitDeleteByTitle {
                title: title.clone(),
            },
            Self::Toggle { id } => TodoViewAction::SubmitToggle { id: TodoId::new(*id) },
            Self::Edit { id, title } => TodoViewAction::SubmitEdit {
                id: TodoId::new(*id),
                title: title.clone(),
            },
            Self::Search(args) => TodoViewAction::SubmitSearch(args.query()),
        }
    }

    /// True when the command reads the local copy before acting
    #[must_use]
    pub const fn needs_items(&self) -> bool {
        matches!(self, Self::Toggle { .. })
    }
}

/// Sends `action` and waits until the interaction it starts has settled
///
/// # Errors
///
/// Propagates [`StoreError`] from the store, including the timeout.
pub async fn dispatch(
    store: &ViewStore,
    action: TodoViewAction,
    wait: Duration,
) -> Result<TodoViewAction, StoreError> {
    store
        .send_and_wait_for(action, TodoViewAction::is_settled, wait)
        .await
}

/// Runs `command` against `store` and returns the text to print
///
/// # Errors
///
/// Propagates [`StoreError`] when the store does not settle in `wait`.
pub async fn execute(
    store: &ViewStore,
    command: &Command,
    wait: Duration,
) -> Result<String, StoreError> {
    if command.needs_items() {
        dispatch(store, TodoViewAction::Refresh, wait).await?;
    }
    dispatch(store, command.action(), wait).await?;

    let show_stats = matches!(command, Command::Stats);
    Ok(store.state(|state| render(state, show_stats)).await)
}

/// Text rendering of the view
#[must_use]
pub fn render(state: &TodoViewState, show_stats: bool) -> String {
    let mut out = String::new();

    if let Some(notice) = &state.notice {
        let _ = writeln!(out, "! {}", notice.message);
    }

    if let ViewStatus::Failed(reason) = &state.status {
        let _ = writeln!(out, "Could not reach the todo store: {reason}");
        return out;
    }

    if show_stats {
        match state.totals {
            Some(stats) => {
                let _ = writeln!(out, "{} of {} todos completed", stats.completed, stats.total);
            },
            None => out.push_str("No counts yet\n"),
        }
        return out;
    }

    if let ViewMode::Search(query) = &state.mode {
        let _ = writeln!(out, "Results for {query}:");
    }

    if state.items.is_empty() {
        out.push_str("No todos\n");
    }

    for item in &state.items {
        let mark = if item.checked { 'x' } else { ' ' };
        let _ = write!(out, "[{mark}] {:>3}  {}", item.id.get(), item.title);
        if !item.description.is_empty() {
            let _ = write!(out, " ({})", item.description);
        }
        out.push('\n');
    }

    out
}
