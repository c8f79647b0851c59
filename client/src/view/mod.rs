//! View state for the todo client.
//!
//! The client keeps a transient copy of the collection and re-fetches it in
//! full after every successful mutation. All transitions run through
//! [`TodoViewReducer`]; network calls are effects built from
//! [`TodoViewEnvironment::api`].

mod reducer;

pub use reducer::TodoViewReducer;

use crate::api::TodoApi;
use crate::error::ClientError;
use std::sync::Arc;
use std::time::Duration;
use todo_list_core::model::{Stats, TodoId, TodoItem, TodoQuery};

/// Where the local copy stands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request succeeded
    Ready,
    /// The last load failed; items are from before it
    Failed(String),
}

impl ViewStatus {
    /// True while a request is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// What the items currently show
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// The full collection
    #[default]
    All,
    /// Results of a search
    Search(TodoQuery),
}

/// Transient user-facing message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Distinguishes notices so a late dismissal cannot clear a newer one
    pub id: u64,
    /// Text shown to the user
    pub message: String,
}

/// State of the todo view
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoViewState {
    /// Local copy of the items on screen
    pub items: Vec<TodoItem>,
    /// Loading state
    pub status: ViewStatus,
    /// All items or search results
    pub mode: ViewMode,
    /// Current notice, if any
    pub notice: Option<Notice>,
    /// Id for the next notice
    pub next_notice_id: u64,
    /// Counts reported by the store, once fetched
    pub totals: Option<Stats>,
}

impl TodoViewState {
    /// Local item with `id`
    #[must_use]
    pub fn item(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// Everything that can happen in the view
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoViewAction {
    /// Fetch the full collection
    Refresh,
    /// Result of a full fetch
    Loaded(Result<Vec<TodoItem>, ClientError>),
    /// Add a todo
    SubmitAdd {
        /// Title as typed
        title: String,
        /// Description as typed
        description: String,
    },
    /// Delete by id
    SubmitDelete {
        /// Todo to delete
        id: TodoId,
    },
    /// Delete every todo with exactly this title
    SubmitDeleteByTitle {
        /// Title to match
        title: String,
    },
    /// Flip `checked` on a todo in the local copy
    SubmitToggle {
        /// Todo to toggle
        id: TodoId,
    },
    /// Rename a todo
    SubmitEdit {
        /// Todo to rename
        id: TodoId,
        /// New title
        title: String,
    },
    /// A mutation went through; triggers a refresh
    MutationSucceeded,
    /// A mutation was refused or could not be sent
    MutationFailed(ClientError),
    /// Replace the items with search results
    SubmitSearch(TodoQuery),
    /// Result of a search
    SearchLoaded {
        /// What was searched for
        query: TodoQuery,
        /// Matching items
        result: Result<Vec<TodoItem>, ClientError>,
    },
    /// Fetch completion counts from the store
    RefreshStats,
    /// Result of a counts fetch
    StatsLoaded(Result<Stats, ClientError>),
    /// Clear the notice with `id` if it is still showing
    DismissNotice {
        /// Notice to clear
        id: u64,
    },
}

impl TodoViewAction {
    /// True for the actions that end one user interaction
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(
            self,
            Self::Loaded(_)
                | Self::SearchLoaded { .. }
                | Self::StatsLoaded(_)
                | Self::MutationFailed(_)
        )
    }
}

/// Dependencies of the view reducer
#[derive(Clone)]
pub struct TodoViewEnvironment {
    /// Store access
    pub api: Arc<dyn TodoApi>,
    /// How long notices stay up; `None` keeps them until replaced
    pub notice_ttl: Option<Duration>,
}

impl TodoViewEnvironment {
    /// Environment over `api`
    #[must_use]
    pub fn new(api: Arc<dyn TodoApi>, notice_ttl: Option<Duration>) -> Self {
        Self { api, notice_ttl }
    }
}

impl std::fmt::Debug for TodoViewEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoViewEnvironment")
            .field("notice_ttl", &self.notice_ttl)
            .finish_non_exhaustive()
    }
}
