//! Reducer for the todo view.

use super::{Notice, TodoViewAction, TodoViewEnvironment, TodoViewState, ViewMode, ViewStatus};
use crate::error::ClientError;
use std::future::Future;
use todo_list_core::model::{validate_title, NewTodo, TodoQuery, TodoUpdate};
use todo_list_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Reducer for the todo view
///
/// Mutations never touch the local items: success triggers a full
/// [`TodoViewAction::Refresh`], failure raises a notice and leaves the items
/// as they were.
#[derive(Clone, Debug, Default)]
pub struct TodoViewReducer;

impl TodoViewReducer {
    /// Creates a new reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Runs a mutation and reports the outcome as an action
fn mutation<F, T>(fut: F) -> Effect<TodoViewAction>
where
    F: Future<Output = Result<T, ClientError>> + Send + 'static,
{
    Effect::future(async move {
        match fut.await {
            Ok(_) => TodoViewAction::MutationSucceeded,
            Err(error) => TodoViewAction::MutationFailed(error),
        }
    })
}

fn refused(message: impl Into<String>) -> Effect<TodoViewAction> {
    Effect::send(TodoViewAction::MutationFailed(ClientError::Validation(
        message.into(),
    )))
}

impl Reducer for TodoViewReducer {
    type State = TodoViewState;
    type Action = TodoViewAction;
    type Environment = TodoViewEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoViewAction::Refresh => {
                state.status = ViewStatus::Loading;
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    TodoViewAction::Loaded(api.list().await)
                })]
            },

            TodoViewAction::Loaded(Ok(items)) => {
                tracing::debug!(count = items.len(), "Todos loaded");
                state.items = items;
                state.mode = ViewMode::All;
                state.status = ViewStatus::Ready;
                smallvec![Effect::None]
            },

            TodoViewAction::Loaded(Err(error)) => {
                tracing::warn!(%error, "Failed to load todos");
                state.status = ViewStatus::Failed(error.to_string());
                smallvec![Effect::None]
            },

            TodoViewAction::SubmitAdd { title, description } => {
                match NewTodo::new(title).with_description(description).validate() {
                    Ok(new) => {
                        state.status = ViewStatus::Loading;
                        let api = env.api.clone();
                        smallvec![mutation(async move { api.add(new).await })]
                    },
                    Err(error) => smallvec![refused(error.to_string())],
                }
            },

            TodoViewAction::SubmitDelete { id } => {
                state.status = ViewStatus::Loading;
                let api = env.api.clone();
                smallvec![mutation(async move { api.delete_by_id(id).await })]
            },

            TodoViewAction::SubmitDeleteByTitle { title } => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return smallvec![refused("Enter the title of the todo to delete")];
                }
                state.status = ViewStatus::Loading;
                let api = env.api.clone();
                smallvec![mutation(async move { api.delete_by_title(&title).await })]
            },

            TodoViewAction::SubmitToggle { id } => {
                let Some(item) = state.item(id) else {
                    return smallvec![refused(format!("Todo {id} is not in the list"))];
                };
                let update = TodoUpdate::checked(!item.checked);
                state.status = ViewStatus::Loading;
                let api = env.api.clone();
                smallvec![mutation(async move { api.update(id, update).await })]
            },

            TodoViewAction::SubmitEdit { id, title } => match validate_title(&title) {
                Ok(title) => {
                    state.status = ViewStatus::Loading;
                    let api = env.api.clone();
                    smallvec![mutation(async move {
                        api.update(id, TodoUpdate::title(title)).await
                    })]
                },
                Err(error) => smallvec![refused(error.to_string())],
            },

            TodoViewAction::MutationSucceeded => {
                smallvec![Effect::send(TodoViewAction::Refresh)]
            },

            TodoViewAction::MutationFailed(error) => {
                tracing::warn!(%error, "Todo mutation failed");
                if state.status.is_loading() {
                    state.status = ViewStatus::Ready;
                }

                let id = state.next_notice_id;
                state.next_notice_id += 1;
                state.notice = Some(Notice {
                    id,
                    message: error.notice().to_string(),
                });

                match env.notice_ttl {
                    Some(duration) => smallvec![Effect::Delay {
                        duration,
                        action: Box::new(TodoViewAction::DismissNotice { id }),
                    }],
                    None => smallvec![Effect::None],
                }
            },

            TodoViewAction::SubmitSearch(query) => {
                let query = match query {
                    TodoQuery::Title(title) => match TodoQuery::title(&title) {
                        Ok(query) => query,
                        Err(_) => return smallvec![refused("Enter part of a title to search for")],
                    },
                    by_id @ TodoQuery::Id(_) => by_id,
                };
                state.status = ViewStatus::Loading;
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let result = api.search(&query).await;
                    TodoViewAction::SearchLoaded { query, result }
                })]
            },

            TodoViewAction::SearchLoaded { query, result } => {
                match result {
                    Ok(items) => {
                        tracing::debug!(%query, count = items.len(), "Search finished");
                        state.items = items;
                        state.mode = ViewMode::Search(query);
                        state.status = ViewStatus::Ready;
                    },
                    Err(error) => {
                        tracing::warn!(%query, %error, "Search failed");
                        state.status = ViewStatus::Failed(error.to_string());
                    },
                }
                smallvec![Effect::None]
            },

            TodoViewAction::RefreshStats => {
                state.status = ViewStatus::Loading;
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    TodoViewAction::StatsLoaded(api.stats().await)
                })]
            },

            TodoViewAction::StatsLoaded(Ok(stats)) => {
                state.totals = Some(stats);
                state.status = ViewStatus::Ready;
                smallvec![Effect::None]
            },

            TodoViewAction::StatsLoaded(Err(error)) => {
                tracing::warn!(%error, "Failed to load stats");
                state.status = ViewStatus::Failed(error.to_string());
                smallvec![Effect::None]
            },

            TodoViewAction::DismissNotice { id } => {
                if state.notice.as_ref().is_some_and(|notice| notice.id == id) {
                    state.notice = None;
                }
                smallvec![Effect::None]
            },
        }
    }
}
