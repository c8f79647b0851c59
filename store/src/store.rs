//! Shared handle over the todo collection.

use crate::list::TodoList;
use std::sync::Arc;
use todo_list_core::environment::{Clock, SystemClock};
use todo_list_core::model::{
    NewTodo, Stats, TitleMatch, TodoId, TodoItem, TodoQuery, TodoUpdate,
};
use todo_list_core::TodoError;
use tokio::sync::RwLock;

/// Title rule for searches: case-insensitive substring
pub const SEARCH_MATCH: TitleMatch = TitleMatch::Contains;

/// Title rule for deletes: exact, so a delete never removes more than named
pub const DELETE_MATCH: TitleMatch = TitleMatch::Exact;

/// Cloneable handle to the in-memory collection
///
/// Created once at process start and held in the router state for the
/// lifetime of the server. Clones share the same list. Every operation takes
/// the lock once, so each call is applied atomically.
#[derive(Clone)]
pub struct TodoStore {
    list: Arc<RwLock<TodoList>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore").finish_non_exhaustive()
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl TodoStore {
    /// Empty store stamping records with `clock`
    #[must_use]
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            list: Arc::new(RwLock::new(TodoList::new())),
            clock: Arc::new(clock),
        }
    }

    /// Full collection in insertion order
    pub async fn list(&self) -> Vec<TodoItem> {
        self.list.read().await.items().to_vec()
    }

    /// Adds a todo
    ///
    /// # Errors
    ///
    /// [`TodoError::Validation`] when the title is blank or too long.
    pub async fn add(&self, new: NewTodo) -> Result<TodoItem, TodoError> {
        let at = self.clock.now();
        let item = self.list.write().await.add(&new, at)?;
        tracing::info!(id = %item.id, title = %item.title, "Todo added");
        Ok(item)
    }

    /// Removes the todo with `id`; returns how many were removed
    pub async fn delete_by_id(&self, id: TodoId) -> usize {
        self.delete(&TodoQuery::Id(id)).await
    }

    /// Removes every todo whose title equals `title` once trimmed
    pub async fn delete_by_title(&self, title: &str) -> usize {
        self.delete(&TodoQuery::Title(title.trim().to_string())).await
    }

    /// Removes whatever `query` selects under [`DELETE_MATCH`]
    pub async fn delete(&self, query: &TodoQuery) -> usize {
        let removed = self.list.write().await.remove(query, DELETE_MATCH);
        tracing::info!(%query, removed, "Todos deleted");
        removed
    }

    /// Todo with `id`, as a zero- or one-element list
    pub async fn search_by_id(&self, id: TodoId) -> Vec<TodoItem> {
        self.search(&TodoQuery::Id(id)).await
    }

    /// Todos whose title contains trimmed `title`, ignoring case
    ///
    /// A blank title matches nothing.
    pub async fn search_by_title(&self, title: &str) -> Vec<TodoItem> {
        self.search(&TodoQuery::Title(title.trim().to_string())).await
    }

    /// Whatever `query` selects under [`SEARCH_MATCH`]
    pub async fn search(&self, query: &TodoQuery) -> Vec<TodoItem> {
        self.list.read().await.find(query, SEARCH_MATCH)
    }

    /// Updates the fields present in `update`
    ///
    /// # Errors
    ///
    /// [`TodoError::Validation`] for an invalid title,
    /// [`TodoError::NotFound`] when no todo has `id`.
    pub async fn update_by_id(
        &self,
        id: TodoId,
        update: TodoUpdate,
    ) -> Result<TodoItem, TodoError> {
        let at = self.clock.now();
        let item = self.list.write().await.update(id, &update, at)?;
        tracing::info!(%id, checked = item.checked, "Todo updated");
        Ok(item)
    }

    /// Totals over the collection
    pub async fn stats(&self) -> Stats {
        self.list.read().await.stats()
    }

    /// Adds every valid todo in `items`, skipping the rest
    ///
    /// Returns the records that were added.
    pub async fn seed<I>(&self, items: I) -> Vec<TodoItem>
    where
        I: IntoIterator<Item = NewTodo>,
    {
        let at = self.clock.now();
        let mut list = self.list.write().await;

        items
            .into_iter()
            .filter_map(|new| match list.add(&new, at) {
                Ok(item) => Some(item),
                Err(error) => {
                    tracing::warn!(%error, title = %new.title, "Skipping seed todo");
                    None
                },
            })
            .collect()
    }
}

/// Demo todos loaded when `TODO_SEED_DEMO` is set
#[must_use]
pub fn demo_todos() -> Vec<NewTodo> {
    vec![
        NewTodo::new("Learn Rust").with_description("Ownership, borrowing and lifetimes"),
        NewTodo::new("Go Shopping").with_description("Buy milk, bread, and cheese"),
        NewTodo::new("Read Book").with_description("Read a chapter of \"Clean Code\""),
        NewTodo::new("Fix Bugs").with_description("Fix UI and backend bugs"),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use todo_list_testing::test_clock;

    fn store() -> TodoStore {
        TodoStore::new(test_clock())
    }

    #[tokio::test]
    async fn add_then_list_then_delete() {
        let store = store();
        let item = store.add(NewTodo::new("Buy milk")).await.unwrap();

        assert_eq!(item.id, TodoId::new(1));
        assert_eq!(item.title, "Buy milk");
        assert_eq!(item.description, "");
        assert_eq!(store.list().await, vec![item.clone()]);

        assert_eq!(store.delete_by_id(item.id).await, 1);
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn empty_title_rejected_and_list_unchanged() {
        let store = store();
        let err = store.add(NewTodo::new("")).await.unwrap_err();

        assert!(matches!(err, TodoError::Validation(_)));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn search_by_id_after_add() {
        let store = store();
        store.add(NewTodo::new("a")).await.unwrap();
        let b = store.add(NewTodo::new("b")).await.unwrap();

        let found = store.search_by_id(b.id).await;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, b.id);
        assert!(store.search_by_id(TodoId::new(99)).await.is_empty());
    }

    #[tokio::test]
    async fn search_is_partial_but_delete_is_exact() {
        let store = store();
        store.add(NewTodo::new("Read book")).await.unwrap();

        assert_eq!(store.search_by_title("read").await.len(), 1);
        assert_eq!(store.delete_by_title("read").await, 0);
        assert_eq!(store.delete_by_title("Read book").await, 1);
    }

    #[tokio::test]
    async fn padded_title_matches_what_was_stored() {
        let store = store();
        let item = store.add(NewTodo::new(" Buy milk ")).await.unwrap();
        assert_eq!(item.title, "Buy milk");

        assert_eq!(store.search_by_title(" milk ").await, vec![item]);
        assert_eq!(store.delete_by_title(" Buy milk ").await, 1);
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn blank_title_search_finds_nothing() {
        let store = store();
        store.add(NewTodo::new("a")).await.unwrap();
        store.add(NewTodo::new("b")).await.unwrap();

        assert!(store.search_by_title("").await.is_empty());
        assert!(store.search_by_title("   ").await.is_empty());
        assert_eq!(store.delete_by_title(" ").await, 0);
    }

    #[tokio::test]
    async fn toggle_reflected_in_list() {
        let store = store();
        let item = store.add(NewTodo::new("a")).await.unwrap();

        store
            .update_by_id(item.id, TodoUpdate::checked(true))
            .await
            .unwrap();

        assert!(store.list().await[0].checked);
        assert_eq!(store.stats().await, Stats { total: 1, completed: 1 });
        assert_eq!(
            store
                .update_by_id(TodoId::new(5), TodoUpdate::checked(true))
                .await
                .unwrap_err(),
            TodoError::NotFound(TodoId::new(5))
        );
    }

    #[tokio::test]
    async fn clones_share_the_list() {
        let store = store();
        let other = store.clone();
        other.add(NewTodo::new("shared")).await.unwrap();

        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn seed_skips_invalid() {
        let store = store();
        let mut items = demo_todos();
        items.push(NewTodo::new(" "));

        let added = store.seed(items).await;

        assert_eq!(added.len(), demo_todos().len());
        assert_eq!(store.list().await.len(), demo_todos().len());
    }
}
