//! The owned todo collection.
//!
//! [`TodoList`] is a plain value with no locking and no clock; the
//! [`crate::store::TodoStore`] handle adds both.

use todo_list_core::model::{
    NewTodo, Stats, TitleMatch, TodoId, TodoItem, TodoQuery, TodoUpdate,
};
use todo_list_core::{DateTime, TodoError, Utc};

/// Ordered todo collection with its id counter
///
/// Ids come from `next_id`, which only ever grows: an id freed by a delete
/// is never handed out again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoList {
    items: Vec<TodoItem>,
    next_id: u64,
}

impl Default for TodoList {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoList {
    /// Empty list; the first id issued is 1
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// All items in insertion order
    #[must_use]
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Validates and appends a new item stamped with `at`
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for an invalid title; the list is
    /// left untouched and no id is consumed.
    pub fn add(&mut self, new: &NewTodo, at: DateTime<Utc>) -> Result<TodoItem, TodoError> {
        let NewTodo { title, description } = new.validate()?;

        let id = TodoId::new(self.next_id);
        self.next_id += 1;

        let item = TodoItem::new(id, title, description, at);
        self.items.push(item.clone());
        Ok(item)
    }

    /// Removes every item selected by `query`, returning how many went
    pub fn remove(&mut self, query: &TodoQuery, rule: TitleMatch) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !query.selects(item, rule));
        before - self.items.len()
    }

    /// Items selected by `query`, in list order
    #[must_use]
    pub fn find(&self, query: &TodoQuery, rule: TitleMatch) -> Vec<TodoItem> {
        self.items
            .iter()
            .filter(|item| query.selects(item, rule))
            .cloned()
            .collect()
    }

    /// Applies `update` to the item with `id`
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for an invalid title and
    /// [`TodoError::NotFound`] when no item has `id`.
    pub fn update(
        &mut self,
        id: TodoId,
        update: &TodoUpdate,
        at: DateTime<Utc>,
    ) -> Result<TodoItem, TodoError> {
        let update = update.validate()?;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(TodoError::NotFound(id))?;

        item.apply(update, at);
        Ok(item.clone())
    }

    /// Totals over the current items
    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats::of(&self.items)
    }
}
