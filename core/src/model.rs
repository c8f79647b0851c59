//! The todo data model.
//!
//! A todo list is an ordered collection of [`TodoItem`] records. Ids are issued
//! by the store and never reused; everything else is supplied by callers through
//! [`NewTodo`] and [`TodoUpdate`], which carry the one authoritative set of
//! validation rules.

use crate::error::TodoError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum title length in characters
pub const MAX_TITLE_LEN: usize = 500;

/// Unique identifier for a todo item
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Short title, never empty
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Whether the todo is done
    #[serde(default, alias = "isChecked")]
    pub checked: bool,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
    /// When the todo was last updated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    /// Creates a new, unchecked todo item
    #[must_use]
    pub const fn new(
        id: TodoId,
        title: String,
        description: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            checked: false,
            created_at,
            updated_at: None,
        }
    }

    /// Applies an already validated update
    ///
    /// `updated_at` only moves when a field is present in the update.
    pub fn apply(&mut self, update: TodoUpdate, at: DateTime<Utc>) {
        if update.is_empty() {
            return;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(checked) = update.checked {
            self.checked = checked;
        }
        self.updated_at = Some(at);
    }
}

/// Checks a title against the todo rules and returns it trimmed
///
/// # Errors
///
/// Returns [`TodoError::Validation`] if the title is blank or longer than
/// [`MAX_TITLE_LEN`] characters.
pub fn validate_title(title: &str) -> Result<String, TodoError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(TodoError::Validation(
            "Todo title cannot be empty".to_string(),
        ));
    }

    if title.chars().count() > MAX_TITLE_LEN {
        return Err(TodoError::Validation(format!(
            "Todo title too long (max {MAX_TITLE_LEN} characters)"
        )));
    }

    Ok(title.to_string())
}

/// Payload for adding a todo
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    /// Title of the todo
    #[serde(default)]
    pub title: String,
    /// Optional description, empty when omitted
    #[serde(default)]
    pub description: String,
}

impl NewTodo {
    /// Creates a payload with an empty description
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
        }
    }

    /// Sets the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validates the payload and returns its normalized form
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] if the title is invalid.
    pub fn validate(&self) -> Result<Self, TodoError> {
        Ok(Self {
            title: validate_title(&self.title)?,
            description: self.description.clone(),
        })
    }
}

/// Payload for updating a todo; absent fields are left untouched
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoUpdate {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New checked flag
    #[serde(default, alias = "isChecked", skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl TodoUpdate {
    /// Update that only sets the checked flag
    #[must_use]
    pub const fn checked(checked: bool) -> Self {
        Self {
            title: None,
            description: None,
            checked: Some(checked),
        }
    }

    /// Update that only renames the todo
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Returns true when no field would change
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.checked.is_none()
    }

    /// Validates the update and returns its normalized form
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] if a title is present and invalid.
    pub fn validate(&self) -> Result<Self, TodoError> {
        let title = self.title.as_deref().map(validate_title).transpose()?;
        Ok(Self {
            title,
            description: self.description.clone(),
            checked: self.checked,
        })
    }
}

/// How a title criterion is compared against stored titles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleMatch {
    /// Case-sensitive equality
    Exact,
    /// Case-insensitive substring containment
    Contains,
}

impl TitleMatch {
    /// Returns true when `title` satisfies `needle` under this rule
    ///
    /// The needle is trimmed like a stored title; a blank needle matches nothing.
    #[must_use]
    pub fn matches(self, title: &str, needle: &str) -> bool {
        let needle = needle.trim();
        if needle.is_empty() {
            return false;
        }
        match self {
            Self::Exact => title == needle,
            Self::Contains => title.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

/// Selects records by id or by title
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoQuery {
    /// Match the record with this id
    Id(TodoId),
    /// Match records by title
    Title(String),
}

impl TodoQuery {
    /// Title criterion, trimmed
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] when the title is blank.
    pub fn title(title: &str) -> Result<Self, TodoError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TodoError::Validation(
                "Title to match cannot be empty".to_string(),
            ));
        }
        Ok(Self::Title(title.to_string()))
    }

    /// Builds a query from optional `id`/`title` parameters
    ///
    /// Exactly one of the two must be given; a title is trimmed and must not
    /// be blank.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] when neither or both are present, or
    /// the title is blank.
    pub fn from_params(id: Option<TodoId>, title: Option<String>) -> Result<Self, TodoError> {
        match (id, title) {
            (Some(id), None) => Ok(Self::Id(id)),
            (None, Some(title)) => Self::title(&title),
            (None, None) => Err(TodoError::Validation(
                "Either 'id' or 'title' must be given".to_string(),
            )),
            (Some(_), Some(_)) => Err(TodoError::Validation(
                "Only one of 'id' or 'title' may be given".to_string(),
            )),
        }
    }

    /// Query-string pair for this criterion
    #[must_use]
    pub fn as_param(&self) -> (&'static str, String) {
        match self {
            Self::Id(id) => ("id", id.to_string()),
            Self::Title(title) => ("title", title.clone()),
        }
    }

    /// Returns true when `item` is selected by this query under `rule`
    #[must_use]
    pub fn selects(&self, item: &TodoItem, rule: TitleMatch) -> bool {
        match self {
            Self::Id(id) => item.id == *id,
            Self::Title(title) => rule.matches(&item.title, title),
        }
    }
}

impl std::fmt::Display for TodoQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={id}"),
            Self::Title(title) => write!(f, "title={title:?}"),
        }
    }
}

/// Counts over the collection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of todos
    pub total: usize,
    /// Number of checked todos
    pub completed: usize,
}

impl Stats {
    /// Computes counts for a slice of items
    #[must_use]
    pub fn of(items: &[TodoItem]) -> Self {
        Self {
            total: items.len(),
            completed: items.iter().filter(|t| t.checked).count(),
        }
    }
}
