//! Domain errors for todo operations.

use crate::model::TodoId;
use thiserror::Error;

/// Errors produced by the authoritative todo rules.
///
/// Transport failures are not represented here: they belong to the client,
/// which never reaches the rules when the store is unreachable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// The request payload broke a validation rule (e.g. empty title)
    #[error("{0}")]
    Validation(String),

    /// No record carries the requested id
    #[error("Todo with id {0} not found")]
    NotFound(TodoId),
}

impl TodoError {
    /// Stable machine-readable code used in HTTP error bodies
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }
}
