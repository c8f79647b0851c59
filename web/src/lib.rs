//! Axum building blocks for the todo list service.
//!
//! The HTTP shell around the todo store: request parsing and response
//! serialization live here, while the store itself stays free of HTTP
//! concerns.
//!
//! - [`AppError`] maps [`todo_list_core::TodoError`] and extractor rejections
//!   to `{ "code", "message" }` JSON bodies
//! - [`correlation_id_layer`] tags every request with an `X-Correlation-ID`
//! - [`handlers::health_check`] answers `GET /health`

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;

pub use error::{AppError, ErrorResponse};
pub use middleware::{correlation_id_layer, CORRELATION_ID_HEADER};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
