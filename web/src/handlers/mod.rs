//! Handlers shared by every todo service router.

pub mod health;

pub use health::health_check;
