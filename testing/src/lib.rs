//! # Todo List Testing
//!
//! Testing utilities and helpers for reducer-driven code.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - The `ReducerTest` Given-When-Then harness
//! - Assertion helpers for reducer effects
//! - Fixture builders for todo records
//!
//! ## Example
//!
//! ```ignore
//! use todo_list_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(TodoViewReducer::new())
//!     .with_env(test_environment())
//!     .given_state(TodoViewState::default())
//!     .when_action(TodoViewAction::Refresh)
//!     .then_state(|state| assert!(state.status.is_loading()))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use todo_list_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions, collect_actions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_list_testing::mocks::FixedClock;
    /// use todo_list_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }
}

/// Fixture builders for todo records
pub mod fixtures {
    use super::mocks::test_clock;
    use todo_list_core::environment::Clock;
    use todo_list_core::model::{TodoId, TodoItem};

    /// An unchecked todo stamped with the test clock
    #[must_use]
    pub fn todo(id: u64, title: &str) -> TodoItem {
        TodoItem::new(
            TodoId::new(id),
            title.to_string(),
            String::new(),
            test_clock().now(),
        )
    }

    /// A checked todo stamped with the test clock
    #[must_use]
    pub fn done(id: u64, title: &str) -> TodoItem {
        let mut item = todo(id, title);
        item.checked = true;
        item
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
