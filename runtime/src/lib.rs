//! # Todo List Runtime
//!
//! Runtime that drives a reducer: it owns the state, runs the reducer for
//! every action and executes the effects the reducer returns.
//!
//! Actions produced by effects are reduced first and broadcast afterwards,
//! so a caller woken in [`Store::send_and_wait_for`] reads state that
//! already reflects the action it waited for.
//!
//! ## Example
//!
//! ```ignore
//! use todo_list_runtime::Store;
//!
//! let store = Store::new(TodoViewState::default(), TodoViewReducer::new(), env);
//!
//! store
//!     .send_and_wait_for(TodoViewAction::Refresh, TodoViewAction::is_settled, wait)
//!     .await?;
//!
//! let count = store.state(|s| s.items.len()).await;
//! ```

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use todo_list_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{RwLock, broadcast};

/// Capacity of the channel announcing actions produced by effects
const BROADCAST_CAPACITY: usize = 64;

/// Errors from waiting on a [`Store`]
#[derive(Error, Debug)]
pub enum StoreError {
    /// No matching action arrived before the timeout
    #[error("Timeout waiting for action")]
    Timeout,

    /// Action broadcast channel closed
    #[error("Action broadcast channel closed")]
    ChannelClosed,
}

/// Runtime coordinator for a reducer
///
/// Clones share state and the action channel.
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    /// Actions fed back by effects, sent after the reducer has run them
    actions: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        let (actions, _) = broadcast::channel(BROADCAST_CAPACITY);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            actions,
        }
    }

    /// Run the reducer for `action` and start the effects it returns
    ///
    /// Returns once the effects are spawned, not when they finish.
    #[tracing::instrument(skip_all, name = "store_send")]
    pub async fn send(&self, action: A) {
        metrics::counter!("store.actions.total").increment(1);

        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut *state, action, &self.environment)
        };
        tracing::trace!(count = effects.len(), "Reducer returned effects");

        for effect in effects {
            self.execute(effect);
        }
    }

    /// Send `action`, then wait for the first effect-produced action that
    /// matches `predicate`
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: nothing matched within `timeout`
    /// - [`StoreError::ChannelClosed`]: the action channel closed
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        // Subscribe first so a fast effect cannot slip past
        let mut rx = self.actions.subscribe();

        self.send(action).await;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Read current state via a closure
    ///
    /// The read lock is released as soon as the closure returns.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&*state)
    }

    /// Reduce an action produced by an effect, then announce it
    async fn feed_back(&self, action: A) {
        self.send(action.clone()).await;
        // No receivers is fine: nobody is waiting
        let _ = self.actions.send(action);
    }

    /// Spawn `effect`; a panicking effect only takes its own task down
    fn execute(&self, effect: Effect<A>) {
        match effect {
            Effect::None => {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Future(fut) => {
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                let store = self.clone();
                tokio::spawn(async move {
                    if let Some(action) = fut.await {
                        store.feed_back(action).await;
                    }
                });
            },
            Effect::Delay { duration, action } => {
                metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                let store = self.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(duration).await;
                    store.feed_back(*action).await;
                });
            },
        }
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            actions: self.actions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_list_core::{SmallVec, smallvec};

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        ProduceEffect,
        ProduceDelayedAction,
        ProducePanickingEffect,
        Settled(i32),
        RequestSettle,
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    smallvec![Effect::None]
                },
                TestAction::NoOp => smallvec![Effect::None],
                TestAction::ProduceEffect => {
                    smallvec![Effect::future(async { TestAction::Settled(7) })]
                },
                TestAction::ProduceDelayedAction => smallvec![Effect::Delay {
                    duration: Duration::from_millis(10),
                    action: Box::new(TestAction::Settled(-1)),
                }],
                #[allow(clippy::panic)] // the store must survive a panicking effect
                TestAction::ProducePanickingEffect => smallvec![Effect::Future(Box::pin(async {
                    panic!("effect panicked");
                }))],
                TestAction::RequestSettle => {
                    smallvec![Effect::send(TestAction::Settled(state.value + 100))]
                },
                TestAction::Settled(value) => {
                    state.value = value;
                    SmallVec::new()
                },
            }
        }
    }

    fn store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv)
    }

    fn is_settled(action: &TestAction) -> bool {
        matches!(action, TestAction::Settled(_))
    }

    #[tokio::test]
    async fn test_send_action() {
        let store = store();

        store.send(TestAction::Increment).await;
        store.send(TestAction::Increment).await;
        store.send(TestAction::Decrement).await;
        store.send(TestAction::NoOp).await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_effect_future_feeds_back() -> Result<(), StoreError> {
        let store = store();

        let settled = store
            .send_and_wait_for(TestAction::ProduceEffect, is_settled, Duration::from_secs(1))
            .await?;

        assert_eq!(settled, TestAction::Settled(7));
        assert_eq!(store.state(|s| s.value).await, 7);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_delay() -> Result<(), StoreError> {
        let store = store();
        store.send(TestAction::Increment).await;

        let settled = store
            .send_and_wait_for(
                TestAction::ProduceDelayedAction,
                is_settled,
                Duration::from_secs(1),
            )
            .await?;

        assert_eq!(settled, TestAction::Settled(-1));
        assert_eq!(store.state(|s| s.value).await, -1);
        Ok(())
    }

    #[tokio::test]
    async fn test_send_and_wait_for_sees_updated_state() -> Result<(), StoreError> {
        let store = store();
        store.send(TestAction::Increment).await;

        let settled = store
            .send_and_wait_for(TestAction::RequestSettle, is_settled, Duration::from_secs(1))
            .await?;

        assert_eq!(settled, TestAction::Settled(101));
        assert_eq!(store.state(|s| s.value).await, 101);
        Ok(())
    }

    #[tokio::test]
    async fn test_send_and_wait_for_times_out() {
        let store = store();

        let result = store
            .send_and_wait_for(TestAction::NoOp, is_settled, Duration::from_millis(20))
            .await;

        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn test_store_clone_shares_state() {
        let store1 = store();
        let store2 = store1.clone();

        store1.send(TestAction::Increment).await;
        assert_eq!(store2.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_effect_panic_isolation() -> Result<(), StoreError> {
        let store = store();

        store.send(TestAction::ProducePanickingEffect).await;

        // Store is still usable after an effect panicked
        let settled = store
            .send_and_wait_for(TestAction::RequestSettle, is_settled, Duration::from_secs(1))
            .await?;
        assert_eq!(settled, TestAction::Settled(100));
        Ok(())
    }
}
