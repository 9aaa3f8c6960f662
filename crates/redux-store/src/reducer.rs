//! Reducers - pure functions that produce new state from current state + action
//!
//! Reducers receive the state by value (the store hands over a clone of the
//! current snapshot) and return the next state. Unrecognized actions should
//! return the state unchanged; returning `Err` makes the dispatch fail
//! without publishing anything.

use crate::action::Action;
use async_trait::async_trait;

/// Synchronous reducer
pub trait Reducer<S>: Send + Sync {
    fn reduce(&self, state: S, action: &dyn Action) -> anyhow::Result<S>;
}

impl<S, F> Reducer<S> for F
where
    F: Fn(S, &dyn Action) -> anyhow::Result<S> + Send + Sync,
{
    fn reduce(&self, state: S, action: &dyn Action) -> anyhow::Result<S> {
        self(state, action)
    }
}

/// Asynchronous reducer
///
/// The store's write lock is held across the await, so a suspended reducer
/// keeps other reductions of the same store waiting without blocking a thread.
#[async_trait]
pub trait AsyncReducer<S>: Send + Sync {
    async fn reduce(&self, state: S, action: &dyn Action) -> anyhow::Result<S>;
}

/// Adapts a [`Reducer`] to the [`AsyncReducer`] interface used by the pipeline
pub struct SyncReducer<R>(pub R);

#[async_trait]
impl<S, R> AsyncReducer<S> for SyncReducer<R>
where
    S: Send + 'static,
    R: Reducer<S>,
{
    async fn reduce(&self, state: S, action: &dyn Action) -> anyhow::Result<S> {
        self.0.reduce(state, action)
    }
}

/// A reducer that combines multiple reducers into one
///
/// Reducers run in the order they were added, each receiving the state the
/// previous one produced. The first error aborts the chain.
pub struct CombinedReducer<S> {
    reducers: Vec<Box<dyn Reducer<S>>>,
}

impl<S> CombinedReducer<S> {
    pub fn new() -> Self {
        Self {
            reducers: Vec::new(),
        }
    }

    /// Append a reducer
    pub fn with<R: Reducer<S> + 'static>(mut self, reducer: R) -> Self {
        self.reducers.push(Box::new(reducer));
        self
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S> Default for CombinedReducer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Reducer<S> for CombinedReducer<S> {
    fn reduce(&self, state: S, action: &dyn Action) -> anyhow::Result<S> {
        self.reducers
            .iter()
            .try_fold(state, |state, reducer| reducer.reduce(state, action))
    }
}
