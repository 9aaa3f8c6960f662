//! StoreBuilder - fluent store configuration
//!
//! ```rust
//! use redux_store::{Action, StoreBuilder, ThunkMiddleware};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Counter {
//!     count: i32,
//! }
//!
//! fn reduce(state: Counter, _action: &dyn Action) -> anyhow::Result<Counter> {
//!     Ok(state)
//! }
//!
//! # async fn example() {
//! let store = StoreBuilder::new(reduce)
//!     .with_initial_state(Counter { count: 1 })
//!     .use_middleware(ThunkMiddleware::new())
//!     .build()
//!     .await;
//! # }
//! ```

use crate::middleware::{LoggingMiddleware, Middleware};
use crate::reducer::{AsyncReducer, Reducer, SyncReducer};
use crate::store::Store;
use redux_store_config::{ConfigError, LoggingConfig};
use std::fmt::Debug;
use std::sync::Arc;

/// No initial state given: the store starts from `S::default()` and
/// dispatches `StoreInitialized` through the full pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct Bootstrap;

/// Explicit initial state, adopted as is
#[derive(Debug, Clone)]
pub struct Seeded<S>(S);

/// Accumulates a reducer, an optional initial state and an ordered
/// middleware list, then builds a [`Store`]
///
/// Only the [`Bootstrap`] flavour needs `S: Default`; once
/// [`with_initial_state`](Self::with_initial_state) was called any state type
/// can be built.
pub struct StoreBuilder<S, I = Bootstrap> {
    reducer: Arc<dyn AsyncReducer<S>>,
    initial: I,
    middlewares: Vec<Arc<dyn Middleware<S>>>,
}

impl<S> StoreBuilder<S, Bootstrap>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new<R: Reducer<S> + 'static>(reducer: R) -> Self {
        Self::from_async(SyncReducer(reducer))
    }

    pub fn from_async<R: AsyncReducer<S> + 'static>(reducer: R) -> Self {
        Self {
            reducer: Arc::new(reducer),
            initial: Bootstrap,
            middlewares: Vec::new(),
        }
    }

    /// Build the store, computing the initial state from `StoreInitialized`
    pub async fn build(self) -> Store<S>
    where
        S: Default,
    {
        Store::bootstrap_with(self.reducer, self.middlewares).await
    }
}

impl<S> StoreBuilder<S, Seeded<S>>
where
    S: Clone + Send + Sync + 'static,
{
    /// Build the store around the explicit initial state
    pub async fn build(self) -> Store<S> {
        let Seeded(state) = self.initial;
        Store::assemble(self.reducer, state, self.middlewares)
    }
}

impl<S, I> StoreBuilder<S, I>
where
    S: Clone + Send + Sync + 'static,
{
    /// Add or replace the initial state
    pub fn with_initial_state(self, initial_state: S) -> StoreBuilder<S, Seeded<S>> {
        StoreBuilder {
            reducer: self.reducer,
            initial: Seeded(initial_state),
            middlewares: self.middlewares,
        }
    }

    /// Append a middleware; the first one added is the outermost
    pub fn use_middleware<M: Middleware<S> + 'static>(self, middleware: M) -> Self {
        self.use_shared_middleware(Arc::new(middleware))
    }

    /// Append a middleware the caller keeps a handle to
    pub fn use_shared_middleware(mut self, middleware: Arc<dyn Middleware<S>>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Append a [`LoggingMiddleware`] configured from the `[logging]` section
    ///
    /// Does nothing when logging is disabled in the config.
    pub fn use_logging(self, config: &LoggingConfig) -> Result<Self, ConfigError>
    where
        S: Debug,
    {
        if !config.enabled {
            log::debug!("Action logging disabled by config");
            return Ok(self);
        }
        Ok(self.use_middleware(LoggingMiddleware::from_config(config)?))
    }

    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }
}
