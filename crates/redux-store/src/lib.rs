//! Predictable state container with a middleware pipeline
//!
//! This crate provides:
//! - A thread-safe [`Store`] holding a single immutable state value
//! - Pure [`Reducer`]s (and [`AsyncReducer`]s) computing the next state
//! - A composable [`Middleware`] chain wrapped around every dispatch
//! - [`Observer`] subscriptions notified after each state change
//!
//! # Architecture
//!
//! ```text
//! dispatch(action)
//!        │
//!        ▼
//! ┌──────────────┐   ┌──────────────┐        ┌──────────────────┐
//! │ middleware 0 │──►│ middleware 1 │──►...──│ ActionDispatcher │
//! └──────────────┘   └──────────────┘        └──────────────────┘
//!                                                      │ reduce + publish
//!                                                      ▼
//!                                            ┌──────────────────┐
//!                                            │    observers     │
//!                                            └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use redux_store::{Action, Dispatcher, StoreBuilder, StoreInitialized, Thunk, ThunkMiddleware};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Counter {
//!     count: i32,
//!     ready: bool,
//! }
//!
//! #[derive(Debug)]
//! struct Increment;
//!
//! fn reduce(mut state: Counter, action: &dyn Action) -> anyhow::Result<Counter> {
//!     if action.is::<StoreInitialized>() {
//!         state.ready = true;
//!     } else if action.is::<Increment>() {
//!         state.count += 1;
//!     }
//!     Ok(state)
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = StoreBuilder::new(reduce)
//!     .use_middleware(ThunkMiddleware::new())
//!     .build()
//!     .await;
//!
//! store.dispatch(Increment).await;
//! store
//!     .dispatch(Thunk::<Counter>::new(|_store, next| {
//!         Box::pin(async move {
//!             next.invoke(&Increment).await;
//!             anyhow::Ok(())
//!         })
//!     }))
//!     .await;
//!
//! let state = store.state();
//! assert!(state.ready);
//! assert_eq!(state.count, 2);
//! # }
//! ```

mod action;
mod builder;
mod dispatcher;
mod error;
pub mod middleware;
mod observable;
pub mod observer;
mod pipeline;
mod reducer;
mod store;
mod subscription;

pub use action::{Action, StandardAction, StoreInitialized};
pub use builder::{Bootstrap, Seeded, StoreBuilder};
pub use dispatcher::Dispatcher;
pub use error::StoreError;
pub use middleware::{
    ActionHistory, BoxFuture, LoggingMiddleware, Middleware, Thunk, ThunkMiddleware,
};
pub use observable::{DistinctUntilChanged, Observable, ObservableExt, Select};
pub use observer::{from_fn, FnObserver, Observer};
pub use reducer::{AsyncReducer, CombinedReducer, Reducer, SyncReducer};
pub use redux_store_config::{ConfigError, LoggingConfig, StoreConfig};
pub use store::Store;
pub use subscription::Subscription;
