//! Middleware system
//!
//! Middleware sits between `dispatch` and the reducer, allowing side effects,
//! async operations, logging, and other cross-cutting concerns to be handled
//! in a composable way.
//!
//! ## Design
//!
//! ```text
//! Action → m0 → m1 → ... → Reducer → State → Observers
//!          ↑ pre-phase in order, post-phase in reverse order
//! ```
//!
//! Each middleware can:
//! - Inspect actions and state
//! - Forward, replace, repeat or swallow the action via `next`
//! - Dispatch new actions through the full pipeline via `store.dispatch`
//! - Perform async work before or after `next`
//!
//! Middleware is shared by every concurrent dispatch, so any internal state
//! must be synchronized by the middleware itself.
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use redux_store::{Action, Dispatcher, Middleware, Store};
//!
//! struct Tracing;
//!
//! #[async_trait]
//! impl<S: Send + Sync + 'static> Middleware<S> for Tracing {
//!     async fn invoke(
//!         &self,
//!         _store: &Store<S>,
//!         next: &dyn Dispatcher,
//!         action: &dyn Action,
//!     ) -> anyhow::Result<()> {
//!         log::debug!("before {:?}", action);
//!         next.invoke(action).await;
//!         log::debug!("after {:?}", action);
//!         Ok(())
//!     }
//! }
//! ```

use crate::action::Action;
use crate::dispatcher::Dispatcher;
use crate::store::Store;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

mod logging;
mod thunk;

pub use logging::{ActionHistory, LoggingMiddleware};
pub use thunk::{Thunk, ThunkMiddleware};

/// BoxFuture type alias for boxed async callbacks
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Middleware trait - handles actions before they reach the reducer
///
/// Returning `Err` does not fail the dispatch: the error is reported to the
/// store's observers and the dispatch completes normally. Whether the action
/// reached the reducer depends only on whether `next` was called.
#[async_trait]
pub trait Middleware<S>: Send + Sync {
    /// Handle an action
    ///
    /// - `store`: The store, for reading state or dispatching new actions
    /// - `next`: The rest of the pipeline
    /// - `action`: The action being dispatched
    async fn invoke(
        &self,
        store: &Store<S>,
        next: &dyn Dispatcher,
        action: &dyn Action,
    ) -> anyhow::Result<()>;
}
