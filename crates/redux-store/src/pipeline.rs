//! Dispatch pipeline
//!
//! ```text
//! dispatch(action)
//!   → MiddlewareLink(m0) → MiddlewareLink(m1) → ... → ActionDispatcher
//!                                                       lock, reduce, publish, notify
//! ```
//!
//! The chain is folded right-to-left once, when the store is built, so `m0`
//! is the outermost wrapper: pre-phases run in list order before the reducer,
//! post-phases in reverse order after it.

use crate::action::Action;
use crate::dispatcher::Next;
use crate::error::StoreError;
use crate::middleware::Middleware;
use crate::reducer::AsyncReducer;
use crate::store::Store;
use async_trait::async_trait;
use std::sync::Arc;

/// One step of the chain; `store` is passed in because the chain lives inside it
#[async_trait]
pub(crate) trait Link<S>: Send + Sync {
    async fn run(&self, store: &Store<S>, action: &dyn Action);
}

/// Hands the action to a middleware together with the rest of the chain
struct MiddlewareLink<S> {
    middleware: Arc<dyn Middleware<S>>,
    next: Box<dyn Link<S>>,
}

#[async_trait]
impl<S> Link<S> for MiddlewareLink<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn run(&self, store: &Store<S>, action: &dyn Action) {
        let next = Next::new(store, self.next.as_ref());
        if let Err(source) = self.middleware.invoke(store, &next, action).await {
            log::warn!("Middleware failed on {}: {:#}", action.type_name(), source);
            store.report_error(&StoreError::Middleware {
                action: action.type_name(),
                source,
            });
        }
    }
}

/// Innermost link: runs the reducer under the store's write lock
struct ActionDispatcher<S> {
    reducer: Arc<dyn AsyncReducer<S>>,
}

#[async_trait]
impl<S> Link<S> for ActionDispatcher<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn run(&self, store: &Store<S>, action: &dyn Action) {
        store.apply(self.reducer.as_ref(), action).await
    }
}

/// Immutable chain of links built from `(reducer, middlewares)`
pub(crate) struct Pipeline<S> {
    head: Box<dyn Link<S>>,
    middleware_count: usize,
}

impl<S> Pipeline<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(
        reducer: Arc<dyn AsyncReducer<S>>,
        middlewares: Vec<Arc<dyn Middleware<S>>>,
    ) -> Self {
        let middleware_count = middlewares.len();
        let terminal: Box<dyn Link<S>> = Box::new(ActionDispatcher { reducer });
        let head = middlewares
            .into_iter()
            .rev()
            .fold(terminal, |next, middleware| {
                Box::new(MiddlewareLink { middleware, next }) as Box<dyn Link<S>>
            });

        log::debug!("Built dispatch pipeline with {} middleware", middleware_count);
        Self {
            head,
            middleware_count,
        }
    }

    pub(crate) async fn run(&self, store: &Store<S>, action: &dyn Action) {
        self.head.run(store, action).await
    }

    pub(crate) fn middleware_count(&self) -> usize {
        self.middleware_count
    }
}
