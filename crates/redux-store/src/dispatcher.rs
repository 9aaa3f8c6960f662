//! Dispatcher - a link in the dispatch pipeline
//!
//! Middleware receives the rest of the pipeline as a `&dyn Dispatcher` and
//! decides whether, when and how often to call it:
//! - zero times to swallow the action
//! - once to pass it through (the common case)
//! - several times to fan out or replay
//!
//! A call to `invoke` completes once the rest of the pipeline has run. It
//! never fails: reducer and middleware errors further down are delivered to
//! the store's observers instead of being returned here.

use crate::action::Action;
use crate::pipeline::Link;
use crate::store::Store;
use async_trait::async_trait;

/// Accepts an action and runs it through the remainder of the pipeline
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn invoke(&self, action: &dyn Action);
}

/// The part of the pipeline after one middleware, bound to its store
pub(crate) struct Next<'a, S> {
    store: &'a Store<S>,
    link: &'a dyn Link<S>,
}

impl<'a, S> Next<'a, S> {
    pub(crate) fn new(store: &'a Store<S>, link: &'a dyn Link<S>) -> Self {
        Self { store, link }
    }
}

#[async_trait]
impl<'a, S> Dispatcher for Next<'a, S>
where
    S: Send + Sync + 'static,
{
    async fn invoke(&self, action: &dyn Action) {
        self.link.run(self.store, action).await
    }
}
