use crate::action::{Action, StoreInitialized};
use crate::builder::StoreBuilder;
use crate::error::StoreError;
use crate::middleware::Middleware;
use crate::observer::Observer;
use crate::pipeline::Pipeline;
use crate::reducer::{AsyncReducer, Reducer, SyncReducer};
use crate::subscription::{ObserverList, Subscription};
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Store - holds application state and runs the dispatch pipeline
///
/// The store is a cheap handle: clones share the same state, pipeline and
/// observers, so it can be moved into spawned tasks.
///
/// - `dispatch` runs the action through every middleware, then the reducer
/// - reductions are serialized by an async-aware lock, one at a time per store
/// - `state` is a lock-free snapshot read and never sees a partial update
/// - observers are notified after each successful reduction, in
///   registration order, before `dispatch` completes
/// - failures are reported to observers, `dispatch` itself never fails
pub struct Store<S> {
    inner: Arc<StoreInner<S>>,
}

struct StoreInner<S> {
    state: ArcSwap<S>,
    /// Guards read-reduce-publish-notify; held across async reducers
    write_lock: Mutex<()>,
    observers: Arc<ObserverList<S>>,
    pipeline: Pipeline<S>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> Store<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Create a store with an explicit initial state and no middleware
    pub fn new<R: Reducer<S> + 'static>(reducer: R, initial_state: S) -> Self {
        Self::assemble(Arc::new(SyncReducer(reducer)), initial_state, Vec::new())
    }

    /// Create a store whose reducer computes the initial state
    ///
    /// Starts from `S::default()` and dispatches [`StoreInitialized`] once.
    pub async fn bootstrap<R: Reducer<S> + 'static>(reducer: R) -> Self
    where
        S: Default,
    {
        Self::bootstrap_with(Arc::new(SyncReducer(reducer)), Vec::new()).await
    }

    /// Start configuring a store with middleware
    pub fn builder<R: Reducer<S> + 'static>(reducer: R) -> StoreBuilder<S> {
        StoreBuilder::new(reducer)
    }

    /// Seed with `S::default()` and run `StoreInitialized` through the pipeline
    pub(crate) async fn bootstrap_with(
        reducer: Arc<dyn AsyncReducer<S>>,
        middlewares: Vec<Arc<dyn Middleware<S>>>,
    ) -> Self
    where
        S: Default,
    {
        let store = Self::assemble(reducer, S::default(), middlewares);
        log::debug!("No initial state given, dispatching StoreInitialized");
        store.dispatch(StoreInitialized).await;
        store
    }

    pub(crate) fn assemble(
        reducer: Arc<dyn AsyncReducer<S>>,
        state: S,
        middlewares: Vec<Arc<dyn Middleware<S>>>,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: ArcSwap::from_pointee(state),
                write_lock: Mutex::new(()),
                observers: ObserverList::new(),
                pipeline: Pipeline::new(reducer, middlewares),
            }),
        }
    }

    /// Dispatch an action through the middleware chain, then the reducer
    ///
    /// Completes once the pipeline has run and observers have been notified.
    /// Completion says nothing about whether the reducer recognized the
    /// action or failed; subscribe an error observer to learn about failures.
    pub async fn dispatch<A: Action>(&self, action: A) {
        self.dispatch_ref(&action).await
    }

    /// Dispatch an action by reference (useful when the action should not be moved)
    pub async fn dispatch_ref(&self, action: &dyn Action) {
        self.inner.pipeline.run(self, action).await
    }

    /// Current state snapshot
    pub fn state(&self) -> Arc<S> {
        self.inner.state.load_full()
    }

    /// Register an observer
    ///
    /// The observer only sees states produced after it subscribed; the current
    /// state is not replayed. Read it with [`state`](Self::state) if needed.
    pub fn subscribe<O: Observer<S> + 'static>(&self, observer: O) -> Subscription {
        self.inner.observers.subscribe(Box::new(observer))
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.observers.len()
    }

    pub fn middleware_count(&self) -> usize {
        self.inner.pipeline.middleware_count()
    }

    /// Terminal step of the pipeline
    pub(crate) async fn apply(&self, reducer: &dyn AsyncReducer<S>, action: &dyn Action) {
        let _guard = self.inner.write_lock.lock().await;

        let current = self.inner.state.load_full();
        match reducer.reduce(S::clone(&current), action).await {
            Ok(next) => {
                let next = Arc::new(next);
                self.inner.state.store(Arc::clone(&next));
                self.inner.observers.notify_next(&next);
            }
            Err(source) => {
                log::warn!("Reducer failed on {}: {:#}", action.type_name(), source);
                self.report_error(&StoreError::Reducer {
                    action: action.type_name(),
                    source,
                });
            }
        }
    }

    pub(crate) fn report_error(&self, error: &StoreError) {
        self.inner.observers.notify_error(error);
    }
}

impl<S: fmt::Debug + 'static> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.inner.state.load_full())
            .field("subscribers", &self.inner.observers.len())
            .finish_non_exhaustive()
    }
}
