//! ThunkMiddleware - runs functions dispatched as actions

use super::{BoxFuture, Middleware};
use crate::action::Action;
use crate::dispatcher::Dispatcher;
use crate::store::Store;
use async_trait::async_trait;
use std::fmt;

type ThunkResult<'a> = BoxFuture<'a, anyhow::Result<()>>;

type ThunkFn<S> = dyn for<'a> Fn(&'a Store<S>, &'a dyn Dispatcher) -> ThunkResult<'a> + Send + Sync;

/// An action carrying an async function instead of data
///
/// [`ThunkMiddleware`] runs the function with the store and the rest of the
/// pipeline; the thunk itself never reaches the reducer.
///
/// ```rust
/// use redux_store::{Dispatcher, Thunk};
///
/// #[derive(Debug)]
/// struct Loaded(u32);
///
/// let load = Thunk::<u32>::new(|_store, next| {
///     Box::pin(async move {
///         next.invoke(&Loaded(42)).await;
///         anyhow::Ok(())
///     })
/// });
/// ```
pub struct Thunk<S> {
    run: Box<ThunkFn<S>>,
}

impl<S> Thunk<S> {
    pub fn new<F>(run: F) -> Self
    where
        F: for<'a> Fn(&'a Store<S>, &'a dyn Dispatcher) -> ThunkResult<'a> + Send + Sync + 'static,
    {
        Self { run: Box::new(run) }
    }
}

impl<S> fmt::Debug for Thunk<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thunk").finish_non_exhaustive()
    }
}

/// ThunkMiddleware - intercepts [`Thunk`] actions, forwards everything else
pub struct ThunkMiddleware;

impl ThunkMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ThunkMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> Middleware<S> for ThunkMiddleware
where
    S: Send + Sync + 'static,
{
    async fn invoke(
        &self,
        store: &Store<S>,
        next: &dyn Dispatcher,
        action: &dyn Action,
    ) -> anyhow::Result<()> {
        match action.downcast_ref::<Thunk<S>>() {
            Some(thunk) => (thunk.run)(store, next).await,
            None => {
                next.invoke(action).await;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StoreBuilder;
    use crate::observer::from_fn;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        count: i32,
    }

    #[derive(Debug)]
    struct Add(i32);

    fn reduce(mut state: Counter, action: &dyn Action) -> anyhow::Result<Counter> {
        if let Some(Add(amount)) = action.downcast_ref::<Add>() {
            state.count += amount;
        }
        Ok(state)
    }

    #[tokio::test]
    async fn test_thunk_dispatches_through_next() {
        let store = StoreBuilder::new(reduce)
            .use_middleware(ThunkMiddleware::new())
            .build()
            .await;

        store
            .dispatch(Thunk::new(|store: &Store<Counter>, next: &dyn Dispatcher| {
                Box::pin(async move {
                    next.invoke(&Add(2)).await;
                    let doubled = store.state().count * 2;
                    next.invoke(&Add(doubled)).await;
                    anyhow::Ok(())
                })
            }))
            .await;

        assert_eq!(store.state().count, 6);
    }

    #[tokio::test]
    async fn test_plain_actions_pass_through() {
        let store = StoreBuilder::new(reduce)
            .use_middleware(ThunkMiddleware::new())
            .build()
            .await;

        store.dispatch(Add(5)).await;
        assert_eq!(store.state().count, 5);
    }

    #[tokio::test]
    async fn test_failing_thunk_reports_error() {
        let store = StoreBuilder::new(reduce)
            .use_middleware(ThunkMiddleware::new())
            .build()
            .await;
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        let _subscription = store.subscribe(from_fn(|_: &Counter| {}).on_error(move |error| {
            sink.lock().unwrap().push(error.cause().to_string());
        }));

        store
            .dispatch(Thunk::new(|_store: &Store<Counter>, _next: &dyn Dispatcher| {
                Box::pin(async move { Err::<(), _>(anyhow::anyhow!("offline")) })
            }))
            .await;

        assert_eq!(*errors.lock().unwrap(), vec!["offline".to_string()]);
        assert_eq!(store.state().count, 0);
    }
}
