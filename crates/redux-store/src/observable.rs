//! Stream combinators over store notifications
//!
//! ```rust
//! use redux_store::{observer, Action, Observable, ObservableExt, Store};
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
//! let store = Store::new(reduce, Counter::default());
//! let subscription = store
//!     .clone()
//!     .select(|state: &Counter| state.count)
//!     .distinct_until_changed()
//!     .subscribe(observer::from_fn(|count: &i32| println!("count = {count}")));
//! # drop(subscription);
//! ```

use crate::error::StoreError;
use crate::observer::Observer;
use crate::store::Store;
use crate::subscription::Subscription;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

/// A source of notifications that observers can subscribe to
pub trait Observable {
    type Item;

    fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: Observer<Self::Item> + 'static;
}

impl<S> Observable for Store<S>
where
    S: Clone + Send + Sync + 'static,
{
    type Item = S;

    fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: Observer<S> + 'static,
    {
        Store::subscribe(self, observer)
    }
}

/// Combinators available on every [`Observable`]
pub trait ObservableExt: Observable + Sized {
    /// Project each value into a new form
    fn select<U, F>(self, selector: F) -> Select<Self, F, U>
    where
        F: Fn(&Self::Item) -> U + Send + Sync + 'static,
    {
        Select {
            source: self,
            selector: Arc::new(selector),
            _item: PhantomData,
        }
    }

    /// Drop values equal to the previously forwarded one
    ///
    /// The first value is always forwarded.
    fn distinct_until_changed(
        self,
    ) -> DistinctUntilChanged<Self, fn(&Self::Item, &Self::Item) -> bool>
    where
        Self::Item: PartialEq + 'static,
    {
        self.distinct_until_changed_by(<Self::Item as PartialEq>::eq)
    }

    /// Like [`distinct_until_changed`](Self::distinct_until_changed) with a custom comparer
    fn distinct_until_changed_by<C>(self, comparer: C) -> DistinctUntilChanged<Self, C>
    where
        C: Fn(&Self::Item, &Self::Item) -> bool + Send + Sync + 'static,
    {
        DistinctUntilChanged {
            source: self,
            comparer: Arc::new(comparer),
        }
    }
}

impl<T: Observable> ObservableExt for T {}

/// Observable returned by [`ObservableExt::select`]
pub struct Select<Src, F, U> {
    source: Src,
    selector: Arc<F>,
    _item: PhantomData<fn() -> U>,
}

struct SelectObserver<F, O, U> {
    selector: Arc<F>,
    downstream: O,
    _item: PhantomData<fn() -> U>,
}

impl<Src, F, U> Observable for Select<Src, F, U>
where
    Src: Observable,
    Src::Item: 'static,
    F: Fn(&Src::Item) -> U + Send + Sync + 'static,
    U: 'static,
{
    type Item = U;

    fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: Observer<U> + 'static,
    {
        self.source.subscribe(SelectObserver {
            selector: Arc::clone(&self.selector),
            downstream: observer,
            _item: PhantomData,
        })
    }
}

impl<T, F, O, U> Observer<T> for SelectObserver<F, O, U>
where
    F: Fn(&T) -> U + Send + Sync,
    O: Observer<U>,
{
    fn on_next(&self, value: &T) {
        self.downstream.on_next(&(self.selector)(value));
    }

    fn on_error(&self, error: &StoreError) {
        self.downstream.on_error(error);
    }
}

/// Observable returned by [`ObservableExt::distinct_until_changed`]
pub struct DistinctUntilChanged<Src, C> {
    source: Src,
    comparer: Arc<C>,
}

struct DistinctObserver<T, C, O> {
    last: Mutex<Option<T>>,
    comparer: Arc<C>,
    downstream: O,
}

impl<Src, C> Observable for DistinctUntilChanged<Src, C>
where
    Src: Observable,
    Src::Item: Clone + Send + 'static,
    C: Fn(&Src::Item, &Src::Item) -> bool + Send + Sync + 'static,
{
    type Item = Src::Item;

    fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: Observer<Src::Item> + 'static,
    {
        self.source.subscribe(DistinctObserver {
            last: Mutex::new(None),
            comparer: Arc::clone(&self.comparer),
            downstream: observer,
        })
    }
}

impl<T, C, O> Observer<T> for DistinctObserver<T, C, O>
where
    T: Clone + Send,
    C: Fn(&T, &T) -> bool + Send + Sync,
    O: Observer<T>,
{
    fn on_next(&self, value: &T) {
        {
            let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
            if last.as_ref().is_some_and(|last| (self.comparer)(last, value)) {
                return;
            }
            *last = Some(value.clone());
        }
        self.downstream.on_next(value);
    }

    fn on_error(&self, error: &StoreError) {
        self.downstream.on_error(error);
    }
}
