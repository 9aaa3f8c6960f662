//! Observers - receive state-change and error notifications

use crate::error::StoreError;

/// Callback set registered with [`Store::subscribe`](crate::Store::subscribe)
///
/// Observers are called on the dispatching task, in registration order,
/// after the new state has been published.
pub trait Observer<T>: Send + Sync {
    /// A new value was produced
    fn on_next(&self, value: &T);

    /// A dispatch failed; the value was not replaced
    fn on_error(&self, error: &StoreError) {
        log_unobserved(error);
    }
}

/// Observer built from closures
pub struct FnObserver<N, E> {
    on_next: N,
    on_error: E,
}

/// Create an observer that only handles values
pub fn from_fn<T, N>(on_next: N) -> FnObserver<N, fn(&StoreError)>
where
    N: Fn(&T) + Send + Sync,
{
    FnObserver {
        on_next,
        on_error: log_unobserved,
    }
}

fn log_unobserved(error: &StoreError) {
    log::debug!("Unobserved store error: {}", error);
}

impl<N> FnObserver<N, fn(&StoreError)> {
    /// Attach an error handler
    pub fn on_error<E>(self, on_error: E) -> FnObserver<N, E>
    where
        E: Fn(&StoreError) + Send + Sync,
    {
        FnObserver {
            on_next: self.on_next,
            on_error,
        }
    }
}

impl<T, N, E> Observer<T> for FnObserver<N, E>
where
    N: Fn(&T) + Send + Sync,
    E: Fn(&StoreError) + Send + Sync,
{
    fn on_next(&self, value: &T) {
        (self.on_next)(value)
    }

    fn on_error(&self, error: &StoreError) {
        (self.on_error)(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_from_fn_forwards_values() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer = from_fn(move |value: &i32| sink.lock().unwrap().push(*value));

        observer.on_next(&1);
        observer.on_next(&2);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_on_error_handler() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        let observer = from_fn(|_: &i32| {}).on_error(move |error| {
            sink.lock().unwrap().push(error.action());
        });

        observer.on_error(&StoreError::Reducer {
            action: "Explode",
            source: anyhow::anyhow!("boom"),
        });

        assert_eq!(*errors.lock().unwrap(), vec!["Explode"]);
    }
}
