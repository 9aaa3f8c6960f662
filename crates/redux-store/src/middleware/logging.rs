//! LoggingMiddleware - logs all actions passing through

use super::Middleware;
use crate::action::Action;
use crate::dispatcher::Dispatcher;
use crate::store::Store;
use async_trait::async_trait;
use redux_store_config::{ConfigError, LoggingConfig};
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};

/// Bounded record of dispatched action type names, oldest first
///
/// Cloning yields another handle to the same buffer, so the caller can keep
/// one after handing the middleware to a builder.
#[derive(Debug, Clone, Default)]
pub struct ActionHistory {
    inner: Arc<Mutex<VecDeque<&'static str>>>,
    capacity: usize,
}

impl ActionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn record(&self, action: &'static str) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(action);
    }

    /// Snapshot of the recorded entries
    pub fn entries(&self) -> Vec<&'static str> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// LoggingMiddleware - logs every action before forwarding it
pub struct LoggingMiddleware {
    level: log::Level,
    log_state: bool,
    history: ActionHistory,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self {
            level: log::Level::Debug,
            log_state: false,
            history: ActionHistory::new(0),
        }
    }

    /// Build from the `[logging]` section of the store config
    pub fn from_config(config: &LoggingConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            level: config.level()?,
            log_state: config.log_state,
            history: ActionHistory::new(config.history_capacity),
        })
    }

    pub fn with_level(mut self, level: log::Level) -> Self {
        self.level = level;
        self
    }

    /// Also log the state produced by each dispatch
    pub fn with_state(mut self) -> Self {
        self.log_state = true;
        self
    }

    /// Keep the last `capacity` action type names
    pub fn with_history(mut self, capacity: usize) -> Self {
        self.history = ActionHistory::new(capacity);
        self
    }

    /// Handle to the action history
    pub fn history(&self) -> ActionHistory {
        self.history.clone()
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> Middleware<S> for LoggingMiddleware
where
    S: Clone + Debug + Send + Sync + 'static,
{
    async fn invoke(
        &self,
        store: &Store<S>,
        next: &dyn Dispatcher,
        action: &dyn Action,
    ) -> anyhow::Result<()> {
        log::log!(self.level, "Action: {:?}", action);
        self.history.record(action.type_name());

        next.invoke(action).await;

        if self.log_state {
            log::log!(self.level, "State after {}: {:?}", action.type_name(), store.state());
        }
        Ok(())
    }
}
