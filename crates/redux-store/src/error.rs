//! Errors reported to observers
//!
//! Failures during dispatch never reach the caller of `dispatch`; they are
//! wrapped in a [`StoreError`] and delivered to every subscriber's
//! `on_error`. The store stays usable afterwards.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The reducer returned an error; the state was not replaced
    #[error("Reducer failed on {action}")]
    Reducer {
        action: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// A middleware returned an error
    #[error("Middleware failed on {action}")]
    Middleware {
        action: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl StoreError {
    /// Type name of the action being dispatched when the failure happened
    pub fn action(&self) -> &'static str {
        match self {
            StoreError::Reducer { action, .. } | StoreError::Middleware { action, .. } => action,
        }
    }

    /// The error returned by application code
    pub fn cause(&self) -> &anyhow::Error {
        match self {
            StoreError::Reducer { source, .. } | StoreError::Middleware { source, .. } => source,
        }
    }
}
