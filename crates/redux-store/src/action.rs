//! Actions - opaque values describing an intended state change
//!
//! Any `'static` type that is `Debug + Send + Sync` is an action; there is no
//! common base type. The pipeline borrows the action as `&dyn Action` for the
//! duration of one dispatch, and reducers/middleware recover the concrete
//! type with [`downcast_ref`](trait.Action.html#method.downcast_ref).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt::Debug;

/// Marker trait for dispatchable values
///
/// Implemented automatically for every eligible type.
pub trait Action: Any + Debug + Send + Sync {
    /// Upcast for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Fully qualified type name, used in logs and error reports
    fn type_name(&self) -> &'static str;
}

impl<T> Action for T
where
    T: Any + Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl dyn Action {
    /// Returns the concrete action if it is of type `T`
    pub fn downcast_ref<T: Action>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns true if the action is of type `T`
    pub fn is<T: Action>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Dispatched once when a store is created without an explicit initial state
///
/// Reducers respond to it by configuring their initial state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreInitialized;

/// Built-in string-tagged action with an optional JSON payload
///
/// Serializes as `{"type": "...", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Map<String, Value>>,
}

impl StandardAction {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    pub fn with_payload(kind: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload),
        }
    }

    /// String identifying the action
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> Option<&Map<String, Value>> {
        self.payload.as_ref()
    }

    /// Look up a single payload field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.as_ref().and_then(|payload| payload.get(key))
    }
}
