//! Events delivered to flows.

use serde::{Deserialize, Serialize};

/// An immutable notification that something happened in a flow.
///
/// `kind` is matched against transition event types; `payload` carries
/// whatever data the notifier attached (a created entity, a selected id).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event<P> {
    pub kind: String,
    pub payload: Option<P>,
}

impl<P> Event<P> {
    /// An event without payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    /// An event carrying a payload.
    pub fn with_payload(kind: impl Into<String>, payload: P) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload),
        }
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}
