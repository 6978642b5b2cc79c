//! Runtime errors raised while driving a flow.

use crate::builder::ConfigError;
use crate::core::BoxError;
use thiserror::Error;

/// Errors that can occur while dispatching events to a flow.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A guard or reducer failed; the flow kept its previous state and context.
    #[error("Transition logic failed in state '{state}' on '{event}': {source}")]
    Transition {
        state: String,
        event: String,
        #[source]
        source: BoxError,
    },

    #[error("No flow is mounted; cannot read {what}")]
    MissingContext { what: &'static str },
}
