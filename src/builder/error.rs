//! Configuration errors for machine definitions and breadcrumb forests.

use thiserror::Error;

/// Errors raised while constructing static flow configuration.
///
/// These indicate a mistake in a flow's hand-written definition and are
/// never recovered from.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No states declared. Add at least one state before .build()")]
    NoStates,

    #[error("State '{state}' is declared more than once")]
    DuplicateState { state: String },

    #[error("Transition on '{event}' has no target state. Call .to(state)")]
    MissingTarget { event: String },

    #[error("Transition '{state}' --{event}--> '{target}' targets an undeclared state")]
    UnknownTarget {
        state: String,
        event: String,
        target: String,
    },

    #[error("Initial state '{state}' is not declared in the machine definition")]
    UnknownInitialState { state: String },

    #[error("Breadcrumb '{id}' is part of a parent cycle")]
    BreadcrumbCycle { id: String },

    #[error("Breadcrumb '{id}' references unknown parent '{parent}'")]
    UnknownBreadcrumbParent { id: String, parent: String },

    #[error("{} configuration errors: {}", .0.len(), join(.0))]
    Multiple(Vec<ConfigError>),
}

impl ConfigError {
    /// Collapse accumulated errors: one error stays itself, several are
    /// wrapped in `Multiple`.
    pub fn from_many(mut errors: Vec<ConfigError>) -> Self {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            ConfigError::Multiple(errors)
        }
    }

    /// Flattened view of every individual error.
    pub fn errors(&self) -> Vec<&ConfigError> {
        match self {
            ConfigError::Multiple(errors) => errors.iter().flat_map(|e| e.errors()).collect(),
            other => vec![other],
        }
    }
}

fn join(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
