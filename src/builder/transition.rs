//! Builder for constructing transitions.

use crate::builder::error::ConfigError;
use crate::core::{BoxError, Event, Guard};
use crate::machine::{Reducer, Transition};
use std::sync::Arc;

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<S, C, P> {
    event: String,
    target: Option<S>,
    guard: Option<Guard<C, P>>,
    reduce: Option<Reducer<C, P>>,
}

impl<S, C, P> TransitionBuilder<S, C, P> {
    /// Start a transition fired by events of type `event`.
    pub fn on(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            target: None,
            guard: None,
            reduce: None,
        }
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.target = Some(state);
        self
    }

    /// The event type this transition listens to.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S, C, P>, ConfigError> {
        let target = self.target.ok_or_else(|| ConfigError::MissingTarget {
            event: self.event.clone(),
        })?;

        Ok(Transition {
            event: self.event,
            guard: self.guard,
            reduce: self.reduce,
            target,
        })
    }
}

impl<S, C: 'static, P: 'static> TransitionBuilder<S, C, P> {
    /// Add a guard (optional).
    pub fn guard(mut self, guard: Guard<C, P>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C, &Event<P>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Set an infallible context reducer (optional).
    pub fn reduce<F>(mut self, reduce: F) -> Self
    where
        F: Fn(&C, &Event<P>) -> C + Send + Sync + 'static,
    {
        self.reduce = Some(Arc::new(move |ctx: &C, event: &Event<P>| Ok(reduce(ctx, event))));
        self
    }

    /// Set a reducer that may fail (optional).
    pub fn try_reduce<F>(mut self, reduce: F) -> Self
    where
        F: Fn(&C, &Event<P>) -> Result<C, BoxError> + Send + Sync + 'static,
    {
        self.reduce = Some(Arc::new(reduce));
        self
    }
}
