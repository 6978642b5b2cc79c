//! Interpreter driving a machine definition one event at a time.

use crate::builder::ConfigError;
use crate::core::{BoxError, Event, FlowHistory, State, TransitionRecord};
use crate::machine::definition::MachineDefinition;
use crate::machine::error::FlowError;
use crate::options::FlowOptions;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// What an event would do to the interpreter, computed without applying it.
#[derive(Clone, Debug, PartialEq)]
pub enum Step<S, C> {
    /// The first eligible transition moves `from` to `to`, installing `context`.
    Transition { from: S, to: S, context: C },

    /// No transition of the current state accepts the event.
    Ignored,
}

/// Result of [`Interpreter::send`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome<S> {
    Transitioned { from: S, to: S },
    Ignored,
}

impl<S> SendOutcome<S> {
    pub fn is_transition(&self) -> bool {
        matches!(self, SendOutcome::Transitioned { .. })
    }
}

/// Running instance of a machine definition.
///
/// Holds the current state and context. Context is replaced wholesale on
/// every applied transition; earlier contexts handed out by `context()`
/// clones stay valid snapshots.
pub struct Interpreter<S: State, C, P> {
    definition: Arc<MachineDefinition<S, C, P>>,
    current: S,
    context: C,
    history: FlowHistory<S>,
    options: FlowOptions,
}

impl<S: State, C: Clone, P> Interpreter<S, C, P> {
    /// Create an interpreter sitting in `initial` with `context`.
    ///
    /// Fails when `initial` is not a declared state.
    pub fn new(
        definition: Arc<MachineDefinition<S, C, P>>,
        initial: S,
        context: C,
    ) -> Result<Self, ConfigError> {
        Self::with_options(definition, initial, context, FlowOptions::default())
    }

    pub fn with_options(
        definition: Arc<MachineDefinition<S, C, P>>,
        initial: S,
        context: C,
        options: FlowOptions,
    ) -> Result<Self, ConfigError> {
        if !definition.contains(&initial) {
            return Err(ConfigError::UnknownInitialState {
                state: initial.name().to_string(),
            });
        }

        Ok(Self {
            definition,
            current: initial,
            context,
            history: FlowHistory::new(),
            options,
        })
    }

    /// Get current state (pure)
    pub fn current(&self) -> &S {
        &self.current
    }

    /// Get current context (pure)
    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn history(&self) -> &FlowHistory<S> {
        &self.history
    }

    pub fn definition(&self) -> &Arc<MachineDefinition<S, C, P>> {
        &self.definition
    }

    /// Whether the current state has no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        self.definition.transitions_from(&self.current).is_empty()
    }

    /// Evaluate `event` against the current state without applying it.
    ///
    /// Transitions are scanned in declaration order; the first whose event
    /// type matches and whose guard passes wins.
    pub fn step(&self, event: &Event<P>) -> Result<Step<S, C>, FlowError> {
        for transition in self.definition.transitions_from(&self.current) {
            let accepted = transition
                .accepts(&self.context, event)
                .map_err(|source| self.logic_error(event, source))?;
            if !accepted {
                continue;
            }

            let context = transition
                .next_context(&self.context, event)
                .map_err(|source| self.logic_error(event, source))?;

            return Ok(Step::Transition {
                from: self.current.clone(),
                to: transition.target.clone(),
                context,
            });
        }

        Ok(Step::Ignored)
    }

    /// Whether `event` would fire a transition from the current state.
    pub fn can_handle(&self, event: &Event<P>) -> Result<bool, FlowError> {
        for transition in self.definition.transitions_from(&self.current) {
            if transition
                .accepts(&self.context, event)
                .map_err(|source| self.logic_error(event, source))?
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Install a step computed by [`step`](Self::step).
    pub fn apply(&mut self, step: Step<S, C>, event: &Event<P>) -> SendOutcome<S> {
        match step {
            Step::Transition { from, to, context } => {
                debug!(
                    from = from.name(),
                    to = to.name(),
                    event = %event.kind,
                    "transition applied"
                );
                if self.options.record_history {
                    let record = TransitionRecord {
                        from: from.clone(),
                        to: to.clone(),
                        event: event.kind.clone(),
                        timestamp: Utc::now(),
                    };
                    self.history = self
                        .history
                        .record_bounded(record, self.options.history_limit);
                }
                self.current = to.clone();
                self.context = context;
                SendOutcome::Transitioned { from, to }
            }
            Step::Ignored => {
                trace!(state = self.current.name(), event = %event.kind, "event ignored");
                SendOutcome::Ignored
            }
        }
    }

    /// Evaluate and apply `event`.
    ///
    /// An event no transition accepts leaves state and context unchanged. A
    /// failing guard or reducer returns `FlowError::Transition` and also
    /// leaves them unchanged.
    pub fn send(&mut self, event: &Event<P>) -> Result<SendOutcome<S>, FlowError> {
        let step = self.step(event)?;
        Ok(self.apply(step, event))
    }

    fn logic_error(&self, event: &Event<P>, source: BoxError) -> FlowError {
        warn!(
            state = self.current.name(),
            event = %event.kind,
            error = %source,
            "transition logic failed"
        );
        FlowError::Transition {
            state: self.current.name().to_string(),
            event: event.kind.clone(),
            source,
        }
    }
}
