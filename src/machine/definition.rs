//! Static machine definitions: states and their ordered transitions.

use crate::core::{BoxError, Event, Guard, State};
use std::collections::HashMap;
use std::sync::Arc;

/// Context-reducing function attached to a transition.
///
/// Reducers must be pure: they read the previous context and return a new
/// one without touching the input.
pub type Reducer<C, P> = Arc<dyn Fn(&C, &Event<P>) -> Result<C, BoxError> + Send + Sync>;

/// A rule moving the machine to `target` when an event of type `event`
/// arrives and the guard (if any) allows it.
pub struct Transition<S, C, P> {
    pub event: String,
    pub guard: Option<Guard<C, P>>,
    pub reduce: Option<Reducer<C, P>>,
    pub target: S,
}

impl<S, C: Clone, P> Transition<S, C, P> {
    /// Check whether this transition is eligible for `event` (pure).
    pub fn accepts(&self, context: &C, event: &Event<P>) -> Result<bool, BoxError> {
        if event.kind != self.event {
            return Ok(false);
        }

        match &self.guard {
            Some(guard) => guard.check(context, event),
            None => Ok(true),
        }
    }

    /// Compute the context this transition would install (pure).
    pub fn next_context(&self, context: &C, event: &Event<P>) -> Result<C, BoxError> {
        match &self.reduce {
            Some(reduce) => reduce(context, event),
            None => Ok(context.clone()),
        }
    }
}

impl<S: Clone, C, P> Clone for Transition<S, C, P> {
    fn clone(&self) -> Self {
        Self {
            event: self.event.clone(),
            guard: self.guard.clone(),
            reduce: self.reduce.clone(),
            target: self.target.clone(),
        }
    }
}

impl<S: std::fmt::Debug, C, P> std::fmt::Debug for Transition<S, C, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("event", &self.event)
            .field("guarded", &self.guard.is_some())
            .field("reduces", &self.reduce.is_some())
            .field("target", &self.target)
            .finish()
    }
}

/// A named state and its transitions, in declaration order.
pub struct StateNode<S, C, P> {
    pub state: S,
    pub transitions: Vec<Transition<S, C, P>>,
}

/// A validated set of states.
///
/// Only [`MachineBuilder`](crate::builder::MachineBuilder) creates
/// definitions, so every transition target is known to be declared.
pub struct MachineDefinition<S, C, P> {
    states: HashMap<S, StateNode<S, C, P>>,
    order: Vec<S>,
}

impl<S: State, C, P> MachineDefinition<S, C, P> {
    pub(crate) fn from_nodes(nodes: Vec<StateNode<S, C, P>>) -> Self {
        let order = nodes.iter().map(|node| node.state.clone()).collect();
        let states = nodes
            .into_iter()
            .map(|node| (node.state.clone(), node))
            .collect();
        Self { states, order }
    }

    pub fn contains(&self, state: &S) -> bool {
        self.states.contains_key(state)
    }

    /// Transitions declared for `state`; empty for a terminal state.
    pub fn transitions_from(&self, state: &S) -> &[Transition<S, C, P>] {
        self.states
            .get(state)
            .map(|node| node.transitions.as_slice())
            .unwrap_or(&[])
    }

    /// Declared states, in declaration order.
    pub fn states(&self) -> &[S] {
        &self.order
    }

    /// Look up a declared state by name.
    pub fn state_named(&self, name: &str) -> Option<&S> {
        self.order.iter().find(|state| state.name() == name)
    }
}

impl<S: State, C, P> std::fmt::Debug for MachineDefinition<S, C, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for state in &self.order {
            map.entry(&state.name(), &self.transitions_from(state));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum Step {
            Index => "index",
            Edit => "edit",
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Ctx {
        edits: u32,
    }

    fn edit_transition() -> Transition<Step, Ctx, ()> {
        Transition {
            event: "EDIT".to_string(),
            guard: None,
            reduce: Some(Arc::new(|ctx: &Ctx, _: &Event<()>| {
                Ok(Ctx {
                    edits: ctx.edits + 1,
                })
            })),
            target: Step::Edit,
        }
    }

    #[test]
    fn accepts_matches_event_type() {
        let transition = edit_transition();
        let ctx = Ctx { edits: 0 };

        assert!(transition.accepts(&ctx, &Event::new("EDIT")).unwrap());
        assert!(!transition.accepts(&ctx, &Event::new("CANCEL")).unwrap());
    }

    #[test]
    fn accepts_respects_guard() {
        let mut transition = edit_transition();
        transition.guard = Some(Guard::new(|ctx: &Ctx, _: &Event<()>| ctx.edits < 1));

        assert!(transition
            .accepts(&Ctx { edits: 0 }, &Event::new("EDIT"))
            .unwrap());
        assert!(!transition
            .accepts(&Ctx { edits: 1 }, &Event::new("EDIT"))
            .unwrap());
    }

    #[test]
    fn next_context_without_reducer_is_equal() {
        let mut transition = edit_transition();
        transition.reduce = None;
        let ctx = Ctx { edits: 7 };

        assert_eq!(
            transition.next_context(&ctx, &Event::new("EDIT")).unwrap(),
            ctx
        );
    }

    #[test]
    fn next_context_leaves_input_untouched() {
        let transition = edit_transition();
        let ctx = Ctx { edits: 1 };

        let next = transition.next_context(&ctx, &Event::new("EDIT")).unwrap();

        assert_eq!(next.edits, 2);
        assert_eq!(ctx.edits, 1);
    }

    #[test]
    fn definition_lists_states_in_order() {
        let definition: MachineDefinition<Step, Ctx, ()> = MachineDefinition::from_nodes(vec![
            StateNode {
                state: Step::Index,
                transitions: vec![edit_transition()],
            },
            StateNode {
                state: Step::Edit,
                transitions: vec![],
            },
        ]);

        assert_eq!(definition.states(), &[Step::Index, Step::Edit]);
        assert_eq!(definition.transitions_from(&Step::Index).len(), 1);
        assert!(definition.transitions_from(&Step::Edit).is_empty());
        assert_eq!(definition.state_named("edit"), Some(&Step::Edit));
    }
}
