//! Builder for constructing machine definitions.

use crate::builder::error::ConfigError;
use crate::builder::transition::TransitionBuilder;
use crate::core::State;
use crate::machine::{MachineDefinition, StateNode};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing machine definitions with a fluent API.
///
/// `build` validates every transition at once and reports all problems
/// together instead of stopping at the first one.
pub struct MachineBuilder<S, C, P> {
    states: Vec<(S, Vec<TransitionBuilder<S, C, P>>)>,
}

impl<S: State, C, P> MachineBuilder<S, C, P> {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    /// Declare a state with its transitions, in evaluation order.
    pub fn state(mut self, state: S, transitions: Vec<TransitionBuilder<S, C, P>>) -> Self {
        self.states.push((state, transitions));
        self
    }

    /// Declare a state without outgoing transitions.
    pub fn terminal(self, state: S) -> Self {
        self.state(state, Vec::new())
    }

    /// Build the definition.
    ///
    /// Fails when no state is declared, a state is declared twice, a
    /// transition lacks a target, or a target is not a declared state.
    pub fn build(self) -> Result<MachineDefinition<S, C, P>, ConfigError> {
        if self.states.is_empty() {
            return Err(ConfigError::NoStates);
        }

        let declared: HashSet<S> = self.states.iter().map(|(state, _)| state.clone()).collect();
        let mut seen = HashSet::new();
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigError>>> = Vec::new();
        let mut nodes = Vec::with_capacity(self.states.len());

        for (state, builders) in self.states {
            if !seen.insert(state.clone()) {
                checks.push(Validation::fail(ConfigError::DuplicateState {
                    state: state.name().to_string(),
                }));
                continue;
            }

            let mut transitions = Vec::with_capacity(builders.len());
            for builder in builders {
                match builder.build() {
                    Ok(transition) if declared.contains(&transition.target) => {
                        checks.push(Validation::success(()));
                        transitions.push(transition);
                    }
                    Ok(transition) => {
                        checks.push(Validation::fail(ConfigError::UnknownTarget {
                            state: state.name().to_string(),
                            event: transition.event.clone(),
                            target: transition.target.name().to_string(),
                        }));
                    }
                    Err(err) => checks.push(Validation::fail(err)),
                }
            }

            nodes.push(StateNode { state, transitions });
        }

        if checks.is_empty() {
            return Ok(MachineDefinition::from_nodes(nodes));
        }

        match Validation::all_vec(checks) {
            Validation::Success(_) => Ok(MachineDefinition::from_nodes(nodes)),
            Validation::Failure(errors) => {
                Err(ConfigError::from_many(errors.iter().cloned().collect()))
            }
        }
    }
}

impl<S: State, C, P> Default for MachineBuilder<S, C, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::transition;
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Index => "index",
            Add => "add",
            Edit => "edit",
            Orphan => "orphan",
        }
    }

    #[derive(Clone, Debug)]
    struct Ctx;

    type Builder = MachineBuilder<TestState, Ctx, ()>;

    #[test]
    fn builder_requires_states() {
        let result = Builder::new().build();

        assert!(matches!(result, Err(ConfigError::NoStates)));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let definition = Builder::new()
            .state(
                TestState::Index,
                vec![
                    transition("CREATE", TestState::Add),
                    transition("EDIT", TestState::Edit),
                ],
            )
            .state(TestState::Add, vec![transition("CANCEL", TestState::Index)])
            .state(TestState::Edit, vec![transition("BACK", TestState::Index)])
            .build()
            .unwrap();

        assert_eq!(definition.states().len(), 3);
        assert_eq!(definition.transitions_from(&TestState::Index).len(), 2);
    }

    #[test]
    fn unknown_target_fails_at_build() {
        let result = Builder::new()
            .state(TestState::Index, vec![transition("EDIT", TestState::Edit)])
            .build();

        assert_eq!(
            result.unwrap_err(),
            ConfigError::UnknownTarget {
                state: "index".into(),
                event: "EDIT".into(),
                target: "edit".into(),
            }
        );
    }

    #[test]
    fn all_violations_are_reported() {
        let result = Builder::new()
            .state(
                TestState::Index,
                vec![
                    transition("EDIT", TestState::Edit),
                    transition("ADOPT", TestState::Orphan),
                    TransitionBuilder::on("NOWHERE"),
                ],
            )
            .terminal(TestState::Index)
            .build();

        let err = result.unwrap_err();
        let errors = err.errors();
        assert_eq!(errors.len(), 4);
        let duplicate = ConfigError::DuplicateState {
            state: "index".into(),
        };
        let missing = ConfigError::MissingTarget {
            event: "NOWHERE".into(),
        };
        assert!(errors.contains(&&duplicate));
        assert!(errors.contains(&&missing));
    }

    #[test]
    fn terminal_states_have_no_transitions() {
        let definition = Builder::new()
            .state(TestState::Index, vec![transition("CREATE", TestState::Add)])
            .terminal(TestState::Add)
            .build()
            .unwrap();

        assert!(definition.transitions_from(&TestState::Add).is_empty());
    }
}
