//! Builder API for declaring flow machines.
//!
//! Flows are declared as data: states, each with an ordered list of
//! transitions. Definitions are validated once, at build time.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::ConfigError;
pub use machine::MachineBuilder;
pub use transition::TransitionBuilder;

/// Start a transition fired by `event` and moving to `target`.
///
/// # Example
///
/// ```
/// use flowkit::builder::{transition, MachineBuilder};
/// use flowkit::state_enum;
///
/// state_enum! {
///     enum Step {
///         Index => "index",
///         Next => "next",
///     }
/// }
///
/// #[derive(Clone)]
/// struct Ctx {
///     x: i32,
/// }
///
/// let definition = MachineBuilder::<Step, Ctx, ()>::new()
///     .state(
///         Step::Index,
///         vec![transition("EVENT", Step::Next).reduce(|ctx: &Ctx, _| Ctx { x: ctx.x + 1 })],
///     )
///     .terminal(Step::Next)
///     .build()
///     .unwrap();
///
/// assert_eq!(definition.states().len(), 2);
/// ```
pub fn transition<S, C, P>(event: impl Into<String>, target: S) -> TransitionBuilder<S, C, P> {
    TransitionBuilder::on(event).to(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Start => "start",
            End => "end",
        }
    }

    #[test]
    fn transition_helper_sets_target() {
        let built = transition::<TestState, (), ()>("GO", TestState::End)
            .build()
            .unwrap();

        assert_eq!(built.event, "GO");
        assert_eq!(built.target, TestState::End);
    }
}
