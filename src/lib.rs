//! Flowkit: the flow orchestration core for embeddable multi-step workflows.
//!
//! Multi-step screens (add a company location, set up a pay schedule, run an
//! off-cycle payroll) are driven by small state machines. Flowkit decides
//! which step is current, carries an immutable context across transitions
//! and derives a breadcrumb trail whose labels are resolved late against the
//! live context. Rendering, data fetching and validation stay with the host.
//!
//! # Core Concepts
//!
//! - **State**: typed step names via the `State` trait
//! - **Transitions**: event type, optional guard, optional reducer, target
//! - **Interpreter**: applies at most one transition per event
//! - **FlowController**: routes events to the innermost active flow and
//!   reports every event to the host's sink
//! - **Breadcrumbs**: root-to-state trails with `{{key}}` variables
//!
//! # Example
//!
//! ```rust
//! use flowkit::builder::{transition, MachineBuilder};
//! use flowkit::flow::{EventSink, FlowController, TrailView};
//! use flowkit::state_enum;
//! use std::sync::Arc;
//!
//! state_enum! {
//!     enum Step {
//!         Index => "index",
//!         Next => "next",
//!     }
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Ctx {
//!     x: i32,
//! }
//!
//! // No breadcrumbs in this flow.
//! impl TrailView for Ctx {}
//!
//! let definition = MachineBuilder::<Step, Ctx, ()>::new()
//!     .state(
//!         Step::Index,
//!         vec![transition("EVENT", Step::Next).reduce(|ctx: &Ctx, _| Ctx { x: ctx.x + 1 })],
//!     )
//!     .terminal(Step::Next)
//!     .build()
//!     .unwrap();
//!
//! let mut flow = FlowController::new(
//!     "example",
//!     Arc::new(definition),
//!     Step::Index,
//!     || Ctx { x: 1 },
//!     EventSink::new(|kind: &str, _: Option<&()>| println!("event: {kind}")),
//! )
//! .unwrap();
//!
//! flow.dispatch("EVENT", None).unwrap();
//! assert_eq!(flow.current(), &Step::Next);
//! assert_eq!(flow.context(), &Ctx { x: 2 });
//! ```

pub mod breadcrumbs;
pub mod builder;
pub mod core;
pub mod flow;
pub mod flows;
pub mod machine;
mod options;

// Re-export commonly used types
pub use builder::{transition, ConfigError, MachineBuilder, TransitionBuilder};
pub use core::{Event, Guard, State};
pub use flow::{EventSink, FlowContext, FlowController, FlowSlot, TrailView};
pub use machine::{FlowError, Interpreter, MachineDefinition};
pub use options::{FlowOptions, DEFAULT_HISTORY_LIMIT};
