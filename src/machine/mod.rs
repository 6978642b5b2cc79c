//! Machine definitions and the interpreter that runs them.
//!
//! A definition is immutable configuration shared behind an `Arc`; an
//! interpreter is the running instance holding the current state and
//! context for one flow.

mod definition;
mod error;
mod interpreter;

pub use definition::{MachineDefinition, Reducer, StateNode, Transition};
pub use error::FlowError;
pub use interpreter::{Interpreter, SendOutcome, Step};
