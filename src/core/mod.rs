//! Core flow types.
//!
//! This module contains the pure vocabulary shared by every flow:
//! - State definitions via the `State` trait
//! - Events and guard predicates
//! - Immutable transition history

mod event;
mod guard;
mod history;
mod state;

pub use event::Event;
pub use guard::Guard;
pub use history::{FlowHistory, TransitionRecord};
pub use state::State;

/// Error type returned by fallible guards and reducers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
