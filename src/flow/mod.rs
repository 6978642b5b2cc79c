//! Flow orchestration: the shell around interpreters.
//!
//! A [`FlowController`] owns one interpreter per mounted flow, delegates
//! events to a nested child flow while one is active, and reports every
//! event to the host through its [`EventSink`]. A [`FlowSlot`] is where a
//! screen keeps its controller while mounted.

mod context;
mod controller;
mod navigation;
mod slot;

pub use context::{update_breadcrumbs, FlowContext, TrailView};
pub use controller::{ChildFactory, Delivery, EventSink, FlowController, FlowNode};
pub use navigation::{breadcrumb_navigation, navigates_to, NavigationPayload, BREADCRUMB_NAVIGATE};
pub use slot::FlowSlot;
