//! Mount point for the flow driving a screen.

use crate::breadcrumbs::BreadcrumbItem;
use crate::core::State;
use crate::flow::context::{FlowContext, TrailView};
use crate::flow::controller::{Delivery, EventSink, FlowController};
use crate::machine::FlowError;

/// Holds the flow controller of one screen while it is mounted.
///
/// Screens pass the slot by reference to whatever needs the flow. Reading
/// through an empty slot is a `FlowError::MissingContext`.
pub struct FlowSlot<S: State, C, P> {
    controller: Option<FlowController<S, C, P>>,
}

impl<S, C, P> FlowSlot<S, C, P>
where
    S: State + 'static,
    C: Clone + TrailView + 'static,
    P: 'static,
{
    pub fn new() -> Self {
        Self { controller: None }
    }

    /// Mount `controller`, returning the one it replaces.
    pub fn mount(
        &mut self,
        controller: FlowController<S, C, P>,
    ) -> Option<FlowController<S, C, P>> {
        self.controller.replace(controller)
    }

    /// Unmount the controller and hand it back.
    pub fn unmount(&mut self) -> Option<FlowController<S, C, P>> {
        self.controller.take()
    }

    pub fn is_mounted(&self) -> bool {
        self.controller.is_some()
    }

    pub fn controller(&self) -> Result<&FlowController<S, C, P>, FlowError> {
        self.controller
            .as_ref()
            .ok_or(FlowError::MissingContext { what: "controller" })
    }

    pub fn controller_mut(&mut self) -> Result<&mut FlowController<S, C, P>, FlowError> {
        self.controller
            .as_mut()
            .ok_or(FlowError::MissingContext { what: "controller" })
    }

    pub fn context(&self) -> Result<&C, FlowError> {
        self.controller
            .as_ref()
            .map(FlowController::context)
            .ok_or(FlowError::MissingContext { what: "context" })
    }

    /// Context of the innermost active flow, when it is a `T`.
    ///
    /// Nested flows carry their own context type; `Ok(None)` means the
    /// innermost flow's context is of another type.
    pub fn active_context<T: 'static>(&self) -> Result<Option<&T>, FlowError> {
        let controller = self.controller()?;
        Ok(controller.innermost().context_any().downcast_ref::<T>())
    }

    /// Breadcrumb items of the innermost active flow.
    ///
    /// While a nested flow runs this is the child's trail, not the trail of
    /// the mounted controller.
    pub fn breadcrumbs(&self) -> Result<&[BreadcrumbItem], FlowError> {
        self.controller
            .as_ref()
            .map(|controller| controller.innermost().current_trail())
            .ok_or(FlowError::MissingContext {
                what: "breadcrumbs",
            })
    }

    pub fn sink(&self) -> Result<&EventSink<P>, FlowError> {
        self.controller
            .as_ref()
            .map(FlowController::sink)
            .ok_or(FlowError::MissingContext { what: "onEvent" })
    }

    pub fn dispatch(
        &mut self,
        kind: impl Into<String>,
        payload: Option<P>,
    ) -> Result<Delivery, FlowError> {
        self.controller_mut()?.dispatch(kind, payload)
    }
}

impl<S, K, D, P> FlowSlot<S, FlowContext<K, D>, P>
where
    S: State + 'static,
    K: Clone + 'static,
    D: Clone + 'static,
    P: 'static,
{
    /// What the host should render for the mounted flow's current state.
    ///
    /// This is the mounted controller's own component. A nested flow's
    /// screen is read through [`active_context`](Self::active_context).
    pub fn component(&self) -> Result<&K, FlowError> {
        self.controller
            .as_ref()
            .map(|controller| &controller.context().component)
            .ok_or(FlowError::MissingContext { what: "component" })
    }
}

impl<S, C, P> Default for FlowSlot<S, C, P>
where
    S: State + 'static,
    C: Clone + TrailView + 'static,
    P: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
