//! Flow context: the render slot, flow data and breadcrumb state.

use crate::breadcrumbs::{resolve_variables, BreadcrumbItem, BreadcrumbTrail, VariableSource};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Context threaded through a flow's transitions.
///
/// `component` names what the host should render for the current state;
/// the core never interprets it. `data` is the flow's own record and the
/// source breadcrumb variables resolve against. Contexts are replaced, not
/// mutated: reducers build a new one from the previous.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowContext<K, D> {
    pub component: K,
    pub data: D,
    pub breadcrumbs: BreadcrumbTrail,
    pub current_breadcrumb_id: Option<String>,
}

impl<K, D> FlowContext<K, D> {
    pub fn new(component: K, data: D) -> Self {
        Self {
            component,
            data,
            breadcrumbs: BreadcrumbTrail::new(),
            current_breadcrumb_id: None,
        }
    }

    /// Attach trails built by [`build_trails`](crate::breadcrumbs::build_trails),
    /// starting at `current`.
    pub fn with_breadcrumbs(mut self, trails: BreadcrumbTrail, current: impl Into<String>) -> Self {
        self.breadcrumbs = trails;
        self.current_breadcrumb_id = Some(current.into());
        self
    }

    /// Items to display for the current breadcrumb id; empty when unset.
    pub fn current_trail(&self) -> &[BreadcrumbItem] {
        self.current_breadcrumb_id
            .as_deref()
            .and_then(|id| self.breadcrumbs.get(id))
            .map(|trail| trail.as_slice())
            .unwrap_or(&[])
    }
}

/// Contexts that can show a breadcrumb trail to the host.
///
/// Nested flows are type-erased, so the slot reads the innermost flow's
/// trail through this trait. Contexts without breadcrumbs keep the default.
pub trait TrailView {
    fn trail(&self) -> &[BreadcrumbItem] {
        &[]
    }
}

impl<K, D> TrailView for FlowContext<K, D> {
    fn trail(&self) -> &[BreadcrumbItem] {
        self.current_trail()
    }
}

impl TrailView for () {}

impl<K: Clone, D: Clone> FlowContext<K, D> {
    /// Copy of this context showing `component`.
    pub fn show(&self, component: K) -> Self {
        Self {
            component,
            ..self.clone()
        }
    }

    /// Copy of this context with `data` replaced through `update`.
    pub fn map_data(&self, update: impl FnOnce(&D) -> D) -> Self {
        Self {
            data: update(&self.data),
            ..self.clone()
        }
    }
}

/// Refresh the trail of `state` and make it current.
///
/// The last item of the state's trail gets its `variables` resolved from
/// `templates` against the context data. Every other state's trail is
/// carried over by reference. A state without a trail gets an empty one.
pub fn update_breadcrumbs<K, D>(
    state: &str,
    context: &FlowContext<K, D>,
    templates: Option<&BTreeMap<String, String>>,
) -> FlowContext<K, D>
where
    K: Clone,
    D: Clone + VariableSource,
{
    let mut items: Vec<BreadcrumbItem> = context
        .breadcrumbs
        .get(state)
        .map(|trail| trail.as_ref().clone())
        .unwrap_or_default();

    if let Some(last) = items.last_mut() {
        last.variables = Some(resolve_variables(templates, &context.data));
    }

    let mut breadcrumbs = context.breadcrumbs.clone();
    breadcrumbs.insert(state.to_string(), Arc::new(items));

    FlowContext {
        component: context.component.clone(),
        data: context.data.clone(),
        breadcrumbs,
        current_breadcrumb_id: Some(state.to_string()),
    }
}
