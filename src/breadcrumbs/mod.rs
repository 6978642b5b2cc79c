//! Breadcrumb trails for multi-step flows.
//!
//! Authoring data is a small forest of [`BreadcrumbNode`]s. It is turned into
//! a trail per state once, with [`build_trails`], and the last item of a
//! state's trail is re-resolved against live flow data as the flow runs.

mod item;
mod trail;
mod variables;

pub use item::{BreadcrumbItem, BreadcrumbNode, NavigateCallback};
pub use trail::{build_trails, nodes_by_id, BreadcrumbTrail, Trail};
pub use variables::{resolve_variables, template_key, VariableSource};
