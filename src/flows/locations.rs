//! Company locations: list, add and edit.

use crate::breadcrumbs::{build_trails, nodes_by_id, BreadcrumbNode, VariableSource};
use crate::builder::{transition, ConfigError, MachineBuilder};
use crate::core::{BoxError, Event, State};
use crate::flow::{
    breadcrumb_navigation, update_breadcrumbs, EventSink, FlowContext, FlowController,
};
use crate::flows::{breadcrumb, payload_str, require_str, templates, Payload, CANCEL};
use crate::machine::{FlowError, MachineDefinition};
use crate::state_enum;
use std::sync::Arc;

pub const LOCATION_CREATE: &str = "company/location/create";
pub const LOCATION_EDIT: &str = "company/location/edit";
pub const LOCATION_CREATED: &str = "company/location/created";
pub const LOCATION_UPDATED: &str = "company/location/updated";

const NAMESPACE: &str = "Company.Locations";

state_enum! {
    pub enum LocationStep {
        Index => "index",
        Add => "add",
        Edit => "edit",
    }
}

/// What the host renders for each step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocationScreen {
    List,
    Form { location_id: Option<String> },
}

/// Outcome banner shown on the list after a save.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationAlert {
    Created,
    Updated,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationData {
    pub company_id: String,
    pub location_id: Option<String>,
    pub location_name: Option<String>,
    pub alert: Option<LocationAlert>,
}

impl VariableSource for LocationData {
    fn variable(&self, key: &str) -> Option<String> {
        match key {
            "companyId" => Some(self.company_id.clone()),
            "locationId" => self.location_id.clone(),
            "locationName" => self.location_name.clone(),
            _ => None,
        }
    }
}

pub type LocationContext = FlowContext<LocationScreen, LocationData>;
pub type LocationDefinition = MachineDefinition<LocationStep, LocationContext, Payload>;
pub type LocationFlow = FlowController<LocationStep, LocationContext, Payload>;

pub fn breadcrumb_nodes() -> Vec<BreadcrumbNode> {
    vec![
        BreadcrumbNode::root(breadcrumb(NAMESPACE, "index")),
        BreadcrumbNode::child("index", breadcrumb(NAMESPACE, "add")),
        BreadcrumbNode::child("index", breadcrumb(NAMESPACE, "edit")),
    ]
}

pub fn definition() -> Result<LocationDefinition, ConfigError> {
    MachineBuilder::<LocationStep, LocationContext, Payload>::new()
        .state(
            LocationStep::Index,
            vec![
                transition(LOCATION_CREATE, LocationStep::Add).reduce(open_add),
                transition(LOCATION_EDIT, LocationStep::Edit).try_reduce(open_edit),
            ],
        )
        .state(
            LocationStep::Add,
            vec![
                transition(LOCATION_CREATED, LocationStep::Index).reduce(created),
                transition(CANCEL, LocationStep::Index).reduce(back_to_list),
                breadcrumb_navigation(LocationStep::Index).reduce(back_to_list),
            ],
        )
        .state(
            LocationStep::Edit,
            vec![
                transition(LOCATION_UPDATED, LocationStep::Index).reduce(updated),
                transition(CANCEL, LocationStep::Index).reduce(back_to_list),
                breadcrumb_navigation(LocationStep::Index).reduce(back_to_list),
            ],
        )
        .build()
}

pub fn initial_context(company_id: impl Into<String>) -> Result<LocationContext, ConfigError> {
    let trails = build_trails(&nodes_by_id(breadcrumb_nodes()))?;
    let data = LocationData {
        company_id: company_id.into(),
        ..LocationData::default()
    };
    let context = FlowContext::new(LocationScreen::List, data);
    Ok(context.with_breadcrumbs(trails, LocationStep::Index.name()))
}

/// Mount the locations flow on its list.
pub fn controller(
    company_id: impl Into<String>,
    on_event: EventSink<Payload>,
) -> Result<LocationFlow, FlowError> {
    let context = initial_context(company_id)?;
    FlowController::new(
        "company-locations",
        Arc::new(definition()?),
        LocationStep::Index,
        move || context,
        on_event,
    )
}

fn open_add(ctx: &LocationContext, _: &Event<Payload>) -> LocationContext {
    let next = FlowContext {
        component: LocationScreen::Form { location_id: None },
        data: LocationData {
            location_id: None,
            location_name: None,
            alert: None,
            ..ctx.data.clone()
        },
        ..ctx.clone()
    };
    update_breadcrumbs(LocationStep::Add.name(), &next, None)
}

fn open_edit(ctx: &LocationContext, event: &Event<Payload>) -> Result<LocationContext, BoxError> {
    let location_id = require_str(event, "uuid")?;
    let next = FlowContext {
        component: LocationScreen::Form {
            location_id: Some(location_id.clone()),
        },
        data: LocationData {
            location_id: Some(location_id),
            location_name: payload_str(event, "name").map(str::to_string),
            alert: None,
            ..ctx.data.clone()
        },
        ..ctx.clone()
    };
    let edit = templates([("name", "{{locationName}}")]);
    Ok(update_breadcrumbs(LocationStep::Edit.name(), &next, Some(&edit)))
}

fn created(ctx: &LocationContext, _: &Event<Payload>) -> LocationContext {
    show_list(ctx, Some(LocationAlert::Created))
}

fn updated(ctx: &LocationContext, _: &Event<Payload>) -> LocationContext {
    show_list(ctx, Some(LocationAlert::Updated))
}

fn back_to_list(ctx: &LocationContext, _: &Event<Payload>) -> LocationContext {
    show_list(ctx, None)
}

fn show_list(ctx: &LocationContext, alert: Option<LocationAlert>) -> LocationContext {
    let next = FlowContext {
        component: LocationScreen::List,
        data: LocationData {
            location_id: None,
            location_name: None,
            alert,
            ..ctx.data.clone()
        },
        ..ctx.clone()
    };
    update_breadcrumbs(LocationStep::Index.name(), &next, None)
}
