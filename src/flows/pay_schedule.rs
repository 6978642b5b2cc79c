//! Pay schedules: list, add and edit, with a pay-period preview.
//!
//! While the schedule form is open the host reports the preview period it
//! computed with [`PAY_SCHEDULE_PREVIEW`]. The period is narrated in the
//! form's breadcrumb through `{{startDate}}` and `{{endDate}}`, so the trail
//! follows the form as the user edits it.

use crate::breadcrumbs::{build_trails, nodes_by_id, BreadcrumbNode, VariableSource};
use crate::builder::{transition, ConfigError, MachineBuilder};
use crate::core::{BoxError, Event, State};
use crate::flow::{
    breadcrumb_navigation, update_breadcrumbs, EventSink, FlowContext, FlowController,
};
use crate::flows::{breadcrumb, require_str, templates, Payload, CANCEL};
use crate::machine::{FlowError, MachineDefinition};
use crate::state_enum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const PAY_SCHEDULE_CREATE: &str = "paySchedule/create";
pub const PAY_SCHEDULE_EDIT: &str = "paySchedule/edit";
pub const PAY_SCHEDULE_PREVIEW: &str = "paySchedule/preview";
pub const PAY_SCHEDULE_DONE: &str = "paySchedule/done";

const NAMESPACE: &str = "Company.PaySchedule";

state_enum! {
    pub enum PayScheduleStep {
        Index => "index",
        Add => "add",
        Edit => "edit",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayScheduleScreen {
    List,
    Form { pay_schedule_id: Option<String> },
}

/// First pay period of the schedule being edited, as ISO dates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPeriodPreview {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PayScheduleData {
    pub company_id: String,
    pub pay_schedule_id: Option<String>,
    pub preview: Option<PayPeriodPreview>,
    pub saved: bool,
}

impl VariableSource for PayScheduleData {
    fn variable(&self, key: &str) -> Option<String> {
        match key {
            "companyId" => Some(self.company_id.clone()),
            "payScheduleId" => self.pay_schedule_id.clone(),
            "startDate" => self.preview.as_ref().map(|p| p.start_date.clone()),
            "endDate" => self.preview.as_ref().map(|p| p.end_date.clone()),
            _ => None,
        }
    }
}

pub type PayScheduleContext = FlowContext<PayScheduleScreen, PayScheduleData>;
pub type PayScheduleDefinition = MachineDefinition<PayScheduleStep, PayScheduleContext, Payload>;
pub type PayScheduleFlow = FlowController<PayScheduleStep, PayScheduleContext, Payload>;

pub fn breadcrumb_nodes() -> Vec<BreadcrumbNode> {
    vec![
        BreadcrumbNode::root(breadcrumb(NAMESPACE, "index")),
        BreadcrumbNode::child("index", breadcrumb(NAMESPACE, "add")),
        BreadcrumbNode::child("index", breadcrumb(NAMESPACE, "edit")),
    ]
}

/// Templates narrating the previewed pay period in the form's breadcrumb.
pub fn period_templates() -> BTreeMap<String, String> {
    templates([("startDate", "{{startDate}}"), ("endDate", "{{endDate}}")])
}

pub fn definition() -> Result<PayScheduleDefinition, ConfigError> {
    MachineBuilder::<PayScheduleStep, PayScheduleContext, Payload>::new()
        .state(
            PayScheduleStep::Index,
            vec![
                transition(PAY_SCHEDULE_CREATE, PayScheduleStep::Add).reduce(open_add),
                transition(PAY_SCHEDULE_EDIT, PayScheduleStep::Edit).try_reduce(open_edit),
            ],
        )
        .state(
            PayScheduleStep::Add,
            vec![
                transition(PAY_SCHEDULE_PREVIEW, PayScheduleStep::Add).try_reduce(preview),
                transition(PAY_SCHEDULE_DONE, PayScheduleStep::Index).reduce(done),
                transition(CANCEL, PayScheduleStep::Index).reduce(back_to_list),
                breadcrumb_navigation(PayScheduleStep::Index).reduce(back_to_list),
            ],
        )
        .state(
            PayScheduleStep::Edit,
            vec![
                transition(PAY_SCHEDULE_PREVIEW, PayScheduleStep::Edit).try_reduce(preview),
                transition(PAY_SCHEDULE_DONE, PayScheduleStep::Index).reduce(done),
                transition(CANCEL, PayScheduleStep::Index).reduce(back_to_list),
                breadcrumb_navigation(PayScheduleStep::Index).reduce(back_to_list),
            ],
        )
        .build()
}

pub fn initial_context(company_id: impl Into<String>) -> Result<PayScheduleContext, ConfigError> {
    let trails = build_trails(&nodes_by_id(breadcrumb_nodes()))?;
    let data = PayScheduleData {
        company_id: company_id.into(),
        ..PayScheduleData::default()
    };
    let context = FlowContext::new(PayScheduleScreen::List, data);
    Ok(context.with_breadcrumbs(trails, PayScheduleStep::Index.name()))
}

pub fn controller(
    company_id: impl Into<String>,
    on_event: EventSink<Payload>,
) -> Result<PayScheduleFlow, FlowError> {
    let context = initial_context(company_id)?;
    FlowController::new(
        "pay-schedule",
        Arc::new(definition()?),
        PayScheduleStep::Index,
        move || context,
        on_event,
    )
}

fn open_add(ctx: &PayScheduleContext, _: &Event<Payload>) -> PayScheduleContext {
    let next = FlowContext {
        component: PayScheduleScreen::Form {
            pay_schedule_id: None,
        },
        data: PayScheduleData {
            pay_schedule_id: None,
            preview: None,
            saved: false,
            ..ctx.data.clone()
        },
        ..ctx.clone()
    };
    update_breadcrumbs(
        PayScheduleStep::Add.name(),
        &next,
        Some(&period_templates()),
    )
}

fn open_edit(
    ctx: &PayScheduleContext,
    event: &Event<Payload>,
) -> Result<PayScheduleContext, BoxError> {
    let pay_schedule_id = require_str(event, "uuid")?;
    let next = FlowContext {
        component: PayScheduleScreen::Form {
            pay_schedule_id: Some(pay_schedule_id.clone()),
        },
        data: PayScheduleData {
            pay_schedule_id: Some(pay_schedule_id),
            preview: None,
            saved: false,
            ..ctx.data.clone()
        },
        ..ctx.clone()
    };
    Ok(update_breadcrumbs(
        PayScheduleStep::Edit.name(),
        &next,
        Some(&period_templates()),
    ))
}

/// Record the previewed period and re-narrate the current breadcrumb.
///
/// The period needs both ends; a preview missing either date fails.
fn preview(
    ctx: &PayScheduleContext,
    event: &Event<Payload>,
) -> Result<PayScheduleContext, BoxError> {
    let period = PayPeriodPreview {
        start_date: require_str(event, "startDate")?,
        end_date: require_str(event, "endDate")?,
    };
    let next = ctx.map_data(|data| PayScheduleData {
        preview: Some(period),
        ..data.clone()
    });
    let state = ctx
        .current_breadcrumb_id
        .clone()
        .unwrap_or_else(|| PayScheduleStep::Add.name().to_string());
    Ok(update_breadcrumbs(&state, &next, Some(&period_templates())))
}

fn done(ctx: &PayScheduleContext, _: &Event<Payload>) -> PayScheduleContext {
    show_list(ctx, true)
}

fn back_to_list(ctx: &PayScheduleContext, _: &Event<Payload>) -> PayScheduleContext {
    show_list(ctx, false)
}

fn show_list(ctx: &PayScheduleContext, saved: bool) -> PayScheduleContext {
    let next = FlowContext {
        component: PayScheduleScreen::List,
        data: PayScheduleData {
            pay_schedule_id: None,
            preview: None,
            saved,
            ..ctx.data.clone()
        },
        ..ctx.clone()
    };
    update_breadcrumbs(PayScheduleStep::Index.name(), &next, None)
}
