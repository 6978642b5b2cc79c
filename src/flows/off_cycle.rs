//! Off-cycle payroll: create a payroll, then hand it to payroll execution.
//!
//! Entering [`OffCycleStep::Execution`] mounts a nested
//! [payroll execution](crate::flows::payroll_execution) flow for the created
//! payroll. While it runs it receives every event; once it exits, events
//! reach this flow again.

use crate::builder::{transition, ConfigError, MachineBuilder};
use crate::core::{BoxError, Event};
use crate::flow::{EventSink, FlowContext, FlowController, FlowNode};
use crate::flows::{payroll_execution, require_str, Payload, CANCEL};
use crate::machine::{FlowError, MachineDefinition};
use crate::state_enum;
use std::sync::Arc;

/// Payload carries the created payroll's `payrollUuid`.
pub const OFF_CYCLE_CREATED: &str = "offCycle/created";
pub const OFF_CYCLE_DONE: &str = "offCycle/done";

state_enum! {
    pub enum OffCycleStep {
        Create => "create",
        Execution => "execution",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OffCycleScreen {
    Creation,
    Execution { payroll_id: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OffCycleData {
    pub company_id: String,
    pub payroll_id: Option<String>,
}

pub type OffCycleContext = FlowContext<OffCycleScreen, OffCycleData>;
pub type OffCycleDefinition = MachineDefinition<OffCycleStep, OffCycleContext, Payload>;
pub type OffCycleFlow = FlowController<OffCycleStep, OffCycleContext, Payload>;

pub fn definition() -> Result<OffCycleDefinition, ConfigError> {
    MachineBuilder::<OffCycleStep, OffCycleContext, Payload>::new()
        .state(
            OffCycleStep::Create,
            vec![transition(OFF_CYCLE_CREATED, OffCycleStep::Execution).try_reduce(created)],
        )
        .state(
            OffCycleStep::Execution,
            vec![
                transition(OFF_CYCLE_DONE, OffCycleStep::Create).reduce(start_over),
                transition(CANCEL, OffCycleStep::Create).reduce(start_over),
            ],
        )
        .build()
}

pub fn initial_context(company_id: impl Into<String>) -> OffCycleContext {
    FlowContext::new(
        OffCycleScreen::Creation,
        OffCycleData {
            company_id: company_id.into(),
            payroll_id: None,
        },
    )
}

/// Mount the off-cycle flow on payroll creation.
pub fn controller(
    company_id: impl Into<String>,
    on_event: EventSink<Payload>,
) -> Result<OffCycleFlow, FlowError> {
    let context = initial_context(company_id);
    let controller = FlowController::new(
        "off-cycle-payroll",
        Arc::new(definition()?),
        OffCycleStep::Create,
        move || context,
        on_event,
    )?;
    Ok(controller.delegate(OffCycleStep::Execution, execution))
}

/// Payroll execution child for the payroll just created.
fn execution(ctx: &OffCycleContext) -> Result<Box<dyn FlowNode<Payload>>, FlowError> {
    let payroll_id = ctx
        .data
        .payroll_id
        .as_deref()
        .ok_or(FlowError::MissingContext { what: "payroll" })?;
    let child = payroll_execution::controller(ctx.data.company_id.as_str(), payroll_id)?;
    Ok(Box::new(child))
}

fn created(ctx: &OffCycleContext, event: &Event<Payload>) -> Result<OffCycleContext, BoxError> {
    let payroll_id = require_str(event, "payrollUuid")?;
    Ok(FlowContext {
        component: OffCycleScreen::Execution {
            payroll_id: payroll_id.clone(),
        },
        data: OffCycleData {
            payroll_id: Some(payroll_id),
            ..ctx.data.clone()
        },
        ..ctx.clone()
    })
}

fn start_over(ctx: &OffCycleContext, _: &Event<Payload>) -> OffCycleContext {
    FlowContext {
        component: OffCycleScreen::Creation,
        data: OffCycleData {
            payroll_id: None,
            ..ctx.data.clone()
        },
        ..ctx.clone()
    }
}
