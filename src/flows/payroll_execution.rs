//! Payroll execution: configuration, overview and receipts of one payroll.
//!
//! Runs nested inside flows that hand a created payroll over for
//! execution. It completes in [`PayrollExecutionStep::Exited`].

use crate::breadcrumbs::{build_trails, nodes_by_id, BreadcrumbNode, VariableSource};
use crate::builder::{transition, ConfigError, MachineBuilder};
use crate::core::{Event, State};
use crate::flow::{breadcrumb_navigation, update_breadcrumbs, FlowContext, FlowController};
use crate::flows::{breadcrumb, payload_str, templates, Payload};
use crate::machine::{FlowError, MachineDefinition};
use crate::state_enum;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const PAYROLL_CALCULATED: &str = "runPayroll/calculated";
pub const PAYROLL_EDIT: &str = "runPayroll/edit";
pub const PAYROLL_SUBMITTED: &str = "runPayroll/submitted";
pub const PAYROLL_EXIT: &str = "runPayroll/exit";

const NAMESPACE: &str = "Payroll.Execution";

state_enum! {
    pub enum PayrollExecutionStep {
        Configuration => "configuration",
        Overview => "overview",
        Receipts => "receipts",
        Exited => "exited",
    }
    final: [Exited]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayrollExecutionScreen {
    Configuration,
    Overview,
    Receipts,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PayrollExecutionData {
    pub company_id: String,
    pub payroll_id: String,
    pub check_date: Option<String>,
}

impl VariableSource for PayrollExecutionData {
    fn variable(&self, key: &str) -> Option<String> {
        match key {
            "companyId" => Some(self.company_id.clone()),
            "payrollId" => Some(self.payroll_id.clone()),
            "checkDate" => self.check_date.clone(),
            _ => None,
        }
    }
}

pub type PayrollExecutionContext = FlowContext<PayrollExecutionScreen, PayrollExecutionData>;
pub type PayrollExecutionDefinition =
    MachineDefinition<PayrollExecutionStep, PayrollExecutionContext, Payload>;
pub type PayrollExecutionFlow =
    FlowController<PayrollExecutionStep, PayrollExecutionContext, Payload>;

pub fn breadcrumb_nodes() -> Vec<BreadcrumbNode> {
    vec![
        BreadcrumbNode::root(breadcrumb(NAMESPACE, "configuration")),
        BreadcrumbNode::child("configuration", breadcrumb(NAMESPACE, "overview")),
        BreadcrumbNode::child("overview", breadcrumb(NAMESPACE, "receipts")),
    ]
}

pub fn definition() -> Result<PayrollExecutionDefinition, ConfigError> {
    MachineBuilder::<PayrollExecutionStep, PayrollExecutionContext, Payload>::new()
        .state(
            PayrollExecutionStep::Configuration,
            vec![
                transition(PAYROLL_CALCULATED, PayrollExecutionStep::Overview).reduce(calculated),
                transition(PAYROLL_EXIT, PayrollExecutionStep::Exited),
            ],
        )
        .state(
            PayrollExecutionStep::Overview,
            vec![
                transition(PAYROLL_EDIT, PayrollExecutionStep::Configuration).reduce(configure),
                breadcrumb_navigation(PayrollExecutionStep::Configuration).reduce(configure),
                transition(PAYROLL_SUBMITTED, PayrollExecutionStep::Receipts).reduce(submitted),
                transition(PAYROLL_EXIT, PayrollExecutionStep::Exited),
            ],
        )
        .state(
            PayrollExecutionStep::Receipts,
            vec![
                breadcrumb_navigation(PayrollExecutionStep::Overview).reduce(overview),
                transition(PAYROLL_EXIT, PayrollExecutionStep::Exited),
            ],
        )
        .terminal(PayrollExecutionStep::Exited)
        .build()
}

pub fn initial_context(
    company_id: impl Into<String>,
    payroll_id: impl Into<String>,
) -> Result<PayrollExecutionContext, ConfigError> {
    let trails = build_trails(&nodes_by_id(breadcrumb_nodes()))?;
    let data = PayrollExecutionData {
        company_id: company_id.into(),
        payroll_id: payroll_id.into(),
        check_date: None,
    };
    let context = FlowContext::new(PayrollExecutionScreen::Configuration, data);
    Ok(context.with_breadcrumbs(trails, PayrollExecutionStep::Configuration.name()))
}

/// A payroll execution flow for nesting; its parent reports its events.
pub fn controller(
    company_id: impl Into<String>,
    payroll_id: impl Into<String>,
) -> Result<PayrollExecutionFlow, FlowError> {
    let context = initial_context(company_id, payroll_id)?;
    FlowController::nested(
        "payroll-execution",
        Arc::new(definition()?),
        PayrollExecutionStep::Configuration,
        move || context,
    )
}

fn overview_templates() -> BTreeMap<String, String> {
    templates([("checkDate", "{{checkDate}}")])
}

fn calculated(ctx: &PayrollExecutionContext, event: &Event<Payload>) -> PayrollExecutionContext {
    let next = FlowContext {
        component: PayrollExecutionScreen::Overview,
        data: PayrollExecutionData {
            check_date: payload_str(event, "checkDate")
                .map(str::to_string)
                .or_else(|| ctx.data.check_date.clone()),
            ..ctx.data.clone()
        },
        ..ctx.clone()
    };
    update_breadcrumbs(
        PayrollExecutionStep::Overview.name(),
        &next,
        Some(&overview_templates()),
    )
}

fn configure(ctx: &PayrollExecutionContext, _: &Event<Payload>) -> PayrollExecutionContext {
    update_breadcrumbs(
        PayrollExecutionStep::Configuration.name(),
        &ctx.show(PayrollExecutionScreen::Configuration),
        None,
    )
}

fn overview(ctx: &PayrollExecutionContext, _: &Event<Payload>) -> PayrollExecutionContext {
    update_breadcrumbs(
        PayrollExecutionStep::Overview.name(),
        &ctx.show(PayrollExecutionScreen::Overview),
        Some(&overview_templates()),
    )
}

fn submitted(ctx: &PayrollExecutionContext, _: &Event<Payload>) -> PayrollExecutionContext {
    update_breadcrumbs(
        PayrollExecutionStep::Receipts.name(),
        &ctx.show(PayrollExecutionScreen::Receipts),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowNode;
    use serde_json::json;

    fn flow() -> PayrollExecutionFlow {
        controller("company-1", "payroll-1").unwrap()
    }

    fn calculate(flow: &mut PayrollExecutionFlow) {
        let payroll = json!({ "checkDate": "2024-05-03" });
        flow.dispatch(PAYROLL_CALCULATED, Some(payroll)).unwrap();
    }

    #[test]
    fn runs_to_receipts() {
        let mut flow = flow();

        calculate(&mut flow);
        flow.dispatch(PAYROLL_SUBMITTED, None).unwrap();

        assert_eq!(flow.current(), &PayrollExecutionStep::Receipts);
        assert_eq!(flow.context().component, PayrollExecutionScreen::Receipts);
        let trail = flow.context().current_trail();
        let ids: Vec<_> = trail.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["configuration", "overview", "receipts"]);
        let path = flow.history().get_path();
        let names: Vec<_> = path.into_iter().map(|step| step.name()).collect();
        assert_eq!(names, ["configuration", "overview", "receipts"]);
    }

    #[test]
    fn overview_breadcrumb_narrates_check_date() {
        let mut flow = flow();

        calculate(&mut flow);

        let overview = flow.context().current_trail().last().cloned().unwrap();
        assert_eq!(overview.variables.unwrap()["checkDate"], "2024-05-03");
    }

    #[test]
    fn navigating_back_to_configuration() {
        let mut flow = flow();
        flow.dispatch(PAYROLL_CALCULATED, None).unwrap();

        flow.navigate("configuration").unwrap();

        let current = flow.context().current_breadcrumb_id.as_deref();
        assert_eq!(current, Some("configuration"));
        assert_eq!(flow.current(), &PayrollExecutionStep::Configuration);
    }

    #[test]
    fn exit_completes_the_flow() {
        let mut flow = flow();
        assert!(!flow.is_complete());

        flow.dispatch(PAYROLL_EXIT, None).unwrap();

        assert!(flow.is_complete());
        assert!(flow.interpreter().is_terminal());
    }
}
