//! Information requests: list open requests and respond to one.

use crate::builder::{transition, ConfigError, MachineBuilder};
use crate::core::{BoxError, Event};
use crate::flow::{EventSink, FlowContext, FlowController};
use crate::flows::{require_str, Payload, CANCEL};
use crate::machine::{FlowError, MachineDefinition};
use crate::state_enum;
use std::sync::Arc;

pub const REQUEST_RESPOND: &str = "informationRequest/respond";
pub const REQUEST_SUBMITTED: &str = "informationRequest/submitted";

state_enum! {
    pub enum InformationRequestStep {
        List => "list",
        Respond => "respond",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InformationRequestScreen {
    List,
    Response { request_id: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InformationRequestData {
    pub company_id: String,
    pub request_id: Option<String>,
    /// Set after a response was submitted, until the next one is opened.
    pub submitted: bool,
}

pub type InformationRequestContext = FlowContext<InformationRequestScreen, InformationRequestData>;
pub type InformationRequestDefinition =
    MachineDefinition<InformationRequestStep, InformationRequestContext, Payload>;
pub type InformationRequestFlow =
    FlowController<InformationRequestStep, InformationRequestContext, Payload>;

pub fn definition() -> Result<InformationRequestDefinition, ConfigError> {
    MachineBuilder::<InformationRequestStep, InformationRequestContext, Payload>::new()
        .state(
            InformationRequestStep::List,
            vec![transition(REQUEST_RESPOND, InformationRequestStep::Respond).try_reduce(respond)],
        )
        .state(
            InformationRequestStep::Respond,
            vec![
                transition(REQUEST_SUBMITTED, InformationRequestStep::List).reduce(submitted),
                transition(CANCEL, InformationRequestStep::List).reduce(cancelled),
            ],
        )
        .build()
}

pub fn controller(
    company_id: impl Into<String>,
    on_event: EventSink<Payload>,
) -> Result<InformationRequestFlow, FlowError> {
    let data = InformationRequestData {
        company_id: company_id.into(),
        ..InformationRequestData::default()
    };
    FlowController::new(
        "information-requests",
        Arc::new(definition()?),
        InformationRequestStep::List,
        move || FlowContext::new(InformationRequestScreen::List, data),
        on_event,
    )
}

fn respond(
    ctx: &InformationRequestContext,
    event: &Event<Payload>,
) -> Result<InformationRequestContext, BoxError> {
    let request_id = require_str(event, "uuid")?;
    Ok(FlowContext {
        component: InformationRequestScreen::Response {
            request_id: request_id.clone(),
        },
        data: InformationRequestData {
            request_id: Some(request_id),
            submitted: false,
            ..ctx.data.clone()
        },
        ..ctx.clone()
    })
}

fn submitted(ctx: &InformationRequestContext, _: &Event<Payload>) -> InformationRequestContext {
    show_list(ctx, true)
}

fn cancelled(ctx: &InformationRequestContext, _: &Event<Payload>) -> InformationRequestContext {
    show_list(ctx, false)
}

fn show_list(ctx: &InformationRequestContext, submitted: bool) -> InformationRequestContext {
    FlowContext {
        component: InformationRequestScreen::List,
        data: InformationRequestData {
            request_id: None,
            submitted,
            ..ctx.data.clone()
        },
        ..ctx.clone()
    }
}
