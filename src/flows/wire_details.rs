//! Wire-in confirmation: banner, wire instructions, confirmation.

use crate::builder::{transition, ConfigError, MachineBuilder};
use crate::core::{BoxError, Event};
use crate::flow::{EventSink, FlowContext, FlowController};
use crate::flows::{payload_str, require_str, Payload, CANCEL};
use crate::machine::{FlowError, MachineDefinition};
use crate::state_enum;
use std::sync::Arc;

pub const WIRE_START: &str = "wireIn/start";
/// Payload carries the `wireInRequestUuid` the user confirmed.
pub const WIRE_CONFIRMED: &str = "wireIn/confirmed";
pub const WIRE_DISMISS: &str = "wireIn/dismiss";

state_enum! {
    pub enum WireStep {
        Banner => "banner",
        Instructions => "instructions",
        Confirmed => "confirmed",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireScreen {
    Banner,
    Instructions { wire_in_request_id: Option<String> },
    Confirmation { wire_in_request_id: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WireData {
    pub company_id: String,
    /// Request pre-selected from the banner, if the company has several.
    pub selected_request_id: Option<String>,
    pub confirmed_request_id: Option<String>,
}

pub type WireContext = FlowContext<WireScreen, WireData>;
pub type WireDefinition = MachineDefinition<WireStep, WireContext, Payload>;
pub type WireFlow = FlowController<WireStep, WireContext, Payload>;

pub fn definition() -> Result<WireDefinition, ConfigError> {
    MachineBuilder::<WireStep, WireContext, Payload>::new()
        .state(
            WireStep::Banner,
            vec![transition(WIRE_START, WireStep::Instructions).reduce(start)],
        )
        .state(
            WireStep::Instructions,
            vec![
                transition(WIRE_CONFIRMED, WireStep::Confirmed).try_reduce(confirmed),
                transition(CANCEL, WireStep::Banner).reduce(banner),
            ],
        )
        .state(
            WireStep::Confirmed,
            vec![transition(WIRE_DISMISS, WireStep::Banner).reduce(banner)],
        )
        .build()
}

pub fn controller(
    company_id: impl Into<String>,
    on_event: EventSink<Payload>,
) -> Result<WireFlow, FlowError> {
    let data = WireData {
        company_id: company_id.into(),
        ..WireData::default()
    };
    FlowController::new(
        "wire-details",
        Arc::new(definition()?),
        WireStep::Banner,
        move || FlowContext::new(WireScreen::Banner, data),
        on_event,
    )
}

fn start(ctx: &WireContext, event: &Event<Payload>) -> WireContext {
    let selected = payload_str(event, "wireInRequestUuid").map(str::to_string);
    FlowContext {
        component: WireScreen::Instructions {
            wire_in_request_id: selected.clone(),
        },
        data: WireData {
            selected_request_id: selected,
            confirmed_request_id: None,
            ..ctx.data.clone()
        },
        ..ctx.clone()
    }
}

fn confirmed(ctx: &WireContext, event: &Event<Payload>) -> Result<WireContext, BoxError> {
    let request_id = require_str(event, "wireInRequestUuid")?;
    Ok(FlowContext {
        component: WireScreen::Confirmation {
            wire_in_request_id: request_id.clone(),
        },
        data: WireData {
            confirmed_request_id: Some(request_id),
            ..ctx.data.clone()
        },
        ..ctx.clone()
    })
}

fn banner(ctx: &WireContext, _: &Event<Payload>) -> WireContext {
    FlowContext {
        component: WireScreen::Banner,
        data: WireData {
            selected_request_id: None,
            ..ctx.data.clone()
        },
        ..ctx.clone()
    }
}
