//! Walk the company locations flow from the list to a saved location.
//!
//! Run with `RUST_LOG=flowkit=debug` to see transitions as they apply.

use flowkit::flow::EventSink;
use flowkit::flows::locations::{self, LOCATION_CREATE, LOCATION_CREATED, LOCATION_EDIT};
use flowkit::flows::Payload;
use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flowkit=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let on_event = EventSink::new(|kind: &str, payload: Option<&Payload>| match payload {
        Some(payload) => println!("onEvent: {kind} {payload}"),
        None => println!("onEvent: {kind}"),
    });
    let mut flow = locations::controller("company-1", on_event)?;

    let steps = [
        (LOCATION_CREATE, None),
        (LOCATION_CREATED, Some(json!({ "uuid": "loc-1", "name": "HQ" }))),
        (LOCATION_EDIT, Some(json!({ "uuid": "loc-1", "name": "HQ" }))),
        ("unrelated/event", None),
    ];

    for (kind, payload) in steps {
        let delivery = flow.dispatch(kind, payload)?;
        let trail: Vec<String> = flow
            .context()
            .current_trail()
            .iter()
            .map(|item| match &item.variables {
                Some(variables) if !variables.is_empty() => {
                    format!("{} {:?}", item.label, variables)
                }
                _ => item.label.clone(),
            })
            .collect();
        println!(
            "{kind}: transitioned={} screen={:?} breadcrumbs=[{}]",
            delivery.is_transition(),
            flow.context().component,
            trail.join(" > ")
        );
    }

    flow.navigate("index")?;
    println!("back on {:?}", flow.context().component);
    Ok(())
}
