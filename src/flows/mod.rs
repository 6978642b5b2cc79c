//! Machine definitions for the domain flows.
//!
//! Each flow declares its steps with [`state_enum!`](crate::state_enum), a
//! screen enum telling the host what to render, the flow's own data, and a
//! `controller` constructor mounting it in its initial step. Payloads are
//! the API entities the host passes along as JSON.

pub mod information_requests;
pub mod locations;
pub mod off_cycle;
pub mod pay_schedule;
pub mod payroll_execution;
pub mod wire_details;

use crate::breadcrumbs::BreadcrumbItem;
use crate::core::{BoxError, Event};
use serde_json::Value;
use std::collections::BTreeMap;

/// Event payload shared by the domain flows.
pub type Payload = Value;

/// Event type shared by every flow for "Cancel" buttons.
pub const CANCEL: &str = "cancel";

/// String field `key` of the event payload.
pub fn payload_str<'a>(event: &'a Event<Value>, key: &str) -> Option<&'a str> {
    event.payload.as_ref()?.get(key)?.as_str()
}

/// String field `key` of the event payload, failing the transition when
/// absent.
pub(crate) fn require_str(event: &Event<Value>, key: &str) -> Result<String, BoxError> {
    payload_str(event, key)
        .map(str::to_string)
        .ok_or_else(|| format!("`{}` payload has no `{}` field", event.kind, key).into())
}

/// Breadcrumb item `id` labelled `breadcrumbs.{id}` within `namespace`.
pub(crate) fn breadcrumb(namespace: &str, id: &str) -> BreadcrumbItem {
    BreadcrumbItem::new(id, format!("breadcrumbs.{id}")).namespace(namespace)
}

/// Breadcrumb variable templates from `(name, template)` pairs.
pub(crate) fn templates<const N: usize>(pairs: [(&str, &str); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(name, template)| (name.to_string(), template.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_str_reads_string_fields_only() {
        let event = Event::with_payload("x", json!({ "id": "loc-1", "count": 3 }));

        assert_eq!(payload_str(&event, "id"), Some("loc-1"));
        assert_eq!(payload_str(&event, "count"), None);
        assert_eq!(payload_str(&Event::new("x"), "id"), None);
    }

    #[test]
    fn breadcrumb_label_follows_id() {
        let item = breadcrumb("Company.Locations", "edit");

        assert_eq!(item.id, "edit");
        assert_eq!(item.label, "breadcrumbs.edit");
        assert_eq!(item.namespace.as_deref(), Some("Company.Locations"));
    }

    #[test]
    fn require_str_names_the_missing_field() {
        let err = require_str(&Event::new("company/location/edit"), "uuid").unwrap_err();

        assert_eq!(
            err.to_string(),
            "`company/location/edit` payload has no `uuid` field"
        );
    }
}
