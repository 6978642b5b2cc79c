//! Breadcrumb navigation events.

use crate::builder::{transition, TransitionBuilder};
use crate::core::{Event, Guard, State};
use serde_json::Value;

/// Event type dispatched when the user picks a breadcrumb.
pub const BREADCRUMB_NAVIGATE: &str = "breadcrumb/navigate";

/// Payloads that can carry a breadcrumb navigation key.
pub trait NavigationPayload {
    /// Key of the breadcrumb navigated to, if this payload carries one.
    fn navigation_key(&self) -> Option<&str>;

    /// Payload announcing navigation to `key`.
    fn for_navigation(key: &str) -> Self;
}

impl NavigationPayload for Value {
    fn navigation_key(&self) -> Option<&str> {
        self.get("key").and_then(Value::as_str)
    }

    fn for_navigation(key: &str) -> Self {
        serde_json::json!({ "key": key })
    }
}

impl NavigationPayload for String {
    fn navigation_key(&self) -> Option<&str> {
        Some(self)
    }

    fn for_navigation(key: &str) -> Self {
        key.to_string()
    }
}

/// Guard passing only for navigation events whose key is `key`.
pub fn navigates_to<C, P>(key: impl Into<String>) -> Guard<C, P>
where
    C: 'static,
    P: NavigationPayload + 'static,
{
    let key = key.into();
    Guard::new(move |_: &C, event: &Event<P>| {
        event
            .payload
            .as_ref()
            .and_then(NavigationPayload::navigation_key)
            == Some(key.as_str())
    })
}

/// Transition back to `target` when its breadcrumb is picked.
pub fn breadcrumb_navigation<S, C, P>(target: S) -> TransitionBuilder<S, C, P>
where
    S: State,
    C: 'static,
    P: NavigationPayload + 'static,
{
    let key = target.name().to_string();
    transition(BREADCRUMB_NAVIGATE, target).guard(navigates_to(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_payload_carries_key() {
        let payload = Value::for_navigation("index");

        assert_eq!(payload, json!({ "key": "index" }));
        assert_eq!(payload.navigation_key(), Some("index"));
        assert_eq!(json!({ "id": 3 }).navigation_key(), None);
    }

    #[test]
    fn guard_matches_only_its_key() {
        let guard = navigates_to::<(), Value>("index");

        let to_index = Event::with_payload(BREADCRUMB_NAVIGATE, Value::for_navigation("index"));
        let to_edit = Event::with_payload(BREADCRUMB_NAVIGATE, Value::for_navigation("edit"));
        let bare: Event<Value> = Event::new(BREADCRUMB_NAVIGATE);

        assert!(guard.check(&(), &to_index).unwrap());
        assert!(!guard.check(&(), &to_edit).unwrap());
        assert!(!guard.check(&(), &bare).unwrap());
    }

    #[test]
    fn string_payloads_are_their_own_key() {
        let guard = navigates_to::<(), String>("overview");
        let event = Event::with_payload(BREADCRUMB_NAVIGATE, String::for_navigation("overview"));

        assert!(guard.check(&(), &event).unwrap());
    }
}
