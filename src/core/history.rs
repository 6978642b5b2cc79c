//! Transition history tracking.
//!
//! Provides immutable tracking of the transitions a flow has applied.
//! Ignored events are never recorded.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use flowkit::core::{State, TransitionRecord};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Step {
///     Index,
///     Edit,
/// }
///
/// impl State for Step {
///     fn name(&self) -> &str {
///         match self {
///             Self::Index => "index",
///             Self::Edit => "edit",
///         }
///     }
/// }
///
/// let record = TransitionRecord {
///     from: Step::Index,
///     to: Step::Edit,
///     event: "EDIT".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.event, "EDIT");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Kind of the event that fired the transition
    pub event: String,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of applied transitions.
///
/// History is immutable: `record` returns a new history with the transition
/// added and leaves the receiver untouched.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct FlowHistory<S: State> {
    transitions: Vec<TransitionRecord<S>>,
}

impl<S: State> Default for FlowHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> FlowHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: TransitionRecord<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Record a transition, keeping at most `limit` of the newest records.
    pub fn record_bounded(&self, transition: TransitionRecord<S>, limit: Option<usize>) -> Self {
        let mut next = self.record(transition);
        if let Some(limit) = limit {
            let excess = next.transitions.len().saturating_sub(limit);
            next.transitions.drain(..excess);
        }
        next
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest retained record followed by the
    /// `to` state of every record.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Duration between the first and last retained record.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all retained records, oldest first.
    pub fn transitions(&self) -> &[TransitionRecord<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Index,
        Add,
        Edit,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Index => "index",
                Self::Add => "add",
                Self::Edit => "edit",
            }
        }
    }

    fn record(from: TestState, to: TestState, event: &str) -> TransitionRecord<TestState> {
        TransitionRecord {
            from,
            to,
            event: event.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: FlowHistory<TestState> = FlowHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = FlowHistory::new();
        let new_history = history.record(record(TestState::Index, TestState::Add, "CREATE"));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let history = FlowHistory::new()
            .record(record(TestState::Index, TestState::Edit, "EDIT"))
            .record(record(TestState::Edit, TestState::Index, "UPDATED"));

        let path = history.get_path();
        assert_eq!(
            path,
            vec![&TestState::Index, &TestState::Edit, &TestState::Index]
        );
    }

    #[test]
    fn bounded_record_drops_oldest() {
        let history = FlowHistory::new()
            .record_bounded(record(TestState::Index, TestState::Add, "CREATE"), Some(2))
            .record_bounded(record(TestState::Add, TestState::Index, "CREATED"), Some(2))
            .record_bounded(record(TestState::Index, TestState::Edit, "EDIT"), Some(2));

        assert_eq!(history.len(), 2);
        assert_eq!(history.transitions()[0].event, "CREATED");
        assert_eq!(history.transitions()[1].event, "EDIT");
    }

    #[test]
    fn unbounded_record_keeps_everything() {
        let mut history = FlowHistory::new();
        for _ in 0..10 {
            let next = record(TestState::Index, TestState::Add, "CREATE");
            history = history.record_bounded(next, None);
        }
        assert_eq!(history.len(), 10);
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let history = FlowHistory::new().record(record(TestState::Index, TestState::Add, "CREATE"));

        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = FlowHistory::new().record(record(TestState::Index, TestState::Add, "CREATE"));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: FlowHistory<TestState> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.transitions()[0].to, TestState::Add);
    }
}
