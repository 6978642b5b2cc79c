//! Runtime options for interpreters and flow controllers.

use serde::{Deserialize, Serialize};

/// Options controlling bookkeeping around a running flow.
///
/// Options deserialize with defaults for every missing field, so hosts can
/// pass a partial JSON object.
///
/// # Example
///
/// ```rust
/// use flowkit::FlowOptions;
///
/// let options: FlowOptions = serde_json::from_str(r#"{ "history_limit": 10 }"#).unwrap();
/// assert_eq!(options.history_limit, Some(10));
/// assert!(options.record_history);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowOptions {
    /// Record applied transitions in the interpreter's history.
    pub record_history: bool,

    /// Keep at most this many history records; `None` keeps all of them.
    pub history_limit: Option<usize>,

    /// Unmount a nested child flow once it reaches a final state.
    pub auto_unmount_children: bool,
}

pub const DEFAULT_HISTORY_LIMIT: usize = 256;

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            record_history: true,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            auto_unmount_children: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let options: FlowOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, FlowOptions::default());
    }

    #[test]
    fn null_limit_disables_trimming() {
        let json = r#"{ "history_limit": null, "auto_unmount_children": false }"#;
        let options: FlowOptions = serde_json::from_str(json).unwrap();

        assert_eq!(options.history_limit, None);
        assert!(!options.auto_unmount_children);
        assert!(options.record_history);
    }
}
