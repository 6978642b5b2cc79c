//! Late-bound `{{key}}` variables in breadcrumb labels.

use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

static TEMPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\{\s*(\w+)\s*\}\}$").expect("template pattern is valid")
});

/// Named values breadcrumb templates resolve against.
pub trait VariableSource {
    /// Rendered value for `key`, or `None` when absent.
    fn variable(&self, key: &str) -> Option<String>;
}

impl VariableSource for HashMap<String, String> {
    fn variable(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl VariableSource for BTreeMap<String, String> {
    fn variable(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl VariableSource for serde_json::Map<String, Value> {
    fn variable(&self, key: &str) -> Option<String> {
        self.get(key).and_then(render)
    }
}

impl VariableSource for Value {
    fn variable(&self, key: &str) -> Option<String> {
        self.get(key).and_then(render)
    }
}

impl VariableSource for () {
    fn variable(&self, _key: &str) -> Option<String> {
        None
    }
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Identifier named by a `{{ identifier }}` template, if `template` is one.
pub fn template_key(template: &str) -> Option<&str> {
    TEMPLATE
        .captures(template)
        .and_then(|captures| captures.get(1))
        .map(|key| key.as_str())
}

/// Substitute `{{key}}` templates with values from `source`.
///
/// A template whose key is missing resolves to `""`; values that are not
/// templates pass through unchanged. `None` yields an empty map.
///
/// # Example
///
/// ```rust
/// use flowkit::breadcrumbs::resolve_variables;
/// use std::collections::{BTreeMap, HashMap};
///
/// let templates = BTreeMap::from([
///     ("greeting".to_string(), "hi".to_string()),
///     ("name".to_string(), "{{who}}".to_string()),
/// ]);
///
/// let empty: HashMap<String, String> = HashMap::new();
/// let resolved = resolve_variables(Some(&templates), &empty);
/// assert_eq!(resolved["greeting"], "hi");
/// assert_eq!(resolved["name"], "");
///
/// let source = HashMap::from([("who".to_string(), "Ada".to_string())]);
/// assert_eq!(resolve_variables(Some(&templates), &source)["name"], "Ada");
/// ```
pub fn resolve_variables<V>(
    templates: Option<&BTreeMap<String, String>>,
    source: &V,
) -> BTreeMap<String, String>
where
    V: VariableSource + ?Sized,
{
    let Some(templates) = templates else {
        return BTreeMap::new();
    };

    templates
        .iter()
        .map(|(name, template)| {
            let value = match template_key(template) {
                Some(key) => source.variable(key).unwrap_or_default(),
                None => template.clone(),
            };
            (name.clone(), value)
        })
        .collect()
}
