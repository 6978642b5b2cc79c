//! Breadcrumb items and the nodes that arrange them into a forest.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Callback invoked with a breadcrumb id when the host navigates to it.
#[derive(Clone)]
pub struct NavigateCallback(Arc<dyn Fn(&str) + Send + Sync>);

impl NavigateCallback {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    pub fn call(&self, id: &str) {
        (self.0)(id)
    }
}

impl std::fmt::Debug for NavigateCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NavigateCallback")
    }
}

impl PartialEq for NavigateCallback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// One entry of a breadcrumb trail.
///
/// `label` is a display key the host translates within `namespace`;
/// `variables` hold the values interpolated into it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreadcrumbItem {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
    #[serde(skip)]
    pub on_navigate: Option<NavigateCallback>,
}

impl BreadcrumbItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            namespace: None,
            variables: None,
            on_navigate: None,
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn variables(mut self, variables: BTreeMap<String, String>) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn on_navigate(mut self, callback: NavigateCallback) -> Self {
        self.on_navigate = Some(callback);
        self
    }

    /// Invoke the navigation callback, if any. Returns whether one ran.
    pub fn navigate(&self) -> bool {
        match &self.on_navigate {
            Some(callback) => {
                callback.call(&self.id);
                true
            }
            None => false,
        }
    }
}

/// A breadcrumb item positioned in the forest by its parent id.
#[derive(Clone, Debug, PartialEq)]
pub struct BreadcrumbNode {
    pub id: String,
    pub parent: Option<String>,
    pub item: BreadcrumbItem,
}

impl BreadcrumbNode {
    /// A node at the root of a trail.
    pub fn root(item: BreadcrumbItem) -> Self {
        Self {
            id: item.id.clone(),
            parent: None,
            item,
        }
    }

    /// A node below `parent`.
    pub fn child(parent: impl Into<String>, item: BreadcrumbItem) -> Self {
        Self {
            id: item.id.clone(),
            parent: Some(parent.into()),
            item,
        }
    }
}
