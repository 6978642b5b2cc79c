//! Building root-to-node trails from a breadcrumb forest.

use crate::breadcrumbs::item::{BreadcrumbItem, BreadcrumbNode};
use crate::builder::ConfigError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Ordered root-first items for one state. Shared, never mutated in place.
pub type Trail = Arc<Vec<BreadcrumbItem>>;

/// Trail for every state, keyed by state name.
pub type BreadcrumbTrail = HashMap<String, Trail>;

/// Index nodes by their id.
pub fn nodes_by_id(
    nodes: impl IntoIterator<Item = BreadcrumbNode>,
) -> HashMap<String, BreadcrumbNode> {
    nodes
        .into_iter()
        .map(|node| (node.id.clone(), node))
        .collect()
}

/// Compute the root-to-node trail of every node.
///
/// Walks `parent` links upward from each node and reverses the collected
/// items. Fails on a parent cycle or a parent id that is not in `nodes`.
/// The input is left untouched and every returned trail is freshly built.
///
/// # Example
///
/// ```rust
/// use flowkit::breadcrumbs::{build_trails, nodes_by_id, BreadcrumbItem, BreadcrumbNode};
///
/// let nodes = nodes_by_id([
///     BreadcrumbNode::root(BreadcrumbItem::new("index", "Locations")),
///     BreadcrumbNode::child("index", BreadcrumbItem::new("edit", "Edit location")),
/// ]);
///
/// let trails = build_trails(&nodes).unwrap();
/// let labels: Vec<_> = trails["edit"].iter().map(|item| item.label.as_str()).collect();
/// assert_eq!(labels, ["Locations", "Edit location"]);
/// ```
pub fn build_trails(
    nodes: &HashMap<String, BreadcrumbNode>,
) -> Result<BreadcrumbTrail, ConfigError> {
    let mut ids: Vec<&String> = nodes.keys().collect();
    ids.sort();

    let mut trails = BreadcrumbTrail::with_capacity(nodes.len());
    for id in ids {
        let trail = trail_for(id, nodes)?;
        trails.insert(id.clone(), Arc::new(trail));
    }
    Ok(trails)
}

fn trail_for(
    id: &str,
    nodes: &HashMap<String, BreadcrumbNode>,
) -> Result<Vec<BreadcrumbItem>, ConfigError> {
    let mut visited = HashSet::new();
    let mut items: Vec<BreadcrumbItem> = Vec::new();
    let mut cursor = id;

    loop {
        if !visited.insert(cursor) {
            return Err(ConfigError::BreadcrumbCycle {
                id: cursor.to_string(),
            });
        }

        let Some(node) = nodes.get(cursor) else {
            let child = items.last().map_or(id, |item| item.id.as_str());
            return Err(ConfigError::UnknownBreadcrumbParent {
                id: child.to_string(),
                parent: cursor.to_string(),
            });
        };
        items.push(node.item.clone());

        match node.parent.as_deref() {
            Some(parent) => cursor = parent,
            None => break,
        }
    }

    items.reverse();
    Ok(items)
}
