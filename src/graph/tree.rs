//! Nested view of a built graph for tree and bubble layouts

use super::node::Node;
use super::store::Graph;
use super::types::{NodeId, NodeKind};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Number of leaves below (1 for a leaf), used as bubble size
    pub value: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl Graph {
    /// Expand the graph into trees rooted at nodes without incoming links
    ///
    /// A node reachable along several paths appears under each parent. A
    /// link leading back into the current path is skipped.
    pub fn to_tree(&self) -> Vec<TreeNode> {
        let by_id: IndexMap<&NodeId, &Node> = self.nodes.iter().map(|node| (&node.id, node)).collect();
        let mut children: IndexMap<&NodeId, Vec<&NodeId>> = IndexMap::new();
        let mut has_parent: FxHashSet<&NodeId> = FxHashSet::default();

        for link in &self.links {
            if !by_id.contains_key(&link.source) || !by_id.contains_key(&link.target) {
                continue;
            }
            children.entry(&link.source).or_default().push(&link.target);
            has_parent.insert(&link.target);
        }

        let mut path = FxHashSet::default();
        self.nodes
            .iter()
            .filter(|node| !has_parent.contains(&node.id))
            .map(|node| build_subtree(node, &by_id, &children, &mut path))
            .collect()
    }
}

fn build_subtree<'g>(
    node: &'g Node,
    by_id: &IndexMap<&'g NodeId, &'g Node>,
    children: &IndexMap<&'g NodeId, Vec<&'g NodeId>>,
    path: &mut FxHashSet<&'g NodeId>,
) -> TreeNode {
    path.insert(&node.id);

    let mut subtrees = Vec::new();
    if let Some(child_ids) = children.get(&node.id) {
        for child_id in child_ids {
            if path.contains(child_id) {
                continue;
            }
            if let Some(child) = by_id.get(child_id) {
                subtrees.push(build_subtree(child, by_id, children, path));
            }
        }
    }

    path.remove(&node.id);

    let value = if subtrees.is_empty() {
        1
    } else {
        subtrees.iter().map(|child| child.value).sum()
    };
    TreeNode {
        id: node.id.clone(),
        label: node.label.clone(),
        kind: node.kind,
        value,
        children: subtrees,
    }
}
