//! Node/link accumulation and the validated output graph
//!
//! Uses an insertion-ordered identity map for node de-duplication:
//! - nodes: NodeId -> Node (first insertion wins, order is emission order)
//! - links: insertion-ordered set, so repeated links collapse

use super::link::Link;
use super::node::Node;
use super::types::{LinkKind, NodeId, NodeKind};
use crate::diagnostics::{Diagnostic, Diagnostics};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Mutable accumulator used during one build
#[derive(Debug, Default)]
pub struct GraphSet {
    nodes: IndexMap<NodeId, Node>,
    links: IndexSet<Link>,
}

impl GraphSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless a node with the same id already exists; returns whether it was new
    pub fn insert_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        self.nodes.insert(node.id.clone(), node);
        true
    }

    /// Id of the node, building it only on first sight
    pub fn ensure_node(&mut self, id: NodeId, make: impl FnOnce() -> Node) -> NodeId {
        if !self.nodes.contains_key(&id) {
            let node = make();
            self.nodes.insert(id.clone(), node);
        }
        id
    }

    pub fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Record a link; endpoints are checked in [`GraphSet::finish`]
    pub fn link(&mut self, source: NodeId, target: NodeId, kind: LinkKind) -> bool {
        self.links.insert(Link::new(source, target, kind))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Drop links with a missing endpoint, reporting each one
    pub fn finish(self, diagnostics: &mut Diagnostics) -> (Graph, Vec<Link>) {
        let GraphSet { nodes, links } = self;
        let (valid, dropped): (Vec<Link>, Vec<Link>) = links
            .into_iter()
            .partition(|link| nodes.contains_key(&link.source) && nodes.contains_key(&link.target));

        for link in &dropped {
            diagnostics.push(Diagnostic::InvalidLink {
                source: link.source.to_string(),
                target: link.target.to_string(),
            });
        }

        let graph = Graph {
            nodes: nodes.into_values().collect(),
            links: valid,
        };
        debug!(
            "Finished graph with {} nodes, {} links ({} dropped)",
            graph.nodes.len(),
            graph.links.len(),
            dropped.len()
        );
        (graph, dropped)
    }
}

/// Node/link set handed to a renderer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

/// Counts by kind for diagnostics and summaries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub link_count: usize,
    pub nodes_by_kind: IndexMap<NodeKind, usize>,
    pub links_by_kind: IndexMap<LinkKind, usize>,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn has_node(&self, id: &NodeId) -> bool {
        self.get_node(id).is_some()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<&Node> {
        self.nodes.iter().filter(|node| node.kind == kind).collect()
    }

    pub fn get_outgoing_links(&self, id: &NodeId) -> Vec<&Link> {
        self.links.iter().filter(|link| link.starts_from(id)).collect()
    }

    pub fn get_incoming_links(&self, id: &NodeId) -> Vec<&Link> {
        self.links.iter().filter(|link| link.ends_at(id)).collect()
    }

    pub fn statistics(&self) -> GraphStatistics {
        let mut stats = GraphStatistics {
            node_count: self.nodes.len(),
            link_count: self.links.len(),
            ..Default::default()
        };
        for node in &self.nodes {
            *stats.nodes_by_kind.entry(node.kind).or_insert(0) += 1;
        }
        for link in &self.links {
            *stats.links_by_kind.entry(link.kind).or_insert(0) += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str) -> Node {
        Node::for_entity(NodeKind::Category, id, id)
    }

    #[test]
    fn test_insert_node_deduplicates() {
        let mut set = GraphSet::new();
        assert!(set.insert_node(category("A")));
        assert!(!set.insert_node(Node::for_entity(NodeKind::Category, "A", "renamed")));
        assert_eq!(set.node_count(), 1);
        assert_eq!(set.get_node(&NodeId::new("category:A")).unwrap().label, "A");
    }

    #[test]
    fn test_ensure_node_builds_once() {
        let mut set = GraphSet::new();
        let mut built = 0;
        for _ in 0..3 {
            set.ensure_node(NodeId::new("topic:t1"), || {
                built += 1;
                Node::for_entity(NodeKind::Topic, "t1", "Topic")
            });
        }
        assert_eq!(built, 1);
    }

    #[test]
    fn test_finish_drops_dangling_links() {
        let mut set = GraphSet::new();
        set.insert_node(category("A"));
        set.insert_node(category("B"));
        set.link(NodeId::new("category:A"), NodeId::new("category:B"), LinkKind::Contains);
        set.link(NodeId::new("category:A"), NodeId::new("startup:ghost"), LinkKind::Startup);
        set.link(NodeId::new("category:A"), NodeId::new("category:B"), LinkKind::Contains);

        let mut diagnostics = Diagnostics::new();
        let (graph, dropped) = set.finish(&mut diagnostics);

        assert_eq!(graph.link_count(), 1);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].target.as_str(), "startup:ghost");
        assert_eq!(diagnostics.len(), 1);
        for link in &graph.links {
            assert!(graph.has_node(&link.source) && graph.has_node(&link.target));
        }
    }

    #[test]
    fn test_statistics() {
        let mut set = GraphSet::new();
        set.insert_node(category("A"));
        set.insert_node(Node::for_entity(NodeKind::Startup, "s1", "Acme"));
        set.link(NodeId::new("category:A"), NodeId::new("startup:s1"), LinkKind::Startup);
        let (graph, _) = set.finish(&mut Diagnostics::new());

        let stats = graph.statistics();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.nodes_by_kind[&NodeKind::Startup], 1);
        assert_eq!(stats.links_by_kind[&LinkKind::Startup], 1);
        assert_eq!(graph.get_outgoing_links(&NodeId::new("category:A")).len(), 1);
        assert_eq!(graph.get_incoming_links(&NodeId::new("startup:s1")).len(), 1);
    }
}
