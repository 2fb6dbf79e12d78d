//! Directed link between two nodes

use super::types::{LinkKind, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// Node the link goes FROM
    pub source: NodeId,

    /// Node the link goes TO
    pub target: NodeId,

    #[serde(rename = "type")]
    pub kind: LinkKind,
}

impl Link {
    pub fn new(source: NodeId, target: NodeId, kind: LinkKind) -> Self {
        Link {
            source,
            target,
            kind,
        }
    }

    pub fn starts_from(&self, node: &NodeId) -> bool {
        &self.source == node
    }

    pub fn ends_at(&self, node: &NodeId) -> bool {
        &self.target == node
    }
}
