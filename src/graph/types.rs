//! Core type definitions for the rendered graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a node within one build
///
/// Namespaced by kind (`category:A`, `startup:s1`) so records from different
/// tiers sharing a raw id never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    /// Id of the node representing entity `entity_id` of the given kind
    pub fn for_entity(kind: NodeKind, entity_id: &str) -> Self {
        NodeId(format!("{}:{}", kind.as_str(), entity_id))
    }

    /// Id of the phase bucket under `owner`; `None` is the "no phase" bucket
    ///
    /// The owner is length-prefixed so an owner or phase id containing `:`
    /// cannot produce another pair's id, and the "no phase" bucket carries no
    /// phase segment so no real phase id can reach it.
    pub fn for_bucket(owner: &NodeId, phase_id: Option<&str>) -> Self {
        let prefix = NodeKind::BizDevPhase.as_str();
        let owner = owner.as_str();
        match phase_id {
            Some(phase_id) => NodeId(format!("{}:{}:{}:{}", prefix, owner.len(), owner, phase_id)),
            None => NodeId(format!("{}:{}:{}", prefix, owner.len(), owner)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

/// Kind of entity a node displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Category,
    Theme,
    Initiative,
    Topic,
    Startup,
    #[serde(rename = "bizdevphase")]
    BizDevPhase,
    Vc,
    Department,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Category => "category",
            NodeKind::Theme => "theme",
            NodeKind::Initiative => "initiative",
            NodeKind::Topic => "topic",
            NodeKind::Startup => "startup",
            NodeKind::BizDevPhase => "bizdevphase",
            NodeKind::Vc => "vc",
            NodeKind::Department => "department",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relationship a link expresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Parent category to child category
    Contains,
    /// Theme to initiative
    Initiative,
    /// Initiative to topic
    Topic,
    /// Theme to phase bucket
    Phase,
    /// Any owner to a startup
    Startup,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Contains => "contains",
            LinkKind::Initiative => "initiative",
            LinkKind::Topic => "topic",
            LinkKind::Phase => "phase",
            LinkKind::Startup => "startup",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
