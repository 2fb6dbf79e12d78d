//! Node handed to the renderer

use super::property::{PropertyMap, PropertyValue};
use super::types::{NodeId, NodeKind};
use serde::{Deserialize, Serialize};

/// A displayed entity
///
/// Nodes have:
/// - An id unique within the build (reused when the entity is reached twice)
/// - A display label
/// - A kind (serialized as `type`)
/// - A payload of presentation properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    pub label: String,

    #[serde(rename = "type")]
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub payload: PropertyMap,
}

impl Node {
    pub fn new(id: NodeId, label: impl Into<String>, kind: NodeKind) -> Self {
        Node {
            id,
            label: label.into(),
            kind,
            payload: PropertyMap::new(),
        }
    }

    /// Node for catalog entity `entity_id`, id namespaced by kind
    pub fn for_entity(kind: NodeKind, entity_id: &str, label: impl Into<String>) -> Self {
        Node::new(NodeId::for_entity(kind, entity_id), label, kind).with_property("entityId", entity_id)
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.payload.insert(key.into(), value.into())
    }

    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.payload.get(key)
    }

    /// Raw catalog id this node displays, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.get_property("entityId").and_then(PropertyValue::as_string)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_entity() {
        let node = Node::for_entity(NodeKind::Startup, "s1", "Acme").with_property("status", "active");
        assert_eq!(node.id.as_str(), "startup:s1");
        assert_eq!(node.entity_id(), Some("s1"));
        assert_eq!(node.get_property("status").unwrap().as_string(), Some("active"));
    }

    #[test]
    fn test_serialized_shape() {
        let node = Node::for_entity(NodeKind::Category, "A", "Tech");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], "category:A");
        assert_eq!(json["label"], "Tech");
        assert_eq!(json["type"], "category");
        assert_eq!(json["payload"]["entityId"], "A");
    }

    #[test]
    fn test_node_equality_by_id() {
        let a = Node::new(NodeId::new("x"), "one", NodeKind::Topic);
        let b = Node::new(NodeId::new("x"), "two", NodeKind::Topic);
        assert_eq!(a, b);
    }
}
