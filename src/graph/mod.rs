//! Graph construction for visualization
//!
//! This module turns catalog snapshots into typed node/link sets:
//! - Nodes namespaced by kind and de-duplicated through an identity map
//! - Directed, typed links validated against the final node set
//! - Category, theme, VC and department views
//! - Nested trees for tree and bubble layouts

pub mod builder;
pub mod link;
pub mod node;
pub mod property;
pub mod store;
pub mod tree;
pub mod types;

pub use builder::{build_graph, GraphBuild, GraphRequest, GraphView};
pub use link::Link;
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{Graph, GraphSet, GraphStatistics};
pub use tree::TreeNode;
pub use types::{LinkKind, NodeId, NodeKind};
