//! Portfolio Graph
//!
//! Relationship-graph construction and pivot aggregation over a catalog of
//! organizational entities and the startups that reference them.
//!
//! # Architecture
//!
//! - Entity store (external): supplies immutable snapshots via [`CatalogSource`]
//! - Hierarchy resolver: top-level ancestors and descendant expansion, safe on
//!   broken links and cycles
//! - Graph builder: typed node/link sets for tree, bubble and force layouts
//! - Pivot aggregator: dense row × column count matrices
//! - Statistics aggregator: totals and de-duplicated subject lists
//!
//! Every operation is a pure, synchronous function of its explicit
//! arguments. Data-integrity problems never abort a call; they come back as
//! [`Diagnostic`]s next to the result and are logged through `tracing`.
//!
//! ## Example Usage
//!
//! ```rust
//! use portfolio_graph::{
//!     build_matrix, summarize, Catalog, Category, Dimension, EngineConfig, PivotRequest,
//!     Subject, SummaryRequest,
//! };
//!
//! let mut catalog = Catalog::new();
//! catalog.categories = vec![
//!     Category::new("A", "Tech"),
//!     Category::new("B", "AI").with_parent("A"),
//! ];
//! catalog.subjects = vec![
//!     Subject::new("s1", "Acme").with_categories(vec!["B"]),
//!     Subject::new("s2", "Beta").with_categories(vec!["A"]),
//! ];
//!
//! // "Tech" absorbs "AI"
//! let summary = summarize(&SummaryRequest::new(Dimension::Category), &catalog);
//! assert_eq!(summary.matching_count, 2);
//!
//! let matrix = build_matrix(
//!     &PivotRequest::new(Dimension::Category, Dimension::BizDevPhase),
//!     &catalog,
//!     &EngineConfig::default(),
//! );
//! assert_eq!(matrix.rows.len(), 1);
//! ```

#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod graph;
pub mod hierarchy;
mod membership;
pub mod order;
pub mod pivot;
pub mod stats;

// Re-export main types for convenience
pub use catalog::{
    normalize_id_list, BizDevPhase, Catalog, CatalogSource, Category, Department, Dimension,
    EngagementLevel, Entity, IdList, Initiative, RecordFilter, Status, Subject, Theme, Topic, Vc,
};

pub use config::{EngineConfig, UNASSIGNED_ID};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};

pub use graph::{
    build_graph, Graph, GraphBuild, GraphRequest, GraphView, Link, LinkKind, Node, NodeId,
    NodeKind, TreeNode,
};

pub use hierarchy::{children_of, is_self_or_descendant, top_level_ancestor, Hierarchy};
pub use order::DisplayOrder;
pub use pivot::{build_matrix, drill_down, PivotCell, PivotMatrix, PivotRequest};
pub use stats::{summarize, Summary, SummaryRequest};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
