//! Non-fatal data-integrity reports
//!
//! Every operation returns its diagnostics alongside the result and also
//! emits them as `tracing` events.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// One integrity problem found while building a result
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// A foreign key points at an entity that does not exist
    #[serde(rename_all = "camelCase")]
    BrokenReference {
        entity_id: String,
        field: String,
        missing_id: String,
    },
    /// An id-list field could not be read and was treated as empty
    #[serde(rename_all = "camelCase")]
    MalformedField {
        entity_id: String,
        field: String,
        reason: String,
    },
    /// A parent chain loops back on itself
    #[serde(rename_all = "camelCase")]
    CycleDetected { entity_id: String, at: String },
    /// A link referenced a node missing from the final node set
    #[serde(rename_all = "camelCase")]
    InvalidLink { source: String, target: String },
    /// An initiative lists a topic id that resolves to nothing
    #[serde(rename_all = "camelCase")]
    UnresolvedTopic {
        initiative_id: String,
        topic_id: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::BrokenReference {
                entity_id,
                field,
                missing_id,
            } => write!(f, "{}.{} references missing id {}", entity_id, field, missing_id),
            Diagnostic::MalformedField {
                entity_id,
                field,
                reason,
            } => write!(f, "{}.{} is malformed: {}", entity_id, field, reason),
            Diagnostic::CycleDetected { entity_id, at } => {
                write!(f, "parent chain of {} cycles at {}", entity_id, at)
            }
            Diagnostic::InvalidLink { source, target } => {
                write!(f, "link {} -> {} has a missing endpoint", source, target)
            }
            Diagnostic::UnresolvedTopic {
                initiative_id,
                topic_id,
            } => write!(f, "initiative {} lists unknown topic {}", initiative_id, topic_id),
        }
    }
}

/// Collector handed through one build; duplicates are recorded once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: IndexSet<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.entries.contains(&diagnostic) {
            return;
        }
        warn!("{}", diagnostic);
        self.entries.insert(diagnostic);
    }

    pub fn broken_reference(&mut self, entity_id: &str, field: &str, missing_id: &str) {
        self.push(Diagnostic::BrokenReference {
            entity_id: entity_id.to_string(),
            field: field.to_string(),
            missing_id: missing_id.to_string(),
        });
    }

    pub fn malformed_field(&mut self, entity_id: &str, field: &str, reason: impl fmt::Display) {
        self.push(Diagnostic::MalformedField {
            entity_id: entity_id.to_string(),
            field: field.to_string(),
            reason: reason.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries.into_iter().collect()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        for diagnostic in other.entries {
            self.push(diagnostic);
        }
    }
}
