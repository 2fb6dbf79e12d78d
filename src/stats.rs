//! Summary statistics for cards and drill-down lists

use crate::catalog::{Catalog, Dimension, RecordFilter, Subject};
use crate::diagnostics::Diagnostics;
use crate::hierarchy::Hierarchy;
use crate::membership::index_memberships;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub dimension: Dimension,
    #[serde(default)]
    pub selection: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<RecordFilter>,
}

impl SummaryRequest {
    pub fn new(dimension: Dimension) -> Self {
        SummaryRequest {
            dimension,
            selection: Vec::new(),
            filter: None,
        }
    }

    pub fn with_selection<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Match count for one selected row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSummary {
    pub id: String,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_count: usize,
    pub matching_count: usize,
    pub total_records: Vec<Subject>,
    pub matching_records: Vec<Subject>,
    pub breakdown: Vec<RowSummary>,
    pub diagnostics: Diagnostics,
}

/// Totals over the (pre-filtered) subjects and the de-duplicated matches of the selection
pub fn summarize(request: &SummaryRequest, catalog: &Catalog) -> Summary {
    let mut diagnostics = Diagnostics::new();
    let tier = Hierarchy::from_refs(request.dimension.entities(catalog));
    let subjects = catalog.filtered_subjects(request.filter.as_ref());
    let members = index_memberships(
        subjects.iter().copied(),
        request.dimension,
        |id| tier.contains(id),
        &mut diagnostics,
    );

    let rows = tier.resolve_selection(
        request.selection.as_slice(),
        request.dimension.field_name(),
        &mut diagnostics,
    );

    let mut matched: FxHashSet<usize> = FxHashSet::default();
    let mut breakdown = Vec::with_capacity(rows.len());
    for row in rows {
        let ids: FxHashSet<String> = if request.dimension.is_hierarchical() {
            tier.self_and_descendant_ids(row.id())
        } else {
            std::iter::once(row.id().to_string()).collect()
        };
        let mut count = 0;
        for (index, member) in members.iter().enumerate() {
            if member.intersects(&ids) {
                count += 1;
                matched.insert(index);
            }
        }
        breakdown.push(RowSummary {
            id: row.id().to_string(),
            label: row.title().to_string(),
            count,
        });
    }

    // Collection order, one entry per subject id
    let matching_records: Vec<Subject> = members
        .iter()
        .enumerate()
        .filter(|(index, _)| matched.contains(index))
        .map(|(_, member)| member.subject.clone())
        .collect();
    let total_records: Vec<Subject> = members.iter().map(|member| member.subject.clone()).collect();

    debug!(
        "Summarized {}: {} of {} subjects match",
        request.dimension,
        matching_records.len(),
        total_records.len()
    );

    Summary {
        total_count: total_records.len(),
        matching_count: matching_records.len(),
        total_records,
        matching_records,
        breakdown,
        diagnostics,
    }
}
