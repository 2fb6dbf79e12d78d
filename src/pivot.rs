//! Cross-tabulated subject counts
//!
//! Produces a dense row × column matrix: every selected row meets every
//! column, zero counts included. Hierarchical row tiers absorb their
//! descendants; flat tiers match exactly. Ids are the only join keys.

use crate::catalog::{Catalog, Dimension, Entity, RecordFilter, Subject};
use crate::config::{EngineConfig, UNASSIGNED_ID};
use crate::diagnostics::Diagnostics;
use crate::hierarchy::Hierarchy;
use crate::membership::{index_memberships, Membership};
use crate::order::DisplayOrder;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotRequest {
    pub rows: Dimension,
    #[serde(default)]
    pub row_selection: Vec<String>,
    #[serde(default)]
    pub row_order: DisplayOrder,
    pub columns: Dimension,
    #[serde(default)]
    pub column_order: DisplayOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<RecordFilter>,
}

impl PivotRequest {
    pub fn new(rows: Dimension, columns: Dimension) -> Self {
        PivotRequest {
            rows,
            row_selection: Vec::new(),
            row_order: DisplayOrder::default(),
            columns,
            column_order: DisplayOrder::default(),
            filter: None,
        }
    }

    pub fn with_row_selection<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.row_selection = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_row_order(mut self, order: DisplayOrder) -> Self {
        self.row_order = order;
        self
    }

    pub fn with_column_order(mut self, order: DisplayOrder) -> Self {
        self.column_order = order;
        self
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// One row or column header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisEntry {
    pub id: String,
    pub label: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotCell {
    pub row_label: String,
    pub row_id: String,
    pub col_label: String,
    pub col_id: String,
    pub col_position: usize,
    pub count: usize,
}

/// Dense matrix; `cells` is row-major in row and column order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotMatrix {
    pub rows: Vec<AxisEntry>,
    pub columns: Vec<AxisEntry>,
    pub cells: Vec<PivotCell>,
    pub diagnostics: Diagnostics,
}

impl PivotMatrix {
    pub fn cell(&self, row_id: &str, col_id: &str) -> Option<&PivotCell> {
        let row = self.rows.iter().position(|r| r.id == row_id)?;
        let col = self.columns.iter().position(|c| c.id == col_id)?;
        self.cells.get(row * self.columns.len() + col)
    }

    /// Count at (row, col); zero when either id is not on the axes
    pub fn count(&self, row_id: &str, col_id: &str) -> usize {
        self.cell(row_id, col_id).map_or(0, |cell| cell.count)
    }

    /// Sum of the row's cells
    pub fn row_total(&self, row_id: &str) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.row_id == row_id)
            .map(|cell| cell.count)
            .sum()
    }

    /// Sum of the column's cells; a subject in two rows is counted twice
    pub fn column_total(&self, col_id: &str) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.col_id == col_id)
            .map(|cell| cell.count)
            .sum()
    }

    pub fn row_cells(&self, row_id: &str) -> Vec<&PivotCell> {
        self.cells.iter().filter(|cell| cell.row_id == row_id).collect()
    }
}

struct Row {
    entry: AxisEntry,
    member_ids: FxHashSet<String>,
}

/// Row/column resolution shared by the matrix and drill-down
struct Prepared<'a> {
    rows: Vec<Row>,
    columns: Vec<AxisEntry>,
    row_members: Vec<Membership<'a>>,
    col_members: Vec<Membership<'a>>,
    known_columns: FxHashSet<&'a str>,
    diagnostics: Diagnostics,
}

impl<'a> Prepared<'a> {
    fn new(request: &PivotRequest, catalog: &'a Catalog, config: &EngineConfig) -> Self {
        let mut diagnostics = Diagnostics::new();
        let row_tier = Hierarchy::from_refs(request.rows.entities(catalog));
        let col_entities = request.columns.entities(catalog);
        let known_columns: FxHashSet<&'a str> = col_entities.iter().map(|e| e.id()).collect();

        let selected = row_tier.resolve_selection(
            request.row_selection.as_slice(),
            request.rows.field_name(),
            &mut diagnostics,
        );
        let rows = request
            .row_order
            .arrange(selected)
            .into_iter()
            .enumerate()
            .map(|(position, row)| Row {
                entry: AxisEntry {
                    id: row.id().to_string(),
                    label: row.title().to_string(),
                    position,
                },
                member_ids: member_ids(&row_tier, request.rows, row.id()),
            })
            .collect();

        let mut columns: Vec<AxisEntry> = request
            .column_order
            .arrange(col_entities)
            .into_iter()
            .enumerate()
            .map(|(position, col)| AxisEntry {
                id: col.id().to_string(),
                label: col.title().to_string(),
                position,
            })
            .collect();
        // A real column with the unassigned id takes its place
        if config.unassigned_column && !columns.iter().any(|col| col.id == UNASSIGNED_ID) {
            columns.push(AxisEntry {
                id: UNASSIGNED_ID.to_string(),
                label: config.no_phase_label.clone(),
                position: columns.len(),
            });
        }

        let subjects = catalog.filtered_subjects(request.filter.as_ref());
        let row_members = index_memberships(
            subjects.iter().copied(),
            request.rows,
            |id| row_tier.contains(id),
            &mut diagnostics,
        );
        let col_members = index_memberships(
            subjects.iter().copied(),
            request.columns,
            |id| known_columns.contains(id),
            &mut diagnostics,
        );

        Prepared {
            rows,
            columns,
            row_members,
            col_members,
            known_columns,
            diagnostics,
        }
    }

    /// Indices of subjects matching a row's member ids
    fn matching(&self, member_ids: &FxHashSet<String>) -> Vec<usize> {
        self.row_members
            .iter()
            .enumerate()
            .filter(|(_, member)| member.intersects(member_ids))
            .map(|(index, _)| index)
            .collect()
    }

    fn in_column(&self, index: usize, col_id: &str) -> bool {
        let member = &self.col_members[index];
        if col_id == UNASSIGNED_ID && !self.known_columns.contains(UNASSIGNED_ID) {
            return !member.ids.iter().any(|id| self.known_columns.contains(id.as_str()));
        }
        member.contains(col_id)
    }
}

/// Row selection resolved to ids: self plus descendants on hierarchical tiers
fn member_ids<T: Entity + ?Sized>(tier: &Hierarchy<'_, T>, dimension: Dimension, id: &str) -> FxHashSet<String> {
    if dimension.is_hierarchical() {
        tier.self_and_descendant_ids(id)
    } else {
        std::iter::once(id.to_string()).collect()
    }
}

/// Build the dense count matrix for `request`
pub fn build_matrix(request: &PivotRequest, catalog: &Catalog, config: &EngineConfig) -> PivotMatrix {
    let prepared = Prepared::new(request, catalog, config);
    let mut cells = Vec::with_capacity(prepared.rows.len() * prepared.columns.len());

    for row in &prepared.rows {
        let matching = prepared.matching(&row.member_ids);
        for col in &prepared.columns {
            // Memberships are de-duplicated by subject id, so indices are distinct subjects
            let count = matching
                .iter()
                .filter(|&&index| prepared.in_column(index, &col.id))
                .count();
            cells.push(PivotCell {
                row_label: row.entry.label.clone(),
                row_id: row.entry.id.clone(),
                col_label: col.label.clone(),
                col_id: col.id.clone(),
                col_position: col.position,
                count,
            });
        }
    }

    debug!(
        "Built {} x {} pivot ({} rows, {} columns)",
        request.rows,
        request.columns,
        prepared.rows.len(),
        prepared.columns.len()
    );

    let Prepared {
        rows,
        columns,
        diagnostics,
        ..
    } = prepared;
    PivotMatrix {
        rows: rows.into_iter().map(|row| row.entry).collect(),
        columns,
        cells,
        diagnostics,
    }
}

/// Subjects counted in the cell at (`row_id`, `col_id`)
pub fn drill_down<'a>(
    request: &PivotRequest,
    catalog: &'a Catalog,
    config: &EngineConfig,
    row_id: &str,
    col_id: &str,
) -> Vec<&'a Subject> {
    let prepared = Prepared::new(request, catalog, config);
    let row_tier = Hierarchy::from_refs(request.rows.entities(catalog));
    let ids = member_ids(&row_tier, request.rows, row_id);

    prepared
        .matching(&ids)
        .into_iter()
        .filter(|&index| prepared.in_column(index, col_id))
        .map(|index| prepared.row_members[index].subject)
        .collect()
}
