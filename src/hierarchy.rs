//! Hierarchy resolution over parent-linked entities
//!
//! Walks `parentCategoryId` chains to find top-level ancestors and expands
//! selections to "self plus descendants". Broken parent links stop the ascent
//! and cycles are cut by a visited set, so every walk terminates.

use crate::catalog::Entity;
use crate::diagnostics::{Diagnostic, Diagnostics};
use rustc_hash::{FxHashMap, FxHashSet};

/// How a parent walk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AncestryOutcome {
    /// Reached an entity without a parent
    Resolved,
    /// The last resolvable entity points at a parent that does not exist
    BrokenReference { missing: String },
    /// The chain re-entered an entity it had already visited
    Cycle { at: String },
}

/// Result of walking an entity's parent chain
#[derive(Debug, Clone)]
pub struct Ancestry<'a, T: Entity + ?Sized> {
    pub root: &'a T,
    pub outcome: AncestryOutcome,
}

impl<'a, T: Entity + ?Sized> Ancestry<'a, T> {
    /// Report a broken link or a cycle for `entity_id`
    pub fn report(&self, entity_id: &str, diagnostics: &mut Diagnostics) {
        match &self.outcome {
            AncestryOutcome::Resolved => {}
            AncestryOutcome::BrokenReference { missing } => {
                diagnostics.broken_reference(self.root.id(), "parentCategoryId", missing)
            }
            AncestryOutcome::Cycle { at } => diagnostics.push(Diagnostic::CycleDetected {
                entity_id: entity_id.to_string(),
                at: at.clone(),
            }),
        }
    }
}

/// Id index over one collection, built once per call
#[derive(Debug)]
pub struct Hierarchy<'a, T: Entity + ?Sized> {
    items: Vec<&'a T>,
    by_id: FxHashMap<&'a str, &'a T>,
    children: FxHashMap<&'a str, Vec<&'a T>>,
}

impl<'a, T: Entity> Hierarchy<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self::from_refs(items.iter())
    }
}

impl<'a, T: Entity + ?Sized> Hierarchy<'a, T> {
    /// Build from borrowed records; the first record wins on duplicate ids
    pub fn from_refs<I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
    {
        let items: Vec<&'a T> = items.into_iter().collect();
        let mut by_id: FxHashMap<&'a str, &'a T> = FxHashMap::default();
        let mut children: FxHashMap<&'a str, Vec<&'a T>> = FxHashMap::default();

        for &item in &items {
            by_id.entry(item.id()).or_insert(item);
            if let Some(parent) = item.parent_id() {
                children.entry(parent).or_default().push(item);
            }
        }

        Hierarchy {
            items,
            by_id,
            children,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[&'a T] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&'a T> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Walk up to the root, recording how the walk ended
    pub fn ancestry(&self, entity: &'a T) -> Ancestry<'a, T> {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        visited.insert(entity.id());
        let mut current = entity;

        loop {
            let parent_id = match current.parent_id() {
                Some(parent_id) => parent_id,
                None => {
                    return Ancestry {
                        root: current,
                        outcome: AncestryOutcome::Resolved,
                    }
                }
            };
            let parent = match self.get(parent_id) {
                Some(parent) => parent,
                None => {
                    return Ancestry {
                        root: current,
                        outcome: AncestryOutcome::BrokenReference {
                            missing: parent_id.to_string(),
                        },
                    }
                }
            };
            if !visited.insert(parent.id()) {
                return Ancestry {
                    root: parent,
                    outcome: AncestryOutcome::Cycle {
                        at: parent.id().to_string(),
                    },
                };
            }
            current = parent;
        }
    }

    pub fn top_level_ancestor(&self, entity: &'a T) -> &'a T {
        self.ancestry(entity).root
    }

    /// Top-level ancestor by id; `None` when the id itself is unknown
    pub fn top_level_ancestor_of(&self, id: &str) -> Option<&'a T> {
        self.get(id).map(|entity| self.top_level_ancestor(entity))
    }

    /// Whether the entity has no resolvable parent
    pub fn is_top_level(&self, entity: &T) -> bool {
        match entity.parent_id() {
            None => true,
            Some(parent_id) => !self.contains(parent_id),
        }
    }

    /// Entities that start a tree: no parent, or a parent that cannot be found
    pub fn roots(&self) -> Vec<&'a T> {
        self.items
            .iter()
            .copied()
            .filter(|item| self.is_top_level(*item))
            .collect()
    }

    /// Resolvable ancestors, nearest first
    pub fn ancestors(&self, entity: &T) -> Vec<&'a T> {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        visited.insert(entity.id());
        let mut chain = Vec::new();
        let mut next = entity.parent_id().and_then(|id| self.get(id));

        while let Some(parent) = next {
            if !visited.insert(parent.id()) {
                break;
            }
            chain.push(parent);
            next = parent.parent_id().and_then(|id| self.get(id));
        }
        chain
    }

    /// Number of resolvable ancestors
    pub fn depth(&self, entity: &T) -> usize {
        self.ancestors(entity).len()
    }

    /// True if the candidate or any resolvable ancestor is selected
    pub fn is_self_or_descendant<S: AsRef<str>>(&self, candidate: &T, selected: &[S]) -> bool {
        let is_selected = |id: &str| selected.iter().any(|s| s.as_ref() == id);
        if is_selected(candidate.id()) {
            return true;
        }
        self.ancestors(candidate)
            .iter()
            .any(|ancestor| is_selected(ancestor.id()))
    }

    /// Direct children in collection order
    pub fn children_of(&self, parent_id: &str) -> Vec<&'a T> {
        self.children.get(parent_id).cloned().unwrap_or_default()
    }

    /// All transitive descendants, breadth first, excluding the entity itself
    pub fn descendant_ids(&self, id: &str) -> Vec<&'a str> {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        visited.insert(id);
        let mut out = Vec::new();
        let mut queue: std::collections::VecDeque<&str> = std::collections::VecDeque::new();
        queue.push_back(id);

        while let Some(current) = queue.pop_front() {
            if let Some(children) = self.children.get(current) {
                for &child in children {
                    let child_id = child.id();
                    if visited.insert(child_id) {
                        out.push(child_id);
                        queue.push_back(child_id);
                    }
                }
            }
        }
        out
    }

    /// One top-level entity per tree, reporting broken links and cycles
    ///
    /// A cycle with no root is represented by the first member met in
    /// collection order.
    pub fn top_level_entities(&self, diagnostics: &mut Diagnostics) -> Vec<&'a T> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut tops = Vec::new();

        for &item in &self.items {
            let ancestry = self.ancestry(item);
            ancestry.report(item.id(), diagnostics);
            if let AncestryOutcome::Cycle { .. } = ancestry.outcome {
                let represented = seen.contains(item.id())
                    || self
                        .ancestors(item)
                        .iter()
                        .any(|ancestor| seen.contains(ancestor.id()));
                if represented {
                    continue;
                }
            }
            if seen.insert(ancestry.root.id()) {
                tops.push(ancestry.root);
            }
        }
        tops
    }

    /// Top-level ancestors of the selected ids, de-duplicated in first-seen order
    ///
    /// An empty selection yields every top-level entity. Unknown ids are
    /// reported against `field` and skipped.
    pub fn resolve_selection<S: AsRef<str>>(
        &self,
        selection: &[S],
        field: &str,
        diagnostics: &mut Diagnostics,
    ) -> Vec<&'a T> {
        if selection.is_empty() {
            return self.top_level_entities(diagnostics);
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut tops = Vec::new();
        for id in selection {
            let id = id.as_ref();
            match self.get(id) {
                Some(entity) => {
                    let ancestry = self.ancestry(entity);
                    ancestry.report(entity.id(), diagnostics);
                    if seen.insert(ancestry.root.id()) {
                        tops.push(ancestry.root);
                    }
                }
                None => diagnostics.broken_reference("selection", field, id),
            }
        }
        tops
    }

    /// The entity id followed by every descendant id
    pub fn self_and_descendant_ids(&self, id: &str) -> FxHashSet<String> {
        let mut ids: FxHashSet<String> = FxHashSet::default();
        ids.insert(id.to_string());
        ids.extend(self.descendant_ids(id).into_iter().map(str::to_string));
        ids
    }
}

/// Root of the entity's parent chain within `all`
pub fn top_level_ancestor<'a, T: Entity>(entity: &'a T, all: &'a [T]) -> &'a T {
    Hierarchy::new(all).top_level_ancestor(entity)
}

/// True if `candidate` is selected or descends from a selected entity
pub fn is_self_or_descendant<T: Entity, S: AsRef<str>>(
    candidate: &T,
    selected: &[S],
    all: &[T],
) -> bool {
    Hierarchy::new(all).is_self_or_descendant(candidate, selected)
}

/// Direct children of `parent_id`, preserving input order
pub fn children_of<'a, T: Entity>(parent_id: &str, all: &'a [T]) -> Vec<&'a T> {
    all.iter()
        .filter(|item| item.parent_id() == Some(parent_id))
        .collect()
}
