//! Graph construction over a catalog snapshot
//!
//! One call produces one node/link set for the requested view. Top-level
//! entities come from the selection (or every root when it is empty), each
//! entity is emitted once however many paths reach it, and links with a
//! missing endpoint are removed and reported at the end.

use super::link::Link;
use super::node::Node;
use super::store::{Graph, GraphSet};
use super::types::{LinkKind, NodeId, NodeKind};
use crate::catalog::{Catalog, Dimension, Entity, Initiative, Subject, Topic};
use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{EngineError, EngineResult};
use crate::hierarchy::Hierarchy;
use crate::membership::{index_memberships, Membership};
use crate::order::DisplayOrder;
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which tier the graph is rooted at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphView {
    /// Category tree: top-level → child categories → startups
    Categories,
    /// Theme → initiatives → topics, and theme → phase buckets → startups
    Themes,
    /// VC → startups
    Vcs,
    /// Department → startups
    Departments,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphRequest {
    pub view: GraphView,

    /// Ids whose top-level branches are expanded; empty expands everything
    #[serde(default)]
    pub selection: Vec<String>,

    /// Display order of top-level entities and their children
    #[serde(default)]
    pub order: DisplayOrder,

    /// Display order of phase buckets in the themes view
    #[serde(default)]
    pub phase_order: DisplayOrder,
}

impl GraphRequest {
    pub fn new(view: GraphView) -> Self {
        GraphRequest {
            view,
            selection: Vec::new(),
            order: DisplayOrder::default(),
            phase_order: DisplayOrder::default(),
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

    pub fn with_order(mut self, order: DisplayOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_phase_order(mut self, order: DisplayOrder) -> Self {
        self.phase_order = order;
        self
    }
}

/// Output of one build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphBuild {
    pub graph: Graph,
    /// Links removed because an endpoint was missing
    pub dropped_links: Vec<Link>,
    pub diagnostics: Diagnostics,
}

/// Build the node/link set for `request`
pub fn build_graph(
    request: &GraphRequest,
    catalog: &Catalog,
    config: &EngineConfig,
) -> EngineResult<GraphBuild> {
    let mut builder = GraphBuilder::new(request, catalog, config);
    match request.view {
        GraphView::Categories => builder.build_categories(),
        GraphView::Themes => builder.build_themes()?,
        GraphView::Vcs => builder.build_associations(NodeKind::Vc, Dimension::Vc),
        GraphView::Departments => builder.build_associations(NodeKind::Department, Dimension::Department),
    }
    Ok(builder.finish())
}

struct GraphBuilder<'a> {
    request: &'a GraphRequest,
    catalog: &'a Catalog,
    config: &'a EngineConfig,
    set: GraphSet,
    diagnostics: Diagnostics,
}

impl<'a> GraphBuilder<'a> {
    fn new(request: &'a GraphRequest, catalog: &'a Catalog, config: &'a EngineConfig) -> Self {
        GraphBuilder {
            request,
            catalog,
            config,
            set: GraphSet::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn finish(self) -> GraphBuild {
        let GraphBuilder {
            request,
            set,
            mut diagnostics,
            ..
        } = self;
        let (graph, dropped_links) = set.finish(&mut diagnostics);
        debug!(
            "Built {:?} graph: {} nodes, {} links, {} diagnostics",
            request.view,
            graph.node_count(),
            graph.link_count(),
            diagnostics.len()
        );
        GraphBuild {
            graph,
            dropped_links,
            diagnostics,
        }
    }

    /// Candidate top-level entities, de-duplicated in first-seen order, then arranged
    fn top_level_set<T: Entity + ?Sized>(&mut self, hierarchy: &Hierarchy<'a, T>, field: &str) -> Vec<&'a T> {
        let tops = hierarchy.resolve_selection(self.request.selection.as_slice(), field, &mut self.diagnostics);
        self.request.order.arrange(tops)
    }

    /// Whether a child sits on the path to (or below) a selected entity
    fn on_selection_path<T: Entity + ?Sized>(&self, hierarchy: &Hierarchy<'a, T>, top: &T, child: &T) -> bool {
        let selection = &self.request.selection;
        if selection.is_empty() || selection.iter().any(|id| id == top.id()) {
            return true;
        }
        if hierarchy.is_self_or_descendant(child, selection.as_slice()) {
            return true;
        }
        selection.iter().filter_map(|id| hierarchy.get(id)).any(|selected| {
            hierarchy
                .ancestors(selected)
                .iter()
                .any(|ancestor| ancestor.id() == child.id())
        })
    }

    fn build_categories(&mut self) {
        let catalog = self.catalog;
        let hierarchy = Hierarchy::new(&catalog.categories);
        let members = index_memberships(
            &catalog.subjects,
            Dimension::Category,
            |id| hierarchy.contains(id),
            &mut self.diagnostics,
        );

        for top in self.top_level_set(&hierarchy, "categoryIds") {
            let top_node = self.category_node(&hierarchy, top);
            let children = self.request.order.arrange(hierarchy.children_of(&top.id));

            // A top-level entity without structural children is the deepest tier
            let own_ids = if children.is_empty() {
                hierarchy.self_and_descendant_ids(&top.id)
            } else {
                std::iter::once(top.id.clone()).collect()
            };
            self.link_subjects(&top_node, &members, &own_ids);

            for child in children {
                if !self.on_selection_path(&hierarchy, top, child) {
                    continue;
                }
                let child_node = self.category_node(&hierarchy, child);
                self.set.link(top_node.clone(), child_node.clone(), LinkKind::Contains);

                let absorbed = hierarchy.self_and_descendant_ids(&child.id);
                self.link_subjects(&child_node, &members, &absorbed);
            }
        }
    }

    fn build_themes(&mut self) -> EngineResult<()> {
        let catalog = self.catalog;
        let themes = Hierarchy::new(&catalog.themes);
        let phases = Hierarchy::new(&catalog.biz_dev_phases);
        let topics: FxHashMap<&str, &Topic> = catalog.topics.iter().map(|t| (t.id.as_str(), t)).collect();
        let members = index_memberships(
            &catalog.subjects,
            Dimension::Theme,
            |id| themes.contains(id),
            &mut self.diagnostics,
        );
        let initiatives = self.index_initiatives();
        let phase_sequence = self.request.phase_order.arrange(phases.items().to_vec());

        for theme in self.top_level_set(&themes, "themeIds") {
            let theme_node = self.entity_node(NodeKind::Theme, theme, theme.description.as_deref());

            for (initiative, theme_ids, topic_ids) in &initiatives {
                if !theme_ids.iter().any(|id| id == &theme.id) {
                    continue;
                }
                let initiative_node =
                    self.entity_node(NodeKind::Initiative, *initiative, initiative.description.as_deref());
                self.set.link(theme_node.clone(), initiative_node.clone(), LinkKind::Initiative);

                for topic_id in topic_ids {
                    match topics.get(topic_id.as_str()) {
                        Some(topic) => {
                            let topic_node =
                                self.entity_node(NodeKind::Topic, *topic, topic.description.as_deref());
                            self.set.link(initiative_node.clone(), topic_node, LinkKind::Topic);
                        }
                        None => self.diagnostics.push(Diagnostic::UnresolvedTopic {
                            initiative_id: initiative.id.clone(),
                            topic_id: topic_id.clone(),
                        }),
                    }
                }
            }

            // Group the theme's subjects by phase, unknown or missing phases last
            let mut buckets: IndexMap<Option<&str>, Vec<&Subject>> = IndexMap::new();
            for member in members.iter().filter(|m| m.contains(&theme.id)) {
                let subject = member.subject;
                let key = match subject.phase() {
                    None => None,
                    Some(phase) if phases.contains(phase) => Some(phase),
                    Some(phase) => {
                        if self.config.strict_phase_resolution {
                            return Err(EngineError::UnresolvedPhase {
                                subject: subject.id.clone(),
                                phase: phase.to_string(),
                            });
                        }
                        self.diagnostics.broken_reference(&subject.id, "bizDevPhase", phase);
                        None
                    }
                };
                buckets.entry(key).or_default().push(subject);
            }

            for phase in &phase_sequence {
                if let Some(subjects) = buckets.get(&Some(phase.id.as_str())) {
                    let bucket = NodeId::for_bucket(&theme_node, Some(phase.id.as_str()));
                    self.phase_bucket(&theme_node, bucket, &phase.title, Some(phase.id.as_str()), subjects);
                }
            }
            if let Some(subjects) = buckets.get(&None) {
                let bucket = NodeId::for_bucket(&theme_node, None);
                let label = self.config.no_phase_label.clone();
                self.phase_bucket(&theme_node, bucket, &label, None, subjects);
            }
        }
        Ok(())
    }

    /// Initiatives in display order with normalized theme and topic ids
    fn index_initiatives(&mut self) -> Vec<(&'a Initiative, Vec<String>, Vec<String>)> {
        let catalog = self.catalog;
        let arranged = DisplayOrder::default().arrange(catalog.initiatives.iter().collect());
        arranged
            .into_iter()
            .map(|initiative| {
                if let Err(err) = initiative.theme_ids.try_normalize() {
                    self.diagnostics.malformed_field(&initiative.id, "themeIds", err);
                }
                if let Err(err) = initiative.topic_ids.try_normalize() {
                    self.diagnostics.malformed_field(&initiative.id, "topicIds", err);
                }
                (
                    initiative,
                    initiative.theme_ids.normalize(),
                    initiative.topic_ids.normalize(),
                )
            })
            .collect()
    }

    fn phase_bucket(
        &mut self,
        owner: &NodeId,
        bucket: NodeId,
        label: &str,
        phase_id: Option<&str>,
        subjects: &[&Subject],
    ) {
        let bucket = self.set.ensure_node(bucket.clone(), || {
            Node::new(bucket, label, NodeKind::BizDevPhase)
                .with_property("owner", owner.as_str())
                .with_property("phaseId", phase_id)
                .with_property("count", subjects.len())
        });
        self.set.link(owner.clone(), bucket.clone(), LinkKind::Phase);
        for subject in subjects {
            let startup = self.startup_node(subject);
            self.set.link(bucket.clone(), startup, LinkKind::Startup);
        }
    }

    fn build_associations(&mut self, kind: NodeKind, dimension: Dimension) {
        let catalog = self.catalog;
        let entities = Hierarchy::from_refs(dimension.entities(catalog));
        let members = index_memberships(
            &catalog.subjects,
            dimension,
            |id| entities.contains(id),
            &mut self.diagnostics,
        );

        for entity in self.top_level_set(&entities, dimension.field_name()) {
            let owner = self.entity_node(kind, entity, None);
            let own_ids = std::iter::once(entity.id().to_string()).collect();
            self.link_subjects(&owner, &members, &own_ids);
        }
    }

    fn link_subjects(&mut self, owner: &NodeId, members: &[Membership<'a>], ids: &FxHashSet<String>) {
        for member in members.iter().filter(|m| m.intersects(ids)) {
            let startup = self.startup_node(member.subject);
            self.set.link(owner.clone(), startup, LinkKind::Startup);
        }
    }

    fn category_node<T: Entity + ?Sized>(&mut self, hierarchy: &Hierarchy<'a, T>, category: &T) -> NodeId {
        let id = NodeId::for_entity(NodeKind::Category, category.id());
        self.set.ensure_node(id, || {
            Node::for_entity(NodeKind::Category, category.id(), category.title())
                .with_property("parentId", category.parent_id())
                .with_property("depth", hierarchy.depth(category))
                .with_property("position", category.position())
        })
    }

    fn entity_node<T: Entity + ?Sized>(&mut self, kind: NodeKind, entity: &T, description: Option<&str>) -> NodeId {
        let id = NodeId::for_entity(kind, entity.id());
        self.set.ensure_node(id, || {
            let mut node = Node::for_entity(kind, entity.id(), entity.title());
            if let Some(description) = description {
                node.set_property("description", description);
            }
            node.with_property("position", entity.position())
        })
    }

    fn startup_node(&mut self, subject: &Subject) -> NodeId {
        let id = NodeId::for_entity(NodeKind::Startup, &subject.id);
        self.set.ensure_node(id, || {
            Node::for_entity(NodeKind::Startup, &subject.id, subject.title.as_str())
                .with_property("organizationId", subject.organization_id.as_deref())
                .with_property("bizDevPhase", subject.phase())
                .with_property("status", subject.status.as_deref())
                .with_property("engagementLevel", subject.engagement_level.as_deref())
                .with_property("createdAt", subject.created_at.as_deref())
        })
    }
}
