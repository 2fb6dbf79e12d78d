//! Record types supplied by the entity store
//!
//! All records deserialize from the camelCase shape the store emits. The
//! engine only ever reads them.

use super::id_list::IdList;
use serde::{Deserialize, Serialize};

/// Common read access over every catalog record
pub trait Entity {
    fn id(&self) -> &str;

    fn title(&self) -> &str;

    /// Persisted display position, if the store keeps one
    fn position(&self) -> Option<i64> {
        None
    }

    /// Parent id for hierarchical tiers; flat tiers have none
    fn parent_id(&self) -> Option<&str> {
        None
    }
}

/// Hierarchical classification tag (tree via `parentCategoryId`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl Category {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Category {
            id: id.into(),
            title: title.into(),
            description: None,
            parent_category_id: None,
            position: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_category_id = Some(parent_id.into());
        self
    }

    pub fn with_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }
}

impl Entity for Category {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn position(&self) -> Option<i64> {
        self.position
    }

    fn parent_id(&self) -> Option<&str> {
        self.parent_category_id
            .as_deref()
            .filter(|parent| !parent.is_empty())
    }
}

macro_rules! flat_entity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            pub id: String,
            pub title: String,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub description: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub position: Option<i64>,
        }

        impl $name {
            pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
                $name {
                    id: id.into(),
                    title: title.into(),
                    description: None,
                    position: None,
                }
            }

            pub fn with_position(mut self, position: i64) -> Self {
                self.position = Some(position);
                self
            }
        }

        impl Entity for $name {
            fn id(&self) -> &str {
                &self.id
            }

            fn title(&self) -> &str {
                &self.title
            }

            fn position(&self) -> Option<i64> {
                self.position
            }
        }
    };
}

flat_entity!(
    /// Strategic theme subjects are grouped under
    Theme
);
flat_entity!(
    /// Internal department responsible for a subject
    Department
);
flat_entity!(
    /// Venture capital firm related to a subject
    Vc
);
flat_entity!(Status);
flat_entity!(EngagementLevel);
flat_entity!(
    /// Business-development phase; its order is the pivot column order
    BizDevPhase
);

/// Initiative running under one or more themes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Initiative {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub theme_ids: IdList,
    #[serde(default)]
    pub topic_ids: IdList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl Initiative {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Initiative {
            id: id.into(),
            title: title.into(),
            description: None,
            organization_id: None,
            theme_ids: IdList::Empty,
            topic_ids: IdList::Empty,
            position: None,
        }
    }
}

impl Entity for Initiative {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn position(&self) -> Option<i64> {
        self.position
    }
}

/// Topic an initiative works on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl Topic {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Topic {
            id: id.into(),
            title: title.into(),
            description: None,
            organization_id: None,
            position: None,
        }
    }
}

impl Entity for Topic {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn position(&self) -> Option<i64> {
        self.position
    }
}

/// A tracked startup
///
/// Carries one-to-many and many-to-many references into the other tiers.
/// Id-list fields may arrive as arrays or JSON-encoded strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub category_ids: IdList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<String>,
    #[serde(default)]
    pub theme_ids: IdList,
    #[serde(default, rename = "relatedVCS", alias = "relatedVcs")]
    pub related_vcs: IdList,
    #[serde(default)]
    pub responsible_departments: IdList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biz_dev_phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_level: Option<String>,
}

impl Subject {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Subject {
            id: id.into(),
            title: title.into(),
            organization_id: None,
            created_at: None,
            category_ids: IdList::Empty,
            theme_id: None,
            theme_ids: IdList::Empty,
            related_vcs: IdList::Empty,
            responsible_departments: IdList::Empty,
            biz_dev_phase: None,
            status: None,
            engagement_level: None,
        }
    }

    pub fn with_categories(mut self, ids: impl Into<IdList>) -> Self {
        self.category_ids = ids.into();
        self
    }

    pub fn with_themes(mut self, ids: impl Into<IdList>) -> Self {
        self.theme_ids = ids.into();
        self
    }

    pub fn with_vcs(mut self, ids: impl Into<IdList>) -> Self {
        self.related_vcs = ids.into();
        self
    }

    pub fn with_departments(mut self, ids: impl Into<IdList>) -> Self {
        self.responsible_departments = ids.into();
        self
    }

    pub fn with_phase(mut self, phase_id: impl Into<String>) -> Self {
        self.biz_dev_phase = Some(phase_id.into());
        self
    }

    pub fn with_status(mut self, status_id: impl Into<String>) -> Self {
        self.status = Some(status_id.into());
        self
    }

    /// Theme memberships: the legacy single `themeId` plus `themeIds`
    pub fn theme_memberships(&self) -> Vec<String> {
        let mut ids = Vec::new();
        if let Some(id) = self.theme_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            ids.push(id.to_string());
        }
        for id in self.theme_ids.normalize() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Phase id with blanks treated as unset
    pub fn phase(&self) -> Option<&str> {
        self.biz_dev_phase
            .as_deref()
            .map(str::trim)
            .filter(|phase| !phase.is_empty())
    }
}

impl Entity for Subject {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}
