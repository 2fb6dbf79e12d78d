//! Entity tiers usable as pivot axes, summary rows and record filters

use super::id_list::IdListError;
use super::store::Catalog;
use super::types::{Entity, Subject};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The tier an axis lives on, and the subject field that references it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Category,
    Theme,
    Vc,
    Department,
    Status,
    EngagementLevel,
    BizDevPhase,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Category,
        Dimension::Theme,
        Dimension::Vc,
        Dimension::Department,
        Dimension::Status,
        Dimension::EngagementLevel,
        Dimension::BizDevPhase,
    ];

    /// Only categories form a tree; a parent row absorbs its descendants
    pub fn is_hierarchical(&self) -> bool {
        matches!(self, Dimension::Category)
    }

    /// Name of the subject field holding the reference
    pub fn field_name(&self) -> &'static str {
        match self {
            Dimension::Category => "categoryIds",
            Dimension::Theme => "themeIds",
            Dimension::Vc => "relatedVCS",
            Dimension::Department => "responsibleDepartments",
            Dimension::Status => "status",
            Dimension::EngagementLevel => "engagementLevel",
            Dimension::BizDevPhase => "bizDevPhase",
        }
    }

    /// Every entity of this tier, in collection order
    pub fn entities<'a>(&self, catalog: &'a Catalog) -> Vec<&'a dyn Entity> {
        fn erase<T: Entity>(items: &[T]) -> Vec<&dyn Entity> {
            items.iter().map(|item| item as &dyn Entity).collect()
        }

        match self {
            Dimension::Category => erase(&catalog.categories),
            Dimension::Theme => erase(&catalog.themes),
            Dimension::Vc => erase(&catalog.vcs),
            Dimension::Department => erase(&catalog.departments),
            Dimension::Status => erase(&catalog.statuses),
            Dimension::EngagementLevel => erase(&catalog.engagement_levels),
            Dimension::BizDevPhase => erase(&catalog.biz_dev_phases),
        }
    }

    /// Ids the subject references on this tier, or why the field is unreadable
    pub fn try_subject_values(&self, subject: &Subject) -> Result<Vec<String>, IdListError> {
        fn single(value: Option<&str>) -> Vec<String> {
            value
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| vec![id.to_string()])
                .unwrap_or_default()
        }

        match self {
            Dimension::Category => subject.category_ids.try_normalize(),
            Dimension::Theme => {
                // themeId is folded in even when themeIds is malformed
                subject.theme_ids.try_normalize()?;
                Ok(subject.theme_memberships())
            }
            Dimension::Vc => subject.related_vcs.try_normalize(),
            Dimension::Department => subject.responsible_departments.try_normalize(),
            Dimension::Status => Ok(single(subject.status.as_deref())),
            Dimension::EngagementLevel => Ok(single(subject.engagement_level.as_deref())),
            Dimension::BizDevPhase => Ok(single(subject.phase())),
        }
    }

    /// Ids the subject references on this tier; unreadable fields are empty
    pub fn subject_values(&self, subject: &Subject) -> Vec<String> {
        match self.try_subject_values(subject) {
            Ok(values) => values,
            Err(_) if *self == Dimension::Theme => subject.theme_memberships(),
            Err(_) => Vec::new(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Category => "category",
            Dimension::Theme => "theme",
            Dimension::Vc => "vc",
            Dimension::Department => "department",
            Dimension::Status => "status",
            Dimension::EngagementLevel => "engagementLevel",
            Dimension::BizDevPhase => "bizDevPhase",
        };
        write!(f, "{}", name)
    }
}

/// Orthogonal pre-filter on subjects, e.g. "only these phases"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordFilter {
    pub dimension: Dimension,
    pub ids: Vec<String>,
}

impl RecordFilter {
    pub fn new<I, S>(dimension: Dimension, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RecordFilter {
            dimension,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// An empty id set filters nothing out
    pub fn matches(&self, subject: &Subject) -> bool {
        if self.ids.is_empty() {
            return true;
        }
        self.dimension
            .subject_values(subject)
            .iter()
            .any(|value| self.ids.iter().any(|id| id == value))
    }
}
