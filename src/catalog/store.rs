//! Immutable catalog snapshot and the source trait it is gathered from

use super::dimension::RecordFilter;
use super::types::{
    BizDevPhase, Category, Department, EngagementLevel, Initiative, Status, Subject, Theme, Topic,
    Vc,
};
use crate::error::EngineResult;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use tracing::debug;

/// List operations of the external entity store
///
/// Implementations perform whatever I/O they need; the engine only sees the
/// returned collections.
pub trait CatalogSource {
    type Error;

    fn list_categories(&self) -> Result<Vec<Category>, Self::Error>;
    fn list_themes(&self) -> Result<Vec<Theme>, Self::Error>;
    fn list_departments(&self) -> Result<Vec<Department>, Self::Error>;
    fn list_vcs(&self) -> Result<Vec<Vc>, Self::Error>;
    fn list_statuses(&self) -> Result<Vec<Status>, Self::Error>;
    fn list_engagement_levels(&self) -> Result<Vec<EngagementLevel>, Self::Error>;
    fn list_biz_dev_phases(&self) -> Result<Vec<BizDevPhase>, Self::Error>;
    fn list_subjects(&self) -> Result<Vec<Subject>, Self::Error>;
    fn list_initiatives(&self, organization_id: &str) -> Result<Vec<Initiative>, Self::Error>;
    fn list_topics(&self, organization_id: &str) -> Result<Vec<Topic>, Self::Error>;
}

/// Snapshot of every collection the engine reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub themes: Vec<Theme>,
    pub departments: Vec<Department>,
    pub vcs: Vec<Vc>,
    pub statuses: Vec<Status>,
    pub engagement_levels: Vec<EngagementLevel>,
    pub biz_dev_phases: Vec<BizDevPhase>,
    pub subjects: Vec<Subject>,
    pub initiatives: Vec<Initiative>,
    pub topics: Vec<Topic>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gather a snapshot from an external source
    pub fn from_source<S: CatalogSource>(
        source: &S,
        organization_id: &str,
    ) -> Result<Self, S::Error> {
        let catalog = Catalog {
            categories: source.list_categories()?,
            themes: source.list_themes()?,
            departments: source.list_departments()?,
            vcs: source.list_vcs()?,
            statuses: source.list_statuses()?,
            engagement_levels: source.list_engagement_levels()?,
            biz_dev_phases: source.list_biz_dev_phases()?,
            subjects: source.list_subjects()?,
            initiatives: source.list_initiatives(organization_id)?,
            topics: source.list_topics(organization_id)?,
        };
        debug!(
            "Loaded catalog for organization {}: {} categories, {} subjects",
            organization_id,
            catalog.categories.len(),
            catalog.subjects.len()
        );
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml_str(yaml: &str) -> EngineResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Content hash used as the memoization key
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Subjects passing the optional pre-filter, in collection order
    pub fn filtered_subjects<'a>(&'a self, filter: Option<&RecordFilter>) -> Vec<&'a Subject> {
        self.subjects
            .iter()
            .filter(|subject| filter.map_or(true, |f| f.matches(subject)))
            .collect()
    }
}

/// An in-memory snapshot is its own source
impl CatalogSource for Catalog {
    type Error = std::convert::Infallible;

    fn list_categories(&self) -> Result<Vec<Category>, Self::Error> {
        Ok(self.categories.clone())
    }

    fn list_themes(&self) -> Result<Vec<Theme>, Self::Error> {
        Ok(self.themes.clone())
    }

    fn list_departments(&self) -> Result<Vec<Department>, Self::Error> {
        Ok(self.departments.clone())
    }

    fn list_vcs(&self) -> Result<Vec<Vc>, Self::Error> {
        Ok(self.vcs.clone())
    }

    fn list_statuses(&self) -> Result<Vec<Status>, Self::Error> {
        Ok(self.statuses.clone())
    }

    fn list_engagement_levels(&self) -> Result<Vec<EngagementLevel>, Self::Error> {
        Ok(self.engagement_levels.clone())
    }

    fn list_biz_dev_phases(&self) -> Result<Vec<BizDevPhase>, Self::Error> {
        Ok(self.biz_dev_phases.clone())
    }

    fn list_subjects(&self) -> Result<Vec<Subject>, Self::Error> {
        Ok(self.subjects.clone())
    }

    fn list_initiatives(&self, organization_id: &str) -> Result<Vec<Initiative>, Self::Error> {
        Ok(self
            .initiatives
            .iter()
            .filter(|i| i.organization_id.as_deref().map_or(true, |org| org == organization_id))
            .cloned()
            .collect())
    }

    fn list_topics(&self, organization_id: &str) -> Result<Vec<Topic>, Self::Error> {
        Ok(self
            .topics
            .iter()
            .filter(|t| t.organization_id.as_deref().map_or(true, |org| org == organization_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Dimension, IdList};

    const SNAPSHOT: &str = r#"{
        "categories": [
            {"id": "A", "title": "Tech"},
            {"id": "B", "title": "AI", "parentCategoryId": "A"}
        ],
        "bizDevPhases": [{"id": "p1", "title": "Scouting", "position": 1}],
        "subjects": [
            {"id": "s1", "title": "Acme", "categoryIds": ["B"], "themeIds": "[\"t1\"]"}
        ]
    }"#;

    #[test]
    fn test_from_json_str() {
        let catalog = Catalog::from_json_str(SNAPSHOT).unwrap();
        assert_eq!(catalog.categories.len(), 2);
        assert_eq!(catalog.biz_dev_phases[0].position, Some(1));
        assert_eq!(catalog.subjects[0].theme_ids, IdList::encoded(r#"["t1"]"#));
        assert!(catalog.vcs.is_empty());
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
categories:
  - id: A
    title: Tech
subjects:
  - id: s1
    title: Acme
    categoryIds: [A]
    relatedVCS: '["vc1"]'
"#;
        let catalog = Catalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.subjects[0].related_vcs.normalize(), vec!["vc1"]);
    }

    #[test]
    fn test_invalid_snapshot_is_an_error() {
        assert!(Catalog::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = Catalog::from_json_str(SNAPSHOT).unwrap();
        let mut b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.subjects[0].biz_dev_phase = Some("p1".to_string());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_from_source_scopes_by_organization() {
        let mut source = Catalog::new();
        let mut mine = Initiative::new("i1", "Mine");
        mine.organization_id = Some("org1".to_string());
        let mut theirs = Initiative::new("i2", "Theirs");
        theirs.organization_id = Some("org2".to_string());
        source.initiatives = vec![mine, theirs, Initiative::new("i3", "Shared")];

        let catalog = Catalog::from_source(&source, "org1").unwrap();
        let ids: Vec<&str> = catalog.initiatives.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i1", "i3"]);
    }

    #[test]
    fn test_filtered_subjects() {
        let mut catalog = Catalog::new();
        catalog.subjects = vec![
            Subject::new("s1", "Acme").with_phase("p1"),
            Subject::new("s2", "Beta").with_phase("p2"),
        ];
        let filter = RecordFilter::new(Dimension::BizDevPhase, ["p2"]);

        assert_eq!(catalog.filtered_subjects(None).len(), 2);
        let filtered = catalog.filtered_subjects(Some(&filter));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "s2");
    }
}
