use portfolio_graph::{
    Catalog, CatalogSource, Dimension, Engine, EngineConfig, EngineError, PivotRequest,
};
use std::io::Write;
use tempfile::NamedTempFile;

const YAML_SNAPSHOT: &str = r#"
categories:
  - id: A
    title: Tech
  - id: B
    title: AI
    parentCategoryId: A
bizDevPhases:
  - id: p1
    title: Scouting
    position: 1
  - id: p2
    title: Pilot
    position: 2
initiatives:
  - id: I1
    title: Shared program
    themeIds: '["t1"]'
  - id: I2
    title: Org program
    organizationId: org-1
subjects:
  - id: s1
    title: Acme
    categoryIds: '["B"]'
    bizDevPhase: p2
  - id: s2
    title: Beta
    categoryIds: [A]
    relatedVCS: [v1]
"#;

fn write_temp(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_yaml_snapshot_from_file() {
    let file = write_temp(YAML_SNAPSHOT, ".yaml");
    let text = std::fs::read_to_string(file.path()).unwrap();
    let catalog = Catalog::from_yaml_str(&text).unwrap();

    assert_eq!(catalog.categories.len(), 2);
    assert_eq!(catalog.subjects[0].category_ids.normalize(), vec!["B"]);
    assert_eq!(catalog.subjects[1].related_vcs.normalize(), vec!["v1"]);
}

#[test]
fn test_json_round_trip_through_file() {
    let catalog = Catalog::from_yaml_str(YAML_SNAPSHOT).unwrap();
    let json = serde_json::to_string(&catalog).unwrap();
    let file = write_temp(&json, ".json");

    let text = std::fs::read_to_string(file.path()).unwrap();
    let reloaded = Catalog::from_json_str(&text).unwrap();

    // Encoded id lists are written back as plain arrays
    assert_eq!(serde_json::to_string(&reloaded).unwrap(), json);
    assert_eq!(reloaded.subjects[0].category_ids.normalize(), vec!["B"]);
    assert_eq!(reloaded.initiatives[0].theme_ids.normalize(), vec!["t1"]);
}

#[test]
fn test_invalid_snapshot_is_an_error() {
    assert!(matches!(Catalog::from_json_str("{not json"), Err(EngineError::Json(_))));
    assert!(matches!(
        Catalog::from_yaml_str("categories: 12"),
        Err(EngineError::Yaml(_))
    ));
}

#[test]
fn test_organization_scoped_listing() {
    let catalog = Catalog::from_yaml_str(YAML_SNAPSHOT).unwrap();

    // Initiatives without an organization are shared
    let own = catalog.list_initiatives("org-1").unwrap();
    assert_eq!(own.len(), 2);

    let snapshot = Catalog::from_source(&catalog, "org-2").unwrap();
    assert_eq!(snapshot.initiatives.len(), 1);
    assert_eq!(snapshot.initiatives[0].id, "I1");
    assert_eq!(snapshot.subjects.len(), 2);
}

#[test]
fn test_config_from_file_drives_engine() {
    let file = write_temp("unassigned_column: true\ncache_capacity: 4\n", ".yaml");
    let text = std::fs::read_to_string(file.path()).unwrap();
    let config = EngineConfig::from_yaml_str(&text).unwrap();
    assert!(config.unassigned_column);

    let catalog = Catalog::from_yaml_str(YAML_SNAPSHOT).unwrap();
    let mut engine = Engine::new(config);
    let request = PivotRequest::new(Dimension::Category, Dimension::BizDevPhase);

    let first = engine.build_matrix(&request, &catalog);
    let second = engine.build_matrix(&request, &catalog);
    assert_eq!(first, second);
    assert_eq!(engine.cache_hits(), 1);

    // s2 has no phase
    assert_eq!(first.count("A", "none"), 1);
    assert_eq!(first.count("A", "p2"), 1);
}
