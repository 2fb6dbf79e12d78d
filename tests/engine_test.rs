use portfolio_graph::{
    build_graph, build_matrix, drill_down, normalize_id_list, summarize, top_level_ancestor,
    Catalog, Category, Department, Dimension, EngineConfig, GraphRequest, GraphView, Hierarchy,
    NodeKind, PivotRequest, RecordFilter, Status, Subject, SummaryRequest, Theme, UNASSIGNED_ID,
};
use serde_json::json;
use std::collections::HashSet;

fn tech_catalog() -> Catalog {
    Catalog::from_json_str(
        r#"{
            "categories": [
                {"id": "A", "title": "Tech"},
                {"id": "B", "title": "AI", "parentCategoryId": "A"}
            ],
            "subjects": [
                {"id": "s1", "categoryIds": ["B"]},
                {"id": "s2", "categoryIds": ["A"]}
            ]
        }"#,
    )
    .unwrap()
}

fn portfolio() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.categories = vec![
        Category::new("A", "Tech"),
        Category::new("B", "AI").with_parent("A"),
        Category::new("C", "Vision").with_parent("B"),
        Category::new("H", "Health"),
        Category::new("X", "Orphan").with_parent("missing"),
    ];
    catalog.departments = vec![
        Department::new("D1", "Research"),
        Department::new("D2", "Sales"),
    ];
    catalog.statuses = vec![Status::new("active", "Active"), Status::new("paused", "Paused")];
    catalog.subjects = vec![
        Subject::new("s1", "One")
            .with_categories(vec!["B"])
            .with_departments(vec!["D1"])
            .with_status("active"),
        Subject::new("s2", "Two")
            .with_categories(vec!["C", "H"])
            .with_departments(vec!["D1", "D2"])
            .with_status("paused"),
        Subject::new("s3", "Three")
            .with_categories(vec!["A"])
            .with_departments(vec!["D2"])
            .with_status("active"),
        Subject::new("s4", "Four").with_categories(vec!["X"]),
    ];
    catalog
}

#[test]
fn test_tech_ai_summary_any_selection() {
    let catalog = tech_catalog();

    for selection in [vec![], vec!["B"], vec!["A"]] {
        let request = SummaryRequest::new(Dimension::Category).with_selection(selection);
        let summary = summarize(&request, &catalog);
        assert_eq!(summary.matching_count, 2);
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.breakdown.len(), 1);
        assert_eq!(summary.breakdown[0].label, "Tech");
    }
}

#[test]
fn test_theme_ids_as_json_string() {
    let mut catalog = Catalog::new();
    catalog.themes = vec![Theme::new("t1", "Mobility"), Theme::new("t2", "Climate")];
    catalog.subjects = vec![Subject::new("s1", "Encoded")];
    catalog.subjects[0].theme_ids = serde_json::from_value(json!(r#"["t1","t2"]"#)).unwrap();
    catalog.subjects.push(Subject::new("s2", "Plain").with_themes(vec!["t1", "t2"]));

    assert_eq!(
        normalize_id_list(&json!(r#"["t1","t2"]"#)),
        normalize_id_list(&json!(["t1", "t2"]))
    );

    let request = PivotRequest::new(Dimension::Theme, Dimension::Theme);
    let matrix = build_matrix(&request, &catalog, &EngineConfig::default());
    assert_eq!(matrix.count("t1", "t1"), 2);
    assert_eq!(matrix.count("t2", "t2"), 2);
    assert!(matrix.diagnostics.is_empty());
}

#[test]
fn test_broken_parent_resolves_to_self() {
    let catalog = portfolio();
    let orphan = catalog.categories.iter().find(|c| c.id == "X").unwrap();

    assert_eq!(top_level_ancestor(orphan, &catalog.categories).id, "X");

    // Idempotent
    let top = top_level_ancestor(orphan, &catalog.categories);
    assert_eq!(top_level_ancestor(top, &catalog.categories).id, top.id);

    let hierarchy = Hierarchy::new(&catalog.categories);
    let c = hierarchy.get("C").unwrap();
    let top = hierarchy.top_level_ancestor(c);
    assert_eq!(top.id, "A");
    assert_eq!(hierarchy.top_level_ancestor(top).id, "A");
}

#[test]
fn test_matrix_is_dense() {
    let catalog = portfolio();
    let request = PivotRequest::new(Dimension::Category, Dimension::Status);
    let matrix = build_matrix(&request, &catalog, &EngineConfig::default());

    // Top-level rows only: A, H and the orphan X
    assert_eq!(matrix.rows.len(), 3);
    assert_eq!(matrix.columns.len(), 2);
    assert_eq!(matrix.cells.len(), matrix.rows.len() * matrix.columns.len());

    let pairs: HashSet<(&str, &str)> = matrix
        .cells
        .iter()
        .map(|cell| (cell.row_id.as_str(), cell.col_id.as_str()))
        .collect();
    assert_eq!(pairs.len(), matrix.cells.len());
}

#[test]
fn test_hierarchical_rows_absorb_flat_rows_match_exactly() {
    let catalog = portfolio();
    let config = EngineConfig::default();

    let by_category = build_matrix(
        &PivotRequest::new(Dimension::Category, Dimension::Status),
        &catalog,
        &config,
    );
    // A absorbs B and C: s1 and s3 active, s2 paused
    assert_eq!(by_category.count("A", "active"), 2);
    assert_eq!(by_category.count("A", "paused"), 1);
    assert_eq!(by_category.count("H", "paused"), 1);

    let by_department = build_matrix(
        &PivotRequest::new(Dimension::Department, Dimension::Status),
        &catalog,
        &config,
    );
    assert_eq!(by_department.count("D1", "active"), 1);
    assert_eq!(by_department.count("D1", "paused"), 1);
    assert_eq!(by_department.count("D2", "active"), 1);
    assert_eq!(by_department.row_total("D2"), 2);
}

#[test]
fn test_unassigned_column_and_drill_down() {
    let catalog = portfolio();
    let config = EngineConfig {
        unassigned_column: true,
        ..EngineConfig::default()
    };
    let request = PivotRequest::new(Dimension::Category, Dimension::Status);
    let matrix = build_matrix(&request, &catalog, &config);

    assert_eq!(matrix.columns.last().unwrap().id, UNASSIGNED_ID);
    assert_eq!(matrix.count("X", UNASSIGNED_ID), 1);

    let subjects = drill_down(&request, &catalog, &config, "A", "active");
    let ids: Vec<&str> = subjects.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s3"]);
}

#[test]
fn test_summarize_deduplicates_across_rows() {
    let catalog = portfolio();
    let request = SummaryRequest::new(Dimension::Department);
    let summary = summarize(&request, &catalog);

    // s2 sits in both departments but is counted once
    assert_eq!(summary.matching_count, 3);
    assert_eq!(summary.total_count, 4);
    let ids: Vec<&str> = summary.matching_records.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2", "s3"]);
}

#[test]
fn test_summary_filter_narrows_totals() {
    let catalog = portfolio();
    let request = SummaryRequest::new(Dimension::Category)
        .with_filter(RecordFilter::new(Dimension::Status, vec!["active"]));
    let summary = summarize(&request, &catalog);

    assert_eq!(summary.total_count, 2);
    assert_eq!(summary.matching_count, 2);
}

#[test]
fn test_no_dangling_links_in_any_view() {
    let catalog = portfolio();
    let config = EngineConfig::default();

    for view in [GraphView::Categories, GraphView::Themes, GraphView::Vcs, GraphView::Departments] {
        let build = build_graph(&GraphRequest::new(view), &catalog, &config).unwrap();
        let graph = &build.graph;
        for link in &graph.links {
            assert!(graph.has_node(&link.source), "{:?} has dangling source", view);
            assert!(graph.has_node(&link.target), "{:?} has dangling target", view);
        }
    }
}

#[test]
fn test_shared_subject_single_node() {
    let catalog = portfolio();
    let build = build_graph(
        &GraphRequest::new(GraphView::Departments),
        &catalog,
        &EngineConfig::default(),
    )
    .unwrap();

    let startups = build.graph.nodes_of_kind(NodeKind::Startup);
    let unique: HashSet<&str> = startups.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(startups.len(), unique.len());
    assert_eq!(startups.len(), 3);
    assert_eq!(build.graph.link_count(), 4);
}

#[test]
fn test_tree_from_category_graph() {
    let catalog = tech_catalog();
    let build = build_graph(
        &GraphRequest::new(GraphView::Categories),
        &catalog,
        &EngineConfig::default(),
    )
    .unwrap();

    let trees = build.graph.to_tree();
    assert_eq!(trees.len(), 1);
    let tech = &trees[0];
    assert_eq!(tech.label, "Tech");
    assert_eq!(tech.value, 2);
    assert_eq!(tech.children.len(), 2);
}
