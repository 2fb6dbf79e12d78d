use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

const CATALOG: &str = r#"{
    "categories": [
        {"id": "A", "title": "Tech"},
        {"id": "D", "title": "Health"}
    ],
    "statuses": [{"id": "active", "title": "Active"}],
    "subjects": [
        {"id": "s1", "title": "Acme", "categoryIds": ["A", "ghost"], "status": "active"},
        {"id": "s2", "title": "Beta", "categoryIds": ["D"], "status": "active"}
    ]
}"#;

fn catalog_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();
    file
}

fn run(catalog: &NamedTempFile, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_portfolio-graph"))
        .arg("--catalog")
        .arg(catalog.path())
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_json_output_is_clean_with_diagnostics() {
    let catalog = catalog_file();
    let output = run(&catalog, &["--format", "json", "summary", "category"]);
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["matchingCount"], 2);

    // The dangling category id is reported once, on stderr
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("missing id ghost").count(), 1);
}

#[test]
fn test_csv_output_has_no_log_lines() {
    let catalog = catalog_file();
    let output = run(&catalog, &["--format", "csv", "summary", "category"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "id,label,count");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_matrix_row_order() {
    let catalog = catalog_file();
    let output = run(
        &catalog,
        &["--format", "json", "matrix", "category", "status", "--row-order", "D,A"],
    );
    assert!(output.status.success());

    let matrix: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows: Vec<&str> = matrix["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_str().unwrap())
        .collect();
    assert_eq!(rows, vec!["D", "A"]);
}
