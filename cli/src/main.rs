//! Portfolio Graph CLI
//!
//! Loads a catalog snapshot (JSON or YAML) from disk and prints graphs,
//! pivot matrices and summaries built from it.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use portfolio_graph::{
    build_graph, build_matrix, drill_down, summarize, Catalog, Dimension, DisplayOrder,
    EngineConfig, GraphRequest, GraphView, PivotRequest, RecordFilter, SummaryRequest,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "portfolio-graph", version, about = "Portfolio relationship graphs and pivots")]
struct Cli {
    /// Catalog snapshot (.json, .yaml or .yml)
    #[arg(long, global = true, env = "PORTFOLIO_CATALOG")]
    catalog: Option<PathBuf>,

    /// Engine configuration file (.json, .yaml or .yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ViewArg {
    Categories,
    Themes,
    Vcs,
    Departments,
}

impl From<ViewArg> for GraphView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Categories => GraphView::Categories,
            ViewArg::Themes => GraphView::Themes,
            ViewArg::Vcs => GraphView::Vcs,
            ViewArg::Departments => GraphView::Departments,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum DimensionArg {
    Category,
    Theme,
    Vc,
    Department,
    Status,
    EngagementLevel,
    BizDevPhase,
}

impl From<DimensionArg> for Dimension {
    fn from(dimension: DimensionArg) -> Self {
        match dimension {
            DimensionArg::Category => Dimension::Category,
            DimensionArg::Theme => Dimension::Theme,
            DimensionArg::Vc => Dimension::Vc,
            DimensionArg::Department => Dimension::Department,
            DimensionArg::Status => Dimension::Status,
            DimensionArg::EngagementLevel => Dimension::EngagementLevel,
            DimensionArg::BizDevPhase => Dimension::BizDevPhase,
        }
    }
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Dimension the record filter applies to
    #[arg(long)]
    filter_by: Option<DimensionArg>,

    /// Comma-separated ids a subject must reference on --filter-by
    #[arg(long, value_delimiter = ',')]
    filter: Vec<String>,
}

impl FilterArgs {
    fn record_filter(&self) -> Option<RecordFilter> {
        self.filter_by
            .map(|dimension| RecordFilter::new(dimension.into(), self.filter.iter().cloned()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build a node/link graph
    Graph {
        view: ViewArg,

        /// Comma-separated ids whose top-level branches are expanded
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,

        /// Comma-separated display order of top-level entities
        #[arg(long, value_delimiter = ',')]
        order: Vec<String>,

        /// Comma-separated display order of phase buckets
        #[arg(long, value_delimiter = ',')]
        phase_order: Vec<String>,

        /// Print the nested tree instead of nodes and links
        #[arg(long)]
        tree: bool,
    },
    /// Build a row × column count matrix
    Matrix {
        rows: DimensionArg,
        columns: DimensionArg,

        /// Comma-separated row ids; empty uses every top-level row entity
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,

        /// Comma-separated display order of rows
        #[arg(long, value_delimiter = ',')]
        row_order: Vec<String>,

        /// Comma-separated display order of columns
        #[arg(long, value_delimiter = ',')]
        column_order: Vec<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List the subjects behind one matrix cell
    Drill {
        rows: DimensionArg,
        columns: DimensionArg,
        row: String,
        column: String,

        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Count distinct subjects per row entity
    Summary {
        dimension: DimensionArg,

        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

fn main() {
    // Output formats own stdout; logs and diagnostics go to stderr
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(catalog_path) = cli.catalog.as_deref() else {
        bail!("no catalog given (use --catalog or PORTFOLIO_CATALOG)");
    };
    let catalog = load_catalog(catalog_path)?;
    let config = match cli.config.as_deref() {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    info!(
        "Loaded catalog {}: {} subjects, {} categories",
        catalog_path.display(),
        catalog.subjects.len(),
        catalog.categories.len()
    );

    match cli.command {
        Commands::Graph {
            view,
            select,
            order,
            phase_order,
            tree,
        } => {
            let request = GraphRequest::new(view.into())
                .with_selection(select)
                .with_order(DisplayOrder::from(order))
                .with_phase_order(DisplayOrder::from(phase_order));
            run_graph(&request, &catalog, &config, tree, &cli.format)
        }
        Commands::Matrix {
            rows,
            columns,
            select,
            row_order,
            column_order,
            filter,
        } => {
            let mut request = PivotRequest::new(rows.into(), columns.into())
                .with_row_selection(select)
                .with_row_order(DisplayOrder::from(row_order))
                .with_column_order(DisplayOrder::from(column_order));
            if let Some(filter) = filter.record_filter() {
                request = request.with_filter(filter);
            }
            run_matrix(&request, &catalog, &config, &cli.format)
        }
        Commands::Drill {
            rows,
            columns,
            row,
            column,
            filter,
        } => {
            let mut request = PivotRequest::new(rows.into(), columns.into());
            if let Some(filter) = filter.record_filter() {
                request = request.with_filter(filter);
            }
            run_drill(&request, &catalog, &config, &row, &column, &cli.format)
        }
        Commands::Summary {
            dimension,
            select,
            filter,
        } => {
            let mut request = SummaryRequest::new(dimension.into()).with_selection(select);
            if let Some(filter) = filter.record_filter() {
                request = request.with_filter(filter);
            }
            run_summary(&request, &catalog, &cli.format)
        }
    }
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let catalog = if is_yaml(path) {
        Catalog::from_yaml_str(&text)
    } else {
        Catalog::from_json_str(&text)
    };
    catalog.with_context(|| format!("parsing {}", path.display()))
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config = if is_yaml(path) {
        EngineConfig::from_yaml_str(&text)
    } else {
        EngineConfig::from_json_str(&text)
    };
    config.with_context(|| format!("parsing {}", path.display()))
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn run_graph(
    request: &GraphRequest,
    catalog: &Catalog,
    config: &EngineConfig,
    tree: bool,
    format: &OutputFormat,
) -> Result<()> {
    let build = build_graph(request, catalog, config)?;

    if tree {
        let trees = build.graph.to_tree();
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trees)?),
            _ => {
                for root in &trees {
                    print_tree(root, 0);
                }
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&build)?);
        }
        OutputFormat::Csv => {
            println!("source,target,type");
            for link in &build.graph.links {
                println!("{},{},{}", csv_field(link.source.as_str()), csv_field(link.target.as_str()), link.kind);
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(&["id", "type", "label", "links out"]);
            for node in &build.graph.nodes {
                table.add_row(vec![
                    node.id.to_string(),
                    node.kind.to_string(),
                    node.label.clone(),
                    build.graph.get_outgoing_links(&node.id).len().to_string(),
                ]);
            }
            println!("{}", table);
            println!(
                "{} node(s), {} link(s)",
                build.graph.node_count(),
                build.graph.link_count()
            );
        }
    }
    Ok(())
}

fn print_tree(node: &portfolio_graph::TreeNode, depth: usize) {
    println!("{}{} ({}) [{}]", "  ".repeat(depth), node.label, node.kind, node.value);
    for child in &node.children {
        print_tree(child, depth + 1);
    }
}

fn run_matrix(
    request: &PivotRequest,
    catalog: &Catalog,
    config: &EngineConfig,
    format: &OutputFormat,
) -> Result<()> {
    let matrix = build_matrix(request, catalog, config);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&matrix)?);
        }
        OutputFormat::Csv => {
            println!("row,column,count");
            for cell in &matrix.cells {
                println!("{},{},{}", csv_field(&cell.row_label), csv_field(&cell.col_label), cell.count);
            }
        }
        OutputFormat::Table => {
            if matrix.rows.is_empty() {
                println!("(no rows)");
                return Ok(());
            }
            let mut header = vec![String::new()];
            header.extend(matrix.columns.iter().map(|col| col.label.clone()));
            header.push("total".to_string());

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(header);
            for row in &matrix.rows {
                let mut cells = vec![row.label.clone()];
                cells.extend(matrix.columns.iter().map(|col| matrix.count(&row.id, &col.id).to_string()));
                cells.push(matrix.row_total(&row.id).to_string());
                table.add_row(cells);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

fn run_drill(
    request: &PivotRequest,
    catalog: &Catalog,
    config: &EngineConfig,
    row: &str,
    column: &str,
    format: &OutputFormat,
) -> Result<()> {
    let subjects = drill_down(request, catalog, config, row, column);
    debug!("Cell ({}, {}) holds {} subject(s)", row, column, subjects.len());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&subjects)?),
        OutputFormat::Csv => {
            println!("id,title");
            for subject in &subjects {
                println!("{},{}", csv_field(&subject.id), csv_field(&subject.title));
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(&["id", "title", "phase"]);
            for subject in &subjects {
                table.add_row(vec![
                    subject.id.clone(),
                    subject.title.clone(),
                    subject.phase().unwrap_or("").to_string(),
                ]);
            }
            println!("{}", table);
            println!("{} subject(s)", subjects.len());
        }
    }
    Ok(())
}

fn run_summary(request: &SummaryRequest, catalog: &Catalog, format: &OutputFormat) -> Result<()> {
    let summary = summarize(request, catalog);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Csv => {
            println!("id,label,count");
            for row in &summary.breakdown {
                println!("{},{},{}", csv_field(&row.id), csv_field(&row.label), row.count);
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(&["id", "label", "count"]);
            for row in &summary.breakdown {
                table.add_row(vec![row.id.clone(), row.label.clone(), row.count.to_string()]);
            }
            println!("{}", table);
            println!("Total:    {}", summary.total_count);
            println!("Matching: {}", summary.matching_count);
        }
    }
    Ok(())
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
