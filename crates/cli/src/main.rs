use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use revdeck_core::columns::{revision_columns, status_badges, ColumnKind, StatusBadge};
use revdeck_core::{DiffStatus, DisplayRow, RevisionSummary};
use revdeck_porch::find_revision;
use revdeck_rows::{project, DefaultFormatter};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "revdeckctl", version, about = "Package revision history with change summaries")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = Output::Human)]
    output: Output,

    /// Namespace holding the Porch objects (cluster mode)
    #[arg(long = "ns", global = true, default_value = "default")]
    namespace: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output { Human, Json }

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the revisions table of a package
    Rows {
        /// YAML dump of PackageRevision + PackageRevisionResources objects
        #[arg(long = "file", conflicts_with = "cluster")]
        file: Option<PathBuf>,
        /// Read from the current kube context instead of a file
        #[arg(long = "cluster", action = ArgAction::SetTrue)]
        cluster: bool,
        /// Repository filter (cluster mode)
        #[arg(long = "repo")]
        repo: Option<String>,
        /// Package name (required in cluster mode)
        #[arg(long = "package")]
        package: Option<String>,
        /// Revision being viewed (defaults to the newest)
        #[arg(long = "current")]
        current: Option<String>,
        /// Absolute creation timestamps instead of "N days ago"
        #[arg(long = "absolute", action = ArgAction::SetTrue)]
        absolute: bool,
    },
    /// Diff the resources of two revisions from a dump
    Diff {
        #[arg(long = "file")]
        file: PathBuf,
        /// Only consider revisions of this package
        #[arg(long = "package")]
        package: Option<String>,
        /// Older revision (object name or revision label)
        older: String,
        /// Newer revision (object name or revision label)
        newer: String,
    },
    /// List resource identities of one revision from a dump
    Resources {
        #[arg(long = "file")]
        file: PathBuf,
        /// Only consider revisions of this package
        #[arg(long = "package")]
        package: Option<String>,
        /// Revision (object name or revision label)
        revision: String,
    },
}

fn init_tracing() {
    let env = std::env::var("REVDECK_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr).init();
}

fn init_metrics() {
    if let Ok(addr) = std::env::var("REVDECK_METRICS_ADDR") {
        if let Ok(sock) = addr.parse::<std::net::SocketAddr>() {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            match builder.with_http_listener(sock).install() {
                Ok(_) => tracing::info!(addr = %addr, "Prometheus metrics exporter listening"),
                Err(e) => tracing::warn!(error = %e, "failed to install metrics exporter"),
            }
        } else {
            tracing::warn!(addr = %addr, "invalid REVDECK_METRICS_ADDR; expected host:port");
        }
    }
}

fn load_dump(path: &Path, package: Option<&str>) -> Result<Vec<RevisionSummary>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    revdeck_porch::load_revisions_from_yaml(&text, package).with_context(|| format!("loading revisions from {}", path.display()))
}

fn status_marker(row: &DisplayRow) -> String {
    status_badges(row)
        .iter()
        .map(|b| match b {
            StatusBadge::CurrentRevision => "→".to_string(),
            StatusBadge::Lifecycle(l) => format!("[{}]", l),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_rows(rows: &[DisplayRow]) {
    let cols = revision_columns();
    let header: Vec<String> = cols.iter().map(|c| format!("{:<w$}", c.label, w = (c.width / 8.0) as usize)).collect();
    println!("{}", header.join(" ").trim_end());
    for row in rows {
        let cells: Vec<String> = cols
            .iter()
            .map(|c| {
                let text = if c.kind == ColumnKind::Status { status_marker(row) } else { row.cell(c.kind) };
                format!("{:<w$}", text, w = (c.width / 8.0) as usize)
            })
            .collect();
        println!("{}", cells.join(" ").trim_end());
    }
}

fn diff_marker(status: DiffStatus) -> char {
    match status {
        DiffStatus::Added => '+',
        DiffStatus::Updated => '~',
        DiffStatus::Removed => '-',
        DiffStatus::Unchanged => '=',
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    init_metrics();
    let cli = Cli::parse();

    match cli.command {
        Commands::Rows { file, cluster, repo, package, current, absolute } => {
            info!(cluster, package = ?package, "rows invoked");
            let revs = if cluster {
                let package = package.as_deref().ok_or_else(|| anyhow!("--package is required with --cluster"))?;
                revdeck_porch::load_revisions_from_cluster(&cli.namespace, repo.as_deref(), package)
                    .await
                    .context("loading revisions from cluster")?
            } else {
                let Some(file) = file else { bail!("either --file or --cluster is required") };
                load_dump(&file, package.as_deref())?
            };
            let current = current.or_else(|| revs.first().map(|r| r.revision.name.clone())).unwrap_or_default();
            let formatter = if absolute { DefaultFormatter::absolute() } else { DefaultFormatter::default() };
            let rows = project(&revs, &current, &formatter);
            match cli.output {
                Output::Human => print_rows(&rows),
                Output::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
            }
        }
        Commands::Diff { file, package, older, newer } => {
            info!(older = %older, newer = %newer, package = ?package, "diff invoked");
            let revs = load_dump(&file, package.as_deref())?;
            let prev = find_revision(&revs, &older)?;
            let cur = find_revision(&revs, &newer)?;
            let records = revdeck_diff::diff_maps(&prev.resources, &cur.resources);
            let summary = revdeck_diff::summarize(&records, true);
            match cli.output {
                Output::Human => {
                    for r in records.iter() {
                        println!("{} {}", diff_marker(r.status), r.identity);
                    }
                    println!("{}", summary);
                }
                Output::Json => {
                    #[derive(serde::Serialize)]
                    struct DiffOut<'a> { records: &'a [revdeck_core::DiffRecord], summary: String }
                    println!("{}", serde_json::to_string_pretty(&DiffOut { records: &records, summary })?);
                }
            }
        }
        Commands::Resources { file, package, revision } => {
            info!(revision = %revision, package = ?package, "resources invoked");
            let revs = load_dump(&file, package.as_deref())?;
            let rev = find_revision(&revs, &revision)?;
            let snaps = revdeck_diff::extract(&rev.resources);
            match cli.output {
                Output::Human => {
                    println!("{:<48} FILE", "RESOURCE");
                    for s in snaps {
                        println!("{:<48} {}#{}", s.identity.to_string(), s.filename, s.index);
                    }
                }
                Output::Json => {
                    #[derive(serde::Serialize)]
                    struct Row<'a> { id: String, filename: &'a str, index: usize }
                    let rows: Vec<_> = snaps
                        .iter()
                        .map(|s| Row { id: s.identity.to_string(), filename: &s.filename, index: s.index })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                }
            }
        }
    }

    Ok(())
}
