//! assessrec index - Embed the catalog and write the index snapshot

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::search::{AssessmentIndex, save_snapshot};

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Catalog file (CSV or JSON); overrides catalog.path
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Snapshot destination; overrides index.snapshot_path
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct IndexReport {
    catalog: String,
    snapshot: String,
    records: usize,
    skipped: Vec<SkippedReport>,
    embedder: String,
    dimension: usize,
    duration_ms: u128,
}

#[derive(Debug, Serialize)]
struct SkippedReport {
    row: usize,
    reason: String,
}

pub fn run(ctx: &AppContext, args: &IndexArgs) -> Result<()> {
    let start = Instant::now();

    let mut config = ctx.config.clone();
    if let Some(path) = &args.catalog {
        config.catalog.path.clone_from(path);
    }
    if let Some(path) = &args.output {
        config.index.snapshot_path = Some(path.clone());
    }
    let ctx = AppContext::with_config(ctx.project_root.clone(), config, ctx.robot_mode);

    let embedder = ctx.embedder()?;
    let (index, catalog) = ctx.build_index(embedder.as_ref())?;
    let snapshot = ctx.config.snapshot_path();
    save_snapshot(&index, &snapshot)?;

    let report = IndexReport {
        catalog: ctx.catalog_path().display().to_string(),
        snapshot: snapshot.display().to_string(),
        records: index.len(),
        skipped: catalog
            .skipped
            .iter()
            .map(|s| SkippedReport {
                row: s.row,
                reason: s.reason.clone(),
            })
            .collect(),
        embedder: index.embedder_id().to_string(),
        dimension: index.dimension(),
        duration_ms: start.elapsed().as_millis(),
    };

    if ctx.robot_mode {
        return emit_json(&robot_ok(report));
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Index built")
        .kv("Catalog", &report.catalog)
        .kv("Snapshot", &report.snapshot)
        .kv("Records", &report.records.to_string())
        .kv("Embedder", &format!("{} ({} dims)", report.embedder, report.dimension))
        .kv("Elapsed", &format!("{} ms", report.duration_ms));
    if !report.skipped.is_empty() {
        layout.blank().section(&format!("Skipped rows ({})", report.skipped.len()));
        for skipped in &report.skipped {
            layout.bullet(&format!(
                "row {}: {}",
                skipped.row,
                style(&skipped.reason).yellow()
            ));
        }
    }
    emit_human(layout);
    Ok(())
}
